use std::sync::Arc;

use snip_core::Shortener;
use snip_proto_schema::v1 as proto;
use snip_proto_schema::v1::url_service_server::UrlService;
use tonic::{Request, Response, Status};

use crate::error::GrpcError;

pub struct UrlGrpcServer {
    shortener: Arc<dyn Shortener>,
}

impl UrlGrpcServer {
    pub fn new(shortener: Arc<dyn Shortener>) -> Self {
        Self { shortener }
    }
}

#[tonic::async_trait]
impl UrlService for UrlGrpcServer {
    async fn shorten(
        &self,
        request: Request<proto::ShortenUrlRequest>,
    ) -> Result<Response<proto::ShortenUrlResponse>, Status> {
        let request = request.into_inner();
        let shortened = self
            .shortener
            .shorten(&request.url)
            .await
            .map_err(GrpcError::from)?;
        Ok(Response::new(shortened.into()))
    }

    async fn expand(
        &self,
        request: Request<proto::ExpandUrlRequest>,
    ) -> Result<Response<proto::ExpandUrlResponse>, Status> {
        let request = request.into_inner();
        let expanded = self
            .shortener
            .expand(&request.short_url)
            .await
            .map_err(GrpcError::from)?;
        Ok(Response::new(expanded.into()))
    }

    async fn list_urls(
        &self,
        request: Request<proto::ListUrlsRequest>,
    ) -> Result<Response<proto::ListUrlsResponse>, Status> {
        let request = request.into_inner();
        let page = self
            .shortener
            .list_urls(i64::from(request.page), i64::from(request.page_size))
            .await
            .map_err(GrpcError::from)?;
        Ok(Response::new(page.into()))
    }
}
