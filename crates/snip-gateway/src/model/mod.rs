mod url;

pub use url::{CreateUrlRequest, CreateUrlResponse, GetUrlResponse, ListUrlsQuery, ListUrlsResponse};

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
