use crate::error::Result;
use crate::model::{
    CreateUrlRequest, CreateUrlResponse, GetUrlResponse, ListUrlsQuery, ListUrlsResponse,
};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;

pub async fn create_url_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateUrlRequest>,
) -> Result<Json<CreateUrlResponse>> {
    let shortened = state.shortener().shorten(&request.url).await?;
    Ok(Json(CreateUrlResponse {
        url_id: shortened.id.to_string(),
        short_url: state.short_link(&shortened.short_code),
        short_code: shortened.short_code.into_inner(),
    }))
}

pub async fn get_url_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<GetUrlResponse>> {
    let expanded = state.shortener().expand(&short_code).await?;
    Ok(Json(expanded.into()))
}

pub async fn list_urls_handler(
    Query(query): Query<ListUrlsQuery>,
    State(state): State<AppState>,
) -> Result<Json<ListUrlsResponse>> {
    let page = state
        .shortener()
        .list_urls(query.page, query.page_size)
        .await?;
    Ok(Json(page.into()))
}
