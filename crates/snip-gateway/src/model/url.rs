use serde::{Deserialize, Serialize};
use snip_core::{Expanded, UrlPage, UrlRecord};
use snip_proto_schema::v1::format_timestamp;

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUrlResponse {
    pub url_id: String,
    pub short_code: String,
    /// `short_code` resolved against the public base URL.
    pub short_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetUrlResponse {
    pub original_url: String,
    pub click_count: u64,
    pub created_at: String,
}

impl From<Expanded> for GetUrlResponse {
    fn from(expanded: Expanded) -> Self {
        Self {
            original_url: expanded.long_url,
            click_count: expanded.click_count,
            created_at: format_timestamp(expanded.created_at),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListUrlsQuery {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub page_size: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UrlInfo {
    pub url_id: String,
    pub original_url: String,
    pub short_code: String,
    pub click_count: u64,
    pub created_at: String,
    /// Empty when never resolved.
    pub last_accessed_at: String,
}

impl From<UrlRecord> for UrlInfo {
    fn from(record: UrlRecord) -> Self {
        Self {
            url_id: record.id.to_string(),
            original_url: record.long_url,
            short_code: record.short_code.into_inner(),
            click_count: record.click_count,
            created_at: format_timestamp(record.created_at),
            last_accessed_at: record
                .last_accessed_at
                .map(format_timestamp)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListUrlsResponse {
    pub urls: Vec<UrlInfo>,
    pub total_count: u64,
    pub page: i64,
    pub page_size: i64,
}

impl From<UrlPage> for ListUrlsResponse {
    fn from(page: UrlPage) -> Self {
        Self {
            urls: page.records.into_iter().map(UrlInfo::from).collect(),
            total_count: page.total_count,
            page: page.page,
            page_size: page.page_size,
        }
    }
}
