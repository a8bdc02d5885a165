use crate::url::v1::{ExpandUrlResponse, ListUrlsResponse, ShortenUrlResponse, UrlInfo};
use jiff::Timestamp;
use snip_core as core;

/// Formats a timestamp as RFC 3339 in UTC with second precision.
pub fn format_timestamp(timestamp: Timestamp) -> String {
    timestamp.strftime("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn saturating_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

impl From<core::Shortened> for ShortenUrlResponse {
    fn from(value: core::Shortened) -> Self {
        Self {
            url_id: value.id.to_string(),
            short_url: value.short_code.into_inner(),
        }
    }
}

impl From<core::Expanded> for ExpandUrlResponse {
    fn from(value: core::Expanded) -> Self {
        Self {
            original_url: value.long_url,
            click_count: saturating_i64(value.click_count),
            created_at: format_timestamp(value.created_at),
        }
    }
}

impl From<core::UrlRecord> for UrlInfo {
    fn from(record: core::UrlRecord) -> Self {
        Self {
            url_id: record.id.to_string(),
            original_url: record.long_url,
            short_url: record.short_code.into_inner(),
            click_count: saturating_i64(record.click_count),
            created_at: format_timestamp(record.created_at),
            last_accessed_at: record
                .last_accessed_at
                .map(format_timestamp)
                .unwrap_or_default(),
        }
    }
}

impl From<core::UrlPage> for ListUrlsResponse {
    fn from(page: core::UrlPage) -> Self {
        Self {
            urls: page.records.into_iter().map(UrlInfo::from).collect(),
            total_count: saturating_i64(page.total_count),
            page: saturating_i32(page.page),
            page_size: saturating_i32(page.page_size),
        }
    }
}
