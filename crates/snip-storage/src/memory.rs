use async_trait::async_trait;
use jiff::Timestamp;
use parking_lot::RwLock;
use snip_core::repository::Result;
use snip_core::{
    ReadRepository, RecordPage, Repository, ShortCode, StorageError, UrlId, UrlRecord,
};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
struct Tables {
    /// Records keyed by short code.
    by_code: HashMap<ShortCode, UrlRecord>,
    /// long URL -> short code of the first record saved for it.
    by_long_url: HashMap<String, ShortCode>,
    ids: HashSet<UrlId>,
}

/// In-memory implementation of the repository contract.
///
/// All indexes live behind a single lock so that the uniqueness checks and
/// the insert in [`Repository::save`] happen atomically.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tables.read().by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlRecord>> {
        let tables = self.tables.read();
        Ok(tables
            .by_long_url
            .get(long_url)
            .and_then(|code| tables.by_code.get(code))
            .cloned())
    }

    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self.tables.read().by_code.get(code).cloned())
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<RecordPage> {
        let tables = self.tables.read();

        let mut records: Vec<&UrlRecord> = tables.by_code.values().collect();
        // newest first; ids break ties between records created in the same instant
        records.sort_by(|a, b| {
            (b.created_at, b.id.as_str()).cmp(&(a.created_at, a.id.as_str()))
        });

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(RecordPage {
            records: records
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
            total_count: tables.by_code.len() as u64,
        })
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn save(&self, record: UrlRecord) -> Result<()> {
        let mut tables = self.tables.write();

        if tables.by_code.contains_key(&record.short_code) {
            return Err(StorageError::Conflict(format!(
                "short code {}",
                record.short_code
            )));
        }
        if tables.ids.contains(&record.id) {
            return Err(StorageError::Conflict(format!("id {}", record.id)));
        }

        tables
            .by_long_url
            .entry(record.long_url.clone())
            .or_insert_with(|| record.short_code.clone());
        tables.ids.insert(record.id.clone());
        tables.by_code.insert(record.short_code.clone(), record);
        Ok(())
    }

    async fn increment_click(&self, code: &ShortCode) -> Result<()> {
        if let Some(record) = self.tables.write().by_code.get_mut(code) {
            record.click_count += 1;
            record.last_accessed_at = Some(Timestamp::now());
        }
        Ok(())
    }
}
