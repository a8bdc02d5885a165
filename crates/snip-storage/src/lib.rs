pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::{PgRepository, PoolSettings};
pub use snip_core::{ReadRepository, RecordPage, Repository, StorageError};
