mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::{
    config::{StorageConfig, StoreKind},
    error::Result,
    types::CredentialRecord,
};

/// Durable storage for credential records, one per account id.
///
/// `upsert` replaces the whole record keyed by `record.account_id`; there is
/// no partial update and no delete.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self, account_id: &str) -> Result<Option<CredentialRecord>>;
    async fn upsert(&self, record: &CredentialRecord) -> Result<()>;
}

pub enum Store {
    File(FileStore),
    Memory(MemoryStore),
}

impl Store {
    pub fn from_config(config: &StorageConfig) -> Self {
        match config.kind {
            StoreKind::File => Store::File(FileStore::new(config.data_dir.clone())),
            StoreKind::Memory => Store::Memory(MemoryStore::default()),
        }
    }
}

#[async_trait::async_trait]
impl CredentialStore for Store {
    async fn load(&self, account_id: &str) -> Result<Option<CredentialRecord>> {
        match self {
            Store::File(store) => store.load(account_id).await,
            Store::Memory(store) => store.load(account_id).await,
        }
    }

    async fn upsert(&self, record: &CredentialRecord) -> Result<()> {
        match self {
            Store::File(store) => store.upsert(record).await,
            Store::Memory(store) => store.upsert(record).await,
        }
    }
}
