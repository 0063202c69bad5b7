use std::collections::HashMap;

use tokio::sync::RwLock;

use super::CredentialStore;
use crate::{error::Result, types::CredentialRecord};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl MemoryStore {
    pub fn with_record(record: CredentialRecord) -> Self {
        let mut records = HashMap::new();
        records.insert(record.account_id.clone(), record);
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait::async_trait]
impl CredentialStore for MemoryStore {
    async fn load(&self, account_id: &str) -> Result<Option<CredentialRecord>> {
        Ok(self.records.read().await.get(account_id).cloned())
    }

    async fn upsert(&self, record: &CredentialRecord) -> Result<()> {
        self.records
            .write()
            .await
            .insert(record.account_id.clone(), record.clone());
        Ok(())
    }
}
