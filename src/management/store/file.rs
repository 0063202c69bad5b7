use std::{io::ErrorKind, path::PathBuf};

use super::CredentialStore;
use crate::{
    error::{Error, Result},
    types::CredentialRecord,
};

/// Keeps each record as pretty-printed JSON in
/// `<root>/credentials/<account_id>.json`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn record_path(&self, account_id: &str) -> Result<PathBuf> {
        let valid = !account_id.is_empty()
            && account_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !account_id.starts_with('.');
        if !valid {
            return Err(Error::Storage(format!("invalid account id `{account_id}`")));
        }

        let mut path = self.root.clone();
        path.push("credentials");
        path.push(format!("{account_id}.json"));
        Ok(path)
    }
}

#[async_trait::async_trait]
impl CredentialStore for FileStore {
    async fn load(&self, account_id: &str) -> Result<Option<CredentialRecord>> {
        let path = self.record_path(account_id)?;
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: CredentialRecord = serde_json::from_str(&content)
            .map_err(|e| Error::Storage(format!("{}: {}", path.display(), e)))?;
        Ok(Some(record))
    }

    async fn upsert(&self, record: &CredentialRecord) -> Result<()> {
        let path = self.record_path(&record.account_id)?;
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        // written next to the target, then renamed over it
        let json = serde_json::to_string_pretty(record)?;
        let tmp = path.with_extension("json.tmp");
        async_fs::write(&tmp, json).await?;
        async_fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
