use super::client::{LinkKind, StorageClient, StorageLink};
use crate::error::ServiceError;
use std::path::PathBuf;
use tracing::info;

const SERVICE: &str = "local storage";

/// Writes each upload as a file under `dir`
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait::async_trait]
impl StorageClient for LocalStorage {
    async fn upload(
        &self,
        content: &str,
        name: &str,
        kind: LinkKind,
    ) -> Result<StorageLink, ServiceError> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            ServiceError::new(SERVICE, format!("cannot create {}: {}", self.dir.display(), e))
        })?;

        let path = self.dir.join(name);
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| ServiceError::new(SERVICE, format!("cannot write {}: {}", path.display(), e)))?;

        let path = tokio::fs::canonicalize(&path)
            .await
            .unwrap_or_else(|_| path.clone());
        info!("Saved {:?} to {}", kind, path.display());

        Ok(StorageLink {
            url: format!("file://{}", path.display()),
            kind,
        })
    }

    fn name(&self) -> &str {
        "local"
    }
}
