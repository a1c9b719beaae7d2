//! Byte-level backends for the collection documents.

use crate::DbError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Whole-document storage. Each collection lives in one named document that
/// is always read and written in full.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns `Ok(None)` when the document does not exist yet.
    async fn read(&self, document: &str) -> Result<Option<Vec<u8>>, DbError>;

    async fn write(&self, document: &str, bytes: Vec<u8>) -> Result<(), DbError>;
}

/// One file per document inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, DbError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn path_of(&self, document: &str) -> PathBuf {
        self.root.join(document)
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn read(&self, document: &str) -> Result<Option<Vec<u8>>, DbError> {
        match tokio::fs::read(self.path_of(document)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, document: &str, bytes: Vec<u8>) -> Result<(), DbError> {
        tokio::fs::write(self.path_of(document), bytes).await?;
        Ok(())
    }
}

/// Keeps documents in process memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn with_document(mut self, document: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.documents
            .get_mut()
            .insert(document.to_string(), bytes.into());
        self
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, document: &str) -> Result<Option<Vec<u8>>, DbError> {
        Ok(self.documents.lock().await.get(document).cloned())
    }

    async fn write(&self, document: &str, bytes: Vec<u8>) -> Result<(), DbError> {
        self.documents
            .lock()
            .await
            .insert(document.to_string(), bytes);
        Ok(())
    }
}
