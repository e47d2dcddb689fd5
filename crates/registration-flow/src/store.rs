//! Session storage backends.

use crate::error::SessionError;
use crate::session::SessionRecord;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// JSON file holding the session record.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the record atomically (temp file + rename).
    pub async fn save(&self, record: &SessionRecord) -> Result<(), SessionError> {
        let data = serde_json::to_vec_pretty(record)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &data).await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!("Saved session ({} bytes) to {:?}", data.len(), self.path);
        Ok(())
    }

    /// Load the record. A missing or unreadable file yields an empty session.
    pub async fn load(&self) -> Result<SessionRecord, SessionError> {
        if !self.path.exists() {
            debug!("No session file at {:?}, starting fresh", self.path);
            return Ok(SessionRecord::default());
        }

        let data = fs::read(&self.path).await?;
        match serde_json::from_slice(&data) {
            Ok(record) => Ok(record),
            Err(e) => {
                warn!("Discarding corrupt session file {:?}: {}", self.path, e);
                Ok(SessionRecord::default())
            }
        }
    }

    pub async fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path).await?;
            info!("Removed session file {:?}", self.path);
        }
        Ok(())
    }
}

/// In-memory store. Clones share the same record.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    record: Arc<RwLock<SessionRecord>>,
}

impl MemorySessionStore {
    pub async fn save(&self, record: &SessionRecord) -> Result<(), SessionError> {
        *self.record.write().await = record.clone();
        Ok(())
    }

    pub async fn load(&self) -> Result<SessionRecord, SessionError> {
        Ok(self.record.read().await.clone())
    }

    pub async fn clear(&self) -> Result<(), SessionError> {
        *self.record.write().await = SessionRecord::default();
        Ok(())
    }
}

/// Storage backend for the session record.
#[derive(Clone)]
pub enum SessionStore {
    /// Survives process restarts
    File(Arc<FileSessionStore>),
    /// Lives as long as the process
    Memory(MemorySessionStore),
}

impl SessionStore {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        SessionStore::File(Arc::new(FileSessionStore::new(path)))
    }

    pub fn memory() -> Self {
        SessionStore::Memory(MemorySessionStore::default())
    }

    pub async fn save(&self, record: &SessionRecord) -> Result<(), SessionError> {
        match self {
            SessionStore::File(s) => s.save(record).await,
            SessionStore::Memory(s) => s.save(record).await,
        }
    }

    pub async fn load(&self) -> Result<SessionRecord, SessionError> {
        match self {
            SessionStore::File(s) => s.load().await,
            SessionStore::Memory(s) => s.load().await,
        }
    }

    pub async fn clear(&self) -> Result<(), SessionError> {
        match self {
            SessionStore::File(s) => s.clear().await,
            SessionStore::Memory(s) => s.clear().await,
        }
    }
}
