use async_trait::async_trait;
use quiz_core::model::{DailyStats, ProgressMap, Question};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// The named blobs the quiz keeps in its key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobKey {
    Questions,
    Progress,
    Stats,
}

impl BlobKey {
    pub const ALL: [BlobKey; 3] = [BlobKey::Questions, BlobKey::Progress, BlobKey::Stats];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BlobKey::Questions => "rl_v2_questions",
            BlobKey::Progress => "rl_v2_progress",
            BlobKey::Stats => "rl_v2_stats",
        }
    }
}

/// Minimal string key-value contract backing the quiz.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read. A missing key is
    /// `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove every key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be cleared.
    async fn clear_all(&self) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.clear();
        Ok(())
    }
}

/// Typed access to the quiz blobs over any `KeyValueStore`.
///
/// Blobs are JSON. A key that was never written reads as an empty collection.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }

    async fn load<T: DeserializeOwned + Default>(&self, key: BlobKey) -> Result<T, StorageError> {
        let Some(raw) = self.kv.get(key.as_str()).await? else {
            return Ok(T::default());
        };
        serde_json::from_str(&raw).map_err(|err| {
            log::warn!("stored blob {} is unreadable: {err}", key.as_str());
            StorageError::Serialization(err.to_string())
        })
    }

    async fn store<T: Serialize + ?Sized>(
        &self,
        key: BlobKey,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.kv.set(key.as_str(), &raw).await
    }

    /// Stored questions in presentation order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend or decoding failures.
    pub async fn questions(&self) -> Result<Vec<Question>, StorageError> {
        self.load(BlobKey::Questions).await
    }

    /// Replace the stored question set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend or encoding failures.
    pub async fn save_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        self.store(BlobKey::Questions, questions).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on backend or decoding failures.
    pub async fn progress(&self) -> Result<ProgressMap, StorageError> {
        self.load(BlobKey::Progress).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on backend or encoding failures.
    pub async fn save_progress(&self, progress: &ProgressMap) -> Result<(), StorageError> {
        self.store(BlobKey::Progress, progress).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on backend or decoding failures.
    pub async fn daily_stats(&self) -> Result<DailyStats, StorageError> {
        self.load(BlobKey::Stats).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on backend or encoding failures.
    pub async fn save_daily_stats(&self, stats: &DailyStats) -> Result<(), StorageError> {
        self.store(BlobKey::Stats, stats).await
    }

    /// Drop every stored question, progress record and daily stat.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be cleared.
    pub async fn clear_all(&self) -> Result<(), StorageError> {
        log::info!("clearing all stored quiz data");
        self.kv.clear_all().await
    }
}
