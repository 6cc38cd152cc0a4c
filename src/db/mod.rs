// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore, with an in-memory backend for dev and tests).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use crate::config::{Config, StorageBackend};
use crate::error::AppError;
use crate::models::{CovidCacheEntry, Record, User};
use ring::rand::{SecureRandom, SystemRandom};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const RECORDS: &str = "records";
    /// Per-country COVID snapshots (keyed by normalized country key)
    pub const COVID_CACHE: &str = "covid_cache";
}

/// Generate a new document ID: 12 random bytes, hex encoded.
pub fn new_document_id() -> Result<String, AppError> {
    let mut bytes = [0u8; 12];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;
    Ok(hex::encode(bytes))
}

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreStore),
    Memory(MemoryStore),
    Offline,
}

/// Document store used by every handler.
#[derive(Clone)]
pub struct Database {
    backend: Backend,
}

impl Database {
    /// Open the backend selected by the configuration.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.storage_backend {
            StorageBackend::Firestore => Ok(Self {
                backend: Backend::Firestore(FirestoreStore::connect(&config.gcp_project_id).await?),
            }),
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Ok(Self::in_memory())
            }
        }
    }

    /// Fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::from_memory(MemoryStore::new())
    }

    /// Wrap an existing in-memory store (lets tests inspect it directly).
    pub fn from_memory(store: MemoryStore) -> Self {
        Self {
            backend: Backend::Memory(store),
        }
    }

    /// Create a mock database for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    fn offline() -> AppError {
        AppError::Database("Database not connected (offline mode)".to_string())
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.get_user(user_id).await,
            Backend::Memory(db) => Ok(db.get_user(user_id)),
            Backend::Offline => Err(Self::offline()),
        }
    }

    pub async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.find_user_by_google_id(google_id).await,
            Backend::Memory(db) => Ok(db.find_user_by_google_id(google_id)),
            Backend::Offline => Err(Self::offline()),
        }
    }

    pub async fn find_any_user(&self) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.find_any_user().await,
            Backend::Memory(db) => Ok(db.find_any_user()),
            Backend::Offline => Err(Self::offline()),
        }
    }

    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.insert_user(user).await,
            Backend::Memory(db) => {
                db.insert_user(user);
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    // ─── Record Operations ───────────────────────────────────────

    pub async fn insert_record(&self, record: &Record) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.insert_record(record).await,
            Backend::Memory(db) => {
                db.insert_record(record);
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Records owned by `user_id`, newest first.
    pub async fn list_records_for_user(&self, user_id: &str) -> Result<Vec<Record>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.list_records_for_user(user_id).await,
            Backend::Memory(db) => Ok(db.list_records_for_user(user_id)),
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Delete all records owned by `user_id`. Returns the number deleted.
    pub async fn delete_records_for_user(&self, user_id: &str) -> Result<usize, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.delete_records_for_user(user_id).await,
            Backend::Memory(db) => Ok(db.delete_records_for_user(user_id)),
            Backend::Offline => Err(Self::offline()),
        }
    }

    // ─── COVID Cache Operations ──────────────────────────────────

    pub async fn get_covid_entry(&self, key: &str) -> Result<Option<CovidCacheEntry>, AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.get_covid_entry(key).await,
            Backend::Memory(db) => Ok(db.get_covid_entry(key)),
            Backend::Offline => Err(Self::offline()),
        }
    }

    pub async fn set_covid_entry(&self, entry: &CovidCacheEntry) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.set_covid_entry(entry).await,
            Backend::Memory(db) => {
                db.set_covid_entry(entry);
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }
}
