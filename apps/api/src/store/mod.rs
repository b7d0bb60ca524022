//! Entry store — persistence for journal entries.
//!
//! Entries are append-only: the store can insert and list, never update or delete.
//! `AppState` holds an `Arc<dyn EntryStore>`; the backend is picked at startup
//! from `StorageConfig`.

pub mod postgres;
pub mod supabase;

#[cfg(test)]
pub mod memory;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::config::StorageConfig;
use crate::models::entry::{JournalEntry, NewEntry};

pub const ENTRIES_TABLE: &str = "entries";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Insert returned no row")]
    NoRowReturned,
}

#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Inserts one entry and returns the stored row, including `id` and `created_at`.
    async fn create_entry(&self, entry: NewEntry) -> Result<JournalEntry, StoreError>;

    /// Returns every entry, newest first.
    async fn list_entries(&self) -> Result<Vec<JournalEntry>, StoreError>;
}

/// Builds the store selected by the configuration.
pub async fn connect(storage: &StorageConfig) -> Result<Arc<dyn EntryStore>> {
    let store: Arc<dyn EntryStore> = match storage {
        StorageConfig::Supabase { url, key } => {
            Arc::new(supabase::SupabaseEntryStore::new(url, key)?)
        }
        StorageConfig::Postgres { database_url } => {
            Arc::new(postgres::PgEntryStore::connect(database_url).await?)
        }
    };
    Ok(store)
}
