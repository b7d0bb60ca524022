use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::models::entry::{JournalEntry, NewEntry};
use crate::store::{EntryStore, StoreError, ENTRIES_TABLE};

/// `entries` table accessed directly over PostgreSQL.
///
/// Expected table shape (as created in Supabase):
///
/// ```sql
/// CREATE TABLE entries (
///     id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     created_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
///     content         TEXT NOT NULL,
///     mood_label      TEXT NOT NULL,
///     sentiment_score DOUBLE PRECISION NOT NULL,
///     supportive_tip  TEXT NOT NULL
/// );
/// ```
pub struct PgEntryStore {
    pool: PgPool,
}

impl PgEntryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool of up to 10 connections and wraps it.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");
        Ok(Self::new(pool))
    }
}

/// `id` is cast to text so any key type the table uses decodes into the opaque id.
const RETURNED_COLUMNS: &str =
    "id::text AS id, created_at, content, mood_label, sentiment_score, supportive_tip";

fn insert_sql() -> String {
    format!(
        "INSERT INTO {ENTRIES_TABLE} (content, mood_label, sentiment_score, supportive_tip) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {RETURNED_COLUMNS}"
    )
}

fn list_sql() -> String {
    format!("SELECT {RETURNED_COLUMNS} FROM {ENTRIES_TABLE} ORDER BY created_at DESC")
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn create_entry(&self, entry: NewEntry) -> Result<JournalEntry, StoreError> {
        let row = sqlx::query_as::<_, JournalEntry>(&insert_sql())
            .bind(&entry.content)
            .bind(&entry.mood_label)
            .bind(entry.sentiment_score)
            .bind(&entry.supportive_tip)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(StoreError::NoRowReturned)
    }

    async fn list_entries(&self) -> Result<Vec<JournalEntry>, StoreError> {
        Ok(sqlx::query_as::<_, JournalEntry>(&list_sql())
            .fetch_all(&self.pool)
            .await?)
    }
}
