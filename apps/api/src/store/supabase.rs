use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::models::entry::{JournalEntry, NewEntry};
use crate::store::{EntryStore, StoreError, ENTRIES_TABLE};

const ENTRY_COLUMNS: &str = "id,created_at,content,mood_label,sentiment_score,supportive_tip";

#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
}

/// `entries` table accessed through the Supabase PostgREST API.
pub struct SupabaseEntryStore {
    client: Client,
    table_url: String,
}

impl SupabaseEntryStore {
    pub fn new(url: &str, key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(key).context("SUPABASE_KEY is not a valid header value")?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {key}"))
                .context("SUPABASE_KEY is not a valid header value")?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build Supabase HTTP client")?;

        Ok(Self {
            client,
            table_url: table_url(url),
        })
    }
}

fn table_url(base_url: &str) -> String {
    format!(
        "{}/rest/v1/{}",
        base_url.trim_end_matches('/'),
        ENTRIES_TABLE
    )
}

fn list_query() -> [(&'static str, &'static str); 2] {
    [("select", ENTRY_COLUMNS), ("order", "created_at.desc")]
}

/// Turns a non-2xx PostgREST reply into `StoreError::Api`.
async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<PostgrestError>(&body)
        .map(|e| e.message)
        .unwrap_or(body);
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl EntryStore for SupabaseEntryStore {
    async fn create_entry(&self, entry: NewEntry) -> Result<JournalEntry, StoreError> {
        let response = self
            .client
            .post(&self.table_url)
            .query(&[("select", ENTRY_COLUMNS)])
            .header("Prefer", "return=representation")
            .json(&[&entry])
            .send()
            .await?;

        let rows: Vec<JournalEntry> = check_status(response).await?.json().await?;
        debug!("Supabase insert returned {} row(s)", rows.len());

        rows.into_iter().next().ok_or(StoreError::NoRowReturned)
    }

    async fn list_entries(&self) -> Result<Vec<JournalEntry>, StoreError> {
        let response = self
            .client
            .get(&self.table_url)
            .query(&list_query())
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }
}
