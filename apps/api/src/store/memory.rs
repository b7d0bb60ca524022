use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::entry::{JournalEntry, NewEntry};
use crate::store::{EntryStore, StoreError};

/// In-process store for tests. Can be switched into a failing mode.
#[derive(Default)]
pub struct InMemoryEntryStore {
    rows: Mutex<Vec<JournalEntry>>,
    failing: AtomicBool,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let store = Self::default();
        store.failing.store(true, Ordering::SeqCst);
        store
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 503,
                message: "connection refused (os error 111) at db.internal:5432".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn create_entry(&self, entry: NewEntry) -> Result<JournalEntry, StoreError> {
        self.check_available()?;
        let row = JournalEntry {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            content: entry.content,
            mood_label: entry.mood_label,
            sentiment_score: entry.sentiment_score,
            supportive_tip: entry.supportive_tip,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_entries(&self) -> Result<Vec<JournalEntry>, StoreError> {
        self.check_available()?;
        // Reverse first so rows sharing a timestamp keep newest-inserted first.
        let mut rows: Vec<JournalEntry> = self.rows.lock().unwrap().iter().rev().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_entry(content: &str) -> NewEntry {
        NewEntry {
            content: content.to_string(),
            mood_label: "Calm".to_string(),
            sentiment_score: 0.6,
            supportive_tip: "Breathe.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamp() {
        let store = InMemoryEntryStore::new();
        let a = store.create_entry(new_entry("a")).await.unwrap();
        let b = store.create_entry(new_entry("b")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert!(b.created_at >= a.created_at);
        assert_eq!(store.row_count(), 2);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = InMemoryEntryStore::new();
        for content in ["first", "second", "third"] {
            store.create_entry(new_entry(content)).await.unwrap();
        }
        let contents: Vec<String> = store
            .list_entries()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.content)
            .collect();
        assert_eq!(contents, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_failing_store_errors() {
        let store = InMemoryEntryStore::failing();
        assert!(store.create_entry(new_entry("a")).await.is_err());
        assert!(store.list_entries().await.is_err());
        assert_eq!(store.row_count(), 0);
    }
}
