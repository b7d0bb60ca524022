use tracing::info;

use crate::analysis::MoodAnalyzer;
use crate::models::entry::{JournalEntry, NewEntry};
use crate::store::{EntryStore, StoreError};

/// Analyzes `content` and stores it with the analysis.
/// Analysis cannot fail; only the insert can.
pub async fn record_entry(
    analyzer: &dyn MoodAnalyzer,
    store: &dyn EntryStore,
    content: String,
) -> Result<JournalEntry, StoreError> {
    let analysis = analyzer.analyze(&content).await;
    let entry = store
        .create_entry(NewEntry::from_analysis(content, analysis))
        .await?;

    info!(
        "Saved journal entry {} (mood: {}, score: {})",
        entry.id, entry.mood_label, entry.sentiment_score
    );
    Ok(entry)
}

/// All entries, newest first.
pub async fn fetch_history(store: &dyn EntryStore) -> Result<Vec<JournalEntry>, StoreError> {
    store.list_entries().await
}
