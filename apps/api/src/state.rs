use std::sync::Arc;

use crate::analysis::MoodAnalyzer;
use crate::store::EntryStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Both handles are built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    /// Mood analyzer. Default: GeminiMoodAnalyzer.
    pub analyzer: Arc<dyn MoodAnalyzer>,
    /// Entry store. Supabase REST unless DATABASE_URL selects PostgreSQL.
    pub store: Arc<dyn EntryStore>,
}
