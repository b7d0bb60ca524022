use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::analysis::MoodAnalysis;

/// A persisted journal entry. This is also the shape returned to clients;
/// any other column a backend returns is dropped on deserialization.
///
/// `id` is whatever the store assigned (UUID, bigint, prefixed key) and is
/// always written out as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    #[serde(deserialize_with = "deserialize_opaque_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_store_timestamp")]
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub mood_label: String,
    pub sentiment_score: f64,
    pub supportive_tip: String,
}

/// Insert payload. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEntry {
    pub content: String,
    pub mood_label: String,
    pub sentiment_score: f64,
    pub supportive_tip: String,
}

impl NewEntry {
    pub fn from_analysis(content: String, analysis: MoodAnalysis) -> Self {
        Self {
            content,
            mood_label: analysis.mood,
            sentiment_score: analysis.score,
            supportive_tip: analysis.tip,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

fn deserialize_opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Signed(id) => id.to_string(),
        RawId::Unsigned(id) => id.to_string(),
    })
}

/// Parses an RFC 3339 timestamp, or a naive ISO 8601 one (`timestamp`
/// columns) taken as UTC.
pub fn parse_store_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn deserialize_store_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_store_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}
