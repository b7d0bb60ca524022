use anyhow::{Context, Result};

/// Where journal entries are persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageConfig {
    /// Supabase PostgREST endpoint (`SUPABASE_URL` + `SUPABASE_KEY`).
    Supabase { url: String, key: String },
    /// Direct PostgreSQL connection (`DATABASE_URL`), e.g. the Supabase pooler.
    Postgres { database_url: String },
}

/// Application configuration loaded from environment variables.
/// Startup aborts if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub storage: StorageConfig,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let storage = match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(database_url) => StorageConfig::Postgres { database_url },
            None => StorageConfig::Supabase {
                url: require("SUPABASE_URL")?.trim_end_matches('/').to_string(),
                key: require("SUPABASE_KEY")?,
            },
        };

        Ok(Config {
            gemini_api_key: require("GEMINI_API_KEY")?,
            storage,
            port: lookup("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
