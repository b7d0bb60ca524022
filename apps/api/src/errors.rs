use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Bodies are always `{"detail": ...}`; server-side causes are logged, never returned.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// A store failure. `detail` is the fixed message the client sees.
    #[error("{detail}: {source}")]
    Persistence {
        detail: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    pub fn persistence(detail: &'static str) -> impl FnOnce(StoreError) -> AppError {
        move |source| AppError::Persistence { detail, source }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Persistence { detail, source } => {
                tracing::error!("{detail} Store error: {source}");
                (StatusCode::INTERNAL_SERVER_ERROR, detail.to_string())
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
