use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Liveness check; touches no dependency.
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "status": "Mind Journal API is Online" }))
}
