pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::journal::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/add-entry", post(handlers::handle_add_entry))
        .route("/history", get(handlers::handle_history))
        .with_state(state)
}
