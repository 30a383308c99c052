use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::models::{AppState, HistoryResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/history/{session_id}", get(get_history).delete(clear_history))
        .with_state(state)
}

async fn get_history(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> Json<HistoryResponse> {
    let entries = state.history.entries(session_id).await;
    Json(HistoryResponse { session_id, entries })
}

/// Start a new trip plan: drop everything shown for this session
async fn clear_history(State(state): State<AppState>, Path(session_id): Path<Uuid>) -> StatusCode {
    let existed = state.history.clear(session_id).await;
    info!(session_id = %session_id, existed, "Cleared session history");
    StatusCode::NO_CONTENT
}
