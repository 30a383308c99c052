//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/` - Trip planner form
//! - `/api/plan` - Generate an itinerary (JSON, or SSE under `/api/plan/stream`)
//! - `/api/history/{session_id}` - Session chat history
//! - `/api/health` - Health checks

pub mod health;
pub mod history;
pub mod plan;
pub mod ui;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::cors::cors_layer;
use crate::models::{AppState, ErrorResponse};
use crate::types::AppError;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let cors = cors_layer(&state.config.server);

    Router::new()
        .merge(plan::router(state.clone()))
        .merge(history::router(state))
        .merge(health::router())
        .merge(ui::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::LLMApi(_) | AppError::Search(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, Response};

    use crate::config::Config;
    use crate::models::AppState;
    use crate::pipeline::TravelPipeline;

    pub fn state(pipeline: TravelPipeline) -> AppState {
        let config = Config::from_lookup(|_| None).unwrap();
        AppState::new(config, pipeline)
    }

    pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}
