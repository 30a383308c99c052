use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::config::Config;
use crate::history::{ChatEntry, HistoryStore};
use crate::pipeline::{Stage, TravelPipeline};
use crate::trip::TripRequest;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pipeline: Arc<TravelPipeline>,
    pub history: HistoryStore,
}

impl AppState {
    pub fn new(config: Config, pipeline: TravelPipeline) -> Self {
        let history = HistoryStore::with_ttl(Duration::from_secs(config.server.history_ttl_secs));
        Self {
            config,
            pipeline: Arc::new(pipeline),
            history,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(flatten)]
    pub trip: TripRequest,
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub session_id: Uuid,
    pub itinerary: String,
    pub research: Option<String>,
    pub travel_days: i64,
}

/// Progress update sent while a plan is being generated
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    pub message: String,
}

impl ProgressEvent {
    pub fn started() -> Self {
        Self {
            stage: None,
            message: "Starting your travel plan...".to_string(),
        }
    }

    pub fn completed(stage: Stage) -> Self {
        let message = match stage {
            Stage::Research => "Destination research done, writing the itinerary...",
            Stage::Planning => "Your itinerary is ready!",
        };
        Self {
            stage: Some(stage),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResult {
    pub session_id: Uuid,
    pub itinerary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub entries: Vec<ChatEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}
