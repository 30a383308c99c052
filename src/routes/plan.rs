use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::post,
    Json, Router,
};
use futures::channel::mpsc::{unbounded, UnboundedSender};
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::convert::Infallible;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{AppState, ErrorResponse, PlanRequest, PlanResponse, PlanResult, ProgressEvent};
use crate::pipeline::{PipelineState, Stage};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/plan", post(post_plan))
        .route("/api/plan/stream", post(post_plan_stream))
        .with_state(state)
}

/// Generate an itinerary and return it once both stages are done
pub async fn post_plan(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> AppResult<Json<PlanResponse>> {
    let initial = request.trip.to_state()?;
    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);
    let seed = request.trip.seed_message();

    info!(
        session_id = %session_id,
        destination = %request.trip.destination,
        travel_days = request.trip.travel_days(),
        "Received plan request"
    );

    let final_state = state.pipeline.invoke(initial).await?;
    let itinerary = final_itinerary(&final_state)?;
    let research = final_state
        .authored_by(Stage::Research.author())
        .map(|m| m.content.clone());

    state
        .history
        .record_exchange(session_id, seed, itinerary.clone())
        .await;

    Ok(Json(PlanResponse {
        session_id,
        itinerary,
        research,
        travel_days: request.trip.travel_days(),
    }))
}

/// Generate an itinerary, reporting each completed stage as a server-sent event.
///
/// Events: `progress` ({stage?, message}), then `result` ({session_id,
/// itinerary}) or `error` ({error}). Validation failures are returned as a
/// plain 400 before the stream opens.
pub async fn post_plan_stream(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let initial = request.trip.to_state()?;
    let session_id = request.session_id.unwrap_or_else(Uuid::new_v4);
    let seed = request.trip.seed_message();

    info!(session_id = %session_id, destination = %request.trip.destination, "Received streaming plan request");

    let (tx, rx) = unbounded::<Event>();
    tokio::spawn(drive_pipeline(state, session_id, seed, initial, tx));

    Ok(Sse::new(rx.map(Ok::<Event, Infallible>)).keep_alive(KeepAlive::default()))
}

async fn drive_pipeline(
    state: AppState,
    session_id: Uuid,
    seed: String,
    initial: PipelineState,
    tx: UnboundedSender<Event>,
) {
    send(&tx, "progress", &ProgressEvent::started());

    let mut itinerary = None;
    let mut events = Box::pin(state.pipeline.stream(initial));
    while let Some(event) = events.next().await {
        match event {
            Ok(event) => {
                send(&tx, "progress", &ProgressEvent::completed(event.stage));
                if event.stage == Stage::Planning {
                    itinerary = event.message().map(|m| m.content.clone());
                }
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Plan generation failed");
                send(&tx, "error", &ErrorResponse { error: e.user_message() });
                return;
            }
        }
    }

    match itinerary {
        Some(itinerary) => {
            state
                .history
                .record_exchange(session_id, seed, itinerary.clone())
                .await;
            send(&tx, "result", &PlanResult { session_id, itinerary });
        }
        None => {
            let e = AppError::Internal("pipeline ended without an itinerary".to_string());
            send(&tx, "error", &ErrorResponse { error: e.user_message() });
        }
    }
}

fn send<T: Serialize>(tx: &UnboundedSender<Event>, name: &str, payload: &T) {
    match Event::default().event(name).json_data(payload) {
        Ok(event) => {
            // the client may already be gone; the run still completes
            let _ = tx.unbounded_send(event);
        }
        Err(e) => warn!(error = %e, event = name, "Failed to encode SSE event"),
    }
}

fn final_itinerary(state: &PipelineState) -> AppResult<String> {
    state
        .authored_by(Stage::Planning.author())
        .map(|m| m.content.clone())
        .ok_or_else(|| AppError::Internal("pipeline ended without an itinerary".to_string()))
}
