// Trip Planner - two-stage research and planning agent pipeline for travel itineraries

pub mod config;
pub mod models;
pub mod types;
pub mod trip;
pub mod history;
pub mod agents;
pub mod llm;
pub mod search;    // Web search (Tavily) exposed to the research agent as a tool
pub mod pipeline;  // Research -> Planning controller
pub mod routes;
pub mod middleware;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;
pub use pipeline::TravelPipeline;
pub use trip::TripRequest;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
