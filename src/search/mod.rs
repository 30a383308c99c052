//! Search Module
//!
//! Web search used by the research stage to gather destination facts:
//! activities, sights, food and lodging.
//!
//! Uses the Tavily search API as the backend. The research agent reaches it
//! through the `tavily_search` tool (see [`tool`]).

pub mod tavily;
pub mod tool;

pub use tavily::{SearchDepth, SearchError, SearchHit, TavilyClient};

use async_trait::async_trait;

/// A web search capability the research stage can call
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}
