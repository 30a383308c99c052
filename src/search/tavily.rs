//! Tavily Client
//!
//! Thin client for the Tavily `/search` endpoint. Every query is bounded to a
//! fixed number of results and a search depth chosen at startup:
//!
//! - **basic**: faster, shallower crawl
//! - **advanced**: slower, pulls more relevant snippets per result (default)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

use super::WebSearch;

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Tavily API key not configured")]
    NoApiKey,

    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse search results: {0}")]
    ParseError(String),

    #[error("Unknown search depth: {0}")]
    InvalidDepth(String),
}

/// How thoroughly Tavily crawls each result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    #[default]
    Advanced,
}

impl SearchDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for SearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchDepth {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(SearchDepth::Basic),
            "advanced" => Ok(SearchDepth::Advanced),
            other => Err(SearchError::InvalidDepth(other.to_string())),
        }
    }
}

/// One search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Page title
    pub title: String,
    /// Page URL
    pub url: String,
    /// Extracted snippet relevant to the query
    pub content: String,
    /// Tavily relevance score (0.0 - 1.0)
    #[serde(default)]
    pub score: f64,
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: SearchDepth,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    score: Option<f64>,
}

pub const DEFAULT_MAX_RESULTS: usize = 3;

/// Tavily client for travel research
pub struct TavilyClient {
    http: Client,
    api_key: String,
    base_url: String,
    max_results: usize,
    search_depth: SearchDepth,
}

impl TavilyClient {
    /// Create a new Tavily client with the default bounds (3 results, advanced)
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: crate::config::DEFAULT_TAVILY_BASE_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            search_depth: SearchDepth::Advanced,
        }
    }

    /// Configure client from config
    pub fn from_config(config: &crate::config::SearchConfig) -> Result<Self, SearchError> {
        if config.tavily_api_key.trim().is_empty() {
            return Err(SearchError::NoApiKey);
        }

        Ok(Self::new(config.tavily_api_key.clone())
            .with_base_url(config.tavily_base_url.clone())
            .with_max_results(config.max_results)
            .with_search_depth(config.search_depth))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set maximum results per search
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max.max(1);
        self
    }

    pub fn with_search_depth(mut self, depth: SearchDepth) -> Self {
        self.search_depth = depth;
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn search_depth(&self) -> SearchDepth {
        self.search_depth
    }
}

#[async_trait]
impl WebSearch for TavilyClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        info!(query = %query, depth = %self.search_depth, "Searching the web via Tavily");

        let body = TavilyRequest {
            api_key: &self.api_key,
            query,
            max_results: self.max_results,
            search_depth: self.search_depth,
        };

        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SearchError::RequestFailed(format!("Tavily API error ({}): {}", status, error_text)));
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        debug!(raw_count = parsed.results.len(), "Raw Tavily response received");

        let hits: Vec<SearchHit> = parsed
            .results
            .into_iter()
            .take(self.max_results)
            .map(|r| SearchHit {
                title: r.title.unwrap_or_else(|| "Untitled".to_string()),
                url: r.url.unwrap_or_default(),
                content: r.content.unwrap_or_default(),
                score: r.score.unwrap_or(0.0),
            })
            .collect();

        info!(count = hits.len(), "Tavily search completed");
        Ok(hits)
    }
}
