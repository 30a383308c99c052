use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::search::SearchDepth;
use crate::types::{AppError, AppResult, LLMProvider};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LLMConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub history_ttl_secs: u64,
}

#[derive(Clone, Deserialize)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub model: String,
    pub anthropic_api_key: String,
    pub anthropic_base_url: String,
    pub max_tokens: u32,
    pub max_tool_rounds: usize,
}

// API keys stay out of the logs
impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LLMConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("anthropic_base_url", &self.anthropic_base_url)
            .field("max_tokens", &self.max_tokens)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .finish()
    }
}

#[derive(Clone, Deserialize)]
pub struct SearchConfig {
    pub tavily_api_key: String,
    pub tavily_base_url: String,
    pub max_results: usize,
    pub search_depth: SearchDepth,
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("tavily_api_key", &redact(&self.tavily_api_key))
            .field("tavily_base_url", &self.tavily_base_url)
            .field("max_results", &self.max_results)
            .field("search_depth", &self.search_depth)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: Option<PathBuf>,
}

fn redact(key: &str) -> &'static str {
    if key.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-latest";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Ok(Self {
            server: ServerConfig {
                port: parse_value("PORT", &var("PORT", "3000"))?,
                host: var("HOST", "0.0.0.0"),
                cors_allowed_origins: var("ALLOWED_ORIGINS", "http://localhost:3000")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                history_ttl_secs: parse_value("HISTORY_TTL_SECS", &var("HISTORY_TTL_SECS", "86400"))?,
            },
            llm: LLMConfig {
                provider: LLMProvider::parse(&var("LLM_PROVIDER", "anthropic"))?,
                model: var("LLM_MODEL", DEFAULT_MODEL),
                anthropic_api_key: var("ANTHROPIC_API_KEY", ""),
                anthropic_base_url: var("ANTHROPIC_BASE_URL", DEFAULT_ANTHROPIC_BASE_URL),
                max_tokens: parse_value("LLM_MAX_TOKENS", &var("LLM_MAX_TOKENS", "4096"))?,
                max_tool_rounds: parse_value("RESEARCH_MAX_TOOL_ROUNDS", &var("RESEARCH_MAX_TOOL_ROUNDS", "8"))?,
            },
            search: SearchConfig {
                tavily_api_key: var("TAVILY_API_KEY", ""),
                tavily_base_url: var("TAVILY_BASE_URL", DEFAULT_TAVILY_BASE_URL),
                max_results: parse_value("SEARCH_MAX_RESULTS", &var("SEARCH_MAX_RESULTS", "3"))?,
                search_depth: parse_value("SEARCH_DEPTH", &var("SEARCH_DEPTH", "advanced"))?,
            },
            logging: LoggingConfig {
                log_dir: lookup("LOG_DIR").filter(|s| !s.trim().is_empty()).map(PathBuf::from),
            },
        })
    }

    /// Fail fast when the hosted services cannot be reached with these credentials
    pub fn require_credentials(&self) -> AppResult<()> {
        if self.llm.anthropic_api_key.trim().is_empty() {
            return Err(AppError::Config("ANTHROPIC_API_KEY must be set".to_string()));
        }
        if self.search.tavily_api_key.trim().is_empty() {
            return Err(AppError::Config("TAVILY_API_KEY must be set".to_string()));
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> AppResult<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{} has invalid value {:?}: {}", name, raw, e)))
}
