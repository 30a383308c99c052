use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LLMConfig;
use crate::types::{AppError, AppResult, LLMProvider, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Configuration for an LLM provider
pub struct LLMProviderConfig {
    pub provider: LLMProvider,
    pub api_key: String,
    pub base_url: String,
}

impl LLMProviderConfig {
    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        if config.anthropic_api_key.trim().is_empty() {
            return Err(AppError::Config("ANTHROPIC_API_KEY must be set".to_string()));
        }

        Ok(Self {
            provider: config.provider,
            api_key: config.anthropic_api_key.clone(),
            base_url: config.anthropic_base_url.clone(),
        })
    }
}

/// Shared handle to the configured model provider
#[derive(Clone)]
pub struct LLM {
    adapter: Arc<dyn LLMAdapter>,
    provider_name: String,
}

impl LLM {
    pub fn new(provider: LLMProviderConfig) -> Self {
        let adapter: Arc<dyn LLMAdapter> = match provider.provider {
            LLMProvider::Anthropic => Arc::new(
                crate::llm::anthropic::AnthropicAdapter::new(&provider.api_key).with_base_url(&provider.base_url),
            ),
        };

        Self {
            adapter,
            provider_name: provider.provider.to_string(),
        }
    }

    /// Wrap an existing adapter
    pub fn from_adapter(name: impl Into<String>, adapter: Arc<dyn LLMAdapter>) -> Self {
        Self {
            adapter,
            provider_name: name.into(),
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }
}
