//! Scripted fakes for the model and search collaborators, shared by unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::agents::{AgentSpec, PlannerAgent, ResearchAgent};
use crate::llm::{LLMAdapter, LLM};
use crate::pipeline::TravelPipeline;
use crate::search::{SearchError, SearchHit, WebSearch};
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse, StopReason, TokenUsage, ToolCall};

pub const TEST_MODEL: &str = "claude-3-7-sonnet-latest";

/// Replays queued replies in order and records every request it receives
#[derive(Default)]
pub struct ScriptedLLM {
    replies: Mutex<VecDeque<Result<LLMResponse, String>>>,
    requests: Mutex<Vec<LLMRequest>>,
}

impl ScriptedLLM {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_text(&self, text: &str) -> &Self {
        self.push(Ok(text_reply(text)))
    }

    pub fn push_search(&self, id: &str, query: &str) -> &Self {
        self.push(Ok(search_reply(id, query)))
    }

    pub fn push_error(&self, message: &str) -> &Self {
        self.push(Err(message.to_string()))
    }

    pub fn push(&self, reply: Result<LLMResponse, String>) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<LLMRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn llm(self: &Arc<Self>) -> LLM {
        LLM::from_adapter("scripted", self.clone())
    }
}

#[async_trait]
impl LLMAdapter for ScriptedLLM {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(AppError::LLMApi(message)),
            None => Err(AppError::LLMApi("no scripted reply left".to_string())),
        }
    }
}

pub fn text_reply(text: &str) -> LLMResponse {
    LLMResponse {
        content: Some(text.to_string()),
        tool_calls: vec![],
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage::default(),
    }
}

pub fn search_reply(id: &str, query: &str) -> LLMResponse {
    LLMResponse {
        content: None,
        tool_calls: vec![ToolCall {
            id: id.to_string(),
            name: crate::search::tool::TOOL_NAME.to_string(),
            input: serde_json::json!({ "query": query }),
        }],
        stop_reason: StopReason::ToolUse,
        usage: TokenUsage::default(),
    }
}

/// Fake web search returning canned hits, or failing on every call
#[derive(Default)]
pub struct FakeSearch {
    failure: Option<String>,
    queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            failure: Some(message.to_string()),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearch for FakeSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        if let Some(message) = &self.failure {
            return Err(SearchError::RequestFailed(message.clone()));
        }
        Ok(vec![SearchHit {
            title: format!("Guide: {}", query),
            url: "https://example.test/guide".to_string(),
            content: format!("Highlights for {}", query),
            score: 0.9,
        }])
    }
}

pub fn pipeline(llm: &Arc<ScriptedLLM>, search: Arc<FakeSearch>) -> TravelPipeline {
    let research = ResearchAgent::new(llm.llm(), search, AgentSpec::research(TEST_MODEL, 1024));
    let planner = PlannerAgent::new(llm.llm(), AgentSpec::planner(TEST_MODEL, 1024));
    TravelPipeline::new(research, planner)
}
