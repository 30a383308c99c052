//! Agent System
//!
//! The two agents that turn a trip request into an itinerary:
//!
//! - **Research Agent**: searches the web for the destination and summarises
//!   the ten most relevant findings
//! - **Planner Agent**: writes the day-by-day itinerary from that research
//!
//! ## Pipeline Overview
//!
//! ```text
//! Trip request (seed user message)
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Research   │  → tavily_search tool calls, appends research_agent_node
//! │   Agent     │
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Planner    │  → no tools, appends planner_agent_node
//! │   Agent     │
//! └─────────────┘
//!      │
//!      ▼
//!   Itinerary
//! ```
//!
//! The wiring between them lives in [`crate::pipeline`].

pub mod prompts;
pub mod research;
pub mod planner;

pub use planner::PlannerAgent;
pub use research::ResearchAgent;

use std::collections::BTreeSet;

use crate::types::{AppError, AppResult, LLMMessage, LLMRequest, LLMResponse, ToolDefinition};

/// A capability an agent may hand to the model as a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ToolCapability {
    WebSearch,
}

impl ToolCapability {
    pub fn definition(&self) -> ToolDefinition {
        match self {
            ToolCapability::WebSearch => crate::search::tool::definition(),
        }
    }
}

/// Immutable configuration for one agent
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSpec {
    pub role_name: &'static str,
    pub system_prompt: String,
    pub tools: BTreeSet<ToolCapability>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl AgentSpec {
    pub fn research(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            role_name: crate::pipeline::Stage::Research.author(),
            system_prompt: prompts::RESEARCH_SYSTEM_PROMPT.to_string(),
            tools: BTreeSet::from([ToolCapability::WebSearch]),
            model: model.into(),
            max_tokens,
            temperature: None,
        }
    }

    pub fn planner(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            role_name: crate::pipeline::Stage::Planning.author(),
            system_prompt: prompts::PLANNER_SYSTEM_PROMPT.to_string(),
            tools: BTreeSet::new(),
            model: model.into(),
            max_tokens,
            temperature: None,
        }
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn request(&self, messages: Vec<LLMMessage>) -> LLMRequest {
        LLMRequest {
            model: self.model.clone(),
            messages,
            tools: self.tool_definitions(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system_instruction: Some(self.system_prompt.clone()),
        }
    }
}

/// The text of a final reply, or an error naming the agent if it is blank
pub(crate) fn final_text(role_name: &str, response: LLMResponse) -> AppResult<String> {
    match response.content.map(|c| c.trim().to_string()) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(AppError::LLMApi(format!("{} received an empty reply from the model", role_name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_research_spec_has_search_tool() {
        let spec = AgentSpec::research("claude-3-7-sonnet-latest", 4096);
        assert_eq!(spec.role_name, "research_agent_node");
        let tools = spec.tool_definitions();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "tavily_search");
        assert!(spec.request(vec![]).temperature.is_none());
    }

    #[test]
    fn test_planner_spec_has_no_tools() {
        let spec = AgentSpec::planner("claude-3-7-sonnet-latest", 4096);
        assert_eq!(spec.role_name, "planner_agent_node");
        let request = spec.request(vec![LLMMessage::user("trip")]);
        assert!(request.tools.is_empty());
        assert!(request.temperature.is_none());
        assert_eq!(request.system_instruction.as_deref(), Some(prompts::PLANNER_SYSTEM_PROMPT));
    }
}
