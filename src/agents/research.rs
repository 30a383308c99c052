//! Research Agent
//!
//! Searches the web for the destination and condenses what it finds into a
//! short list of facts for the planner. The model decides the queries; this
//! agent runs the tool loop, executing each `tavily_search` call it asks for
//! until the model produces its final summary.
//!
//! Search failures are not swallowed: they end the run and reach the caller.

use std::sync::Arc;

use crate::agents::AgentSpec;
use crate::llm::anthropic::assistant_turn;
use crate::llm::LLM;
use crate::pipeline::{Command, Message, Next, PipelineState, Stage};
use crate::search::{tool, WebSearch};
use crate::types::{AppError, AppResult, ContentBlock, LLMMessage, StopReason, ToolCall};
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

pub struct ResearchAgent {
    llm: LLM,
    search: Arc<dyn WebSearch>,
    spec: AgentSpec,
    max_tool_rounds: usize,
}

impl ResearchAgent {
    pub fn new(llm: LLM, search: Arc<dyn WebSearch>, spec: AgentSpec) -> Self {
        Self {
            llm,
            search,
            spec,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    /// Bound the number of model turns that may request searches
    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    /// Research the trip in `state` and route to the planner
    pub async fn run(&self, state: &PipelineState) -> AppResult<Command> {
        info!(agent = self.spec.role_name, messages = state.len(), "Starting travel research");

        let summary = self.research(state).await?;

        info!(summary_len = summary.len(), "Travel research complete");
        Ok(Command {
            goto: Next::Stage(Stage::Planning),
            update: Message::user(summary).with_name(self.spec.role_name),
        })
    }

    async fn research(&self, state: &PipelineState) -> AppResult<String> {
        let mut messages = state.to_llm_messages();

        for round in 0..=self.max_tool_rounds {
            let response = self.llm.create_chat_completion(&self.spec.request(messages.clone())).await?;

            if response.stop_reason != StopReason::ToolUse || response.tool_calls.is_empty() {
                return super::final_text(self.spec.role_name, response);
            }

            if round == self.max_tool_rounds {
                break;
            }

            debug!(round, calls = response.tool_calls.len(), "Model requested tool calls");
            messages.push(assistant_turn(&response));

            let mut results = Vec::with_capacity(response.tool_calls.len());
            for call in &response.tool_calls {
                results.push(self.execute_tool(call).await?);
            }
            messages.push(LLMMessage::user_blocks(results));
        }

        Err(AppError::LLMApi(format!(
            "{} still requesting searches after {} tool rounds",
            self.spec.role_name, self.max_tool_rounds
        )))
    }

    /// Run one tool call. Bad input becomes an error result the model can see;
    /// a failing search aborts the stage.
    async fn execute_tool(&self, call: &ToolCall) -> AppResult<ContentBlock> {
        if call.name != tool::TOOL_NAME {
            warn!(tool = %call.name, "Model called an unknown tool");
            return Ok(ContentBlock::tool_result(&call.id, format!("Unknown tool: {}", call.name), true));
        }

        let input = match tool::parse_input(&call.input) {
            Ok(input) => input,
            Err(message) => {
                warn!(error = %message, "Rejected tavily_search input");
                return Ok(ContentBlock::tool_result(&call.id, message, true));
            }
        };

        let hits = self.search.search(&input.query).await?;
        info!(query = %input.query, hits = hits.len(), "Search finished");
        Ok(ContentBlock::tool_result(&call.id, tool::render_hits(&input.query, &hits), false))
    }
}
