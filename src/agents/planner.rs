//! Planner Agent
//!
//! Writes the final day-by-day itinerary from the trip request and the
//! research summary. One model call, no tools; routes the pipeline to its end.

use crate::agents::AgentSpec;
use crate::llm::LLM;
use crate::pipeline::{Command, Message, Next, PipelineState};
use crate::types::AppResult;
use tracing::info;

pub struct PlannerAgent {
    llm: LLM,
    spec: AgentSpec,
}

impl PlannerAgent {
    pub fn new(llm: LLM, spec: AgentSpec) -> Self {
        Self { llm, spec }
    }

    pub async fn run(&self, state: &PipelineState) -> AppResult<Command> {
        info!(agent = self.spec.role_name, messages = state.len(), "Drafting itinerary");

        let response = self
            .llm
            .create_chat_completion(&self.spec.request(state.to_llm_messages()))
            .await?;
        let itinerary = super::final_text(self.spec.role_name, response)?;

        info!(itinerary_len = itinerary.len(), "Itinerary drafted");
        Ok(Command {
            goto: Next::End,
            update: Message::user(itinerary).with_name(self.spec.role_name),
        })
    }
}
