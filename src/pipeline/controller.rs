use futures::{Stream, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use super::state::{Message, PipelineState, Role};
use crate::agents::{AgentSpec, PlannerAgent, ResearchAgent};
use crate::config::Config;
use crate::llm::{LLMProviderConfig, LLM};
use crate::search::TavilyClient;
use crate::types::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Research,
    Planning,
}

impl Stage {
    pub const START: Stage = Stage::Research;

    /// Name attached to the message this stage appends
    pub fn author(&self) -> &'static str {
        match self {
            Stage::Research => "research_agent_node",
            Stage::Planning => "planner_agent_node",
        }
    }

    /// The only transition each stage is allowed to take
    pub fn successor(&self) -> Next {
        match self {
            Stage::Research => Next::Stage(Stage::Planning),
            Stage::Planning => Next::End,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Research => write!(f, "research"),
            Stage::Planning => write!(f, "planning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Stage(Stage),
    End,
}

/// What a stage hands back: where to go and the message to append
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub goto: Next,
    pub update: Message,
}

/// Emitted once per completed stage with the state snapshot after it
#[derive(Debug, Clone)]
pub struct StageEvent {
    pub stage: Stage,
    pub state: PipelineState,
}

impl StageEvent {
    /// The message the stage just appended
    pub fn message(&self) -> Option<&Message> {
        self.state.last()
    }
}

enum Cursor {
    Run(Stage, PipelineState),
    Reject(AppError),
}

pub struct TravelPipeline {
    research: ResearchAgent,
    planner: PlannerAgent,
}

impl TravelPipeline {
    pub fn new(research: ResearchAgent, planner: PlannerAgent) -> Self {
        Self { research, planner }
    }

    /// Wire the hosted model and search services from configuration
    pub fn from_config(config: &Config) -> AppResult<Self> {
        config.require_credentials()?;

        let llm = LLM::new(LLMProviderConfig::from_config(&config.llm)?);
        let search = Arc::new(TavilyClient::from_config(&config.search)?);

        let research = ResearchAgent::new(
            llm.clone(),
            search,
            AgentSpec::research(config.llm.model.clone(), config.llm.max_tokens),
        )
        .with_max_tool_rounds(config.llm.max_tool_rounds);
        let planner = PlannerAgent::new(llm, AgentSpec::planner(config.llm.model.clone(), config.llm.max_tokens));

        info!(
            provider = %config.llm.provider,
            model = %config.llm.model,
            search_depth = %config.search.search_depth,
            max_results = config.search.max_results,
            "Travel pipeline ready"
        );
        Ok(Self::new(research, planner))
    }

    async fn run_stage(&self, stage: Stage, state: &PipelineState) -> AppResult<Command> {
        match stage {
            Stage::Research => self.research.run(state).await,
            Stage::Planning => self.planner.run(state).await,
        }
    }

    async fn step(&self, stage: Stage, state: PipelineState) -> AppResult<(StageEvent, Option<Stage>)> {
        let command = self.run_stage(stage, &state).await?;
        apply(stage, command, state)
    }

    /// Run the pipeline, yielding one event per completed stage.
    ///
    /// The initial state must hold exactly one user message. The stream ends
    /// after the planning stage, or right after the first error.
    pub fn stream(&self, initial: PipelineState) -> impl Stream<Item = AppResult<StageEvent>> + Send + '_ {
        let start = match validate_seed(&initial) {
            Ok(()) => Cursor::Run(Stage::START, initial),
            Err(e) => Cursor::Reject(e),
        };

        futures::stream::unfold(Some(start), move |cursor| async move {
            match cursor? {
                Cursor::Reject(e) => Some((Err(e), None)),
                Cursor::Run(stage, state) => {
                    info!(stage = %stage, "Stage started");
                    match self.step(stage, state).await {
                        Ok((event, next)) => {
                            info!(stage = %stage, messages = event.state.len(), "Stage completed");
                            let cursor = next.map(|next| Cursor::Run(next, event.state.clone()));
                            Some((Ok(event), cursor))
                        }
                        Err(e) => {
                            error!(stage = %stage, error = %e, "Stage failed");
                            Some((Err(e), None))
                        }
                    }
                }
            }
        })
    }

    /// Run to completion and return the final state
    pub async fn invoke(&self, initial: PipelineState) -> AppResult<PipelineState> {
        let mut events = Box::pin(self.stream(initial));
        let mut last = None;
        while let Some(event) = events.next().await {
            last = Some(event?.state);
        }
        last.ok_or_else(|| AppError::Internal("pipeline finished without running a stage".to_string()))
    }
}


/// Append a stage's update, refusing any transition but the stage's successor
fn apply(stage: Stage, command: Command, mut state: PipelineState) -> AppResult<(StageEvent, Option<Stage>)> {
    if command.goto != stage.successor() {
        return Err(AppError::Internal(format!(
            "{} stage routed to {:?}, expected {:?}",
            stage,
            command.goto,
            stage.successor()
        )));
    }

    state.push(command.update);
    let next = match command.goto {
        Next::Stage(next) => Some(next),
        Next::End => None,
    };
    Ok((StageEvent { stage, state }, next))
}

fn validate_seed(state: &PipelineState) -> AppResult<()> {
    match state.messages() {
        [seed] if seed.role == Role::User && !seed.content.trim().is_empty() => Ok(()),
        _ => Err(AppError::InvalidRequest(
            "a pipeline run starts from exactly one non-empty user message".to_string(),
        )),
    }
}
