//! Travel Pipeline
//!
//! A fixed two-stage path over a shared message state:
//!
//! ```text
//! START → Research → Planning → END
//! ```
//!
//! Each stage reads the state, returns a [`Command`] naming where to go next
//! plus the one message it produced, and the controller appends that message
//! before moving on. Callers observe progress through [`StageEvent`]s.

pub mod controller;
pub mod state;

pub use controller::{Command, Next, Stage, StageEvent, TravelPipeline};
pub use state::{Message, PipelineState, Role};
