//! Guided cooking ("co-pilot") sessions
//!
//! This module provides the `CopilotSession` abstraction that manages:
//! - Step navigation over a recipe's instructions
//! - A countdown for steps that mention a duration
//! - Narration of the active step
//! - Voice/text command interpretation

mod command;
mod config;
mod sequencer;
mod session;
mod status;
mod timer;

pub use command::Command;
pub use config::CopilotConfig;
pub use sequencer::Sequencer;
pub use session::CopilotSession;
pub use status::{NarrationState, SessionEvent, SessionStatus};
pub use timer::{StepTimer, TickOutcome, TimerPhase};
