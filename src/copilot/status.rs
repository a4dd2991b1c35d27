use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::command::Command;
use super::timer::TimerPhase;

/// Narration (text-to-speech) sub-state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrationState {
    #[default]
    Idle,
    Speaking,
    Paused,
}

/// Snapshot of a co-pilot session for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: String,

    pub recipe_name: String,

    /// When the session was entered
    pub started_at: DateTime<Utc>,

    /// Zero-based index of the active step
    pub step_index: usize,

    pub step_count: usize,

    /// Text of the active step (absent when the recipe has no steps)
    pub step_text: Option<String>,

    /// Countdown in seconds (absent when the step has no timer)
    pub remaining_seconds: Option<u64>,

    /// Countdown formatted as mm:ss
    pub remaining_display: Option<String>,

    pub timer: TimerPhase,

    pub timer_running: bool,

    /// (step_index + 1) / step_count, 0.0 for an empty recipe
    pub progress: f64,

    pub is_first_step: bool,

    pub is_last_step: bool,

    pub narration: NarrationState,

    pub narration_supported: bool,

    pub listening: bool,

    pub listening_supported: bool,

    /// Set once the session has been exited
    pub exited: bool,
}

/// Notification emitted by a co-pilot session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    StepChanged {
        index: usize,
        step: String,
        remaining_seconds: Option<u64>,
    },
    TimerStarted {
        remaining_seconds: u64,
    },
    TimerPaused {
        remaining_seconds: u64,
    },
    TimerReset {
        remaining_seconds: Option<u64>,
    },
    TimerTick {
        remaining_seconds: u64,
    },
    /// The countdown of a step reached zero ("time's up")
    TimerExpired {
        step_index: usize,
    },
    NarrationChanged {
        state: NarrationState,
    },
    ListeningChanged {
        listening: bool,
    },
    CommandRecognized {
        command: Command,
    },
    Exited,
}
