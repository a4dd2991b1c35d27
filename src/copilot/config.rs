use std::time::Duration;

/// Configuration for a co-pilot session
#[derive(Debug, Clone)]
pub struct CopilotConfig {
    /// Unique session identifier (e.g., "copilot-6f1c...")
    pub session_id: String,

    /// Time between countdown ticks
    /// Default: 1 second
    pub tick_interval: Duration,

    /// Delay between cancelling the previous utterance and narrating a new step
    /// Default: 100ms, long enough for the previous utterance's tail to stop
    pub narration_delay: Duration,

    /// Read each step aloud when it becomes active
    pub narration_enabled: bool,

    /// Start listening for voice commands as soon as the session starts
    pub auto_listen: bool,
}

impl Default for CopilotConfig {
    fn default() -> Self {
        Self {
            session_id: format!("copilot-{}", uuid::Uuid::new_v4()),
            tick_interval: Duration::from_secs(1),
            narration_delay: Duration::from_millis(100),
            narration_enabled: true,
            auto_listen: false,
        }
    }
}
