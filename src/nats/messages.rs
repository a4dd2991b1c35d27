use serde::{Deserialize, Serialize};

/// What the TTS service should do with a session's narration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrationAction {
    Speak,
    Pause,
    Resume,
    Stop,
}

/// Narration request published to the TTS service
#[derive(Debug, Serialize, Deserialize)]
pub struct NarrationRequest {
    pub session_id: String,
    pub utterance_id: String,
    pub action: NarrationAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub timestamp: String, // RFC3339 timestamp
}

/// Utterance lifecycle event received from the TTS service
#[derive(Debug, Serialize, Deserialize)]
pub struct NarrationEventMessage {
    pub session_id: String,
    pub utterance_id: String,
    /// One of: started, paused, resumed, finished, error
    pub event: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Whether the STT service should listen for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionAction {
    Start,
    Stop,
}

/// Recognition control published to the STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct RecognitionControl {
    pub session_id: String,
    pub action: RecognitionAction,
    pub timestamp: String,
}

/// Transcript message received from STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub session_id: String,
    pub text: String,
    pub partial: bool,
    pub timestamp: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}
