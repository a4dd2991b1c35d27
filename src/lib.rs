pub mod config;
pub mod copilot;
pub mod http;
pub mod nats;
pub mod recipe;
pub mod speech;

pub use config::Config;
pub use copilot::{
    Command, CopilotConfig, CopilotSession, NarrationState, SessionEvent, SessionStatus,
    TimerPhase,
};
pub use http::{create_router, AppState};
pub use nats::NatsClient;
pub use recipe::{detect_duration, extract_steps, format_clock, Nutrition, Recipe};
pub use speech::{
    RecognitionEvent, SpeechBackendFactory, SpeechCapabilities, SpeechRecognizer,
    SpeechSynthesizer, UtteranceEvent,
};
