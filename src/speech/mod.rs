//! Speech capabilities for narration and voice commands
//!
//! The co-pilot never talks to a speech engine directly; it receives
//! optional `SpeechSynthesizer` / `SpeechRecognizer` implementations
//! detected once when a session starts.

pub mod backend;
pub mod nats;

pub use backend::{
    RecognitionEvent, SpeechBackendFactory, SpeechCapabilities, SpeechRecognizer,
    SpeechSynthesizer, UtteranceEvent,
};
pub use nats::{NatsRecognizer, NatsSynthesizer};
