use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::nats::{NatsRecognizer, NatsSynthesizer};
use crate::nats::NatsClient;

/// Lifecycle of a single spoken utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtteranceEvent {
    Started,
    Paused,
    Resumed,
    /// Utterance played to the end
    Finished,
    /// Synthesis failed or was interrupted
    Failed(String),
}

/// Output of a speech recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// A final (non-interim) recognized phrase
    Utterance(String),
    /// Recognition stopped on its own; listeners may restart it
    Ended,
    /// Recognition failed; listening should be turned off
    Failed(String),
}

/// Text-to-speech capability
///
/// Implementations:
/// - NATS: forwards requests to an out-of-process TTS service
/// - Tests: in-memory fakes
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Start speaking `text`
    ///
    /// Returns a channel receiver that will receive the events of this
    /// utterance; the channel closes once the utterance is over.
    async fn speak(&mut self, text: &str) -> Result<mpsc::Receiver<UtteranceEvent>>;

    /// Pause the current utterance
    async fn pause(&mut self) -> Result<()>;

    /// Resume a paused utterance
    async fn resume(&mut self) -> Result<()>;

    /// Cancel any in-flight utterance
    async fn stop(&mut self) -> Result<()>;

    /// Get synthesizer name for logging
    fn name(&self) -> &str;
}

/// Speech-to-text capability
///
/// Recognition is continuous: once started it keeps delivering utterances
/// until `stop` is called or it ends on its own.
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Start listening
    ///
    /// Returns a channel receiver that will receive recognition events
    async fn start(&mut self) -> Result<mpsc::Receiver<RecognitionEvent>>;

    /// Stop listening
    async fn stop(&mut self) -> Result<()>;

    /// Get recognizer name for logging
    fn name(&self) -> &str;
}

/// Speech capabilities available to a co-pilot session
///
/// Either side may be absent; the session then hides the matching
/// affordance instead of failing.
#[derive(Default)]
pub struct SpeechCapabilities {
    pub synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    pub recognizer: Option<Box<dyn SpeechRecognizer>>,
}

impl SpeechCapabilities {
    /// No speech support at all
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_synthesizer(mut self, synthesizer: impl SpeechSynthesizer + 'static) -> Self {
        self.synthesizer = Some(Box::new(synthesizer));
        self
    }

    pub fn with_recognizer(mut self, recognizer: impl SpeechRecognizer + 'static) -> Self {
        self.recognizer = Some(Box::new(recognizer));
        self
    }

    pub fn can_speak(&self) -> bool {
        self.synthesizer.is_some()
    }

    pub fn can_listen(&self) -> bool {
        self.recognizer.is_some()
    }
}

impl std::fmt::Debug for SpeechCapabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechCapabilities")
            .field("synthesizer", &self.synthesizer.as_ref().map(|s| s.name()))
            .field("recognizer", &self.recognizer.as_ref().map(|r| r.name()))
            .finish()
    }
}

/// Speech capability factory
pub struct SpeechBackendFactory;

impl SpeechBackendFactory {
    /// Detect the speech capabilities for a new session
    ///
    /// Without a NATS connection the session gets no speech support.
    pub fn detect(nats: Option<Arc<NatsClient>>, session_id: &str) -> SpeechCapabilities {
        match nats {
            Some(client) => {
                info!("Speech services available over NATS for session {}", session_id);
                SpeechCapabilities::none()
                    .with_synthesizer(NatsSynthesizer::new(Arc::clone(&client), session_id))
                    .with_recognizer(NatsRecognizer::new(client, session_id))
            }
            None => {
                warn!("No speech transport configured; session {} runs without voice", session_id);
                SpeechCapabilities::none()
            }
        }
    }
}
