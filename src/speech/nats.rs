// Speech capabilities backed by out-of-process TTS/STT services over NATS

use anyhow::{Context, Result};
use futures::stream::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::backend::{RecognitionEvent, SpeechRecognizer, SpeechSynthesizer, UtteranceEvent};
use crate::nats::{
    NarrationAction, NarrationEventMessage, NatsClient, RecognitionAction, TranscriptMessage,
};

/// Map a TTS service event name onto an utterance event
fn parse_utterance_event(msg: &NarrationEventMessage) -> Option<UtteranceEvent> {
    match msg.event.as_str() {
        "started" => Some(UtteranceEvent::Started),
        "paused" => Some(UtteranceEvent::Paused),
        "resumed" => Some(UtteranceEvent::Resumed),
        "finished" => Some(UtteranceEvent::Finished),
        "error" => Some(UtteranceEvent::Failed(
            msg.error.clone().unwrap_or_else(|| "unknown error".to_string()),
        )),
        _ => None,
    }
}

/// Narration through the TTS service
pub struct NatsSynthesizer {
    client: Arc<NatsClient>,
    session_id: String,
    current_utterance: Option<String>,
    forwarder: Option<JoinHandle<()>>,
}

impl NatsSynthesizer {
    pub fn new(client: Arc<NatsClient>, session_id: &str) -> Self {
        Self {
            client,
            session_id: session_id.to_string(),
            current_utterance: None,
            forwarder: None,
        }
    }

    async fn publish(&self, action: NarrationAction, text: Option<&str>) -> Result<()> {
        match &self.current_utterance {
            Some(utterance_id) => {
                self.client
                    .publish_narration(&self.session_id, utterance_id, action, text)
                    .await
            }
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for NatsSynthesizer {
    async fn speak(&mut self, text: &str) -> Result<mpsc::Receiver<UtteranceEvent>> {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }

        let utterance_id = uuid::Uuid::new_v4().to_string();

        // Subscribe before publishing so no event of this utterance is missed
        let mut subscriber = self
            .client
            .subscribe_narration_events(&self.session_id)
            .await
            .context("Failed to subscribe to narration events")?;

        self.current_utterance = Some(utterance_id.clone());
        self.publish(NarrationAction::Speak, Some(text)).await?;

        let (tx, rx) = mpsc::channel(16);
        let forwarder = tokio::spawn(async move {
            while let Some(msg) = subscriber.next().await {
                let event = match serde_json::from_slice::<NarrationEventMessage>(&msg.payload) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("Failed to parse narration event: {}", e);
                        continue;
                    }
                };

                if event.utterance_id != utterance_id {
                    continue;
                }

                let Some(event) = parse_utterance_event(&event) else {
                    debug!("Ignoring unknown narration event {:?}", event.event);
                    continue;
                };

                let terminal = matches!(event, UtteranceEvent::Finished | UtteranceEvent::Failed(_));
                if tx.send(event).await.is_err() || terminal {
                    break;
                }
            }
        });
        self.forwarder = Some(forwarder);

        Ok(rx)
    }

    async fn pause(&mut self) -> Result<()> {
        self.publish(NarrationAction::Pause, None).await
    }

    async fn resume(&mut self) -> Result<()> {
        self.publish(NarrationAction::Resume, None).await
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
        self.publish(NarrationAction::Stop, None).await?;
        self.current_utterance = None;
        Ok(())
    }

    fn name(&self) -> &str {
        "NATS TTS"
    }
}

/// Voice commands through the STT service
pub struct NatsRecognizer {
    client: Arc<NatsClient>,
    session_id: String,
    forwarder: Option<JoinHandle<()>>,
}

impl NatsRecognizer {
    pub fn new(client: Arc<NatsClient>, session_id: &str) -> Self {
        Self {
            client,
            session_id: session_id.to_string(),
            forwarder: None,
        }
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for NatsRecognizer {
    async fn start(&mut self) -> Result<mpsc::Receiver<RecognitionEvent>> {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }

        let mut subscriber = self.client.subscribe_transcripts().await?;
        self.client
            .publish_recognition_control(&self.session_id, RecognitionAction::Start)
            .await?;

        info!("Voice command recognition started for session {}", self.session_id);

        let (tx, rx) = mpsc::channel(16);
        let session_id = self.session_id.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(msg) = subscriber.next().await {
                match serde_json::from_slice::<TranscriptMessage>(&msg.payload) {
                    Ok(transcript) => {
                        // Only final results of this session are commands
                        if transcript.session_id != session_id || transcript.partial {
                            continue;
                        }

                        let phrase = transcript.text.trim().to_lowercase();
                        if phrase.is_empty() {
                            continue;
                        }

                        if tx.send(RecognitionEvent::Utterance(phrase)).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to parse transcript message: {}", e);
                    }
                }
            }

            // Subscription closed underneath us
            let _ = tx.send(RecognitionEvent::Ended).await;
        });
        self.forwarder = Some(forwarder);

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }

        self.client
            .publish_recognition_control(&self.session_id, RecognitionAction::Stop)
            .await?;

        info!("Voice command recognition stopped for session {}", self.session_id);
        Ok(())
    }

    fn name(&self) -> &str {
        "NATS STT"
    }
}
