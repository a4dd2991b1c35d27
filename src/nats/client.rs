use anyhow::{Context, Result};
use async_nats::Client;
use serde::Serialize;
use tracing::{debug, info};

use super::messages::{NarrationAction, NarrationRequest, RecognitionAction, RecognitionControl};

pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client })
    }

    /// Publish a narration request for a session
    pub async fn publish_narration(
        &self,
        session_id: &str,
        utterance_id: &str,
        action: NarrationAction,
        text: Option<&str>,
    ) -> Result<()> {
        let subject = format!("tts.request.{}", session_id);

        let message = NarrationRequest {
            session_id: session_id.to_string(),
            utterance_id: utterance_id.to_string(),
            action,
            text: text.map(str::to_string),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        self.publish_json(subject, &message)
            .await
            .context("Failed to publish narration request")?;

        debug!(
            "Published narration request (session={}, utterance={}, action={:?})",
            session_id, utterance_id, action
        );

        Ok(())
    }

    /// Publish a recognition start/stop for a session
    pub async fn publish_recognition_control(
        &self,
        session_id: &str,
        action: RecognitionAction,
    ) -> Result<()> {
        let subject = format!("stt.control.{}", session_id);

        let message = RecognitionControl {
            session_id: session_id.to_string(),
            action,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        self.publish_json(subject, &message)
            .await
            .context("Failed to publish recognition control")?;

        debug!("Published recognition control (session={}, action={:?})", session_id, action);

        Ok(())
    }

    /// Subscribe to utterance events of a session's narration
    pub async fn subscribe_narration_events(&self, session_id: &str) -> Result<async_nats::Subscriber> {
        let subject = format!("tts.event.{}", session_id);

        let subscriber = self
            .client
            .subscribe(subject.clone())
            .await
            .context("Failed to subscribe to narration events")?;

        debug!("Subscribed to {}", subject);

        Ok(subscriber)
    }

    /// Subscribe to transcript messages
    pub async fn subscribe_transcripts(&self) -> Result<async_nats::Subscriber> {
        // The STT service publishes to stt.text.partial and stt.text.final;
        // callers filter by session_id in the message payload
        let subject = "stt.text.>";

        info!("Subscribing to transcripts on {}", subject);

        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .context("Failed to subscribe to transcripts")?;

        Ok(subscriber)
    }

    async fn publish_json<T: Serialize>(&self, subject: String, message: &T) -> Result<()> {
        let payload = serde_json::to_vec(message)?;
        self.client.publish(subject, payload.into()).await?;
        Ok(())
    }
}
