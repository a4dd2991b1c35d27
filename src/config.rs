use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::copilot::CopilotConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub copilot: CopilotSettings,
    #[serde(default)]
    pub speech: SpeechConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Defaults applied to every co-pilot session
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CopilotSettings {
    pub tick_interval_ms: u64,
    pub narration_delay_ms: u64,
    pub narration_enabled: bool,
    pub auto_listen: bool,
}

impl Default for CopilotSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            narration_delay_ms: 100,
            narration_enabled: true,
            auto_listen: false,
        }
    }
}

impl CopilotSettings {
    /// Session configuration with a fresh session id
    pub fn session_config(&self) -> CopilotConfig {
        CopilotConfig {
            tick_interval: Duration::from_millis(self.tick_interval_ms.max(1)),
            narration_delay: Duration::from_millis(self.narration_delay_ms),
            narration_enabled: self.narration_enabled,
            auto_listen: self.auto_listen,
            ..CopilotConfig::default()
        }
    }
}

/// Out-of-process speech services
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub enabled: bool,
    pub nats_url: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            nats_url: "nats://localhost:4222".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .with_context(|| format!("Failed to read config {}", path))?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }
}
