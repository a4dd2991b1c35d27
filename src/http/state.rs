use crate::config::CopilotSettings;
use crate::copilot::CopilotSession;
use crate::nats::NatsClient;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The live co-pilot session; entering a new one replaces it
    pub active: Arc<RwLock<Option<Arc<CopilotSession>>>>,

    /// Defaults for new sessions
    pub settings: CopilotSettings,

    /// Speech transport, when speech services are enabled
    pub nats: Option<Arc<NatsClient>>,
}

impl AppState {
    pub fn new(settings: CopilotSettings, nats: Option<Arc<NatsClient>>) -> Self {
        Self {
            active: Arc::new(RwLock::new(None)),
            settings,
            nats,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(CopilotSettings::default(), None)
    }
}
