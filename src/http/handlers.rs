use super::state::AppState;
use crate::copilot::{Command, CopilotSession, SessionStatus};
use crate::recipe::Recipe;
use crate::speech::SpeechBackendFactory;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct EnterSessionRequest {
    /// Structured recipe from the generation flow
    pub recipe: Option<Recipe>,

    /// Markdown answer of the style-transfer flow, used when `recipe` is absent
    pub transformed_recipe: Option<String>,

    /// Override automatic step narration for this session
    pub narration: Option<bool>,

    /// Override listening for voice commands from the start
    pub auto_listen: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct EnterSessionResponse {
    pub session_id: String,
    pub recipe: Recipe,
    pub status: SessionStatus,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// The command the text was interpreted as, if any
    pub command: Option<Command>,
    pub status: SessionStatus,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

/// Look up the live session, dropping it if a voice command already exited it
async fn live_session(state: &AppState, session_id: &str) -> Result<Arc<CopilotSession>, Response> {
    let session = {
        let active = state.active.read().await;
        active
            .as_ref()
            .filter(|session| session.id() == session_id)
            .cloned()
    };

    let not_found = || {
        error_response(
            StatusCode::NOT_FOUND,
            format!("Session {} not found", session_id),
        )
    };

    let Some(session) = session else {
        return Err(not_found());
    };

    if session.is_exited().await {
        let mut active = state.active.write().await;
        if active.as_ref().is_some_and(|s| s.id() == session_id) {
            *active = None;
        }
        return Err(not_found());
    }

    Ok(session)
}

async fn status_response(session: &CopilotSession) -> Response {
    (StatusCode::OK, Json(session.status().await)).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /copilot/session
/// Enter cooking mode, replacing any live session
pub async fn enter_session(
    State(state): State<AppState>,
    Json(req): Json<EnterSessionRequest>,
) -> impl IntoResponse {
    let recipe = match (req.recipe, req.transformed_recipe) {
        (Some(recipe), _) => recipe,
        (None, Some(text)) if !text.trim().is_empty() => Recipe::from_transformed_text(&text),
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Provide a recipe or transformed recipe text".to_string(),
            );
        }
    };

    let mut config = state.settings.session_config();
    if let Some(narration) = req.narration {
        config.narration_enabled = narration;
    }
    if let Some(auto_listen) = req.auto_listen {
        config.auto_listen = auto_listen;
    }

    // Only one cooking session is live at a time
    let previous = state.active.write().await.take();
    if let Some(previous) = previous {
        info!("Replacing co-pilot session {}", previous.id());
        previous.exit().await;
    }

    let capabilities = SpeechBackendFactory::detect(state.nats.clone(), &config.session_id);
    let session = CopilotSession::enter(recipe, config, capabilities).await;

    let response = EnterSessionResponse {
        session_id: session.id().to_string(),
        recipe: session.recipe().clone(),
        status: session.status().await,
    };

    {
        let mut active = state.active.write().await;
        if let Some(raced) = active.replace(session) {
            warn!("Co-pilot session {} replaced concurrently", raced.id());
            raced.exit().await;
        }
    }

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /copilot/session/:session_id
/// Get status of the live session
pub async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match live_session(&state, &session_id).await {
        Ok(session) => status_response(&session).await,
        Err(response) => response,
    }
}

/// DELETE /copilot/session/:session_id
/// Exit cooking mode
pub async fn exit_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let session = {
        let mut active = state.active.write().await;
        if active.as_ref().is_some_and(|s| s.id() == session_id) {
            active.take()
        } else {
            None
        }
    };

    match session {
        Some(session) => {
            session.exit().await;
            status_response(&session).await
        }
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Session {} not found", session_id),
        ),
    }
}

/// POST /copilot/session/:session_id/next
pub async fn next_step(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match live_session(&state, &session_id).await {
        Ok(session) => {
            session.next().await;
            status_response(&session).await
        }
        Err(response) => response,
    }
}

/// POST /copilot/session/:session_id/previous
pub async fn previous_step(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match live_session(&state, &session_id).await {
        Ok(session) => {
            session.previous().await;
            status_response(&session).await
        }
        Err(response) => response,
    }
}

/// POST /copilot/session/:session_id/step/:index
/// Jump to a step; out-of-range indexes leave the session unchanged
pub async fn go_to_step(
    State(state): State<AppState>,
    Path((session_id, index)): Path<(String, usize)>,
) -> impl IntoResponse {
    match live_session(&state, &session_id).await {
        Ok(session) => {
            session.go_to_step(index).await;
            status_response(&session).await
        }
        Err(response) => response,
    }
}

/// POST /copilot/session/:session_id/timer/toggle
pub async fn toggle_timer(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match live_session(&state, &session_id).await {
        Ok(session) => {
            session.toggle_timer().await;
            status_response(&session).await
        }
        Err(response) => response,
    }
}

/// POST /copilot/session/:session_id/timer/reset
pub async fn reset_timer(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match live_session(&state, &session_id).await {
        Ok(session) => {
            session.reset_timer().await;
            status_response(&session).await
        }
        Err(response) => response,
    }
}

/// POST /copilot/session/:session_id/narration/toggle
pub async fn toggle_narration(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match live_session(&state, &session_id).await {
        Ok(session) => {
            session.toggle_narration().await;
            status_response(&session).await
        }
        Err(response) => response,
    }
}

/// POST /copilot/session/:session_id/listening/toggle
pub async fn toggle_listening(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match live_session(&state, &session_id).await {
        Ok(session) => {
            session.toggle_listening().await;
            status_response(&session).await
        }
        Err(response) => response,
    }
}

/// POST /copilot/session/:session_id/command
/// Apply a typed command ("next", "go back", "start timer", "finish", ...)
pub async fn send_command(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<CommandRequest>,
) -> impl IntoResponse {
    let session = match live_session(&state, &session_id).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let command = session.handle_command(&req.text).await;
    let status = session.status().await;

    if status.exited {
        let mut active = state.active.write().await;
        if active.as_ref().is_some_and(|s| s.id() == session_id) {
            *active = None;
        }
    }

    (StatusCode::OK, Json(CommandResponse { command, status })).into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
