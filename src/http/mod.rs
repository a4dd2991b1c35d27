//! HTTP API for driving a co-pilot session from the chat front end
//!
//! This module provides a REST API over the live cooking session:
//! - POST /copilot/session - Enter cooking mode with a recipe
//! - GET /copilot/session/:id - Query session status
//! - POST /copilot/session/:id/{next,previous,step/:index} - Navigate
//! - POST /copilot/session/:id/timer/{toggle,reset} - Countdown control
//! - POST /copilot/session/:id/{narration,listening}/toggle - Speech control
//! - POST /copilot/session/:id/command - Apply a typed command
//! - DELETE /copilot/session/:id - Exit cooking mode
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
