use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route("/copilot/session", post(handlers::enter_session))
        .route(
            "/copilot/session/:session_id",
            get(handlers::get_session_status).delete(handlers::exit_session),
        )
        // Navigation
        .route("/copilot/session/:session_id/next", post(handlers::next_step))
        .route(
            "/copilot/session/:session_id/previous",
            post(handlers::previous_step),
        )
        .route(
            "/copilot/session/:session_id/step/:index",
            post(handlers::go_to_step),
        )
        // Countdown
        .route(
            "/copilot/session/:session_id/timer/toggle",
            post(handlers::toggle_timer),
        )
        .route(
            "/copilot/session/:session_id/timer/reset",
            post(handlers::reset_timer),
        )
        // Speech
        .route(
            "/copilot/session/:session_id/narration/toggle",
            post(handlers::toggle_narration),
        )
        .route(
            "/copilot/session/:session_id/listening/toggle",
            post(handlers::toggle_listening),
        )
        .route(
            "/copilot/session/:session_id/command",
            post(handlers::send_command),
        )
        .layer(
            ServiceBuilder::new()
                // Add tracing middleware for request logging
                .layer(TraceLayer::new_for_http())
                // The chat front end is served from another origin
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
