pub mod conversations;
pub mod error;
pub mod middleware;
pub mod state;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::state::AppState;

/// All routes. Every route except `/health` runs behind session resolution.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/gate/{target_id}", get(conversations::check_gate))
        .route(
            "/conversations",
            get(conversations::list_conversations).post(conversations::create_conversation),
        )
        .route(
            "/conversations/{conversation_id}/messages",
            get(conversations::get_messages).post(conversations::send_message),
        )
        .route(
            "/conversations/{conversation_id}/read",
            post(conversations::mark_read),
        )
        .route(
            "/conversations/{conversation_id}/unread",
            get(conversations::conversation_unread),
        )
        .route("/unread", get(conversations::total_unread))
        .route("/me/roles", put(conversations::set_my_roles))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::resolve_session,
        ))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
