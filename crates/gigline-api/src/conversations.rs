use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use gigline_chat::{ChatError, ConversationGate, Session};
use gigline_types::api::{
    ConversationResponse, CreateConversationRequest, GateResponse, MessageResponse,
    SendMessageRequest, UnreadResponse,
};
use gigline_types::models::{ActorId, ConversationId, RoleFlags};

use crate::error::ApiError;
use crate::state::AppState;

fn require_actor(session: &Session) -> Result<ActorId, ApiError> {
    session
        .actor_id()
        .ok_or_else(|| ApiError::chat(ChatError::NotAuthenticated, session.language))
}

/// Read-only eligibility check, for enabling a "Message" button.
pub async fn check_gate(
    State(state): State<AppState>,
    path: Result<Path<ActorId>, PathRejection>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(target_id) = path?;
    let directory = state.directory()?;
    let decision = ConversationGate::new(&*directory).decide(&session, &target_id);

    Ok(Json(GateResponse {
        allowed: decision.allowed,
        reason: decision
            .localized_reason(session.language)
            .map(str::to_string),
    }))
}

pub async fn create_conversation(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Result<Json<CreateConversationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let directory = state.directory()?;
    let gate = ConversationGate::new(&*directory);
    let mut store = state.store()?;

    let conversation = store
        .find_or_create_conversation(
            &gate,
            &session,
            req.target_id,
            req.initial_message.as_deref(),
            req.context,
        )
        .map_err(|e| ApiError::chat(e, session.language))?;

    let viewer = require_actor(&session)?;
    Ok(Json(ConversationResponse::for_viewer(conversation, &viewer)))
}

pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer = require_actor(&session)?;
    let store = state.store()?;

    let conversations: Vec<ConversationResponse> = store
        .conversations_for(&viewer)
        .into_iter()
        .map(|c| ConversationResponse::for_viewer(c, &viewer))
        .collect();

    Ok(Json(conversations))
}

pub async fn get_messages(
    State(state): State<AppState>,
    path: Result<Path<ConversationId>, PathRejection>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(conversation_id) = path?;
    let reader = require_actor(&session)?;
    let store = state.store()?;

    let messages: Vec<MessageResponse> = store
        .messages(&conversation_id, &reader)
        .map_err(|e| ApiError::chat(e, session.language))?
        .iter()
        .map(MessageResponse::from)
        .collect();

    Ok(Json(messages))
}

pub async fn send_message(
    State(state): State<AppState>,
    path: Result<Path<ConversationId>, PathRejection>,
    Extension(session): Extension<Session>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(conversation_id) = path?;
    let Json(req) = body?;
    let mut store = state.store()?;

    let message = store
        .send_message_with_kind(&conversation_id, session.actor_id(), &req.body, req.kind)
        .map_err(|e| ApiError::chat(e, session.language))?;

    info!(%conversation_id, message_id = %message.id, "Message sent");
    Ok((StatusCode::CREATED, Json(MessageResponse::from(message))))
}

pub async fn mark_read(
    State(state): State<AppState>,
    path: Result<Path<ConversationId>, PathRejection>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(conversation_id) = path?;
    let reader = require_actor(&session)?;
    state.store()?.mark_as_read(&conversation_id, &reader);
    Ok(StatusCode::NO_CONTENT)
}

/// Unread badge for one conversation. Zero for unknown ids and non-participants.
pub async fn conversation_unread(
    State(state): State<AppState>,
    path: Result<Path<ConversationId>, PathRejection>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(conversation_id) = path?;
    let viewer = require_actor(&session)?;
    let total = state.store()?.unread_count(&conversation_id, &viewer);
    Ok(Json(UnreadResponse { total }))
}

pub async fn total_unread(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer = require_actor(&session)?;
    let total = state.store()?.total_unread(&viewer);
    Ok(Json(UnreadResponse { total }))
}

/// Role switch for the session actor. Takes effect from the next request.
pub async fn set_my_roles(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Result<Json<RoleFlags>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(roles) = body?;
    let actor_id = require_actor(&session)?;

    if !state.directory_mut()?.set_roles(&actor_id, roles) {
        // Session actors come from the directory; a miss means it was replaced mid-request.
        return Err(ApiError::chat(ChatError::NotAuthenticated, session.language));
    }

    info!(%actor_id, ?roles, "Roles updated");
    Ok(StatusCode::NO_CONTENT)
}
