use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use gigline_chat::{ChatError, GateError};
use gigline_types::api::ErrorResponse;
use gigline_types::models::Language;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{source}")]
    Chat { source: ChatError, language: Language },

    /// Path or body did not parse. `detail` is axum's rejection text.
    #[error("malformed request: {detail}")]
    Malformed {
        code: &'static str,
        status: StatusCode,
        detail: String,
    },

    #[error("shared state lock poisoned")]
    StatePoisoned,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed {
            code: "invalid_body",
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Malformed {
            code: "invalid_path",
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn chat(source: impl Into<ChatError>, language: Language) -> Self {
        Self::Chat {
            source: source.into(),
            language,
        }
    }
}

fn status_for(err: ChatError) -> StatusCode {
    match err {
        ChatError::NotAuthenticated | ChatError::GateRejected(GateError::NotAuthenticated) => {
            StatusCode::UNAUTHORIZED
        }
        ChatError::GateRejected(GateError::SelfMessage)
        | ChatError::GateRejected(GateError::CustomerToCustomerBlocked)
        | ChatError::NotAParticipant => StatusCode::FORBIDDEN,
        ChatError::GateRejected(GateError::UnknownTarget) | ChatError::ConversationNotFound => {
            StatusCode::NOT_FOUND
        }
        ChatError::EmptyBody => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Chat { source, language } => {
                debug!(error = %source, code = source.code(), "Request rejected");
                let body = ErrorResponse {
                    error: source.code().to_string(),
                    reason: source.reason(language).to_string(),
                };
                (status_for(source), Json(body)).into_response()
            }
            ApiError::Malformed {
                code,
                status,
                detail,
            } => {
                debug!(code, %detail, "Malformed request");
                let body = ErrorResponse {
                    error: code.to_string(),
                    reason: detail,
                };
                (status, Json(body)).into_response()
            }
            ApiError::StatePoisoned => {
                error!("Shared state lock poisoned");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
