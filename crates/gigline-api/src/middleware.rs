use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;

use gigline_chat::{ActorDirectory, Session};
use gigline_types::api::Claims;
use gigline_types::models::Language;

use crate::state::AppState;

/// Attach a [`Session`] to every request.
///
/// Authentication is owned by an external service; this only decodes its
/// token. A missing, invalid or unknown-subject token yields an anonymous
/// session so the domain rules can report `NotAuthenticated` themselves.
pub async fn resolve_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let claims = bearer_token(req.headers()).and_then(|token| decode_claims(token, &state.jwt_secret));

    let language = claims
        .as_ref()
        .and_then(Claims::language)
        .or_else(|| {
            req.headers()
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok())
                .and_then(Language::from_accept_language)
        })
        .unwrap_or(state.default_language);

    let actor = match claims {
        Some(c) => {
            let directory = match state.directory() {
                Ok(directory) => directory,
                Err(e) => return e.into_response(),
            };
            let actor = directory.lookup(&c.sub);
            if actor.is_none() {
                debug!(actor_id = %c.sub, "Token subject not in directory");
            }
            actor
        }
        None => None,
    };

    req.extensions_mut().insert(Session { actor, language });
    next.run(req).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn decode_claims(token: &str, secret: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| debug!(error = %e, "Rejected bearer token"))
    .ok()
}
