//! Session resolution middleware: extracts the bearer token, resolves it
//! to a session record, and touches `last_activity`. Missing or invalid
//! tokens fail `UNAUTHENTICATED` (spec §6, "session cookie / bearer token").

use alt_types::ports::session::SessionRecord;
use alt_types::CoreError;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::safe_error::translate;
use crate::state::AppState;

/// The resolved session, inserted into request extensions for handlers
/// and the CSRF middleware to read.
#[derive(Clone)]
pub struct AuthenticatedSession(pub SessionRecord);

pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = extract_bearer_token(&request);

    let Some(token) = token else {
        return translate(&CoreError::unauthenticated("missing session token")).into_response();
    };

    let Some(session) = state.sessions.lookup(&token).await else {
        return translate(&CoreError::unauthenticated("unknown session token")).into_response();
    };

    if !session.is_valid(chrono::Utc::now()) {
        return translate(&CoreError::unauthenticated("session expired or inactive"))
            .into_response();
    }

    state.sessions.touch(&token).await;
    request
        .extensions_mut()
        .insert(AuthenticatedSession(session));

    next.run(request).await
}

fn extract_bearer_token(request: &Request<axum::body::Body>) -> Option<String> {
    request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}
