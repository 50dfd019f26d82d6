//! CSRF check middleware, applied only to mutating routes (spec §4.4,
//! §6: "client sends a token previously obtained from `CSRF.Issue`;
//! server requires constant-time equality against its stored value").

use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::middleware::session::AuthenticatedSession;
use crate::safe_error::translate;
use crate::state::AppState;
use alt_types::CoreError;

const CSRF_HEADER: &str = "x-csrf-token";

pub async fn csrf_middleware(
    State(state): State<AppState>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(AuthenticatedSession(session)) = request.extensions().get::<AuthenticatedSession>().cloned() else {
        // The session middleware must run first; its absence here is a
        // router-wiring bug, not a client error, but fail closed anyway.
        return translate(&CoreError::unauthenticated("no session on request")).into_response();
    };

    let presented = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok());

    let Some(presented) = presented else {
        return translate(&CoreError::forbidden("missing CSRF token")).into_response();
    };

    if !state.csrf.validate(&session.token, presented) {
        return translate(&CoreError::forbidden("CSRF token mismatch or expired")).into_response();
    }

    next.run(request).await
}
