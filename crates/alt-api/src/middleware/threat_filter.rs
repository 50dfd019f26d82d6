//! Inbound threat-level request filter (spec §4.5). Runs before the
//! session layer ever sees the request; a `malicious` verdict means the
//! handler is never invoked (spec §8, scenario 6).

use alt_security::{classify, policy_for, FilterAction, RequestFeatures};
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::safe_error::translate;
use crate::state::AppState;
use alt_types::CoreError;

pub async fn threat_filter_middleware(
    State(state): State<AppState>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let body_peek_limit = state.config.dos_protection.body_inspect_bytes.max(1);
    let (parts, body) = request.into_parts();

    let full_bytes = match axum::body::to_bytes(body, 8 * 1024 * 1024).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return translate(&CoreError::validation("failed to read request body"))
                .into_response();
        }
    };
    let peek_len = full_bytes.len().min(body_peek_limit);
    let body_snippet = &full_bytes[..peek_len];

    let user_agent = parts
        .headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let path = parts.uri.path().to_string();

    let features = RequestFeatures {
        source_ip: None,
        user_agent: user_agent.as_deref(),
        path: &path,
        body_snippet,
    };

    let level = classify(&features);
    match policy_for(level) {
        FilterAction::Pass => {}
        FilterAction::LogAndPass => {
            tracing::warn!(path = %path, user_agent = ?user_agent, "suspect request admitted");
        }
        FilterAction::TooManyRequests => {
            return translate(&CoreError::rate_limited("dangerous threat verdict")).into_response();
        }
        FilterAction::Forbidden => {
            tracing::warn!(path = %path, user_agent = ?user_agent, "malicious request blocked");
            return translate(&CoreError::security_violation("malicious request blocked")).into_response();
        }
    }

    let request = Request::from_parts(parts, axum::body::Body::from(full_bytes));
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use alt_security::ThreatLevel;

    #[test]
    fn malicious_user_agent_classifies_as_forbidden() {
        let features = RequestFeatures {
            source_ip: None,
            user_agent: Some("sqlmap/1.6"),
            path: "/api/feed",
            body_snippet: &[],
        };
        assert_eq!(classify(&features), ThreatLevel::Malicious);
        assert_eq!(policy_for(classify(&features)), FilterAction::Forbidden);
    }
}
