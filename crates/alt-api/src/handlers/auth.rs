//! `Auth.Login`, `Auth.Register` (no auth, no CSRF), `Auth.Logout`,
//! `Auth.Refresh` (auth + CSRF), `Auth.CSRF.Issue` (auth, no CSRF).

use axum::extract::State;
use axum::{Extension, Json};

use alt_types::ports::kratos::KratosIdentity;
use alt_types::ports::session::SessionStorePort;
use alt_types::CoreError;

use crate::dto::{CsrfTokenDto, LoginRequest, RegisterRequest, SessionDto};
use crate::middleware::session::AuthenticatedSession;
use crate::state::AppState;

fn session_dto(record: &alt_types::ports::session::SessionRecord) -> SessionDto {
    SessionDto {
        token: record.token.clone(),
        user_id: record.user_id.clone(),
        role: record.role.clone(),
        expires_at: record.expires_at,
    }
}

async fn issue_session(state: &AppState, identity: KratosIdentity) -> Result<SessionDto, CoreError> {
    let ttl = chrono::Duration::from_std(state.config.session_timeout)
        .map_err(|err| CoreError::unknown(err.to_string()))?;
    let record = state
        .sessions
        .create(&identity.user_id, &identity.role, &identity.tenant_id, ttl)
        .await?;
    Ok(session_dto(&record))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionDto>, CoreError> {
    let identity = state.kratos.login(&request.username, &request.password).await?;
    Ok(Json(issue_session(&state, identity).await?))
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<SessionDto>, CoreError> {
    let identity = state.kratos.register(&request.username, &request.password).await?;
    Ok(Json(issue_session(&state, identity).await?))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(AuthenticatedSession(session)): Extension<AuthenticatedSession>,
) -> Result<(), CoreError> {
    state.sessions.deactivate(&session.token).await;
    state.csrf.delete(&session.token);
    Ok(())
}

pub async fn refresh(
    State(state): State<AppState>,
    Extension(AuthenticatedSession(session)): Extension<AuthenticatedSession>,
) -> Result<Json<SessionDto>, CoreError> {
    let ttl = chrono::Duration::from_std(state.config.session_timeout)
        .map_err(|err| CoreError::unknown(err.to_string()))?;
    let replacement = state
        .sessions
        .create(&session.user_id, &session.role, &session.tenant_id, ttl)
        .await?;
    state.sessions.deactivate(&session.token).await;
    Ok(Json(session_dto(&replacement)))
}

pub async fn issue_csrf(
    State(state): State<AppState>,
    Extension(AuthenticatedSession(session)): Extension<AuthenticatedSession>,
) -> Json<CsrfTokenDto> {
    let ttl = chrono::Duration::from_std(state.config.session_timeout)
        .unwrap_or_else(|_| chrono::Duration::minutes(30));
    let token = state.csrf.issue(&session.token, ttl);
    Json(CsrfTokenDto { token })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alt_types::ports::fetch::FetchOutcome;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct NullFetcher;
    #[async_trait]
    impl alt_types::ports::fetch::FetchArticlePort for NullFetcher {
        async fn fetch_multiple(&self, _urls: &[String]) -> HashMap<String, FetchOutcome> {
            HashMap::new()
        }
    }

    struct FakeKratos;
    #[async_trait]
    impl alt_types::ports::kratos::KratosClient for FakeKratos {
        async fn login(&self, username: &str, password: &str) -> Result<KratosIdentity, CoreError> {
            if password == "correct" {
                Ok(KratosIdentity { user_id: username.to_string(), role: "member".to_string(), tenant_id: "tenant-a".to_string() })
            } else {
                Err(CoreError::unauthenticated("bad credentials"))
            }
        }
        async fn register(&self, username: &str, _password: &str) -> Result<KratosIdentity, CoreError> {
            Ok(KratosIdentity { user_id: username.to_string(), role: "member".to_string(), tenant_id: "tenant-a".to_string() })
        }
    }

    fn state() -> AppState {
        AppState::new(
            alt_config::AppConfig {
                proxy_strategy: alt_config::ProxyStrategy::Direct,
                envoy_proxy_base_url: None,
                database_url: String::new(),
                kratos: alt_config::KratosConfig { public_url: String::new(), admin_url: String::new() },
                csrf_token_length: 32,
                session_timeout: std::time::Duration::from_secs(1800),
                dos_protection: alt_config::DosProtectionConfig::default(),
            },
            Arc::new(NullFetcher),
            Arc::new(FakeKratos),
            Arc::new(crate::handlers::chat::EmptyChatUpstream),
            b"secret".to_vec(),
        )
    }

    #[tokio::test]
    async fn login_with_bad_credentials_fails_unauthenticated() {
        let result = login(
            State(state()),
            Json(LoginRequest { username: "alice".to_string(), password: "wrong".to_string() }),
        )
        .await;
        assert!(matches!(result, Err(CoreError::Unauthenticated { .. })));
    }

    #[tokio::test]
    async fn login_then_issue_then_logout_without_token_fails_precondition() {
        let state = state();
        let session = login(
            State(state.clone()),
            Json(LoginRequest { username: "alice".to_string(), password: "correct".to_string() }),
        )
        .await
        .unwrap()
        .0;

        let record = state.sessions.lookup(&session.token).await.unwrap();
        let authed = AuthenticatedSession(record.clone());

        let csrf = issue_csrf(State(state.clone()), Extension(authed.clone())).await.0;
        assert!(!csrf.token.is_empty());
        assert!(state.csrf.validate(&session.token, &csrf.token));

        // A logout call bypassing the CSRF middleware (as in a direct unit
        // test) still succeeds at this layer; the CSRF gate lives in
        // `middleware::csrf`, not in the handler itself.
        logout(State(state.clone()), Extension(authed)).await.unwrap();
        let after = state.sessions.lookup(&session.token).await.unwrap();
        assert!(!after.active);
    }
}
