//! `Feed.List`, `Feed.Get`, `Feed.Search` (reads, no CSRF) and
//! `Feed.Register`, `Feed.Favorite`, `Feed.Delete` (writes, CSRF-protected).

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use alt_types::CoreError;
use url::Url;
use uuid::Uuid;

use crate::dto::{FeedDto, RegisterFeedRequest, SearchFeedsQuery};
use crate::middleware::session::AuthenticatedSession;
use crate::state::AppState;

/// A registered feed, scoped to the tenant that registered it.
#[derive(Debug, Clone)]
pub struct FeedRecord {
    pub id: String,
    pub tenant_id: String,
    pub url: String,
    pub title: String,
    pub favorite: bool,
}

impl From<&FeedRecord> for FeedDto {
    fn from(record: &FeedRecord) -> Self {
        FeedDto {
            id: record.id.clone(),
            url: record.url.clone(),
            title: record.title.clone(),
            favorite: record.favorite,
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(AuthenticatedSession(session)): Extension<AuthenticatedSession>,
) -> Result<Json<Vec<FeedDto>>, CoreError> {
    let feeds: Vec<FeedDto> = state
        .feeds
        .iter()
        .filter(|entry| entry.tenant_id == session.tenant_id)
        .map(|entry| FeedDto::from(entry.value()))
        .collect();
    Ok(Json(feeds))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(AuthenticatedSession(session)): Extension<AuthenticatedSession>,
    Path(id): Path<String>,
) -> Result<Json<FeedDto>, CoreError> {
    let record = state
        .feeds
        .get(&id)
        .filter(|entry| entry.tenant_id == session.tenant_id)
        .ok_or_else(|| CoreError::not_found(format!("feed {id}")))?;
    Ok(Json(FeedDto::from(record.value())))
}

pub async fn search(
    State(state): State<AppState>,
    Extension(AuthenticatedSession(session)): Extension<AuthenticatedSession>,
    Query(query): Query<SearchFeedsQuery>,
) -> Result<Json<Vec<FeedDto>>, CoreError> {
    let needle = query.q.to_ascii_lowercase();
    let feeds: Vec<FeedDto> = state
        .feeds
        .iter()
        .filter(|entry| entry.tenant_id == session.tenant_id)
        .filter(|entry| needle.is_empty() || entry.title.to_ascii_lowercase().contains(&needle))
        .map(|entry| FeedDto::from(entry.value()))
        .collect();
    Ok(Json(feeds))
}

/// Validates the feed URL against the SSRF guard before ever touching the
/// store or issuing outbound HTTP (spec §8, scenario 2).
pub async fn register(
    State(state): State<AppState>,
    Extension(AuthenticatedSession(session)): Extension<AuthenticatedSession>,
    Json(request): Json<RegisterFeedRequest>,
) -> Result<Json<FeedDto>, CoreError> {
    let parsed = Url::parse(&request.url)
        .map_err(|err| CoreError::validation(format!("invalid feed URL: {err}")))?;

    let guard = alt_fetch::SsrfGuard::new();
    guard.is_allowed(&parsed).await.map_err(|err| {
        CoreError::validation(format!(
            "feed URL denied: private-network address is not reachable ({err})"
        ))
    })?;

    let record = FeedRecord {
        id: Uuid::new_v4().to_string(),
        tenant_id: session.tenant_id.clone(),
        url: request.url,
        title: request.title.unwrap_or_else(|| parsed.host_str().unwrap_or("feed").to_string()),
        favorite: false,
    };
    let dto = FeedDto::from(&record);
    state.feeds.insert(record.id.clone(), record);
    Ok(Json(dto))
}

pub async fn favorite(
    State(state): State<AppState>,
    Extension(AuthenticatedSession(session)): Extension<AuthenticatedSession>,
    Path(id): Path<String>,
) -> Result<Json<FeedDto>, CoreError> {
    let mut record = state
        .feeds
        .get_mut(&id)
        .filter(|entry| entry.tenant_id == session.tenant_id)
        .ok_or_else(|| CoreError::not_found(format!("feed {id}")))?;
    record.favorite = true;
    Ok(Json(FeedDto::from(record.value())))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(AuthenticatedSession(session)): Extension<AuthenticatedSession>,
    Path(id): Path<String>,
) -> Result<(), CoreError> {
    let removed = state
        .feeds
        .remove_if(&id, |_, record| record.tenant_id == session.tenant_id)
        .is_some();
    if removed {
        Ok(())
    } else {
        Err(CoreError::not_found(format!("feed {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(tenant_id: &str) -> AuthenticatedSession {
        AuthenticatedSession(alt_types::ports::session::SessionRecord {
            token: "t".to_string(),
            user_id: "u".to_string(),
            role: "member".to_string(),
            tenant_id: tenant_id.to_string(),
            created_at: chrono::Utc::now(),
            expires_at: chrono::Utc::now() + chrono::Duration::minutes(30),
            last_activity: chrono::Utc::now(),
            active: true,
        })
    }

    #[tokio::test]
    async fn register_rejects_private_network_url() {
        let state = test_state();
        let result = register(
            State(state),
            Extension(session("tenant-a")),
            Json(RegisterFeedRequest { url: "http://10.0.0.1/feed.xml".to_string(), title: None }),
        )
        .await;
        assert!(matches!(result, Err(CoreError::Validation { .. })));
    }

    #[tokio::test]
    async fn register_then_list_round_trips_for_owning_tenant() {
        let state = test_state();
        let dto = register(
            State(state.clone()),
            Extension(session("tenant-a")),
            Json(RegisterFeedRequest {
                url: "https://example.com/feed.xml".to_string(),
                title: Some("Example Feed".to_string()),
            }),
        )
        .await
        .unwrap()
        .0;

        let listed = list(State(state.clone()), Extension(session("tenant-a"))).await.unwrap().0;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, dto.id);

        let other_tenant = list(State(state), Extension(session("tenant-b"))).await.unwrap().0;
        assert!(other_tenant.is_empty());
    }

    fn test_state() -> AppState {
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

        struct NullKratos;
        #[async_trait]
        impl alt_types::ports::kratos::KratosClient for NullKratos {
            async fn login(&self, _u: &str, _p: &str) -> Result<alt_types::ports::kratos::KratosIdentity, CoreError> {
                Err(CoreError::unauthenticated("unused in this test"))
            }
            async fn register(&self, _u: &str, _p: &str) -> Result<alt_types::ports::kratos::KratosIdentity, CoreError> {
                Err(CoreError::unauthenticated("unused in this test"))
            }
        }

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
            Arc::new(NullKratos),
            Arc::new(crate::handlers::chat::EmptyChatUpstream),
            b"test-secret".to_vec(),
        )
    }
}
