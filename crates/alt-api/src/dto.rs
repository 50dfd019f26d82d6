//! Request/response shells for the inbound RPC surface (spec §6). These
//! are the typed-shell glue the core logic is agnostic to; shapes here are
//! deliberately thin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct FeedDto {
    pub id: String,
    pub url: String,
    pub title: String,
    pub favorite: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegisterFeedRequest {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchFeedsQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleDto {
    pub url: String,
    pub content: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FetchArticlesRequest {
    pub urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub article_url: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDto {
    pub token: String,
    pub user_id: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CsrfTokenDto {
    pub token: String,
}

/// Sanitized `meta` event relayed by `Chat.Stream` (spec §9: strip all but
/// `{url, title, published_at}` from upstream citations).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMetaEvent {
    pub url: String,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
}
