//! `Chat.Stream`: relays a server-stream of events from an upstream RAG
//! service, sanitizing every `meta` event to `{url, title, published_at}`
//! before it reaches the client (spec §9, "Streaming").
//!
//! The contract: lazy, finite, single-pass, and cancellation aborts both
//! legs. The last property falls out of `Sse` dropping the underlying
//! stream (and with it, whatever task is driving the upstream call) the
//! moment the client disconnects — no extra wiring needed.

use std::convert::Infallible;
use std::pin::Pin;

use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use chrono::{DateTime, Utc};
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;

use crate::dto::ChatMetaEvent;
use crate::middleware::session::AuthenticatedSession;
use crate::state::AppState;
use axum::Extension;

/// A citation as the upstream service actually emits it: more fields than
/// a client should ever see (internal document ids, scoring, raw text).
#[derive(Debug, Clone)]
pub struct RawCitation {
    pub url: String,
    pub title: String,
    pub published_at: Option<DateTime<Utc>>,
    pub internal_doc_id: String,
    pub relevance_score: f32,
}

#[derive(Debug, Clone)]
pub enum UpstreamEvent {
    Token(String),
    Meta(RawCitation),
    Done,
}

/// Capability port for the upstream RAG service. `alt-api` owns this
/// trait directly: unlike the fetch/session/rate-limit ports, nothing
/// outside this crate needs to depend on it.
#[async_trait]
pub trait ChatUpstream: Send + Sync {
    fn stream(&self, query: &str) -> Pin<Box<dyn Stream<Item = UpstreamEvent> + Send>>;
}

#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    pub q: String,
}

/// A upstream that immediately ends the stream. Useful as a placeholder
/// until a real RAG backend is wired in, and in tests that only exercise
/// the rest of the request pipeline.
pub struct EmptyChatUpstream;

impl ChatUpstream for EmptyChatUpstream {
    fn stream(&self, _query: &str) -> Pin<Box<dyn Stream<Item = UpstreamEvent> + Send>> {
        Box::pin(futures::stream::once(async { UpstreamEvent::Done }))
    }
}

fn sanitize(event: UpstreamEvent) -> Option<Event> {
    match event {
        UpstreamEvent::Token(text) => Some(Event::default().event("token").data(text)),
        UpstreamEvent::Meta(raw) => {
            let sanitized = ChatMetaEvent { url: raw.url, title: raw.title, published_at: raw.published_at };
            Some(
                Event::default()
                    .event("meta")
                    .data(serde_json::to_string(&sanitized).unwrap_or_else(|_| json!({}).to_string())),
            )
        }
        UpstreamEvent::Done => None,
    }
}

pub async fn stream(
    State(state): State<AppState>,
    Extension(AuthenticatedSession(_session)): Extension<AuthenticatedSession>,
    Query(query): Query<ChatQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let upstream = state.chat.stream(&query.q);
    let events = upstream
        .take_while(|event| futures::future::ready(!matches!(event, UpstreamEvent::Done)))
        .filter_map(|event| futures::future::ready(sanitize(event)))
        .map(Ok);

    Sse::new(events).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedUpstream;
    impl ChatUpstream for FixedUpstream {
        fn stream(&self, _query: &str) -> Pin<Box<dyn Stream<Item = UpstreamEvent> + Send>> {
            Box::pin(futures::stream::iter(vec![
                UpstreamEvent::Token("hello".to_string()),
                UpstreamEvent::Meta(RawCitation {
                    url: "https://example.com/a".to_string(),
                    title: "A".to_string(),
                    published_at: None,
                    internal_doc_id: "doc-123".to_string(),
                    relevance_score: 0.9,
                }),
                UpstreamEvent::Done,
                UpstreamEvent::Token("unreachable after done".to_string()),
            ]))
        }
    }

    #[tokio::test]
    async fn sanitizes_meta_and_stops_at_done() {
        let raw = FixedUpstream.stream("query");
        let sanitized: Vec<Event> = raw
            .take_while(|event| futures::future::ready(!matches!(event, UpstreamEvent::Done)))
            .filter_map(|event| futures::future::ready(sanitize(event)))
            .collect()
            .await;

        // token + meta, never the post-Done token.
        assert_eq!(sanitized.len(), 2);
    }

    #[test]
    fn meta_event_strips_internal_fields() {
        let raw = RawCitation {
            url: "https://example.com/a".to_string(),
            title: "A".to_string(),
            published_at: None,
            internal_doc_id: "doc-123".to_string(),
            relevance_score: 0.9,
        };
        let sanitized = ChatMetaEvent { url: raw.url.clone(), title: raw.title.clone(), published_at: raw.published_at };
        let rendered = serde_json::to_string(&sanitized).unwrap();
        assert!(!rendered.contains("doc-123"));
        assert!(!rendered.contains("0.9"));
        assert!(rendered.contains("example.com"));

        // `sanitize` itself must produce an event at all for a Meta input.
        assert!(sanitize(UpstreamEvent::Meta(raw)).is_some());
    }
}
