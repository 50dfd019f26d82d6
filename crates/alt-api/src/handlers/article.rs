//! `Article.*` reads (batch fetch through the core fetcher) and
//! `Article.MarkRead` (write, CSRF-protected). Read-state persistence is
//! explicitly out of scope; this records nothing beyond acknowledging.

use axum::extract::State;
use axum::{Extension, Json};

use alt_types::CoreError;

use crate::dto::{ArticleDto, FetchArticlesRequest, MarkReadRequest};
use crate::middleware::session::AuthenticatedSession;
use crate::state::AppState;

pub async fn fetch_many(
    State(state): State<AppState>,
    Extension(AuthenticatedSession(_session)): Extension<AuthenticatedSession>,
    Json(request): Json<FetchArticlesRequest>,
) -> Result<Json<Vec<ArticleDto>>, CoreError> {
    if request.urls.is_empty() {
        return Err(CoreError::validation("urls must not be empty"));
    }

    let results = state.fetcher.fetch_multiple(&request.urls).await;
    let articles = request
        .urls
        .iter()
        .map(|url| match results.get(url) {
            Some(outcome) => ArticleDto {
                url: url.clone(),
                content: outcome.content.clone(),
                error: outcome.error.clone(),
            },
            None => ArticleDto {
                url: url.clone(),
                content: None,
                error: Some(alt_types::ports::fetch::missing_result_error(url).to_string()),
            },
        })
        .collect();

    Ok(Json(articles))
}

pub async fn mark_read(
    Extension(AuthenticatedSession(_session)): Extension<AuthenticatedSession>,
    Json(_request): Json<MarkReadRequest>,
) -> Result<(), CoreError> {
    Ok(())
}
