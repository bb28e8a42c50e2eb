use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::BookSummary,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

/// Health check endpoint; unhealthy while the catalog is empty
pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<Value>> {
    if state.catalog.is_empty() {
        return Err(AppError::Catalog("no books loaded".to_string()));
    }

    Ok(Json(json!({
        "status": "healthy",
        "books": state.catalog.len(),
    })))
}

/// Autocomplete suggestions for `?query=`
///
/// A missing or empty query yields an empty array. The scan runs on the
/// blocking pool since it is linear in the catalog size.
pub async fn search_books(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<BookSummary>>> {
    let catalog = Arc::clone(&state.catalog);
    let query = params.query;

    let results = tokio::task::spawn_blocking(move || catalog.search(&query))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(
        request_id = %request_id,
        results = results.len(),
        "Book search completed"
    );

    Ok(Json(results))
}
