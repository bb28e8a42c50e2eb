use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Catalog(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Failures of a single autocomplete request
///
/// Neither kind is fatal: the widget hides its suggestions and carries on.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Transport failure or non-success status from the endpoint
    #[error("Network error: {0}")]
    Network(String),

    /// Body was not a JSON array of book summaries
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SearchError::InvalidResponse(e.to_string())
        } else {
            SearchError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(e: serde_json::Error) -> Self {
        SearchError::InvalidResponse(e.to_string())
    }
}

/// Raised when the view lacks an element the widget binds to
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    #[error("Missing element #{0}")]
    MissingElement(&'static str),

    #[error("Missing element .{0}")]
    MissingClass(&'static str),
}
