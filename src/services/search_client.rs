//! Client side of `GET /search_books`
//!
//! The widget only sees the `SearchEndpoint` trait; `HttpSearchEndpoint` is
//! the reqwest-backed implementation used against a running server.

use std::time::Duration;

use reqwest::{Client as HttpClient, Url};

use crate::{config::Config, error::SearchError, models::BookSummary};

pub const SEARCH_PATH: &str = "/search_books";

/// Anything that can turn a query into book suggestions
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchEndpoint: Send + Sync {
    /// Fetch suggestions for an already-trimmed query
    async fn search(&self, query: &str) -> Result<Vec<BookSummary>, SearchError>;
}

#[derive(Clone)]
pub struct HttpSearchEndpoint {
    http_client: HttpClient,
    /// `base_url` joined with `SEARCH_PATH`, query left empty
    endpoint_url: Url,
}

impl HttpSearchEndpoint {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SearchError> {
        let endpoint_url = Url::parse(base_url)
            .and_then(|url| url.join(SEARCH_PATH))
            .map_err(|e| {
                SearchError::Network(format!("invalid endpoint URL {}: {}", base_url, e))
            })?;
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            endpoint_url,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        Self::new(&config.search_endpoint_url, config.request_timeout())
    }

    /// Full request URL for a query, with the query percent-encoded
    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.endpoint_url.clone();
        url.query_pairs_mut().clear().append_pair("query", query);
        url
    }
}

#[async_trait::async_trait]
impl SearchEndpoint for HttpSearchEndpoint {
    async fn search(&self, query: &str) -> Result<Vec<BookSummary>, SearchError> {
        let url = self.search_url(query);
        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Network(format!(
                "search endpoint returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let books: Vec<BookSummary> = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, query = %query, "Malformed search response");
            SearchError::from(e)
        })?;

        tracing::debug!(query = %query, results = books.len(), "Search completed");

        Ok(books)
    }
}
