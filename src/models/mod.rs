use serde::{Deserialize, Serialize};

/// One autocomplete suggestion as returned by `GET /search_books`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    pub image_url: String,
}

impl BookSummary {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            image_url: image_url.into(),
        }
    }
}

/// Transient state owned by the search widget
///
/// Rebuilt on every mount; only user input and fetch completions change it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Trimmed text of the most recent input event
    pub query_text: String,
    /// Whether the suggestion list is currently shown
    pub results_visible: bool,
    /// Whether the recommendation buttons have been revealed
    pub recommend_targets_visible: bool,
}

// ============================================================================
// Catalog Types
// ============================================================================

/// A book record as stored in the catalog file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogBook {
    pub title: String,
    pub author: String,
    /// Cover image; anything that is not an absolute http(s) URL is replaced
    /// with the placeholder image when served.
    #[serde(default)]
    pub img_url: Option<String>,
}

/// On-disk catalog layout
///
/// `primary` holds the curated content records searched first, `secondary`
/// the full book list used to top up sparse results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub primary: Vec<CatalogBook>,
    #[serde(default)]
    pub secondary: Vec<CatalogBook>,
}
