use std::collections::HashSet;
use std::path::Path;

use tracing::instrument;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{BookSummary, CatalogBook, CatalogFile},
};

/// In-memory book catalog backing `GET /search_books`
///
/// Titles are matched case-insensitively as literal substrings. The primary
/// list is searched first; when it yields fewer than `fallback_threshold`
/// matches the secondary list is appended, duplicates by title are dropped
/// (first occurrence wins) and the result is capped at `search_limit`.
#[derive(Debug, Clone)]
pub struct Catalog {
    primary: Vec<CatalogBook>,
    secondary: Vec<CatalogBook>,
    search_limit: usize,
    fallback_threshold: usize,
    placeholder_image: String,
}

impl Catalog {
    pub fn new(file: CatalogFile, config: &Config) -> Self {
        Self {
            primary: file.primary,
            secondary: file.secondary,
            search_limit: config.search_limit,
            fallback_threshold: config.fallback_threshold,
            placeholder_image: config.placeholder_image.clone(),
        }
    }

    /// Reads and parses the catalog JSON file named in the config
    pub async fn load(config: &Config) -> AppResult<Self> {
        let path = Path::new(&config.catalog_path);
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Catalog(format!("cannot read {}: {}", path.display(), e)))?;
        let file: CatalogFile = serde_json::from_str(&raw)
            .map_err(|e| AppError::Catalog(format!("cannot parse {}: {}", path.display(), e)))?;

        tracing::info!(
            path = %path.display(),
            primary = file.primary.len(),
            secondary = file.secondary.len(),
            "Loaded book catalog"
        );

        Ok(Self::new(file, config))
    }

    /// Total number of records across both lists
    pub fn len(&self) -> usize {
        self.primary.len() + self.secondary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[instrument(skip(self), fields(results = tracing::field::Empty))]
    pub fn search(&self, query: &str) -> Vec<BookSummary> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<&CatalogBook> = matching(&self.primary, &needle).collect();
        if matches.len() < self.fallback_threshold {
            matches.extend(matching(&self.secondary, &needle));
        }

        let mut seen = HashSet::new();
        let results: Vec<BookSummary> = matches
            .into_iter()
            .filter(|book| seen.insert(book.title.clone()))
            .take(self.search_limit)
            .map(|book| self.summarize(book))
            .collect();

        tracing::Span::current().record("results", results.len());
        results
    }

    fn summarize(&self, book: &CatalogBook) -> BookSummary {
        let image_url = match &book.img_url {
            Some(url) if url.starts_with("http") => url.clone(),
            _ => self.placeholder_image.clone(),
        };

        BookSummary {
            title: book.title.clone(),
            author: book.author.clone(),
            image_url,
        }
    }
}

fn matching<'a>(
    books: &'a [CatalogBook],
    needle: &'a str,
) -> impl Iterator<Item = &'a CatalogBook> + 'a {
    books
        .iter()
        .filter(move |book| book.title.to_lowercase().contains(needle))
}
