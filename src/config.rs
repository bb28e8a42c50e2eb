use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON file holding the book catalog
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Maximum number of suggestions returned per query
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Below this many primary matches the secondary list is searched too
    #[serde(default = "default_fallback_threshold")]
    pub fallback_threshold: usize,

    /// Image served for books without a usable cover URL
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,

    /// Base URL the search client talks to
    #[serde(default = "default_search_endpoint_url")]
    pub search_endpoint_url: String,

    /// Search client request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_catalog_path() -> String {
    "data/catalog.json".to_string()
}

fn default_search_limit() -> usize {
    9
}

fn default_fallback_threshold() -> usize {
    5
}

fn default_placeholder_image() -> String {
    "/static/images/no-image.jpg".to_string()
}

fn default_search_endpoint_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Behavior knobs for the search widget
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct UiOptions {
    /// Shortest trimmed query (in characters) that triggers a request
    pub min_query_chars: usize,
    /// How long the invalid-input shake stays on the search field
    pub invalid_flash_ms: u64,
    /// Delay before the hybrid button gets its pulse
    pub attention_delay_ms: u64,
    /// Per-card entrance animation offset
    pub card_stagger_ms: u64,
    /// Drop responses that arrive after a newer one was already rendered
    pub discard_stale_responses: bool,
    /// Show an inline notice on the search field when a search fails
    pub show_error_notice: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            min_query_chars: 2,
            invalid_flash_ms: 500,
            attention_delay_ms: 1000,
            card_stagger_ms: 200,
            discard_stale_responses: true,
            show_error_notice: true,
        }
    }
}

impl UiOptions {
    /// Load widget options from `AUTOCOMPLETE_*` environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed("AUTOCOMPLETE_")
            .from_env::<UiOptions>()
            .map_err(|e| anyhow::anyhow!("Failed to load UI options: {}", e))
    }

    pub fn invalid_flash(&self) -> Duration {
        Duration::from_millis(self.invalid_flash_ms)
    }

    pub fn attention_delay(&self) -> Duration {
        Duration::from_millis(self.attention_delay_ms)
    }

    pub fn card_stagger(&self) -> Duration {
        Duration::from_millis(self.card_stagger_ms)
    }
}
