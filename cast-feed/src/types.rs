use serde::{Deserialize, Serialize};
// Use the interfaces crate for core types
pub use interfaces::defs::{AuthorRef, Cast, CastId, ChannelInfo, Embed, FeedContext, MediaMetadata, Page, ReactionCounts};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            api_key: None,
            user_agent: "Cast-Feed/1.0".to_string(),
            timeout_seconds: 30,
            // Callers decide whether to run another pass.
            max_retries: 0,
            retry_delay_seconds: 1,
            max_redirects: 5,
        }
    }
}

/// Knobs for one feed aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Channels sampled per pass in the global feed.
    pub fan_out: usize,
    /// Channels sampled by the cold-start pass.
    pub cold_start_fan_out: usize,
    /// Page size for the cold-start pass.
    pub initial_page_size: usize,
    /// Page size for scroll-triggered passes in the global feed. Derived from
    /// viewport geometry by the caller.
    pub scroll_page_size: usize,
    /// Page size when a single channel is pinned.
    pub pinned_page_size: usize,
    /// Page size used when building Explore thumbnails.
    pub thumbnail_page_size: usize,
    pub debounce_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            fan_out: crate::channels::MAX_CHANNELS_FOR_FEED,
            cold_start_fan_out: 1,
            initial_page_size: crate::channels::DEFAULT_PAGE_SIZE_INITIAL,
            scroll_page_size: crate::channels::DEFAULT_PAGE_SIZE,
            pinned_page_size: crate::channels::DEFAULT_PAGE_SIZE_FOR_CHANNEL,
            thumbnail_page_size: crate::channels::DEFAULT_THUMBNAIL_SEARCH,
            debounce_ms: 1000,
        }
    }
}

/// Observable lifecycle of an aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    /// Transient: the aggregator returns to `Idle` right after reporting it.
    Error,
}

/// What a single pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    Merged {
        channels_ok: usize,
        channels_failed: usize,
        /// Items that survived the media filter.
        fetched: usize,
        /// Ids that were not in the feed before this pass.
        added: usize,
    },
    /// Another pass was already in flight for this context.
    Skipped,
    /// The context switched while the pass was in flight.
    Discarded,
    /// Every candidate channel ran out of pages.
    Exhausted,
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Response parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("All {attempted} channel fetches failed, last error: {last_error}")]
    AllChannelsFailed { attempted: usize, last_error: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

impl FeedError {
    /// Network or HTTP failure of a single fetch.
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, FeedError::Http(_) | FeedError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
