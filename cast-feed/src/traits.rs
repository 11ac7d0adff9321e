use crate::types::{ChannelInfo, Page, Result};
use async_trait::async_trait;

/// Trait for pulling pages of casts out of a backend, one channel at a time
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Human-readable name for this source
    fn source_name(&self) -> String;

    /// Fetch one page of `channel`. `cursor` is `None` for the first page.
    ///
    /// Network failures and HTTP statuses >= 400 come back as errors. An empty
    /// page is not an error.
    async fn fetch_page(&self, channel: &str, page_size: usize, cursor: Option<&str>) -> Result<Page>;
}

/// Trait for looking up channel metadata
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    async fn fetch_channel(&self, channel: &str) -> Result<ChannelInfo>;
}
