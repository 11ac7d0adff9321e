use crate::traits::{ChannelDirectory, ContentSource};
use crate::types::{ChannelInfo, FeedError, Page, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::debug;

/// One recorded `fetch_page` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub channel: String,
    pub page_size: usize,
    pub cursor: Option<String>,
}

/// In-memory source replaying scripted pages.
///
/// Pages are keyed by channel and cursor; anything unscripted is an empty,
/// final page. Channels marked failing answer with HTTP 503.
#[derive(Default)]
pub struct StaticSource {
    pages: HashMap<(String, Option<String>), Page>,
    channels: HashMap<String, ChannelInfo>,
    failing: Mutex<HashSet<String>>,
    delay: Option<Duration>,
    requests: Mutex<Vec<PageRequest>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, channel: &str, cursor: Option<&str>, page: Page) -> Self {
        self.pages
            .insert((channel.to_string(), cursor.map(str::to_string)), page);
        self
    }

    pub fn with_channel_info(mut self, info: ChannelInfo) -> Self {
        self.channels.insert(info.id.clone(), info);
        self
    }

    pub fn with_failure(self, channel: &str) -> Self {
        self.set_failing(channel, true);
        self
    }

    /// Delay every response, so callers can observe in-flight passes.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_failing(&self, channel: &str, failing: bool) {
        let mut set = self.failing.lock().unwrap_or_else(PoisonError::into_inner);
        if failing {
            set.insert(channel.to_string());
        } else {
            set.remove(channel);
        }
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn is_failing(&self, channel: &str) -> bool {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(channel)
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ContentSource for StaticSource {
    fn source_name(&self) -> String {
        "Static".to_string()
    }

    async fn fetch_page(&self, channel: &str, page_size: usize, cursor: Option<&str>) -> Result<Page> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PageRequest {
                channel: channel.to_string(),
                page_size,
                cursor: cursor.map(str::to_string),
            });

        self.wait().await;

        if self.is_failing(channel) {
            debug!("Static source failing channel {}", channel);
            return Err(FeedError::Status {
                status: 503,
                url: format!("static://{}", channel),
            });
        }

        let key = (channel.to_string(), cursor.map(str::to_string));
        let mut page = self.pages.get(&key).cloned().unwrap_or_default();
        page.items.truncate(page_size);
        Ok(page)
    }
}

#[async_trait]
impl ChannelDirectory for StaticSource {
    async fn fetch_channel(&self, channel: &str) -> Result<ChannelInfo> {
        self.wait().await;

        if self.is_failing(channel) {
            return Err(FeedError::Status {
                status: 503,
                url: format!("static://{}", channel),
            });
        }

        self.channels.get(channel).cloned().ok_or_else(|| FeedError::Status {
            status: 404,
            url: format!("static://{}", channel),
        })
    }
}
