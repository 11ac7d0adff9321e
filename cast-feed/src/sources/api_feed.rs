use crate::fetcher::Fetcher;
use crate::parser::FeedParser;
use crate::traits::{ChannelDirectory, ContentSource};
use crate::types::{ChannelInfo, FetchConfig, Page, Result};
use async_trait::async_trait;
use tracing::info;

/// Cast backend reached over HTTP.
///
/// Pages come from `GET /feed?channel=..&pageSize=..&pageToken=..`, channel
/// metadata from `GET /channel-feed?channel=..`.
pub struct ApiCastSource {
    fetcher: Fetcher,
    parser: FeedParser,
}

impl ApiCastSource {
    pub fn new(fetch_config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(fetch_config)?,
            parser: FeedParser::new(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.fetcher.config().api_url
    }
}

#[async_trait]
impl ContentSource for ApiCastSource {
    fn source_name(&self) -> String {
        crate::utils::url::extract_host(self.api_url())
            .map(|host| format!("Cast API ({})", host))
            .unwrap_or_else(|| "Cast API".to_string())
    }

    async fn fetch_page(&self, channel: &str, page_size: usize, cursor: Option<&str>) -> Result<Page> {
        let mut query = vec![
            ("channel", channel.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        if let Some(cursor) = cursor {
            query.push(("pageToken", cursor.to_string()));
        }

        let body = self.fetcher.get_text("feed", &query).await?;
        let page = self.parser.parse_page(&body)?;

        info!(
            "Pulled {} casts from channel {} (more: {})",
            page.items.len(),
            channel,
            page.next_cursor.is_some()
        );
        Ok(page)
    }
}

#[async_trait]
impl ChannelDirectory for ApiCastSource {
    async fn fetch_channel(&self, channel: &str) -> Result<ChannelInfo> {
        let body = self
            .fetcher
            .get_text("channel-feed", &[("channel", channel.to_string())])
            .await?;
        self.parser.parse_channel(&body, channel)
    }
}
