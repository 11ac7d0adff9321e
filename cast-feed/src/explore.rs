use crate::scoring::{filter_media, ScoringEngine};
use crate::traits::{ChannelDirectory, ContentSource};
use crate::types::{ChannelInfo, Page, Result};
use futures::future::join_all;
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelPreview {
    pub name: String,
    pub description: Option<String>,
    pub followers: Option<u64>,
    pub image_url: Option<String>,
    /// First embed of the best-ranked media cast, if the channel has any.
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPreviews {
    pub category: String,
    pub channels: Vec<ChannelPreview>,
}

/// Build the Explore listing: metadata and a thumbnail for every channel of
/// every group.
///
/// Channels are fetched concurrently. A channel whose metadata or casts fail
/// to load is left out; categories with nothing left are dropped.
pub async fn load_previews<S, R>(
    source: &S,
    groups: &[(&str, &[&str])],
    page_size: usize,
    scorer: &ScoringEngine,
    rng: &mut R,
) -> Vec<CategoryPreviews>
where
    S: ContentSource + ChannelDirectory + ?Sized,
    R: Rng + ?Sized,
{
    let mut channels: Vec<&str> = groups.iter().flat_map(|(_, c)| c.iter().copied()).collect();
    channels.sort_unstable();
    channels.dedup();

    info!("Loading Explore previews for {} channels", channels.len());

    let lookups = channels.iter().map(|&channel| async move {
        let (info, page) = tokio::join!(
            source.fetch_channel(channel),
            source.fetch_page(channel, page_size, None)
        );
        (channel, combine(info, page))
    });

    let mut previews: HashMap<&str, ChannelPreview> = HashMap::new();
    for (channel, result) in join_all(lookups).await {
        match result {
            Ok((info, page)) => {
                let ranked = scorer.rank(filter_media(page.items), rng);
                let thumbnail = ranked
                    .first()
                    .and_then(|cast| cast.embeds.first())
                    .map(|embed| embed.url.clone());

                previews.insert(
                    channel,
                    ChannelPreview {
                        name: channel.to_string(),
                        description: info.description,
                        followers: info.follower_count,
                        image_url: info.image_url,
                        thumbnail,
                    },
                );
            }
            Err(e) => error!("Failed to load preview for {}: {}", channel, e),
        }
    }

    info!("Loaded {}/{} channel previews", previews.len(), channels.len());

    groups
        .iter()
        .map(|(category, members)| CategoryPreviews {
            category: category.to_string(),
            channels: members
                .iter()
                .filter_map(|member| previews.get(member).cloned())
                .collect(),
        })
        .filter(|group| !group.channels.is_empty())
        .collect()
}

fn combine(info: Result<ChannelInfo>, page: Result<Page>) -> Result<(ChannelInfo, Page)> {
    Ok((info?, page?))
}
