#![allow(dead_code)]

// Shared builders for the integration tests
pub use cast_feed::sources::static_feed::PageRequest;
pub use cast_feed::{Cast, FeedAggregator, FeedConfig, FeedContext, Page, ReactionCounts, StaticSource};

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

pub const TEST_SEED: u64 = 7;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();
}

/// A cast with one image embed.
pub fn media_cast(id: &str, channel: &str) -> Cast {
    Cast::new(id)
        .with_embed(format!("https://img.example.com/{}.png", id))
        .with_channel(channel)
}

/// A cast whose only embed is a web page.
pub fn link_cast(id: &str, channel: &str) -> Cast {
    Cast::new(id)
        .with_text("check this out")
        .with_embed(format!("https://example.com/articles/{}", id))
        .with_channel(channel)
}

pub fn page(items: Vec<Cast>, next_cursor: Option<&str>) -> Page {
    Page::new(items, next_cursor.map(str::to_string))
}

pub fn pool(channels: &[&str]) -> Arc<[String]> {
    channels.iter().map(|c| c.to_string()).collect()
}

pub fn ids(casts: &[Cast]) -> Vec<String> {
    casts.iter().map(|c| c.id.clone()).collect()
}

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(TEST_SEED)
}

/// Aggregator over `source` sampling from `channels`, with a seeded rng.
pub fn aggregator(source: Arc<StaticSource>, channels: &[&str], config: FeedConfig) -> FeedAggregator {
    FeedAggregator::new(source, config)
        .with_pool(pool(channels))
        .with_rng(rng())
}
