use crate::types::{AuthorRef, Cast, ChannelInfo, Embed, FeedError, MediaMetadata, Page, ReactionCounts, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct WirePage {
    #[serde(default)]
    data: Vec<WireCast>,
    #[serde(default)]
    next: Option<WireNext>,
}

#[derive(Debug, Deserialize)]
struct WireNext {
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireCast {
    hash: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    embeds: Vec<WireEmbed>,
    #[serde(default)]
    channel: Option<WireChannelRef>,
    #[serde(default)]
    reactions: Option<WireReactions>,
    #[serde(default)]
    reaction_count: Option<u64>,
    #[serde(default)]
    author: Option<WireAuthor>,
}

#[derive(Debug, Deserialize)]
struct WireEmbed {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    metadata: Option<WireEmbedMetadata>,
}

#[derive(Debug, Deserialize)]
struct WireEmbedMetadata {
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    image: Option<WireDimensions>,
    #[serde(default)]
    video: Option<WireDimensions>,
}

#[derive(Debug, Deserialize)]
struct WireDimensions {
    #[serde(default)]
    width_px: Option<u32>,
    #[serde(default)]
    height_px: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireChannelRef {
    Id(String),
    Object(WireChannel),
}

#[derive(Debug, Deserialize)]
struct WireChannel {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    follower_count: Option<u64>,
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireChannelEnvelope {
    channel: WireChannel,
}

#[derive(Debug, Deserialize)]
struct WireReactions {
    #[serde(default)]
    likes_count: Option<u64>,
    #[serde(default)]
    recasts_count: Option<u64>,
    #[serde(default)]
    likes: Vec<Value>,
    #[serde(default)]
    recasts: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct WireAuthor {
    #[serde(default)]
    fid: u64,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    pfp_url: Option<String>,
}

/// Maps the backend's JSON responses onto the feed data model.
#[derive(Debug, Default, Clone)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a `/feed` response: `{ "data": [...], "next": { "cursor": ... } }`.
    pub fn parse_page(&self, body: &str) -> Result<Page> {
        debug!("Parsing feed page ({} bytes)", body.len());

        let wire: WirePage = serde_json::from_str(body)?;
        let items: Vec<Cast> = wire.data.into_iter().map(convert_cast).collect();
        let next_cursor = wire
            .next
            .and_then(|next| next.cursor)
            .filter(|cursor| !cursor.is_empty());

        debug!("Parsed page with {} casts, next cursor: {:?}", items.len(), next_cursor);
        Ok(Page::new(items, next_cursor))
    }

    /// Parse a `/channel-feed` response: `{ "channel": {...} }`.
    pub fn parse_channel(&self, body: &str, requested: &str) -> Result<ChannelInfo> {
        let envelope: WireChannelEnvelope = serde_json::from_str(body)
            .map_err(|e| FeedError::Parse(format!("Bad channel response for {}: {}", requested, e)))?;
        let channel = envelope.channel;

        Ok(ChannelInfo {
            id: channel.id.unwrap_or_else(|| requested.to_string()),
            name: channel.name,
            description: channel.description,
            follower_count: channel.follower_count,
            image_url: channel.image_url,
        })
    }
}

fn convert_cast(wire: WireCast) -> Cast {
    let embeds = wire
        .embeds
        .into_iter()
        // Quoted casts come through as embeds without a URL
        .filter_map(|embed| {
            let url = embed.url.filter(|u| !u.is_empty())?;
            Some(Embed {
                url,
                metadata: embed.metadata.map(convert_metadata),
            })
        })
        .collect();

    let channel = wire.channel.and_then(|channel| match channel {
        WireChannelRef::Id(id) => Some(id),
        WireChannelRef::Object(object) => object.id.or(object.name),
    });

    let reactions = wire
        .reactions
        .map(|r| ReactionCounts {
            likes: r.likes_count.unwrap_or(r.likes.len() as u64),
            recasts: r.recasts_count.unwrap_or(r.recasts.len() as u64),
            generic: 0,
        })
        .unwrap_or_default();

    let author = wire
        .author
        .map(|a| AuthorRef {
            fid: a.fid,
            username: a.username,
            display_name: a.display_name,
            pfp_url: a.pfp_url,
        })
        .unwrap_or_default();

    let timestamp = wire.timestamp.and_then(|ts| match DateTime::parse_from_rfc3339(&ts) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(e) => {
            warn!("Ignoring unparseable timestamp {:?} on cast {}: {}", ts, wire.hash, e);
            None
        }
    });

    Cast {
        id: wire.hash,
        text: wire.text.filter(|t| !t.is_empty()),
        embeds,
        channel,
        reactions: ReactionCounts {
            generic: wire.reaction_count.unwrap_or(0),
            ..reactions
        },
        author,
        timestamp,
    }
}

fn convert_metadata(wire: WireEmbedMetadata) -> MediaMetadata {
    let dimensions = wire.image.or(wire.video);
    MediaMetadata {
        content_type: wire.content_type,
        width_px: dimensions.as_ref().and_then(|d| d.width_px),
        height_px: dimensions.as_ref().and_then(|d| d.height_px),
    }
}
