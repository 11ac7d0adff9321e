use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a cast. Content-addressed, so stable across fetches.
pub type CastId = String;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub content_type: Option<String>,
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub url: String,
    pub metadata: Option<MediaMetadata>,
}

impl Embed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            metadata: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub likes: u64,
    pub recasts: u64,
    /// Generic reaction entries, distinct from likes and recasts.
    pub generic: u64,
}

/// Author identity. Not interpreted by the feed, only carried along.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub fid: u64,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub pfp_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cast {
    pub id: CastId,
    pub text: Option<String>,
    pub embeds: Vec<Embed>,
    pub channel: Option<String>,
    pub reactions: ReactionCounts,
    pub author: AuthorRef,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Cast {
    pub fn new(id: impl Into<CastId>) -> Self {
        Self {
            id: id.into(),
            text: None,
            embeds: Vec::new(),
            channel: None,
            reactions: ReactionCounts::default(),
            author: AuthorRef::default(),
            timestamp: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_embed(mut self, url: impl Into<String>) -> Self {
        self.embeds.push(Embed::new(url));
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn with_reactions(mut self, reactions: ReactionCounts) -> Self {
        self.reactions = reactions;
        self
    }

    pub fn with_author(mut self, author: AuthorRef) -> Self {
        self.author = author;
        self
    }
}

/// One page of a channel as returned by a content source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<Cast>,
    /// `None` means the channel has no further pages.
    pub next_cursor: Option<String>,
}

impl Page {
    pub fn new(items: Vec<Cast>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub follower_count: Option<u64>,
    pub image_url: Option<String>,
}

/// Which slice of the network a feed shows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedContext {
    /// Random picks from the curated channel pool.
    #[default]
    Global,
    /// A single pinned channel.
    Channel(String),
}

impl FeedContext {
    pub fn pinned_channel(&self) -> Option<&str> {
        match self {
            FeedContext::Global => None,
            FeedContext::Channel(channel) => Some(channel),
        }
    }
}

// Object style note:
// These are plain data. Anything that talks to the network or owns feed state
// lives in the consuming crate and takes these by value or by reference.
