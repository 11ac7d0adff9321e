pub mod defs;

pub use defs::{AuthorRef, Cast, CastId, ChannelInfo, Embed, FeedContext, MediaMetadata, Page, ReactionCounts};
