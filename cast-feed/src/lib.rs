pub mod types;
pub mod traits;
pub mod channels;
pub mod utils;
pub mod scoring;
pub mod dedup;
pub mod sampler;
pub mod state;
pub mod debounce;
pub mod aggregator;
pub mod fetcher;
pub mod parser;
pub mod sources;
pub mod explore;
pub mod session;
pub mod config;

pub use types::*;
pub use traits::{ChannelDirectory, ContentSource};
pub use scoring::ScoringEngine;
pub use state::FeedState;
pub use debounce::Debouncer;
pub use aggregator::FeedAggregator;
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use sources::{ApiCastSource, StaticSource};
pub use session::{SessionCache, SessionStore, UserSession};
pub use config::AppConfig;
