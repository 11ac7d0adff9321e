pub mod api_feed;
pub mod static_feed;

pub use api_feed::ApiCastSource;
pub use static_feed::{PageRequest, StaticSource};
