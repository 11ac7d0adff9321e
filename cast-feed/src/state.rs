use crate::dedup::{merge_into, CastMap};
use crate::types::{Cast, FeedContext};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Materialized feed of one aggregator: ordered casts plus pagination cursors.
#[derive(Debug, Default)]
pub struct FeedState {
    items: CastMap,
    cursors: HashMap<String, String>,
    exhausted: HashSet<String>,
    context: FeedContext,
    generation: u64,
}

impl FeedState {
    pub fn new(context: FeedContext) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    pub fn context(&self) -> &FeedContext {
        &self.context
    }

    /// Bumped on every context switch. Passes compare it before merging.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn items(&self) -> Vec<Cast> {
        self.items.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self, channel: &str) -> Option<&str> {
        self.cursors.get(channel).map(String::as_str)
    }

    pub fn is_exhausted(&self, channel: &str) -> bool {
        self.exhausted.contains(channel)
    }

    /// Move to `context`, dropping items and cursors. Returns false (and keeps
    /// everything) when the context is unchanged.
    pub fn switch_context(&mut self, context: FeedContext) -> bool {
        if self.context == context {
            return false;
        }

        info!(
            "Switching feed context from {:?} to {:?}, dropping {} casts",
            self.context,
            context,
            self.items.len()
        );

        self.items.clear();
        self.cursors.clear();
        self.exhausted.clear();
        self.context = context;
        self.generation += 1;
        true
    }

    /// Merge a ranked batch. Returns the number of new ids.
    pub fn merge(&mut self, ranked: Vec<Cast>) -> usize {
        let added = merge_into(&mut self.items, ranked);
        debug!("Merged batch: {} new, {} total", added, self.items.len());
        added
    }

    /// Record where `channel` continues. `None` marks it exhausted.
    pub fn update_cursor(&mut self, channel: &str, next_cursor: Option<String>) {
        match next_cursor {
            Some(token) => {
                self.exhausted.remove(channel);
                self.cursors.insert(channel.to_string(), token);
            }
            None => {
                debug!("Channel {} has no further pages", channel);
                self.cursors.remove(channel);
                self.exhausted.insert(channel.to_string());
            }
        }
    }
}
