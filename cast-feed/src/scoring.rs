use crate::channels::CURATED_CHANNELS;
use crate::types::Cast;
use crate::utils::{text::char_len, url::is_media_url};
use rand::Rng;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

const MEDIA_BONUS: f64 = 10.0;
const CURATED_BONUS: f64 = 15.0;
const REACTION_CAP: f64 = 10.0;
const JITTER_RANGE: f64 = 5.0;

/// Heuristic "aesthetic" ranking of casts.
///
/// The score is additive: media embeds, text length tiers, capped generic
/// reactions, raw recasts and likes, a curated-channel boost and a jitter drawn
/// uniformly from `[0, 5)`. The jitter means two scores of the same cast can
/// differ, so ranking is not stable across passes.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    curated: HashSet<String>,
}

impl ScoringEngine {
    pub fn new<I, S>(curated: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            curated: curated.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_curated(&self, channel: &str) -> bool {
        self.curated.contains(channel)
    }

    /// Everything but the jitter.
    pub fn base_score(&self, cast: &Cast) -> f64 {
        let mut score = 0.0;

        if has_media(cast) {
            score += MEDIA_BONUS;
        }

        score += match cast.text.as_deref().map(char_len).unwrap_or(0) {
            0 => 0.0,
            1..=50 => 1.0,
            51..=100 => 3.0,
            _ => 5.0,
        };

        score += (cast.reactions.generic as f64 * 2.0).min(REACTION_CAP);
        score += cast.reactions.recasts as f64;
        score += cast.reactions.likes as f64;

        if cast.channel.as_deref().is_some_and(|c| self.is_curated(c)) {
            score += CURATED_BONUS;
        }

        score
    }

    pub fn score<R: Rng + ?Sized>(&self, cast: &Cast, rng: &mut R) -> f64 {
        self.base_score(cast) + rng.gen_range(0.0..JITTER_RANGE)
    }

    /// Sort a batch by descending score. Each cast is scored exactly once so
    /// the jitter cannot make the comparator inconsistent.
    pub fn rank<R: Rng + ?Sized>(&self, casts: Vec<Cast>, rng: &mut R) -> Vec<Cast> {
        let mut scored: Vec<(f64, Cast)> = casts
            .into_iter()
            .map(|cast| (self.score(&cast, rng), cast))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        if let Some((top, cast)) = scored.first() {
            debug!("Ranked {} casts, top {} scored {:.2}", scored.len(), cast.id, top);
        }

        scored.into_iter().map(|(_, cast)| cast).collect()
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(CURATED_CHANNELS.iter().copied())
    }
}

/// At least one embed is an image or a video.
pub fn has_media(cast: &Cast) -> bool {
    cast.embeds.iter().any(|embed| is_media_url(&embed.url))
}

/// Drop every cast without a media embed.
pub fn filter_media(casts: Vec<Cast>) -> Vec<Cast> {
    casts.into_iter().filter(has_media).collect()
}
