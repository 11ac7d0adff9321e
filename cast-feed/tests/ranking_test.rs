mod common;

use cast_feed::dedup::merge;
use cast_feed::sampler::sample;
use cast_feed::scoring::{filter_media, has_media};
use cast_feed::utils::url::is_media_url;
use cast_feed::{Cast, ReactionCounts, ScoringEngine};
use common::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};
use tracing::info;

fn reactions(likes: u64, recasts: u64, generic: u64) -> ReactionCounts {
    ReactionCounts {
        likes,
        recasts,
        generic,
    }
}

#[test]
fn test_media_classification() {
    init_tracing();

    assert!(is_media_url("https://img.example.com/a.png"));
    assert!(is_media_url("https://img.example.com/a.JPEG"));
    assert!(is_media_url("https://cdn.example.com/clip.mp4"));
    assert!(is_media_url("https://imagedelivery.net/abc/def/original"));
    assert!(is_media_url("https://cdn.imagedelivery.net/abc"));

    assert!(!is_media_url(""));
    assert!(!is_media_url("https://example.com/page.html"));
    assert!(!is_media_url("https://notimagedelivery.net/abc"));
    assert!(!is_media_url("https://example.com/png"));

    let casts = vec![
        media_cast("a", "art"),
        link_cast("b", "art"),
        Cast::new("c").with_text("no embeds at all"),
        link_cast("d", "art").with_embed("https://img.example.com/late.gif"),
    ];
    assert!(has_media(&casts[3]));

    let kept = filter_media(casts);
    assert_eq!(ids(&kept), vec!["a", "d"]);
}

#[test]
fn test_base_score_components() {
    init_tracing();
    let scorer = ScoringEngine::new(["aesthetic"]);

    assert_eq!(scorer.base_score(&Cast::new("empty")), 0.0);
    assert_eq!(scorer.base_score(&media_cast("m", "elsewhere")), 10.0);

    let text = |n: usize| Cast::new("t").with_text("x".repeat(n));
    assert_eq!(scorer.base_score(&text(1)), 1.0);
    assert_eq!(scorer.base_score(&text(50)), 1.0);
    assert_eq!(scorer.base_score(&text(51)), 3.0);
    assert_eq!(scorer.base_score(&text(100)), 3.0);
    assert_eq!(scorer.base_score(&text(101)), 5.0);

    // Tiers count characters, not bytes
    let wide = Cast::new("w").with_text("é".repeat(50));
    assert_eq!(scorer.base_score(&wide), 1.0);

    let generic = |n: u64| Cast::new("g").with_reactions(reactions(0, 0, n));
    assert_eq!(scorer.base_score(&generic(3)), 6.0);
    assert_eq!(scorer.base_score(&generic(5)), 10.0);
    assert_eq!(scorer.base_score(&generic(40)), 10.0);

    let liked = Cast::new("l").with_reactions(reactions(4, 2, 0));
    assert_eq!(scorer.base_score(&liked), 6.0);

    let curated = Cast::new("c").with_channel("aesthetic");
    assert_eq!(scorer.base_score(&curated), 15.0);
}

#[test]
fn test_score_jitter_bounds() {
    init_tracing();
    let scorer = ScoringEngine::default();
    let cast = media_cast("a", "art").with_text("golden hour");
    let base = scorer.base_score(&cast);
    let mut rng = rng();

    for _ in 0..1000 {
        let jitter = scorer.score(&cast, &mut rng) - base;
        assert!((0.0..5.0).contains(&jitter), "jitter {} out of range", jitter);
    }
}

#[test]
fn test_curated_channel_outscores_identical_cast() {
    init_tracing();
    let scorer = ScoringEngine::new(["aesthetic"]);
    let mut rng = rng();

    let curated = media_cast("a", "aesthetic").with_text("same words");
    let other = media_cast("a", "random").with_text("same words");

    for _ in 0..200 {
        let gap = scorer.score(&curated, &mut rng) - scorer.score(&other, &mut rng);
        assert!(gap > 10.0, "curated lead of {} is too small", gap);
    }
}

#[test]
fn test_rank_orders_by_descending_score() {
    init_tracing();
    let scorer = ScoringEngine::new(["aesthetic"]);

    // Base scores 10, 25, 46 and 18: far enough apart that jitter cannot reorder
    let batch = vec![
        media_cast("low", "other"),
        media_cast("curated", "aesthetic"),
        media_cast("popular", "other").with_reactions(reactions(30, 6, 0)),
        media_cast("mid", "other").with_reactions(reactions(5, 3, 0)),
    ];

    let mut rng = rng();
    let ranked = scorer.rank(batch, &mut rng);
    info!("Ranked: {:?}", ids(&ranked));

    assert_eq!(ids(&ranked), vec!["popular", "curated", "mid", "low"]);
}

#[test]
fn test_rank_keeps_every_cast() {
    init_tracing();
    let scorer = ScoringEngine::default();
    let batch: Vec<Cast> = (0..50).map(|i| media_cast(&format!("c{}", i), "art")).collect();

    let mut rng = rng();
    let ranked = scorer.rank(batch.clone(), &mut rng);

    let before: HashSet<String> = ids(&batch).into_iter().collect();
    let after: HashSet<String> = ids(&ranked).into_iter().collect();
    assert_eq!(ranked.len(), 50);
    assert_eq!(before, after);
}

#[test]
fn test_merge_keeps_positions_and_takes_new_content() {
    init_tracing();
    let a = media_cast("1", "art");
    let b = media_cast("2", "art");
    let b_updated = media_cast("2", "art").with_text("edited");
    let c = media_cast("3", "art");

    let merged = merge(vec![a.clone(), b], vec![b_updated.clone(), c.clone()]);

    assert_eq!(ids(&merged), vec!["1", "2", "3"]);
    assert_eq!(merged[0], a);
    assert_eq!(merged[1], b_updated);
    assert_eq!(merged[2], c);
}

#[test]
fn test_merge_is_idempotent() {
    init_tracing();
    let existing = vec![media_cast("1", "art"), media_cast("2", "art")];
    let batch = vec![
        media_cast("3", "art"),
        media_cast("1", "art").with_text("again"),
        media_cast("4", "art"),
    ];

    let once = merge(existing, batch.clone());
    let twice = merge(once.clone(), batch);

    assert_eq!(once, twice);
    assert_eq!(ids(&once), vec!["1", "2", "3", "4"]);
}

#[test]
fn test_merge_collapses_duplicates_within_a_batch() {
    init_tracing();
    let batch = vec![
        media_cast("x", "art"),
        media_cast("y", "art"),
        media_cast("x", "art").with_text("later copy"),
    ];

    let merged = merge(Vec::new(), batch);

    assert_eq!(ids(&merged), vec!["x", "y"]);
    assert_eq!(merged[0].text.as_deref(), Some("later copy"));
}

#[test]
fn test_sample_bounds_and_membership() {
    init_tracing();
    let pool = ["art", "photography", "film", "design", "fashion", "architecture"];
    let mut rng = rng();

    for count in 0..10 {
        let picked = sample(&pool, count, &mut rng);
        let distinct: HashSet<&String> = picked.iter().collect();

        assert_eq!(picked.len(), count.min(pool.len()));
        assert_eq!(distinct.len(), picked.len());
        assert!(picked.iter().all(|c| pool.contains(&c.as_str())));
    }
}

#[test]
fn test_sample_collapses_duplicate_pool_entries() {
    init_tracing();
    let pool = ["art", "art", "film", "film", "film"];
    let mut rng = rng();

    let mut picked = sample(&pool, 5, &mut rng);
    picked.sort();
    assert_eq!(picked, vec!["art", "film"]);

    let empty: [&str; 0] = [];
    assert!(sample(&empty, 3, &mut rng).is_empty());
}

#[test]
fn test_sample_is_reproducible_and_roughly_uniform() {
    init_tracing();
    let pool = ["a", "b", "c", "d"];

    let first = sample(&pool, 2, &mut StdRng::seed_from_u64(42));
    let second = sample(&pool, 2, &mut StdRng::seed_from_u64(42));
    assert_eq!(first, second);

    let mut rng = rng();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..8000 {
        for channel in sample(&pool, 1, &mut rng) {
            *counts.entry(channel).or_default() += 1;
        }
    }
    info!("Single-pick distribution: {:?}", counts);

    assert_eq!(counts.len(), 4);
    for (channel, count) in counts {
        assert!((1600..2400).contains(&count), "{} picked {} times", channel, count);
    }
}
