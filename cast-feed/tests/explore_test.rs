mod common;

use cast_feed::explore::load_previews;
use cast_feed::{ChannelInfo, ScoringEngine};
use common::*;
use tracing::info;

fn info_for(id: &str, followers: u64) -> ChannelInfo {
    ChannelInfo {
        id: id.to_string(),
        name: Some(id.to_uppercase()),
        description: Some(format!("All about {}", id)),
        follower_count: Some(followers),
        image_url: Some(format!("https://img.example.com/{}-icon.png", id)),
    }
}

#[tokio::test]
async fn test_previews_pick_thumbnail_from_best_media_cast() {
    init_tracing();
    let best = media_cast("best", "art").with_reactions(ReactionCounts {
        likes: 200,
        recasts: 0,
        generic: 0,
    });
    let source = StaticSource::new()
        .with_channel_info(info_for("art", 900))
        .with_channel_info(info_for("film", 300))
        .with_page(
            "art",
            None,
            page(vec![link_cast("link", "art"), media_cast("plain", "art"), best], None),
        )
        .with_page("film", None, page(vec![link_cast("only-links", "film")], None));

    let groups: &[(&str, &[&str])] = &[("Visual", &["art", "film"]), ("Motion", &["film"])];
    let previews = load_previews(&source, groups, 20, &ScoringEngine::default(), &mut rng()).await;
    info!("Previews: {:?}", previews);

    assert_eq!(previews.len(), 2);
    assert_eq!(previews[0].category, "Visual");
    assert_eq!(previews[1].category, "Motion");

    let art = &previews[0].channels[0];
    assert_eq!(art.name, "art");
    assert_eq!(art.followers, Some(900));
    assert_eq!(art.description.as_deref(), Some("All about art"));
    assert_eq!(art.thumbnail.as_deref(), Some("https://img.example.com/best.png"));

    let film = &previews[1].channels[0];
    assert_eq!(film.followers, Some(300));
    assert_eq!(film.thumbnail, None);

    // "film" appears in two groups but is fetched once
    let film_requests = source.requests().iter().filter(|r| r.channel == "film").count();
    assert_eq!(film_requests, 1);
    assert!(source.requests().iter().all(|r| r.page_size == 20 && r.cursor.is_none()));
}

#[tokio::test]
async fn test_failed_channels_are_left_out() {
    init_tracing();
    let source = StaticSource::new()
        .with_channel_info(info_for("art", 900))
        .with_channel_info(info_for("film", 300))
        .with_failure("film");

    // "design" has no metadata, so its lookup fails too
    let groups: &[(&str, &[&str])] = &[("Visual", &["art", "film"]), ("Craft", &["design", "film"])];
    let previews = load_previews(&source, groups, 20, &ScoringEngine::default(), &mut rng()).await;

    assert_eq!(previews.len(), 1);
    assert_eq!(previews[0].category, "Visual");
    let names: Vec<&str> = previews[0].channels.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["art"]);
}
