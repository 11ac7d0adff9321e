use std::sync::Arc;

/// Channels the global feed samples from. Casts posted in them also get a
/// ranking boost.
pub const CURATED_CHANNELS: &[&str] = &[
    "aesthetic",
    "299",
    "blank",
    "issavibe",
    "it",
    "hard",
    "july",
    "words",
    "design-pieces",
    "cinema-stills",
    "light",
    "esoteric",
    "acidflower",
    "highmaintenance",
    "cassettefuturism",
    "vaas",
    "aerial",
    "metaliminal",
    "anemale",
    "diptychs",
    "chair",
    "workspaces",
    "higher",
    "objects",
    "f1",
    "techarchive",
];

/// Explore categories, in display order.
pub const CHANNEL_GROUPS: &[(&str, &[&str])] = &[
    ("Art", &["aesthetic", "art", "ai-art", "genart"]),
    ("Photography", &["photography", "cinema-stills", "itookaphoto", "streetphotos"]),
    ("Culture", &["fashion", "memes", "higher", "words"]),
    ("Lifestyle", &["hard", "esoteric", "vaas", "workspaces"]),
    ("Tech", &["it", "techarchive"]),
    (
        "Design",
        &[
            "design",
            "interiordesign",
            "architecture",
            "chair",
            "furniture",
            "cassettefuturism",
            "design-pieces",
            "objects",
        ],
    ),
    ("Miscellaneous", &["grit", "299", "diptychs", "july", "metaliminal"]),
];

pub const MAX_CHANNELS_FOR_FEED: usize = 4;

pub const DEFAULT_PAGE_SIZE: usize = 80;

pub const DEFAULT_PAGE_SIZE_FOR_CHANNEL: usize = 100;

pub const DEFAULT_PAGE_SIZE_INITIAL: usize = 20;

pub const DEFAULT_THUMBNAIL_SEARCH: usize = 20;

/// The curated pool as a shareable, read-only slice.
pub fn curated_pool() -> Arc<[String]> {
    CURATED_CHANNELS.iter().map(|c| c.to_string()).collect()
}

/// Every channel listed in the Explore groups, first occurrence wins.
pub fn grouped_channels() -> Vec<&'static str> {
    let mut seen = std::collections::HashSet::new();
    CHANNEL_GROUPS
        .iter()
        .flat_map(|(_, channels)| channels.iter().copied())
        .filter(|channel| seen.insert(*channel))
        .collect()
}
