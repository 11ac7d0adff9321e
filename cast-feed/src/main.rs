use anyhow::Context;
use cast_feed::channels::CHANNEL_GROUPS;
use cast_feed::explore::load_previews;
use cast_feed::utils::text::preview;
use cast_feed::{
    ApiCastSource, AppConfig, Cast, ContentSource, FeedAggregator, FeedContext, ScoringEngine, SessionStore,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cast-feed", version, about = "Aggregate and rank media casts from Farcaster channels")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a feed and print it
    Feed {
        /// Pin a single channel instead of sampling the curated pool
        #[arg(long)]
        channel: Option<String>,

        /// Number of passes, the first one being the cold start
        #[arg(long, default_value_t = 1)]
        pages: usize,

        /// Print casts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show channel previews grouped by category
    Explore {
        #[arg(long)]
        json: bool,
    },
    /// Inspect or edit the cached session
    Session {
        #[arg(long)]
        clear: bool,

        #[arg(long)]
        toggle_dark_mode: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Invalid configuration")?;
    if let Some(api_url) = cli.api_url {
        config.fetch.api_url = api_url;
        config.validate().context("Invalid --api-url")?;
    }

    if config.fetch.api_key.is_none() {
        warn!("No API key configured, requests may be rejected");
    }

    match cli.command {
        Command::Feed { channel, pages, json } => run_feed(config, channel, pages, json).await,
        Command::Explore { json } => run_explore(config, json).await,
        Command::Session { clear, toggle_dark_mode } => run_session(config, clear, toggle_dark_mode).await,
    }
}

async fn run_feed(config: AppConfig, channel: Option<String>, pages: usize, json: bool) -> anyhow::Result<()> {
    let source = Arc::new(ApiCastSource::new(config.fetch)?);
    info!("Using {}", source.source_name());

    let context = channel.map(FeedContext::Channel).unwrap_or_default();
    let aggregator = FeedAggregator::new(source, config.feed).with_context(context.clone());

    for pass in 0..pages.max(1) {
        let outcome = if pass == 0 {
            aggregator.initial_load(&context).await
        } else {
            aggregator.load_more(&context).await
        };

        match outcome {
            Ok(outcome) => info!("Pass {}: {:?}", pass + 1, outcome),
            // The caller decides about retries; here we just keep paging.
            Err(e) => error!("Pass {} failed: {}", pass + 1, e),
        }
    }

    let items = aggregator.items().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for (index, cast) in items.iter().enumerate() {
            println!("{}", format_cast(index, cast));
        }
        println!("\n{} casts in feed", items.len());
    }

    Ok(())
}

async fn run_explore(config: AppConfig, json: bool) -> anyhow::Result<()> {
    let source = ApiCastSource::new(config.fetch)?;
    let scorer = ScoringEngine::default();
    let mut rng = rand::thread_rng();

    let groups = load_previews(
        &source,
        CHANNEL_GROUPS,
        config.feed.thumbnail_page_size,
        &scorer,
        &mut rng,
    )
    .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    for group in groups {
        println!("== {}", group.category);
        for channel in group.channels {
            println!(
                "  /{:<18} {:>8} followers  {}",
                channel.name,
                channel.followers.map(|f| f.to_string()).unwrap_or_else(|| "?".to_string()),
                channel.thumbnail.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}

async fn run_session(config: AppConfig, clear: bool, toggle_dark_mode: bool) -> anyhow::Result<()> {
    let store = SessionStore::new(config.session_path);

    if clear {
        store.remove_user().await?;
    }
    if toggle_dark_mode {
        let dark_mode = store.toggle_dark_mode().await?;
        info!("Dark mode is now {}", if dark_mode { "on" } else { "off" });
    }

    let cache = store.load().await?;
    println!("Session cache: {}", store.path().display());
    match &cache.user {
        Some(user) => println!(
            "  fid {} ({}), authenticated: {}",
            user.fid,
            user.display_name.as_deref().unwrap_or("unnamed"),
            user.is_authenticated
        ),
        None => println!("  not signed in"),
    }
    println!("  dark mode: {}", cache.dark_mode);

    Ok(())
}

fn format_cast(index: usize, cast: &Cast) -> String {
    let author = cast
        .author
        .display_name
        .as_deref()
        .or(cast.author.username.as_deref())
        .unwrap_or("unknown");

    format!(
        "{:>3}. {} /{} by {}: {} [{}]",
        index + 1,
        cast.id,
        cast.channel.as_deref().unwrap_or("-"),
        author,
        preview(cast.text.as_deref().unwrap_or(""), 60),
        cast.embeds.first().map(|e| e.url.as_str()).unwrap_or("-")
    )
}
