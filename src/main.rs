//! Sportsbook Client - Main Entry Point
//!
//! Loads the game feed, prints a summary of each bucket and, when a session
//! token is available, follows live updates until interrupted.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use sportsbook_client::common::channels::create_event_channel;
use sportsbook_client::common::traits::GameFeedClient;
use sportsbook_client::config::load_config;
use sportsbook_client::{Bucket, FeedEvent, FeedSynchronizer, GameFeedCache, SportsbookClient};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); defaults to the config value
    #[arg(long)]
    log_level: Option<String>,

    /// Session token for the push feed and bet placement
    #[arg(long, env = "SPORTSBOOK_AUTH_TOKEN")]
    token: Option<String>,

    /// Fetch the buckets once and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config_path = std::path::Path::new(&args.config)
        .exists()
        .then_some(args.config.as_str());
    let config = load_config(config_path)?;

    // Initialize logging
    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.settings.log_level.clone());
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting sportsbook client");
    match config_path {
        Some(path) => info!("Configuration file: {}", path),
        None => info!("No configuration file at {}, using defaults", args.config),
    }

    let mut client = SportsbookClient::from_config(&config)?;
    let cache = Arc::new(RwLock::new(GameFeedCache::new()));
    let sync = FeedSynchronizer::new(cache.clone(), client.rest_handle(), &config.feed);

    let report = sync.refresh_default().await;
    if !report.is_complete() {
        warn!(failed = ?report.failed, "Some game lists could not be loaded");
    }
    print_summary(&*cache.read().await);

    if args.once {
        return Ok(());
    }
    let Some(token) = args.token.or_else(|| config.api.auth_token.clone()) else {
        info!("No session token; live updates disabled");
        return Ok(());
    };

    let mut feed_events = cache.read().await.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = feed_events.recv().await {
            match event {
                FeedEvent::GameMoved { game_id, from, to } => {
                    info!(%game_id, ?from, %to, "Game updated")
                }
                FeedEvent::GameDropped { game_id, status } => {
                    info!(%game_id, %status, "Game left the feed")
                }
                FeedEvent::BucketFailed { bucket, error } => {
                    warn!(%bucket, %error, "Refresh failed")
                }
                _ => {}
            }
        }
    });

    let (sender, receiver) = create_event_channel();
    client.connect(&token).await?;
    client.start(sender).await?;
    let handle = sync.spawn(receiver);
    info!("Following {} feed, press Ctrl-C to stop", client.feed_name());

    // Keep the application running
    tokio::signal::ctrl_c().await?;
    info!("Received shutdown signal, cleaning up...");

    client.disconnect().await?;
    handle.shutdown().await?;

    Ok(())
}

fn print_summary(cache: &GameFeedCache) {
    for bucket in Bucket::ALL {
        let state = cache.bucket(bucket);
        match &state.error {
            Some(error) => println!("{bucket}: unavailable ({error})"),
            None => println!("{bucket}: {} games", state.games.len()),
        }
        for game in state.games.iter().take(5) {
            println!("  {game}");
        }
    }
}
