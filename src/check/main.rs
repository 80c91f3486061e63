//! One-shot zone lookup from the command line.
//!
//! Loads the zone feed once and reports where a single coordinate falls.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use serde_json::{json, Value};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use haven::config::{FeedConfig, DEFAULT_FEED_URL};
use haven::feed::source_for_location;
use haven::{assess, Assessment, GeoPoint, RefreshOutcome, ZoneStore};

#[derive(Parser, Debug)]
#[command(name = "check")]
#[command(about = "Check a coordinate against the hazard-zone feed")]
struct Args {
    /// Zone feed URL or GeoJSON file path
    #[arg(short, long, default_value = DEFAULT_FEED_URL)]
    feed: String,

    /// Latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Feed request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    if !(-90.0..=90.0).contains(&args.lat) || !(-180.0..=180.0).contains(&args.lon) {
        anyhow::bail!("Invalid coordinates ({}, {})", args.lat, args.lon);
    }

    let source = source_for_location(
        &args.feed,
        Duration::from_secs(args.timeout),
        &FeedConfig::default().user_agent,
    )?;

    let store = ZoneStore::new();
    if let RefreshOutcome::Retained(e) = store.refresh(source.as_ref()).await {
        anyhow::bail!("Failed to load zones from {}: {}", args.feed, e);
    }

    let snapshot = store.current();
    info!("Loaded {} zones", snapshot.len());

    let output = describe(assess(GeoPoint::new(args.lat, args.lon), &snapshot));
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn describe(assessment: Assessment<'_>) -> Value {
    match assessment {
        Assessment::HighAlert { zone, safe_zones } => json!({
            "status": "high_alert",
            "zone": zone.name,
            "safe_zones": safe_zones,
        }),
        Assessment::InZone { zone } => json!({
            "status": "safe",
            "zone": zone.name,
            "alert_level": zone.alert_level,
        }),
        Assessment::Outside => json!({ "status": "outside" }),
    }
}
