//! Hazard-zone query server.
//!
//! Fetches the zone feed at startup, refreshes it on a fixed interval, and
//! answers "am I inside a hazard zone, and where is the nearest safe one?"
//! over HTTP.

mod fallback;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use haven::config::Config;
use haven::feed::{source_for_location, ZoneSource};
use haven::{assess, Assessment, GeoPoint, RefreshScheduler, SafeZoneResult, ZoneStore};

use crate::fallback::{assess_risk, RiskResponse};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Hazard-zone lookup server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Zone feed URL or file path (overrides config)
    #[arg(long)]
    feed_url: Option<String>,

    /// Refresh interval in seconds (overrides config)
    #[arg(long)]
    refresh_interval: Option<u64>,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)?,
            None => Config::default(),
        };

        if let Some(listen) = self.listen {
            config.server.listen = listen;
        }
        if let Some(url) = self.feed_url {
            config.feed.url = url;
        }
        if let Some(secs) = self.refresh_interval {
            config.refresh.interval_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Application state shared across handlers
struct AppState {
    store: Arc<ZoneStore>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Args::parse().into_config()?;

    info!("Haven Server");
    info!("Zone feed: {}", config.feed.url);

    let source: Arc<dyn ZoneSource> = Arc::from(source_for_location(
        &config.feed.url,
        config.feed.timeout(),
        &config.feed.user_agent,
    )?);

    let store = Arc::new(ZoneStore::new());

    // Initial fetch before serving any queries
    if !store.refresh(source.as_ref()).await.is_updated() {
        warn!(
            "Initial zone fetch failed, serving an empty zone set until the next refresh in {}s",
            config.refresh.interval_secs
        );
    }

    let scheduler =
        RefreshScheduler::new(Arc::clone(&store), source, config.refresh.interval()).start();

    let app = build_router(Arc::new(AppState { store }));

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.abort();
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/check_location", post(check_location_handler))
        .route("/check", post(check_location_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.store.current();

    Json(HealthResponse {
        status: if snapshot.is_empty() { "empty" } else { "ok" },
        zones: snapshot.len(),
        version: snapshot.version,
        fetched_at: snapshot.fetched_at,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    zones: usize,
    version: u64,
    fetched_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn invalid_input() -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "Invalid coordinates",
        }),
    )
}

fn internal_error() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal server error",
        }),
    )
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum CheckLocationResponse {
    InZone {
        status: &'static str,
        message: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        safe_zones: Option<Vec<SafeZoneResult>>,
    },
    Outside(RiskResponse),
}

/// Check whether a coordinate lies inside a hazard zone
async fn check_location_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CheckLocationResponse>, ApiError> {
    let Json(body) = body.map_err(|e| {
        debug!("Rejected location request body: {}", e);
        invalid_input()
    })?;

    let point = parse_coordinates(&body).ok_or_else(invalid_input)?;

    // Pin one snapshot for the whole query
    let snapshot = state.store.current();

    let response = tokio::task::spawn_blocking(move || match assess(point, &snapshot) {
        Assessment::HighAlert { safe_zones, .. } => CheckLocationResponse::InZone {
            status: "high_alert",
            message: "You are in a high alert zone.",
            safe_zones: Some(safe_zones),
        },
        Assessment::InZone { .. } => CheckLocationResponse::InZone {
            status: "safe",
            message: "You are in a safe zone.",
            safe_zones: None,
        },
        Assessment::Outside => CheckLocationResponse::Outside(assess_risk(point.lat, point.lon)),
    })
    .await
    .map_err(|e| {
        error!(lat = point.lat, lon = point.lon, "Location query failed: {}", e);
        internal_error()
    })?;

    Ok(Json(response))
}

/// Both coordinates must be JSON numbers within WGS84 bounds
fn parse_coordinates(body: &Value) -> Option<GeoPoint> {
    let lat = body.get("latitude")?.as_f64()?;
    let lon = body.get("longitude")?.as_f64()?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }

    Some(GeoPoint::new(lat, lon))
}
