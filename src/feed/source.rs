//! Zone feed sources (HTTP and local file).

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::FeedError;

/// Something that can produce a raw zone feed document
#[async_trait]
pub trait ZoneSource: Send + Sync {
    /// Fetch the raw FeatureCollection document
    async fn fetch(&self) -> Result<Value, FeedError>;

    /// Human-readable location, for logging
    fn describe(&self) -> String;
}

/// Fetches the zone feed over HTTP
pub struct HttpZoneSource {
    client: Client,
    url: Url,
}

impl HttpZoneSource {
    pub fn new(url: Url, timeout: Duration, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl ZoneSource for HttpZoneSource {
    async fn fetch(&self) -> Result<Value, FeedError> {
        debug!("GET {}", self.url);

        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Reads the zone feed from a GeoJSON file on disk
pub struct FileZoneSource {
    path: PathBuf,
}

impl FileZoneSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ZoneSource for FileZoneSource {
    async fn fetch(&self) -> Result<Value, FeedError> {
        let content = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&content)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Build a source from a configured location: `http(s)://` URLs are fetched
/// over the network, anything else is treated as a file path.
pub fn source_for_location(
    location: &str,
    timeout: Duration,
    user_agent: &str,
) -> Result<Box<dyn ZoneSource>, FeedError> {
    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(Box::new(HttpZoneSource::new(url, timeout, user_agent)?))
        }
        _ => Ok(Box::new(FileZoneSource::new(location))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::io::Write;
    use std::net::SocketAddr;

    async fn serve(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    fn http_source(addr: SocketAddr, path: &str, timeout: Duration) -> HttpZoneSource {
        let url = Url::parse(&format!("http://{}{}", addr, path)).unwrap();
        HttpZoneSource::new(url, timeout, "haven-test").unwrap()
    }

    fn test_router() -> Router {
        Router::new()
            .route(
                "/zones",
                get(|| async { Json(json!({ "type": "FeatureCollection", "features": [] })) }),
            )
            .route("/missing", get(|| async { StatusCode::NOT_FOUND }))
            .route("/garbage", get(|| async { "this is not json" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "{}"
                }),
            )
    }

    #[tokio::test]
    async fn test_http_source_fetches_document() {
        let addr = serve(test_router()).await;
        let doc = http_source(addr, "/zones", Duration::from_secs(5))
            .fetch()
            .await
            .unwrap();
        assert_eq!(doc["type"], "FeatureCollection");
    }

    #[tokio::test]
    async fn test_http_source_errors() {
        let addr = serve(test_router()).await;

        let err = http_source(addr, "/missing", Duration::from_secs(5))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Status(s) if s == StatusCode::NOT_FOUND));

        let err = http_source(addr, "/garbage", Duration::from_secs(5))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Decode(_)));

        let err = http_source(addr, "/slow", Duration::from_millis(200))
            .fetch()
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"features": []}}"#).unwrap();

        let source = FileZoneSource::new(file.path());
        let doc = source.fetch().await.unwrap();
        assert!(doc["features"].as_array().unwrap().is_empty());

        let missing = FileZoneSource::new("/nonexistent/zones.geojson");
        assert!(matches!(missing.fetch().await, Err(FeedError::Io(_))));
    }

    #[test]
    fn test_source_for_location() {
        let timeout = Duration::from_secs(1);
        let http = source_for_location("https://example.com/zones.geojson", timeout, "t").unwrap();
        assert_eq!(http.describe(), "https://example.com/zones.geojson");

        let file = source_for_location("data/zones.geojson", timeout, "t").unwrap();
        assert_eq!(file.describe(), "data/zones.geojson");
    }
}
