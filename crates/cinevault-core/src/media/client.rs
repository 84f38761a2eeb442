use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Proxy, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::models::{
    image_url, Credits, MediaDetail, MediaItem, MediaKind, RawCredits, RawMediaDetail, RawPage,
    RawWatchProviders, TimeWindow, TrendingKind, WatchProviders,
};
use crate::config::TmdbConfig;
use crate::proxy::ProxyRequest;
use crate::{Error, Result};

const MAX_RESPONSE_BYTES: usize = 5 * 1024 * 1024;

/// Source of trending lists and title details
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Trending titles for a kind and window. Upstream failures are returned, never retried.
    async fn fetch_trending(&self, kind: TrendingKind, window: TimeWindow) -> Result<Vec<MediaItem>>;

    /// Detail record. With `kind == None` the id is tried as a movie, then as a series.
    async fn fetch_detail(&self, id: u64, kind: Option<MediaKind>) -> Result<MediaDetail>;

    /// Billed cast; `Ok(None)` when the title has none
    async fn fetch_credits(&self, id: u64, kind: MediaKind) -> Result<Option<Credits>>;

    /// Providers for the configured region; `Ok(None)` when unavailable there
    async fn fetch_watch_providers(&self, id: u64, kind: MediaKind) -> Result<Option<WatchProviders>>;
}

/// How requests reach the upstream API
#[derive(Debug, Clone)]
enum Backend {
    /// POST `{endpoint, params}` to a cinevault proxy
    Proxy { url: Url },
    /// GET the API directly with the key as a query parameter
    Direct { base_url: String, api_key: String },
}

/// TMDB API client
pub struct TmdbClient {
    client: Client,
    backend: Backend,
    region: String,
    image_base_url: String,
}

impl TmdbClient {
    /// Create a client from configuration. A proxy URL wins over a direct API key.
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let backend = if let Some(ref proxy_url) = config.proxy_url {
            Backend::Proxy {
                url: Url::parse(proxy_url)?,
            }
        } else if let Some(api_key) = config.resolved_api_key() {
            Backend::Direct {
                base_url: config.api_base_url.trim_end_matches('/').to_string(),
                api_key,
            }
        } else {
            return Err(Error::Config(
                "TMDB API key not configured: set TMDB_API_KEY, tmdb.api_key or tmdb.proxy_url".to_string(),
            ));
        };

        let client = Self::build_client(config.request_timeout_secs, &config.http_proxy)?;

        Ok(Self {
            client,
            backend,
            region: config.region.clone(),
            image_base_url: config.image_base_url.clone(),
        })
    }

    /// Build HTTP client with optional outbound proxy
    fn build_client(timeout_secs: u64, http_proxy: &Option<String>) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("cinevault/", env!("CARGO_PKG_VERSION"))),
        );

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .gzip(true)
            .deflate(true)
            .brotli(true);

        if let Some(ref proxy) = http_proxy {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Using HTTP proxy for TMDB requests");
        }

        builder.build().map_err(Error::Http)
    }

    /// True when requests go through a cinevault proxy
    pub fn uses_proxy(&self) -> bool {
        matches!(self.backend, Backend::Proxy { .. })
    }

    /// Poster URL at the given size (e.g. "w342"); `None` without a poster
    pub fn poster_url(&self, item: &MediaItem, size: &str) -> Option<String> {
        image_url(&self.image_base_url, size, &item.poster_path)
    }

    /// Send one request through the configured backend and return the raw body
    async fn send(&self, request: &ProxyRequest) -> Result<Bytes> {
        tracing::debug!("Requesting {}", request.endpoint);

        let result = match &self.backend {
            Backend::Proxy { url } => self.client.post(url.clone()).json(request).send().await,
            Backend::Direct { base_url, api_key } => {
                let mut query = vec![("api_key".to_string(), api_key.clone())];
                query.extend(request.query_pairs());
                self.client
                    .get(format!("{}{}", base_url, request.endpoint))
                    .query(&query)
                    .send()
                    .await
            }
        };

        let response = result.map_err(|e| {
            tracing::warn!("Request for {} failed: {}", request.endpoint, e);
            Error::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if body.len() > MAX_RESPONSE_BYTES {
            return Err(Error::Other(format!(
                "Response for {} exceeds {} bytes",
                request.endpoint, MAX_RESPONSE_BYTES
            )));
        }

        if !status.is_success() {
            let message = upstream_message(status, &body);
            tracing::debug!("{} returned {}: {}", request.endpoint, status, message);
            return Err(Error::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: String) -> Result<T> {
        let body = self.send(&ProxyRequest::new(endpoint)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_detail_as(&self, id: u64, kind: MediaKind) -> Result<MediaDetail> {
        let raw: RawMediaDetail = self.get(format!("/{}/{}", kind.as_path(), id)).await?;
        Ok(raw.into_detail(kind))
    }
}

#[async_trait]
impl MediaSource for TmdbClient {
    async fn fetch_trending(&self, kind: TrendingKind, window: TimeWindow) -> Result<Vec<MediaItem>> {
        let page: RawPage = self
            .get(format!("/trending/{}/{}", kind.as_path(), window.as_path()))
            .await?;
        let items = page.into_items(kind);
        tracing::info!("Fetched {} trending titles ({}/{})", items.len(), kind, window);
        Ok(items)
    }

    async fn fetch_detail(&self, id: u64, kind: Option<MediaKind>) -> Result<MediaDetail> {
        if let Some(kind) = kind {
            return self.fetch_detail_as(id, kind).await.map_err(|e| {
                if e.is_not_found() {
                    Error::NotFound { id, kind: Some(kind) }
                } else {
                    e
                }
            });
        }

        // Movies and series live in disjoint id spaces; a movie miss is expected
        match self.fetch_detail_as(id, MediaKind::Movie).await {
            Ok(detail) => Ok(detail),
            Err(movie_err) => {
                tracing::debug!("Movie lookup for {} failed ({}), trying series", id, movie_err);
                match self.fetch_detail_as(id, MediaKind::Series).await {
                    Ok(detail) => Ok(detail),
                    Err(series_err) => {
                        tracing::warn!(
                            "Lookup for {} failed as movie ({}) and series ({})",
                            id,
                            movie_err,
                            series_err
                        );
                        Err(Error::NotFound { id, kind: None })
                    }
                }
            }
        }
    }

    async fn fetch_credits(&self, id: u64, kind: MediaKind) -> Result<Option<Credits>> {
        match self.get::<RawCredits>(format!("/{}/{}/credits", kind.as_path(), id)).await {
            Ok(raw) => Ok(Credits::from_raw(raw)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn fetch_watch_providers(&self, id: u64, kind: MediaKind) -> Result<Option<WatchProviders>> {
        match self
            .get::<RawWatchProviders>(format!("/{}/{}/watch/providers", kind.as_path(), id))
            .await
        {
            Ok(raw) => Ok(WatchProviders::from_raw(raw, &self.region)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Best-effort error text from an upstream or proxy error body
fn upstream_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("status_message")
                .or_else(|| value.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn direct_config(server: &MockServer) -> TmdbConfig {
        TmdbConfig {
            api_base_url: server.uri(),
            api_key: Some("test-key".to_string()),
            ..TmdbConfig::default()
        }
    }

    fn not_found() -> ResponseTemplate {
        ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "status_code": 34,
            "status_message": "The resource you requested could not be found."
        }))
    }

    #[tokio::test]
    async fn test_trending_direct() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trending/all/week"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": 1,
                "results": [
                    { "id": 1, "title": "Dune: Part Two", "media_type": "movie", "release_date": "2024-02-27" },
                    { "id": 2, "name": "Someone Famous", "media_type": "person" },
                    { "id": 3, "name": "Shogun", "media_type": "tv", "first_air_date": "2024-02-27" }
                ]
            })))
            .mount(&server)
            .await;

        let client = TmdbClient::new(&direct_config(&server)).unwrap();
        let items = client
            .fetch_trending(TrendingKind::All, TimeWindow::Week)
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].title, "Shogun");
        assert_eq!(items[1].kind, MediaKind::Series);
    }

    #[tokio::test]
    async fn test_trending_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trending/movie/day"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "status_code": 7,
                "status_message": "Invalid API key: You must be granted a valid key."
            })))
            .mount(&server)
            .await;

        let client = TmdbClient::new(&direct_config(&server)).unwrap();
        let err = client
            .fetch_trending(TrendingKind::Movie, TimeWindow::Day)
            .await
            .unwrap_err();

        match err {
            Error::Upstream { status, message } => {
                assert_eq!(status, 401);
                assert!(message.starts_with("Invalid API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_network_error() {
        let config = TmdbConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            api_key: Some("k".to_string()),
            request_timeout_secs: 2,
            ..TmdbConfig::default()
        };
        let client = TmdbClient::new(&config).unwrap();
        let err = client
            .fetch_trending(TrendingKind::All, TimeWindow::Week)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn test_detail_falls_back_to_series() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/1396"))
            .respond_with(not_found())
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tv/1396"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1396,
                "name": "Breaking Bad",
                "first_air_date": "2008-01-20",
                "episode_run_time": [47],
                "number_of_seasons": 5,
                "number_of_episodes": 62
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TmdbClient::new(&direct_config(&server)).unwrap();
        let detail = client.fetch_detail(1396, None).await.unwrap();

        assert_eq!(detail.item.kind, MediaKind::Series);
        assert_eq!(detail.item.title, "Breaking Bad");
        assert_eq!(detail.runtime_minutes, Some(47));
        assert_eq!(detail.number_of_episodes, Some(62));
    }

    #[tokio::test]
    async fn test_detail_not_found_after_both_lookups() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/77"))
            .respond_with(not_found())
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tv/77"))
            .respond_with(not_found())
            .mount(&server)
            .await;

        let client = TmdbClient::new(&direct_config(&server)).unwrap();
        let err = client.fetch_detail(77, None).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { id: 77, kind: None }));
    }

    #[tokio::test]
    async fn test_detail_known_kind_skips_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/5"))
            .respond_with(not_found())
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/movie/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 5, "title": "Four Rooms" })))
            .expect(0)
            .mount(&server)
            .await;

        let client = TmdbClient::new(&direct_config(&server)).unwrap();
        let err = client.fetch_detail(5, Some(MediaKind::Series)).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { id: 5, kind: Some(MediaKind::Series) }));
    }

    #[tokio::test]
    async fn test_credits_and_providers_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/9/credits"))
            .respond_with(not_found())
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/movie/9/watch/providers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 9,
                "results": { "DE": { "buy": [{ "provider_id": 2, "provider_name": "Apple TV" }] } }
            })))
            .mount(&server)
            .await;

        let client = TmdbClient::new(&direct_config(&server)).unwrap();
        assert_eq!(client.fetch_credits(9, MediaKind::Movie).await.unwrap(), None);
        assert_eq!(client.fetch_watch_providers(9, MediaKind::Movie).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_providers_for_region() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tv/3/watch/providers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3,
                "results": { "US": {
                    "link": "https://www.themoviedb.org/tv/3/watch",
                    "flatrate": [{ "provider_id": 8, "provider_name": "Netflix", "logo_path": "/n.png" }]
                } }
            })))
            .mount(&server)
            .await;

        let client = TmdbClient::new(&direct_config(&server)).unwrap();
        let providers = client
            .fetch_watch_providers(3, MediaKind::Series)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(providers.region, "US");
        assert_eq!(providers.flatrate[0].provider_name, "Netflix");
        assert!(providers.buy.is_empty());
    }

    #[tokio::test]
    async fn test_requests_go_through_proxy() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tmdb-api"))
            .and(body_json(json!({ "endpoint": "/trending/tv/day", "params": null })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{ "id": 42, "name": "Fallout" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = TmdbConfig {
            proxy_url: Some(format!("{}/tmdb-api", server.uri())),
            api_key: None,
            ..TmdbConfig::default()
        };
        let client = TmdbClient::new(&config).unwrap();
        assert!(client.uses_proxy());

        let items = client
            .fetch_trending(TrendingKind::Tv, TimeWindow::Day)
            .await
            .unwrap();
        assert_eq!(items[0].title, "Fallout");
        assert_eq!(items[0].kind, MediaKind::Series);
    }

    #[test]
    fn test_upstream_message_fallbacks() {
        assert_eq!(
            upstream_message(StatusCode::INTERNAL_SERVER_ERROR, br#"{"error":"TMDB API key not configured"}"#),
            "TMDB API key not configured"
        );
        assert_eq!(upstream_message(StatusCode::BAD_GATEWAY, b"<html>"), "Bad Gateway");
    }
}
