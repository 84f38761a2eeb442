//! Authenticated forwarding proxy
//!
//! Accepts `{endpoint, params}` bodies, attaches the server-held API key and
//! relays the upstream response unchanged.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Client;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use super::protocol::{validate_endpoint, ErrorBody, HealthResponse, ProxyRequest};
use crate::config::ProxyConfig;
use crate::{Error, Result};

/// Failures reported to proxy callers as `{"error": ...}`
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("TMDB API key not configured")]
    MissingApiKey,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Upstream request failed: {0}")]
    Upstream(String),
}

impl ProxyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidEndpoint(_) => StatusCode::BAD_REQUEST,
            ProxyError::MissingApiKey | ProxyError::InvalidBody(_) | ProxyError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Shared handler state
pub struct ProxyState {
    client: Client,
    upstream_base_url: String,
    api_key: Option<String>,
}

impl ProxyState {
    pub fn new(upstream_base_url: &str, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            upstream_base_url: upstream_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

/// HTTP server wrapping the proxy router
pub struct ProxyServer {
    state: Arc<ProxyState>,
    bind_addr: String,
}

impl ProxyServer {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        let api_key = config.resolved_api_key();
        if api_key.is_none() {
            warn!("No TMDB API key configured; proxy requests will fail until TMDB_API_KEY is set");
        }

        let state = ProxyState::new(&config.upstream_base_url, api_key, config.request_timeout_secs)?;
        Ok(Self {
            state: Arc::new(state),
            bind_addr: config.bind_addr.clone(),
        })
    }

    /// Override the configured listen address
    pub fn with_bind_addr(mut self, bind_addr: impl Into<String>) -> Self {
        self.bind_addr = bind_addr.into();
        self
    }

    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    /// Build the router: `POST /`, `POST /tmdb-api` and `GET /health`
    pub fn router(state: Arc<ProxyState>) -> Router {
        Router::new()
            .route("/", post(forward))
            .route("/tmdb-api", post(forward))
            .route("/health", get(health))
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer())
            .with_state(state)
    }

    /// Serve until the shutdown channel flips to `true`
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> Result<()> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        info!("Proxy listening on: {}", listener.local_addr()?);

        let app = Self::router(self.state.clone());
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                loop {
                    if shutdown_rx.changed().await.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                info!("Proxy shutting down");
            })
            .await?;

        Ok(())
    }
}

/// Permissive CORS: any origin, the headers browser clients send
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn forward(
    State(state): State<Arc<ProxyState>>,
    body: Bytes,
) -> std::result::Result<Response, ProxyError> {
    let request: ProxyRequest =
        serde_json::from_slice(&body).map_err(|e| ProxyError::InvalidBody(e.to_string()))?;

    let api_key = state.api_key.as_deref().ok_or(ProxyError::MissingApiKey)?;

    validate_endpoint(&request.endpoint).map_err(ProxyError::InvalidEndpoint)?;

    let url = format!("{}{}", state.upstream_base_url, request.endpoint);
    let mut query = vec![("api_key".to_string(), api_key.to_string())];
    query.extend(request.query_pairs());

    debug!("Forwarding {} ({} params)", request.endpoint, query.len() - 1);

    let response = state
        .client
        .get(&url)
        .query(&query)
        .send()
        .await
        .map_err(|e| ProxyError::Upstream(e.to_string()))?;

    let status = StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ProxyError::Upstream(e.to_string()))?;

    if !status.is_success() {
        warn!("Upstream returned {} for {}", status, request.endpoint);
    }

    Ok((
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        bytes,
    )
        .into_response())
}
