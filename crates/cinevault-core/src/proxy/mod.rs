//! Single-endpoint API proxy
//!
//! Holds the TMDB credential server-side so clients never see it.

mod protocol;
mod server;

pub use protocol::{validate_endpoint, ErrorBody, HealthResponse, ProxyRequest};
pub use server::{ProxyError, ProxyServer, ProxyState};
