pub mod config;
pub mod error;
pub mod media;
pub mod proxy;

pub use config::{AppConfig, CarouselConfig, CarouselLayout, EasingType, ScrollConfig};
pub use error::{Error, Result};
pub use media::{MediaItem, MediaKind, MediaSource, TmdbClient};
pub use proxy::ProxyServer;
