mod client;
mod models;

pub use client::{MediaSource, TmdbClient};
pub use models::{
    image_url, CastMember, Credits, MediaDetail, MediaItem, MediaKind, Provider, TimeWindow,
    TrendingKind, WatchProviders, MAX_CAST,
};
