use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Maximum number of billed cast members kept for the detail view
pub const MAX_CAST: usize = 12;

const UNKNOWN_TITLE: &str = "Unknown Title";
const NO_OVERVIEW: &str = "No description available for this title.";

/// Content kind of a title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
}

impl MediaKind {
    /// Path segment used by the upstream API
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }

    /// Short label shown next to a title
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Series => "TV",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "tv" | "series" => Ok(MediaKind::Series),
            other => Err(format!("unknown media kind '{}' (expected movie or tv)", other)),
        }
    }
}

/// Which trending list to request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingKind {
    #[default]
    All,
    Movie,
    Tv,
}

impl TrendingKind {
    pub fn as_path(&self) -> &'static str {
        match self {
            TrendingKind::All => "all",
            TrendingKind::Movie => "movie",
            TrendingKind::Tv => "tv",
        }
    }

    /// Next kind in the all -> movie -> tv cycle
    pub fn next(self) -> Self {
        match self {
            TrendingKind::All => TrendingKind::Movie,
            TrendingKind::Movie => TrendingKind::Tv,
            TrendingKind::Tv => TrendingKind::All,
        }
    }

    /// Kind assumed for records that carry no `media_type`
    fn implied_kind(&self) -> Option<MediaKind> {
        match self {
            TrendingKind::All => None,
            TrendingKind::Movie => Some(MediaKind::Movie),
            TrendingKind::Tv => Some(MediaKind::Series),
        }
    }
}

impl fmt::Display for TrendingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for TrendingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(TrendingKind::All),
            "movie" | "movies" => Ok(TrendingKind::Movie),
            "tv" | "series" => Ok(TrendingKind::Tv),
            other => Err(format!("unknown trending kind '{}' (expected all, movie or tv)", other)),
        }
    }
}

/// Trending time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    pub fn as_path(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            TimeWindow::Day => TimeWindow::Week,
            TimeWindow::Week => TimeWindow::Day,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(TimeWindow::Day),
            "week" => Ok(TimeWindow::Week),
            other => Err(format!("unknown time window '{}' (expected day or week)", other)),
        }
    }
}

/// A movie or series, normalized from either upstream record shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: u64,
    pub title: String,
    /// Empty when the record has no poster
    pub poster_path: String,
    pub overview: String,
    pub kind: MediaKind,
    pub release_date: Option<String>,
    /// Average vote on a 0-10 scale
    pub rating: Option<f32>,
}

impl MediaItem {
    /// Year of first release, if the date is present and well-formed
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }

    pub fn kind_label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn overview_or_placeholder(&self) -> &str {
        if self.overview.trim().is_empty() {
            NO_OVERVIEW
        } else {
            &self.overview
        }
    }

    pub fn rating_label(&self) -> String {
        match self.rating {
            Some(rating) => format!("Rating: {:.1}/10", rating),
            None => "Rating: not available".to_string(),
        }
    }

    /// Case-insensitive substring match on the display title
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.title.to_lowercase().contains(&query.to_lowercase())
    }

    /// Public TMDB page for this title
    pub fn web_url(&self) -> String {
        format!("https://www.themoviedb.org/{}/{}", self.kind.as_path(), self.id)
    }
}

/// Extended record shown on the detail screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDetail {
    #[serde(flatten)]
    pub item: MediaItem,
    /// Movie runtime, or per-episode runtime for series
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<String>,
    pub tagline: Option<String>,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    pub status: Option<String>,
    pub homepage: Option<String>,
}

impl MediaDetail {
    pub fn runtime_label(&self) -> Option<String> {
        let minutes = self.runtime_minutes.filter(|m| *m > 0)?;
        let text = if minutes >= 60 {
            format!("{}h {}m", minutes / 60, minutes % 60)
        } else {
            format!("{}m", minutes)
        };
        Some(match self.item.kind {
            MediaKind::Movie => text,
            MediaKind::Series => format!("{} per episode", text),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: u32,
}

/// Top-billed cast, ordered by billing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    pub cast: Vec<CastMember>,
}

impl Credits {
    /// Sort by billing order and keep the first [`MAX_CAST`]. `None` when nobody is listed.
    pub fn from_raw(raw: RawCredits) -> Option<Self> {
        let mut cast = raw.cast;
        if cast.is_empty() {
            return None;
        }
        cast.sort_by_key(|member| member.order);
        cast.truncate(MAX_CAST);
        Some(Self { cast })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub provider_id: u64,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

/// Where a title can be watched in one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchProviders {
    pub region: String,
    pub link: Option<String>,
    pub flatrate: Vec<Provider>,
    pub rent: Vec<Provider>,
    pub buy: Vec<Provider>,
}

impl WatchProviders {
    /// Pick `region` out of the upstream per-region map
    pub fn from_raw(raw: RawWatchProviders, region: &str) -> Option<Self> {
        let mut results = raw.results;
        let entry = results.remove(region)?;
        Some(Self {
            region: region.to_string(),
            link: entry.link,
            flatrate: entry.flatrate,
            rent: entry.rent,
            buy: entry.buy,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.flatrate.is_empty() && self.rent.is_empty() && self.buy.is_empty()
    }
}

/// Build a full image URL; an empty path means there is no image
pub fn image_url(base: &str, size: &str, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{}/{}{}", base, size, path))
    } else {
        Some(format!("{}/{}/{}", base, size, path))
    }
}

// Upstream record shapes

/// Movie or series record as returned by list and detail endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct RawMediaRecord {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
}

impl RawMediaRecord {
    /// Resolve the record's kind. `None` for records that are neither
    /// movies nor series (e.g. people in the "all" trending list).
    fn resolve_kind(&self, implied: Option<MediaKind>) -> Option<MediaKind> {
        match self.media_type.as_deref() {
            Some("movie") => Some(MediaKind::Movie),
            Some("tv") => Some(MediaKind::Series),
            Some(_) => None,
            None => implied.or_else(|| {
                if self.title.is_none() && self.name.is_some() {
                    Some(MediaKind::Series)
                } else {
                    Some(MediaKind::Movie)
                }
            }),
        }
    }

    /// Normalize into a [`MediaItem`], substituting `name` and
    /// `first_air_date` for series records
    pub fn into_item(self, implied: Option<MediaKind>) -> Option<MediaItem> {
        let kind = self.resolve_kind(implied)?;
        Some(self.into_item_as(kind))
    }

    /// Normalize with a kind decided by the caller (detail endpoints carry no `media_type`)
    pub fn into_item_as(self, kind: MediaKind) -> MediaItem {
        let title = non_empty(self.title)
            .or_else(|| non_empty(self.name))
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let release_date = non_empty(self.release_date).or_else(|| non_empty(self.first_air_date));

        MediaItem {
            id: self.id,
            title,
            poster_path: self.poster_path.unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            kind,
            release_date,
            rating: self.vote_average,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub results: Vec<RawMediaRecord>,
}

impl RawPage {
    pub fn into_items(self, kind: TrendingKind) -> Vec<MediaItem> {
        let implied = kind.implied_kind();
        self.results
            .into_iter()
            .filter_map(|record| record.into_item(implied))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGenre {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMediaDetail {
    #[serde(flatten)]
    pub base: RawMediaRecord,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub genres: Vec<RawGenre>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
}

impl RawMediaDetail {
    pub fn into_detail(self, kind: MediaKind) -> MediaDetail {
        let runtime_minutes = match kind {
            MediaKind::Movie => self.runtime,
            MediaKind::Series => self.episode_run_time.first().copied().or(self.runtime),
        };
        MediaDetail {
            item: self.base.into_item_as(kind),
            runtime_minutes,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            tagline: non_empty(self.tagline),
            number_of_seasons: self.number_of_seasons,
            number_of_episodes: self.number_of_episodes,
            status: non_empty(self.status),
            homepage: non_empty(self.homepage),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCredits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRegionProviders {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub flatrate: Vec<Provider>,
    #[serde(default)]
    pub rent: Vec<Provider>,
    #[serde(default)]
    pub buy: Vec<Provider>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWatchProviders {
    #[serde(default)]
    pub results: HashMap<String, RawRegionProviders>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
