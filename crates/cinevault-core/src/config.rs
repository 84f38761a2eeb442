use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::media::{TimeWindow, TrendingKind};

/// Environment variable that overrides any configured TMDB API key
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// How the client reaches the media API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// Base URL of the TMDB v3 API (used for direct access)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Base URL for poster and logo images
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// API key for direct access. `TMDB_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Cinevault proxy endpoint; when set, every request goes through it
    /// and no API key is needed on this side
    #[serde(default)]
    pub proxy_url: Option<String>,
    /// Region used for watch-provider lookups
    #[serde(default = "default_region")]
    pub region: String,
    /// Trending media kind requested on startup
    #[serde(default)]
    pub trending_kind: TrendingKind,
    /// Trending time window requested on startup
    #[serde(default)]
    pub time_window: TimeWindow,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Outbound HTTP proxy (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub http_proxy: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            image_base_url: default_image_base_url(),
            api_key: None,
            proxy_url: None,
            region: default_region(),
            trending_kind: TrendingKind::default(),
            time_window: TimeWindow::default(),
            request_timeout_secs: default_timeout(),
            http_proxy: None,
        }
    }
}

impl TmdbConfig {
    /// API key from the environment, falling back to the config file
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref())
    }
}

/// Settings for `cinevault proxy`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Socket address the proxy listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Upstream API the proxy forwards to
    #[serde(default = "default_api_base_url")]
    pub upstream_base_url: String,
    /// Server-held API key. `TMDB_API_KEY` takes precedence.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            upstream_base_url: default_api_base_url(),
            api_key: None,
            request_timeout_secs: default_timeout(),
        }
    }
}

impl ProxyConfig {
    /// API key from the environment, falling back to the config file
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref())
    }
}

fn resolve_api_key(configured: Option<&str>) -> Option<String> {
    pick_api_key(std::env::var(API_KEY_ENV).ok().as_deref(), configured)
}

/// First non-blank key, environment before file
fn pick_api_key(env: Option<&str>, configured: Option<&str>) -> Option<String> {
    [env, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|key| !key.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Theme name: "dark" or "light"
    #[serde(default = "default_theme_name")]
    pub theme: String,
    /// Scroll animation settings
    #[serde(default)]
    pub scroll: ScrollConfig,
    /// Carousel geometry and input timing
    #[serde(default)]
    pub carousel: CarouselConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            theme: default_theme_name(),
            scroll: ScrollConfig::default(),
            carousel: CarouselConfig::default(),
        }
    }
}

/// Easing curve applied to scroll animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump at the end of the animation
    None,
    Linear,
    /// 1 - (1-t)^3
    #[default]
    Cubic,
    /// 1 - (1-t)^5
    Quintic,
    /// Exponential ease-out
    EaseOut,
    /// Cubic ease-in-out, closest to a browser's smooth scroll
    EaseInOut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animate offset changes instead of jumping
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Duration of one scroll-to-center animation
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Frame rate while an animation is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            animation_fps: default_animation_fps(),
        }
    }
}

/// Strip orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarouselLayout {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselConfig {
    #[serde(default)]
    pub layout: CarouselLayout,
    /// Loop past either end instead of wrapping back through the strip
    #[serde(default)]
    pub infinite: bool,
    /// Card width in columns (horizontal layout)
    #[serde(default = "default_item_width")]
    pub item_width: u16,
    /// Card height in rows (vertical layout)
    #[serde(default = "default_item_height")]
    pub item_height: u16,
    /// Space between cards
    #[serde(default = "default_item_gap")]
    pub gap: u16,
    /// Keyboard lockout after a keyboard-driven scroll starts
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
    /// Minimum interval between accepted navigation key presses
    #[serde(default = "default_min_key_interval")]
    pub min_key_interval_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            layout: CarouselLayout::default(),
            infinite: false,
            item_width: default_item_width(),
            item_height: default_item_height(),
            gap: default_item_gap(),
            settle_delay_ms: default_settle_delay(),
            min_key_interval_ms: default_min_key_interval(),
        }
    }
}

impl CarouselConfig {
    /// Rows a card needs for its border and one line of text
    pub const MIN_CARD_HEIGHT: u16 = 3;

    /// Drawn card height
    pub fn card_height(&self) -> u16 {
        self.item_height.max(Self::MIN_CARD_HEIGHT)
    }

    /// Extent of one card plus its gap along the scroll axis
    pub fn item_extent(&self) -> u16 {
        let size = match self.layout {
            CarouselLayout::Horizontal => self.item_width.max(1),
            CarouselLayout::Vertical => self.card_height(),
        };
        size.saturating_add(self.gap)
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-j>" (Ctrl+j), "<S-g>" (Shift+g), "<CR>" (Enter), "<Esc>", "<Tab>", "<Space>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Focus the next title
    #[serde(default = "default_key_next")]
    pub next: String,
    /// Focus the previous title
    #[serde(default = "default_key_previous")]
    pub previous: String,
    /// Alternate key for the next title (vertical lists)
    #[serde(default = "default_key_next_alt")]
    pub next_alt: String,
    /// Alternate key for the previous title (vertical lists)
    #[serde(default = "default_key_previous_alt")]
    pub previous_alt: String,
    /// Open the focused title
    #[serde(default = "default_key_activate")]
    pub activate: String,
    /// Leave the detail view
    #[serde(default = "default_key_back")]
    pub back: String,
    /// Fetch the trending list again
    #[serde(default = "default_key_refresh")]
    pub refresh: String,
    /// Filter titles
    #[serde(default = "default_key_search")]
    pub search: String,
    /// Switch between light and dark theme
    #[serde(default = "default_key_toggle_theme")]
    pub toggle_theme: String,
    /// Toggle infinite looping
    #[serde(default = "default_key_toggle_loop")]
    pub toggle_loop: String,
    /// Cycle the trending kind (all / movie / tv)
    #[serde(default = "default_key_cycle_kind")]
    pub cycle_kind: String,
    /// Switch the trending window (day / week)
    #[serde(default = "default_key_toggle_window")]
    pub toggle_window: String,
    /// Open the title's TMDB page in a browser
    #[serde(default = "default_key_open_browser")]
    pub open_browser: String,
    /// Show the help overlay
    #[serde(default = "default_key_help")]
    pub help: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            next: default_key_next(),
            previous: default_key_previous(),
            next_alt: default_key_next_alt(),
            previous_alt: default_key_previous_alt(),
            activate: default_key_activate(),
            back: default_key_back(),
            refresh: default_key_refresh(),
            search: default_key_search(),
            toggle_theme: default_key_toggle_theme(),
            toggle_loop: default_key_toggle_loop(),
            cycle_kind: default_key_cycle_kind(),
            toggle_window: default_key_toggle_window(),
            open_browser: default_key_open_browser(),
            help: default_key_help(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_next() -> String { "l".to_string() }
fn default_key_previous() -> String { "h".to_string() }
fn default_key_next_alt() -> String { "j".to_string() }
fn default_key_previous_alt() -> String { "k".to_string() }
fn default_key_activate() -> String { "<CR>".to_string() }
fn default_key_back() -> String { "<BS>".to_string() }
fn default_key_refresh() -> String { "r".to_string() }
fn default_key_search() -> String { "/".to_string() }
fn default_key_toggle_theme() -> String { "t".to_string() }
fn default_key_toggle_loop() -> String { "L".to_string() }
fn default_key_cycle_kind() -> String { "m".to_string() }
fn default_key_toggle_window() -> String { "w".to_string() }
fn default_key_open_browser() -> String { "b".to_string() }
fn default_key_help() -> String { "?".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cinevault")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_api_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_region() -> String {
    "US".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_bind_addr() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_tick_rate() -> u64 {
    100
}

fn default_theme_name() -> String {
    "dark".to_string()
}

fn default_animation_duration() -> u64 {
    280
}

fn default_animation_fps() -> u32 {
    60
}

fn default_item_width() -> u16 {
    22
}

fn default_item_height() -> u16 {
    4
}

fn default_item_gap() -> u16 {
    2
}

fn default_settle_delay() -> u64 {
    320 // slightly longer than the scroll animation
}

fn default_min_key_interval() -> u64 {
    90
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/cinevault/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("cinevault")
            .join("config.toml")
    }

    /// Get the log file path used by the TUI
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("cinevault.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.tmdb.api_base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb.region, "US");
        assert_eq!(config.tmdb.trending_kind, TrendingKind::All);
        assert_eq!(config.tmdb.time_window, TimeWindow::Week);
        assert_eq!(config.ui.carousel.layout, CarouselLayout::Horizontal);
        assert!(!config.ui.carousel.infinite);
        assert_eq!(config.ui.scroll.easing, EasingType::Cubic);
        assert!(config.ui.carousel.settle_delay_ms >= config.ui.scroll.animation_duration_ms);
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml(
            r#"
            [tmdb]
            proxy_url = "http://localhost:8787/"
            trending_kind = "tv"
            time_window = "day"

            [ui.carousel]
            layout = "vertical"
            infinite = true
            item_height = 5
            gap = 1

            [keymap]
            next = "<Right>"
            "#,
        )
        .unwrap();

        assert_eq!(config.tmdb.proxy_url.as_deref(), Some("http://localhost:8787/"));
        assert_eq!(config.tmdb.trending_kind, TrendingKind::Tv);
        assert_eq!(config.tmdb.time_window, TimeWindow::Day);
        assert!(config.ui.carousel.infinite);
        assert_eq!(config.ui.carousel.item_extent(), 6);
        assert_eq!(config.keymap.next, "<Right>");
        assert_eq!(config.keymap.previous, "h");
        assert_eq!(config.ui.carousel.min_key_interval_ms, 90);
    }

    #[test]
    fn test_item_extent_horizontal() {
        let carousel = CarouselConfig::default();
        assert_eq!(carousel.item_extent(), 24);
    }

    #[test]
    fn test_vertical_extent_matches_drawn_card() {
        let carousel = CarouselConfig {
            layout: CarouselLayout::Vertical,
            item_height: 1,
            gap: 1,
            ..CarouselConfig::default()
        };
        assert_eq!(carousel.card_height(), 3);
        assert_eq!(carousel.item_extent(), 4);
    }

    #[test]
    fn test_blank_env_key_falls_back_to_file() {
        assert_eq!(pick_api_key(Some(""), Some("from-file")).as_deref(), Some("from-file"));
        assert_eq!(pick_api_key(Some("  "), Some(" from-file ")).as_deref(), Some("from-file"));
        assert_eq!(pick_api_key(Some("env"), Some("from-file")).as_deref(), Some("env"));
        assert_eq!(pick_api_key(None, Some("")), None);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[ui\ntheme = ").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_expand_tilde_passthrough() {
        let path = PathBuf::from("/var/lib/cinevault");
        assert_eq!(expand_tilde(&path), path);
    }
}
