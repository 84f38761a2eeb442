use std::sync::Arc;
use std::time::Instant;

use cinevault_core::config::CarouselLayout;
use cinevault_core::media::{
    Credits, MediaDetail, MediaItem, MediaSource, TimeWindow, TrendingKind, WatchProviders,
};
use cinevault_core::AppConfig;
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::carousel::{Activation, CarouselController};
use crate::event::{DetailKey, FetchResult};
use crate::theme::{Theme, ThemeMode};

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Browse,
    Detail,
}

/// State of the trending list request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed,
}

/// Application mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Normal browsing mode
    Normal,
    /// Typing a title filter
    Search(String),
    /// Help overlay
    Help,
    /// Dismissible error panel
    Error(String),
}

/// One detail-screen fetch
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Fetch<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Fetch::Loading)
    }
}

/// Everything shown on the detail screen for one title
#[derive(Debug, Clone)]
pub struct DetailState {
    pub key: DetailKey,
    /// Item as listed in the strip, shown until the detail arrives
    pub item: MediaItem,
    pub detail: Fetch<MediaDetail>,
    pub credits: Fetch<Option<Credits>>,
    pub providers: Fetch<Option<WatchProviders>>,
    pub scroll: u16,
}

impl DetailState {
    fn new(item: MediaItem) -> Self {
        Self {
            key: (item.id, item.kind),
            item,
            detail: Fetch::Loading,
            credits: Fetch::Loading,
            providers: Fetch::Loading,
            scroll: 0,
        }
    }
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Where titles are fetched from
    source: Arc<dyn MediaSource>,
    /// Channel background fetches report on
    tx: mpsc::UnboundedSender<FetchResult>,
    /// Browse strip over the filtered titles
    pub carousel: CarouselController<MediaItem>,
    /// Strip orientation
    pub layout: CarouselLayout,
    /// Unfiltered trending titles
    pub all_items: Vec<MediaItem>,
    /// Active title filter
    pub filter: String,
    pub trending_kind: TrendingKind,
    pub time_window: TimeWindow,
    /// Bumped on every trending request; older results are dropped
    generation: u64,
    pub load_state: LoadState,
    pub screen: Screen,
    pub mode: Mode,
    pub theme: Theme,
    pub detail: Option<DetailState>,
    /// Status message
    pub status_message: Option<String>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Screen area of the strip, recorded on each draw for pointer hit-testing
    pub strip_area: Rect,
    tasks: Vec<JoinHandle<()>>,
}

impl App {
    pub fn new(
        config: Arc<AppConfig>,
        source: Arc<dyn MediaSource>,
        tx: mpsc::UnboundedSender<FetchResult>,
    ) -> Self {
        let carousel = CarouselController::new(&config.ui.carousel, config.ui.scroll.clone());
        Self {
            layout: config.ui.carousel.layout,
            trending_kind: config.tmdb.trending_kind,
            time_window: config.tmdb.time_window,
            theme: Theme::for_mode(ThemeMode::from_name(&config.ui.theme)),
            config,
            source,
            tx,
            carousel,
            all_items: Vec::new(),
            filter: String::new(),
            generation: 0,
            load_state: LoadState::Loading,
            screen: Screen::Browse,
            mode: Mode::Normal,
            detail: None,
            status_message: None,
            should_quit: false,
            strip_area: Rect::default(),
            tasks: Vec::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Titles currently in the strip
    pub fn visible_items(&self) -> &[MediaItem] {
        self.carousel.items()
    }

    pub fn focused_item(&self) -> Option<&MediaItem> {
        self.carousel.focused_item()
    }

    // Fetching

    /// Start a trending request for the current kind and window
    pub fn request_trending(&mut self) {
        self.generation += 1;
        self.load_state = LoadState::Loading;
        if matches!(self.mode, Mode::Error(_)) {
            self.mode = Mode::Normal;
        }

        let generation = self.generation;
        let (kind, window) = (self.trending_kind, self.time_window);
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        debug!("Requesting trending {}/{} (generation {})", kind, window, generation);

        self.spawn(async move {
            let result = source
                .fetch_trending(kind, window)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(FetchResult::Trending { generation, result });
        });
    }

    /// Switch to the detail screen for `item` and start its three fetches
    pub fn open_detail(&mut self, item: MediaItem) {
        let state = DetailState::new(item);
        let (id, kind) = state.key;
        info!("Opening detail for {} {}", kind, id);

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.spawn(async move {
            let result = source
                .fetch_detail(id, Some(kind))
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(FetchResult::Detail { key: (id, kind), result });
        });

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.spawn(async move {
            let result = source
                .fetch_credits(id, kind)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(FetchResult::Credits { key: (id, kind), result });
        });

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.spawn(async move {
            let result = source
                .fetch_watch_providers(id, kind)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(FetchResult::Providers { key: (id, kind), result });
        });

        self.detail = Some(state);
        self.screen = Screen::Detail;
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.tasks.retain(|handle| !handle.is_finished());
        self.tasks.push(tokio::spawn(task));
    }

    /// Apply a finished fetch. Results for a superseded request are dropped.
    pub fn handle_fetch_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::Trending { generation, result } => {
                if generation != self.generation {
                    debug!("Dropping stale trending result (generation {})", generation);
                    return;
                }
                match result {
                    Ok(items) => {
                        info!("Loaded {} trending titles", items.len());
                        self.load_state = LoadState::Loaded;
                        self.all_items = items;
                        let filtered = self.filtered_items();
                        self.carousel.set_items(filtered);
                        self.carousel.reset_focus();
                    }
                    Err(e) => {
                        warn!("Trending request failed: {}", e);
                        self.load_state = LoadState::Failed;
                        self.mode = Mode::Error(format!("Failed to load trending titles: {}", e));
                    }
                }
            }
            FetchResult::Detail { key, result } => {
                let Some(detail) = self.current_detail_mut(key) else {
                    return;
                };
                detail.detail = match result {
                    Ok(record) => Fetch::Ready(record),
                    Err(e) => {
                        warn!("Detail request for {:?} failed: {}", key, e);
                        Fetch::Failed(e)
                    }
                };
            }
            FetchResult::Credits { key, result } => {
                let Some(detail) = self.current_detail_mut(key) else {
                    return;
                };
                detail.credits = result.map_or_else(Fetch::Failed, Fetch::Ready);
            }
            FetchResult::Providers { key, result } => {
                let Some(detail) = self.current_detail_mut(key) else {
                    return;
                };
                detail.providers = result.map_or_else(Fetch::Failed, Fetch::Ready);
            }
        }
    }

    fn current_detail_mut(&mut self, key: DetailKey) -> Option<&mut DetailState> {
        match self.detail.as_mut() {
            Some(detail) if detail.key == key => Some(detail),
            _ => {
                debug!("Dropping stale detail result for {:?}", key);
                None
            }
        }
    }

    // Filtering

    fn filtered_items(&self) -> Vec<MediaItem> {
        self.all_items
            .iter()
            .filter(|item| item.matches_query(&self.filter))
            .cloned()
            .collect()
    }

    /// Replace the filter and rebuild the strip
    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.filter = query.into();
        let filtered = self.filtered_items();
        self.carousel.set_items(filtered);
    }

    /// Text shown in place of an empty strip
    pub fn empty_message(&self) -> Option<String> {
        if !self.carousel.is_empty() {
            return None;
        }
        let message = match self.load_state {
            LoadState::Loading => "Loading trending titles...".to_string(),
            LoadState::Failed => "Could not load trending titles. Press r to retry.".to_string(),
            LoadState::Loaded if !self.filter.trim().is_empty() => {
                format!("No results found for \"{}\"", self.filter.trim())
            }
            LoadState::Loaded => "No movies or TV series available".to_string(),
        };
        Some(message)
    }

    // Navigation

    /// Confirm the focused title, opening its detail screen unless a handler took it
    pub fn activate_focused(&mut self) {
        let item = match self.carousel.activate() {
            Activation::Default(item) => item.clone(),
            Activation::Handled | Activation::Empty => return,
        };
        self.open_detail(item);
    }

    /// Leave the detail screen
    pub fn back(&mut self) {
        if self.screen == Screen::Detail {
            self.screen = Screen::Browse;
            self.detail = None;
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.set_status(format!("Theme: {}", self.theme.mode.as_str()));
    }

    pub fn toggle_loop(&mut self) {
        let infinite = !self.carousel.is_infinite();
        self.carousel.set_infinite(infinite);
        self.set_status(if infinite { "Looping on" } else { "Looping off" });
    }

    pub fn cycle_kind(&mut self) {
        self.trending_kind = self.trending_kind.next();
        self.set_status(format!("Trending: {}", self.trending_kind));
        self.request_trending();
    }

    pub fn toggle_window(&mut self) {
        self.time_window = self.time_window.toggle();
        self.set_status(format!("Window: {}", self.time_window));
        self.request_trending();
    }

    /// TMDB page for the title on screen
    pub fn current_web_url(&self) -> Option<String> {
        match (self.screen, &self.detail) {
            (Screen::Detail, Some(detail)) => Some(detail.item.web_url()),
            _ => self.focused_item().map(MediaItem::web_url),
        }
    }

    pub fn scroll_detail(&mut self, delta: i32) {
        if let Some(detail) = self.detail.as_mut() {
            detail.scroll = (detail.scroll as i32 + delta).clamp(0, u16::MAX as i32) as u16;
        }
    }

    // Pointer input

    /// Strip position under the terminal cell (column, row)
    pub fn strip_index_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.strip_area;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if !inside {
            return None;
        }
        let position = match self.layout {
            CarouselLayout::Horizontal => column - area.x,
            CarouselLayout::Vertical => row - area.y,
        };
        self.carousel.strip_index_at(position as u32)
    }

    pub fn hover(&mut self, column: u16, row: u16) {
        if self.screen != Screen::Browse || self.mode != Mode::Normal {
            return;
        }
        if let Some(index) = self.strip_index_at(column, row) {
            self.carousel.select_by_pointer(index);
        }
    }

    pub fn click(&mut self, column: u16, row: u16) {
        if self.screen != Screen::Browse || self.mode != Mode::Normal {
            return;
        }
        let Some(index) = self.strip_index_at(column, row) else {
            return;
        };
        let item = match self.carousel.activate_at(index) {
            Activation::Default(item) => item.clone(),
            Activation::Handled | Activation::Empty => return,
        };
        self.open_detail(item);
    }

    // Frame updates

    /// Advance animations. Call once per frame.
    pub fn tick(&mut self, now: Instant) {
        self.carousel.tick(now);
    }

    /// True while the loop should poll at animation rate
    pub fn needs_fast_update(&self) -> bool {
        self.carousel.needs_frame()
    }

    /// Set a status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Check if we're in a mode that accepts text input
    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, Mode::Search(_))
    }

    /// Abort in-flight fetches and stop the carousel timers
    pub fn shutdown(&mut self) {
        for handle in self.tasks.drain(..) {
            handle.abort();
        }
        self.carousel.teardown();
    }

    #[cfg(test)]
    pub(crate) fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cinevault_core::media::{CastMember, MediaKind};
    use cinevault_core::{Error, Result};
    use std::time::Duration;

    struct FakeSource {
        items: Vec<MediaItem>,
        fail_trending: bool,
    }

    fn item(id: u64, title: &str, kind: MediaKind) -> MediaItem {
        MediaItem {
            id,
            title: title.to_string(),
            poster_path: String::new(),
            overview: String::new(),
            kind,
            release_date: None,
            rating: None,
        }
    }

    fn sample_items() -> Vec<MediaItem> {
        vec![
            item(1, "Dune: Part Two", MediaKind::Movie),
            item(2, "Shogun", MediaKind::Series),
            item(3, "Dune", MediaKind::Movie),
        ]
    }

    #[async_trait]
    impl MediaSource for FakeSource {
        async fn fetch_trending(&self, _kind: TrendingKind, _window: TimeWindow) -> Result<Vec<MediaItem>> {
            if self.fail_trending {
                return Err(Error::Upstream {
                    status: 401,
                    message: "Invalid API key".to_string(),
                });
            }
            Ok(self.items.clone())
        }

        async fn fetch_detail(&self, id: u64, kind: Option<MediaKind>) -> Result<MediaDetail> {
            let found = self.items.iter().find(|i| i.id == id).cloned();
            found
                .map(|item| MediaDetail {
                    item,
                    runtime_minutes: Some(166),
                    genres: vec!["Science Fiction".to_string()],
                    tagline: None,
                    number_of_seasons: None,
                    number_of_episodes: None,
                    status: None,
                    homepage: None,
                })
                .ok_or(Error::NotFound { id, kind })
        }

        async fn fetch_credits(&self, id: u64, _kind: MediaKind) -> Result<Option<Credits>> {
            Ok(Some(Credits {
                cast: vec![CastMember {
                    id: id * 10,
                    name: "Actor".to_string(),
                    character: "Lead".to_string(),
                    profile_path: None,
                    order: 0,
                }],
            }))
        }

        async fn fetch_watch_providers(&self, _id: u64, _kind: MediaKind) -> Result<Option<WatchProviders>> {
            Ok(None)
        }
    }

    fn app_with(source: FakeSource) -> (App, mpsc::UnboundedReceiver<FetchResult>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(Arc::new(AppConfig::default()), Arc::new(source), tx);
        (app, rx)
    }

    fn app() -> (App, mpsc::UnboundedReceiver<FetchResult>) {
        app_with(FakeSource {
            items: sample_items(),
            fail_trending: false,
        })
    }

    async fn drain(app: &mut App, rx: &mut mpsc::UnboundedReceiver<FetchResult>, count: usize) {
        for _ in 0..count {
            let result = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .unwrap()
                .unwrap();
            app.handle_fetch_result(result);
        }
    }

    #[tokio::test]
    async fn test_trending_load_fills_strip() {
        let (mut app, mut rx) = app();
        assert_eq!(app.empty_message().as_deref(), Some("Loading trending titles..."));

        app.request_trending();
        drain(&mut app, &mut rx, 1).await;

        assert_eq!(app.load_state, LoadState::Loaded);
        assert_eq!(app.visible_items().len(), 3);
        assert_eq!(app.focused_item().map(|i| i.id), Some(1));
        assert_eq!(app.empty_message(), None);
    }

    #[tokio::test]
    async fn test_stale_trending_result_dropped() {
        let (mut app, _rx) = app();
        app.request_trending();
        app.request_trending();
        assert_eq!(app.generation(), 2);

        app.handle_fetch_result(FetchResult::Trending {
            generation: 1,
            result: Ok(vec![item(9, "Old", MediaKind::Movie)]),
        });
        assert!(app.visible_items().is_empty());
        assert_eq!(app.load_state, LoadState::Loading);
    }

    #[tokio::test]
    async fn test_trending_failure_opens_error_panel() {
        let (mut app, mut rx) = app_with(FakeSource {
            items: Vec::new(),
            fail_trending: true,
        });
        app.request_trending();
        drain(&mut app, &mut rx, 1).await;

        assert_eq!(app.load_state, LoadState::Failed);
        assert!(matches!(&app.mode, Mode::Error(msg) if msg.contains("Invalid API key")));

        // refetch clears the panel
        app.request_trending();
        assert_eq!(app.mode, Mode::Normal);
    }

    #[tokio::test]
    async fn test_empty_trending_message() {
        let (mut app, mut rx) = app_with(FakeSource {
            items: Vec::new(),
            fail_trending: false,
        });
        app.request_trending();
        drain(&mut app, &mut rx, 1).await;

        assert_eq!(
            app.empty_message().as_deref(),
            Some("No movies or TV series available")
        );
    }

    #[tokio::test]
    async fn test_filter_narrows_and_resets_focus() {
        let (mut app, mut rx) = app();
        app.request_trending();
        drain(&mut app, &mut rx, 1).await;

        app.carousel.select_by_pointer(2);
        app.set_filter("dune");
        // index 2 is out of range for two matches
        assert_eq!(app.visible_items().len(), 2);
        assert_eq!(app.carousel.focused_index(), Some(0));

        app.set_filter("zzz");
        assert_eq!(app.empty_message().as_deref(), Some("No results found for \"zzz\""));

        app.set_filter("");
        assert_eq!(app.visible_items().len(), 3);
    }

    #[tokio::test]
    async fn test_activate_opens_detail_with_all_fetches() {
        let (mut app, mut rx) = app();
        app.request_trending();
        drain(&mut app, &mut rx, 1).await;

        app.activate_focused();
        assert_eq!(app.screen, Screen::Detail);
        drain(&mut app, &mut rx, 3).await;

        let detail = app.detail.as_ref().unwrap();
        assert_eq!(detail.key, (1, MediaKind::Movie));
        assert!(matches!(&detail.detail, Fetch::Ready(d) if d.runtime_minutes == Some(166)));
        assert!(matches!(&detail.credits, Fetch::Ready(Some(c)) if c.cast.len() == 1));
        assert_eq!(detail.providers, Fetch::Ready(None));
    }

    #[tokio::test]
    async fn test_stale_detail_result_ignored() {
        let (mut app, _rx) = app();
        app.open_detail(item(2, "Shogun", MediaKind::Series));

        app.handle_fetch_result(FetchResult::Detail {
            key: (1, MediaKind::Movie),
            result: Err("late".to_string()),
        });
        assert!(app.detail.as_ref().unwrap().detail.is_loading());

        app.handle_fetch_result(FetchResult::Detail {
            key: (2, MediaKind::Series),
            result: Err("Content not found".to_string()),
        });
        assert_eq!(
            app.detail.as_ref().unwrap().detail,
            Fetch::Failed("Content not found".to_string())
        );
    }

    #[tokio::test]
    async fn test_back_and_web_url() {
        let (mut app, _rx) = app();
        app.open_detail(item(2, "Shogun", MediaKind::Series));
        assert_eq!(
            app.current_web_url().as_deref(),
            Some("https://www.themoviedb.org/tv/2")
        );

        app.back();
        assert_eq!(app.screen, Screen::Browse);
        assert!(app.detail.is_none());
        assert_eq!(app.current_web_url(), None);
    }

    #[tokio::test]
    async fn test_toggles() {
        let (mut app, _rx) = app();
        assert_eq!(app.theme.mode, ThemeMode::Dark);
        app.toggle_theme();
        assert_eq!(app.theme.mode, ThemeMode::Light);

        assert!(!app.carousel.is_infinite());
        app.toggle_loop();
        assert!(app.carousel.is_infinite());

        let generation = app.generation();
        app.cycle_kind();
        assert_eq!(app.trending_kind, TrendingKind::Movie);
        assert_eq!(app.generation(), generation + 1);
    }

    #[tokio::test]
    async fn test_pointer_hit_testing() {
        let (mut app, mut rx) = app();
        app.request_trending();
        drain(&mut app, &mut rx, 1).await;

        app.strip_area = Rect::new(2, 3, 80, 4);
        app.carousel.set_viewport(80);
        // item extent is 24 cells and the strip starts at offset 0
        assert_eq!(app.strip_index_at(2 + 30, 4), Some(1));
        assert_eq!(app.strip_index_at(0, 4), None);
        assert_eq!(app.strip_index_at(2 + 79, 4), None);

        app.hover(2 + 50, 4);
        assert_eq!(app.carousel.focused_index(), Some(2));
        assert_eq!(app.screen, Screen::Browse);

        app.click(2 + 5, 4);
        assert_eq!(app.screen, Screen::Detail);
        assert_eq!(app.detail.as_ref().unwrap().key, (1, MediaKind::Movie));
    }

    #[tokio::test]
    async fn test_shutdown_aborts_tasks() {
        let (mut app, _rx) = app();
        app.request_trending();
        assert!(app.pending_tasks() > 0);
        app.shutdown();
        assert_eq!(app.pending_tasks(), 0);
    }
}
