use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{info, warn};

use cinevault_core::{media::MediaSource, AppConfig, TmdbClient};
use cinevault_tui::{
    app::{App, Mode, Screen},
    event::{AppEvent, EventHandler, FetchResult},
    input::{handle_key_event, Action},
    keymap::Keymap,
    widgets::{CarouselWidget, DetailWidget, PopupWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Build the client before touching the terminal so config errors print normally
    let client = TmdbClient::new(&config.tmdb)?;
    info!(
        "Starting TUI ({} mode)",
        if client.uses_proxy() { "proxy" } else { "direct" }
    );
    let source: Arc<dyn MediaSource> = Arc::new(client);

    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Cinevault"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Channel for background fetch results
    let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel::<FetchResult>();

    let mut app = App::new(config.clone(), source, fetch_tx);
    app.request_trending();

    let event_handler = EventHandler::with_animation_fps(
        config.ui.tick_rate_ms,
        config.ui.scroll.animation_fps,
    );

    // Checked at the end of each iteration to pick the next poll rate
    let mut needs_fast_update = false;

    let result = async {
        loop {
            // Process any completed fetches (non-blocking)
            while let Ok(result) = fetch_rx.try_recv() {
                app.handle_fetch_result(result);
            }

            app.tick(Instant::now());

            terminal.draw(|frame| {
                let size = frame.area();

                // Main layout: content + status bar
                let main_layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(1), Constraint::Length(1)])
                    .split(size);

                if app.screen == Screen::Detail {
                    if let Some(detail) = app.detail.as_ref() {
                        DetailWidget::render(frame, main_layout[0], detail, &app.theme);
                    }
                } else {
                    CarouselWidget::render(frame, main_layout[0], &mut app);
                }
                StatusBarWidget::render(frame, main_layout[1], &app);

                match &app.mode {
                    Mode::Error(message) => PopupWidget::render_error(frame, message, &app.theme),
                    Mode::Help => PopupWidget::render_help(frame, &app.config.keymap, &app.theme),
                    _ => {}
                }
            })?;

            let event = if needs_fast_update {
                event_handler.next_animation()?
            } else {
                event_handler.next()?
            };
            if let Some(event) = event {
                match event {
                    AppEvent::Key(key) => {
                        let action = handle_key_event(key, &app, &keymap);
                        handle_action(&mut app, action);
                    }
                    AppEvent::Hover(column, row) => app.hover(column, row),
                    AppEvent::Click(column, row) => app.click(column, row),
                    AppEvent::Scroll(delta) => match app.screen {
                        Screen::Browse if delta > 0 => handle_action(&mut app, Action::Next),
                        Screen::Browse => handle_action(&mut app, Action::Previous),
                        Screen::Detail => app.scroll_detail(delta as i32),
                    },
                    // Widgets pick up the new size on the next draw
                    AppEvent::Resize(_, _) => {}
                    AppEvent::Tick => {}
                }
            }

            needs_fast_update = app.needs_fast_update();

            if app.should_quit {
                break;
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn handle_action(app: &mut App, action: Action) {
    // Status messages last until the next action
    if action != Action::None {
        app.clear_status();
    }

    match action {
        Action::Quit => {
            app.should_quit = true;
        }
        Action::Next => {
            app.carousel.select_next();
        }
        Action::Previous => {
            app.carousel.select_previous();
        }
        Action::Activate => app.activate_focused(),
        Action::Back => app.back(),
        Action::Refresh => {
            app.set_status("Refreshing...");
            app.request_trending();
        }
        Action::StartSearch => {
            app.mode = Mode::Search(app.filter.clone());
        }
        Action::ToggleTheme => app.toggle_theme(),
        Action::ToggleLoop => app.toggle_loop(),
        Action::CycleKind => app.cycle_kind(),
        Action::ToggleWindow => app.toggle_window(),
        Action::OpenInBrowser => {
            if let Some(url) = app.current_web_url() {
                match open::that(&url) {
                    Ok(()) => app.set_status(format!("Opening: {}", url)),
                    Err(e) => {
                        warn!("Failed to open {}: {}", url, e);
                        app.set_status(format!("Failed to open browser: {}", e));
                    }
                }
            }
        }
        Action::Help => {
            app.mode = Mode::Help;
        }
        Action::ScrollDown => app.scroll_detail(1),
        Action::ScrollUp => app.scroll_detail(-1),
        Action::ExitMode => {
            app.mode = Mode::Normal;
        }
        Action::InputChar(c) => {
            if let Mode::Search(ref mut query) = app.mode {
                query.push(c);
                let query = query.clone();
                app.set_filter(query);
            }
        }
        Action::Backspace => {
            if let Mode::Search(ref mut query) = app.mode {
                query.pop();
                let query = query.clone();
                app.set_filter(query);
            }
        }
        Action::Confirm => {
            // Keep the filter, leave input mode
            app.mode = Mode::Normal;
        }
        Action::Cancel => {
            app.mode = Mode::Normal;
            app.set_filter(String::new());
        }
        Action::None => {}
    }
}
