use std::time::Duration;

use anyhow::Result;
use cinevault_core::media::{Credits, MediaDetail, MediaItem, MediaKind, WatchProviders};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
    animation_tick: Duration,
}

/// Identifies the record a detail-screen fetch belongs to
pub type DetailKey = (u64, MediaKind);

/// Result of a background fetch, tagged with the request it answers
#[derive(Debug)]
pub enum FetchResult {
    Trending {
        generation: u64,
        result: Result<Vec<MediaItem>, String>,
    },
    Detail {
        key: DetailKey,
        result: Result<MediaDetail, String>,
    },
    Credits {
        key: DetailKey,
        result: Result<Option<Credits>, String>,
    },
    Providers {
        key: DetailKey,
        result: Result<Option<WatchProviders>, String>,
    },
}

impl EventHandler {
    /// Create a handler that polls at `animation_fps` while animating
    pub fn with_animation_fps(tick_rate_ms: u64, animation_fps: u32) -> Self {
        let animation_tick = if animation_fps == 0 {
            Duration::from_millis(16)
        } else {
            Duration::from_millis((1000 / animation_fps as u64).max(1))
        };
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            animation_tick,
        }
    }

    /// Poll for the next event at the idle tick rate
    pub fn next(&self) -> Result<Option<AppEvent>> {
        self.poll(self.tick_rate)
    }

    /// Poll for the next event at the animation frame rate
    pub fn next_animation(&self) -> Result<Option<AppEvent>> {
        self.poll(self.animation_tick)
    }

    fn poll(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm 0.27+ sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => Ok(mouse_event(mouse)),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

fn mouse_event(mouse: MouseEvent) -> Option<AppEvent> {
    match mouse.kind {
        MouseEventKind::Moved => Some(AppEvent::Hover(mouse.column, mouse.row)),
        MouseEventKind::Down(crossterm::event::MouseButton::Left) => {
            Some(AppEvent::Click(mouse.column, mouse.row))
        }
        MouseEventKind::ScrollDown => Some(AppEvent::Scroll(1)),
        MouseEventKind::ScrollUp => Some(AppEvent::Scroll(-1)),
        _ => None,
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Pointer moved to (column, row)
    Hover(u16, u16),
    /// Left click at (column, row)
    Click(u16, u16),
    /// Wheel step, positive is down
    Scroll(i8),
    /// Terminal was resized
    Resize(u16, u16),
    /// Tick event for periodic updates
    Tick,
}
