use cinevault_core::config::CarouselLayout;
use cinevault_core::media::MediaItem;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::popup::truncate_str;
use crate::app::App;
use crate::theme::Theme;

/// Cards narrower than this are not drawn
const MIN_CARD_CELLS: u16 = 3;

pub struct CarouselWidget;

impl CarouselWidget {
    /// Render the strip and the info panel for the focused title.
    ///
    /// Records the strip area and viewport on `app` so pointer input and
    /// centering use the geometry that was actually drawn.
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        let title = format!(
            " Trending {} · {}{} ",
            app.trending_kind,
            app.time_window,
            if app.carousel.is_infinite() { " · loop" } else { "" }
        );
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.grey0))
            .style(Style::default().bg(app.theme.bg0));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let card = &app.config.ui.carousel;
        let (strip, info) = match app.layout {
            CarouselLayout::Horizontal => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(card.card_height()), Constraint::Min(1)])
                    .split(inner);
                (chunks[0], chunks[1])
            }
            CarouselLayout::Vertical => {
                let chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(card.item_width.max(24)), Constraint::Min(1)])
                    .split(inner);
                (chunks[0], chunks[1])
            }
        };

        let viewport = match app.layout {
            CarouselLayout::Horizontal => strip.width,
            CarouselLayout::Vertical => strip.height,
        };
        app.strip_area = strip;
        app.carousel.set_viewport(viewport as u32);

        if let Some(message) = app.empty_message() {
            let paragraph = Paragraph::new(message)
                .style(Style::default().fg(app.theme.grey1))
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, inner);
            return;
        }

        Self::render_strip(frame, strip, app);
        if let Some(item) = app.focused_item() {
            InfoPanelWidget::render(frame, info, item, &app.theme);
        }
    }

    fn render_strip(frame: &mut Frame, strip: Rect, app: &App) {
        let carousel = &app.carousel;
        let config = &app.config.ui.carousel;
        let extent = carousel.item_extent() as i64;
        let offset = carousel.offset() as i64;
        let focused = carousel.focused_strip_index();

        for index in carousel.visible_range() {
            let Some(item) = carousel.item_at_strip(index) else {
                continue;
            };
            // Position of the card along the scroll axis, relative to the viewport
            let start = index as i64 * extent - offset;
            let rect = match app.layout {
                CarouselLayout::Horizontal => {
                    clip_span(start, config.item_width, strip.width).map(|(pos, len)| {
                        Rect::new(strip.x + pos, strip.y, len, strip.height.min(config.card_height()))
                    })
                }
                CarouselLayout::Vertical => {
                    clip_span(start, config.card_height(), strip.height)
                        .map(|(pos, len)| Rect::new(strip.x, strip.y + pos, strip.width, len))
                }
            };
            if let Some(rect) = rect {
                render_card(frame, rect, item, index == focused, &app.theme);
            }
        }
    }
}

/// Clip a card spanning `[start, start + size)` to `[0, viewport)`
fn clip_span(start: i64, size: u16, viewport: u16) -> Option<(u16, u16)> {
    let begin = start.max(0);
    let end = (start + size as i64).min(viewport as i64);
    if end - begin < MIN_CARD_CELLS as i64 {
        return None;
    }
    Some((begin as u16, (end - begin) as u16))
}

fn render_card(frame: &mut Frame, rect: Rect, item: &MediaItem, focused: bool, theme: &Theme) {
    let (border, body) = if focused {
        (
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            Style::default().fg(theme.fg1).bg(theme.selection),
        )
    } else {
        (
            Style::default().fg(theme.grey0),
            Style::default().fg(theme.fg0).bg(theme.bg0),
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .style(body);
    let width = block.inner(rect).width as usize;

    let year = item
        .release_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "----".to_string());
    let rating = item
        .rating
        .map(|r| format!("★ {:.1}", r))
        .unwrap_or_else(|| "★ -".to_string());

    let lines = vec![
        Line::from(Span::styled(
            truncate_str(&item.title, width),
            body.add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(year, Style::default().fg(theme.grey1)),
            Span::raw(" "),
            Span::styled(rating, Style::default().fg(theme.yellow)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), rect);
}

/// Title, year, rating, kind and overview of the focused item
pub struct InfoPanelWidget;

impl InfoPanelWidget {
    pub fn render(frame: &mut Frame, area: Rect, item: &MediaItem, theme: &Theme) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let mut meta = Vec::new();
        if let Some(year) = item.release_year() {
            meta.push(Span::styled(year.to_string(), Style::default().fg(theme.grey1)));
            meta.push(Span::raw("  "));
        }
        meta.push(Span::styled(item.rating_label(), Style::default().fg(theme.yellow)));
        meta.push(Span::raw("  "));
        meta.push(Span::styled(
            item.kind_label(),
            Style::default().fg(theme.blue).add_modifier(Modifier::BOLD),
        ));

        let lines = vec![
            Line::from(Span::styled(
                item.title.clone(),
                Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
            )),
            Line::from(meta),
            Line::default(),
            Line::from(Span::styled(
                item.overview_or_placeholder().to_string(),
                Style::default().fg(theme.fg0),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::TOP).border_style(Style::default().fg(theme.bg2)))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}
