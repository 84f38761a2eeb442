use cinevault_core::config::KeymapConfig;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::Theme;

pub struct PopupWidget;

impl PopupWidget {
    /// Render the dismissible error panel
    pub fn render_error(frame: &mut Frame, message: &str, theme: &Theme) {
        let area = frame.area();

        let popup_width = 60u16.min(area.width.saturating_sub(4));
        let popup_height = 8u16.min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        // Clear the background area
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Error ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error))
            .style(Style::default().bg(theme.bg1));

        let inner_area = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Message
                Constraint::Length(1), // Hint
            ])
            .split(inner_area);

        let message_paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(theme.fg0).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(message_paragraph, chunks[0]);

        let hint_paragraph = Paragraph::new(Line::from(vec![
            Span::styled("[", Style::default().fg(theme.grey1)),
            Span::styled("Enter", Style::default().fg(theme.green).add_modifier(Modifier::BOLD)),
            Span::styled("] dismiss  [", Style::default().fg(theme.grey1)),
            Span::styled("r", Style::default().fg(theme.yellow).add_modifier(Modifier::BOLD)),
            Span::styled("] retry", Style::default().fg(theme.grey1)),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(hint_paragraph, chunks[1]);
    }

    /// Render the key binding overlay
    pub fn render_help(frame: &mut Frame, keymap: &KeymapConfig, theme: &Theme) {
        let rows = help_rows(keymap);
        let area = frame.area();
        let popup_width = 44u16.min(area.width.saturating_sub(4));
        let popup_height = (rows.len() as u16 + 4).min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));

        let mut lines: Vec<Line> = rows
            .into_iter()
            .map(|(keys, description)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:>12}  ", keys),
                        Style::default().fg(theme.yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(description, Style::default().fg(theme.fg0)),
                ])
            })
            .collect();
        lines.push(Line::default());
        lines.push(
            Line::from(Span::styled("Press any key to close", Style::default().fg(theme.grey1)))
                .alignment(Alignment::Center),
        );

        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }
}

fn help_rows(keymap: &KeymapConfig) -> Vec<(String, &'static str)> {
    vec![
        (format!("{} {} ←", keymap.previous, keymap.previous_alt), "Previous title"),
        (format!("{} {} →", keymap.next, keymap.next_alt), "Next title"),
        (format!("{} Space", keymap.activate), "Open details"),
        (format!("{} Esc", keymap.back), "Back"),
        (keymap.search.clone(), "Filter titles"),
        (keymap.refresh.clone(), "Refresh"),
        (keymap.cycle_kind.clone(), "All / movies / TV"),
        (keymap.toggle_window.clone(), "Day / week"),
        (keymap.toggle_loop.clone(), "Toggle looping"),
        (keymap.toggle_theme.clone(), "Light / dark theme"),
        (keymap.open_browser.clone(), "Open on TMDB"),
        (keymap.quit.clone(), "Quit"),
    ]
}

/// Helper function to create a centered rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Truncate a string to `max_width` display cells with an ellipsis
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("Dune", 10), "Dune");
        assert_eq!(truncate_str("Dune: Part Two", 8), "Dune: P…");
        assert_eq!(truncate_str("abc", 0), "");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // each CJK char is two cells wide
        assert_eq!(truncate_str("千と千尋の神隠し", 7), "千と千…");
    }

    #[test]
    fn test_centered_rect() {
        let rect = centered_rect(20, 6, Rect::new(0, 0, 100, 30));
        assert_eq!(rect, Rect::new(40, 12, 20, 6));
    }
}
