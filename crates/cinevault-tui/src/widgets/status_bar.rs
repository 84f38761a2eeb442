use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Mode, Screen};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let status_text = match &app.mode {
            Mode::Search(query) => format!(" /{}", query),
            _ => {
                if let Some(msg) = &app.status_message {
                    format!(" {}", msg)
                } else {
                    Self::summary(app)
                }
            }
        };

        let help_hint = match app.screen {
            Screen::Browse => " q:quit h/l:move Enter:open /:filter ?:help ",
            Screen::Detail => " Esc:back j/k:scroll b:browser ?:help ",
        };
        let padding_len =
            (area.width as usize).saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey1).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    fn summary(app: &App) -> String {
        let mode_str = match (&app.mode, app.screen) {
            (Mode::Help, _) => "HELP",
            (Mode::Error(_), _) => "ERROR",
            (_, Screen::Detail) => "DETAIL",
            _ => "BROWSE",
        };

        let position = match app.carousel.focused_index() {
            Some(index) => format!("{}/{}", index + 1, app.carousel.len()),
            None => "0/0".to_string(),
        };

        let filter = if app.filter.is_empty() {
            String::new()
        } else {
            format!(" | filter: {}", app.filter)
        };

        format!(
            " {} | {} {} | {}{}",
            mode_str, app.trending_kind, app.time_window, position, filter
        )
    }
}
