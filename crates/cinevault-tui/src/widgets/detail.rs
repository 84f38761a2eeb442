use cinevault_core::media::{Credits, MediaDetail, MediaKind, Provider, WatchProviders};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{DetailState, Fetch};
use crate::theme::Theme;

pub struct DetailWidget;

impl DetailWidget {
    pub fn render(frame: &mut Frame, area: Rect, state: &DetailState, theme: &Theme) {
        let block = Block::default()
            .title(format!(" {} ", state.item.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg0));

        let lines = match &state.detail {
            Fetch::Loading => vec![Line::from(Span::styled(
                "Loading...",
                Style::default().fg(theme.grey1),
            ))],
            Fetch::Failed(_) => not_found_lines(theme),
            Fetch::Ready(detail) => {
                let mut lines = detail_lines(detail, theme);
                lines.push(Line::default());
                lines.extend(cast_lines(&state.credits, theme));
                lines.push(Line::default());
                lines.extend(provider_lines(&state.providers, theme));
                lines
            }
        };

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((state.scroll, 0));
        frame.render_widget(paragraph, area);
    }
}

fn not_found_lines(theme: &Theme) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "Content not found",
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "The title may have been removed. Press Esc to go back.",
            Style::default().fg(theme.grey1),
        )),
    ]
}

fn heading(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(theme.yellow).add_modifier(Modifier::BOLD),
    ))
}

fn field(label: &str, value: String, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<10}", label), Style::default().fg(theme.grey1)),
        Span::styled(value, Style::default().fg(theme.fg0)),
    ])
}

fn detail_lines(detail: &MediaDetail, theme: &Theme) -> Vec<Line<'static>> {
    let item = &detail.item;
    let mut lines = vec![Line::from(vec![
        Span::styled(
            item.title.clone(),
            Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(item.kind_label(), Style::default().fg(theme.blue)),
    ])];

    if let Some(tagline) = detail.tagline.as_deref() {
        lines.push(Line::from(Span::styled(
            tagline.to_string(),
            Style::default().fg(theme.grey1).add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::default());

    let released = item
        .release_date
        .clone()
        .unwrap_or_else(|| "Unknown".to_string());
    lines.push(field("Released", released, theme));
    lines.push(field("Rating", item.rating_label().trim_start_matches("Rating: ").to_string(), theme));
    if let Some(runtime) = detail.runtime_label() {
        lines.push(field("Runtime", runtime, theme));
    }
    if !detail.genres.is_empty() {
        lines.push(field("Genres", detail.genres.join(", "), theme));
    }
    if item.kind == MediaKind::Series {
        if let Some(seasons) = detail.number_of_seasons {
            let episodes = detail
                .number_of_episodes
                .map(|e| format!(", {} episodes", e))
                .unwrap_or_default();
            lines.push(field("Seasons", format!("{}{}", seasons, episodes), theme));
        }
    }
    if let Some(status) = detail.status.as_deref() {
        lines.push(field("Status", status.to_string(), theme));
    }
    if let Some(homepage) = detail.homepage.as_deref() {
        lines.push(field("Homepage", homepage.to_string(), theme));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        item.overview_or_placeholder().to_string(),
        Style::default().fg(theme.fg0),
    )));
    lines
}

fn cast_lines(credits: &Fetch<Option<Credits>>, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Cast", theme)];
    match credits {
        Fetch::Loading => lines.push(Line::from(Span::styled(
            "Loading...",
            Style::default().fg(theme.grey1),
        ))),
        Fetch::Ready(Some(credits)) => {
            for member in &credits.cast {
                let mut spans = vec![Span::styled(
                    member.name.clone(),
                    Style::default().fg(theme.fg0),
                )];
                if !member.character.is_empty() {
                    spans.push(Span::styled(
                        format!(" as {}", member.character),
                        Style::default().fg(theme.grey1),
                    ));
                }
                lines.push(Line::from(spans));
            }
        }
        Fetch::Ready(None) | Fetch::Failed(_) => lines.push(Line::from(Span::styled(
            "Cast information not available",
            Style::default().fg(theme.grey1),
        ))),
    }
    lines
}

fn provider_lines(providers: &Fetch<Option<WatchProviders>>, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Where to watch", theme)];
    match providers {
        Fetch::Loading => lines.push(Line::from(Span::styled(
            "Loading...",
            Style::default().fg(theme.grey1),
        ))),
        Fetch::Ready(Some(providers)) if !providers.is_empty() => {
            for (label, list) in [
                ("Stream", &providers.flatrate),
                ("Rent", &providers.rent),
                ("Buy", &providers.buy),
            ] {
                if !list.is_empty() {
                    lines.push(field(label, provider_names(list), theme));
                }
            }
        }
        _ => lines.push(Line::from(Span::styled(
            "Streaming information not available",
            Style::default().fg(theme.grey1),
        ))),
    }
    lines
}

fn provider_names(list: &[Provider]) -> String {
    list.iter()
        .map(|p| p.provider_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(name: &str) -> Provider {
        Provider {
            provider_id: 1,
            provider_name: name.to_string(),
            logo_path: None,
        }
    }

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_provider_sections() {
        let providers = WatchProviders {
            region: "US".to_string(),
            link: None,
            flatrate: vec![provider("Netflix"), provider("Max")],
            rent: Vec::new(),
            buy: vec![provider("Apple TV")],
        };
        let out = text(&provider_lines(&Fetch::Ready(Some(providers)), &Theme::default()));

        assert!(out.contains("Netflix, Max"));
        assert!(out.contains("Apple TV"));
        assert!(!out.contains("Rent"));
    }

    #[test]
    fn test_missing_auxiliary_data_degrades() {
        let theme = Theme::default();
        let cast = text(&cast_lines(&Fetch::Failed("timeout".to_string()), &theme));
        assert!(cast.contains("Cast information not available"));

        let providers = text(&provider_lines(&Fetch::Ready(None), &theme));
        assert!(providers.contains("Streaming information not available"));
    }
}
