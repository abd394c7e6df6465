//! Favorites page rendering
//!
//! Summary counts, the active sort and type filter, then the favorites list.

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{colors, row_marker, row_style, scroll_for, type_badges};
use crate::app::App;
use crate::data::format::{format_pokemon_id, format_pokemon_name, time_ago};

/// Renders the favorites page
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    render_summary(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let label = Style::default().fg(colors::SECONDARY);
    let value = Style::default()
        .fg(colors::PRIMARY)
        .add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(vec![
            Span::styled("Favorites ", label),
            Span::styled(app.favorites.count().to_string(), value),
            Span::styled("   Types ", label),
            Span::styled(app.favorites.unique_type_count().to_string(), value),
            Span::styled("   Added today ", label),
            Span::styled(app.recent_favorites().to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Sort ", label),
            Span::raw(app.favorite_sort.label()),
            Span::styled("   Type ", label),
            Span::raw(app.favorite_type_filter.as_deref().unwrap_or("All").to_string()),
        ]),
        Line::from(Span::styled(
            "s sort  t type filter  d remove  C C clear all  Enter open",
            label,
        )),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" My Favorites ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::FAVORITE));
    let inner_height = block.inner(area).height;

    let favorites = app.visible_favorites();
    let now = Utc::now();

    let lines: Vec<Line> = if favorites.is_empty() {
        let message = if app.favorites.count() == 0 {
            "No favorites yet. Press Space on a Pokémon's page to add it."
        } else {
            "No favorites of this type."
        };
        vec![Line::from(Span::styled(
            message,
            Style::default().fg(colors::SECONDARY),
        ))]
    } else {
        favorites
            .iter()
            .enumerate()
            .map(|(i, fav)| {
                let selected = i == app.selected_index;
                let mut spans = vec![
                    Span::styled(row_marker(selected), row_style(selected)),
                    Span::styled(
                        format!("{:<6}", format_pokemon_id(fav.id)),
                        Style::default().fg(colors::SECONDARY),
                    ),
                    Span::styled(format!("{:<16}", format_pokemon_name(&fav.name)), row_style(selected)),
                ];
                spans.extend(type_badges(&fav.type_names()));
                spans.push(Span::styled(
                    format!("  {}", time_ago(fav.added_at, now)),
                    Style::default().fg(colors::SECONDARY),
                ));
                Line::from(spans)
            })
            .collect()
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll_for(app.selected_index, inner_height), 0));
    frame.render_widget(paragraph, area);
}
