//! Categories page rendering
//!
//! The type index and the members of a single type.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{colors, pokemon_row, row_marker, row_style, scroll_for, type_color};
use crate::app::App;
use crate::data::format::{capitalize, format_pokemon_id};
use crate::data::type_names;

/// Renders the list of types
pub fn render_index(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Pokémon Types ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));
    let inner_height = block.inner(area).height;

    let lines: Vec<Line> = if app.types.is_empty() {
        vec![Line::from(Span::styled(
            "No types loaded yet.",
            Style::default().fg(colors::SECONDARY),
        ))]
    } else {
        app.types
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                let selected = i == app.selected_index;
                let mut style = Style::default()
                    .fg(Color::Black)
                    .bg(type_color(&kind.name));
                if selected {
                    style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                }
                Line::from(vec![
                    Span::styled(row_marker(selected), row_style(selected)),
                    Span::styled(format!(" {:<10} ", capitalize(&kind.name)), style),
                ])
            })
            .collect()
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll_for(app.selected_index, inner_height), 0));
    frame.render_widget(paragraph, area);
}

/// Renders the members of `kind`
pub fn render_members(frame: &mut Frame, app: &App, area: Rect, kind: &str) {
    let title = match &app.type_members {
        Some(members) if members.name == kind => format!(
            " {} type  showing {} of {} ",
            capitalize(kind),
            members.pokemon.len(),
            members.total
        ),
        _ => format!(" {} type ", capitalize(kind)),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(type_color(kind)));
    let inner_height = block.inner(area).height;

    let lines: Vec<Line> = match &app.type_members {
        Some(members) if members.name == kind && !members.pokemon.is_empty() => members
            .pokemon
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let number = row.id.map(format_pokemon_id).unwrap_or_default();
                pokemon_row(
                    i == app.selected_index,
                    &number,
                    &row.name,
                    &type_names(&row.types),
                    row.id.map(|id| app.favorites.is_favorite(id)).unwrap_or(false),
                )
            })
            .collect(),
        _ => vec![Line::from(Span::styled(
            "No Pokémon of this type loaded.",
            Style::default().fg(colors::SECONDARY),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll_for(app.selected_index, inner_height), 0));
    frame.render_widget(paragraph, area);
}
