//! Home page rendering
//!
//! Shows a short welcome and the featured Pokémon.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{colors, pokemon_row, scroll_for};
use crate::app::App;
use crate::data::format::format_pokemon_id;

/// Renders the home page
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    let intro = vec![
        Line::from(Span::styled(
            "Welcome to PokéBlog",
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("Discover Pokémon, browse them by type and keep a list of favorites."),
        Line::from(Span::styled(
            "/ search  4 random Pokémon  Enter open",
            Style::default().fg(colors::SECONDARY),
        )),
    ];
    frame.render_widget(Paragraph::new(intro), chunks[0]);

    let block = Block::default()
        .title(" Featured Pokémon ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));
    let inner_height = block.inner(chunks[1]).height;

    let lines: Vec<Line> = if app.featured.is_empty() {
        vec![Line::from(Span::styled(
            "No featured Pokémon loaded yet.",
            Style::default().fg(colors::SECONDARY),
        ))]
    } else {
        app.featured
            .iter()
            .enumerate()
            .map(|(i, pokemon)| {
                pokemon_row(
                    i == app.selected_index,
                    &format_pokemon_id(pokemon.id),
                    &pokemon.name,
                    &pokemon.type_names(),
                    app.favorites.is_favorite(pokemon.id),
                )
            })
            .collect()
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll_for(app.selected_index, inner_height), 0));
    frame.render_widget(paragraph, chunks[1]);
}
