//! About page rendering

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::colors;

/// Renders the about page
pub fn render(frame: &mut Frame, area: Rect) {
    let heading = Style::default()
        .fg(colors::HEADER)
        .add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(Span::styled("About PokéBlog", heading)),
        Line::from(""),
        Line::from("PokéBlog is a terminal Pokédex. Pokémon data comes from PokéAPI"),
        Line::from("(https://pokeapi.co) and is kept for a few minutes so pages open"),
        Line::from("instantly when you come back to them."),
        Line::from(""),
        Line::from(Span::styled("Features", heading)),
        Line::from("  Featured Pokémon on the home page"),
        Line::from("  Search by name or Pokédex number (1-1010)"),
        Line::from("  Browse all Pokémon page by page or by type"),
        Line::from("  Stats, abilities, species notes and evolution chains"),
        Line::from("  Favorites saved on disk, with JSON export and import"),
        Line::from(""),
        Line::from(Span::styled(
            "Pokémon and Pokémon character names are trademarks of Nintendo.",
            Style::default().fg(colors::SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::HEADER)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
