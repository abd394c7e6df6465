//! Search page rendering
//!
//! A search box above the paged listing of every Pokémon. Until the first
//! search of the session a panel offers recent and popular searches. Rows
//! whose details could not be fetched show only their name.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{colors, pokemon_row, scroll_for};
use crate::app::App;
use crate::data::client::DEFAULT_PAGE_LIMIT;
use crate::data::format::{format_pokemon_id, format_pokemon_name};
use crate::data::{type_names, POPULAR_SEARCHES};

/// Renders the search page
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if app.searched {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        render_search_box(frame, app, chunks[0]);
        render_listing(frame, app, chunks[1]);
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Min(3),
            ])
            .split(area);

        render_search_box(frame, app, chunks[0]);
        render_suggestions(frame, app, chunks[1]);
        render_listing(frame, app, chunks[2]);
    }
}

fn render_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let (border, hint) = if app.search_editing {
        (colors::SELECTED, " Enter search  Tab suggestion  Esc cancel ")
    } else {
        (colors::HEADER, " / to type a name or number ")
    };

    let mut spans = vec![Span::raw(app.search_input.clone())];
    if app.search_editing {
        spans.push(Span::styled("_", Style::default().fg(colors::SELECTED)));
    } else if app.search_input.is_empty() {
        spans.push(Span::styled(
            "e.g. pikachu or 25",
            Style::default().fg(colors::SECONDARY),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Search ")
            .title_bottom(hint)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(paragraph, area);
}

fn render_suggestions(frame: &mut Frame, app: &App, area: Rect) {
    let label = Style::default().fg(colors::HEADER);
    let muted = Style::default().fg(colors::SECONDARY);

    let mut recent = vec![Span::styled("Recent   ", label)];
    if app.search_history.is_empty() {
        recent.push(Span::styled("no searches yet", muted));
    }
    for entry in app.search_history.entries() {
        recent.push(Span::styled(
            entry.query.clone(),
            Style::default().fg(colors::PRIMARY),
        ));
        recent.push(Span::styled(
            format!(" {}  ", format_pokemon_id(entry.pokemon.id)),
            muted,
        ));
    }

    let mut popular = vec![Span::styled("Popular  ", label)];
    for name in POPULAR_SEARCHES {
        popular.push(Span::styled(
            format!("{}  ", format_pokemon_name(name)),
            Style::default().fg(colors::PRIMARY),
        ));
    }

    let paragraph = Paragraph::new(vec![Line::from(recent), Line::from(popular)]).block(
        Block::default()
            .title(" Suggestions ")
            .title_bottom(" Tab to fill in while typing ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors::SECONDARY)),
    );
    frame.render_widget(paragraph, area);
}

fn render_listing(frame: &mut Frame, app: &App, area: Rect) {
    let title = match &app.list_page {
        Some(page) => {
            let first = app.list_offset + 1;
            let last = app.list_offset + page.results.len() as u32;
            let pages = page.count.div_ceil(DEFAULT_PAGE_LIMIT).max(1);
            let current = app.list_offset / DEFAULT_PAGE_LIMIT + 1;
            format!(
                " All Pokémon {}-{} of {}  page {}/{}  n/p ",
                first, last, page.count, current, pages
            )
        }
        None => " All Pokémon ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));
    let inner_height = block.inner(area).height;

    let lines: Vec<Line> = match &app.list_page {
        Some(page) if !page.results.is_empty() => page
            .results
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
            "No Pokémon on this page.",
            Style::default().fg(colors::SECONDARY),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll_for(app.selected_index, inner_height), 0));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::cache::CacheConfig;
    use crate::data::{
        NamedResource, Pokemon, PokemonClient, PokemonListPage, PokemonSummary, Sprites,
    };
    use crate::favorites::FavoritesStore;
    use crate::router::Route;
    use crate::ui::test_support::render_to_string;

    #[test]
    fn test_listing_shows_rows_and_paging() {
        let client = PokemonClient::with_base_url("http://127.0.0.1:9/api/v2", CacheConfig::default());
        let mut app = App::with_parts(client, FavoritesStore::in_memory());
        app.open(Route::Search(None));
        app.pending = None;
        app.list_offset = 20;
        app.list_page = Some(PokemonListPage {
            count: 1302,
            next: Some("next".to_string()),
            previous: Some("previous".to_string()),
            results: vec![PokemonSummary::from_resource(&NamedResource {
                name: "spearow".to_string(),
                url: "https://pokeapi.co/api/v2/pokemon/21/".to_string(),
            })],
        });

        let content = render_to_string(&app);
        assert!(content.contains("#021"));
        assert!(content.contains("Spearow"));
        assert!(content.contains("page 2/66"));
    }

    #[test]
    fn test_search_box_shows_typed_text() {
        let client = PokemonClient::with_base_url("http://127.0.0.1:9/api/v2", CacheConfig::default());
        let mut app = App::with_parts(client, FavoritesStore::in_memory());
        app.open(Route::Search(None));
        app.pending = None;
        app.search_editing = true;
        app.search_input = "eev".to_string();

        let content = render_to_string(&app);
        assert!(content.contains("eev_"));
        assert!(content.contains("Esc cancel"));
    }

    fn test_app() -> App {
        let client = PokemonClient::with_base_url("http://127.0.0.1:9/api/v2", CacheConfig::default());
        let mut app = App::with_parts(client, FavoritesStore::in_memory());
        app.open(Route::Search(None));
        app.pending = None;
        app
    }

    fn pokemon(id: u32, name: &str) -> Pokemon {
        Pokemon {
            id,
            name: name.to_string(),
            height: 1,
            weight: 1,
            base_experience: None,
            types: Vec::new(),
            abilities: Vec::new(),
            stats: Vec::new(),
            sprites: Sprites::default(),
            species: NamedResource {
                name: name.to_string(),
                url: String::new(),
            },
            species_data: None,
        }
    }

    #[test]
    fn test_suggestions_shown_before_first_search() {
        let mut app = test_app();
        app.search_history
            .record("eevee", &pokemon(133, "eevee"))
            .unwrap();

        let content = render_to_string(&app);
        assert!(content.contains("Suggestions"));
        assert!(content.contains("eevee #133"));
        assert!(content.contains("Garchomp"));
        assert!(content.contains("Rayquaza"));
    }

    #[test]
    fn test_suggestions_without_history() {
        let app = test_app();
        let content = render_to_string(&app);
        assert!(content.contains("no searches yet"));
        assert!(content.contains("Pikachu"));
    }

    #[test]
    fn test_suggestions_hidden_after_search() {
        let mut app = test_app();
        app.searched = true;
        let content = render_to_string(&app);
        assert!(!content.contains("Suggestions"));
        assert!(content.contains("All Pokémon"));
    }
}
