//! UI rendering module for PokéBlog
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components. Every page shares a tab bar
//! on top and a status footer at the bottom.

pub mod about;
pub mod browse;
pub mod categories;
pub mod detail;
pub mod favorites;
pub mod help_overlay;
pub mod home;
pub mod widgets;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, AppState};
use crate::data::format::format_pokemon_name;
use crate::data::PokemonType;

pub use help_overlay::render as render_help_overlay;

/// Color scheme shared by all pages
pub mod colors {
    use ratatui::style::Color;

    /// Section headers and borders
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::DarkGray;
    /// Selected row
    pub const SELECTED: Color = Color::Yellow;
    /// Favorite marker
    pub const FAVORITE: Color = Color::LightRed;
    /// Error messages
    pub const ERROR: Color = Color::Red;
    /// Confirmation messages
    pub const OK: Color = Color::Green;
}

/// Page names in the tab bar, in number key order
const TABS: [&str; 6] = ["Home", "Search", "Categories", "Random", "Favorites", "About"];

/// Renders the UI based on the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if app.state == AppState::Loading {
        render_loading(frame, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_tabs(frame, app, chunks[0]);

    let body = chunks[1];
    if let Some(ref message) = app.error {
        render_error(frame, body, message);
    } else {
        match &app.state {
            AppState::Loading => render_loading(frame, body),
            AppState::Home => home::render(frame, app, body),
            AppState::Search => browse::render(frame, app, body),
            AppState::Categories => categories::render_index(frame, app, body),
            AppState::TypeMembers(kind) => categories::render_members(frame, app, body, kind),
            AppState::Detail(id) => detail::render(frame, app, body, id),
            AppState::Favorites => favorites::render(frame, app, body),
            AppState::About => about::render(frame, body),
        }
    }

    render_footer(frame, app, chunks[2]);

    if app.show_help {
        render_help_overlay(frame);
    }
}

/// Renders a loading message in the middle of `area`
fn render_loading(frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Loading Pokémon...")
        .style(Style::default().fg(colors::HEADER))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Error",
            Style::default()
                .fg(colors::ERROR)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "r to retry  Esc to go back",
            Style::default().fg(colors::SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(colors::ERROR)));
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let active = match app.state {
        AppState::Home | AppState::Loading => 0,
        AppState::Search => 1,
        AppState::Categories | AppState::TypeMembers(_) => 2,
        AppState::Detail(_) => 3,
        AppState::Favorites => 4,
        AppState::About => 5,
    };

    let mut spans = vec![Span::styled(
        " PokéBlog ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
    )];
    for (i, tab) in TABS.iter().enumerate() {
        let label = if i == 4 {
            format!(" {} {} ({}) ", i + 1, tab, app.favorites.count())
        } else {
            format!(" {} {} ", i + 1, tab)
        };
        let style = if i == active && !matches!(app.state, AppState::Detail(_)) {
            Style::default()
                .fg(colors::SELECTED)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors::SECONDARY)
        };
        spans.push(Span::styled(label, style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = if app.is_loading() {
        Line::from(Span::styled("Loading...", Style::default().fg(colors::HEADER)))
    } else if let Some(ref message) = app.status_message {
        Line::from(Span::styled(message.clone(), Style::default().fg(colors::OK)))
    } else {
        Line::from(Span::styled(
            format!("#{}  ? help  q quit", app.route().to_path()),
            Style::default().fg(colors::SECONDARY),
        ))
    };

    frame.render_widget(Paragraph::new(line), area);
}

/// Color for a type badge, gray for names outside the canonical 18
pub fn type_color(type_name: &str) -> Color {
    match PokemonType::from_name(type_name) {
        Some(kind) => {
            let (r, g, b) = kind.rgb();
            Color::Rgb(r, g, b)
        }
        None => Color::Gray,
    }
}

/// Colored type badges separated by spaces
pub fn type_badges(type_names: &[&str]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, name) in type_names.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            format!(" {} ", name.to_uppercase()),
            Style::default()
                .fg(Color::Black)
                .bg(type_color(name))
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans
}

/// Style for a list row depending on selection
pub fn row_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(colors::SELECTED)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors::PRIMARY)
    }
}

/// `> ` for the selected row, two spaces otherwise
pub fn row_marker(selected: bool) -> &'static str {
    if selected {
        "> "
    } else {
        "  "
    }
}

/// A list row: marker, padded number, display name, badges
pub fn pokemon_row(
    selected: bool,
    number: &str,
    name: &str,
    type_names: &[&str],
    favorite: bool,
) -> Line<'static> {
    let mut spans = vec![
        Span::styled(row_marker(selected), row_style(selected)),
        Span::styled(format!("{:<6}", number), Style::default().fg(colors::SECONDARY)),
        Span::styled(format!("{:<16}", format_pokemon_name(name)), row_style(selected)),
    ];
    spans.extend(type_badges(type_names));
    if favorite {
        spans.push(Span::styled(" ♥", Style::default().fg(colors::FAVORITE)));
    }
    Line::from(spans)
}

/// Scroll offset that keeps `selected` inside a window of `height` rows
pub fn scroll_for(selected: usize, height: u16) -> u16 {
    let height = height.max(1) as usize;
    selected.saturating_sub(height - 1) as u16
}
