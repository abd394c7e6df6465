//! Pokémon detail page rendering
//!
//! Renders the record of a single Pokémon: overview and species notes on the
//! left, base stats as bars on the right and the evolution chain below.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::widgets::StatBar;
use super::{colors, type_badges};
use crate::app::App;
use crate::data::format::{
    format_height, format_pokemon_id, format_pokemon_name, format_weight, sprite_url, SpriteKind,
};
use crate::data::{EvolutionStage, Pokemon};

/// Renders the detail page for `id`
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `app` - The application state
/// * `area` - Area below the tab bar
/// * `id` - Id or name the page was opened with
pub fn render(frame: &mut Frame, app: &App, area: Rect, id: &str) {
    let pokemon = match app.current.as_ref() {
        Some(pokemon) if matches_ident(pokemon, id) => pokemon,
        _ => {
            render_no_data(frame, area, id);
            return;
        }
    };

    let is_favorite = app.favorites.is_favorite(pokemon.id);
    let mut title = vec![
        Span::styled(
            format!(" {} ", format_pokemon_name(&pokemon.name)),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} ", format_pokemon_id(pokemon.id)),
            Style::default().fg(colors::SECONDARY),
        ),
    ];
    if is_favorite {
        title.push(Span::styled("♥ ", Style::default().fg(colors::FAVORITE)));
    }

    let main_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Line::from(title))
        .title_bottom(if is_favorite {
            " Space remove from favorites  j/k scroll "
        } else {
            " Space add to favorites  j/k scroll "
        });
    let inner = main_block.inner(area);
    frame.render_widget(main_block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(4)])
        .split(inner);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[0]);

    let overview = Paragraph::new(overview_lines(pokemon))
        .wrap(Wrap { trim: true })
        .scroll((app.detail_scroll_offset, 0));
    frame.render_widget(overview, columns[0]);

    render_stats(frame, pokemon, columns[1]);
    render_evolution(frame, &app.evolution, pokemon.id, rows[1]);
}

/// Whether `pokemon` is the one a page for `ident` shows
fn matches_ident(pokemon: &Pokemon, ident: &str) -> bool {
    pokemon.id.to_string() == ident || pokemon.name.eq_ignore_ascii_case(ident)
}

fn overview_lines(pokemon: &Pokemon) -> Vec<Line<'static>> {
    let label = Style::default().fg(colors::SECONDARY);
    let heading = Style::default()
        .fg(colors::HEADER)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from(type_badges(&pokemon.type_names())), Line::from("")];

    if let Some(genus) = pokemon.species_data.as_ref().and_then(|s| s.genus.clone()) {
        lines.push(Line::from(Span::styled(
            genus,
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::from(vec![
        Span::styled("Height  ", label),
        Span::raw(format_height(pokemon.height)),
        Span::styled("   Weight  ", label),
        Span::raw(format_weight(pokemon.weight)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Base experience  ", label),
        Span::raw(
            pokemon
                .base_experience
                .map(|xp| xp.to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
        ),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Abilities", heading)));
    for slot in &pokemon.abilities {
        let mut spans = vec![Span::raw(format!("  {}", format_pokemon_name(&slot.ability.name)))];
        if slot.is_hidden {
            spans.push(Span::styled(" (hidden)", label));
        }
        lines.push(Line::from(spans));
    }

    if let Some(text) = pokemon.species_data.as_ref().and_then(|s| s.flavor_text.clone()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Pokédex entry", heading)));
        lines.push(Line::from(text));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Artwork", heading)));
    lines.push(Line::from(Span::styled(
        sprite_url(Some(&pokemon.sprites), SpriteKind::Artwork),
        label,
    )));
    lines.push(Line::from(Span::styled(
        sprite_url(Some(&pokemon.sprites), SpriteKind::Shiny),
        label,
    )));

    lines
}

/// Short label for a stat name
pub fn stat_label(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "special-attack" => "Sp. Atk".to_string(),
        "special-defense" => "Sp. Def".to_string(),
        other => format_pokemon_name(other),
    }
}

fn render_stats(frame: &mut Frame, pokemon: &Pokemon, area: Rect) {
    let block = Block::default()
        .title(" Base Stats ")
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(colors::SECONDARY));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    const LABEL_WIDTH: u16 = 9;
    const VALUE_WIDTH: u16 = 5;

    let total: u32 = pokemon.stats.iter().map(|s| s.base_stat).sum();
    let visible = pokemon.stats.len().min(inner.height.saturating_sub(2) as usize);

    for (i, stat) in pokemon.stats.iter().take(visible).enumerate() {
        let y = inner.y + 1 + i as u16;
        let label_area = Rect::new(inner.x + 1, y, LABEL_WIDTH, 1).intersection(inner);
        let value_area = Rect::new(inner.x + 1 + LABEL_WIDTH, y, VALUE_WIDTH, 1).intersection(inner);
        let bar_x = inner.x + 1 + LABEL_WIDTH + VALUE_WIDTH;
        let bar_area = Rect::new(bar_x, y, inner.right().saturating_sub(bar_x + 1), 1);

        frame.render_widget(
            Paragraph::new(stat_label(&stat.stat.name)).style(Style::default().fg(colors::SECONDARY)),
            label_area,
        );
        frame.render_widget(Paragraph::new(format!("{:>3}", stat.base_stat)), value_area);
        frame.render_widget(StatBar::new(stat.base_stat), bar_area);
    }

    let total_y = inner.y + 1 + visible as u16;
    if total_y < inner.bottom() {
        let total_area = Rect::new(inner.x + 1, total_y, inner.width.saturating_sub(1), 1);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{:<width$}", "Total", width = LABEL_WIDTH as usize), Style::default().fg(colors::SECONDARY)),
                Span::styled(format!("{:>3}", total), Style::default().add_modifier(Modifier::BOLD)),
            ])),
            total_area,
        );
    }
}

fn render_evolution(frame: &mut Frame, stages: &[EvolutionStage], current_id: u32, area: Rect) {
    let block = Block::default()
        .title(" Evolution ")
        .borders(Borders::TOP)
        .border_style(Style::default().fg(colors::SECONDARY));

    let line = if stages.len() <= 1 {
        Line::from(Span::styled(
            "This Pokémon does not evolve.",
            Style::default().fg(colors::SECONDARY),
        ))
    } else {
        let mut spans = Vec::new();
        for (i, stage) in stages.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" → ", Style::default().fg(colors::SECONDARY)));
            }
            let is_current = stage.pokemon.as_ref().map(|p| p.id) == Some(current_id);
            let style = if is_current {
                Style::default()
                    .fg(colors::SELECTED)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors::PRIMARY)
            };
            let label = match &stage.pokemon {
                Some(p) => format!("{} {}", format_pokemon_name(&stage.name), format_pokemon_id(p.id)),
                None => format_pokemon_name(&stage.name),
            };
            spans.push(Span::styled(label, style));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Renders a message when nothing has been loaded for this page yet
fn render_no_data(frame: &mut Frame, area: Rect, id: &str) {
    let block = Block::default()
        .title(format!(" Pokémon {} ", id))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER));
    let paragraph = Paragraph::new("No data available yet.")
        .style(Style::default().fg(colors::SECONDARY))
        .block(block);
    frame.render_widget(paragraph, area);
}
