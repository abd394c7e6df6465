//! Display helpers for names, ids, measurements and sprites

use chrono::{DateTime, Utc};

use super::Sprites;

/// Shown when a Pokémon has no usable sprite
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150x150?text=No+Image";

/// Highest base stat value, used to scale stat bars
pub const MAX_BASE_STAT: u32 = 255;

/// Which sprite to prefer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteKind {
    #[default]
    Default,
    Shiny,
    Artwork,
}

/// Upper-cases the first character
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `mr-mime` becomes `Mr Mime`
pub fn format_pokemon_name(name: &str) -> String {
    name.split('-')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `25` becomes `#025`
pub fn format_pokemon_id(id: u32) -> String {
    format!("#{:03}", id)
}

/// Decimetres to metres, e.g. `7` becomes `0.7m`
pub fn format_height(height: u32) -> String {
    format!("{}m", height as f64 / 10.0)
}

/// Hectograms to kilograms, e.g. `69` becomes `6.9kg`
pub fn format_weight(weight: u32) -> String {
    format!("{}kg", weight as f64 / 10.0)
}

/// Picks a sprite URL, falling back to the front sprite and then the placeholder
pub fn sprite_url(sprites: Option<&Sprites>, kind: SpriteKind) -> String {
    let Some(sprites) = sprites else {
        return PLACEHOLDER_IMAGE.to_string();
    };

    let preferred = match kind {
        SpriteKind::Artwork => sprites
            .other
            .as_ref()
            .and_then(|other| other.official_artwork.as_ref())
            .and_then(|art| art.front_default.clone()),
        SpriteKind::Shiny => sprites.front_shiny.clone(),
        SpriteKind::Default => None,
    };

    preferred
        .or_else(|| sprites.front_default.clone())
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}

/// Relative age of a timestamp in days or hours
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - then).num_hours();
    let days = hours / 24;

    if days > 0 {
        format!("{} day{} ago", days, if days > 1 { "s" } else { "" })
    } else if hours > 0 {
        format!("{} hour{} ago", hours, if hours > 1 { "s" } else { "" })
    } else {
        "Less than an hour ago".to_string()
    }
}

/// Fraction of a stat bar to fill, capped at 1.0
pub fn stat_fill_ratio(base_stat: u32) -> f64 {
    (base_stat as f64 / MAX_BASE_STAT as f64).min(1.0)
}
