//! Search query parsing
//!
//! A query is either a numeric id or a name. Validation happens before any
//! request is made so that obviously bad input never reaches the API.

use super::client::PokemonError;
use super::MAX_POKEMON_ID;

/// Suggestions offered before the first search
pub const POPULAR_SEARCHES: [&str; 6] = [
    "Pikachu", "Charizard", "Mewtwo", "Lucario", "Garchomp", "Rayquaza",
];

/// A validated search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Id(u32),
    Name(String),
}

impl SearchQuery {
    /// The identifier to request, as used in API paths and cache keys
    pub fn as_identifier(&self) -> String {
        match self {
            SearchQuery::Id(id) => id.to_string(),
            SearchQuery::Name(name) => name.clone(),
        }
    }
}

/// Parses raw user input into a `SearchQuery`
///
/// # Returns
/// * `Ok(SearchQuery::Id)` for numeric input within `1..=1010`
/// * `Ok(SearchQuery::Name)` for names, trimmed and lower-cased
/// * `Err(PokemonError::EmptyQuery)` for blank input
/// * `Err(PokemonError::InvalidId)` for numbers outside the id range
/// * `Err(PokemonError::NotFound)` for text no Pokémon name can match
pub fn parse_query(query: &str) -> Result<SearchQuery, PokemonError> {
    let query = query.trim().to_lowercase();

    if query.is_empty() {
        return Err(PokemonError::EmptyQuery);
    }

    let digits = query.strip_prefix('-').unwrap_or(&query);
    let numeric = !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit());

    if numeric {
        return match query.parse::<i64>() {
            Ok(id) if (1..=MAX_POKEMON_ID as i64).contains(&id) => Ok(SearchQuery::Id(id as u32)),
            _ => Err(PokemonError::InvalidId(query)),
        };
    }

    if !is_valid_pokemon_name(&query) {
        return Err(PokemonError::NotFound(query));
    }

    Ok(SearchQuery::Name(query))
}

/// Whether `name` could be a PokéAPI name: ASCII letters, digits and hyphens,
/// with at least one letter
pub fn is_valid_pokemon_name(name: &str) -> bool {
    let name = name.trim();
    name.chars().any(|c| c.is_ascii_alphabetic())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
