//! Core data models for PokéBlog
//!
//! This module contains the types used throughout the application for
//! representing Pokémon, their types, stats and abilities, and the listing
//! pages returned by PokéAPI.

pub mod client;
pub mod evolution;
pub mod format;
pub mod search;

#[cfg(test)]
pub(crate) mod test_server;

pub use client::{PokemonClient, PokemonError};
pub use evolution::EvolutionStage;
pub use search::{parse_query, SearchQuery, POPULAR_SEARCHES};

use serde::{Deserialize, Serialize};

/// Highest Pokémon id accepted by search and random picks
pub const MAX_POKEMON_ID: u32 = 1010;

/// Ids shown on the home page
pub const FEATURED_POKEMON_IDS: [u32; 10] = [25, 1, 4, 7, 94, 144, 145, 146, 150, 151];

/// A `{ name, url }` reference as returned throughout PokéAPI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

impl NamedResource {
    /// Extracts the trailing numeric id from a resource URL
    ///
    /// `https://pokeapi.co/api/v2/pokemon/25/` yields `Some(25)`.
    pub fn id(&self) -> Option<u32> {
        self.url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse().ok())
    }
}

/// One of a Pokémon's types and its slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSlot {
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// An ability a Pokémon can have
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
}

/// A base stat value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    pub base_stat: u32,
    pub stat: NamedResource,
}

/// Official artwork sprite
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    pub front_default: Option<String>,
}

/// Alternative sprite sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<Artwork>,
}

/// Sprite image URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub front_shiny: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

/// The parts of a species record shown on the detail page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesData {
    /// English genus, e.g. "Mouse Pokémon"
    pub genus: Option<String>,
    /// First English flavor text with whitespace normalised
    pub flavor_text: Option<String>,
    /// URL of the evolution chain this species belongs to
    pub evolution_chain_url: Option<String>,
}

/// A full Pokémon record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    /// Height in decimetres
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub sprites: Sprites,
    pub species: NamedResource,
    /// Filled in from the species endpoint when it could be fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species_data: Option<SpeciesData>,
}

impl Pokemon {
    /// Type names in slot order
    pub fn type_names(&self) -> Vec<&str> {
        type_names(&self.types)
    }
}

/// Type names of a slot list in slot order
pub fn type_names(types: &[TypeSlot]) -> Vec<&str> {
    let mut slots: Vec<&TypeSlot> = types.iter().collect();
    slots.sort_by_key(|slot| slot.slot);
    slots.into_iter().map(|slot| slot.kind.name.as_str()).collect()
}

/// A row in a listing page
///
/// Details are resolved per row; when that fails only the name and URL from
/// the listing are known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub name: String,
    pub url: String,
    pub id: Option<u32>,
    pub types: Vec<TypeSlot>,
    pub sprites: Option<Sprites>,
}

impl PokemonSummary {
    /// Builds a summary from a fully fetched record
    pub fn from_pokemon(pokemon: &Pokemon, url: impl Into<String>) -> Self {
        Self {
            name: pokemon.name.clone(),
            url: url.into(),
            id: Some(pokemon.id),
            types: pokemon.types.clone(),
            sprites: Some(pokemon.sprites.clone()),
        }
    }

    /// Builds a bare summary from a listing reference
    pub fn from_resource(resource: &NamedResource) -> Self {
        Self {
            name: resource.name.clone(),
            url: resource.url.clone(),
            id: resource.id(),
            types: Vec::new(),
            sprites: None,
        }
    }

    /// The value to route to when this row is opened
    pub fn route_key(&self) -> String {
        self.id
            .map(|id| id.to_string())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// A page of the global Pokémon listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonListPage {
    /// Total number of Pokémon known to the API
    pub count: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<PokemonSummary>,
}

/// The index of all types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonTypeList {
    pub count: u32,
    pub results: Vec<NamedResource>,
}

/// Members of a single type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMembers {
    pub id: u32,
    pub name: String,
    /// Number of Pokémon of this type, including those not resolved
    pub total: usize,
    /// The first members, with details where they could be fetched
    pub pokemon: Vec<PokemonSummary>,
}

/// The 18 canonical Pokémon types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokemonType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl PokemonType {
    pub const ALL: [PokemonType; 18] = [
        PokemonType::Normal,
        PokemonType::Fire,
        PokemonType::Water,
        PokemonType::Electric,
        PokemonType::Grass,
        PokemonType::Ice,
        PokemonType::Fighting,
        PokemonType::Poison,
        PokemonType::Ground,
        PokemonType::Flying,
        PokemonType::Psychic,
        PokemonType::Bug,
        PokemonType::Rock,
        PokemonType::Ghost,
        PokemonType::Dragon,
        PokemonType::Dark,
        PokemonType::Steel,
        PokemonType::Fairy,
    ];

    /// Looks up a type by its API name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.api_name() == name)
    }

    /// Name used in API paths, e.g. `fire`
    pub fn api_name(&self) -> &'static str {
        match self {
            PokemonType::Normal => "normal",
            PokemonType::Fire => "fire",
            PokemonType::Water => "water",
            PokemonType::Electric => "electric",
            PokemonType::Grass => "grass",
            PokemonType::Ice => "ice",
            PokemonType::Fighting => "fighting",
            PokemonType::Poison => "poison",
            PokemonType::Ground => "ground",
            PokemonType::Flying => "flying",
            PokemonType::Psychic => "psychic",
            PokemonType::Bug => "bug",
            PokemonType::Rock => "rock",
            PokemonType::Ghost => "ghost",
            PokemonType::Dragon => "dragon",
            PokemonType::Dark => "dark",
            PokemonType::Steel => "steel",
            PokemonType::Fairy => "fairy",
        }
    }

    /// Badge color as an RGB triple
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            PokemonType::Normal => (0xA8, 0xA8, 0x78),
            PokemonType::Fire => (0xF0, 0x80, 0x30),
            PokemonType::Water => (0x68, 0x90, 0xF0),
            PokemonType::Electric => (0xF8, 0xD0, 0x30),
            PokemonType::Grass => (0x78, 0xC8, 0x50),
            PokemonType::Ice => (0x98, 0xD8, 0xD8),
            PokemonType::Fighting => (0xC0, 0x30, 0x28),
            PokemonType::Poison => (0xA0, 0x40, 0xA0),
            PokemonType::Ground => (0xE0, 0xC0, 0x68),
            PokemonType::Flying => (0xA8, 0x90, 0xF0),
            PokemonType::Psychic => (0xF8, 0x58, 0x88),
            PokemonType::Bug => (0xA8, 0xB8, 0x20),
            PokemonType::Rock => (0xB8, 0xA0, 0x38),
            PokemonType::Ghost => (0x70, 0x58, 0x98),
            PokemonType::Dragon => (0x70, 0x38, 0xF8),
            PokemonType::Dark => (0x70, 0x58, 0x48),
            PokemonType::Steel => (0xB8, 0xB8, 0xD0),
            PokemonType::Fairy => (0xEE, 0x99, 0xAC),
        }
    }
}
