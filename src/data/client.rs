//! PokéAPI client
//!
//! This module fetches Pokémon, listing pages and type data from PokéAPI and
//! keeps recently fetched responses in per-resource `TimedCache`s, so moving
//! back and forth between pages does not refetch the same records.

use futures::future::join_all;
use log::{info, warn};
use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use super::evolution::{flatten_chain, EvolutionChainResponse, EvolutionStage};
use super::search::parse_query;
use super::{
    NamedResource, Pokemon, PokemonListPage, PokemonSummary, PokemonTypeList, SpeciesData,
    TypeMembers, FEATURED_POKEMON_IDS, MAX_POKEMON_ID,
};
use crate::cache::{CacheConfig, TimedCache};

/// Base URL for PokéAPI
const API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Default page size for listings
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest page size accepted for listings
pub const MAX_PAGE_LIMIT: u32 = 50;

/// Members resolved with details when browsing a type
const TYPE_MEMBER_LIMIT: usize = 20;

/// Errors that can occur when fetching Pokémon data
#[derive(Debug, Error)]
pub enum PokemonError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API answered with a non-success status
    #[error("Failed to fetch {resource}: {status}")]
    Status { resource: &'static str, status: u16 },

    /// No Pokémon with the requested id or name
    #[error("Pokemon \"{0}\" not found")]
    NotFound(String),

    /// Search input was blank
    #[error("Please enter a Pokemon name or ID")]
    EmptyQuery,

    /// Numeric search input outside the known id range
    #[error("Pokemon ID must be between 1 and 1010")]
    InvalidId(String),
}

impl PokemonError {
    /// Whether the error means the server has no such resource
    pub fn is_not_found(&self) -> bool {
        matches!(self, PokemonError::NotFound(_))
            || matches!(self, PokemonError::Status { status, .. } if *status == StatusCode::NOT_FOUND.as_u16())
    }
}

/// Raw listing response from `/pokemon`
#[derive(Debug, Deserialize)]
struct ListResponse {
    count: u32,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<NamedResource>,
}

/// Raw response from `/type/{name}`
#[derive(Debug, Deserialize)]
struct TypeResponse {
    id: u32,
    name: String,
    pokemon: Vec<TypeMemberEntry>,
}

#[derive(Debug, Deserialize)]
struct TypeMemberEntry {
    pokemon: NamedResource,
}

/// Raw response from `/pokemon-species/{id}`
#[derive(Debug, Deserialize)]
struct SpeciesResponse {
    #[serde(default)]
    genera: Vec<Genus>,
    #[serde(default)]
    flavor_text_entries: Vec<FlavorText>,
    evolution_chain: Option<UrlReference>,
}

#[derive(Debug, Deserialize)]
struct Genus {
    genus: String,
    language: NamedResource,
}

#[derive(Debug, Deserialize)]
struct FlavorText {
    flavor_text: String,
    language: NamedResource,
}

#[derive(Debug, Deserialize)]
struct UrlReference {
    url: String,
}

impl From<SpeciesResponse> for SpeciesData {
    fn from(response: SpeciesResponse) -> Self {
        let genus = response
            .genera
            .into_iter()
            .find(|genus| genus.language.name == "en")
            .map(|genus| genus.genus);

        // Flavor text carries form feeds and hard line breaks from the games
        let flavor_text = response
            .flavor_text_entries
            .into_iter()
            .find(|entry| entry.language.name == "en")
            .map(|entry| entry.flavor_text.split_whitespace().collect::<Vec<_>>().join(" "));

        Self {
            genus,
            flavor_text,
            evolution_chain_url: response.evolution_chain.map(|chain| chain.url),
        }
    }
}

/// Client for PokéAPI with a response cache per resource kind
///
/// The caches live as long as the client. Construct one client per session
/// and hand out references to it.
#[derive(Debug)]
pub struct PokemonClient {
    http_client: Client,
    base_url: String,
    pokemon_cache: TimedCache<Pokemon>,
    list_cache: TimedCache<PokemonListPage>,
    type_list_cache: TimedCache<PokemonTypeList>,
    type_cache: TimedCache<TypeMembers>,
}

impl Default for PokemonClient {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl PokemonClient {
    /// Creates a new PokemonClient against the public API
    pub fn new(config: CacheConfig) -> Self {
        Self::with_base_url(API_BASE_URL, config)
    }

    /// Creates a new PokemonClient with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>, config: CacheConfig) -> Self {
        Self::with_http_client(Client::new(), base_url, config)
    }

    /// Creates a new PokemonClient that sends requests through `http_client`
    pub fn with_http_client(
        http_client: Client,
        base_url: impl Into<String>,
        config: CacheConfig,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            pokemon_cache: TimedCache::new(config.pokemon),
            list_cache: TimedCache::new(config.listings),
            type_list_cache: TimedCache::new(config.types),
            type_cache: TimedCache::new(config.types),
        }
    }

    /// Drops every cached response
    pub fn clear_cache(&self) {
        self.pokemon_cache.clear();
        self.list_cache.clear();
        self.type_list_cache.clear();
        self.type_cache.clear();
    }

    /// Drops expired responses from every cache, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        self.pokemon_cache.purge_expired()
            + self.list_cache.purge_expired()
            + self.type_list_cache.purge_expired()
            + self.type_cache.purge_expired()
    }

    /// Total number of cached responses
    pub fn cached_entries(&self) -> usize {
        self.pokemon_cache.len()
            + self.list_cache.len()
            + self.type_list_cache.len()
            + self.type_cache.len()
    }

    /// Cache key for a single Pokémon
    pub fn pokemon_key(id_or_name: &str) -> String {
        format!("pokemon-{}", id_or_name.trim().to_lowercase())
    }

    /// Cache key for a listing page
    pub fn list_key(offset: u32, limit: u32) -> String {
        format!("pokemon-list-{}-{}", offset, limit)
    }

    /// Cache key for a type's members
    pub fn type_key(type_name: &str) -> String {
        format!("pokemon-type-{}", type_name.trim().to_lowercase())
    }

    /// Cache key for the type index
    pub const TYPE_LIST_KEY: &'static str = "pokemon-types";

    /// Fetches a page of the Pokémon listing
    ///
    /// # Arguments
    /// * `offset` - Index of the first Pokémon on the page
    /// * `limit` - Page size, clamped to `1..=50`
    ///
    /// # Returns
    /// * `Ok(PokemonListPage)` - Rows carry details where they could be fetched
    /// * `Err(PokemonError)` - If the listing itself could not be fetched
    pub async fn get_pokemon_list(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<PokemonListPage, PokemonError> {
        let limit = limit.clamp(1, MAX_PAGE_LIMIT);
        let key = Self::list_key(offset, limit);
        self.list_cache
            .get_or_fetch(&key, move || self.fetch_pokemon_list(offset, limit))
            .await
    }

    /// Fetches a Pokémon by id or name, along with its species data
    ///
    /// A fetched record is cached under both its id and its name, so looking
    /// it up the other way round does not refetch it.
    pub async fn get_pokemon(&self, id_or_name: &str) -> Result<Pokemon, PokemonError> {
        let ident = id_or_name.trim().to_lowercase();
        let key = Self::pokemon_key(&ident);
        self.pokemon_cache
            .get_or_fetch(&key, move || async move {
                let result = self.fetch_pokemon(ident).await;
                if let Ok(ref pokemon) = result {
                    self.cache_pokemon(pokemon);
                }
                result
            })
            .await
    }

    /// Fetches the index of all types
    pub async fn get_pokemon_types(&self) -> Result<PokemonTypeList, PokemonError> {
        self.type_list_cache
            .get_or_fetch(Self::TYPE_LIST_KEY, move || async move {
                let url = format!("{}/type", self.base_url);
                self.get_json(&url, "Pokemon types").await
            })
            .await
    }

    /// Fetches the members of a type, with details for the first 20
    pub async fn get_pokemon_by_type(&self, type_name: &str) -> Result<TypeMembers, PokemonError> {
        let type_name = type_name.trim().to_lowercase();
        let key = Self::type_key(&type_name);
        self.type_cache
            .get_or_fetch(&key, move || self.fetch_type_members(type_name))
            .await
    }

    /// Fetches a Pokémon with a random id
    pub async fn get_random_pokemon(&self) -> Result<Pokemon, PokemonError> {
        let id = rand::thread_rng().gen_range(1..=MAX_POKEMON_ID);
        self.get_pokemon(&id.to_string()).await
    }

    /// Validates a search query and fetches the matching Pokémon
    pub async fn search_pokemon(&self, query: &str) -> Result<Pokemon, PokemonError> {
        let query = parse_query(query)?;
        self.get_pokemon(&query.as_identifier()).await
    }

    /// Resolves the evolution chain of `pokemon`
    ///
    /// Never fails: a missing or unreachable chain yields an empty list, and a
    /// stage whose record cannot be fetched is kept by name only.
    pub async fn get_evolution_chain(&self, pokemon: &Pokemon) -> Vec<EvolutionStage> {
        let Some(url) = pokemon
            .species_data
            .as_ref()
            .and_then(|species| species.evolution_chain_url.as_deref())
        else {
            return Vec::new();
        };

        let response: EvolutionChainResponse = match self.get_json(url, "evolution chain").await {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to get evolution chain for {}: {}", pokemon.name, e);
                return Vec::new();
            }
        };

        let names = flatten_chain(&response.chain);
        let stages = names.into_iter().map(move |name| async move {
            match self.get_pokemon(&name).await {
                Ok(pokemon) => EvolutionStage {
                    name,
                    pokemon: Some(pokemon),
                },
                Err(e) => {
                    warn!("Failed to fetch evolution details for {}: {}", name, e);
                    EvolutionStage {
                        name,
                        pokemon: None,
                    }
                }
            }
        });

        join_all(stages).await
    }

    /// Fetches the Pokémon shown on the home page, skipping any that fail
    pub async fn get_featured_pokemon(&self) -> Vec<Pokemon> {
        let fetches = FEATURED_POKEMON_IDS.iter().map(move |id| async move {
            let result = self.get_pokemon(&id.to_string()).await;
            if let Err(ref e) = result {
                warn!("Failed to fetch featured Pokemon {}: {}", id, e);
            }
            result.ok()
        });

        join_all(fetches).await.into_iter().flatten().collect()
    }

    async fn fetch_pokemon_list(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<PokemonListPage, PokemonError> {
        info!("Fetching Pokemon list offset={} limit={}", offset, limit);
        let url = format!(
            "{}/pokemon?offset={}&limit={}",
            self.base_url, offset, limit
        );
        let response: ListResponse = self.get_json(&url, "Pokemon list").await?;
        let results = self.resolve_summaries(&response.results).await;

        Ok(PokemonListPage {
            count: response.count,
            next: response.next,
            previous: response.previous,
            results,
        })
    }

    async fn fetch_pokemon(&self, ident: String) -> Result<Pokemon, PokemonError> {
        info!("Fetching Pokemon {}", ident);
        let url = format!("{}/pokemon/{}", self.base_url, ident);
        let mut pokemon: Pokemon = match self.get_json(&url, "Pokemon").await {
            Err(e) if e.is_not_found() => return Err(PokemonError::NotFound(ident)),
            other => other?,
        };

        match self
            .get_json::<SpeciesResponse>(&pokemon.species.url, "Pokemon species")
            .await
        {
            Ok(species) => pokemon.species_data = Some(species.into()),
            Err(e) => warn!("Failed to fetch species data for {}: {}", pokemon.name, e),
        }

        Ok(pokemon)
    }

    async fn fetch_type_members(&self, type_name: String) -> Result<TypeMembers, PokemonError> {
        info!("Fetching Pokemon of type {}", type_name);
        let url = format!("{}/type/{}", self.base_url, type_name);
        let response: TypeResponse = self.get_json(&url, "Pokemon by type").await?;

        let members: Vec<NamedResource> = response
            .pokemon
            .iter()
            .take(TYPE_MEMBER_LIMIT)
            .map(|entry| entry.pokemon.clone())
            .collect();

        Ok(TypeMembers {
            id: response.id,
            name: response.name,
            total: response.pokemon.len(),
            pokemon: self.resolve_summaries(&members).await,
        })
    }

    /// Fetches basic details for each reference concurrently
    ///
    /// A reference whose details fail keeps only its name and URL.
    async fn resolve_summaries(&self, resources: &[NamedResource]) -> Vec<PokemonSummary> {
        let fetches = resources.iter().map(move |resource| async move {
            match self.get_json::<Pokemon>(&resource.url, "Pokemon details").await {
                Ok(details) => PokemonSummary::from_pokemon(&details, resource.url.clone()),
                Err(e) => {
                    warn!("Failed to fetch details for {}: {}", resource.name, e);
                    PokemonSummary::from_resource(resource)
                }
            }
        });

        join_all(fetches).await
    }

    /// Performs a GET and parses the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        resource: &'static str,
    ) -> Result<T, PokemonError> {
        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PokemonError::Status {
                resource,
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Stores `pokemon` under its id key and its name key
    fn cache_pokemon(&self, pokemon: &Pokemon) {
        self.pokemon_cache
            .insert(Self::pokemon_key(&pokemon.id.to_string()), pokemon.clone());
        self.pokemon_cache
            .insert(Self::pokemon_key(&pokemon.name), pokemon.clone());
    }

    #[cfg(test)]
    pub(crate) fn seed_pokemon(&self, pokemon: Pokemon) {
        self.cache_pokemon(&pokemon);
    }
}
