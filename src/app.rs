//! Application state management for PokéBlog
//!
//! This module contains the main application state, handling keyboard input,
//! page loads, and transitions between pages. Key handling is synchronous and
//! only records what needs loading; the event loop performs the load.

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use log::{info, warn};

use crate::cli::StartupConfig;
use crate::data::client::DEFAULT_PAGE_LIMIT;
use crate::data::{
    EvolutionStage, NamedResource, Pokemon, PokemonClient, PokemonError, PokemonListPage,
    PokemonType, TypeMembers, POPULAR_SEARCHES,
};
use crate::favorites::{Favorite, FavoriteSort, FavoritesStore, SearchHistory};
use crate::router::Route;

pub const FAVORITE_ADDED: &str = "Added to favorites!";
pub const FAVORITE_REMOVED: &str = "Removed from favorites.";
pub const FAVORITES_CLEARED: &str = "All favorites cleared.";
pub const CONFIRM_CLEAR: &str = "Press C again to clear all favorites. This cannot be undone.";
pub const NETWORK_ERROR: &str = "Network error. Please check your internet connection.";

/// Application state enum representing the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Before the first page has been entered
    Loading,
    /// Featured Pokémon
    Home,
    /// Paged listing with a search box
    Search,
    /// Index of types
    Categories,
    /// Members of one type
    TypeMembers(String),
    /// Detail page for an id or name
    Detail(String),
    Favorites,
    About,
}

/// Data the event loop should fetch next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    Featured,
    ListPage { offset: u32 },
    Search(String),
    Types,
    TypeMembers(String),
    Pokemon(String),
    Random,
}

/// Main application struct managing state and data
pub struct App {
    /// Current page
    pub state: AppState,
    /// Pages to return to with Esc
    pub history: Vec<AppState>,
    /// Load waiting to be performed by the event loop
    pub pending: Option<LoadRequest>,
    /// Index of the selected row on list pages
    pub selected_index: usize,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Message from the last failed load, shown on the current page
    pub error: Option<String>,
    /// Short confirmation shown in the footer until the next key press
    pub status_message: Option<String>,
    /// Featured Pokémon for the home page
    pub featured: Vec<Pokemon>,
    /// Currently loaded listing page
    pub list_page: Option<PokemonListPage>,
    /// Offset of the listing page being browsed
    pub list_offset: u32,
    /// Text typed into the search box
    pub search_input: String,
    /// Whether keys go to the search box
    pub search_editing: bool,
    /// Whether a search has been submitted this session
    pub searched: bool,
    /// Recent successful searches
    pub search_history: SearchHistory,
    /// Canonical types from the type index
    pub types: Vec<NamedResource>,
    /// Members of the type being browsed
    pub type_members: Option<TypeMembers>,
    /// Pokémon on the detail page
    pub current: Option<Pokemon>,
    /// Evolution chain of `current`
    pub evolution: Vec<EvolutionStage>,
    /// Scroll offset for the detail page
    pub detail_scroll_offset: u16,
    /// Ordering on the favorites page
    pub favorite_sort: FavoriteSort,
    /// Type filter on the favorites page
    pub favorite_type_filter: Option<String>,
    /// The user's favorites
    pub favorites: FavoritesStore,
    /// Set by the first `C` on the favorites page; the next key confirms or cancels
    pub confirm_clear: bool,
    /// PokéAPI client, owning the response caches
    client: PokemonClient,
}

impl App {
    /// Creates a new App with the default client and the on-disk favorites
    pub fn new() -> Self {
        Self::with_startup_config(StartupConfig::default())
    }

    /// Creates a new App instance with the given startup configuration.
    ///
    /// The initial route is entered immediately, leaving its load pending.
    ///
    /// # Arguments
    /// * `config` - The startup configuration derived from CLI arguments
    pub fn with_startup_config(config: StartupConfig) -> Self {
        let favorites = FavoritesStore::new().unwrap_or_else(|e| {
            warn!("Favorites will not be saved: {}", e);
            FavoritesStore::in_memory()
        });
        let mut app = Self::with_parts(PokemonClient::new(config.cache), favorites);
        app.search_history = SearchHistory::new().unwrap_or_else(|e| {
            warn!("Search history will not be saved: {}", e);
            SearchHistory::in_memory()
        });
        app.open(config.initial_route);
        app
    }

    /// Creates a new App instance from its collaborators, in the Loading state
    ///
    /// The search history starts empty and is not saved.
    pub fn with_parts(client: PokemonClient, favorites: FavoritesStore) -> Self {
        Self {
            state: AppState::Loading,
            history: Vec::new(),
            pending: None,
            selected_index: 0,
            should_quit: false,
            show_help: false,
            error: None,
            status_message: None,
            featured: Vec::new(),
            list_page: None,
            list_offset: 0,
            search_input: String::new(),
            search_editing: false,
            searched: false,
            search_history: SearchHistory::in_memory(),
            types: Vec::new(),
            type_members: None,
            current: None,
            evolution: Vec::new(),
            detail_scroll_offset: 0,
            favorite_sort: FavoriteSort::default(),
            favorite_type_filter: None,
            favorites,
            confirm_clear: false,
            client,
        }
    }

    /// The API client, for callers that need data outside page loads
    pub fn client(&self) -> &PokemonClient {
        &self.client
    }

    /// Whether a load is waiting
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Opens the page for `route`, remembering the current page for Esc
    pub fn open(&mut self, route: Route) {
        match route {
            Route::Home => self.go_to(AppState::Home),
            Route::Search(query) => {
                self.go_to(AppState::Search);
                if let Some(query) = query {
                    self.search_input = query.clone();
                    self.searched = true;
                    self.pending = Some(LoadRequest::Search(query));
                }
            }
            Route::Categories(None) => self.go_to(AppState::Categories),
            Route::Categories(Some(kind)) => self.go_to(AppState::TypeMembers(kind)),
            Route::Pokemon(id) => self.go_to(AppState::Detail(id)),
            Route::Random => {
                if self.state == AppState::Loading {
                    self.state = AppState::Home;
                }
                self.error = None;
                self.pending = Some(LoadRequest::Random);
            }
            Route::Favorites => self.go_to(AppState::Favorites),
            Route::About => self.go_to(AppState::About),
        }
    }

    /// The route of the current page
    pub fn route(&self) -> Route {
        match &self.state {
            AppState::Loading | AppState::Home => Route::Home,
            AppState::Search => Route::Search(None),
            AppState::Categories => Route::Categories(None),
            AppState::TypeMembers(kind) => Route::Categories(Some(kind.clone())),
            AppState::Detail(id) => Route::Pokemon(id.clone()),
            AppState::Favorites => Route::Favorites,
            AppState::About => Route::About,
        }
    }

    fn go_to(&mut self, state: AppState) {
        if self.state != state && self.state != AppState::Loading {
            self.history.push(self.state.clone());
        }
        self.enter(state);
    }

    /// Switches to `state` and schedules its data
    fn enter(&mut self, state: AppState) {
        self.error = None;
        self.selected_index = 0;
        self.detail_scroll_offset = 0;
        self.search_editing = false;
        self.pending = match &state {
            AppState::Loading | AppState::Favorites | AppState::About => None,
            AppState::Home => Some(LoadRequest::Featured),
            AppState::Search => Some(LoadRequest::ListPage {
                offset: self.list_offset,
            }),
            AppState::Categories => Some(LoadRequest::Types),
            AppState::TypeMembers(kind) => Some(LoadRequest::TypeMembers(kind.clone())),
            AppState::Detail(id) => Some(LoadRequest::Pokemon(id.clone())),
        };
        self.state = state;
    }

    /// Returns to the previous page, or quits from the first one
    fn go_back(&mut self) {
        match self.history.pop() {
            Some(previous) => self.enter(previous),
            None if self.state == AppState::Home => self.should_quit = true,
            None => self.enter(AppState::Home),
        }
    }

    /// Performs the pending load, if any
    ///
    /// Failures are stored in `error` for the current page. Search and random
    /// loads finish by opening the detail page, which leaves another load
    /// pending. The client caches a fetched record under its id and its name,
    /// so that load does not refetch it.
    pub async fn process_pending(&mut self) {
        let Some(request) = self.pending.take() else {
            return;
        };
        info!("Loading {:?}", request);

        let result = match request {
            LoadRequest::Featured => {
                self.featured = self.client.get_featured_pokemon().await;
                if self.featured.is_empty() {
                    self.error = Some(NETWORK_ERROR.to_string());
                }
                Ok(())
            }
            LoadRequest::ListPage { offset } => {
                let page = self.client.get_pokemon_list(offset, DEFAULT_PAGE_LIMIT).await;
                page.map(|page| {
                    self.list_offset = offset;
                    self.list_page = Some(page);
                    self.selected_index = 0;
                })
            }
            LoadRequest::Search(query) => {
                let found = self.client.search_pokemon(&query).await;
                found.map(|pokemon| {
                    if let Err(e) = self.search_history.record(&query, &pokemon) {
                        warn!("Failed to save search history: {}", e);
                    }
                    self.go_to(AppState::Detail(pokemon.id.to_string()));
                })
            }
            LoadRequest::Types => {
                let list = self.client.get_pokemon_types().await;
                list.map(|list| {
                    self.types = list
                        .results
                        .into_iter()
                        .filter(|kind| PokemonType::from_name(&kind.name).is_some())
                        .collect();
                })
            }
            LoadRequest::TypeMembers(kind) => {
                let members = self.client.get_pokemon_by_type(&kind).await;
                members.map(|members| self.type_members = Some(members))
            }
            LoadRequest::Pokemon(id) => {
                let loaded = self.client.get_pokemon(&id).await;
                match loaded {
                    Ok(pokemon) => {
                        let evolution = self.client.get_evolution_chain(&pokemon).await;
                        self.evolution = evolution;
                        self.current = Some(pokemon);
                        Ok(())
                    }
                    Err(e) => {
                        self.current = None;
                        self.evolution.clear();
                        Err(e)
                    }
                }
            }
            LoadRequest::Random => {
                let picked = self.client.get_random_pokemon().await;
                picked.map(|pokemon| self.go_to(AppState::Detail(pokemon.id.to_string())))
            }
        };

        if let Err(e) = result {
            warn!("Load failed: {}", e);
            self.error = Some(user_message(&e));
        }
    }

    /// Clears the response caches and reloads the current page
    pub fn refresh(&mut self) {
        self.client.clear_cache();
        let state = self.state.clone();
        self.enter(state);
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Arguments
    /// * `key_event` - The keyboard event to handle
    ///
    /// # Key Bindings
    /// - `1`-`6`: Home, Search, Categories, Random, Favorites, About
    /// - `Up`/`k`, `Down`/`j`: Move selection (scroll on the detail page)
    /// - `Enter`: Open the selected row
    /// - `/`: Type a search query (on any page), `Tab` fills in a suggestion
    /// - `n`/`p`: Next/previous listing page
    /// - `Space`: Toggle favorite on the detail page
    /// - `s`/`t`: Cycle sort and type filter on the favorites page
    /// - `d`/`C`: Remove selected / clear all favorites (`C` twice)
    /// - `r`: Refresh, `?`: Help, `Esc`: Back, `q`: Quit
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        self.status_message = None;
        let confirming_clear = std::mem::take(&mut self.confirm_clear);

        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        if self.search_editing {
            self.handle_search_input(key_event);
            return;
        }

        if self.state == AppState::Loading {
            // Only quit is allowed before the first page
            if key_event.code == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Esc => {
                self.go_back();
                return;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                return;
            }
            KeyCode::Char('r') => {
                self.refresh();
                return;
            }
            KeyCode::Char('/') => {
                self.go_to(AppState::Search);
                self.search_editing = true;
                return;
            }
            KeyCode::Char(c @ '1'..='6') => {
                if let Some(route) = page_for_key(c) {
                    self.open(route);
                }
                return;
            }
            _ => {}
        }

        match self.state {
            AppState::Detail(_) => self.handle_detail_key(key_event),
            AppState::Favorites => self.handle_favorites_key(key_event, confirming_clear),
            AppState::Search => match key_event.code {
                KeyCode::Char('n') => self.next_page(),
                KeyCode::Char('p') => self.previous_page(),
                _ => self.handle_list_key(key_event),
            },
            _ => self.handle_list_key(key_event),
        }
    }

    fn handle_search_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => self.search_editing = false,
            KeyCode::Enter => {
                self.search_editing = false;
                self.searched = true;
                self.error = None;
                self.pending = Some(LoadRequest::Search(self.search_input.clone()));
            }
            KeyCode::Tab => self.next_suggestion(),
            KeyCode::Backspace => {
                self.search_input.pop();
            }
            KeyCode::Char(c) => self.search_input.push(c),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection_down(),
            KeyCode::Enter => {
                if let Some(route) = self.selected_route() {
                    self.open(route);
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(),
            KeyCode::Char('g') => self.detail_scroll_offset = 0,
            KeyCode::Char(' ') | KeyCode::Char('f') => self.toggle_current_favorite(),
            _ => {}
        }
    }

    fn handle_favorites_key(&mut self, key_event: KeyEvent, confirming_clear: bool) {
        match key_event.code {
            KeyCode::Char('s') => {
                self.favorite_sort = self.favorite_sort.next();
                self.selected_index = 0;
            }
            KeyCode::Char('t') => {
                self.cycle_type_filter();
                self.selected_index = 0;
            }
            KeyCode::Char('d') => self.remove_selected_favorite(),
            KeyCode::Char('C') if confirming_clear => self.clear_favorites(),
            KeyCode::Char('C') if self.favorites.count() > 0 => {
                self.confirm_clear = true;
                self.status_message = Some(CONFIRM_CLEAR.to_string());
            }
            _ => self.handle_list_key(key_event),
        }
    }

    /// Queries offered before a search: recent ones first, then popular names
    pub fn search_suggestions(&self) -> Vec<String> {
        let mut suggestions: Vec<String> = self
            .search_history
            .entries()
            .iter()
            .map(|entry| entry.query.clone())
            .collect();
        for name in POPULAR_SEARCHES {
            let name = name.to_lowercase();
            if !suggestions.contains(&name) {
                suggestions.push(name);
            }
        }
        suggestions
    }

    /// Replaces the search box text with the suggestion after the current one
    fn next_suggestion(&mut self) {
        let suggestions = self.search_suggestions();
        let current = self.search_input.trim().to_lowercase();
        let next = suggestions
            .iter()
            .position(|suggestion| *suggestion == current)
            .map(|i| (i + 1) % suggestions.len())
            .unwrap_or(0);
        if let Some(suggestion) = suggestions.get(next) {
            self.search_input = suggestion.clone();
        }
    }

    /// Favorites as shown on the favorites page
    pub fn visible_favorites(&self) -> Vec<Favorite> {
        self.favorites
            .sorted(self.favorite_sort, self.favorite_type_filter.as_deref())
    }

    /// Number of selectable rows on the current page
    pub fn row_count(&self) -> usize {
        match &self.state {
            AppState::Home => self.featured.len(),
            AppState::Search => self
                .list_page
                .as_ref()
                .map(|page| page.results.len())
                .unwrap_or_default(),
            AppState::Categories => self.types.len(),
            AppState::TypeMembers(_) => self
                .type_members
                .as_ref()
                .map(|members| members.pokemon.len())
                .unwrap_or_default(),
            AppState::Favorites => self.visible_favorites().len(),
            _ => 0,
        }
    }

    /// Route of the selected row on the current page
    fn selected_route(&self) -> Option<Route> {
        let index = self.selected_index;
        match &self.state {
            AppState::Home => self
                .featured
                .get(index)
                .map(|pokemon| Route::Pokemon(pokemon.id.to_string())),
            AppState::Search => self
                .list_page
                .as_ref()
                .and_then(|page| page.results.get(index))
                .map(|row| Route::Pokemon(row.route_key())),
            AppState::Categories => self
                .types
                .get(index)
                .map(|kind| Route::Categories(Some(kind.name.clone()))),
            AppState::TypeMembers(_) => self
                .type_members
                .as_ref()
                .and_then(|members| members.pokemon.get(index))
                .map(|row| Route::Pokemon(row.route_key())),
            AppState::Favorites => self
                .visible_favorites()
                .get(index)
                .map(|fav| Route::Pokemon(fav.id.to_string())),
            _ => None,
        }
    }

    /// Moves the selection up in the list, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down in the list, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    fn next_page(&mut self) {
        let has_next = self
            .list_page
            .as_ref()
            .map(|page| page.next.is_some())
            .unwrap_or(false);
        if has_next {
            self.pending = Some(LoadRequest::ListPage {
                offset: self.list_offset + DEFAULT_PAGE_LIMIT,
            });
        }
    }

    fn previous_page(&mut self) {
        if self.list_offset > 0 {
            self.pending = Some(LoadRequest::ListPage {
                offset: self.list_offset.saturating_sub(DEFAULT_PAGE_LIMIT),
            });
        }
    }

    /// Scrolls up in the detail view, stopping at 0
    pub fn scroll_up(&mut self) {
        self.detail_scroll_offset = self.detail_scroll_offset.saturating_sub(1);
    }

    /// Scrolls down in the detail view with a fixed upper bound
    pub fn scroll_down(&mut self) {
        const MAX_SCROLL: u16 = 100;
        if self.detail_scroll_offset < MAX_SCROLL {
            self.detail_scroll_offset += 1;
        }
    }

    /// Adds or removes the Pokémon on the detail page
    pub fn toggle_current_favorite(&mut self) {
        let Some(pokemon) = self.current.as_ref() else {
            return;
        };
        self.status_message = Some(match self.favorites.toggle(pokemon) {
            Ok(_) if self.favorites.is_favorite(pokemon.id) => FAVORITE_ADDED.to_string(),
            Ok(_) => FAVORITE_REMOVED.to_string(),
            Err(e) => format!("Failed to save favorites: {}", e),
        });
    }

    fn remove_selected_favorite(&mut self) {
        let Some(favorite) = self.visible_favorites().get(self.selected_index).cloned() else {
            return;
        };
        self.status_message = Some(match self.favorites.remove(favorite.id) {
            Ok(_) => FAVORITE_REMOVED.to_string(),
            Err(e) => format!("Failed to save favorites: {}", e),
        });
        let count = self.row_count();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    fn clear_favorites(&mut self) {
        self.status_message = Some(match self.favorites.clear() {
            Ok(()) => FAVORITES_CLEARED.to_string(),
            Err(e) => format!("Failed to save favorites: {}", e),
        });
        self.selected_index = 0;
        self.favorite_type_filter = None;
    }

    /// Steps the type filter through none and each type present in favorites
    fn cycle_type_filter(&mut self) {
        let types = self.favorites.available_types();
        self.favorite_type_filter = match &self.favorite_type_filter {
            None => types.first().cloned(),
            Some(current) => types
                .iter()
                .position(|kind| kind == current)
                .and_then(|i| types.get(i + 1))
                .cloned(),
        };
    }

    /// Favorites added in the last day
    pub fn recent_favorites(&self) -> usize {
        self.favorites.recently_added(Utc::now())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Page opened by a number key
fn page_for_key(c: char) -> Option<Route> {
    match c {
        '1' => Some(Route::Home),
        '2' => Some(Route::Search(None)),
        '3' => Some(Route::Categories(None)),
        '4' => Some(Route::Random),
        '5' => Some(Route::Favorites),
        '6' => Some(Route::About),
        _ => None,
    }
}

/// Message shown to the user for a failed load
pub fn user_message(error: &PokemonError) -> String {
    match error {
        PokemonError::Request(_) => NETWORK_ERROR.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::data::test_server::StubServer;
    use crate::data::{PokemonSummary, Sprites, TypeSlot};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> App {
        let client = PokemonClient::with_base_url("http://127.0.0.1:9/api/v2", CacheConfig::default());
        App::with_parts(client, FavoritesStore::in_memory())
    }

    fn pokemon(id: u32, name: &str) -> Pokemon {
        Pokemon {
            id,
            name: name.to_string(),
            height: 7,
            weight: 69,
            base_experience: Some(64),
            types: vec![TypeSlot {
                slot: 1,
                kind: NamedResource {
                    name: "grass".to_string(),
                    url: String::new(),
                },
            }],
            abilities: Vec::new(),
            stats: Vec::new(),
            sprites: Sprites::default(),
            species: NamedResource {
                name: name.to_string(),
                url: "http://127.0.0.1:9/api/v2/pokemon-species/1/".to_string(),
            },
            species_data: None,
        }
    }

    fn list_page(count: usize, next: bool) -> PokemonListPage {
        PokemonListPage {
            count: 1302,
            next: next.then(|| "next".to_string()),
            previous: None,
            results: (1..=count as u32)
                .map(|id| {
                    PokemonSummary::from_resource(&NamedResource {
                        name: format!("pokemon-{}", id),
                        url: format!("https://pokeapi.co/api/v2/pokemon/{}/", id),
                    })
                })
                .collect(),
        }
    }

    #[test]
    fn test_initial_state_is_loading() {
        let app = test_app();
        assert_eq!(app.state, AppState::Loading);
        assert!(app.pending.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_open_home_schedules_featured() {
        let mut app = test_app();
        app.open(Route::Home);
        assert_eq!(app.state, AppState::Home);
        assert_eq!(app.pending, Some(LoadRequest::Featured));
        assert!(app.history.is_empty(), "Loading is not kept in history");
    }

    #[test]
    fn test_open_routes_schedule_loads() {
        let mut app = test_app();

        app.open(Route::Pokemon("25".to_string()));
        assert_eq!(app.state, AppState::Detail("25".to_string()));
        assert_eq!(app.pending, Some(LoadRequest::Pokemon("25".to_string())));

        app.open(Route::Categories(Some("fire".to_string())));
        assert_eq!(app.state, AppState::TypeMembers("fire".to_string()));
        assert_eq!(app.pending, Some(LoadRequest::TypeMembers("fire".to_string())));

        app.open(Route::Search(Some("eevee".to_string())));
        assert_eq!(app.state, AppState::Search);
        assert_eq!(app.search_input, "eevee");
        assert_eq!(app.pending, Some(LoadRequest::Search("eevee".to_string())));

        app.open(Route::Favorites);
        assert_eq!(app.state, AppState::Favorites);
        assert!(app.pending.is_none());
    }

    #[test]
    fn test_number_keys_switch_pages() {
        let mut app = test_app();
        app.open(Route::Home);

        app.handle_key(key_event(KeyCode::Char('3')));
        assert_eq!(app.state, AppState::Categories);
        assert_eq!(app.pending, Some(LoadRequest::Types));

        app.handle_key(key_event(KeyCode::Char('5')));
        assert_eq!(app.state, AppState::Favorites);

        app.handle_key(key_event(KeyCode::Char('6')));
        assert_eq!(app.state, AppState::About);

        app.handle_key(key_event(KeyCode::Char('4')));
        assert_eq!(app.pending, Some(LoadRequest::Random));
        assert_eq!(app.state, AppState::About, "page changes once a Pokemon is picked");
    }

    #[test]
    fn test_esc_goes_back_through_history() {
        let mut app = test_app();
        app.open(Route::Home);
        app.open(Route::Categories(None));
        app.open(Route::Categories(Some("water".to_string())));

        app.handle_key(key_event(KeyCode::Esc));
        assert_eq!(app.state, AppState::Categories);

        app.handle_key(key_event(KeyCode::Esc));
        assert_eq!(app.state, AppState::Home);

        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit, "Esc on the first page quits");
    }

    #[test]
    fn test_esc_without_history_returns_home() {
        let mut app = test_app();
        app.open(Route::About);
        app.handle_key(key_event(KeyCode::Esc));
        assert_eq!(app.state, AppState::Home);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_q_quits_from_any_page() {
        for route in [Route::Home, Route::Favorites, Route::Pokemon("1".to_string())] {
            let mut app = test_app();
            app.open(route);
            app.handle_key(key_event(KeyCode::Char('q')));
            assert!(app.should_quit);
        }
    }

    #[test]
    fn test_keys_ignored_during_loading() {
        let mut app = test_app();

        app.handle_key(key_event(KeyCode::Char('3')));
        assert_eq!(app.state, AppState::Loading);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = test_app();
        app.open(Route::Home);

        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('3')));
        assert_eq!(app.state, AppState::Home);

        app.handle_key(key_event(KeyCode::Esc));
        assert!(!app.show_help);
    }

    #[test]
    fn test_search_typing_and_submit() {
        let mut app = test_app();
        app.open(Route::Home);

        app.handle_key(key_event(KeyCode::Char('/')));
        assert_eq!(app.state, AppState::Search);
        assert!(app.search_editing);

        for c in "pikachx".chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
        app.handle_key(key_event(KeyCode::Backspace));
        app.handle_key(key_event(KeyCode::Char('u')));
        assert_eq!(app.search_input, "pikachu");

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(!app.should_quit, "q is typed while editing");
        app.handle_key(key_event(KeyCode::Backspace));

        app.handle_key(key_event(KeyCode::Enter));
        assert!(!app.search_editing);
        assert_eq!(app.pending, Some(LoadRequest::Search("pikachu".to_string())));
    }

    #[test]
    fn test_list_navigation_wraps() {
        let mut app = test_app();
        app.open(Route::Search(None));
        app.list_page = Some(list_page(3, true));

        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.selected_index, 1);
        app.handle_key(key_event(KeyCode::Char('j')));
        app.handle_key(key_event(KeyCode::Char('j')));
        assert_eq!(app.selected_index, 0, "Should wrap to top");

        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.selected_index, 2, "Should wrap to bottom");
    }

    #[test]
    fn test_enter_opens_selected_row() {
        let mut app = test_app();
        app.open(Route::Search(None));
        app.list_page = Some(list_page(3, true));
        app.selected_index = 2;

        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.state, AppState::Detail("3".to_string()));
        assert_eq!(app.history.last(), Some(&AppState::Search));
    }

    #[test]
    fn test_paging_requests() {
        let mut app = test_app();
        app.open(Route::Search(None));
        app.pending = None;

        app.handle_key(key_event(KeyCode::Char('p')));
        assert!(app.pending.is_none(), "no previous page at offset 0");

        app.list_page = Some(list_page(20, true));
        app.handle_key(key_event(KeyCode::Char('n')));
        assert_eq!(app.pending, Some(LoadRequest::ListPage { offset: 20 }));

        app.list_offset = 40;
        app.list_page = Some(list_page(20, false));
        app.pending = None;
        app.handle_key(key_event(KeyCode::Char('n')));
        assert!(app.pending.is_none(), "no next page on the last page");

        app.handle_key(key_event(KeyCode::Char('p')));
        assert_eq!(app.pending, Some(LoadRequest::ListPage { offset: 20 }));
    }

    #[test]
    fn test_toggle_favorite_on_detail() {
        let mut app = test_app();
        app.open(Route::Pokemon("1".to_string()));
        app.current = Some(pokemon(1, "bulbasaur"));

        app.handle_key(key_event(KeyCode::Char(' ')));
        assert!(app.favorites.is_favorite(1));
        assert_eq!(app.status_message.as_deref(), Some(FAVORITE_ADDED));

        app.handle_key(key_event(KeyCode::Char('f')));
        assert!(!app.favorites.is_favorite(1));
        assert_eq!(app.status_message.as_deref(), Some(FAVORITE_REMOVED));
    }

    #[test]
    fn test_favorites_page_sort_filter_remove_clear() {
        let mut app = test_app();
        app.favorites.add(&pokemon(1, "bulbasaur")).unwrap();
        app.favorites.add(&pokemon(43, "oddish")).unwrap();
        app.open(Route::Favorites);

        assert_eq!(app.row_count(), 2);

        app.handle_key(key_event(KeyCode::Char('s')));
        assert_eq!(app.favorite_sort, FavoriteSort::Oldest);

        app.handle_key(key_event(KeyCode::Char('t')));
        assert_eq!(app.favorite_type_filter.as_deref(), Some("grass"));
        app.handle_key(key_event(KeyCode::Char('t')));
        assert!(app.favorite_type_filter.is_none());

        app.handle_key(key_event(KeyCode::Char('d')));
        assert_eq!(app.favorites.count(), 1);
        assert_eq!(app.status_message.as_deref(), Some(FAVORITE_REMOVED));

        app.handle_key(key_event(KeyCode::Char('C')));
        assert_eq!(app.favorites.count(), 1, "first C only asks");
        assert_eq!(app.status_message.as_deref(), Some(CONFIRM_CLEAR));

        app.handle_key(key_event(KeyCode::Char('C')));
        assert_eq!(app.favorites.count(), 0);
        assert_eq!(app.status_message.as_deref(), Some(FAVORITES_CLEARED));
    }

    #[test]
    fn test_clear_favorites_cancelled_by_other_key() {
        let mut app = test_app();
        app.favorites.add(&pokemon(1, "bulbasaur")).unwrap();
        app.open(Route::Favorites);

        app.handle_key(key_event(KeyCode::Char('C')));
        assert!(app.confirm_clear);

        app.handle_key(key_event(KeyCode::Down));
        assert!(!app.confirm_clear);
        assert!(app.status_message.is_none());

        app.handle_key(key_event(KeyCode::Char('C')));
        assert_eq!(app.favorites.count(), 1, "confirmation starts over");
    }

    #[test]
    fn test_clear_with_no_favorites_does_not_ask() {
        let mut app = test_app();
        app.open(Route::Favorites);

        app.handle_key(key_event(KeyCode::Char('C')));
        assert!(!app.confirm_clear);
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_tab_cycles_search_suggestions() {
        let mut app = test_app();
        app.search_history
            .record("eevee", &pokemon(133, "eevee"))
            .unwrap();
        app.open(Route::Home);
        app.handle_key(key_event(KeyCode::Char('/')));

        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.search_input, "eevee", "recent searches come first");
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.search_input, "pikachu");
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.search_input, "charizard");
        assert!(app.search_editing);
    }

    #[test]
    fn test_suggestions_skip_popular_names_already_searched() {
        let mut app = test_app();
        app.search_history
            .record("Mewtwo", &pokemon(150, "mewtwo"))
            .unwrap();

        let suggestions = app.search_suggestions();
        assert_eq!(suggestions.len(), POPULAR_SEARCHES.len());
        assert_eq!(suggestions[0], "mewtwo");
        assert_eq!(suggestions.iter().filter(|s| *s == "mewtwo").count(), 1);
    }

    #[test]
    fn test_status_message_cleared_on_next_key() {
        let mut app = test_app();
        app.open(Route::Home);
        app.status_message = Some("hello".to_string());
        app.handle_key(key_event(KeyCode::Down));
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_route_reflects_state() {
        let mut app = test_app();
        app.open(Route::Categories(Some("ice".to_string())));
        assert_eq!(app.route(), Route::Categories(Some("ice".to_string())));
        app.open(Route::Pokemon("25".to_string()));
        assert_eq!(app.route().to_path(), "pokemon/25");
    }

    #[tokio::test]
    async fn test_failed_load_sets_network_error() {
        let mut app = test_app();
        app.open(Route::Pokemon("1".to_string()));

        app.process_pending().await;

        assert!(app.pending.is_none());
        assert_eq!(app.error.as_deref(), Some(NETWORK_ERROR));
        assert!(app.current.is_none());
    }

    #[tokio::test]
    async fn test_invalid_search_reports_validation_error() {
        let mut app = test_app();
        app.open(Route::Search(Some("5000".to_string())));

        app.process_pending().await;

        assert_eq!(app.state, AppState::Search);
        assert_eq!(
            app.error.as_deref(),
            Some("Pokemon ID must be between 1 and 1010")
        );
    }

    #[tokio::test]
    async fn test_search_hit_opens_detail_from_cache() {
        let mut app = test_app();
        app.client().seed_pokemon(pokemon(1, "bulbasaur"));
        app.open(Route::Search(Some("Bulbasaur".to_string())));

        app.process_pending().await;
        assert_eq!(app.state, AppState::Detail("1".to_string()));
        assert_eq!(app.pending, Some(LoadRequest::Pokemon("1".to_string())));

        app.process_pending().await;
        assert!(app.error.is_none());
        assert_eq!(app.current.as_ref().map(|p| p.id), Some(1));
        assert!(app.evolution.is_empty());
        assert!(app.searched);
        assert_eq!(app.search_history.entries()[0].query, "bulbasaur");
    }

    #[tokio::test]
    async fn test_search_by_name_fetches_pokemon_once() {
        let server = StubServer::start().await;
        server.route_pokemon(25, "pikachu");
        let mut app = App::with_parts(server.client(), FavoritesStore::in_memory());
        app.open(Route::Search(Some("pikachu".to_string())));

        app.process_pending().await;
        assert_eq!(app.state, AppState::Detail("25".to_string()));
        app.process_pending().await;

        assert!(app.error.is_none());
        assert_eq!(app.current.as_ref().map(|p| p.name.as_str()), Some("pikachu"));
        assert_eq!(server.hits_with_prefix("/pokemon/"), 1);
        assert_eq!(server.hits("/pokemon/25"), 0);
    }

    #[tokio::test]
    async fn test_failed_search_is_not_remembered() {
        let mut app = test_app();
        app.open(Route::Search(Some("missingno".to_string())));

        app.process_pending().await;

        assert!(app.error.is_some());
        assert!(app.search_history.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_clears_cache_and_reloads() {
        let mut app = test_app();
        app.client().seed_pokemon(pokemon(1, "bulbasaur"));
        app.open(Route::Pokemon("1".to_string()));
        app.process_pending().await;
        assert!(app.current.is_some());

        app.handle_key(key_event(KeyCode::Char('r')));
        assert_eq!(app.client().cached_entries(), 0);
        assert_eq!(app.pending, Some(LoadRequest::Pokemon("1".to_string())));

        app.process_pending().await;
        assert_eq!(app.error.as_deref(), Some(NETWORK_ERROR));
    }

    #[test]
    fn test_user_message_passes_through_not_found() {
        let err = PokemonError::NotFound("missingno".to_string());
        assert_eq!(user_message(&err), "Pokemon \"missingno\" not found");
    }
}
