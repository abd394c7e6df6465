//! Favorites store backed by a JSON file
//!
//! Provides a `FavoritesStore` that keeps favorites newest-first in memory and
//! rewrites `favorites.json` after every change.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use directories::ProjectDirs;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data::{type_names, Pokemon, Sprites, TypeSlot};

/// Version written into export files
pub const EXPORT_VERSION: &str = "1.0";

/// File holding the favorites inside the data directory
const FAVORITES_FILE: &str = "favorites.json";

/// Errors that can occur when loading, saving or transferring favorites
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file did not contain valid JSON
    #[error("Failed to parse favorites JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An import file is JSON but not a favorites export
    #[error("Invalid favorites file format")]
    InvalidFormat,

    /// No home directory to store favorites under
    #[error("Could not determine a data directory for favorites")]
    NoDataDir,
}

/// A favorite Pokémon as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

impl Favorite {
    /// Captures the fields of `pokemon` worth keeping offline
    pub fn from_pokemon(pokemon: &Pokemon, added_at: DateTime<Utc>) -> Self {
        Self {
            id: pokemon.id,
            name: pokemon.name.clone(),
            types: pokemon.types.clone(),
            sprites: pokemon.sprites.clone(),
            added_at,
        }
    }

    /// Type names in slot order
    pub fn type_names(&self) -> Vec<&str> {
        type_names(&self.types)
    }
}

/// Layout of an exported favorites file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub favorites: Vec<Favorite>,
}

/// Orderings offered on the favorites page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FavoriteSort {
    #[default]
    Newest,
    Oldest,
    Name,
    Id,
}

impl FavoriteSort {
    /// The next ordering, wrapping around
    pub fn next(self) -> Self {
        match self {
            FavoriteSort::Newest => FavoriteSort::Oldest,
            FavoriteSort::Oldest => FavoriteSort::Name,
            FavoriteSort::Name => FavoriteSort::Id,
            FavoriteSort::Id => FavoriteSort::Newest,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FavoriteSort::Newest => "Newest first",
            FavoriteSort::Oldest => "Oldest first",
            FavoriteSort::Name => "Name",
            FavoriteSort::Id => "Pokédex number",
        }
    }
}

/// Default file name for an export made on `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("pokeblog-favorites-{}.json", date.format("%Y-%m-%d"))
}

/// Path used by `--export` without a value, dated by the UTC day of `now`
pub fn default_export_path(now: DateTime<Utc>) -> PathBuf {
    PathBuf::from(export_file_name(now.date_naive()))
}

/// The user's favorites, newest first
///
/// A store created with `in_memory` never touches the filesystem.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    /// Directory holding `favorites.json`, if persisted
    data_dir: Option<PathBuf>,
    favorites: Vec<Favorite>,
}

impl FavoritesStore {
    /// Opens the store in the XDG-compliant data directory
    ///
    /// Uses `~/.local/share/pokeblog/` on Linux, or the equivalent elsewhere.
    pub fn new() -> Result<Self, FavoritesError> {
        let project_dirs = ProjectDirs::from("", "", "pokeblog").ok_or(FavoritesError::NoDataDir)?;
        Ok(Self::with_dir(project_dirs.data_dir().to_path_buf()))
    }

    /// Opens the store in a custom directory
    ///
    /// A missing or unreadable file yields an empty collection.
    pub fn with_dir(data_dir: PathBuf) -> Self {
        let favorites = Self::load(&data_dir.join(FAVORITES_FILE));
        Self {
            data_dir: Some(data_dir),
            favorites,
        }
    }

    /// Creates a store that is never saved
    pub fn in_memory() -> Self {
        Self {
            data_dir: None,
            favorites: Vec::new(),
        }
    }

    fn load(path: &Path) -> Vec<Favorite> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Failed to read favorites from {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Failed to parse favorites from {}: {}", path.display(), e);
            Vec::new()
        })
    }

    /// Path of the backing file, if persisted
    pub fn path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(FAVORITES_FILE))
    }

    /// Writes the current collection to disk
    fn save(&self) -> Result<(), FavoritesError> {
        let Some(ref data_dir) = self.data_dir else {
            return Ok(());
        };

        fs::create_dir_all(data_dir)?;
        let json = serde_json::to_string_pretty(&self.favorites)?;
        fs::write(data_dir.join(FAVORITES_FILE), json)?;
        Ok(())
    }

    /// Adds `pokemon` at the front of the collection
    ///
    /// # Returns
    /// * `Ok(true)` if it was added
    /// * `Ok(false)` if it was already a favorite
    /// * `Err` if saving failed; the in-memory collection keeps the change
    pub fn add(&mut self, pokemon: &Pokemon) -> Result<bool, FavoritesError> {
        self.insert(Favorite::from_pokemon(pokemon, Utc::now()))
    }

    /// Adds an already built favorite at the front of the collection
    pub fn insert(&mut self, favorite: Favorite) -> Result<bool, FavoritesError> {
        if self.is_favorite(favorite.id) {
            return Ok(false);
        }
        self.favorites.insert(0, favorite);
        self.save()?;
        Ok(true)
    }

    /// Removes the favorite with `id`, returning whether one existed
    pub fn remove(&mut self, id: u32) -> Result<bool, FavoritesError> {
        let Some(index) = self.favorites.iter().position(|fav| fav.id == id) else {
            return Ok(false);
        };
        self.favorites.remove(index);
        self.save()?;
        Ok(true)
    }

    /// Adds `pokemon` if absent, otherwise removes it
    ///
    /// Returns the result of whichever operation ran.
    pub fn toggle(&mut self, pokemon: &Pokemon) -> Result<bool, FavoritesError> {
        if self.is_favorite(pokemon.id) {
            self.remove(pokemon.id)
        } else {
            self.add(pokemon)
        }
    }

    pub fn is_favorite(&self, id: u32) -> bool {
        self.favorites.iter().any(|fav| fav.id == id)
    }

    /// All favorites, newest first
    pub fn list(&self) -> &[Favorite] {
        &self.favorites
    }

    pub fn count(&self) -> usize {
        self.favorites.len()
    }

    /// Removes every favorite
    pub fn clear(&mut self) -> Result<(), FavoritesError> {
        self.favorites.clear();
        self.save()
    }

    /// Favorites in the given order, optionally only those of one type
    pub fn sorted(&self, sort: FavoriteSort, type_filter: Option<&str>) -> Vec<Favorite> {
        let mut favorites: Vec<Favorite> = self
            .favorites
            .iter()
            .filter(|fav| match type_filter {
                Some(kind) => fav.types.iter().any(|slot| slot.kind.name == kind),
                None => true,
            })
            .cloned()
            .collect();

        match sort {
            FavoriteSort::Newest => favorites.sort_by(|a, b| b.added_at.cmp(&a.added_at)),
            FavoriteSort::Oldest => favorites.sort_by(|a, b| a.added_at.cmp(&b.added_at)),
            FavoriteSort::Name => favorites.sort_by(|a, b| a.name.cmp(&b.name)),
            FavoriteSort::Id => favorites.sort_by_key(|fav| fav.id),
        }

        favorites
    }

    /// Distinct type names across all favorites, sorted
    pub fn available_types(&self) -> Vec<String> {
        self.favorites
            .iter()
            .flat_map(|fav| fav.types.iter().map(|slot| slot.kind.name.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of distinct types across all favorites
    pub fn unique_type_count(&self) -> usize {
        self.available_types().len()
    }

    /// Favorites added within the 24 hours before `now`
    pub fn recently_added(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - Duration::hours(24);
        self.favorites
            .iter()
            .filter(|fav| fav.added_at > cutoff)
            .count()
    }

    /// Writes the collection to `path` as an export file
    pub fn export_to(&self, path: &Path) -> Result<(), FavoritesError> {
        let export = ExportFile {
            version: EXPORT_VERSION.to_string(),
            export_date: Utc::now(),
            favorites: self.favorites.clone(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&export)?)?;
        info!(
            "Exported {} favorites to {}",
            self.favorites.len(),
            path.display()
        );
        Ok(())
    }

    /// Merges favorites from an export file into the collection
    ///
    /// Entries whose id is already a favorite are skipped; new ones are
    /// appended after the existing favorites.
    ///
    /// # Returns
    /// * `Ok(usize)` - The number of favorites listed in the file
    /// * `Err(FavoritesError::InvalidFormat)` - If `favorites` is missing,
    ///   not an array, or holds malformed entries
    pub fn import_from(&mut self, path: &Path) -> Result<usize, FavoritesError> {
        let content = fs::read_to_string(path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;

        let entries = value
            .get("favorites")
            .and_then(|favorites| favorites.as_array())
            .ok_or(FavoritesError::InvalidFormat)?;

        let imported: Vec<Favorite> = entries
            .iter()
            .map(|entry| serde_json::from_value(entry.clone()))
            .collect::<Result<_, _>>()
            .map_err(|_| FavoritesError::InvalidFormat)?;

        let total = imported.len();
        for favorite in imported {
            if !self.is_favorite(favorite.id) {
                self.favorites.push(favorite);
            }
        }

        self.save()?;
        info!("Imported {} favorites from {}", total, path.display());
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NamedResource;
    use tempfile::TempDir;

    fn create_test_store() -> (FavoritesStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FavoritesStore::with_dir(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    fn type_slot(slot: u8, name: &str) -> TypeSlot {
        TypeSlot {
            slot,
            kind: NamedResource {
                name: name.to_string(),
                url: String::new(),
            },
        }
    }

    fn pokemon(id: u32, name: &str, types: &[&str]) -> Pokemon {
        Pokemon {
            id,
            name: name.to_string(),
            height: 1,
            weight: 1,
            base_experience: None,
            types: types
                .iter()
                .enumerate()
                .map(|(i, kind)| type_slot(i as u8 + 1, kind))
                .collect(),
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

    fn favorite_at(id: u32, name: &str, types: &[&str], hours_ago: i64) -> Favorite {
        Favorite::from_pokemon(
            &pokemon(id, name, types),
            Utc::now() - Duration::hours(hours_ago),
        )
    }

    #[test]
    fn test_add_puts_newest_first_and_rejects_duplicates() {
        let (mut store, _temp_dir) = create_test_store();

        assert!(store.add(&pokemon(1, "bulbasaur", &["grass"])).unwrap());
        assert!(store.add(&pokemon(4, "charmander", &["fire"])).unwrap());
        assert!(!store.add(&pokemon(1, "bulbasaur", &["grass"])).unwrap());

        let ids: Vec<u32> = store.list().iter().map(|fav| fav.id).collect();
        assert_eq!(ids, vec![4, 1]);
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_remove_and_toggle() {
        let (mut store, _temp_dir) = create_test_store();
        let pikachu = pokemon(25, "pikachu", &["electric"]);

        assert!(store.toggle(&pikachu).unwrap());
        assert!(store.is_favorite(25));

        assert!(store.toggle(&pikachu).unwrap());
        assert!(!store.is_favorite(25));

        assert!(!store.remove(25).unwrap());
    }

    #[test]
    fn test_favorites_persist_across_reopen() {
        let (mut store, temp_dir) = create_test_store();
        store.add(&pokemon(7, "squirtle", &["water"])).unwrap();

        let reopened = FavoritesStore::with_dir(temp_dir.path().to_path_buf());
        assert_eq!(reopened.count(), 1);
        assert_eq!(reopened.list()[0].name, "squirtle");

        let content = fs::read_to_string(temp_dir.path().join(FAVORITES_FILE)).unwrap();
        assert!(content.contains("\"addedAt\""));
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(FAVORITES_FILE), "{ not json").unwrap();

        let store = FavoritesStore::with_dir(temp_dir.path().to_path_buf());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");
        let mut store = FavoritesStore::with_dir(nested.clone());

        store.add(&pokemon(1, "bulbasaur", &["grass"])).unwrap();

        assert!(nested.join(FAVORITES_FILE).exists());
    }

    #[test]
    fn test_clear_empties_and_persists() {
        let (mut store, temp_dir) = create_test_store();
        store.add(&pokemon(1, "bulbasaur", &["grass"])).unwrap();
        store.clear().unwrap();

        assert_eq!(store.count(), 0);
        let reopened = FavoritesStore::with_dir(temp_dir.path().to_path_buf());
        assert_eq!(reopened.count(), 0);
    }

    #[test]
    fn test_in_memory_store_never_writes() {
        let mut store = FavoritesStore::in_memory();
        assert!(store.add(&pokemon(1, "bulbasaur", &["grass"])).unwrap());
        assert!(store.path().is_none());
    }

    #[test]
    fn test_sorted_orderings_and_type_filter() {
        let mut store = FavoritesStore::in_memory();
        store
            .insert(favorite_at(150, "mewtwo", &["psychic"], 1))
            .unwrap();
        store
            .insert(favorite_at(1, "bulbasaur", &["grass", "poison"], 48))
            .unwrap();
        store
            .insert(favorite_at(94, "gengar", &["ghost", "poison"], 5))
            .unwrap();

        let ids = |favorites: Vec<Favorite>| favorites.iter().map(|f| f.id).collect::<Vec<_>>();

        assert_eq!(ids(store.sorted(FavoriteSort::Newest, None)), vec![150, 94, 1]);
        assert_eq!(ids(store.sorted(FavoriteSort::Oldest, None)), vec![1, 94, 150]);
        assert_eq!(ids(store.sorted(FavoriteSort::Name, None)), vec![1, 94, 150]);
        assert_eq!(ids(store.sorted(FavoriteSort::Id, None)), vec![1, 94, 150]);
        assert_eq!(
            ids(store.sorted(FavoriteSort::Id, Some("poison"))),
            vec![1, 94]
        );
        assert!(store.sorted(FavoriteSort::Id, Some("fire")).is_empty());
    }

    #[test]
    fn test_summary_stats() {
        let mut store = FavoritesStore::in_memory();
        store
            .insert(favorite_at(1, "bulbasaur", &["grass", "poison"], 48))
            .unwrap();
        store
            .insert(favorite_at(94, "gengar", &["ghost", "poison"], 2))
            .unwrap();

        assert_eq!(store.available_types(), vec!["ghost", "grass", "poison"]);
        assert_eq!(store.unique_type_count(), 3);
        assert_eq!(store.recently_added(Utc::now()), 1);
    }

    #[test]
    fn test_sort_cycle() {
        let mut sort = FavoriteSort::default();
        assert_eq!(sort, FavoriteSort::Newest);
        for _ in 0..4 {
            sort = sort.next();
        }
        assert_eq!(sort, FavoriteSort::Newest);
        assert_eq!(FavoriteSort::Id.label(), "Pokédex number");
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        assert_eq!(export_file_name(date), "pokeblog-favorites-2024-07-15.json");
    }

    #[test]
    fn test_default_export_path_uses_utc_day() {
        let late = DateTime::parse_from_rfc3339("2024-07-15T23:30:00-05:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            default_export_path(late),
            PathBuf::from("pokeblog-favorites-2024-07-16.json")
        );
    }

    #[test]
    fn test_export_then_import_merges_without_duplicates() {
        let (mut source, temp_dir) = create_test_store();
        source.add(&pokemon(1, "bulbasaur", &["grass"])).unwrap();
        source.add(&pokemon(4, "charmander", &["fire"])).unwrap();

        let export_path = temp_dir.path().join("exports").join("favorites-export.json");
        source.export_to(&export_path).unwrap();

        let exported: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&export_path).unwrap()).unwrap();
        assert_eq!(exported["version"], EXPORT_VERSION);
        assert!(exported["exportDate"].is_string());

        let mut target = FavoritesStore::in_memory();
        target.add(&pokemon(4, "charmander", &["fire"])).unwrap();
        target.add(&pokemon(25, "pikachu", &["electric"])).unwrap();

        let imported = target.import_from(&export_path).unwrap();

        assert_eq!(imported, 2, "reports the number of entries in the file");
        let ids: Vec<u32> = target.list().iter().map(|fav| fav.id).collect();
        assert_eq!(ids, vec![25, 4, 1], "new entries are appended");
    }

    #[test]
    fn test_import_rejects_missing_favorites_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        let mut store = FavoritesStore::in_memory();

        fs::write(&path, r#"{ "version": "1.0" }"#).unwrap();
        assert!(matches!(
            store.import_from(&path),
            Err(FavoritesError::InvalidFormat)
        ));

        fs::write(&path, r#"{ "favorites": { "id": 1 } }"#).unwrap();
        assert!(matches!(
            store.import_from(&path),
            Err(FavoritesError::InvalidFormat)
        ));

        fs::write(&path, r#"{ "favorites": [ { "name": "no id" } ] }"#).unwrap();
        assert!(matches!(
            store.import_from(&path),
            Err(FavoritesError::InvalidFormat)
        ));
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_import_rejects_non_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "favorites").unwrap();

        let mut store = FavoritesStore::in_memory();
        assert!(matches!(
            store.import_from(&path),
            Err(FavoritesError::Json(_))
        ));
    }

    #[test]
    fn test_import_accepts_entries_without_added_at() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("legacy.json");
        fs::write(
            &path,
            r#"{ "favorites": [ { "id": 133, "name": "eevee", "types": [], "sprites": {} } ] }"#,
        )
        .unwrap();

        let mut store = FavoritesStore::in_memory();
        assert_eq!(store.import_from(&path).unwrap(), 1);
        assert!(store.is_favorite(133));
    }
}
