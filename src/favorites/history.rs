//! Recent searches backed by a JSON file
//!
//! Each successful search is recorded newest first. A repeated query replaces
//! its earlier entry, and only the last `MAX_HISTORY` searches are kept.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::store::FavoritesError;
use crate::data::Pokemon;

/// File holding the history inside the data directory
const HISTORY_FILE: &str = "search_history.json";

/// Number of searches remembered
pub const MAX_HISTORY: usize = 10;

/// The Pokémon a search led to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchedPokemon {
    pub id: u32,
    pub name: String,
}

/// One remembered search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The query as typed, lower-cased
    pub query: String,
    pub pokemon: SearchedPokemon,
    pub timestamp: DateTime<Utc>,
}

/// Recent successful searches, newest first
#[derive(Debug, Clone)]
pub struct SearchHistory {
    data_dir: Option<PathBuf>,
    entries: Vec<HistoryEntry>,
}

impl SearchHistory {
    /// Opens the history in the same data directory as the favorites
    pub fn new() -> Result<Self, FavoritesError> {
        let project_dirs = ProjectDirs::from("", "", "pokeblog").ok_or(FavoritesError::NoDataDir)?;
        Ok(Self::with_dir(project_dirs.data_dir().to_path_buf()))
    }

    /// Opens the history in a custom directory
    pub fn with_dir(data_dir: PathBuf) -> Self {
        let entries = Self::load(&data_dir.join(HISTORY_FILE));
        Self {
            data_dir: Some(data_dir),
            entries,
        }
    }

    /// Creates a history that is never saved
    pub fn in_memory() -> Self {
        Self {
            data_dir: None,
            entries: Vec::new(),
        }
    }

    fn load(path: &Path) -> Vec<HistoryEntry> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Failed to read search history from {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        let mut entries: Vec<HistoryEntry> = serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Failed to parse search history from {}: {}", path.display(), e);
            Vec::new()
        });
        entries.truncate(MAX_HISTORY);
        entries
    }

    fn save(&self) -> Result<(), FavoritesError> {
        let Some(ref data_dir) = self.data_dir else {
            return Ok(());
        };

        fs::create_dir_all(data_dir)?;
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(data_dir.join(HISTORY_FILE), json)?;
        Ok(())
    }

    /// Records that `query` found `pokemon`
    ///
    /// Blank queries are ignored.
    pub fn record(&mut self, query: &str, pokemon: &Pokemon) -> Result<(), FavoritesError> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(());
        }

        self.entries.retain(|entry| entry.query != query);
        self.entries.insert(
            0,
            HistoryEntry {
                query,
                pokemon: SearchedPokemon {
                    id: pokemon.id,
                    name: pokemon.name.clone(),
                },
                timestamp: Utc::now(),
            },
        );
        self.entries.truncate(MAX_HISTORY);
        self.save()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) -> Result<(), FavoritesError> {
        self.entries.clear();
        self.save()
    }
}
