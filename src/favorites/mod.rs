//! User data persisted to disk
//!
//! This module keeps the user's favorite Pokémon and recent searches in JSON
//! files under the XDG data directory (`~/.local/share/pokeblog/` on Linux).
//! Favorites can also be exported and imported as a standalone JSON file.

mod history;
mod store;

pub use history::{HistoryEntry, SearchHistory, SearchedPokemon, MAX_HISTORY};
pub use store::{
    default_export_path, export_file_name, ExportFile, Favorite, FavoriteSort, FavoritesError,
    FavoritesStore, EXPORT_VERSION,
};
