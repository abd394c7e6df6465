//! Session-scoped caching of API responses
//!
//! This module provides a `TimedCache` that memoizes fetched values for a
//! freshness window, and a `CacheConfig` describing the window used for each
//! kind of PokéAPI resource. Nothing here is persisted; every run starts cold.

mod timed;

pub use timed::{Clock, SystemClock, TimedCache};

#[cfg(test)]
pub use timed::ManualClock;

use chrono::Duration;

/// Default freshness window for all resource kinds (5 minutes)
pub const DEFAULT_FRESHNESS_SECS: i64 = 5 * 60;

/// Freshness windows per resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Individual Pokémon records
    pub pokemon: Duration,
    /// Paged Pokémon listings
    pub listings: Duration,
    /// Type index and per-type member lists
    pub types: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::uniform(Duration::seconds(DEFAULT_FRESHNESS_SECS))
    }
}

impl CacheConfig {
    /// Uses the same window for every resource kind
    pub fn uniform(window: Duration) -> Self {
        Self {
            pokemon: window,
            listings: window,
            types: window,
        }
    }
}
