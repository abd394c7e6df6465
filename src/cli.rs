//! Command-line interface parsing for PokéBlog
//!
//! This module handles parsing of CLI arguments using clap, including the
//! --open flag for starting on a specific page and the headless favorites
//! export and import flags.

use chrono::Duration;
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::cache::CacheConfig;
use crate::router::Route;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The route passed to --open is not recognized
    #[error("Invalid route: '{0}'. Valid routes: home, search[/QUERY], categories[/TYPE], pokemon/ID_OR_NAME, random, favorites, about")]
    InvalidRoute(String),

    /// The cache TTL is zero or too large to represent
    #[error("Invalid cache TTL: {0}. Must be between 1 and {max} seconds", max = MAX_CACHE_TTL_SECS)]
    InvalidTtl(u64),
}

/// Largest accepted `--cache-ttl`, about 31 years
pub const MAX_CACHE_TTL_SECS: u64 = 1_000_000_000;

/// PokéBlog - Browse Pokémon from PokéAPI in your terminal
#[derive(Parser, Debug)]
#[command(name = "pokeblog")]
#[command(about = "Browse Pokémon from PokéAPI and keep a list of favorites")]
#[command(version)]
pub struct Cli {
    /// Open directly on a page
    ///
    /// Examples:
    ///   pokeblog --open pokemon/25        # Pikachu's detail page
    ///   pokeblog --open categories/fire   # Fire type members
    ///   pokeblog --open favorites         # Favorites page
    #[arg(long, value_name = "ROUTE")]
    pub open: Option<String>,

    /// How long fetched data stays fresh, in seconds
    #[arg(long, value_name = "SECONDS")]
    pub cache_ttl: Option<u64>,

    /// Export favorites to a JSON file and exit
    ///
    /// Without a path the file is written to the current directory as
    /// pokeblog-favorites-YYYY-MM-DD.json.
    #[arg(long, value_name = "PATH", conflicts_with = "import")]
    pub export: Option<Option<PathBuf>>,

    /// Import favorites from a JSON export and exit
    #[arg(long, value_name = "PATH")]
    pub import: Option<PathBuf>,

    /// Write logs to this file instead of the default cache location
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Something to do instead of starting the terminal UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessAction {
    /// Export favorites, to the given path or a dated default
    Export(Option<PathBuf>),
    /// Import favorites from the given path
    Import(PathBuf),
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    /// Page to open once the app has started
    pub initial_route: Route,
    /// Freshness windows for the response caches
    pub cache: CacheConfig,
    /// Run this and exit instead of starting the UI
    pub headless: Option<HeadlessAction>,
    /// Log destination override
    pub log_file: Option<PathBuf>,
}

/// Parses a route argument, rejecting unknown page names.
///
/// # Arguments
/// * `s` - The route string from CLI
///
/// # Returns
/// * `Ok(Route)` if the page name is known
/// * `Err(CliError::InvalidRoute)` otherwise
pub fn parse_route_arg(s: &str) -> Result<Route, CliError> {
    if Route::is_known(s) {
        Ok(Route::parse(s))
    } else {
        Err(CliError::InvalidRoute(s.to_string()))
    }
}

/// Converts a `--cache-ttl` value to a freshness window
///
/// Zero and values above `MAX_CACHE_TTL_SECS` are rejected.
pub fn parse_cache_ttl(secs: u64) -> Result<Duration, CliError> {
    if secs == 0 || secs > MAX_CACHE_TTL_SECS {
        return Err(CliError::InvalidTtl(secs));
    }
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or(CliError::InvalidTtl(secs))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the route or TTL is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_route = match &cli.open {
            Some(route) => parse_route_arg(route)?,
            None => Route::Home,
        };

        let cache = match cli.cache_ttl {
            Some(secs) => CacheConfig::uniform(parse_cache_ttl(secs)?),
            None => CacheConfig::default(),
        };

        let headless = match (&cli.export, &cli.import) {
            (Some(path), _) => Some(HeadlessAction::Export(path.clone())),
            (None, Some(path)) => Some(HeadlessAction::Import(path.clone())),
            (None, None) => None,
        };

        Ok(StartupConfig {
            initial_route,
            cache,
            headless,
            log_file: cli.log_file.clone(),
        })
    }
}
