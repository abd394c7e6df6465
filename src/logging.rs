//! Log setup
//!
//! The terminal belongs to the UI, so log records go to a file. The filter is
//! read from `RUST_LOG` and defaults to `info`.

use directories::ProjectDirs;
use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

/// Default log file inside the XDG cache directory
pub fn default_log_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "pokeblog")?;
    Some(project_dirs.cache_dir().join("pokeblog.log"))
}

/// Initialises `env_logger` to append to `path`
///
/// Returns the path in use, or `None` when no file could be opened, in which
/// case logging stays disabled.
pub fn init(path: Option<PathBuf>) -> Option<PathBuf> {
    let path = path.or_else(default_log_path)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .ok()?;

    Some(path)
}
