//! PokéBlog - Browse Pokémon in your terminal
//!
//! A terminal UI application for discovering Pokémon from PokéAPI, browsing
//! them by type and keeping a list of favorites.

use std::io;
use std::panic;
use std::process;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};

use pokeblog::app::App;
use pokeblog::cli::{Cli, HeadlessAction, StartupConfig};
use pokeblog::favorites::{default_export_path, FavoritesStore};
use pokeblog::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Runs a favorites export or import without starting the UI
fn run_headless(action: HeadlessAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = FavoritesStore::new()?;

    match action {
        HeadlessAction::Export(path) => {
            let path = path.unwrap_or_else(|| default_export_path(Utc::now()));
            store.export_to(&path)?;
            info!("Exported {} favorites to {}", store.count(), path.display());
            println!("Exported {} favorites to {}", store.count(), path.display());
        }
        HeadlessAction::Import(path) => {
            let before = store.count();
            let in_file = store.import_from(&path)?;
            let added = store.count() - before;
            info!("Imported {} of {} favorites from {}", added, in_file, path.display());
            println!(
                "Imported {} favorites from {} ({} already saved)",
                added,
                path.display(),
                in_file.saturating_sub(added)
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    if let Some(path) = logging::init(config.log_file.clone()) {
        info!("Logging to {}", path.display());
    }

    if let Some(action) = config.headless.clone() {
        if let Err(e) = run_headless(action) {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
        return Ok(());
    }

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app instance on the requested page
    let mut app = App::with_startup_config(config);

    // Main event loop
    loop {
        // Render UI, then perform any load the last key asked for
        terminal.draw(|f| ui::render(f, &app))?;
        if app.is_loading() {
            app.process_pending().await;
            continue;
        }

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    info!("Purged {} expired cache entries on exit", app.client().purge_expired());
    Ok(())
}
