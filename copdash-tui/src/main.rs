//! copdash TUI: terminal view of the COPD results dashboard.
//!
//! Layout:
//! - Sidebar: page list, data-type selector, section toggles
//! - Content: the resolved presentation plan for the current selection
//! - Status bar: selection, plan fingerprint, last message
//!
//! Navigation is saved on exit and restored on the next launch.

mod app;
mod input;
mod logging;
mod persistence;
mod theme;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use copdash_core::{builtin_table, Router, RoutingTable, DEFAULT_ASSET_ROOT};

use crate::app::{AppState, ErrorCategory};

#[derive(Parser)]
#[command(name = "copdash-tui", about = "Browse the COPD results dashboard in the terminal")]
struct Args {
    /// Directory holding the pre-rendered assets
    #[arg(long, default_value = DEFAULT_ASSET_ROOT)]
    assets: PathBuf,

    /// Routing table (TOML) to use instead of the built-in one
    #[arg(long)]
    routes: Option<PathBuf>,

    /// Where archives and HTML exports are written
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,

    /// Start from the default view instead of the saved one
    #[arg(long)]
    fresh: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let log_result = logging::init();

    // Routing problems are fatal before the terminal is taken over.
    let table = match &args.routes {
        Some(path) => RoutingTable::from_file(path)?,
        None => builtin_table(),
    };
    let router = Router::new(table, &args.assets)?;

    let state_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("copdash")
        .join("state.json");
    let persisted = if args.fresh {
        persistence::PersistedState {
            help_seen: true,
            ..Default::default()
        }
    } else {
        persistence::load(&state_path)
    };
    let help_seen = persisted.help_seen;

    let mut app = AppState::new(router, args.export_dir.clone());
    persistence::apply(&mut app, persisted);

    match log_result {
        Ok(path) => info!(
            assets = %args.assets.display(),
            log = %path.display(),
            "copdash-tui started"
        ),
        Err(e) => app.push_error(
            ErrorCategory::Logging,
            e.to_string(),
            "logging disabled for this session".into(),
        ),
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app, help_seen);
    if let Err(e) = persistence::save(&state_path, &persisted) {
        warn!(path = %state_path.display(), error = %e, "could not save navigation state");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // 50ms poll keeps the loop responsive without spinning.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
