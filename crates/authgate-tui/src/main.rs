//! authgate - a terminal front-end for the authgate session store.
//!
//! Shows a splash while the persisted session loads, then either the
//! sign-in/sign-up screens or the home screen depending on who is signed in.

mod app;
mod cli;
mod ui;

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use authgate_core::{Config, KeyValueStore, MemoryKvStore, SessionStore};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use cli::Command;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name inside the data directory
const LOG_FILE: &str = "authgate.log";

/// Initialize the tracing subscriber for logging.
///
/// With a log directory, output goes to a file so it does not draw over the
/// TUI; otherwise to stderr. Use `RUST_LOG` to change the level.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let options = cli::parse_args(std::env::args().skip(1))?;
    if options.command == Command::Help {
        println!("{}", cli::USAGE);
        return Ok(());
    }

    let (mut config, config_error) = Config::load_or_default();
    config.apply_env();

    let log_dir = match options.command {
        Command::Tui => config.data_dir().ok().map(|dir| dir.join("logs")),
        _ => None,
    };
    if let Some(ref dir) = log_dir {
        std::fs::create_dir_all(dir)?;
    }
    let _log_guard = init_tracing(log_dir.as_deref());
    info!("authgate starting");
    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults without saving");
    }

    let storage: Arc<dyn KeyValueStore> = if options.ephemeral {
        Arc::new(MemoryKvStore::new())
    } else {
        Arc::new(config.open_storage()?)
    };
    let store = Arc::new(SessionStore::new(storage, config.build_service()?));

    match options.command {
        Command::Status => cli::print_status(&store).await,
        Command::SignIn => cli::sign_in(&store, &mut config).await?,
        Command::SignOut => cli::sign_out(&store).await,
        Command::Tui => run_tui(config, store).await?,
        Command::Help => {}
    }

    info!("authgate shutting down");
    Ok(())
}

async fn run_tui(config: Config, store: Arc<SessionStore>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, store);

    // Draw the splash once before touching storage
    terminal.draw(|f| render(f, &app))?;
    app.start();

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Apply finished sign-in/sign-out tasks and store changes
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }

        // Let spawned store actions make progress
        tokio::task::yield_now().await;
    }
}
