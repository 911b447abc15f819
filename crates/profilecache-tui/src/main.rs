//! profilecache - a terminal browser for randomly generated user profiles.
//!
//! The current profile is cached on disk and served instantly while it is
//! fresh; favorites persist across runs; galleries are fetched on demand.

mod app;
mod ui;

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use profilecache_core::{ApiClient, Config, ProfileCache};

use app::{App, AppState, AppStore};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name prefix inside the cache directory
const LOG_FILE_PREFIX: &str = "profilecache.log";

/// Parsed command line flags.
#[derive(Debug, Default)]
struct Args {
    ephemeral: bool,
    log_stderr: bool,
    print: bool,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = Args::default();
        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--ephemeral" => args.ephemeral = true,
                "--log-stderr" => args.log_stderr = true,
                "--print" => args.print = true,
                "-h" | "--help" => {
                    println!("Usage: profilecache [--ephemeral] [--log-stderr] [--print]");
                    std::process::exit(0);
                }
                other => anyhow::bail!("Unknown argument: {}", other),
            }
        }
        Ok(args)
    }
}

/// Initialize the tracing subscriber.
///
/// The terminal is in raw mode while the UI runs, so logs go to a daily file
/// in `log_dir` unless `to_stderr` is set. The returned guard must live until
/// exit so buffered lines are flushed.
fn init_tracing(log_dir: Option<&Path>, to_stderr: bool) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_dir {
        Some(dir) if !to_stderr => {
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .init();
            Some(guard)
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse()?;
    let config = Config::load().context("Failed to load config")?;

    let cache_dir = config.cache_dir().ok();
    if let Some(dir) = &cache_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Warning: could not create {}: {}", dir.display(), e);
        }
    }
    let _log_guard = init_tracing(cache_dir.as_deref(), args.log_stderr || args.print);
    info!(ephemeral = args.ephemeral, "profilecache starting");

    let store = if args.ephemeral {
        AppStore::ephemeral()
    } else {
        AppStore::open(&config)?
    };

    if args.print {
        return print_current_profile(&config, store).await;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = match App::new(&config, store) {
        Ok(mut app) => {
            app.start();
            run_app(&mut terminal, &mut app).await
        }
        Err(e) => Err(e),
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
    }

    info!("profilecache shutting down");
    Ok(())
}

/// Fetch the current profile through the cache and print it as JSON.
async fn print_current_profile(config: &Config, store: AppStore) -> Result<()> {
    let client = ApiClient::from_config(config).context("Failed to create API client")?;
    let cache = ProfileCache::with_freshness(client, Arc::new(store), config.freshness());

    let was_fresh = cache
        .entry()
        .is_some_and(|e| e.is_fresh(cache.freshness()));
    let mut updates = cache.subscribe();
    let profile = cache
        .get_current_profile()
        .await
        .context("Failed to get current profile")?;

    println!("{}", serde_json::to_string_pretty(&profile)?);

    if was_fresh {
        // Served from cache; let the background refresh persist a new
        // profile for the next run.
        if tokio::time::timeout(Duration::from_secs(5), updates.changed())
            .await
            .is_err()
        {
            warn!("Background refresh did not finish before exit");
        }
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

        // Check for completed background tasks
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
