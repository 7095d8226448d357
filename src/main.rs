//! Storefront - browse a remote product catalog in the terminal
//!
//! Shows a search bar, category shortcuts and a two-column product grid. The
//! catalog is fetched from the network when the device is online and served
//! from the last cached response when it is not.

use std::io;
use std::panic;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use storefront::app::App;
use storefront::cli::{Cli, StartupConfig};
use storefront::fetch::FetchHandle;
use storefront::logging::{self, LogTarget};
use storefront::terminal::TerminalGuard;
use storefront::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    ui::render_storefront(frame, app);
    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Fetches once and prints the final state as JSON
async fn run_dump(config: StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    let _guard = logging::init(LogTarget::Stderr)?;

    let mut handle =
        FetchHandle::with_policy(config.build_fetcher(), &config.url, config.race_policy);
    handle.settle().await;

    let result = handle.snapshot();
    println!("{}", serde_json::to_string_pretty(&result)?);

    if result.error.is_some() {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_tui(config: StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = logging::default_log_dir().unwrap_or_else(std::env::temp_dir);
    let _guard = logging::init(LogTarget::File(log_dir))?;
    tracing::info!(url = %config.url, offline = config.offline, "starting storefront");

    setup_panic_hook();

    // Restored on drop, including early returns from the loop below
    let _session = TerminalGuard::enter(io::stdout())?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut handle =
        FetchHandle::with_policy(config.build_fetcher(), &config.url, config.race_policy);
    let mut updates = handle.subscribe();

    let mut app = App::new();
    app.sync(handle.snapshot());

    loop {
        if updates.has_changed().unwrap_or(false) {
            app.sync(updates.borrow_and_update().clone());
        }

        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.take_reload_request() {
            tracing::info!(url = %handle.url(), "reload requested");
            handle.reload();
        }

        if app.should_quit {
            break;
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
            std::process::exit(2);
        }
    };

    if config.dump {
        run_dump(config).await
    } else {
        run_tui(config).await
    }
}
