//! Hello Weather - hourly charts, a 7-day forecast and a world map
//!
//! A terminal UI application that looks up a place, fetches its forecast and
//! shows it as a chart, a table and a marker on the map.

use std::io;
use std::panic;
use std::process;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use helloweather::app::App;
use helloweather::cli::{Cli, StartupConfig};
use helloweather::config::ApiConfig;
use helloweather::data::WeatherService;
use helloweather::settings::SettingsStore;
use helloweather::worker::FetchHandle;
use helloweather::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse and validate arguments before touching the terminal
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    let log_path = config.log_file.clone().or_else(logging::default_log_path);
    if let Some(path) = log_path {
        if let Err(e) = logging::init(&path) {
            eprintln!("Warning: could not open log file {}: {}", path.display(), e);
        }
    }

    let service =
        WeatherService::new(&ApiConfig::default()).with_timezone_lookup(config.timezone_lookup);
    let mut fetcher = FetchHandle::spawn(service, config.refresh.clone());

    let mut app = App::with_startup_config(config, SettingsStore::new());

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main event loop
    loop {
        if let Some(request) = app.take_request() {
            if let Err(e) = fetcher.request(request) {
                tracing::warn!("Fetch request not queued: {}", e);
                app.request_rejected(e);
            }
        }
        while let Some(message) = fetcher.try_recv() {
            app.apply(message);
        }

        // Render UI
        terminal.draw(|f| ui::render(f, &mut app))?;

        // Poll for input events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    fetcher.shutdown().await;
    tracing::info!("Exiting");

    Ok(())
}
