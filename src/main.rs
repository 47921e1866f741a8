//! Recipe Book - Discover recipes in your terminal
//!
//! A terminal UI application that fetches random recipes from the Spoonacular API,
//! caches them in memory, and lets you filter, search and open them.

use std::io;
use std::panic;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use recipebook::app::{App, AppState};
use recipebook::cli::{Cli, StartupConfig};
use recipebook::config::Settings;
use recipebook::loader::Loader;
use recipebook::logging::{default_log_dir, init_tracing};
use recipebook::service::RecipeService;
use recipebook::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &mut App) {
    match app.state.clone() {
        AppState::Loading => {
            render_loading(frame);
        }
        AppState::RecipeList => {
            ui::render_recipe_list(frame, app);
        }
        AppState::RecipeDetail(recipe_id) => {
            ui::render_recipe_detail(frame, app, recipe_id);
        }
    }

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Renders a loading message while the first batch is fetched
fn render_loading(frame: &mut ratatui::Frame) {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Color, Style},
        widgets::Paragraph,
    };

    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Loading recipes...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Runs the terminal UI until the user quits
async fn run_tui(
    service: Arc<RecipeService>,
    startup: StartupConfig,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::with_startup_config(startup, &settings.fetch);
    let mut loader = Loader::spawn(service);

    // Main event loop
    loop {
        for request in app.take_requests() {
            loader.request(request);
        }
        while let Some(message) = loader.try_recv() {
            app.apply(message);
        }

        terminal.draw(|f| render_ui(f, &mut app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let startup = match StartupConfig::from_cli(&cli) {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    let mut settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    cli.apply_to(&mut settings);

    if let Some(log_dir) = default_log_dir() {
        if let Err(e) = init_tracing(&log_dir) {
            eprintln!("Warning: logging disabled: {}", e);
        }
    }
    info!(base_url = %settings.api.base_url, "starting recipebook");

    let service = Arc::new(RecipeService::from_settings(&settings));

    if cli.probe {
        return if service.probe().await {
            println!("Recipe API reachable at {}", settings.api.base_url);
            ExitCode::SUCCESS
        } else {
            println!("Recipe API unreachable at {}", settings.api.base_url);
            ExitCode::FAILURE
        };
    }

    match run_tui(service, startup, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            error!(error = %e, "terminal UI failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
