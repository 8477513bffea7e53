// ABOUTME: Main entry point for the spv screen-session dashboard and its non-interactive subcommands

use std::{
    fs::OpenOptions,
    io,
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, Terminal};
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

use spv::app::{attach, release, App, EventHandler};
use spv::components::theme::Theme;
use spv::components::LayoutComponent;
use spv::config::Config;
use spv::session::SessionManager;

const DEFAULT_LOG_FILTER: &str = "spv=info";

#[derive(Parser)]
#[command(name = "spv", version, about = "Dashboard for GNU screen sessions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set and persist the colour theme
    Theme { name: String },
    /// Print the managed sessions and exit
    List,
    /// Boot-time autostart management
    Autostart {
        #[command(subcommand)]
        action: AutostartCommand,
    },
}

#[derive(Subcommand)]
enum AutostartCommand {
    /// Re-apply boot configuration from the persisted autostart set
    Sync,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("failed to load configuration")?;

    match cli.command {
        None => {
            setup_file_logging(&config)?;
            setup_panic_handler();
            run_dashboard(config).await
        }
        Some(command) => {
            setup_stderr_logging();
            run_command(command, config)
        }
    }
}

fn run_command(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Theme { name } => {
            if Theme::by_name(&name).is_none() {
                eprintln!("Unknown theme '{}'. Available themes:", name);
                for available in Theme::names() {
                    eprintln!("  {}", available);
                }
                bail!("unknown theme: {}", name);
            }
            config.save_theme(&name)?;
            println!("Theme set to {}", name);
        }
        Commands::List => {
            let manager = SessionManager::new(config);
            let sessions = manager.discover();
            if sessions.is_empty() {
                println!("No managed sessions");
            }
            for session in sessions {
                let autostart = if session.autostart { "autostart" } else { "-" };
                println!("{}\t{}\t{}\t{}", session.name, session.status, autostart, session.command);
            }
        }
        Commands::Autostart {
            action: AutostartCommand::Sync,
        } => {
            let manager = SessionManager::new(config);
            println!("Detected system: {}", manager.system_info());
            let flagged = manager.autostart_sessions()?;
            manager.sync_autostart()?;
            println!("Autostart configuration applied for {} session(s)", flagged.len());
        }
    }
    Ok(())
}

async fn run_dashboard(config: Config) -> Result<()> {
    let manager = SessionManager::new(config);
    info!("Detected system: {}", manager.system_info());

    let mut app = App::new(manager);
    app.init().await;
    app.watch_latest_commit(release::spawn_latest_commit_fetch());
    let mut layout = LayoutComponent::new();

    enable_raw_mode().context("terminal does not support raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui(&mut terminal, &mut app, &mut layout).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    layout: &mut LayoutComponent,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            layout.render(frame, &app.state);
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    if let Some(app_event) = EventHandler::handle_key_event(key_event, &mut app.state) {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                }
            }
        }

        if let Some(target) = app.state.pending_attach.take() {
            if let Err(e) = attach::attach_session(&target) {
                error!("Attach failed: {:#}", e);
                app.state
                    .notify(spv::app::notification::Notification::error(format!("Attach failed: {}", e)));
            }
            terminal.clear()?;
            app.mark_stale();
        }

        if last_tick.elapsed() >= tick_rate || app.state.pending_async_action.is_some() {
            if let Err(e) = app.tick().await {
                error!("Error during app tick: {}", e);
            }
            last_tick = Instant::now();

            if app.needs_ui_refresh() {
                terminal.draw(|frame| {
                    layout.render(frame, &app.state);
                })?;
            }
        }

        if app.state.should_quit {
            break;
        }
    }

    Ok(())
}

fn setup_file_logging(config: &Config) -> Result<()> {
    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_file = log_dir.join(format!("spv-{}.log", chrono::Local::now().format("%Y%m%d-%H%M%S")));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("failed to create log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .init();
    Ok(())
}

fn setup_stderr_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "spv=warn".into()))
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        // Restore the terminal before anything is printed
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
