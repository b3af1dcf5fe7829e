use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use connect_wallboard::app::{write_export, App};
use connect_wallboard::events;
use connect_wallboard::ui;
use connect_wallboard::{Clock, ConnectClient, Pipeline, PipelineSource, WallboardConfig};

#[derive(Parser, Debug)]
#[command(name = "wallboard")]
#[command(about = "Terminal wallboard for Amazon Connect real-time metrics")]
struct Args {
    /// Config file (TOML, YAML or JSON); WALLBOARD_* variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refresh interval in seconds (overrides update_frequency)
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Seconds before the data is flagged as outdated (overrides outdated_threshold)
    #[arg(short, long)]
    outdated: Option<u64>,

    /// Run one refresh, export the board to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Write logs to this file (the terminal is owned by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Pipeline, refresh interval and staleness threshold.
type Setup = (Pipeline<ConnectClient>, Duration, Duration);

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.log_file.as_deref(), args.export.is_some())?;

    let (pipeline, refresh, staleness) = setup(&args);

    let rt = tokio::runtime::Runtime::new()?;

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        return rt.block_on(export_once(pipeline, staleness, &export_path));
    }

    let source = {
        let _guard = rt.enter();
        PipelineSource::spawn(pipeline, Clock::new(refresh))
    };
    let result = run_tui(App::new(Box::new(source), staleness));

    // Let the refresh task see the shutdown without waiting for a slow call.
    rt.shutdown_timeout(Duration::from_secs(1));
    result
}

/// Resolve configuration into a ready pipeline.
///
/// Configuration problems do not abort startup; the board shows a permanent
/// "not set up" message instead.
fn setup(args: &Args) -> Setup {
    let default_interval = Duration::from_secs(connect_wallboard::config::DEFAULT_UPDATE_FREQUENCY_SECS);
    let default_staleness = Duration::from_secs(connect_wallboard::config::DEFAULT_OUTDATED_THRESHOLD_SECS);

    match WallboardConfig::load(args.config.as_deref()) {
        Ok(mut config) => {
            if let Some(secs) = args.refresh.filter(|s| *s > 0) {
                config.update_frequency = Duration::from_secs(secs);
            }
            if let Some(secs) = args.outdated.filter(|s| *s > 0) {
                config.outdated_threshold = Duration::from_secs(secs);
            }
            info!(
                instance = %config.instance_id,
                region = %config.region,
                refresh = ?config.update_frequency,
                quadrants = config.quadrants.len(),
                "Configuration loaded"
            );
            let client = ConnectClient::from_config(&config);
            (
                Pipeline::new(client, &config),
                config.update_frequency,
                config.outdated_threshold,
            )
        }
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            (
                Pipeline::unconfigured(&e.to_string()),
                default_interval,
                default_staleness,
            )
        }
    }
}

/// Route logs to a file, to stderr (export mode), or nowhere.
fn init_logging(log_file: Option<&Path>, to_stderr: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .init();
    } else if to_stderr {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(true)
            .init();
    }
    Ok(())
}

/// Run a single refresh cycle and write the resulting board.
async fn export_once(
    mut pipeline: Pipeline<ConnectClient>,
    staleness: Duration,
    export_path: &Path,
) -> Result<()> {
    let board = pipeline.tick().await;
    let view = board.view(Utc::now(), staleness);
    write_export(&view, export_path)
        .with_context(|| format!("Failed to export to {}", export_path.display()))?;

    println!("Exported wallboard state to: {}", export_path.display());
    Ok(())
}

/// Run the TUI until the user quits.
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let _ = app.reload_data();

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Boards arrive at most once per refresh; polling the source this often
    // keeps the header's staleness check current.
    const POLL_INTERVAL: Duration = Duration::from_millis(250);

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 40;
    const MIN_HEIGHT: u16 = 10;

    let mut last_poll = Instant::now();

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let top = (area.height / 2).saturating_sub(2);
                let centered = ratatui::layout::Rect::new(0, top, area.width, 5.min(area.height));
                frame.render_widget(paragraph, centered);
                return;
            }

            ui::draw(frame, app);
        })?;

        if let Some(Event::Key(key)) = events::poll_event(Duration::from_millis(100))? {
            events::handle_key_event(app, key);
        }

        if last_poll.elapsed() >= POLL_INTERVAL {
            let _ = app.reload_data();
            last_poll = Instant::now();
        }
    }

    Ok(())
}
