//! Application state.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;

use crate::data::{Board, BoardView};
use crate::source::DataSource;
use crate::ui::Theme;

/// How long transient status messages stay visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub board: Board,
    pub load_error: Option<String>,
    /// Snapshots older than this are flagged as outdated.
    pub staleness: Duration,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with the given data source and staleness threshold.
    pub fn new(source: Box<dyn DataSource>, staleness: Duration) -> Self {
        Self::with_theme(source, staleness, Theme::auto_detect())
    }

    pub fn with_theme(source: Box<dyn DataSource>, staleness: Duration, theme: Theme) -> Self {
        Self {
            running: true,
            show_help: false,
            source,
            board: Board::default(),
            load_error: None,
            staleness,
            theme,
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Poll the data source for a new board.
    ///
    /// Returns Ok(true) if the board changed, Ok(false) otherwise.
    pub fn reload_data(&mut self) -> Result<bool> {
        self.load_error = self.source.error().map(|e| e.to_string());

        match self.source.poll() {
            Some(board) => {
                self.board = board;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The board resolved at the current time.
    pub fn view(&self) -> BoardView {
        self.board.view(Utc::now(), self.staleness)
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current board to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        write_export(&self.view(), path)
    }
}

/// Write a board view as pretty-printed JSON.
pub fn write_export(view: &BoardView, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(view)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ColorState, QuadrantView, StatusMessage};
    use crate::source::ChannelSource;

    fn app() -> (tokio::sync::watch::Sender<Board>, App) {
        let (tx, source) = ChannelSource::create("test");
        let app = App::with_theme(Box::new(source), Duration::from_secs(15), Theme::dark());
        (tx, app)
    }

    #[test]
    fn test_reload_data() {
        let (tx, mut app) = app();
        assert!(app.reload_data().unwrap());
        assert_eq!(app.view().status.as_deref(), Some("Loading..."));
        assert!(!app.reload_data().unwrap());

        tx.send(Board::Status(StatusMessage::NoQueues)).unwrap();
        assert!(app.reload_data().unwrap());
        assert_eq!(app.board, Board::Status(StatusMessage::NoQueues));
        assert!(app.load_error.is_none());
        assert_eq!(app.source_description(), "channel: test");
    }

    #[test]
    fn test_export_state() {
        let (tx, mut app) = app();
        tx.send(Board::Metrics {
            snapshot_time: Utc::now(),
            quadrants: vec![QuadrantView {
                display_text: "7".into(),
                description_text: "Contacts in queue".into(),
                color: ColorState::Yellow,
            }],
            notice: None,
        })
        .unwrap();
        app.reload_data().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallboard.json");
        app.export_state(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["fresh"], true);
        assert_eq!(json["quadrants"][0]["display_text"], "7");
        assert_eq!(json["quadrants"][0]["color"], "yellow");
    }

    #[test]
    fn test_status_message_and_help() {
        let (_tx, mut app) = app();
        assert!(app.get_status_message().is_none());
        app.set_status_message("Exported".into());
        assert_eq!(app.get_status_message(), Some("Exported"));

        app.toggle_help();
        assert!(app.show_help);
        app.quit();
        assert!(!app.running);
    }
}
