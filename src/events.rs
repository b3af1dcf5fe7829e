use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// File written by the `e` key.
pub const EXPORT_FILE: &str = "wallboard_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Windows reports releases too
    if key.kind == KeyEventKind::Release {
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        KeyCode::Char('?') => app.toggle_help(),

        // Pick up the latest published board without waiting for the tick
        KeyCode::Char('r') => match app.reload_data() {
            Ok(true) => app.set_status_message("Updated".to_string()),
            Ok(false) => app.set_status_message("No new data".to_string()),
            Err(e) => app.set_status_message(format!("Reload failed: {}", e)),
        },

        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ChannelSource;
    use crate::ui::Theme;
    use crossterm::event::KeyModifiers;

    fn app() -> (tokio::sync::watch::Sender<crate::data::Board>, App) {
        let (tx, source) = ChannelSource::create("test");
        (tx, App::with_theme(Box::new(source), Duration::from_secs(15), Theme::dark()))
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_help_closes_on_any_key() {
        let (_tx, mut app) = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);

        // 'q' only closes help
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);

        press(&mut app, KeyCode::Esc);
        assert!(!app.running);
    }

    #[test]
    fn test_reload_key_sets_status() {
        let (_tx, mut app) = app();
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.get_status_message(), Some("Updated"));
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.get_status_message(), Some("No new data"));
    }
}
