//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`board`]: Quadrant grid, or the full-screen status message
//! - [`common`]: Shared components (header, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────┬───────────────────┤
//! │ Quadrant 1       │ Quadrant 2        │
//! ├──────────────────┼───────────────────┤
//! │ Quadrant 3       │ Quadrant 4        │
//! ├──────────────────┴───────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlay rendered on top:
//!    - common::render_help
//! ```

pub mod board;
pub mod common;
pub mod theme;

pub use theme::Theme;

use ratatui::layout::{Constraint, Layout};
use ratatui::Frame;

use crate::app::App;

/// Draw one full frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let view = app.view();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Min(6),    // Quadrants
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, &view, chunks[0]);
    board::render(frame, app, &view, chunks[1]);
    common::render_status_bar(frame, app, &view, chunks[2]);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}
