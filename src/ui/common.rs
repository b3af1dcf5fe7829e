//! Common UI components: header bar, status bar and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::BoardView;

/// Render the header bar with the time of the displayed snapshot.
///
/// The time turns red once the snapshot is older than the staleness
/// threshold.
pub fn render_header(frame: &mut Frame, app: &App, view: &BoardView, area: Rect) {
    let mut spans = vec![
        Span::styled(" CONNECT WALLBOARD ", app.theme.header),
        Span::raw("│ "),
    ];

    match &view.last_update {
        Some(time) if view.fresh => {
            spans.push(Span::raw(format!("Last Update: {}", time)));
        }
        Some(time) => {
            spans.push(Span::styled(format!("Last Update: {}", time), app.theme.stale));
            spans.push(Span::styled(" (outdated)", app.theme.stale));
        }
        None => {
            spans.push(Span::styled("Waiting for data", Style::default().add_modifier(Modifier::DIM)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Shows the source, any refresh notice and the available controls.
/// Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, view: &BoardView, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = "r:redraw e:export ?:help q:quit";
    let status = if let Some(ref err) = app.load_error {
        format!(" Error: {} | {}", err, controls)
    } else if let Some(ref notice) = view.notice {
        format!(" {} | {} | {}", app.source_description(), notice, controls)
    } else {
        format!(" {} | {}", app.source_description(), controls)
    };

    let style = if view.notice.is_some() || app.load_error.is_some() {
        Style::default().fg(app.theme.red)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    frame.render_widget(Paragraph::new(status).style(style), area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the board.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(" General", bold)]),
        Line::from("  r         Redraw now"),
        Line::from("  e         Export to JSON"),
        Line::from("  ?         Toggle this help"),
        Line::from("  q / Esc   Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(" Colors", bold)]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(" red ", Style::default().bg(app.theme.red).fg(app.theme.on_color)),
            Span::raw(" beats "),
            Span::styled(" yellow ", Style::default().bg(app.theme.yellow).fg(app.theme.on_color)),
            Span::raw(" beats "),
            Span::styled(" green ", Style::default().bg(app.theme.green).fg(app.theme.on_color)),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 15u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
