//! The quadrant grid and the full-screen status view.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::{BoardView, QuadrantView};

/// Quadrants per row.
const COLUMNS: usize = 2;

/// Render the board content area.
pub fn render(frame: &mut Frame, app: &App, view: &BoardView, area: Rect) {
    if let Some(status) = &view.status {
        render_status(frame, app, status, area);
        return;
    }
    if view.quadrants.is_empty() {
        render_status(frame, app, "No quadrants configured", area);
        return;
    }

    let rows = view.quadrants.len().div_ceil(COLUMNS);
    let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows as u32); rows]).split(area);

    for (row, chunk) in view.quadrants.chunks(COLUMNS).enumerate() {
        let cells = Layout::horizontal(vec![Constraint::Ratio(1, COLUMNS as u32); COLUMNS])
            .split(row_areas[row]);
        for (quadrant, cell) in chunk.iter().zip(cells.iter()) {
            render_quadrant(frame, app, quadrant, *cell);
        }
    }
}

fn render_quadrant(frame: &mut Frame, app: &App, quadrant: &QuadrantView, area: Rect) {
    let style = app.theme.quadrant_style(quadrant.color);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.quadrant_border(quadrant.color))
        .style(style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Value and caption take two lines; center them vertically.
    let padding = inner.height.saturating_sub(2) / 2;
    let mut lines: Vec<Line> = (0..padding).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(
        quadrant.display_text.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(quadrant.description_text.clone()));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(style);
    frame.render_widget(paragraph, inner);
}

fn render_status(frame: &mut Frame, app: &App, message: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let padding = inner.height.saturating_sub(1) / 2;
    let mut lines: Vec<Line> = (0..padding).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(
        message.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }),
        inner,
    );
}
