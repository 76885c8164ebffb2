//! Input box and bottom bar.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::super::app::App;
use super::super::constants::{ACCENT, INPUT_LINES};
use super::super::shortcuts::labels;

const PLACEHOLDER: &str = "Type your message...";
const BUSY_PLACEHOLDER: &str = "Waiting for the reply...";

/// Hard-wrap `input` into rows of at most `width` chars and locate the cursor (byte index).
/// Returns the rows and the cursor's (row, column).
pub(crate) fn layout_input(input: &str, cursor: usize, width: usize) -> (Vec<String>, (usize, usize)) {
    let width = width.max(1);
    let mut rows = vec![String::new()];
    let mut position = None;
    let mut col = 0;
    for (i, c) in input.char_indices() {
        if i == cursor {
            position = Some((rows.len() - 1, col));
        }
        if c == '\n' {
            rows.push(String::new());
            col = 0;
            continue;
        }
        if col == width {
            rows.push(String::new());
            col = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(c);
        }
        col += 1;
    }
    let position = position.unwrap_or_else(|| {
        if col == width {
            rows.push(String::new());
            (rows.len() - 1, 0)
        } else {
            (rows.len() - 1, col)
        }
    });
    (rows, position)
}

fn draw_input_block(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.model_selector.is_none() && !app.is_busy();
    let border_style = if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default().borders(Borders::ALL).border_style(border_style);
    let inner = block.inner(area);

    if app.input.is_empty() {
        let placeholder = if app.is_busy() { BUSY_PLACEHOLDER } else { PLACEHOLDER };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                placeholder,
                Style::default().fg(Color::DarkGray),
            )))
            .block(block),
            area,
        );
        if focused {
            f.set_cursor_position(Position::new(inner.x, inner.y));
        }
        return;
    }

    let (rows, (row, col)) = layout_input(&app.input, app.input_cursor, inner.width as usize);
    let height = (inner.height as usize).max(1);
    let scroll_y = row.saturating_sub(height - 1);
    let text_style = if app.is_busy() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    let lines: Vec<Line> = rows
        .into_iter()
        .skip(scroll_y)
        .take(height)
        .map(|r| Line::from(Span::styled(r, text_style)))
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);

    if focused {
        let cx = inner.x + (col as u16).min(inner.width.saturating_sub(1));
        let cy = inner.y + (row - scroll_y) as u16;
        f.set_cursor_position(Position::new(cx, cy));
    }
}

pub(crate) fn draw_input_section(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(INPUT_LINES), Constraint::Length(1)])
        .split(area);
    draw_input_block(f, app, chunks[0]);
    f.render_widget(
        Paragraph::new(labels::bottom_bar(app.is_busy())).alignment(Alignment::Right),
        chunks[1],
    );
}
