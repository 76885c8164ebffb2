//! Header: activity logo, title, current model.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use std::sync::OnceLock;
use std::time::Instant;

use crate::core::app::DISPLAY_TITLE;

use super::super::app::App;
use super::super::constants::{ACCENT, LOGO_IDLE, LOGO_THINKING};

/// Start time for the spinner phase.
static HEADER_START: OnceLock<Instant> = OnceLock::new();

/// Max width for the model id; longer ids are truncated with "…".
const MODEL_HEADER_WIDTH: u16 = 28;

const NO_MODEL: &str = "Select Model";

fn logo_symbol(app: &App) -> &'static str {
    if !app.is_busy() {
        return LOGO_IDLE;
    }
    let phase = HEADER_START.get_or_init(Instant::now).elapsed().as_millis() as usize;
    LOGO_THINKING[(phase / 80) % LOGO_THINKING.len()]
}

/// Model label: the id, or a prompt to pick one.
pub(crate) fn model_label(model_id: &str, max_len: usize) -> String {
    if model_id.is_empty() {
        return NO_MODEL.to_string();
    }
    let count = model_id.chars().count();
    if count <= max_len {
        return model_id.to_string();
    }
    let tail: String = model_id
        .chars()
        .skip(count - max_len.saturating_sub(1))
        .collect();
    format!("…{}", tail)
}

pub(crate) fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(MODEL_HEADER_WIDTH),
        ])
        .split(inner);

    let logo = Line::from(Span::styled(
        format!(" {} ", logo_symbol(app)),
        Style::default().fg(ACCENT),
    ));
    f.render_widget(Paragraph::new(logo), chunks[0]);

    let title = Line::from(Span::styled(
        DISPLAY_TITLE,
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ));
    f.render_widget(Paragraph::new(title).alignment(Alignment::Center), chunks[1]);

    let model_style = if app.model_id.is_empty() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let model = Line::from(Span::styled(
        model_label(&app.model_id, MODEL_HEADER_WIDTH as usize - 1),
        model_style,
    ));
    f.render_widget(Paragraph::new(model).alignment(Alignment::Right), chunks[2]);
}
