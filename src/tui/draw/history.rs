//! Chat history: welcome group, transcript groups, code blocks, and scrollbar.

use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use crate::core::message::{ChatTurn, Role, welcome_group};

use super::super::app::App;
use super::super::constants::{ACCENT, ACCENT_SECONDARY, SYSTEM_COLOR};
use super::super::text::{Segment, render_line, split_segments, wrap_message};

fn repeat_char(c: char, n: usize) -> String {
    std::iter::repeat_n(c, n).collect()
}

fn label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "Assistant",
        Role::System => "System",
    }
}

fn border_color(role: Role) -> Color {
    match role {
        Role::User => Color::DarkGray,
        Role::Assistant => ACCENT_SECONDARY,
        Role::System => SYSTEM_COLOR,
    }
}

struct TurnBlock<'a> {
    turn: &'a ChatTurn,
    time: Option<DateTime<Local>>,
    stream_cursor: bool,
}

/// Width-dependent layout of the history.
struct Widths {
    wrap: usize,
    content: usize,
}

fn push_turn_block(lines: &mut Vec<Line<'static>>, block: TurnBlock<'_>, w: &Widths) {
    let role = block.turn.role;
    let border_style = Style::default().fg(border_color(role));
    let text_style = if role == Role::System {
        Style::default().fg(SYSTEM_COLOR)
    } else {
        Style::default()
    };
    let code_width = w.content.saturating_sub(2);

    let top_label = match block.time {
        Some(t) => format!("┌─ {} {} ", label(role), t.format("%H:%M")),
        None => format!("┌─ {} ", label(role)),
    };
    let trail = w.wrap.saturating_sub(top_label.chars().count() + 1);
    lines.push(Line::from(Span::styled(
        format!("{}{}┐", top_label, repeat_char('─', trail)),
        border_style,
    )));

    for segment in split_segments(&block.turn.content) {
        match segment {
            Segment::Text(text) => {
                for chunk in wrap_message(text.trim(), w.content) {
                    let mut spans = vec![Span::styled("│   ", border_style)];
                    spans.extend(render_line(&chunk, text_style));
                    lines.push(Line::from(spans));
                }
            }
            Segment::Code { lang, code } => {
                let code_style = Style::default().fg(ACCENT_SECONDARY);
                let header = format!("┌─ {} ", if lang.is_empty() { "code" } else { lang });
                let header_trail = code_width.saturating_sub(header.chars().count() + 1);
                lines.push(Line::from(vec![
                    Span::styled("│ ", border_style),
                    Span::styled(
                        format!("{}{}┐", header, repeat_char('─', header_trail)),
                        code_style,
                    ),
                ]));
                for code_line in code.split('\n') {
                    for chunk in wrap_message(code_line, code_width.saturating_sub(2)) {
                        lines.push(Line::from(vec![
                            Span::styled("│ ", border_style),
                            Span::styled("│ ", code_style),
                            Span::styled(chunk, code_style),
                        ]));
                    }
                }
                lines.push(Line::from(vec![
                    Span::styled("│ ", border_style),
                    Span::styled(
                        format!("└{}┘", repeat_char('─', code_width.saturating_sub(2))),
                        code_style,
                    ),
                ]));
            }
        }
    }

    if block.stream_cursor {
        lines.push(Line::from(vec![
            Span::styled("│ ", border_style),
            Span::styled("  ▌", Style::default().fg(ACCENT_SECONDARY)),
        ]));
    }

    lines.push(Line::from(Span::styled(
        format!("└{}┘", repeat_char('─', w.wrap.saturating_sub(2))),
        border_style,
    )));
}

fn push_separator(lines: &mut Vec<Line<'static>>, w: &Widths) {
    lines.push(Line::from(Span::styled(
        repeat_char('─', w.wrap),
        Style::default().fg(Color::DarkGray),
    )));
}

/// Build every history line: welcome group, then one group per user turn.
fn history_lines(app: &App, w: &Widths) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for turn in &welcome_group() {
        push_turn_block(
            &mut lines,
            TurnBlock {
                turn,
                time: None,
                stream_cursor: false,
            },
            w,
        );
    }

    let last_index = app.transcript.len().saturating_sub(1);
    let mut index = 0;
    for group in app.transcript.groups() {
        push_separator(&mut lines, w);
        for turn in group {
            let time = if app.show_timestamps {
                app.turn_times.get(index).copied()
            } else {
                None
            };
            push_turn_block(
                &mut lines,
                TurnBlock {
                    turn,
                    time,
                    stream_cursor: app.is_streaming && index == last_index,
                },
                w,
            );
            index += 1;
        }
    }

    if app.is_loading {
        lines.push(Line::from(Span::styled(
            "  Loading...",
            Style::default()
                .fg(ACCENT)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

pub(crate) fn draw_history(f: &mut Frame, app: &mut App, history_area: Rect) {
    let history_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(history_area);
    let text_area = history_chunks[0];
    let scrollbar_area = history_chunks[1];
    let wrap = text_area.width as usize;
    let widths = Widths {
        wrap,
        content: wrap.saturating_sub(5),
    };

    let lines = history_lines(app, &widths);
    let total_lines = lines.len();
    let visible = text_area.height as usize;
    app.last_max_scroll = total_lines.saturating_sub(visible.max(1));
    let scroll_pos = app.scroll_line();
    let visible_lines: Vec<Line> = lines.into_iter().skip(scroll_pos).take(visible).collect();

    f.render_widget(Paragraph::new(visible_lines), text_area);

    let mut scrollbar_state = ScrollbarState::default()
        .position(scroll_pos)
        .content_length(total_lines);
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .thumb_symbol("█")
        .thumb_style(Style::default().fg(ACCENT_SECONDARY))
        .track_symbol(Some("│"));
    f.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
}
