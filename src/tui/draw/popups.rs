//! Model selector popup: models grouped by provider with health markers.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Flex, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};

use crate::core::models::{ModelHealth, ModelInfo};

use super::super::app::ModelSelectorState;
use super::super::constants::{ACCENT, ACCENT_SECONDARY};

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let vertical_areas = vertical.split(area);
    let horizontal_areas = horizontal.split(vertical_areas[0]);
    horizontal_areas[0]
}

fn health_color(health: ModelHealth) -> Color {
    match health {
        ModelHealth::Unknown => Color::DarkGray,
        ModelHealth::Available => Color::Green,
        ModelHealth::Unavailable => Color::Red,
    }
}

/// One row of the list: either a provider heading or a selectable model.
enum Row<'a> {
    Provider(&'a str),
    Model { index: usize, model: &'a ModelInfo },
}

/// Interleave provider headings with the visible models (already in display order).
fn rows<'a>(visible: &[&'a ModelInfo]) -> Vec<Row<'a>> {
    let mut out = Vec::new();
    let mut current: Option<&str> = None;
    for (index, model) in visible.iter().enumerate() {
        let provider = model.provider_label();
        if current != Some(provider) {
            out.push(Row::Provider(provider));
            current = Some(provider);
        }
        out.push(Row::Model { index, model });
    }
    out
}

fn model_item<'a>(
    model: &ModelInfo,
    selected: bool,
    current: bool,
    probing: bool,
) -> ListItem<'a> {
    let marker = if probing { "…" } else { model.health.marker() };
    let mut spans = vec![
        Span::styled(
            format!(" {} ", marker),
            Style::default().fg(health_color(model.health)),
        ),
        Span::raw(model.id.clone()),
    ];
    if current {
        spans.push(Span::styled(" (current)", Style::default().fg(ACCENT_SECONDARY)));
    }
    if !model.active {
        spans.push(Span::styled(" inactive", Style::default().fg(Color::DarkGray)));
    }
    if probing {
        spans.push(Span::styled(" testing...", Style::default().fg(Color::Yellow)));
    }
    let style = if selected {
        Style::default().fg(Color::Black).bg(ACCENT)
    } else if !model.active {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    };
    ListItem::new(Line::from(spans)).style(style)
}

pub(crate) fn draw_model_selector_popup(
    f: &mut Frame,
    area: Rect,
    selector: &mut ModelSelectorState,
    current_model: &str,
) {
    let popup_rect = popup_area(area, 60, 60);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(" Select model (Alt+M) ");

    let inner = block.inner(popup_rect);
    f.render_widget(Clear, popup_rect);
    f.render_widget(block, popup_rect);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);
    let filter_area = chunks[0];
    let list_area = chunks[1];
    let hint_area = chunks[2];

    let filter_content = if selector.filter.is_empty() {
        Span::styled("Filter... ", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(selector.filter.clone())
    };
    let filter_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let filter_inner = filter_block.inner(filter_area);
    f.render_widget(
        Paragraph::new(Line::from(filter_content))
            .block(filter_block)
            .style(Style::default().fg(Color::White)),
        filter_area,
    );
    let cx = filter_inner.x
        + selector
            .filter
            .chars()
            .count()
            .min(filter_inner.width as usize) as u16;
    f.set_cursor_position(Position::new(cx, filter_inner.y));

    let visible = selector.visible();
    if visible.is_empty() {
        let msg = if selector.filter.is_empty() {
            "No models"
        } else {
            "No models match filter"
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                msg,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))),
            list_area,
        );
    } else {
        let selected_index = selector.selected_index.min(visible.len() - 1);
        let mut selected_row = 0;
        let items: Vec<ListItem> = rows(&visible)
            .into_iter()
            .enumerate()
            .map(|(row, r)| match r {
                Row::Provider(name) => ListItem::new(Line::from(Span::styled(
                    name.to_string(),
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                ))),
                Row::Model { index, model } => {
                    if index == selected_index {
                        selected_row = row;
                    }
                    model_item(
                        model,
                        index == selected_index,
                        model.id == current_model,
                        selector.probing.as_deref() == Some(model.id.as_str()),
                    )
                }
            })
            .collect();

        selector.selected_index = selected_index;
        selector.list_state.select(Some(selected_row));
        f.render_stateful_widget(List::new(items), list_area, &mut selector.list_state);
    }

    let hint = Line::from(vec![
        Span::styled("↑↓ ", Style::default().fg(ACCENT)),
        Span::raw("move  "),
        Span::styled("Enter ", Style::default().fg(ACCENT)),
        Span::raw("select  "),
        Span::styled("Ctrl+T ", Style::default().fg(ACCENT)),
        Span::raw("test  "),
        Span::styled("Esc ", Style::default().fg(Color::DarkGray)),
        Span::raw("close"),
    ]);
    f.render_widget(Paragraph::new(hint), hint_area);
}
