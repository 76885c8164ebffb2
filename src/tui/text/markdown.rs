//! Inline markdown for one display line: headings, list markers, **bold**, *italic*, `code`.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::tui::constants::{ACCENT, ACCENT_SECONDARY};

/// Inline delimiters, longest first so `**` wins over `*`.
const DELIMITERS: &[(&str, Inline)] = &[
    ("**", Inline::Bold),
    ("`", Inline::Code),
    ("*", Inline::Italic),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Inline {
    Bold,
    Italic,
    Code,
}

impl Inline {
    fn style(self) -> Style {
        match self {
            Inline::Bold => Style::default().add_modifier(Modifier::BOLD),
            Inline::Italic => Style::default().add_modifier(Modifier::ITALIC),
            Inline::Code => Style::default().fg(ACCENT_SECONDARY),
        }
    }
}

/// Style one wrapped line of prose.
pub(crate) fn render_line(line: &str, base: Style) -> Vec<Span<'static>> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        let heading = trimmed.trim_start_matches('#').trim_start();
        return vec![Span::styled(
            heading.to_string(),
            base.fg(ACCENT).add_modifier(Modifier::BOLD),
        )];
    }

    let mut spans = Vec::new();
    let body = if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        spans.push(Span::styled("• ", base.fg(ACCENT)));
        rest
    } else if let Some((marker, rest)) = numbered_marker(trimmed) {
        spans.push(Span::styled(format!("{} ", marker), base.fg(ACCENT)));
        rest
    } else {
        line
    };
    spans.extend(inline_spans(body, base));
    spans
}

/// "12. rest" or "3) rest" -> ("12.", "rest").
fn numbered_marker(s: &str) -> Option<(&str, &str)> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let after = &s[digits..];
    if after.starts_with(". ") || after.starts_with(") ") {
        Some((&s[..digits + 1], &after[2..]))
    } else {
        None
    }
}

/// Find the earliest delimiter in `s` that has a matching closer.
fn next_styled(s: &str) -> Option<(usize, &'static str, Inline, usize)> {
    let mut best: Option<(usize, &'static str, Inline, usize)> = None;
    for &(delim, kind) in DELIMITERS {
        let mut from = 0;
        while let Some(found) = s[from..].find(delim) {
            let open = from + found;
            let inner_start = open + delim.len();
            let closes = s[inner_start..]
                .find(delim)
                .filter(|&len| len > 0 && !s[inner_start..].starts_with(' '));
            if let Some(len) = closes {
                if best.is_none_or(|(pos, ..)| open < pos) {
                    best = Some((open, delim, kind, len));
                }
                break;
            }
            from = inner_start;
        }
    }
    best
}

fn inline_spans(s: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut rest = s;
    while let Some((open, delim, kind, len)) = next_styled(rest) {
        if open > 0 {
            spans.push(Span::styled(rest[..open].to_string(), base));
        }
        let inner_start = open + delim.len();
        spans.push(Span::styled(
            rest[inner_start..inner_start + len].to_string(),
            base.patch(kind.style()),
        ));
        rest = &rest[inner_start + len + delim.len()..];
    }
    if !rest.is_empty() {
        spans.push(Span::styled(rest.to_string(), base));
    }
    spans
}
