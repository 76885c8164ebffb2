//! TUI constants: colors, timing, and layout sizes.

use ratatui::style::Color;

/// Accent green color (#98FB98).
pub(super) const ACCENT: Color = Color::Rgb(152, 251, 152);

/// Secondary accent: soft cyan (#7EC8E3) that pairs well with the green.
pub(super) const ACCENT_SECONDARY: Color = Color::Rgb(126, 200, 227);

/// System notices (model changes, failures).
pub(super) const SYSTEM_COLOR: Color = Color::Rgb(230, 200, 120);

/// Event poll timeout in milliseconds (main loop).
pub(crate) const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// How long to wait for the key following Esc (Option as Meta).
pub(crate) const ESC_SEQUENCE_DRAIN_MS: u64 = 150;

/// Scroll amount for arrow keys and mouse wheel.
pub(crate) const SCROLL_LINES_SMALL: usize = 3;

/// Scroll amount for PageUp/PageDown.
pub(crate) const SCROLL_LINES_PAGE: usize = 10;

/// Input box height including borders.
pub(crate) const INPUT_LINES: u16 = 5;

/// Minimalist logo when idle (single character).
pub(super) const LOGO_IDLE: &str = "◆";

/// Spinner frames for the loading animation (braille pattern, 4 frames).
pub(super) const LOGO_THINKING: &[&str] = &["⠋", "⠙", "⠹", "⠸"];

/// Header height in rows.
pub(super) const HEADER_HEIGHT: u16 = 2;
