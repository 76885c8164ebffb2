//! Text helpers for the chat area: fenced code blocks, inline markdown, wrapping.

mod markdown;
mod segments;
mod wrap;

pub(crate) use markdown::render_line;
pub(crate) use segments::{Segment, split_segments};
pub(crate) use wrap::wrap_message;

#[cfg(test)]
mod tests;
