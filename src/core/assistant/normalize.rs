//! Response-shape normalization.
//!
//! The relay forwards whatever the upstream produced. Two conventions are accepted:
//! plain text (the body is the reply) and JSON, either OpenAI-style completions
//! (`choices[0].message.content`, `choices[0].delta.content`, `choices[0].text`)
//! or a flat object carrying the reply in a well-known field.

use serde_json::Value;

/// Flat-object fields that may carry the reply, in lookup order.
const FLAT_FIELDS: &[&str] = &["response", "reply", "content", "text", "message"];

/// Extract reply text from a JSON value in any supported shape.
pub fn extract_text(value: &Value) -> Option<String> {
    if let Some(s) = value.as_str() {
        return Some(s.to_string());
    }
    if let Some(choice) = value.get("choices").and_then(|c| c.get(0)) {
        return choice
            .pointer("/message/content")
            .or_else(|| choice.pointer("/delta/content"))
            .or_else(|| choice.get("text"))
            .and_then(content_text);
    }
    FLAT_FIELDS
        .iter()
        .find_map(|field| value.get(*field).and_then(content_text))
}

/// Content may be a plain string or an array of `{ "text": ... }` blocks.
fn content_text(content: &Value) -> Option<String> {
    if let Some(s) = content.as_str() {
        return Some(s.to_string());
    }
    let blocks = content.as_array()?;
    let text: String = blocks
        .iter()
        .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
        .collect();
    if text.is_empty() { None } else { Some(text) }
}

fn looks_like_json(body: &str) -> bool {
    let trimmed = body.trim_start();
    trimmed.starts_with('{') || trimmed.starts_with('"')
}

/// Normalize a complete response body into reply text.
///
/// `content_type` is a hint only: a plain-text body that parses as JSON of a known shape is
/// still unwrapped, and JSON of an unknown shape is returned verbatim.
pub fn normalize_body(content_type: Option<&str>, body: &str) -> String {
    let declared_json = content_type.is_some_and(|ct| ct.contains("json"));
    if (declared_json || looks_like_json(body))
        && let Ok(value) = serde_json::from_str::<Value>(body)
        && let Some(text) = extract_text(&value)
    {
        return text;
    }
    body.to_string()
}

/// Normalize one SSE `data:` payload into a chunk.
///
/// JSON payloads without text (e.g. a role-only delta) yield `None`; non-JSON payloads are
/// emitted as-is.
pub fn normalize_event_payload(payload: &str) -> Option<String> {
    if looks_like_json(payload)
        && let Ok(value) = serde_json::from_str::<Value>(payload)
    {
        return extract_text(&value).filter(|s| !s.is_empty());
    }
    if payload.is_empty() {
        None
    } else {
        Some(payload.to_string())
    }
}
