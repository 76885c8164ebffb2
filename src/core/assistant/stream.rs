//! Streaming consumption: real SSE streams and simulated (single-chunk) streams, with a size limit.

use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;

use super::error::ChatError;
use super::normalize::{normalize_body, normalize_event_payload};

/// Max content size (2MB) to prevent unbounded memory growth from malformed streams.
pub(crate) const MAX_CONTENT_BYTES: usize = 2 * 1024 * 1024;

/// Callback for each streamed content chunk.
pub type OnContentChunk = Box<dyn Fn(&str) + Send + Sync>;

/// True when the content type announces a server-sent event stream.
pub(crate) fn is_event_stream(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.trim_start().starts_with("text/event-stream"))
}

/// Meaning of one SSE line.
#[derive(Debug, PartialEq, Eq)]
enum SseLine<'a> {
    Data(&'a str),
    Done,
    /// Blank line: dispatches the pending event.
    EndOfEvent,
    Skip,
}

fn parse_sse_line(line: &str) -> SseLine<'_> {
    if line.is_empty() {
        return SseLine::EndOfEvent;
    }
    let Some(payload) = line.strip_prefix("data:") else {
        return SseLine::Skip;
    };
    let payload = payload.strip_prefix(' ').unwrap_or(payload);
    if payload.trim() == "[DONE]" {
        SseLine::Done
    } else {
        SseLine::Data(payload)
    }
}

/// Incremental SSE decoder. Lines may be split across network chunks; the `data:` lines of
/// one event are joined with `\n` and normalized when the event ends.
#[derive(Default)]
pub(crate) struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    done: bool,
}

impl SseDecoder {
    /// Feed raw bytes; returns the chunks carried by every complete event.
    pub(crate) fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut out = Vec::new();
        while !self.done {
            let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') else {
                break;
            };
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            self.decode_line(&line[..line.len() - 1], &mut out);
        }
        out
    }

    /// Flush a trailing line and the pending event at end of stream.
    pub(crate) fn finish(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        if self.done {
            return out;
        }
        if !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            self.decode_line(&line, &mut out);
        }
        self.dispatch(&mut out);
        out
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done
    }

    fn decode_line(&mut self, raw: &[u8], out: &mut Vec<String>) {
        let decoded = String::from_utf8_lossy(raw);
        let line: &str = decoded.strip_suffix('\r').unwrap_or(&decoded);
        match parse_sse_line(line) {
            SseLine::Data(payload) => match self.event.as_mut() {
                Some(event) => {
                    event.push('\n');
                    event.push_str(payload);
                }
                None => self.event = Some(payload.to_string()),
            },
            SseLine::EndOfEvent => self.dispatch(out),
            SseLine::Done => {
                self.dispatch(out);
                self.done = true;
            }
            SseLine::Skip => {}
        }
    }

    fn dispatch(&mut self, out: &mut Vec<String>) {
        if let Some(text) = self.event.take().and_then(|e| normalize_event_payload(&e)) {
            out.push(text);
        }
    }
}

/// Read a body as it arrives, keeping at most `limit` bytes.
///
/// Reading stops at the limit; the flag is true when bytes were left unread.
pub(crate) async fn read_capped(
    response: reqwest::Response,
    limit: usize,
) -> Result<(String, bool), reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut body: Vec<u8> = Vec::new();
    let mut truncated = false;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        let room = limit - body.len();
        if bytes.len() > room {
            body.extend_from_slice(&bytes[..room]);
            truncated = true;
            break;
        }
        body.extend_from_slice(&bytes);
    }
    if truncated {
        // Drop a multi-byte character cut at the limit.
        let valid = match std::str::from_utf8(&body) {
            Ok(_) => body.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(_) => body.len(),
        };
        body.truncate(valid);
    }
    Ok((String::from_utf8_lossy(&body).into_owned(), truncated))
}

/// Accumulates emitted content, enforcing [`MAX_CONTENT_BYTES`].
struct Accumulator<'a> {
    content: String,
    on_chunk: Option<&'a (dyn Fn(&str) + Send + Sync)>,
    truncated: bool,
}

impl<'a> Accumulator<'a> {
    fn new(on_chunk: Option<&'a (dyn Fn(&str) + Send + Sync)>) -> Self {
        Self {
            content: String::new(),
            on_chunk,
            truncated: false,
        }
    }

    /// Append `piece`; returns false once the limit has been reached.
    fn push(&mut self, piece: &str) -> bool {
        if self.truncated {
            return false;
        }
        if piece.is_empty() {
            return true;
        }
        let room = MAX_CONTENT_BYTES.saturating_sub(self.content.len());
        let accepted = if piece.len() <= room {
            piece
        } else {
            log::warn!(
                "Response exceeded {} bytes; dropping the rest",
                MAX_CONTENT_BYTES
            );
            self.truncated = true;
            let mut end = room;
            while !piece.is_char_boundary(end) {
                end -= 1;
            }
            &piece[..end]
        };
        if !accepted.is_empty() {
            self.content.push_str(accepted);
            if let Some(cb) = self.on_chunk {
                cb(accepted);
            }
        }
        !self.truncated
    }
}

/// Consume a successful relay response, emitting chunks as they become available.
///
/// Event streams are decoded event by event; any other body is read up to the size limit,
/// normalized and emitted as one chunk. Reading stops once the limit is reached. Returns
/// the full reply.
pub(crate) async fn consume(
    response: reqwest::Response,
    on_chunk: Option<&(dyn Fn(&str) + Send + Sync)>,
) -> Result<String, ChatError> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let mut acc = Accumulator::new(on_chunk);

    if is_event_stream(content_type.as_deref()) {
        log::debug!("Consuming event stream");
        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::default();
        'read: while let Some(chunk) = stream.next().await {
            let bytes = chunk?;
            for piece in decoder.feed(&bytes) {
                if !acc.push(&piece) {
                    break 'read;
                }
            }
            if decoder.is_done() {
                break;
            }
        }
        for piece in decoder.finish() {
            acc.push(&piece);
        }
    } else {
        // Upstream has no streaming: emit the whole reply as a single chunk.
        let (body, truncated) = read_capped(response, MAX_CONTENT_BYTES).await?;
        if truncated {
            log::warn!(
                "Response exceeded {} bytes; dropping the rest",
                MAX_CONTENT_BYTES
            );
        }
        log::debug!("Response text: {} bytes", body.len());
        acc.push(&normalize_body(content_type.as_deref(), &body));
    }
    Ok(acc.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn event_stream_detection() {
        assert!(is_event_stream(Some("text/event-stream")));
        assert!(is_event_stream(Some("text/event-stream; charset=utf-8")));
        assert!(!is_event_stream(Some("text/plain")));
        assert!(!is_event_stream(None));
    }

    #[test]
    fn sse_line_kinds() {
        assert_eq!(parse_sse_line("data: hi"), SseLine::Data("hi"));
        assert_eq!(parse_sse_line("data:hi"), SseLine::Data("hi"));
        assert_eq!(parse_sse_line("data:"), SseLine::Data(""));
        assert_eq!(parse_sse_line("data: [DONE]"), SseLine::Done);
        assert_eq!(parse_sse_line(": keep-alive"), SseLine::Skip);
        assert_eq!(parse_sse_line("event: message"), SseLine::Skip);
        assert_eq!(parse_sse_line(""), SseLine::EndOfEvent);
    }

    #[test]
    fn decoder_handles_split_lines() {
        let mut d = SseDecoder::default();
        assert!(d.feed(b"data: Hel").is_empty());
        let chunks =
            d.feed(b"lo\r\n\ndata: {\"choices\":[{\"delta\":{\"content\":\" world\"}}]}\n");
        assert_eq!(chunks, vec!["Hello".to_string()]);
        assert_eq!(d.feed(b"\n"), vec![" world".to_string()]);
        assert!(!d.is_done());
        assert!(d.feed(b"data: [DONE]\n\ndata: ignored\n").is_empty());
        assert!(d.is_done());
        assert!(d.finish().is_empty());
    }

    #[test]
    fn multi_line_event_keeps_line_breaks() {
        let mut d = SseDecoder::default();
        let chunks = d.feed(b"data: line1\ndata:\ndata: line2\n\n");
        assert_eq!(chunks, vec!["line1\n\nline2".to_string()]);
    }

    #[test]
    fn done_flushes_pending_event() {
        let mut d = SseDecoder::default();
        let chunks = d.feed(b"data: last\ndata: [DONE]\n");
        assert_eq!(chunks, vec!["last".to_string()]);
        assert!(d.is_done());
    }

    #[test]
    fn role_only_delta_emits_nothing() {
        let mut d = SseDecoder::default();
        let event = b"data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n";
        assert!(d.feed(event).is_empty());
    }

    #[test]
    fn decoder_flushes_trailing_line() {
        let mut d = SseDecoder::default();
        assert!(d.feed(b"data: tail").is_empty());
        assert_eq!(d.finish(), vec!["tail".to_string()]);
    }

    #[test]
    fn accumulator_emits_and_caps() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let seen_cb = Arc::clone(&seen);
        let cb: OnContentChunk = Box::new(move |s| seen_cb.lock().unwrap().push(s.to_string()));
        let mut acc = Accumulator::new(Some(cb.as_ref()));
        assert!(acc.push("abc"));
        assert!(acc.push(""));
        let big = "é".repeat(MAX_CONTENT_BYTES);
        assert!(!acc.push(&big));
        assert!(!acc.push("after"));
        assert!(acc.truncated);
        assert!(acc.content.len() <= MAX_CONTENT_BYTES);
        assert!(acc.content.starts_with("abc"));
        assert!(!acc.content.ends_with("after"));
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0], "abc");
        assert_eq!(seen.len(), 2);
    }
}
