//! Split a turn into prose and fenced code blocks.

/// A run of prose or a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Text(&'a str),
    Code { lang: &'a str, code: &'a str },
}

/// Fences must start a line. An unterminated fence runs to the end of the content,
/// which keeps a code block rendered as code while it is still streaming.
pub(crate) fn split_segments(content: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut open: Option<(&str, usize)> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let Some(info) = line.trim_end().strip_prefix("```") else {
            continue;
        };
        match open.take() {
            None => {
                push_text(&mut segments, &content[text_start..line_start]);
                open = Some((info.trim(), offset));
            }
            Some((lang, code_start)) => {
                let code = content[code_start..line_start].trim_end_matches('\n');
                segments.push(Segment::Code { lang, code });
                text_start = offset;
            }
        }
    }

    match open {
        Some((lang, code_start)) => {
            let code = content.get(code_start..).unwrap_or("").trim_end_matches('\n');
            segments.push(Segment::Code { lang, code });
        }
        None => push_text(&mut segments, &content[text_start..]),
    }
    segments
}

fn push_text<'a>(segments: &mut Vec<Segment<'a>>, text: &'a str) {
    if !text.trim().is_empty() {
        segments.push(Segment::Text(text));
    }
}
