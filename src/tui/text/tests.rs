use ratatui::style::{Modifier, Style};

use super::{Segment, render_line, split_segments, wrap_message};

fn contents(line: &str) -> Vec<String> {
    render_line(line, Style::default())
        .into_iter()
        .map(|s| s.content.into_owned())
        .collect()
}

#[test]
fn blank_content_has_no_segments() {
    assert!(split_segments("").is_empty());
    assert!(split_segments("  \n").is_empty());
}

#[test]
fn prose_and_code_alternate() {
    let segs = split_segments("Here is the fix:\n\n```rust\nlet x = 1;\n```\n\nDone.");
    assert_eq!(segs.len(), 3);
    assert!(matches!(&segs[0], Segment::Text(t) if t.contains("Here is the fix")));
    assert_eq!(
        segs[1],
        Segment::Code {
            lang: "rust",
            code: "let x = 1;"
        }
    );
    assert!(matches!(&segs[2], Segment::Text(t) if t.trim() == "Done."));
}

#[test]
fn back_to_back_blocks_skip_blank_gap() {
    let segs = split_segments("```a\n1\n```\n\n```\n2\n```");
    assert_eq!(
        segs,
        vec![
            Segment::Code { lang: "a", code: "1" },
            Segment::Code { lang: "", code: "2" },
        ]
    );
}

#[test]
fn unterminated_fence_runs_to_end() {
    let segs = split_segments("Streaming:\n```py\nprint(1)\n");
    assert_eq!(segs.len(), 2);
    assert_eq!(
        segs[1],
        Segment::Code {
            lang: "py",
            code: "print(1)"
        }
    );
}

#[test]
fn inline_fence_marker_is_prose() {
    let segs = split_segments("use ``` to open a block");
    assert_eq!(segs, vec![Segment::Text("use ``` to open a block")]);
}

#[test]
fn bold_italic_and_code() {
    let spans = render_line("**bold**, *soft* and `code`", Style::default());
    let text: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, vec!["bold", ", ", "soft", " and ", "code"]);
    assert!(spans[0].style.add_modifier.contains(Modifier::BOLD));
    assert!(spans[2].style.add_modifier.contains(Modifier::ITALIC));
    assert!(!spans[4].style.add_modifier.contains(Modifier::ITALIC));
}

#[test]
fn cancelled_notice_is_italic() {
    let spans = render_line("*[Request cancelled]*", Style::default());
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].content.as_ref(), "[Request cancelled]");
    assert!(spans[0].style.add_modifier.contains(Modifier::ITALIC));
}

#[test]
fn unmatched_or_spaced_stars_stay_literal() {
    assert_eq!(contents("2 * 3 * 4").concat(), "2 * 3 * 4");
    assert_eq!(contents("**open").concat(), "**open");
}

#[test]
fn headings_and_list_markers() {
    assert_eq!(contents("## Section"), vec!["Section"]);
    assert_eq!(contents("- item"), vec!["• ", "item"]);
    assert_eq!(contents("* item"), vec!["• ", "item"]);
    assert_eq!(contents("3) third"), vec!["3) ", "third"]);
    assert_eq!(contents("10. tenth"), vec!["10. ", "tenth"]);
}

#[test]
fn base_style_is_kept() {
    let base = Style::default().add_modifier(Modifier::DIM);
    let spans = render_line("plain **bold**", base);
    assert!(spans.iter().all(|s| s.style.add_modifier.contains(Modifier::DIM)));
}

#[test]
fn wrap_keeps_newlines_and_blank_lines() {
    assert_eq!(wrap_message("a\n\nb", 100), ["a", "", "b"]);
    assert_eq!(wrap_message("hello world test", 8), ["hello", "world", "test"]);
}

#[test]
fn wrap_breaks_long_words() {
    assert_eq!(wrap_message("abcdefgh", 3), ["abc", "def", "gh"]);
}
