//! Line wrapping for display.

/// Wrap each line of `msg` to `width` columns, keeping blank lines.
pub(crate) fn wrap_message(msg: &str, width: usize) -> Vec<String> {
    let options = textwrap::Options::new(width.max(1)).break_words(true);
    msg.split('\n')
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, &options)
                    .into_iter()
                    .map(|cow| cow.into_owned())
                    .collect()
            }
        })
        .collect()
}
