//! Word wrapping for message bubbles.

/// Wrap `text` to `width` columns.
///
/// Explicit newlines are kept as line breaks. An empty input yields a
/// single empty line so a bubble never collapses to zero height.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(
            textwrap::wrap(paragraph, width)
                .into_iter()
                .map(std::borrow::Cow::into_owned),
        );
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
