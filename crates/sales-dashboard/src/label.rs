/// Line-break marker understood by the chart renderer.
pub const DEFAULT_LINE_BREAK: &str = "<br>";

/// Greedy word wrap for axis labels.
///
/// Words are separated by any whitespace and widths are counted in characters. A word that is
/// wider than `max_width` on its own gets a line to itself and is never split. Empty or
/// whitespace-only input yields an empty string.
pub fn wrap_label(text: &str, max_width: usize, line_break: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + 1 + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join(line_break)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_labels_are_untouched() {
        assert_eq!(wrap_label("Stapler", 20, DEFAULT_LINE_BREAK), "Stapler");
        assert_eq!(wrap_label("  Easy   Staple  ", 20, "\n"), "Easy Staple");
    }

    #[test]
    fn overlong_first_word_does_not_emit_an_empty_line() {
        assert_eq!(
            wrap_label("Hypercardioid microphone", 6, "|"),
            "Hypercardioid|microphone"
        );
    }
}
