use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sales_dashboard::{wrap_label, DEFAULT_LINE_BREAK};

#[test]
fn wraps_greedily_at_the_width() {
    let wrapped = wrap_label("Premium Widget Deluxe Edition", 12, DEFAULT_LINE_BREAK);
    assert_eq!(wrapped, "Premium<br>Widget<br>Deluxe<br>Edition");
    assert!(wrapped
        .split(DEFAULT_LINE_BREAK)
        .all(|line| line.chars().count() <= 12));
}

#[test]
fn packs_words_while_they_fit() {
    assert_eq!(
        wrap_label("Avery Durable Slant Ring Binders", 14, DEFAULT_LINE_BREAK),
        "Avery Durable<br>Slant Ring<br>Binders"
    );
}

#[test]
fn overlong_words_get_their_own_line() {
    assert_eq!(
        wrap_label("GBC Ibimaster 500 Manual ProClick Binding System", 8, "\n"),
        "GBC\nIbimaster\n500\nManual\nProClick\nBinding\nSystem"
    );
}

#[test]
fn counts_characters_not_bytes() {
    assert_eq!(wrap_label("Café Crème Café", 10, "|"), "Café Crème|Café");
}

#[test]
fn empty_input_gives_empty_output() {
    assert_eq!(wrap_label("", 12, DEFAULT_LINE_BREAK), "");
    assert_eq!(wrap_label("   \t ", 12, DEFAULT_LINE_BREAK), "");
}

proptest! {
    #[test]
    fn lines_fit_unless_a_single_word_is_wider(
        words in prop::collection::vec("[a-zA-Z]{1,15}", 0..12),
        width in 1usize..30,
    ) {
        let text = words.join(" ");
        let wrapped = wrap_label(&text, width, "|");
        if words.is_empty() {
            prop_assert_eq!(wrapped, "");
        } else {
            for line in wrapped.split('|') {
                prop_assert!(!line.is_empty());
                prop_assert!(line.len() <= width || !line.contains(' '));
            }
            let rejoined: Vec<&str> = wrapped.split(['|', ' ']).collect();
            prop_assert_eq!(rejoined, words.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}
