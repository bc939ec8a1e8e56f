//! `normal` and `list` renderings of the store's markup text fields.

use crate::markup::{decode_entities, strip_tags};

const PARAGRAPH_BREAK: &str = "<br><br>";

/// Phrases the store appends to text fields that carry no content.
const BOILERPLATE: &[&str] = &["languages with full audio support"];

/// Paragraph breaks become newlines, tags and boilerplate are dropped and
/// entities decoded.
pub(crate) fn normalize_markup(text: &str) -> String {
    let text = text.replace(PARAGRAPH_BREAK, "\n");
    let mut text = decode_entities(&strip_tags(&text, &[]));
    for phrase in BOILERPLATE {
        text = text.replace(phrase, "");
    }
    text.trim().to_owned()
}

/// Language list text with the full-audio `*` markers removed.
pub(crate) fn normalize_languages(text: &str) -> String {
    normalize_markup(text).replace('*', "").trim().to_owned()
}

pub(crate) fn language_list(text: &str) -> Vec<String> {
    normalize_languages(text)
        .split(',')
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_owned)
        .collect()
}
