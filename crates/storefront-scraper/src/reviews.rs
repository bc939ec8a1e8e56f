//! Press-review blurbs from a title's `reviews` field.
//!
//! The store concatenates quotes as
//! `“quote”<br>9/10 – <a href="WRAPPED_LINK" ...>Outlet</a><br><br>“next quote”...`,
//! so entries are split on the blank line and each entry on its first line
//! break.

use storefront_core::config::DEFAULT_COMMUNITY_LINK_PREFIX;
use storefront_core::ReviewEntry;

use crate::markup::{clean_text, first_tag, strip_tags};
use crate::segment::{segments, split_at_sentinel, take_until};

const ENTRY_SEPARATOR: &str = "<br><br>";
const FIELD_SEPARATOR: &str = "<br>";

/// Parses every review in `blob` using the default redirect prefix.
#[must_use]
pub fn parse_reviews(blob: &str) -> Vec<ReviewEntry> {
    parse_reviews_with_prefix(blob, DEFAULT_COMMUNITY_LINK_PREFIX)
}

/// Parses every review in `blob`, stripping `link_prefix` from links.
///
/// Blank input gives an empty list. An entry missing one of its delimiters
/// keeps whatever fields could be read and leaves the rest empty.
#[must_use]
pub fn parse_reviews_with_prefix(blob: &str, link_prefix: &str) -> Vec<ReviewEntry> {
    segments(blob, ENTRY_SEPARATOR)
        .map(|segment| segment.content.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| parse_entry(entry, link_prefix))
        .collect()
}

fn parse_entry(entry: &str, link_prefix: &str) -> ReviewEntry {
    let (text, attribution) = split_at_sentinel(entry, FIELD_SEPARATOR);
    let attribution = attribution.unwrap_or_default().trim_start();

    let score_token = take_until(attribution, " ");
    let score_token = if score_token.starts_with('<') {
        ""
    } else {
        score_token
    };

    let (link, reviewer) = match first_tag(attribution, "a") {
        Some(anchor) => {
            let href = anchor.attr("href").unwrap_or_default();
            let link = href
                .strip_prefix(link_prefix)
                .map_or_else(|| href.clone(), str::to_owned);
            (link, anchor.text())
        }
        None => (String::new(), unlinked_reviewer(attribution, score_token)),
    };

    ReviewEntry {
        text: text.trim().to_owned(),
        score_token: score_token.to_owned(),
        link,
        reviewer,
    }
}

/// Outlet name when the attribution carries no anchor: the text after the
/// score and its dash.
fn unlinked_reviewer(attribution: &str, score_token: &str) -> String {
    let tail = attribution.strip_prefix(score_token).unwrap_or(attribution);
    let tail = clean_text(&strip_tags(tail, &[]));
    tail.trim_start_matches(['-', '–', '—', ' ']).to_owned()
}
