//! Sentinel-delimited scanning over marker-heavy text runs.
//!
//! Store payloads embed structure as fixed marker strings (`<br>`,
//! `<strong>`, `Genre:`) rather than well-formed markup. Everything in this
//! module is a bounded forward scan: a missing sentinel ends the scan instead
//! of producing an out-of-range slice, and every step consumes input, so no
//! iterator here can loop forever.

use std::iter::FusedIterator;

/// One chunk of text and whatever follows its closing sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Text before the sentinel (or the whole remainder for the last chunk).
    pub content: &'a str,
    /// Unconsumed input after the sentinel. Empty for the last chunk.
    pub rest: &'a str,
}

/// Iterator over the chunks of `text` separated by `sentinel`.
///
/// Yields one [`Segment`] per sentinel occurrence plus a final segment for the
/// remainder, so input without the sentinel yields exactly one segment equal
/// to the whole input.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    remaining: Option<&'a str>,
    sentinel: &'a str,
}

/// Scans `text` into segments bounded by `sentinel`.
#[must_use]
pub fn segments<'a>(text: &'a str, sentinel: &'a str) -> Segments<'a> {
    Segments {
        remaining: Some(text),
        sentinel,
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.remaining.take()?;

        // An empty sentinel would match without consuming anything.
        if self.sentinel.is_empty() {
            return Some(Segment {
                content: text,
                rest: "",
            });
        }

        match text.find(self.sentinel) {
            Some(pos) => {
                let rest = &text[pos + self.sentinel.len()..];
                self.remaining = Some(rest);
                Some(Segment {
                    content: &text[..pos],
                    rest,
                })
            }
            None => Some(Segment {
                content: text,
                rest: "",
            }),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining {
            Some(text) => (1, Some(text.len() + 1)),
            None => (0, Some(0)),
        }
    }
}

impl FusedIterator for Segments<'_> {}

/// Splits at the first `sentinel`, returning the text before it and the text
/// after it. Without a sentinel the whole input is `before` and `after` is `None`.
#[must_use]
pub fn split_at_sentinel<'a>(text: &'a str, sentinel: &str) -> (&'a str, Option<&'a str>) {
    if sentinel.is_empty() {
        return (text, None);
    }
    match text.find(sentinel) {
        Some(pos) => (&text[..pos], Some(&text[pos + sentinel.len()..])),
        None => (text, None),
    }
}

/// Text before the first `sentinel`, or all of `text` when it is absent.
#[must_use]
pub fn take_until<'a>(text: &'a str, sentinel: &str) -> &'a str {
    split_at_sentinel(text, sentinel).0
}

/// Text after the first `sentinel`, or `None` when it is absent.
#[must_use]
pub fn after<'a>(text: &'a str, sentinel: &str) -> Option<&'a str> {
    split_at_sentinel(text, sentinel).1
}

/// Text strictly between the first `open` and the next `close` after it.
#[must_use]
pub fn between<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let tail = after(text, open)?;
    let (inner, found) = split_at_sentinel(tail, close);
    found.map(|_| inner)
}
