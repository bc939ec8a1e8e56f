//! Minimal tag scanning for store page fragments.
//!
//! This is not an HTML parser. It recognizes opening/closing tags with a
//! regex, pairs an element with its closing tag by counting same-name nesting,
//! and reads attributes from the opening tag. That is enough for the store's
//! class-marked tiles and blocks; anything it cannot pair is treated as
//! running to the end of the input.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<(/?)([A-Za-z][A-Za-z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
        .expect("valid tag regex")
});
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("valid attribute regex")
});
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// An element located in a fragment: its raw attribute text and inner
/// markup.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Element<'a> {
    attrs: &'a str,
    inner: &'a str,
}

impl<'a> Element<'a> {
    fn build(html: &'a str, name: &'a str, attrs: &'a str, open_end: usize) -> Self {
        let self_closing = attrs.trim_end().ends_with('/')
            || VOID_ELEMENTS
                .iter()
                .any(|void| void.eq_ignore_ascii_case(name));

        let body = &html[open_end..];
        let inner = if self_closing {
            ""
        } else {
            match closing_offset(body, name) {
                Some(end) => &body[..end],
                None => body,
            }
        };

        Self { attrs, inner }
    }

    /// Inner markup between the opening and closing tag.
    pub(crate) fn inner(&self) -> &'a str {
        self.inner
    }

    /// Attribute value with entities decoded. Valueless attributes yield `""`.
    pub(crate) fn attr(&self, name: &str) -> Option<String> {
        ATTR_RE.captures_iter(self.attrs).find_map(|caps| {
            let key = caps.get(1)?.as_str();
            if !key.eq_ignore_ascii_case(name) {
                return None;
            }
            let raw = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            Some(decode_entities(raw))
        })
    }

    pub(crate) fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Rendered text: tags removed, entities decoded, whitespace collapsed.
    pub(crate) fn text(&self) -> String {
        clean_text(&strip_tags(self.inner, &[]))
    }

    pub(crate) fn first_with_class(&self, class: &str) -> Option<Element<'a>> {
        first_with_class(self.inner, class)
    }

    pub(crate) fn contains_class(&self, class: &str) -> bool {
        self.first_with_class(class).is_some()
    }

    pub(crate) fn first_tag(&self, tag: &str) -> Option<Element<'a>> {
        first_tag(self.inner, tag)
    }
}

#[derive(Debug, Clone, Copy)]
enum Selector<'s> {
    Class(&'s str),
    Tag(&'s str),
}

/// Document-order iterator over elements matching a selector, nested
/// matches included.
pub(crate) struct Elements<'a, 's> {
    html: &'a str,
    pos: usize,
    selector: Selector<'s>,
}

impl<'a> Iterator for Elements<'a, '_> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let html = self.html;
        while self.pos < html.len() {
            let caps = TAG_RE.captures(&html[self.pos..])?;
            let whole = caps.get(0)?;
            let open_end = self.pos + whole.end();
            // Always advance past this tag so the scan makes progress.
            self.pos = open_end;

            if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
                continue;
            }
            let name = caps.get(2).map_or("", |m| m.as_str());
            let attrs = caps.get(3).map_or("", |m| m.as_str());
            let element = Element::build(html, name, attrs, open_end);

            let matched = match self.selector {
                Selector::Class(class) => element.has_class(class),
                Selector::Tag(tag) => name.eq_ignore_ascii_case(tag),
            };
            if matched {
                return Some(element);
            }
        }
        None
    }
}

pub(crate) fn elements_with_class<'a, 's>(html: &'a str, class: &'s str) -> Elements<'a, 's> {
    Elements {
        html,
        pos: 0,
        selector: Selector::Class(class),
    }
}

pub(crate) fn first_with_class<'a>(html: &'a str, class: &str) -> Option<Element<'a>> {
    elements_with_class(html, class).next()
}

pub(crate) fn first_tag<'a>(html: &'a str, tag: &str) -> Option<Element<'a>> {
    Elements {
        html,
        pos: 0,
        selector: Selector::Tag(tag),
    }
    .next()
}

/// Byte offset in `body` where the closing tag for an already-opened `name`
/// element starts, honoring same-name nesting.
fn closing_offset(body: &str, name: &str) -> Option<usize> {
    let mut depth = 1usize;
    for caps in TAG_RE.captures_iter(body) {
        let whole = caps.get(0)?;
        let tag_name = caps.get(2).map_or("", |m| m.as_str());
        if !tag_name.eq_ignore_ascii_case(name) {
            continue;
        }
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        if closing {
            depth -= 1;
            if depth == 0 {
                return Some(whole.start());
            }
        } else {
            let attrs = caps.get(3).map_or("", |m| m.as_str());
            if !attrs.trim_end().ends_with('/') {
                depth += 1;
            }
        }
    }
    None
}

/// Removes markup tags and comments. Tags named in `keep` survive in
/// canonical form (`<strong>`, `</strong>`) with their attributes dropped.
pub(crate) fn strip_tags(text: &str, keep: &[&str]) -> String {
    let without_comments = COMMENT_RE.replace_all(text, "");
    TAG_RE
        .replace_all(&without_comments, |caps: &regex::Captures<'_>| {
            let name = caps.get(2).map_or("", |m| m.as_str());
            if keep.iter().any(|k| k.eq_ignore_ascii_case(name)) {
                let slash = caps.get(1).map_or("", |m| m.as_str());
                format!("<{slash}{}>", name.to_ascii_lowercase())
            } else {
                String::new()
            }
        })
        .into_owned()
}

pub(crate) fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Decodes entities, collapses whitespace runs to one space and trims.
pub(crate) fn clean_text(text: &str) -> String {
    decode_entities(text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses the first run of ASCII digits in `text`, e.g. `"-75%"` → `75`.
pub(crate) fn first_integer(text: &str) -> Option<i64> {
    let bytes = text.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;
    let len = bytes[start..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    text[start..start + len].parse::<i64>().ok()
}

/// Leading ASCII digits of `text`, e.g. `"2&snr=1_4"` → `"2"`.
pub(crate) fn leading_digits(text: &str) -> &str {
    let len = text.bytes().take_while(u8::is_ascii_digit).count();
    &text[..len]
}
