//! App lookup by name over the public app list.
//!
//! An exact case-insensitive match wins. Otherwise the entry sharing the
//! largest fraction of word tokens with the query is chosen; ties go to the
//! shorter name, then the lower app id.

use std::collections::BTreeSet;

use crate::types::{AppListEntry, AppListResponse};

/// A resolved name with how well it matched.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    pub appid: u64,
    pub name: String,
    /// `1.0` for an exact match, otherwise the token overlap in `(0, 1)`.
    pub score: f64,
}

#[derive(Debug)]
struct IndexedApp {
    appid: u64,
    name: String,
    folded: String,
    tokens: BTreeSet<String>,
}

#[derive(Debug, Default)]
pub struct AppNameIndex {
    apps: Vec<IndexedApp>,
}

impl AppNameIndex {
    /// Indexes `entries`, skipping blank names.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = AppListEntry>) -> Self {
        let apps = entries
            .into_iter()
            .filter(|entry| !entry.name.trim().is_empty())
            .map(|entry| {
                let tokens = tokens(&entry.name);
                IndexedApp {
                    appid: entry.appid,
                    folded: tokens.iter().cloned().collect::<Vec<_>>().join(" "),
                    name: entry.name,
                    tokens,
                }
            })
            .collect();
        Self { apps }
    }

    #[must_use]
    pub fn from_response(response: AppListResponse) -> Self {
        Self::new(response.applist.apps)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Best match for `query`, or `None` when no entry shares a token with it.
    #[must_use]
    pub fn lookup(&self, query: &str) -> Option<NameMatch> {
        let wanted = query.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }

        if let Some(app) = self
            .apps
            .iter()
            .filter(|app| app.name.trim().to_lowercase() == wanted)
            .min_by_key(|app| app.appid)
        {
            return Some(app.to_match(1.0));
        }

        let query_tokens = tokens(query);
        self.apps
            .iter()
            .filter_map(|app| {
                let score = overlap(&query_tokens, &app.tokens);
                (score > 0.0).then_some((app, score))
            })
            .max_by(|(a, a_score), (b, b_score)| {
                a_score
                    .total_cmp(b_score)
                    .then_with(|| b.folded.len().cmp(&a.folded.len()))
                    .then_with(|| b.appid.cmp(&a.appid))
            })
            .map(|(app, score)| app.to_match(score))
    }
}

impl IndexedApp {
    fn to_match(&self, score: f64) -> NameMatch {
        NameMatch {
            appid: self.appid,
            name: self.name.clone(),
            score,
        }
    }
}

fn tokens(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Shared tokens over all distinct tokens of both names.
#[allow(clippy::cast_precision_loss)] // token counts are tiny
fn overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let shared = a.intersection(b).count();
    if shared == 0 {
        return 0.0;
    }
    let total = a.union(b).count();
    shared as f64 / total as f64
}
