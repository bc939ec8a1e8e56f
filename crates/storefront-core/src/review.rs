use serde::{Deserialize, Serialize};

/// One press quote from a title's `reviews` blurb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
    /// Quoted review text.
    pub text: String,
    /// Score as printed by the outlet, e.g. `"9/10"` or `"90"`.
    pub score_token: String,
    /// Outbound review link with the community redirect wrapper removed.
    pub link: String,
    /// Outlet or reviewer name.
    pub reviewer: String,
}

/// Confidence-adjusted user rating, alongside the totals it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Raw share of positive reviews, `0..=100`.
    pub score_percent: f64,
    /// Score shrunk toward 50 for small review counts, `0..=100`.
    pub rating_percent: f64,
    pub total_positive: i64,
    pub total_reviews: i64,
}

impl Rating {
    /// A rating with no computed score, carrying the raw totals.
    #[must_use]
    pub fn unrated(total_positive: i64, total_reviews: i64) -> Self {
        Self {
            score_percent: 0.0,
            rating_percent: 0.0,
            total_positive,
            total_reviews,
        }
    }
}
