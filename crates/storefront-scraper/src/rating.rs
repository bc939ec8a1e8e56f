//! Confidence-adjusted user rating.
//!
//! `rating = score - (score - 0.5) * 2^(-log10(total + 1))`: the raw positive
//! share is pulled toward 50% and the pull fades as the review count grows.

use serde_json::Value;
use storefront_core::Rating;

/// Computes the rating for the given totals.
///
/// A review count of zero or less, or any non-finite intermediate, yields an
/// unrated result with the totals kept. Positive counts outside
/// `0..=total_reviews` are scored as given.
#[must_use]
pub fn rate(total_positive: i64, total_reviews: i64) -> Rating {
    match shrunk_score(total_positive, total_reviews) {
        Some((score, rating)) => Rating {
            score_percent: score * 100.0,
            rating_percent: rating * 100.0,
            total_positive,
            total_reviews,
        },
        None => Rating::unrated(total_positive, total_reviews),
    }
}

#[allow(clippy::cast_precision_loss)] // review counts are far below 2^52
fn shrunk_score(total_positive: i64, total_reviews: i64) -> Option<(f64, f64)> {
    if total_reviews <= 0 {
        return None;
    }
    let score = total_positive as f64 / total_reviews as f64;
    let weight = 2f64.powf(-((total_reviews as f64) + 1.0).log10());
    let rating = score - (score - 0.5) * weight;
    (score.is_finite() && rating.is_finite()).then_some((score, rating))
}

/// Rating from a review-summary response plus the raw `query_summary`.
///
/// An absent, null or empty summary yields an unrated result.
#[must_use]
pub fn rate_summary(response: &Value) -> (Rating, Value) {
    let summary = response.get("query_summary").cloned().unwrap_or(Value::Null);
    let is_empty = match &summary {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if is_empty {
        return (Rating::unrated(0, 0), summary);
    }

    let total = |key: &str| summary.get(key).and_then(Value::as_i64);
    let rating = match (total("total_positive"), total("total_reviews")) {
        (Some(positive), Some(reviews)) => rate(positive, reviews),
        _ => {
            tracing::debug!("review summary lacks totals; leaving unrated");
            Rating::unrated(0, 0)
        }
    };
    (rating, summary)
}
