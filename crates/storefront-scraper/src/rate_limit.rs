//! Retry with exponential backoff and jitter for store requests.
//!
//! The store throttles bursts with HTTP 429 and occasionally drops
//! connections or answers 5xx. Those are retried; everything else (404,
//! other 4xx, malformed bodies, identifier mismatches) is returned
//! immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

const MAX_DELAY_SECS: u64 = 60;

/// Returns `true` for errors worth retrying after a backoff delay.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Executes `operation`, retrying transient errors up to `max_retries` extra
/// times.
///
/// # Backoff schedule (example with `backoff_base_secs = 2`)
///
/// | Retry | Sleep before it         |
/// |-------|-------------------------|
/// | 1     | 2 s × 2⁰ ± 25 % jitter  |
/// | 2     | 2 s × 2¹ ± 25 % jitter  |
/// | 3     | 2 s × 2² ± 25 % jitter  |
///
/// A rate-limit response's `Retry-After` raises the delay when it is longer.
/// Delays are capped at 60 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay = backoff_delay(backoff_base_secs, attempt, &err);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient store error, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

fn backoff_delay(backoff_base_secs: u64, attempt: u32, err: &ScraperError) -> Duration {
    let computed = backoff_base_secs.saturating_mul(1u64 << (attempt - 1).min(10));
    let requested = match err {
        // Only honor the server's hint when backoff is enabled at all.
        ScraperError::RateLimited {
            retry_after_secs, ..
        } if backoff_base_secs > 0 => *retry_after_secs,
        _ => 0,
    };
    let capped = computed.max(requested).min(MAX_DELAY_SECS);
    #[allow(clippy::cast_precision_loss)]
    let millis = (capped * 1000) as f64 * (rand::random::<f64>() * 0.5 + 0.75);
    Duration::from_secs_f64(millis / 1000.0)
}
