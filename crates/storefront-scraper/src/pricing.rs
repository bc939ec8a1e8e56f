//! Pre-discount price reconstruction for bundles.
//!
//! Bundle pages show the discounted price in minor units and the bundle
//! discount percentage, but not the original price. The original is rebuilt
//! as `ceil(final / (100 - discount)) * 100`, i.e. rounded up to whole
//! currency units.

use thiserror::Error;

/// Reconstructed price when no discounted price can be derived.
pub const NO_INITIAL_PRICE: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("discount of {0}% leaves no price to reconstruct from")]
    DiscountOutOfRange(i64),

    #[error("reconstructed price for final {final_minor_units} at {discount_percent}% overflows")]
    Overflow {
        final_minor_units: i64,
        discount_percent: i64,
    },
}

/// Rebuilds the pre-discount price in minor units.
///
/// Returns [`NO_INITIAL_PRICE`] when either input is missing or the discount
/// is zero: the store only advertises a bundle discount when it is positive,
/// and a missing discount gives nothing to reverse.
///
/// # Errors
///
/// - [`PriceError::DiscountOutOfRange`] when a final price is present and the
///   discount is negative or at least 100%.
/// - [`PriceError::Overflow`] when the result does not fit in `i64`.
pub fn reconcile(
    final_minor_units: Option<i64>,
    discount_percent: Option<i64>,
) -> Result<i64, PriceError> {
    let (Some(final_minor_units), Some(discount_percent)) = (final_minor_units, discount_percent)
    else {
        return Ok(NO_INITIAL_PRICE);
    };
    if discount_percent == 0 {
        return Ok(NO_INITIAL_PRICE);
    }
    if !(1..100).contains(&discount_percent) {
        return Err(PriceError::DiscountOutOfRange(discount_percent));
    }

    let remaining_percent = 100 - discount_percent;
    let whole_units = ceil_div(final_minor_units, remaining_percent);
    whole_units.checked_mul(100).ok_or(PriceError::Overflow {
        final_minor_units,
        discount_percent,
    })
}

/// Ceiling division for a positive divisor.
fn ceil_div(numerator: i64, divisor: i64) -> i64 {
    let quotient = numerator / divisor;
    if numerator % divisor > 0 {
        quotient + 1
    } else {
        quotient
    }
}
