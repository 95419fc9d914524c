//! Amount, fee and basis-point utilities shared by both quote engines.
//!
//! ## Overview
//!
//! The AMM works on integral token units (`u64`) and takes its fee as a
//! truncated integer deduction. The ladder works on `Decimal` amounts and
//! deflates its budget by `1 + fee`. Prices and price impact are always
//! computed with `rust_decimal` so results are identical on every machine.
//!
//! ## Examples
//!
//! ```
//! use dark_quoter::types::amount::{fee_on, amount_after_fee};
//!
//! // 50 bp of 10_000 units
//! assert_eq!(fee_on(10_000, 50), 50);
//! assert_eq!(amount_after_fee(10_000, 50), 9_950);
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Basis points in one whole: 10^4
pub const BPS_SCALE: u64 = 10_000;

/// Highest fee rate an engine accepts (100%)
pub const MAX_FEE_BPS: u64 = BPS_SCALE;

// ============================================================================
// Integral fee math (AMM)
// ============================================================================

/// Fee charged on `amount` at `fee_bps`, truncated to whole units
///
/// Computed in `u128` so `amount * fee_bps` cannot overflow. For
/// `fee_bps <= MAX_FEE_BPS` the result never exceeds `amount`.
///
/// # Example
///
/// ```
/// use dark_quoter::types::amount::fee_on;
///
/// assert_eq!(fee_on(10, 50), 0);      // 0.05 truncates to 0
/// assert_eq!(fee_on(1_000, 50), 5);
/// ```
pub fn fee_on(amount: u64, fee_bps: u64) -> u64 {
    let fee = (amount as u128 * fee_bps as u128) / BPS_SCALE as u128;
    fee.min(amount as u128) as u64
}

/// Input left after the fee is taken from it
pub fn amount_after_fee(amount: u64, fee_bps: u64) -> u64 {
    amount.saturating_sub(fee_on(amount, fee_bps))
}

// ============================================================================
// Decimal fee math (ladder)
// ============================================================================

/// Deflate `amount` by a taker fee: `amount / (1 + fee_bps / 10_000)`
///
/// # Returns
///
/// * `Some(Decimal)` - The budget left for matching
/// * `None` - If the arithmetic overflows
///
/// # Example
///
/// ```
/// use dark_quoter::types::amount::deflate_by_fee;
/// use rust_decimal::Decimal;
///
/// let budget = deflate_by_fee(Decimal::from(10_010), 10).unwrap();
/// assert_eq!(budget, Decimal::from(10_000));
/// ```
pub fn deflate_by_fee(amount: Decimal, fee_bps: u64) -> Option<Decimal> {
    let rate = Decimal::from(fee_bps).checked_div(Decimal::from(BPS_SCALE))?;
    let divisor = Decimal::ONE.checked_add(rate)?;
    amount.checked_div(divisor)
}

// ============================================================================
// Ratios and basis points
// ============================================================================

/// `numerator / denominator` as a Decimal
///
/// Returns `None` when the denominator is zero.
pub fn ratio(numerator: u64, denominator: u64) -> Option<Decimal> {
    Decimal::from(numerator).checked_div(Decimal::from(denominator))
}

/// Absolute relative change from `before` to `after`, in basis points
///
/// # Returns
///
/// * `Some(Decimal)` - `|after - before| / before * 10_000`
/// * `None` - If `before` is zero or the arithmetic overflows
///
/// # Example
///
/// ```
/// use dark_quoter::types::amount::relative_change_bps;
/// use rust_decimal::Decimal;
///
/// let bps = relative_change_bps(Decimal::from(100), Decimal::from(101)).unwrap();
/// assert_eq!(bps, Decimal::from(100));
/// ```
pub fn relative_change_bps(before: Decimal, after: Decimal) -> Option<Decimal> {
    let delta = after.checked_sub(before)?.abs();
    let fraction = delta.checked_div(before)?;
    fraction.checked_mul(Decimal::from(BPS_SCALE))
}

/// Truncate a basis-point value to whole bps, saturating at `u32::MAX`
pub fn whole_bps(bps: Decimal) -> u32 {
    bps.trunc().to_u32().unwrap_or(u32::MAX)
}

// ============================================================================
// Comparison
// ============================================================================

/// `true` if |a - b| <= tolerance
pub fn approx_eq(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() <= tolerance
}

// ============================================================================
// Unit Tests
// ============================================================================
