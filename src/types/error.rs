//! Error type shared by the AMM and ladder engines.

use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a quote cannot be produced.
///
/// Every engine operation returns these as values; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    /// Input amount is zero or negative
    #[error("input amount must be greater than zero")]
    InvalidInput,

    /// Reserves or levels cannot satisfy the request
    ///
    /// `unfilled` is the part of the (fee-adjusted) budget left over after
    /// every level was consumed. It is zero for the AMM, where the pool
    /// would be drained outright.
    #[error("not enough liquidity for the requested amount ({unfilled} unfilled)")]
    InsufficientLiquidity { unfilled: Decimal },

    /// A pool reserve is zero, so no price exists in either direction
    #[error("pool has a zero reserve")]
    DegenerateState,

    /// The trade is too small to pay out a whole unit after rounding
    #[error("trade too small to produce any output")]
    OutputTooSmall,

    /// Fee rate above 10_000 bps
    #[error("fee rate of {0} bps exceeds 100%")]
    InvalidFee(u64),

    /// Arithmetic left the representable range
    #[error("arithmetic overflow while computing quote")]
    Overflow,
}

impl QuoteError {
    /// Shorthand for an AMM drain
    pub fn pool_drained() -> Self {
        QuoteError::InsufficientLiquidity { unfilled: Decimal::ZERO }
    }

    /// `true` for [`QuoteError::InsufficientLiquidity`]
    pub fn is_insufficient_liquidity(&self) -> bool {
        matches!(self, QuoteError::InsufficientLiquidity { .. })
    }
}
