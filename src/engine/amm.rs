//! Constant-product (x * y = k) quote engine.
//!
//! ## Quote Steps
//!
//! 1. Take the fee from the input: `net = amount - floor(amount * fee / 10_000)`
//! 2. `reserve_in' = reserve_in + net`, `reserve_out' = floor(k / reserve_in')`
//! 3. Pay out `reserve_out - reserve_out' - 1`
//! 4. Price impact = relative move of `reserve_in / reserve_out`, in bps
//!
//! The `- 1` keeps `reserve_in' * reserve_out' <= k` under integer truncation.
//! Every failure leaves the reserves untouched.

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::engine::QuoteProvider;
use crate::pool::ReservePair;
use crate::types::amount::{amount_after_fee, relative_change_bps, whole_bps, MAX_FEE_BPS};
use crate::types::{Direction, Quote, QuoteError};

/// Default pool fee: 50 bps (0.5%)
pub const DEFAULT_AMM_FEE_BPS: u64 = 50;

/// Constant-product pool that quotes swaps and applies them to its reserves.
///
/// ## Example
///
/// ```
/// use dark_quoter::engine::AmmEngine;
/// use dark_quoter::types::Direction;
///
/// let mut amm = AmmEngine::new(1_000, 20_000);
/// let quote = amm.quote(10, Direction::AToB).unwrap();
///
/// assert_eq!(quote.out_amount, 198);
/// assert_eq!(amm.reserves().reserve_a, 1_010);
/// assert_eq!(amm.reserves().reserve_b, 19_801);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmmEngine {
    reserves: ReservePair,
    fee_bps: u64,
}

impl AmmEngine {
    /// Create a pool with the default 50 bp fee
    ///
    /// # Arguments
    ///
    /// * `reserve_a` - Base-token reserve
    /// * `reserve_b` - Quote-token reserve
    pub fn new(reserve_a: u64, reserve_b: u64) -> Self {
        Self {
            reserves: ReservePair::new(reserve_a, reserve_b),
            fee_bps: DEFAULT_AMM_FEE_BPS,
        }
    }

    /// Create a pool with an explicit fee rate
    ///
    /// # Errors
    ///
    /// [`QuoteError::InvalidFee`] if `fee_bps` exceeds 10_000.
    pub fn with_fee_bps(reserve_a: u64, reserve_b: u64, fee_bps: u64) -> Result<Self, QuoteError> {
        if fee_bps > MAX_FEE_BPS {
            return Err(QuoteError::InvalidFee(fee_bps));
        }
        Ok(Self {
            reserves: ReservePair::new(reserve_a, reserve_b),
            fee_bps,
        })
    }

    /// Current reserves
    #[inline]
    pub fn reserves(&self) -> &ReservePair {
        &self.reserves
    }

    /// Fee rate in basis points
    #[inline]
    pub fn fee_bps(&self) -> u64 {
        self.fee_bps
    }

    /// Constant product of the current reserves
    #[inline]
    pub fn invariant(&self) -> u128 {
        self.reserves.invariant()
    }

    /// Pool price in the trade direction (input reserve / output reserve)
    pub fn spot_price(&self, direction: Direction) -> Option<Decimal> {
        self.reserves.price(direction)
    }

    /// Compute a quote and the reserves it would leave, without applying it
    ///
    /// # Errors
    ///
    /// * [`QuoteError::InvalidInput`] - `amount` is zero
    /// * [`QuoteError::DegenerateState`] - a reserve is already zero
    /// * [`QuoteError::InsufficientLiquidity`] - the output reserve would hit zero
    /// * [`QuoteError::OutputTooSmall`] - nothing left to pay after rounding
    /// * [`QuoteError::Overflow`] - the input reserve would exceed `u64`
    pub fn simulate(&self, amount: u64, direction: Direction) -> Result<(Quote, ReservePair), QuoteError> {
        if amount == 0 {
            return Err(QuoteError::InvalidInput);
        }
        if self.reserves.is_degenerate() {
            return Err(QuoteError::DegenerateState);
        }

        let (reserve_in, reserve_out) = self.reserves.split(direction);
        let k = self.reserves.invariant();

        let net_in = amount_after_fee(amount, self.fee_bps);
        let new_in = reserve_in.checked_add(net_in).ok_or(QuoteError::Overflow)?;

        // new_in >= reserve_in, so new_out <= reserve_out
        let new_out = (k / new_in as u128) as u64;
        if new_out == 0 {
            return Err(QuoteError::pool_drained());
        }

        let out_amount = (reserve_out - new_out)
            .checked_sub(1)
            .filter(|out| *out > 0)
            .ok_or(QuoteError::OutputTooSmall)?;

        let next = ReservePair::from_split(direction, new_in, new_out);

        let before = self.reserves.price(direction).ok_or(QuoteError::DegenerateState)?;
        let after = next.price(direction).ok_or(QuoteError::DegenerateState)?;
        // Saturates for moves beyond Decimal range
        let impact = relative_change_bps(before, after).map_or(u32::MAX, whole_bps);

        Ok((Quote::new(direction, amount, out_amount, impact), next))
    }

    /// Compute a quote and apply it to the reserves
    ///
    /// On error the reserves are unchanged.
    pub fn quote(&mut self, amount: u64, direction: Direction) -> Result<Quote, QuoteError> {
        match self.simulate(amount, direction) {
            Ok((quote, next)) => {
                debug!(
                    "amm quote {:?}: in={} out={} impact={}bp reserves=({}, {})",
                    direction, amount, quote.out_amount, quote.price_impact_bps, next.reserve_a, next.reserve_b
                );
                self.reserves = next;
                Ok(quote)
            }
            Err(err) => {
                warn!("amm quote {:?} for {} rejected: {}", direction, amount, err);
                Err(err)
            }
        }
    }
}

impl QuoteProvider for AmmEngine {
    type Amount = u64;
    type Quote = Quote;

    fn quote(&mut self, amount: u64, direction: Direction) -> Result<Quote, QuoteError> {
        AmmEngine::quote(self, amount, direction)
    }

    fn preview(&self, amount: u64, direction: Direction) -> Result<Quote, QuoteError> {
        self.simulate(amount, direction).map(|(quote, _)| quote)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amm_new_defaults() {
        let amm = AmmEngine::new(1_000, 20_000);

        assert_eq!(amm.fee_bps(), DEFAULT_AMM_FEE_BPS);
        assert_eq!(amm.invariant(), 20_000_000);
        assert_eq!(amm.reserves(), &ReservePair::new(1_000, 20_000));
    }

    #[test]
    fn test_amm_rejects_fee_above_100_percent() {
        assert_eq!(AmmEngine::with_fee_bps(1, 1, 10_001), Err(QuoteError::InvalidFee(10_001)));
        assert!(AmmEngine::with_fee_bps(1, 1, 10_000).is_ok());
    }

    #[test]
    fn test_amm_quote_a_to_b() {
        let mut amm = AmmEngine::new(1_000, 20_000);

        // fee = floor(10 * 50 / 10_000) = 0
        // new_a = 1_010, new_b = floor(20_000_000 / 1_010) = 19_801
        // out = 20_000 - 19_801 - 1 = 198
        let quote = amm.quote(10, Direction::AToB).unwrap();

        assert_eq!(quote.in_amount, 10);
        assert_eq!(quote.out_amount, 198);
        // 0.05 -> 1010/19801 is a 2.01% move
        assert_eq!(quote.price_impact_bps, 201);
        assert_eq!(amm.reserves(), &ReservePair::new(1_010, 19_801));
    }

    #[test]
    fn test_amm_quote_b_to_a_after_a_to_b() {
        let mut amm = AmmEngine::new(1_000, 20_000);
        amm.quote(10, Direction::AToB).unwrap();

        // fee = floor(500 * 50 / 10_000) = 2, net = 498
        // new_b = 20_299, new_a = floor(1_010 * 19_801 / 20_299) = 985
        // out = 1_010 - 985 - 1 = 24
        let quote = amm.quote(500, Direction::BToA).unwrap();

        assert_eq!(quote.out_amount, 24);
        assert_eq!(amm.reserves(), &ReservePair::new(985, 20_299));
        assert!(quote.price_impact_bps > 0);
    }

    #[test]
    fn test_amm_zero_amount_is_invalid() {
        let mut amm = AmmEngine::new(1_000, 20_000);

        assert_eq!(amm.quote(0, Direction::AToB), Err(QuoteError::InvalidInput));
        assert_eq!(amm.quote(0, Direction::BToA), Err(QuoteError::InvalidInput));
        assert_eq!(amm.reserves(), &ReservePair::new(1_000, 20_000));
    }

    #[test]
    fn test_amm_zero_reserve_is_degenerate() {
        let mut amm = AmmEngine::new(0, 20_000);

        assert_eq!(amm.quote(10, Direction::AToB), Err(QuoteError::DegenerateState));
        assert_eq!(amm.reserves(), &ReservePair::new(0, 20_000));
    }

    #[test]
    fn test_amm_drain_is_insufficient_liquidity() {
        // k = 2; any net input of 2+ pushes new_out to zero
        let mut amm = AmmEngine::with_fee_bps(1, 2, 0).unwrap();

        let err = amm.quote(5, Direction::AToB).unwrap_err();
        assert!(err.is_insufficient_liquidity());
        assert_eq!(amm.reserves(), &ReservePair::new(1, 2));
    }

    #[test]
    fn test_amm_dust_trade_is_too_small() {
        // 1 unit of B into (1000, 20000): new_a = floor(20_000_000 / 20_001) = 999
        // out = 1000 - 999 - 1 = 0
        let mut amm = AmmEngine::new(1_000, 20_000);

        assert_eq!(amm.quote(1, Direction::BToA), Err(QuoteError::OutputTooSmall));
        assert_eq!(amm.reserves(), &ReservePair::new(1_000, 20_000));
    }

    #[test]
    fn test_amm_full_fee_produces_nothing() {
        let mut amm = AmmEngine::with_fee_bps(1_000, 20_000, 10_000).unwrap();
        assert_eq!(amm.quote(100, Direction::AToB), Err(QuoteError::OutputTooSmall));
    }

    #[test]
    fn test_amm_overflowing_reserve() {
        let mut amm = AmmEngine::with_fee_bps(u64::MAX - 1, 10, 0).unwrap();
        assert_eq!(amm.quote(5, Direction::AToB), Err(QuoteError::Overflow));
    }

    #[test]
    fn test_amm_simulate_does_not_mutate() {
        let amm = AmmEngine::new(1_000, 20_000);
        let (quote, next) = amm.simulate(10, Direction::AToB).unwrap();

        assert_eq!(quote.out_amount, 198);
        assert_eq!(next, ReservePair::new(1_010, 19_801));
        assert_eq!(amm.reserves(), &ReservePair::new(1_000, 20_000));
    }

    #[test]
    fn test_amm_invariant_never_grows() {
        let mut amm = AmmEngine::new(1_000_000, 50_000_000);
        let k = amm.invariant();

        amm.quote(12_345, Direction::AToB).unwrap();
        assert!(amm.invariant() <= k);
    }

    #[test]
    fn test_amm_spot_price() {
        let amm = AmmEngine::new(1_000, 20_000);
        assert_eq!(amm.spot_price(Direction::BToA), Some(Decimal::from(20)));
    }

    #[test]
    fn test_amm_provider_preview_matches_quote() {
        let mut amm = AmmEngine::new(1_000, 20_000);
        let previewed = QuoteProvider::preview(&amm, 10, Direction::AToB).unwrap();
        let quoted = QuoteProvider::quote(&mut amm, 10, Direction::AToB).unwrap();
        assert_eq!(previewed, quoted);
    }
}
