//! Ladder quote engine: greedy walk over resting levels.
//!
//! ## Walk Rules
//!
//! - **AToB** spends a quote budget against asks (lowest price first) and
//!   accumulates base units
//! - **BToA** sells a base budget into bids (highest price first) and
//!   accumulates quote units
//! - The taker fee is applied once, up front: `budget = amount / (1 + fee)`
//! - A level that covers the remaining budget is consumed proportionally and
//!   the walk stops; otherwise it is drained and the walk moves on
//!
//! ## Failure Semantics
//!
//! When the budget outlives the side, the walk has already drained every
//! level it visited. [`FailurePolicy`] decides what happens to that depletion.
//! Any other walk error (arithmetic overflow) always restores the ladder.

use log::{debug, warn};
use rust_decimal::Decimal;

use crate::engine::QuoteProvider;
use crate::ladder::{Ladder, LadderLevel};
use crate::types::amount::{deflate_by_fee, MAX_FEE_BPS};
use crate::types::{Direction, LadderQuote, QuoteError, Side};

/// Default taker fee: 5 bps (0.05%)
pub const DEFAULT_TAKER_FEE_BPS: u64 = 5;

/// What a walk that runs out of liquidity leaves behind.
///
/// Only [`QuoteError::InsufficientLiquidity`] is subject to the policy.
/// Every other failure leaves the ladder as it was before the quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Levels drained before the shortfall stay drained
    #[default]
    KeepDepleted,
    /// The ladder is restored to its state before the quote
    Rollback,
}

/// Output of a single walk over one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    /// Accumulated output (base for asks, quote for bids)
    pub out_amount: Decimal,

    /// Levels fully or partially consumed
    pub levels_touched: usize,
}

// ============================================================================
// Level walks
// ============================================================================

/// Spend a quote budget on asks, accumulating base units
///
/// # Errors
///
/// * [`QuoteError::InvalidInput`] - budget is not positive (nothing is touched)
/// * [`QuoteError::InsufficientLiquidity`] - asks ran out; visited levels are drained
/// * [`QuoteError::Overflow`] - a level's arithmetic overflowed; levels visited
///   before it are already drained
pub fn base_out_from_quote_in(asks: &mut [LadderLevel], quote_budget: Decimal) -> Result<Fill, QuoteError> {
    if quote_budget <= Decimal::ZERO {
        return Err(QuoteError::InvalidInput);
    }

    let mut budget = quote_budget;
    let mut base_out = Decimal::ZERO;
    let mut levels_touched = 0;

    for level in asks.iter_mut().filter(|level| !level.is_empty()) {
        let notional = level.notional().ok_or(QuoteError::Overflow)?;
        levels_touched += 1;

        if notional >= budget {
            let base = budget.checked_div(level.price).ok_or(QuoteError::Overflow)?;
            base_out = base_out.checked_add(level.consume(base)).ok_or(QuoteError::Overflow)?;
            budget = Decimal::ZERO;
            break;
        }

        base_out = base_out.checked_add(level.drain()).ok_or(QuoteError::Overflow)?;
        budget -= notional;
        if budget <= Decimal::ZERO {
            break;
        }
    }

    if budget > Decimal::ZERO {
        return Err(QuoteError::InsufficientLiquidity { unfilled: budget });
    }
    Ok(Fill {
        out_amount: base_out,
        levels_touched,
    })
}

/// Sell a base budget into bids, accumulating quote units
///
/// # Errors
///
/// * [`QuoteError::InvalidInput`] - budget is not positive (nothing is touched)
/// * [`QuoteError::InsufficientLiquidity`] - bids ran out; visited levels are drained
/// * [`QuoteError::Overflow`] - a level's arithmetic overflowed; levels visited
///   before it are already drained
pub fn quote_out_from_base_in(bids: &mut [LadderLevel], base_budget: Decimal) -> Result<Fill, QuoteError> {
    if base_budget <= Decimal::ZERO {
        return Err(QuoteError::InvalidInput);
    }

    let mut budget = base_budget;
    let mut quote_out = Decimal::ZERO;
    let mut levels_touched = 0;

    for level in bids.iter_mut().filter(|level| !level.is_empty()) {
        levels_touched += 1;

        if level.size >= budget {
            let taken = level.consume(budget);
            let proceeds = taken.checked_mul(level.price).ok_or(QuoteError::Overflow)?;
            quote_out = quote_out.checked_add(proceeds).ok_or(QuoteError::Overflow)?;
            budget = Decimal::ZERO;
            break;
        }

        let price = level.price;
        let size = level.drain();
        let proceeds = size.checked_mul(price).ok_or(QuoteError::Overflow)?;
        quote_out = quote_out.checked_add(proceeds).ok_or(QuoteError::Overflow)?;
        budget -= size;
        if budget <= Decimal::ZERO {
            break;
        }
    }

    if budget > Decimal::ZERO {
        return Err(QuoteError::InsufficientLiquidity { unfilled: budget });
    }
    Ok(Fill {
        out_amount: quote_out,
        levels_touched,
    })
}

/// Walk the side a taker in `direction` consumes, then drop its drained levels
fn walk(ladder: &mut Ladder, direction: Direction, budget: Decimal) -> Result<Fill, QuoteError> {
    let side = direction.resting_side();
    let result = match side {
        Side::Ask => base_out_from_quote_in(ladder.side_mut(side), budget),
        Side::Bid => quote_out_from_base_in(ladder.side_mut(side), budget),
    };
    ladder.prune_empty_levels(side);
    result
}

// ============================================================================
// LadderEngine
// ============================================================================

/// Quote engine over an owned ladder snapshot.
///
/// ## Example
///
/// ```
/// use dark_quoter::engine::LadderEngine;
/// use dark_quoter::ladder::{Ladder, LadderLevel};
/// use dark_quoter::types::Direction;
/// use rust_decimal::Decimal;
///
/// let lvl = |p: i64, s: i64| LadderLevel::new(Decimal::from(p), Decimal::from(s));
/// let ladder = Ladder::new(vec![lvl(25, 10), lvl(30, 5)], vec![lvl(20, 10)]);
///
/// let mut engine = LadderEngine::new(ladder, 0).unwrap();
/// let quote = engine.quote(Decimal::from(100), Direction::AToB).unwrap();
///
/// assert_eq!(quote.out_amount, Decimal::from(4));
/// assert_eq!(engine.ladder().asks()[0].size, Decimal::from(6));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LadderEngine {
    ladder: Ladder,
    taker_fee_bps: u64,
    failure_policy: FailurePolicy,
}

impl LadderEngine {
    /// Create an engine over a pre-sorted ladder
    ///
    /// # Errors
    ///
    /// [`QuoteError::InvalidFee`] if `taker_fee_bps` exceeds 10_000.
    pub fn new(ladder: Ladder, taker_fee_bps: u64) -> Result<Self, QuoteError> {
        if taker_fee_bps > MAX_FEE_BPS {
            return Err(QuoteError::InvalidFee(taker_fee_bps));
        }
        Ok(Self {
            ladder,
            taker_fee_bps,
            failure_policy: FailurePolicy::default(),
        })
    }

    /// Set what a failed quote leaves behind
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Current ladder
    #[inline]
    pub fn ladder(&self) -> &Ladder {
        &self.ladder
    }

    /// Take the ladder back out of the engine
    pub fn into_ladder(self) -> Ladder {
        self.ladder
    }

    /// Swap in a fresh snapshot from the feed, returning the old one
    pub fn replace_ladder(&mut self, ladder: Ladder) -> Ladder {
        std::mem::replace(&mut self.ladder, ladder)
    }

    /// Taker fee in basis points
    #[inline]
    pub fn taker_fee_bps(&self) -> u64 {
        self.taker_fee_bps
    }

    /// Policy applied when a quote fails
    #[inline]
    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    fn budget(&self, amount: Decimal) -> Result<Decimal, QuoteError> {
        if amount <= Decimal::ZERO {
            return Err(QuoteError::InvalidInput);
        }
        deflate_by_fee(amount, self.taker_fee_bps).ok_or(QuoteError::Overflow)
    }

    /// Compute a quote and the ladder it would leave, without applying it
    ///
    /// # Errors
    ///
    /// * [`QuoteError::InvalidInput`] - `amount` is zero or negative
    /// * [`QuoteError::InsufficientLiquidity`] - the walked side ran out
    /// * [`QuoteError::Overflow`] - fee deflation or a level's arithmetic overflowed
    pub fn simulate(&self, amount: Decimal, direction: Direction) -> Result<(LadderQuote, Ladder), QuoteError> {
        let budget = self.budget(amount)?;
        let mut next = self.ladder.clone();
        let fill = walk(&mut next, direction, budget)?;

        let quote = LadderQuote {
            direction,
            in_amount: amount,
            out_amount: fill.out_amount,
            levels_touched: fill.levels_touched,
            ladder_exhausted: next.is_exhausted(),
        };
        Ok((quote, next))
    }

    /// Compute a quote and apply the fill to the ladder
    ///
    /// # Errors
    ///
    /// * [`QuoteError::InvalidInput`] - `amount` is zero or negative; ladder untouched
    /// * [`QuoteError::InsufficientLiquidity`] - the walked side ran out; the
    ///   ladder is left according to the engine's [`FailurePolicy`]
    /// * [`QuoteError::Overflow`] - fee deflation or a level's arithmetic
    ///   overflowed; ladder untouched under either policy
    pub fn quote(&mut self, amount: Decimal, direction: Direction) -> Result<LadderQuote, QuoteError> {
        let budget = self.budget(amount)?;

        let mut next = self.ladder.clone();
        let fill = match walk(&mut next, direction, budget) {
            Ok(fill) => fill,
            Err(err) => {
                if err.is_insufficient_liquidity() && self.failure_policy == FailurePolicy::KeepDepleted {
                    self.ladder = next;
                }
                warn!(
                    "ladder quote {:?} for {} rejected ({:?}): {}",
                    direction, amount, self.failure_policy, err
                );
                return Err(err);
            }
        };

        self.ladder = next;
        let ladder_exhausted = self.ladder.is_exhausted();
        if ladder_exhausted {
            warn!("ladder has no asks or no bids left after {:?} quote", direction);
        }
        debug!(
            "ladder quote {:?}: in={} budget={} out={} levels={}",
            direction, amount, budget, fill.out_amount, fill.levels_touched
        );

        Ok(LadderQuote {
            direction,
            in_amount: amount,
            out_amount: fill.out_amount,
            levels_touched: fill.levels_touched,
            ladder_exhausted,
        })
    }
}

impl QuoteProvider for LadderEngine {
    type Amount = Decimal;
    type Quote = LadderQuote;

    fn quote(&mut self, amount: Decimal, direction: Direction) -> Result<LadderQuote, QuoteError> {
        LadderEngine::quote(self, amount, direction)
    }

    fn preview(&self, amount: Decimal, direction: Direction) -> Result<LadderQuote, QuoteError> {
        self.simulate(amount, direction).map(|(quote, _)| quote)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::amount::approx_eq;
    use rust_decimal::prelude::*;

    fn level(price: i64, size: i64) -> LadderLevel {
        LadderLevel::new(Decimal::from(price), Decimal::from(size))
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_ladder() -> Ladder {
        Ladder::new(
            vec![level(25, 10), level(30, 5), level(35, 2)],
            vec![level(20, 10), level(15, 5), level(10, 2)],
        )
    }

    fn tolerance() -> Decimal {
        dec("0.000000001")
    }

    // ------------------------------------------------------------------------
    // Walk helpers
    // ------------------------------------------------------------------------

    #[test]
    fn test_walk_asks_within_first_level() {
        let mut asks = vec![level(25, 10), level(30, 5)];
        let fill = base_out_from_quote_in(&mut asks, Decimal::from(100)).unwrap();

        assert_eq!(fill.out_amount, Decimal::from(4));
        assert_eq!(fill.levels_touched, 1);
        assert_eq!(asks, vec![level(25, 6), level(30, 5)]);
    }

    #[test]
    fn test_walk_asks_across_levels() {
        let mut asks = vec![level(25, 10), level(30, 5), level(35, 2)];
        // 250 drains the first level, 60 buys 2 at 30
        let fill = base_out_from_quote_in(&mut asks, Decimal::from(310)).unwrap();

        assert_eq!(fill.out_amount, Decimal::from(12));
        assert_eq!(fill.levels_touched, 2);
        assert_eq!(asks, vec![level(25, 0), level(30, 3), level(35, 2)]);
    }

    #[test]
    fn test_walk_asks_exact_level_boundary() {
        let mut asks = vec![level(25, 10), level(30, 5)];
        let fill = base_out_from_quote_in(&mut asks, Decimal::from(250)).unwrap();

        assert_eq!(fill.out_amount, Decimal::from(10));
        assert_eq!(fill.levels_touched, 1);
        assert!(asks[0].is_empty());
        assert_eq!(asks[1], level(30, 5));
    }

    #[test]
    fn test_walk_bids_across_levels() {
        let mut bids = vec![level(20, 10), level(15, 5), level(10, 2)];
        // 10 at 20 + 2 at 15
        let fill = quote_out_from_base_in(&mut bids, Decimal::from(12)).unwrap();

        assert_eq!(fill.out_amount, Decimal::from(230));
        assert_eq!(fill.levels_touched, 2);
        assert_eq!(bids, vec![level(20, 0), level(15, 3), level(10, 2)]);
    }

    #[test]
    fn test_walk_skips_empty_levels() {
        let mut asks = vec![level(25, 0), level(30, 5)];
        let fill = base_out_from_quote_in(&mut asks, Decimal::from(30)).unwrap();

        assert_eq!(fill.out_amount, Decimal::ONE);
        assert_eq!(fill.levels_touched, 1);
    }

    #[test]
    fn test_walk_rejects_non_positive_budget() {
        let mut asks = vec![level(25, 10)];
        let mut bids = vec![level(20, 10)];

        assert_eq!(base_out_from_quote_in(&mut asks, Decimal::ZERO), Err(QuoteError::InvalidInput));
        assert_eq!(quote_out_from_base_in(&mut bids, Decimal::from(-1)), Err(QuoteError::InvalidInput));
        assert_eq!(asks, vec![level(25, 10)]);
        assert_eq!(bids, vec![level(20, 10)]);
    }

    #[test]
    fn test_walk_shortfall_drains_visited_levels() {
        let mut bids = vec![level(20, 10), level(15, 5)];
        let err = quote_out_from_base_in(&mut bids, Decimal::from(20)).unwrap_err();

        assert_eq!(err, QuoteError::InsufficientLiquidity { unfilled: Decimal::from(5) });
        assert!(bids.iter().all(|l| l.is_empty()));
    }

    // ------------------------------------------------------------------------
    // Engine
    // ------------------------------------------------------------------------

    #[test]
    fn test_engine_rejects_fee_above_100_percent() {
        assert_eq!(
            LadderEngine::new(sample_ladder(), 10_001),
            Err(QuoteError::InvalidFee(10_001))
        );
    }

    #[test]
    fn test_engine_first_quote_touches_first_ask_only() {
        let mut engine = LadderEngine::new(sample_ladder(), 5).unwrap();

        // budget = 150 / 1.0005 ~= 149.925 < 250
        let quote = engine.quote(Decimal::from(150), Direction::AToB).unwrap();

        assert_eq!(quote.in_amount, Decimal::from(150));
        assert!(approx_eq(quote.out_amount, dec("5.997001499250374812"), tolerance()));
        assert_eq!(quote.levels_touched, 1);
        assert!(!quote.ladder_exhausted);

        let asks = engine.ladder().asks();
        assert_eq!(asks.len(), 3);
        assert!(approx_eq(asks[0].size, dec("4.002998500749625187"), tolerance()));
        assert_eq!(asks[1], level(30, 5));
        assert_eq!(asks[2], level(35, 2));
        assert_eq!(engine.ladder().bids(), sample_ladder().bids());
    }

    #[test]
    fn test_engine_follow_up_quote_sees_depletion() {
        let mut engine = LadderEngine::new(sample_ladder(), 5).unwrap();
        engine.quote(Decimal::from(150), Direction::AToB).unwrap();

        let quote = engine.quote(Decimal::from(50), Direction::AToB).unwrap();
        assert!(approx_eq(quote.out_amount, dec("1.999000499750124937"), tolerance()));

        let remaining = engine.ladder().asks()[0].size;
        assert!(approx_eq(remaining, dec("2.003998000999500249"), tolerance()));
    }

    #[test]
    fn test_engine_sell_base_into_bids() {
        let mut engine = LadderEngine::new(sample_ladder(), 0).unwrap();

        let quote = engine.quote(Decimal::from(12), Direction::BToA).unwrap();

        assert_eq!(quote.out_amount, Decimal::from(230));
        assert_eq!(quote.levels_touched, 2);
        // Drained level is pruned
        assert_eq!(engine.ladder().bids(), &[level(15, 3), level(10, 2)]);
        assert_eq!(engine.ladder().asks(), sample_ladder().asks());
    }

    #[test]
    fn test_engine_rejects_zero_and_negative_amounts() {
        let mut engine = LadderEngine::new(sample_ladder(), 5).unwrap();
        let root = engine.ladder().state_root();

        for amount in [Decimal::ZERO, Decimal::from(-10)] {
            for direction in [Direction::AToB, Direction::BToA] {
                assert_eq!(engine.quote(amount, direction), Err(QuoteError::InvalidInput));
            }
        }
        assert_eq!(engine.ladder().state_root(), root);
    }

    #[test]
    fn test_engine_shortfall_keeps_depletion_by_default() {
        let mut engine = LadderEngine::new(sample_ladder(), 0).unwrap();

        // Total ask notional is 470
        let err = engine.quote(Decimal::from(1_000), Direction::AToB).unwrap_err();

        assert_eq!(err, QuoteError::InsufficientLiquidity { unfilled: Decimal::from(530) });
        assert!(engine.ladder().asks().is_empty());
        assert_eq!(engine.ladder().bids(), sample_ladder().bids());
    }

    #[test]
    fn test_engine_shortfall_rolls_back_when_asked() {
        let mut engine = LadderEngine::new(sample_ladder(), 0)
            .unwrap()
            .with_failure_policy(FailurePolicy::Rollback);

        let err = engine.quote(Decimal::from(1_000), Direction::AToB).unwrap_err();

        assert!(err.is_insufficient_liquidity());
        assert_eq!(engine.ladder(), &sample_ladder());
    }

    #[test]
    fn test_engine_leaves_untouched_side_as_supplied() {
        let bids = vec![level(20, 10), level(15, 0), level(10, 2)];
        let asks = vec![level(25, 10), level(30, 0), level(35, 2)];
        let mut engine = LadderEngine::new(Ladder::new(asks.clone(), bids.clone()), 5).unwrap();

        engine.quote(Decimal::from(50), Direction::AToB).unwrap();
        assert_eq!(engine.ladder().bids(), bids.as_slice());

        let mut engine = LadderEngine::new(Ladder::new(asks.clone(), bids), 5).unwrap();
        engine.quote(Decimal::from(1), Direction::BToA).unwrap();
        assert_eq!(engine.ladder().asks(), asks.as_slice());
    }

    #[test]
    fn test_engine_overflow_restores_ladder_under_both_policies() {
        let ladder = Ladder::new(
            vec![level(1, 10), LadderLevel::new(Decimal::MAX, Decimal::from(2))],
            vec![level(20, 10)],
        );

        for policy in [FailurePolicy::KeepDepleted, FailurePolicy::Rollback] {
            let mut engine = LadderEngine::new(ladder.clone(), 0).unwrap().with_failure_policy(policy);

            // First level drains for 10, the second level's notional overflows
            let err = engine.quote(Decimal::from(100), Direction::AToB).unwrap_err();

            assert_eq!(err, QuoteError::Overflow);
            assert_eq!(engine.ladder(), &ladder, "{:?}", policy);
        }
    }

    #[test]
    fn test_engine_flags_exhausted_side() {
        let mut engine = LadderEngine::new(sample_ladder(), 5).unwrap();

        // 470.235 / 1.0005 == 470, exactly the ask notional
        let quote = engine.quote(dec("470.235"), Direction::AToB).unwrap();

        assert_eq!(quote.out_amount, Decimal::from(17));
        assert_eq!(quote.levels_touched, 3);
        assert!(quote.ladder_exhausted);
        assert!(engine.ladder().is_exhausted());
    }

    #[test]
    fn test_engine_fee_reduces_output() {
        let amount = Decimal::from(300);
        let outputs: Vec<Decimal> = [0u64, 5, 30, 100]
            .iter()
            .map(|fee| {
                let mut engine = LadderEngine::new(sample_ladder(), *fee).unwrap();
                engine.quote(amount, Direction::AToB).unwrap().out_amount
            })
            .collect();

        assert!(outputs.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_engine_simulate_does_not_mutate() {
        let engine = LadderEngine::new(sample_ladder(), 5).unwrap();
        let (quote, next) = engine.simulate(Decimal::from(150), Direction::AToB).unwrap();

        assert_eq!(engine.ladder(), &sample_ladder());
        assert_ne!(&next, engine.ladder());

        let mut applied = engine.clone();
        assert_eq!(applied.quote(Decimal::from(150), Direction::AToB).unwrap(), quote);
        assert_eq!(applied.ladder(), &next);
    }

    #[test]
    fn test_engine_replace_ladder() {
        let mut engine = LadderEngine::new(Ladder::default(), 5).unwrap();
        let old = engine.replace_ladder(sample_ladder());

        assert_eq!(old, Ladder::default());
        assert_eq!(engine.into_ladder(), sample_ladder());
    }
}
