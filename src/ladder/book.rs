//! Two-sided ladder of resting liquidity.
//!
//! ## Price Ordering
//!
//! - **Bids**: sorted high-to-low (best bid = highest price)
//! - **Asks**: sorted low-to-high (best ask = lowest price)
//!
//! The ordering is a caller contract. The ladder keeps levels in the order it
//! was given and never re-sorts; [`Ladder::is_sorted`] lets callers check.
//!
//! ## Example
//!
//! ```
//! use dark_quoter::ladder::{Ladder, LadderLevel};
//! use rust_decimal::Decimal;
//!
//! let lvl = |p: i64, s: i64| LadderLevel::new(Decimal::from(p), Decimal::from(s));
//! let ladder = Ladder::new(
//!     vec![lvl(25, 10), lvl(30, 5)],
//!     vec![lvl(20, 10), lvl(15, 5)],
//! );
//!
//! assert_eq!(ladder.best_ask(), Some(Decimal::from(25)));
//! assert_eq!(ladder.best_bid(), Some(Decimal::from(20)));
//! assert_eq!(ladder.spread(), Some(Decimal::from(5)));
//! ```

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::ladder::{LadderLevel, MarketScale, RawLevel};
use crate::types::Side;

/// Ask and bid levels, best price first on each side.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ladder {
    /// Sell levels, ascending by price
    asks: Vec<LadderLevel>,

    /// Buy levels, descending by price
    bids: Vec<LadderLevel>,
}

impl Ladder {
    /// Create a ladder from pre-sorted sides
    pub fn new(asks: Vec<LadderLevel>, bids: Vec<LadderLevel>) -> Self {
        Self { asks, bids }
    }

    /// Create a ladder from exchange-native levels
    ///
    /// Returns None if any level overflows during conversion.
    pub fn from_raw(scale: &MarketScale, asks: &[RawLevel], bids: &[RawLevel]) -> Option<Self> {
        let asks = asks.iter().map(|raw| scale.to_ui(*raw)).collect::<Option<Vec<_>>>()?;
        let bids = bids.iter().map(|raw| scale.to_ui(*raw)).collect::<Option<Vec<_>>>()?;
        Some(Self::new(asks, bids))
    }

    // ========================================================================
    // Side access
    // ========================================================================

    /// Ask levels, best first
    #[inline]
    pub fn asks(&self) -> &[LadderLevel] {
        &self.asks
    }

    /// Bid levels, best first
    #[inline]
    pub fn bids(&self) -> &[LadderLevel] {
        &self.bids
    }

    /// Levels of one side, best first
    #[inline]
    pub fn side(&self, side: Side) -> &[LadderLevel] {
        match side {
            Side::Ask => &self.asks,
            Side::Bid => &self.bids,
        }
    }

    /// Mutable levels of one side (for the ladder engine)
    #[inline]
    pub(crate) fn side_mut(&mut self, side: Side) -> &mut Vec<LadderLevel> {
        match side {
            Side::Ask => &mut self.asks,
            Side::Bid => &mut self.bids,
        }
    }

    // ========================================================================
    // Best Bid/Ask
    // ========================================================================

    /// Lowest ask price
    #[inline]
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|level| level.price)
    }

    /// Highest bid price
    #[inline]
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|level| level.price)
    }

    /// Best ask minus best bid
    ///
    /// Returns None if either side is empty or the book is crossed.
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    // ========================================================================
    // Depth
    // ========================================================================

    /// Total base units resting on a side
    ///
    /// Returns None on overflow.
    pub fn total_size(&self, side: Side) -> Option<Decimal> {
        self.side(side)
            .iter()
            .try_fold(Decimal::ZERO, |acc, level| acc.checked_add(level.size))
    }

    /// Total quote value resting on a side
    ///
    /// Returns None on overflow.
    pub fn total_notional(&self, side: Side) -> Option<Decimal> {
        self.side(side)
            .iter()
            .try_fold(Decimal::ZERO, |acc, level| acc.checked_add(level.notional()?))
    }

    /// Number of levels on a side
    #[inline]
    pub fn depth(&self, side: Side) -> usize {
        self.side(side).len()
    }

    /// `true` once either side has no levels left
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.asks.is_empty() || self.bids.is_empty()
    }

    /// `true` if both sides are in strict price priority
    pub fn is_sorted(&self) -> bool {
        let asks_ok = self.asks.windows(2).all(|w| w[0].price < w[1].price);
        let bids_ok = self.bids.windows(2).all(|w| w[0].price > w[1].price);
        asks_ok && bids_ok
    }

    // ========================================================================
    // Cleanup Helpers
    // ========================================================================

    /// Drop levels with nothing left from one side
    ///
    /// Returns the number of levels removed. The other side is untouched.
    pub fn prune_empty_levels(&mut self, side: Side) -> usize {
        let levels = self.side_mut(side);
        let before = levels.len();
        levels.retain(|level| !level.is_empty());
        before - levels.len()
    }

    // ========================================================================
    // State Root
    // ========================================================================

    /// SHA-256 over both sides, asks first
    ///
    /// Every level contributes its normalized price and size (16 bytes each),
    /// so equal values with different scales hash identically.
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for (tag, levels) in [(0u8, &self.asks), (1u8, &self.bids)] {
            hasher.update([tag]);
            hasher.update((levels.len() as u64).to_le_bytes());
            for level in levels {
                hasher.update(level.price.normalize().serialize());
                hasher.update(level.size.normalize().serialize());
            }
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        root
    }

    /// State root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
