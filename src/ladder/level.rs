//! Ladder levels.
//!
//! ## Design
//!
//! A [`LadderLevel`] is one price point of resting liquidity in UI units:
//! `price` in quote units per base unit and `size` in base units. Sizes only
//! ever shrink while quotes walk the ladder.
//!
//! Exchanges publish levels in native units (price ticks, base lots). A
//! [`RawLevel`] holds those and [`MarketScale`] converts them:
//!
//! ```text
//! price = price_in_ticks    * quote_units_per_tick
//! size  = size_in_base_lots * base_units_per_lot
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single price level in UI units.
///
/// ## Example
///
/// ```
/// use dark_quoter::ladder::LadderLevel;
/// use rust_decimal::Decimal;
///
/// let level = LadderLevel::new(Decimal::from(25), Decimal::from(10));
/// assert_eq!(level.notional(), Some(Decimal::from(250)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderLevel {
    /// Quote units per base unit
    pub price: Decimal,

    /// Remaining base units at this price
    pub size: Decimal,
}

impl LadderLevel {
    /// Create a new level
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }

    /// Quote value of the whole level (`price * size`)
    ///
    /// Returns None on overflow.
    #[inline]
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_mul(self.size)
    }

    /// `true` once the level has nothing left
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size <= Decimal::ZERO
    }

    /// Take up to `size` base units from this level
    ///
    /// # Returns
    ///
    /// The size actually taken (may be less than requested)
    pub fn consume(&mut self, size: Decimal) -> Decimal {
        let taken = size.min(self.size).max(Decimal::ZERO);
        self.size -= taken;
        taken
    }

    /// Take everything left at this level
    ///
    /// # Returns
    ///
    /// The size that was resting
    pub fn drain(&mut self) -> Decimal {
        std::mem::replace(&mut self.size, Decimal::ZERO)
    }
}

// ============================================================================
// Exchange-native levels
// ============================================================================

/// A level as published by the exchange, in ticks and lots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLevel {
    /// Price expressed in ticks
    pub price_in_ticks: u64,

    /// Size expressed in base lots
    pub size_in_base_lots: u64,
}

impl RawLevel {
    /// Create a new raw level
    pub fn new(price_in_ticks: u64, size_in_base_lots: u64) -> Self {
        Self {
            price_in_ticks,
            size_in_base_lots,
        }
    }
}

/// Unit conversion between exchange-native and UI levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketScale {
    /// Quote units represented by one price tick
    pub quote_units_per_tick: Decimal,

    /// Base units represented by one base lot
    pub base_units_per_lot: Decimal,
}

impl MarketScale {
    /// Create a scale
    pub fn new(quote_units_per_tick: Decimal, base_units_per_lot: Decimal) -> Self {
        Self {
            quote_units_per_tick,
            base_units_per_lot,
        }
    }

    /// Convert a raw level into UI units
    ///
    /// Returns None on overflow.
    pub fn to_ui(&self, raw: RawLevel) -> Option<LadderLevel> {
        let price = Decimal::from(raw.price_in_ticks).checked_mul(self.quote_units_per_tick)?;
        let size = Decimal::from(raw.size_in_base_lots).checked_mul(self.base_units_per_lot)?;
        Some(LadderLevel::new(price, size))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
