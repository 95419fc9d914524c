//! Quote results returned by the engines.
//!
//! ## Units
//!
//! - [`Quote`] (AMM): integral token units, price impact in whole bps
//! - [`LadderQuote`]: decimal amounts in UI units (quote per base for prices)

use rust_decimal::Decimal;

use crate::types::Direction;

/// Result of a constant-product quote.
///
/// ## Example
///
/// ```
/// use dark_quoter::types::{Direction, Quote};
///
/// let quote = Quote::new(Direction::AToB, 10, 198, 201);
/// assert_eq!(quote.out_amount, 198);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quote {
    /// Direction the quote was computed for
    pub direction: Direction,

    /// Input amount as requested (before fee)
    pub in_amount: u64,

    /// Output amount paid out by the pool
    pub out_amount: u64,

    /// Move of the pool price caused by the trade, in whole basis points
    pub price_impact_bps: u32,
}

impl Quote {
    /// Create a new quote
    pub fn new(direction: Direction, in_amount: u64, out_amount: u64, price_impact_bps: u32) -> Self {
        Self {
            direction,
            in_amount,
            out_amount,
            price_impact_bps,
        }
    }
}

/// Result of a ladder walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LadderQuote {
    /// Direction the quote was computed for
    pub direction: Direction,

    /// Input amount as requested (before taker fee)
    pub in_amount: Decimal,

    /// Accumulated output across every touched level
    pub out_amount: Decimal,

    /// Number of levels fully or partially consumed
    pub levels_touched: usize,

    /// Set when the walk left one side of the ladder with no levels
    pub ladder_exhausted: bool,
}

impl LadderQuote {
    /// Average execution price in quote units per base unit, fee included
    ///
    /// For `AToB` the taker pays `in_amount` quote for `out_amount` base;
    /// for `BToA` the taker sells `in_amount` base for `out_amount` quote.
    ///
    /// Returns None when the denominator is zero.
    pub fn effective_price(&self) -> Option<Decimal> {
        match self.direction {
            Direction::AToB => self.in_amount.checked_div(self.out_amount),
            Direction::BToA => self.out_amount.checked_div(self.in_amount),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
