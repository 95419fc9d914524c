//! Trade direction and ladder side.
//!
//! A quote request names a [`Direction`]: which token goes in and which comes
//! out. The ladder engine maps that direction onto the book [`Side`] it walks.

// ============================================================================
// Direction enum
// ============================================================================

/// Swap direction between token A (base) and token B (quote)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Base in, quote out on the AMM; quote budget spent on asks on the ladder
    #[default]
    AToB,
    /// Quote in, base out on the AMM; base budget sold into bids on the ladder
    BToA,
}

impl Direction {
    /// Build from the `a_to_b` flag used by upstream quote requests
    pub fn from_a_to_b(a_to_b: bool) -> Self {
        if a_to_b {
            Direction::AToB
        } else {
            Direction::BToA
        }
    }

    /// The ladder side a taker in this direction consumes
    pub fn resting_side(self) -> Side {
        match self {
            Direction::AToB => Side::Ask,
            Direction::BToA => Side::Bid,
        }
    }
}

// ============================================================================
// Side enum
// ============================================================================

/// One side of a ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Resting buy levels, best (highest) price first
    Bid,
    /// Resting sell levels, best (lowest) price first
    Ask,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
