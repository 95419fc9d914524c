//! Reserve pair of a constant-product pool.
//!
//! ## SSZ Serialization
//!
//! The pair derives `SimpleSerialize` so its encoding is fixed-size and
//! deterministic (two little-endian u64 values). The state root is the
//! SHA-256 digest of that encoding.
//!
//! ## Invariant
//!
//! `k = reserve_a * reserve_b` is derived on demand in `u128`; it is never
//! stored, so it cannot drift from the reserves.

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

use crate::types::amount::ratio;
use crate::types::Direction;

/// Token reserves held by a constant-product pool.
///
/// ## Example
///
/// ```
/// use dark_quoter::pool::ReservePair;
///
/// let reserves = ReservePair::new(1_000, 20_000);
/// assert_eq!(reserves.invariant(), 20_000_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct ReservePair {
    /// Base-token reserve (token A)
    pub reserve_a: u64,

    /// Quote-token reserve (token B)
    pub reserve_b: u64,
}

impl ReservePair {
    /// Create a reserve pair
    pub fn new(reserve_a: u64, reserve_b: u64) -> Self {
        Self { reserve_a, reserve_b }
    }

    /// Constant product `reserve_a * reserve_b`
    #[inline]
    pub fn invariant(&self) -> u128 {
        self.reserve_a as u128 * self.reserve_b as u128
    }

    /// `true` if either reserve is zero
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.reserve_a == 0 || self.reserve_b == 0
    }

    /// Reserves as `(input side, output side)` for a trade direction
    pub fn split(&self, direction: Direction) -> (u64, u64) {
        match direction {
            Direction::AToB => (self.reserve_a, self.reserve_b),
            Direction::BToA => (self.reserve_b, self.reserve_a),
        }
    }

    /// Inverse of [`ReservePair::split`]
    pub fn from_split(direction: Direction, reserve_in: u64, reserve_out: u64) -> Self {
        match direction {
            Direction::AToB => Self::new(reserve_in, reserve_out),
            Direction::BToA => Self::new(reserve_out, reserve_in),
        }
    }

    /// Pool price in the trade direction: input reserve over output reserve
    ///
    /// Returns None if the output-side reserve is zero.
    pub fn price(&self, direction: Direction) -> Option<Decimal> {
        let (reserve_in, reserve_out) = self.split(direction);
        ratio(reserve_in, reserve_out)
    }

    /// SHA-256 over the SSZ encoding of the pair
    ///
    /// Returns None if encoding fails.
    pub fn state_root(&self) -> Option<[u8; 32]> {
        let bytes = ssz_rs::serialize(self).ok()?;
        let digest = Sha256::digest(&bytes);

        let mut root = [0u8; 32];
        root.copy_from_slice(&digest);
        Some(root)
    }

    /// State root as a hex string
    pub fn state_root_hex(&self) -> Option<String> {
        self.state_root().map(hex::encode)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
