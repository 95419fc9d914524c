//! Constant-product pool state.
//!
//! - [`ReservePair`]: the two token reserves and the derived invariant

pub mod reserves;

pub use reserves::ReservePair;
