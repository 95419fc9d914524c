//! Core data types shared by the quote engines.
//!
//! ## Types
//!
//! - [`Direction`]: AToB or BToA
//! - [`Side`]: Bid or Ask side of a ladder
//! - [`Quote`]: AMM quote result with price impact
//! - [`LadderQuote`]: ladder quote result
//! - [`QuoteError`]: failure reasons for both engines
//!
//! ## Numerics
//!
//! AMM amounts are integral `u64` token units. Ladder amounts and all
//! prices are `rust_decimal::Decimal`; no floating point is used.

mod direction;
mod error;
mod quote;
pub mod amount;

// Re-export all types at module level
pub use direction::{Direction, Side};
pub use error::QuoteError;
pub use quote::{LadderQuote, Quote};
