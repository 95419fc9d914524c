//! Quote engines.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Same input always produces same output
//! 2. **No Floating Point**: integral reserves, `Decimal` everywhere else
//! 3. **Synchronous Execution**: a quote is one bounded computation
//! 4. **Owned State**: each engine owns the liquidity it evolves
//!
//! ## Engines
//!
//! - [`AmmEngine`]: constant-product pool, O(1) per quote
//! - [`LadderEngine`]: greedy ladder walk, O(levels touched) per quote
//!
//! Both implement [`QuoteProvider`], so callers can treat them alike.
//!
//! ## Concurrency
//!
//! `quote` takes `&mut self`; an engine assumes exclusive, sequential use.
//! Callers sharing one engine across threads wrap it in their own lock.
//!
//! ## Example
//!
//! ```
//! use dark_quoter::engine::{AmmEngine, QuoteProvider};
//! use dark_quoter::types::Direction;
//!
//! fn best_of<P: QuoteProvider>(provider: &P, amount: P::Amount) -> bool {
//!     provider.preview(amount, Direction::AToB).is_ok()
//! }
//!
//! let amm = AmmEngine::new(1_000, 20_000);
//! assert!(best_of(&amm, 10));
//! ```

pub mod amm;
pub mod ladder;

pub use amm::{AmmEngine, DEFAULT_AMM_FEE_BPS};
pub use ladder::{FailurePolicy, Fill, LadderEngine, DEFAULT_TAKER_FEE_BPS};

use crate::types::{Direction, QuoteError};

/// Common contract of both engines.
pub trait QuoteProvider {
    /// Unit the engine takes input in
    type Amount;

    /// Result type of a successful quote
    type Quote;

    /// Compute a quote and advance the engine's state as if it executed
    fn quote(&mut self, amount: Self::Amount, direction: Direction) -> Result<Self::Quote, QuoteError>;

    /// Compute the same quote without touching state
    fn preview(&self, amount: Self::Amount, direction: Direction) -> Result<Self::Quote, QuoteError>;
}
