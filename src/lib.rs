//! # Dark Quoter
//!
//! Swap quote engines for decentralized exchange pricing.
//!
//! ## Architecture
//!
//! - **Types**: Directions, quote results, errors, fee and bps helpers
//! - **Pool**: Constant-product reserve pair with derived invariant
//! - **Ladder**: Ask/bid price levels in priority order
//! - **Engine**: AMM and ladder quote engines behind one trait
//! - **Config**: TOML setup for both engines
//!
//! ## Design Principles
//!
//! 1. **Determinism**: All operations produce identical results for identical inputs
//! 2. **No Floating Point**: integral reserves, `rust_decimal` for prices and ladders
//! 3. **Simulated Execution**: a successful quote advances the engine's state
//!    as if the trade had executed; nothing is submitted anywhere
//! 4. **Synchronous Execution**: no async, no internal locking

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Direction, Quote, LadderQuote, QuoteError
pub mod types;

/// Constant-product pool state
pub mod pool;

/// Order-book ladder
pub mod ladder;

/// Quote engines
pub mod engine;

/// TOML configuration
pub mod config;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use types::{Direction, LadderQuote, Quote, QuoteError, Side};
pub use pool::ReservePair;
pub use ladder::{Ladder, LadderLevel};
pub use engine::{AmmEngine, FailurePolicy, LadderEngine, QuoteProvider};
pub use config::QuoterConfig;
