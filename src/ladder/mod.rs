//! Order-book ladder: resting price levels on both sides.
//!
//! ## Components
//!
//! - [`LadderLevel`]: price and remaining size in UI units
//! - [`RawLevel`] / [`MarketScale`]: exchange-native levels and their conversion
//! - [`Ladder`]: asks and bids in price priority
//!
//! ## Ownership
//!
//! A ladder snapshot comes from an upstream feed. Once handed to a
//! [`LadderEngine`](crate::engine::LadderEngine) the engine owns it and evolves
//! it across quotes; callers read it back through the engine.

pub mod level;
pub mod book;

pub use level::{LadderLevel, MarketScale, RawLevel};
pub use book::Ladder;
