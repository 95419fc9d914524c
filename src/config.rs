//! Engine configuration loaded from TOML.
//!
//! ```toml
//! [amm]
//! reserve_a = 1000
//! reserve_b = 20000
//! fee_bps = 50
//!
//! [ladder]
//! taker_fee_bps = 5
//! rollback_on_failure = false
//! asks = [{ price = "25", size = "10" }]
//! bids = [{ price = "20", size = "10" }]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};
use log::{debug, info};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::engine::{AmmEngine, FailurePolicy, LadderEngine, DEFAULT_AMM_FEE_BPS, DEFAULT_TAKER_FEE_BPS};
use crate::ladder::{Ladder, LadderLevel};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuoterConfig {
    pub amm: AmmConfig,
    pub ladder: LadderConfig,
}

/// Constant-product pool setup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AmmConfig {
    pub reserve_a: u64,
    pub reserve_b: u64,

    #[serde(default = "default_amm_fee_bps")]
    pub fee_bps: u64,
}

/// Ladder setup; levels must already be in price priority
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LadderConfig {
    #[serde(default = "default_taker_fee_bps")]
    pub taker_fee_bps: u64,

    #[serde(default)]
    pub rollback_on_failure: bool,

    #[serde(default)]
    pub asks: Vec<LadderLevel>,

    #[serde(default)]
    pub bids: Vec<LadderLevel>,
}

fn default_amm_fee_bps() -> u64 {
    DEFAULT_AMM_FEE_BPS
}

fn default_taker_fee_bps() -> u64 {
    DEFAULT_TAKER_FEE_BPS
}

impl Default for QuoterConfig {
    /// Pool (1000, 20000) at 50 bp and a three-level ladder at 5 bp
    fn default() -> Self {
        let lvl = |price: i64, size: i64| LadderLevel::new(Decimal::from(price), Decimal::from(size));
        Self {
            amm: AmmConfig {
                reserve_a: 1_000,
                reserve_b: 20_000,
                fee_bps: default_amm_fee_bps(),
            },
            ladder: LadderConfig {
                taker_fee_bps: default_taker_fee_bps(),
                rollback_on_failure: false,
                asks: vec![lvl(25, 10), lvl(30, 5), lvl(35, 2)],
                bids: vec![lvl(20, 10), lvl(15, 5), lvl(10, 2)],
            },
        }
    }
}

impl QuoterConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config_str = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

        let config = Self::parse(&config_str)
            .map_err(|e| anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse(config_str: &str) -> Result<Self> {
        let config: QuoterConfig = toml::from_str(config_str)?;
        debug!(
            "amm reserves=({}, {}) fee={}bp, ladder {} asks / {} bids fee={}bp",
            config.amm.reserve_a,
            config.amm.reserve_b,
            config.amm.fee_bps,
            config.ladder.asks.len(),
            config.ladder.bids.len(),
            config.ladder.taker_fee_bps
        );
        Ok(config)
    }

    /// Build the AMM engine described by `[amm]`
    pub fn amm_engine(&self) -> Result<AmmEngine> {
        Ok(AmmEngine::with_fee_bps(
            self.amm.reserve_a,
            self.amm.reserve_b,
            self.amm.fee_bps,
        )?)
    }

    /// Build the ladder engine described by `[ladder]`
    ///
    /// Fails if the configured levels are not in strict price priority.
    pub fn ladder_engine(&self) -> Result<LadderEngine> {
        let ladder = Ladder::new(self.ladder.asks.clone(), self.ladder.bids.clone());
        if !ladder.is_sorted() {
            return Err(anyhow!("ladder levels must be sorted best price first"));
        }

        let policy = if self.ladder.rollback_on_failure {
            FailurePolicy::Rollback
        } else {
            FailurePolicy::KeepDepleted
        };
        Ok(LadderEngine::new(ladder, self.ladder.taker_fee_bps)?.with_failure_policy(policy))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
