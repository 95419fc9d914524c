//! Dark Quoter - Binary Entry Point
//!
//! Runs two sequential AMM quotes and two sequential ladder quotes against
//! the configured engines and prints the results.
//!
//! Usage: `dark-quoter [config.toml]` (built-in scenario when omitted)

use std::env;

use anyhow::Result;
use log::{info, LevelFilter};
use rust_decimal::Decimal;

use dark_quoter::{Direction, QuoterConfig};

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = match env::args().nth(1) {
        Some(path) => QuoterConfig::from_file(path)?,
        None => {
            info!("No config given, using built-in scenario");
            QuoterConfig::default()
        }
    };

    println!("===========================================");
    println!("  Dark Quoter");
    println!("===========================================");
    println!();

    // AMM: base in, then quote back in against the updated pool
    let mut amm = config.amm_engine()?;
    for (amount, direction) in [(10u64, Direction::AToB), (500, Direction::BToA)] {
        let quote = amm.quote(amount, direction)?;
        println!(
            "AMM {:?}: in={} out={} impact={}bp",
            direction, quote.in_amount, quote.out_amount, quote.price_impact_bps
        );
        println!(
            "  reserves: A={} B={}",
            amm.reserves().reserve_a,
            amm.reserves().reserve_b
        );
    }
    println!();

    // Ladder: two buys in a row, the second sees the first's depletion
    let mut ladder = config.ladder_engine()?;
    for amount in [Decimal::from(150), Decimal::from(50)] {
        let quote = ladder.quote(amount, Direction::AToB)?;
        println!(
            "Ladder {:?}: in={} out={} levels={}",
            quote.direction,
            quote.in_amount,
            quote.out_amount.round_dp(8),
            quote.levels_touched
        );
        for level in ladder.ladder().asks() {
            println!("  ask {} x {}", level.price, level.size.round_dp(8));
        }
    }
    println!();
    println!("Ladder state root: {}", ladder.ladder().state_root_hex());

    Ok(())
}
