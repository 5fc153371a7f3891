//! Markets command implementation.

use crate::display;
use anyhow::Result;
use margin_screen::{MarketRegistry, ScreenerConfig};

/// List the markets in the registry.
pub(crate) fn list_markets(config: &ScreenerConfig) -> Result<()> {
    let registry = MarketRegistry::load(config.markets_path())?;

    display::banner("Markets");
    println!("{:<34} {:<10} {:<8}", "Market", "Code", "Suffix");
    println!("{}", "─".repeat(54));
    for market in registry.iter() {
        println!(
            "{:<34} {:<10} {:<8}",
            market.name,
            market.code(),
            market.info.suffix.as_deref().unwrap_or("-")
        );
    }
    println!();
    println!("Ticker lists are read from {}", config.ticker_list_path("<CODE>").display());
    println!();
    Ok(())
}
