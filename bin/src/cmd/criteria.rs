//! Criteria command implementation.

use crate::display;
use anyhow::Result;
use margin_filters::CriteriaRegistry;
use margin_screen::ScreenerConfig;
use margin_traits::Criterion;

/// Show the stored default thresholds with their allowed ranges.
pub(crate) fn show_criteria(config: &ScreenerConfig) -> Result<()> {
    let registry = CriteriaRegistry::new(config.criteria_path());
    let criteria = registry.load()?;

    display::banner("Graham Criteria");
    println!(
        "{:<24} {:<20} {:>10} {:>16}",
        "Criterion", "Flag", "Default", "Range"
    );
    println!("{}", "─".repeat(73));
    for criterion in Criterion::ALL {
        let bounds = criterion.bounds();
        let value = criteria
            .get(criterion)
            .map_or_else(|| "-".to_string(), |v| format!("{v}"));
        println!(
            "{:<24} {:<20} {:>10} {:>16}",
            criterion.label(),
            format!("--{}", criterion.key().replace('_', "-")),
            value,
            format!("{} to {}", bounds.min, bounds.max)
        );
    }
    println!();
    println!("Defaults are read from {}", registry.path().display());
    println!();
    Ok(())
}
