//! Worst-case overnight scenario for a small multi-currency book.
//!
//! Values a mixed spot and option portfolio, then searches every
//! combination of -3/-1/0/+1/+3 standard-deviation moves.

use chrono::NaiveDate;
use fx_stress::core::market::MarketSnapshot;
use fx_stress::core::position::{OptionType, Position};
use fx_stress::simulation::report::ValuationReport;
use fx_stress::simulation::scenario::ScenarioEngine;
use fx_stress::simulation::search::{ScenarioSearch, SearchConfig};

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  fx-stress: Worst-Case Scenario Example  ║");
    println!("╚══════════════════════════════════════════╝\n");

    let today = NaiveDate::from_ymd_opt(2019, 4, 1).unwrap();
    let expiry = NaiveDate::from_ymd_opt(2019, 7, 1).unwrap();

    let market = MarketSnapshot::new(today)
        .with_currency("GBP", 1.30, 0.08, 0.008)
        .with_currency("EUR", 1.12, 0.06, -0.003)
        .with_currency("JPY", 111.0, 0.07, -0.001)
        .with_rate("USD", 0.024);

    let positions = vec![
        Position::spot(1_000_000.0, "GBP"),
        Position::option(-500_000.0, "GBP", OptionType::Call, 1.30, expiry),
        Position::option(-750_000.0, "EUR", OptionType::Put, 1.12, expiry),
        Position::spot(-50_000_000.0, "JPY"),
        Position::option(100_000_000.0, "JPY", OptionType::Put, 115.0, expiry),
    ];

    println!("━━━ Positions ━━━\n");
    for position in &positions {
        println!("  {}", position);
    }
    println!();

    let engine = ScenarioEngine::new(&positions, &market);
    let report = ValuationReport::from_engine(&engine).expect("market data is complete");
    println!("{}", report);

    println!("━━━ Five Worst Scenarios ━━━\n");
    let ranked = ScenarioSearch::rank(&engine, &SearchConfig::default())
        .expect("market data is complete");
    println!("  {} scenarios evaluated\n", ranked.len());
    for scenario in ranked.iter().take(5) {
        println!("{}", scenario);
    }
}
