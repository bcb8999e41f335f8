//! Options on a currency quoted the other way round.
//!
//! Dollar/yen is quoted in yen per dollar, so a yen option's spot and strike
//! are inverted before pricing. A yen call gains when the dollar/yen rate falls.

use chrono::NaiveDate;
use fx_stress::core::currency::{quoting_convention, CurrencyCode};
use fx_stress::core::market::MarketSnapshot;
use fx_stress::core::position::{OptionType, Position};
use fx_stress::simulation::scenario::{MoveVector, ScenarioEngine};

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║   fx-stress: Inverted Quoting Example    ║");
    println!("╚══════════════════════════════════════════╝\n");

    let usd = CurrencyCode::base();
    for code in ["GBP", "EUR", "JPY", "CHF"] {
        let foreign = CurrencyCode::new(code);
        println!(
            "  {}/{} quoted per unit of {}",
            foreign,
            usd,
            quoting_convention(&foreign, &usd)
        );
    }
    println!();

    let today = NaiveDate::from_ymd_opt(2019, 4, 1).unwrap();
    let expiry = NaiveDate::from_ymd_opt(2019, 7, 1).unwrap();
    let market = MarketSnapshot::new(today)
        .with_currency("JPY", 111.0, 0.07, -0.001)
        .with_rate("USD", 0.024);

    let call = Position::option(1_000_000_000.0, "JPY", OptionType::Call, 111.0, expiry);
    println!(
        "  Value of {}: ${:.2}\n",
        call,
        call.price(111.0, today, 0.07, 0.024, -0.001)
    );

    let positions = vec![call];
    let engine = ScenarioEngine::new(&positions, &market);

    println!("━━━ Overnight Profit by Move ━━━\n");
    for z in [-3.0, -1.0, 0.0, 1.0, 3.0] {
        let result = engine
            .profit(&MoveVector::from_pairs([("JPY", z)]))
            .expect("market data is complete");
        println!("  {:+} sd  →  ${:>14.2}", z, result.total);
    }
}
