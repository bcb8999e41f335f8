use chrono::NaiveDate;
use fx_stress::core::currency::{quoting_convention, CurrencyCode, INVERSE_QUOTED};
use fx_stress::core::market::MarketSnapshot;
use fx_stress::core::position::{OptionType, Position};
use fx_stress::simulation::scenario::{MoveVector, ScenarioEngine};
use fx_stress::simulation::search::{extremeness, ScenarioSearch, SearchConfig};
use proptest::prelude::*;

fn valuation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 4, 1).unwrap()
}

/// Currencies from both quoting conventions.
fn arb_currency() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["GBP", "EUR", "AUD", "JPY", "CHF", "CAD"])
}

fn arb_quantity() -> impl Strategy<Value = f64> {
    -1_000_000.0..1_000_000.0f64
}

fn arb_option_type() -> impl Strategy<Value = OptionType> {
    prop::sample::select(vec![OptionType::Call, OptionType::Put])
}

fn arb_position() -> impl Strategy<Value = Position> {
    (
        arb_quantity(),
        arb_currency(),
        prop::option::of((arb_option_type(), 0.5..1.5f64, 1u64..365)),
    )
        .prop_map(|(quantity, currency, option)| match option {
            None => Position::spot(quantity, currency),
            Some((option_type, moneyness, days)) => {
                let spot = reference_spot(currency);
                let expiry = valuation_date() + chrono::Days::new(days);
                Position::option(quantity, currency, option_type, spot * moneyness, expiry)
            }
        })
}

fn reference_spot(currency: &str) -> f64 {
    match currency {
        "GBP" => 1.30,
        "EUR" => 1.12,
        "AUD" => 0.71,
        "JPY" => 111.0,
        "CHF" => 0.99,
        _ => 1.33,
    }
}

fn full_market() -> MarketSnapshot {
    ["GBP", "EUR", "AUD", "JPY", "CHF", "CAD"]
        .into_iter()
        .fold(
            MarketSnapshot::new(valuation_date()).with_rate("USD", 0.024),
            |market, code| market.with_currency(code, reference_spot(code), 0.08, 0.01),
        )
}

proptest! {
    // ===================================================================
    // Spot positions are quantity * spot or quantity / spot depending on
    // which side of the pair the market quotes per unit.
    // ===================================================================
    #[test]
    fn spot_price_follows_convention(
        quantity in arb_quantity(),
        currency in arb_currency(),
        spot in 0.01..500.0f64,
    ) {
        let position = Position::spot(quantity, currency);
        let value = position.price(spot, valuation_date(), 0.1, 0.02, 0.01);
        let convention = quoting_convention(position.foreign(), position.domestic());
        if convention == *position.domestic() {
            prop_assert_eq!(value, quantity * spot);
        } else {
            prop_assert_eq!(value, quantity * (1.0 / spot));
        }
    }

    // ===================================================================
    // Inverse-quoted currencies always resolve to the base currency.
    // ===================================================================
    #[test]
    fn inverse_quoted_resolve_to_domestic(index in 0usize..INVERSE_QUOTED.len()) {
        let usd = CurrencyCode::base();
        let foreign = CurrencyCode::new(INVERSE_QUOTED[index].to_lowercase());
        prop_assert_eq!(quoting_convention(&foreign, &usd), usd);
    }

    // ===================================================================
    // Zero-quantity options are worth zero for any inputs, even degenerate.
    // ===================================================================
    #[test]
    fn zero_quantity_option_is_zero(
        currency in arb_currency(),
        option_type in arb_option_type(),
        spot in prop::sample::select(vec![0.0, 1.0, 150.0]),
        volatility in prop::sample::select(vec![0.0, 0.2]),
        rate in prop::sample::select(vec![0.0, 0.05]),
    ) {
        let position = Position::option(0.0, currency, option_type, spot, valuation_date());
        prop_assert_eq!(position.price(spot, valuation_date(), volatility, rate, rate), 0.0);
    }

    // ===================================================================
    // Valuation is additive across positions in the same currency.
    // ===================================================================
    #[test]
    fn valuation_is_additive(a in arb_position(), b in arb_position()) {
        let market = full_market();
        let both = vec![a.clone(), b.clone()];
        let combined = ScenarioEngine::new(&both, &market).valuation_today().unwrap();

        let only_a = vec![a];
        let only_b = vec![b];
        let va = ScenarioEngine::new(&only_a, &market).valuation_today().unwrap();
        let vb = ScenarioEngine::new(&only_b, &market).valuation_today().unwrap();

        for (currency, value) in &combined {
            let expected = va.get(currency).copied().unwrap_or(0.0)
                + vb.get(currency).copied().unwrap_or(0.0);
            prop_assert!((value - expected).abs() <= 1e-9 * expected.abs().max(1.0));
        }
    }

    // ===================================================================
    // Valuation is a pure function of its inputs.
    // ===================================================================
    #[test]
    fn valuation_is_idempotent(positions in prop::collection::vec(arb_position(), 1..8)) {
        let market = full_market();
        let engine = ScenarioEngine::new(&positions, &market);
        prop_assert_eq!(engine.valuation_today().unwrap(), engine.valuation_today().unwrap());
    }

    // ===================================================================
    // The total is the sum of per-currency profits.
    // ===================================================================
    #[test]
    fn total_is_sum_of_currencies(
        positions in prop::collection::vec(arb_position(), 1..8),
        z in -3.0..3.0f64,
    ) {
        let market = full_market();
        let engine = ScenarioEngine::new(&positions, &market);
        let moves: MoveVector = engine
            .held_currencies()
            .into_iter()
            .map(|c| (c, z))
            .collect();
        let result = engine.profit(&moves).unwrap();
        let sum: f64 = result.by_currency.values().sum();
        prop_assert!((result.total - sum).abs() <= 1e-9 * sum.abs().max(1.0));
    }

    // ===================================================================
    // Extremeness is the L1 norm of the move vector.
    // ===================================================================
    #[test]
    fn extremeness_is_l1(moves in prop::collection::vec(-3i32..=3, 0..6)) {
        let as_f64: Vec<f64> = moves.iter().map(|&z| z as f64).collect();
        let expected: i32 = moves.iter().map(|z| z.abs()).sum();
        prop_assert_eq!(extremeness(&as_f64), expected as f64);
    }

    // ===================================================================
    // The search result is sorted and its head is no better than any point.
    // ===================================================================
    #[test]
    fn worst_is_minimum(positions in prop::collection::vec(arb_position(), 1..5)) {
        let market = full_market();
        let engine = ScenarioEngine::new(&positions, &market);
        let config = SearchConfig { move_set: vec![-3.0, 0.0, 3.0] };
        let ranked = ScenarioSearch::rank(&engine, &config).unwrap();
        for pair in ranked.windows(2) {
            let ordered = pair[0].total < pair[1].total
                || (pair[0].total == pair[1].total
                    && (pair[0].extremeness, pair[0].index) < (pair[1].extremeness, pair[1].index));
            prop_assert!(ordered);
        }
    }
}
