//! Portfolio revaluation under hypothetical spot moves.
//!
//! A scenario moves each held currency's spot rate by a whole number of its
//! own volatilities and revalues the portfolio one day later. Profit is
//! reported per currency in the base currency, plus a total.

use crate::core::currency::CurrencyCode;
use crate::core::market::{MarketError, MarketSnapshot};
use crate::core::position::Position;
use crate::simulation::search::extremeness;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Per-currency net value of a portfolio, in the base currency.
pub type Valuation = BTreeMap<CurrencyCode, f64>;

/// Key under which the summed profit appears in serialized results.
pub const TOTAL_KEY: &str = "Total";

/// Errors arising from scenario evaluation.
#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error(transparent)]
    Market(#[from] MarketError),
    #[error("no move given for held currency {0}")]
    MissingMove(CurrencyCode),
}

/// Standardized move per currency, in multiples of that currency's volatility.
///
/// # Examples
///
/// ```
/// use fx_stress::simulation::scenario::MoveVector;
///
/// let moves = MoveVector::from_pairs([("GBP", 3.0), ("JPY", -1.0)]);
/// assert_eq!(moves.get(&"gbp".into()), Some(3.0));
/// assert_eq!(moves.extremeness(), 4.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveVector(BTreeMap<CurrencyCode, f64>);

impl MoveVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<S: AsRef<str>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        pairs
            .into_iter()
            .map(|(code, z)| (CurrencyCode::new(code), z))
            .collect()
    }

    pub fn insert(&mut self, currency: CurrencyCode, z: f64) {
        self.0.insert(currency, z);
    }

    pub fn get(&self, currency: &CurrencyCode) -> Option<f64> {
        self.0.get(currency).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, f64)> {
        self.0.iter().map(|(c, z)| (c, *z))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of absolute moves.
    pub fn extremeness(&self) -> f64 {
        let values: Vec<f64> = self.0.values().copied().collect();
        extremeness(&values)
    }
}

impl FromIterator<(CurrencyCode, f64)> for MoveVector {
    fn from_iter<T: IntoIterator<Item = (CurrencyCode, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Overnight profit per held currency plus the total, in the base currency.
///
/// Serializes as a single flat map with an extra `"Total"` key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    #[serde(flatten)]
    pub by_currency: BTreeMap<CurrencyCode, f64>,
    #[serde(rename = "Total")]
    pub total: f64,
}

impl ScenarioResult {
    pub fn from_profits(by_currency: BTreeMap<CurrencyCode, f64>) -> Self {
        let total = by_currency.values().fold(0.0, |acc, p| acc + p);
        Self { by_currency, total }
    }

    /// Profit for a currency code, or the total for `"Total"`.
    pub fn get(&self, key: &str) -> Option<f64> {
        if key == TOTAL_KEY {
            Some(self.total)
        } else {
            self.by_currency.get(&CurrencyCode::new(key)).copied()
        }
    }
}

/// Values a portfolio against one market snapshot.
///
/// Borrows both the positions and the market data; neither is modified.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fx_stress::prelude::*;
///
/// let positions = vec![Position::spot(100.0, "GBP"), Position::spot(10_000.0, "JPY")];
/// let market = MarketSnapshot::new(NaiveDate::from_ymd_opt(2019, 4, 1).unwrap())
///     .with_currency("GBP", 1.5, 0.1, 0.03)
///     .with_currency("JPY", 100.0, 0.1, 0.0)
///     .with_rate("USD", 0.02);
///
/// let engine = ScenarioEngine::new(&positions, &market);
/// let profit = engine
///     .profit(&MoveVector::from_pairs([("GBP", 0.0), ("JPY", 0.0)]))
///     .unwrap();
/// assert_eq!(profit.total, 0.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScenarioEngine<'a> {
    positions: &'a [Position],
    market: &'a MarketSnapshot,
}

impl<'a> ScenarioEngine<'a> {
    pub fn new(positions: &'a [Position], market: &'a MarketSnapshot) -> Self {
        Self { positions, market }
    }

    pub fn positions(&self) -> &'a [Position] {
        self.positions
    }

    pub fn market(&self) -> &'a MarketSnapshot {
        self.market
    }

    /// Distinct currencies held, in sorted order.
    pub fn held_currencies(&self) -> BTreeSet<CurrencyCode> {
        self.positions.iter().map(|p| p.foreign().clone()).collect()
    }

    /// Held currencies other than the base currency.
    pub fn risk_currencies(&self) -> Vec<CurrencyCode> {
        self.held_currencies()
            .into_iter()
            .filter(|c| *c != self.market.base)
            .collect()
    }

    /// Net value per held currency given `spots`, priced `date_offset_days`
    /// after the snapshot's valuation date.
    ///
    /// Volatilities and rates always come from the snapshot. Any missing
    /// spot, volatility or rate for a held currency is an error.
    pub fn compute_valuation(
        &self,
        spots: &BTreeMap<CurrencyCode, f64>,
        date_offset_days: u64,
    ) -> Result<Valuation, ScenarioError> {
        let date = self.market.date_after(date_offset_days)?;
        let domestic_rate = self.market.base_rate()?;

        self.positions
            .iter()
            .try_fold(Valuation::new(), |mut values, position| {
                let currency = position.foreign();
                let spot = spots
                    .get(currency)
                    .copied()
                    .ok_or_else(|| MarketError::MissingSpot(currency.clone()))?;
                let value = position.price(
                    spot,
                    date,
                    self.market.volatility(currency)?,
                    domestic_rate,
                    self.market.rate(currency)?,
                );
                *values.entry(currency.clone()).or_insert(0.0) += value;
                Ok::<_, ScenarioError>(values)
            })
    }

    /// Today's valuation at the snapshot spot rates.
    pub fn valuation_today(&self) -> Result<Valuation, ScenarioError> {
        self.compute_valuation(&self.market.spots, 0)
    }

    /// Overnight profit if each held currency moves by `moves[c]` volatilities.
    pub fn profit(&self, moves: &MoveVector) -> Result<ScenarioResult, ScenarioError> {
        let today = self.valuation_today()?;
        self.profit_against(&today, moves)
    }

    /// Same as [`profit`](Self::profit), reusing an already computed
    /// valuation for today.
    pub fn profit_against(
        &self,
        today: &Valuation,
        moves: &MoveVector,
    ) -> Result<ScenarioResult, ScenarioError> {
        let mut tomorrow_spots = BTreeMap::new();
        for currency in today.keys() {
            let z = moves
                .get(currency)
                .ok_or_else(|| ScenarioError::MissingMove(currency.clone()))?;
            let spot = self.market.spot(currency)?;
            let volatility = self.market.volatility(currency)?;
            tomorrow_spots.insert(currency.clone(), spot * (1.0 + z * volatility));
        }

        let tomorrow = self.compute_valuation(&tomorrow_spots, 1)?;

        // Both valuations cover exactly the held currencies, in the same order.
        let profits = today
            .iter()
            .zip(tomorrow.values())
            .map(|((currency, before), after)| (currency.clone(), after - before))
            .collect();
        let result = ScenarioResult::from_profits(profits);
        debug!("moves {:?} -> total {:.2}", moves, result.total);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::position::OptionType;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 4, 1).unwrap()
    }

    fn market() -> MarketSnapshot {
        MarketSnapshot::new(today())
            .with_currency("GBP", 1.5, 0.1, 0.03)
            .with_currency("JPY", 100.0, 0.1, 0.0)
            .with_rate("USD", 0.02)
    }

    fn spot_book() -> Vec<Position> {
        vec![Position::spot(100.0, "GBP"), Position::spot(10_000.0, "JPY")]
    }

    #[test]
    fn test_valuation_per_currency() {
        let positions = spot_book();
        let market = market();
        let engine = ScenarioEngine::new(&positions, &market);
        let values = engine.valuation_today().unwrap();
        assert_eq!(values[&CurrencyCode::new("GBP")], 150.0);
        assert_eq!(values[&CurrencyCode::new("JPY")], 100.0);
    }

    #[test]
    fn test_valuation_is_idempotent() {
        let positions = spot_book();
        let market = market();
        let engine = ScenarioEngine::new(&positions, &market);
        let first = engine.compute_valuation(&market.spots, 0).unwrap();
        let second = engine.compute_valuation(&market.spots, 0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_currency_accumulates() {
        let expiry = NaiveDate::from_ymd_opt(2019, 7, 1).unwrap();
        let a = Position::spot(100.0, "GBP");
        let b = Position::option(-40.0, "GBP", OptionType::Call, 1.5, expiry);
        let market = market();

        let both = vec![a.clone(), b.clone()];
        let combined = ScenarioEngine::new(&both, &market).valuation_today().unwrap();

        let only_a = vec![a];
        let only_b = vec![b];
        let va = ScenarioEngine::new(&only_a, &market).valuation_today().unwrap();
        let vb = ScenarioEngine::new(&only_b, &market).valuation_today().unwrap();

        let gbp = CurrencyCode::new("GBP");
        assert_eq!(combined.len(), 1);
        assert_relative_eq!(combined[&gbp], va[&gbp] + vb[&gbp]);
    }

    #[test]
    fn test_zero_moves_zero_profit_for_spot() {
        let positions = spot_book();
        let market = market();
        let engine = ScenarioEngine::new(&positions, &market);
        let result = engine
            .profit(&MoveVector::from_pairs([("GBP", 0.0), ("JPY", 0.0)]))
            .unwrap();
        assert_eq!(result.get("GBP"), Some(0.0));
        assert_eq!(result.get("JPY"), Some(0.0));
        assert_eq!(result.get(TOTAL_KEY), Some(0.0));
    }

    #[test]
    fn test_one_sigma_move() {
        let positions = spot_book();
        let market = market();
        let engine = ScenarioEngine::new(&positions, &market);
        let result = engine
            .profit(&MoveVector::from_pairs([("GBP", 1.0), ("JPY", 1.0)]))
            .unwrap();
        // GBP: 100 * 1.65 - 150; JPY: 10,000 / 110 - 100
        assert_relative_eq!(result.get("GBP").unwrap(), 15.0, epsilon = 1e-9);
        assert_relative_eq!(
            result.get("JPY").unwrap(),
            10_000.0 / 110.0 - 100.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            result.total,
            result.get("GBP").unwrap() + result.get("JPY").unwrap()
        );
    }

    #[test]
    fn test_missing_move_is_error() {
        let positions = spot_book();
        let market = market();
        let engine = ScenarioEngine::new(&positions, &market);
        let err = engine
            .profit(&MoveVector::from_pairs([("GBP", 1.0)]))
            .unwrap_err();
        assert_eq!(err, ScenarioError::MissingMove(CurrencyCode::new("JPY")));
    }

    #[test]
    fn test_missing_market_data_is_error() {
        let positions = vec![Position::spot(1.0, "CHF")];
        let market = market();
        let engine = ScenarioEngine::new(&positions, &market);
        assert_eq!(
            engine.valuation_today().unwrap_err(),
            ScenarioError::Market(MarketError::MissingSpot(CurrencyCode::new("CHF")))
        );
    }

    #[test]
    fn test_missing_base_rate_is_error() {
        let positions = spot_book();
        let mut market = market();
        market.rates.remove(&CurrencyCode::base());
        let engine = ScenarioEngine::new(&positions, &market);
        assert_eq!(
            engine.valuation_today().unwrap_err(),
            ScenarioError::Market(MarketError::MissingRate(CurrencyCode::base()))
        );
    }

    #[test]
    fn test_result_serializes_flat_with_total() {
        let result = ScenarioResult::from_profits(
            [(CurrencyCode::new("GBP"), -2.5), (CurrencyCode::new("JPY"), 1.0)]
                .into_iter()
                .collect(),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["GBP"], -2.5);
        assert_eq!(json["JPY"], 1.0);
        assert_eq!(json["Total"], -1.5);
    }

    #[test]
    fn test_risk_currencies_exclude_base() {
        let positions = vec![
            Position::spot(1.0, "JPY"),
            Position::spot(1.0, "USD"),
            Position::spot(1.0, "EUR"),
            Position::spot(2.0, "JPY"),
        ];
        let market = market();
        let engine = ScenarioEngine::new(&positions, &market);
        assert_eq!(
            engine.risk_currencies(),
            vec![CurrencyCode::new("EUR"), CurrencyCode::new("JPY")]
        );
        assert_eq!(engine.held_currencies().len(), 3);
    }

    #[test]
    fn test_zero_move_option_profit_is_one_day_decay() {
        let expiry = NaiveDate::from_ymd_opt(2019, 7, 1).unwrap();
        let call = Position::option(1_000_000.0, "GBP", OptionType::Call, 1.5, expiry);
        let tomorrow = today().succ_opt().unwrap();
        let expected = call.price(1.5, tomorrow, 0.1, 0.02, 0.03)
            - call.price(1.5, today(), 0.1, 0.02, 0.03);

        let positions = vec![call];
        let market = market();
        let engine = ScenarioEngine::new(&positions, &market);
        let result = engine.profit(&MoveVector::from_pairs([("GBP", 0.0)])).unwrap();

        assert!(expected < 0.0);
        assert_relative_eq!(result.get("GBP").unwrap(), expected, max_relative = 1e-12);
        assert_relative_eq!(result.total, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_negative_volatility_is_error() {
        let positions = vec![Position::spot(100.0, "GBP")];
        let market = MarketSnapshot::new(today())
            .with_currency("GBP", 1.5, -0.1, 0.03)
            .with_rate("USD", 0.02);
        let engine = ScenarioEngine::new(&positions, &market);
        let err = engine
            .profit(&MoveVector::from_pairs([("GBP", 1.0)]))
            .unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::Market(MarketError::NegativeVolatility { .. })
        ));
    }
}
