use crate::core::currency::{CurrencyCode, BASE_CURRENCY};
use crate::core::position::{OptionType, Position};
use chrono::{Days, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Default option tenor for positions loaded from market records (3 months).
pub const DEFAULT_OPTION_TENOR_DAYS: u64 = 91;

/// Errors arising from market data lookups.
#[derive(Debug, Error, PartialEq)]
pub enum MarketError {
    #[error("no spot rate for {0}")]
    MissingSpot(CurrencyCode),
    #[error("no volatility for {0}")]
    MissingVolatility(CurrencyCode),
    #[error("no interest rate for {0}")]
    MissingRate(CurrencyCode),
    #[error("volatility must be non-negative, got {volatility} for {currency}")]
    NegativeVolatility {
        currency: CurrencyCode,
        volatility: f64,
    },
    #[error("valuation date {0} cannot be advanced by {1} days")]
    DateOutOfRange(NaiveDate, u64),
    #[error("base currency must be {base}, got {0}", base = BASE_CURRENCY)]
    UnsupportedBase(CurrencyCode),
}

/// Market conditions on one valuation date.
///
/// Spot rates use the market quoting convention of each currency against the
/// base currency. Volatilities and rates are annualized. The base currency must
/// have an entry in `rates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub base: CurrencyCode,
    pub valuation_date: NaiveDate,
    pub spots: BTreeMap<CurrencyCode, f64>,
    pub volatilities: BTreeMap<CurrencyCode, f64>,
    pub rates: BTreeMap<CurrencyCode, f64>,
}

impl MarketSnapshot {
    /// Empty snapshot in the base currency.
    pub fn new(valuation_date: NaiveDate) -> Self {
        Self {
            base: CurrencyCode::base(),
            valuation_date,
            spots: BTreeMap::new(),
            volatilities: BTreeMap::new(),
            rates: BTreeMap::new(),
        }
    }

    /// Record spot, volatility and rate for one currency.
    ///
    /// Values are stored as given; a negative volatility is reported when it
    /// is looked up through [`MarketSnapshot::volatility`].
    pub fn with_currency(
        mut self,
        currency: impl AsRef<str>,
        spot: f64,
        volatility: f64,
        rate: f64,
    ) -> Self {
        let code = CurrencyCode::new(currency);
        self.spots.insert(code.clone(), spot);
        self.volatilities.insert(code.clone(), volatility);
        self.rates.insert(code, rate);
        self
    }

    /// Record only an interest rate (typically for the base currency).
    pub fn with_rate(mut self, currency: impl AsRef<str>, rate: f64) -> Self {
        self.rates.insert(CurrencyCode::new(currency), rate);
        self
    }

    pub fn spot(&self, currency: &CurrencyCode) -> Result<f64, MarketError> {
        self.spots
            .get(currency)
            .copied()
            .ok_or_else(|| MarketError::MissingSpot(currency.clone()))
    }

    pub fn volatility(&self, currency: &CurrencyCode) -> Result<f64, MarketError> {
        let volatility = self
            .volatilities
            .get(currency)
            .copied()
            .ok_or_else(|| MarketError::MissingVolatility(currency.clone()))?;
        if volatility < 0.0 {
            return Err(MarketError::NegativeVolatility {
                currency: currency.clone(),
                volatility,
            });
        }
        Ok(volatility)
    }

    pub fn rate(&self, currency: &CurrencyCode) -> Result<f64, MarketError> {
        self.rates
            .get(currency)
            .copied()
            .ok_or_else(|| MarketError::MissingRate(currency.clone()))
    }

    pub fn base_rate(&self) -> Result<f64, MarketError> {
        self.rate(&self.base)
    }

    /// The valuation date moved forward by `days`.
    pub fn date_after(&self, days: u64) -> Result<NaiveDate, MarketError> {
        self.valuation_date
            .checked_add_days(Days::new(days))
            .ok_or(MarketError::DateOutOfRange(self.valuation_date, days))
    }
}

/// One row of market data and position sizes for a currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRecord {
    pub currency: CurrencyCode,
    /// Spot rate in market quoting convention against the base currency.
    pub spot: f64,
    /// 3-month annualized volatility.
    pub volatility: f64,
    /// 3-month annualized interest rate.
    pub rate: f64,
    #[serde(default)]
    pub spot_position: f64,
    #[serde(default)]
    pub call_position: f64,
    #[serde(default)]
    pub put_position: f64,
    /// Option strike; at-the-money (the spot rate) when absent.
    #[serde(default)]
    pub strike: Option<f64>,
}

/// Already-parsed portfolio file: market rows plus a few global settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioInput {
    /// Must be the base currency; cross-currency books are not supported.
    #[serde(default = "CurrencyCode::base")]
    pub base_currency: CurrencyCode,
    /// Valuation date; the caller's "today" when absent.
    #[serde(default)]
    pub valuation_date: Option<NaiveDate>,
    #[serde(default = "default_tenor")]
    pub option_tenor_days: u64,
    pub records: Vec<MarketRecord>,
}

fn default_tenor() -> u64 {
    DEFAULT_OPTION_TENOR_DAYS
}

impl PortfolioInput {
    /// Build the market snapshot and position list.
    ///
    /// Each non-zero quantity becomes one position: a spot holding, a call
    /// and a put, all valued in the base currency. The base currency row only
    /// supplies its interest rate. Any `base_currency` other than the base
    /// currency is rejected.
    pub fn into_parts(
        self,
        today: NaiveDate,
    ) -> Result<(MarketSnapshot, Vec<Position>), MarketError> {
        if !self.base_currency.is_base() {
            return Err(MarketError::UnsupportedBase(self.base_currency));
        }
        let valuation_date = self.valuation_date.unwrap_or(today);
        let mut market = MarketSnapshot::new(valuation_date);
        market.base = self.base_currency.clone();
        let expiration = market.date_after(self.option_tenor_days)?;
        let mut positions = Vec::new();

        for record in self.records {
            if record.volatility < 0.0 {
                return Err(MarketError::NegativeVolatility {
                    currency: record.currency,
                    volatility: record.volatility,
                });
            }
            let code = record.currency.clone();
            market.rates.insert(code.clone(), record.rate);

            if code == market.base {
                if record.spot_position != 0.0
                    || record.call_position != 0.0
                    || record.put_position != 0.0
                {
                    warn!("ignoring positions held in base currency {}", code);
                }
                continue;
            }

            market.spots.insert(code.clone(), record.spot);
            market.volatilities.insert(code.clone(), record.volatility);

            let domestic = market.base.as_str();
            let strike = record.strike.unwrap_or(record.spot);
            if record.spot_position != 0.0 {
                positions.push(Position::spot_in(record.spot_position, code.as_str(), domestic));
            }
            for (quantity, option_type) in [
                (record.call_position, OptionType::Call),
                (record.put_position, OptionType::Put),
            ] {
                if quantity != 0.0 {
                    positions.push(Position::option_in(
                        quantity,
                        code.as_str(),
                        domestic,
                        option_type,
                        strike,
                        expiration,
                    ));
                }
            }
        }

        if !market.rates.contains_key(&market.base) {
            return Err(MarketError::MissingRate(market.base.clone()));
        }

        Ok((market, positions))
    }
}
