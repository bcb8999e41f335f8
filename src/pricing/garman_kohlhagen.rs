//! Garman-Kohlhagen pricing for European FX options.
//!
//! This is the single pricing model behind every option position. Prices are
//! returned in domestic currency for one unit of foreign notional, with
//! `strike` and `spot` both quoted as domestic units per foreign unit.

use chrono::{Months, NaiveDate};
use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

/// Days per year for the fractional part of a term.
const DAYS_PER_YEAR: f64 = 365.0;

/// Standard normal cumulative distribution function.
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Fractional number of years between two dates, in either order.
///
/// Whole calendar years are stepped off first; the remainder counts as
/// days / 365, so a leap day never makes the fraction exceed one year.
/// A Feb 29 anniversary lands on Feb 28.
pub fn years_apart(a: NaiveDate, b: NaiveDate) -> f64 {
    let (mut start, end) = if a > b { (b, a) } else { (a, b) };
    let mut years = 0.0;
    while let Some(next) = start.checked_add_months(Months::new(12)) {
        if next > end {
            break;
        }
        start = next;
        years += 1.0;
    }
    years + (end - start).num_days() as f64 / DAYS_PER_YEAR
}

/// Continuous discount factor: `present_value = future_value * discount(rate, term)`.
pub fn discount(rate: f64, term: f64) -> f64 {
    (-rate * term).exp()
}

pub fn d1(
    strike: f64,
    term: f64,
    spot: f64,
    volatility: f64,
    domestic_rate: f64,
    foreign_rate: f64,
) -> f64 {
    let numerator = (spot / strike).ln()
        + (domestic_rate - foreign_rate + volatility * volatility / 2.0) * term;
    numerator / (volatility * term.sqrt())
}

pub fn d2(term: f64, volatility: f64, d1: f64) -> f64 {
    d1 - volatility * term.sqrt()
}

/// Fair value of a European currency option.
///
/// * `call` - true for a call on the foreign currency, false for a put
/// * `strike` - domestic units per foreign unit exchanged on exercise
/// * `expiration` - date the exchange would take place if exercised
/// * `valuation_date` - date of valuation
/// * `spot` - market rate on `valuation_date`, same units as `strike`
/// * `volatility` - annualized standard deviation of log returns of the foreign currency
/// * `domestic_rate`, `foreign_rate` - annualized rates from valuation to expiration
///
/// Returns the option value in domestic currency for one unit of foreign currency.
/// An option at or past expiration is worth its intrinsic value; with zero
/// volatility it is worth its discounted forward intrinsic value.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fx_stress::pricing::garman_kohlhagen::fx_option_price;
///
/// let expiry = NaiveDate::from_ymd_opt(2019, 7, 1).unwrap();
/// let today = NaiveDate::from_ymd_opt(2019, 4, 1).unwrap();
/// let call = fx_option_price(true, 152.0, expiry, today, 150.0, 0.13, 0.03, 0.04);
/// assert!((call - 2.8110445343).abs() < 1e-8);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn fx_option_price(
    call: bool,
    strike: f64,
    expiration: NaiveDate,
    valuation_date: NaiveDate,
    spot: f64,
    volatility: f64,
    domestic_rate: f64,
    foreign_rate: f64,
) -> f64 {
    if expiration <= valuation_date {
        return intrinsic(call, spot, strike);
    }

    let term = years_apart(valuation_date, expiration);
    let disc_spot = spot * discount(foreign_rate, term);
    let disc_strike = strike * discount(domestic_rate, term);

    if volatility <= 0.0 {
        return intrinsic(call, disc_spot, disc_strike);
    }

    let d1 = d1(strike, term, spot, volatility, domestic_rate, foreign_rate);
    let d2 = d2(term, volatility, d1);

    if call {
        disc_spot * norm_cdf(d1) - disc_strike * norm_cdf(d2)
    } else {
        disc_strike * norm_cdf(-d2) - disc_spot * norm_cdf(-d1)
    }
}

fn intrinsic(call: bool, spot: f64, strike: f64) -> f64 {
    if call {
        (spot - strike).max(0.0)
    } else {
        (strike - spot).max(0.0)
    }
}
