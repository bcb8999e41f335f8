use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The reference currency all profit and loss is reported in.
pub const BASE_CURRENCY: &str = "USD";

/// Currencies quoted as "base units per one unit of this currency" against
/// the base currency (e.g. 1.49 dollars per pound).
pub const INVERSE_QUOTED: [&str; 4] = ["GBP", "EUR", "AUD", "NZD"];

/// Three-letter currency identifier.
///
/// Input is case-insensitive and surrounding whitespace is trimmed; the code
/// is always stored uppercase.
/// No validation against an ISO list is performed.
///
/// # Examples
///
/// ```
/// use fx_stress::core::currency::CurrencyCode;
///
/// let gbp = CurrencyCode::new("gbp");
/// assert_eq!(gbp.as_str(), "GBP");
/// assert_eq!(gbp, CurrencyCode::new("GBP"));
/// assert_eq!(CurrencyCode::new(" jpy ").as_str(), "JPY");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_uppercase())
    }

    /// The base (reporting) currency.
    pub fn base() -> Self {
        Self::new(BASE_CURRENCY)
    }

    pub fn is_base(&self) -> bool {
        self.0 == BASE_CURRENCY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Returns the currency whose amount is expressed per one unit of the other
/// in standard market quoting.
///
/// Against the base currency, everything except [`INVERSE_QUOTED`] is quoted
/// in foreign units per base unit (103 yen per dollar), so the convention
/// currency is `foreign`. Otherwise it is `domestic`.
///
/// Only pairs against the base currency are modelled. For crosses where
/// neither side is the base currency this always answers `domestic`, which is
/// not the real market convention for many crosses.
///
/// # Examples
///
/// ```
/// use fx_stress::core::currency::{quoting_convention, CurrencyCode};
///
/// let usd = CurrencyCode::new("USD");
/// assert_eq!(quoting_convention(&CurrencyCode::new("GBP"), &usd), usd);
/// assert_eq!(
///     quoting_convention(&CurrencyCode::new("JPY"), &usd),
///     CurrencyCode::new("JPY"),
/// );
/// ```
pub fn quoting_convention(foreign: &CurrencyCode, domestic: &CurrencyCode) -> CurrencyCode {
    if domestic.is_base() && !INVERSE_QUOTED.contains(&foreign.as_str()) {
        foreign.clone()
    } else {
        domestic.clone()
    }
}

/// A held (foreign) currency valued in a domestic currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub foreign: CurrencyCode,
    pub domestic: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(foreign: CurrencyCode, domestic: CurrencyCode) -> Self {
        Self { foreign, domestic }
    }

    pub fn convention(&self) -> CurrencyCode {
        quoting_convention(&self.foreign, &self.domestic)
    }

    /// True when market rates for this pair are domestic units per foreign unit.
    pub fn is_quoted_in_domestic(&self) -> bool {
        self.convention() == self.domestic
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.foreign, self.domestic)
    }
}
