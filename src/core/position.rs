use crate::core::currency::{CurrencyCode, CurrencyPair};
use crate::pricing::garman_kohlhagen::fx_option_price;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Call or put on the foreign currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Parse a call/put indicator from its first character.
    ///
    /// `c` or `C` means call; anything else, including an empty string, is a put.
    ///
    /// ```
    /// use fx_stress::core::position::OptionType;
    ///
    /// assert_eq!(OptionType::parse("Call"), OptionType::Call);
    /// assert_eq!(OptionType::parse("p"), OptionType::Put);
    /// assert_eq!(OptionType::parse("x"), OptionType::Put);
    /// ```
    pub fn parse(indicator: &str) -> Self {
        match indicator.chars().next() {
            Some('c') | Some('C') => OptionType::Call,
            _ => OptionType::Put,
        }
    }

    pub fn is_call(self) -> bool {
        self == OptionType::Call
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

/// What a position holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PositionKind {
    /// Foreign currency held outright.
    Spot,
    /// European option on the foreign currency.
    Option {
        option_type: OptionType,
        /// Exercise rate, in the market quoting convention of the pair.
        strike: f64,
        expiration: NaiveDate,
    },
}

/// A single holding of foreign currency, valued in a domestic currency.
///
/// `quantity` is in units of the foreign currency; negative means short.
/// Positions are immutable once built.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fx_stress::core::position::Position;
///
/// let today = NaiveDate::from_ymd_opt(2019, 4, 1).unwrap();
///
/// // 100 pounds at 1.50 dollars per pound
/// let gbp = Position::spot(100.0, "gbp");
/// assert_eq!(gbp.price(1.5, today, 0.1, 0.02, 0.03), 150.0);
///
/// // 10,000 yen at 100 yen per dollar
/// let jpy = Position::spot(10_000.0, "JPY");
/// assert_eq!(jpy.price(100.0, today, 0.1, 0.02, 0.0), 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    quantity: f64,
    pair: CurrencyPair,
    kind: PositionKind,
}

impl Position {
    /// Spot holding valued in the base currency.
    pub fn spot(quantity: f64, foreign: impl AsRef<str>) -> Self {
        Self::spot_in(quantity, foreign, CurrencyCode::base().as_str())
    }

    pub fn spot_in(quantity: f64, foreign: impl AsRef<str>, domestic: impl AsRef<str>) -> Self {
        Self {
            quantity,
            pair: CurrencyPair::new(CurrencyCode::new(foreign), CurrencyCode::new(domestic)),
            kind: PositionKind::Spot,
        }
    }

    /// Option position valued in the base currency.
    pub fn option(
        quantity: f64,
        foreign: impl AsRef<str>,
        option_type: OptionType,
        strike: f64,
        expiration: NaiveDate,
    ) -> Self {
        Self::option_in(
            quantity,
            foreign,
            CurrencyCode::base().as_str(),
            option_type,
            strike,
            expiration,
        )
    }

    pub fn option_in(
        quantity: f64,
        foreign: impl AsRef<str>,
        domestic: impl AsRef<str>,
        option_type: OptionType,
        strike: f64,
        expiration: NaiveDate,
    ) -> Self {
        Self {
            quantity,
            pair: CurrencyPair::new(CurrencyCode::new(foreign), CurrencyCode::new(domestic)),
            kind: PositionKind::Option {
                option_type,
                strike,
                expiration,
            },
        }
    }

    // --- Accessors ---

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn foreign(&self) -> &CurrencyCode {
        &self.pair.foreign
    }

    pub fn domestic(&self) -> &CurrencyCode {
        &self.pair.domestic
    }

    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    pub fn kind(&self) -> &PositionKind {
        &self.kind
    }

    pub fn is_option(&self) -> bool {
        matches!(self.kind, PositionKind::Option { .. })
    }

    /// Value of the whole position in domestic currency.
    ///
    /// `spot` is in the market quoting convention of the pair. Spot holdings
    /// ignore the volatility and rates. Options with zero quantity are worth
    /// zero without consulting the pricing model. A zero spot on an inverted
    /// pair yields an infinite or NaN value.
    pub fn price(
        &self,
        spot: f64,
        valuation_date: NaiveDate,
        volatility: f64,
        domestic_rate: f64,
        foreign_rate: f64,
    ) -> f64 {
        let quoted_in_domestic = self.pair.is_quoted_in_domestic();
        match &self.kind {
            PositionKind::Spot => {
                if quoted_in_domestic {
                    self.quantity * spot
                } else {
                    self.quantity * (1.0 / spot)
                }
            }
            PositionKind::Option {
                option_type,
                strike,
                expiration,
            } => {
                if self.quantity == 0.0 {
                    return 0.0;
                }
                let (spot, strike) = if quoted_in_domestic {
                    (spot, *strike)
                } else {
                    (1.0 / spot, 1.0 / strike)
                };
                let unit_price = fx_option_price(
                    option_type.is_call(),
                    strike,
                    *expiration,
                    valuation_date,
                    spot,
                    volatility,
                    domestic_rate,
                    foreign_rate,
                );
                self.quantity * unit_price
            }
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PositionKind::Spot => {
                write!(f, "{} {} spot ({})", self.quantity, self.pair.foreign, self.pair)
            }
            PositionKind::Option {
                option_type,
                strike,
                expiration,
            } => write!(
                f,
                "{} {} {} @ {} exp {} ({})",
                self.quantity, self.pair.foreign, option_type, strike, expiration, self.pair
            ),
        }
    }
}
