//! Exhaustive worst-case search over standardized overnight moves.
//!
//! Every combination of moves drawn from a fixed move set, one per non-base
//! currency, is evaluated. The grid has `|move_set| ^ |currencies|` points, so
//! this is meant for small portfolios of a handful of currencies.

use crate::core::currency::CurrencyCode;
use crate::simulation::scenario::{MoveVector, ScenarioEngine, ScenarioError, ScenarioResult};
use log::{debug, info};
use serde::Serialize;
use std::cmp::Ordering;

/// Sum of absolute standardized moves.
///
/// ```
/// use fx_stress::simulation::search::extremeness;
///
/// assert_eq!(extremeness(&[3.0, -2.0, 0.0, 1.0]), 6.0);
/// ```
pub fn extremeness(moves: &[f64]) -> f64 {
    moves.iter().fold(0.0, |acc, z| acc + z.abs())
}

/// Number of grid points for `currencies` currencies, saturating at `usize::MAX`.
pub fn scenario_count(currencies: usize, move_set_len: usize) -> usize {
    u32::try_from(currencies)
        .ok()
        .and_then(|exp| move_set_len.checked_pow(exp))
        .unwrap_or(usize::MAX)
}

/// Configuration for the scenario grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Standardized moves tried for every currency.
    pub move_set: Vec<f64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            move_set: vec![-3.0, -1.0, 0.0, 1.0, 3.0],
        }
    }
}

/// Cartesian product of a move set over a list of currencies.
///
/// Yields move vectors in odometer order: the last currency changes fastest.
/// With no currencies there is exactly one, empty, vector.
#[derive(Debug, Clone)]
pub struct MoveGrid {
    currencies: Vec<CurrencyCode>,
    move_set: Vec<f64>,
    digits: Vec<usize>,
    done: bool,
}

impl MoveGrid {
    pub fn new(currencies: Vec<CurrencyCode>, move_set: Vec<f64>) -> Self {
        let done = move_set.is_empty() && !currencies.is_empty();
        Self {
            digits: vec![0; currencies.len()],
            currencies,
            move_set,
            done,
        }
    }

    pub fn len(&self) -> usize {
        scenario_count(self.currencies.len(), self.move_set.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Iterator for MoveGrid {
    type Item = MoveVector;

    fn next(&mut self) -> Option<MoveVector> {
        if self.done {
            return None;
        }

        let current = self
            .currencies
            .iter()
            .zip(&self.digits)
            .map(|(c, &d)| (c.clone(), self.move_set[d]))
            .collect();

        // Advance the odometer; wrapping the leftmost digit ends the grid.
        self.done = true;
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if *digit < self.move_set.len() {
                self.done = false;
                break;
            }
            *digit = 0;
        }

        Some(current)
    }
}

/// One evaluated grid point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedScenario {
    /// Total overnight profit in the base currency.
    pub total: f64,
    pub extremeness: f64,
    /// Position of this combination in enumeration order.
    pub index: usize,
    pub moves: MoveVector,
    pub result: ScenarioResult,
}

impl RankedScenario {
    /// Ascending by total profit, then extremeness, then enumeration index.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.total
            .total_cmp(&other.total)
            .then_with(|| self.extremeness.total_cmp(&other.extremeness))
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Brute-force search over the full move grid.
pub struct ScenarioSearch;

impl ScenarioSearch {
    /// Evaluate every grid point and return them worst first.
    ///
    /// Held base-currency positions carry no FX risk and get a zero move.
    /// A NaN total (degenerate market data) sorts after every real number.
    pub fn rank(
        engine: &ScenarioEngine<'_>,
        config: &SearchConfig,
    ) -> Result<Vec<RankedScenario>, ScenarioError> {
        let currencies = engine.risk_currencies();
        let currency_count = currencies.len();
        let base = engine.market().base.clone();
        let holds_base = engine.held_currencies().contains(&base);
        let grid = MoveGrid::new(currencies, config.move_set.clone());
        info!(
            "searching {} scenarios over {} currencies",
            grid.len(),
            currency_count
        );

        let today = engine.valuation_today()?;
        let mut ranked = Vec::with_capacity(grid.len().min(1 << 20));
        for (index, mut moves) in grid.enumerate() {
            let extremeness = moves.extremeness();
            if holds_base {
                moves.insert(base.clone(), 0.0);
            }
            let result = engine.profit_against(&today, &moves)?;
            debug!("scenario {}: total {:.2}", index, result.total);
            ranked.push(RankedScenario {
                total: result.total,
                extremeness,
                index,
                moves,
                result,
            });
        }

        ranked.sort_by(RankedScenario::rank_cmp);
        if let Some(worst) = ranked.first() {
            info!(
                "worst scenario #{}: total {:.2}, extremeness {}",
                worst.index, worst.total, worst.extremeness
            );
        }
        Ok(ranked)
    }

    /// The scenario with the smallest total profit, or `None` for an empty move set.
    pub fn worst(
        engine: &ScenarioEngine<'_>,
        config: &SearchConfig,
    ) -> Result<Option<RankedScenario>, ScenarioError> {
        Ok(Self::rank(engine, config)?.into_iter().next())
    }
}
