//! Text summaries of valuations and scenario outcomes.

use crate::simulation::scenario::{ScenarioEngine, ScenarioError, ScenarioResult, Valuation};
use crate::simulation::search::RankedScenario;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Today's per-currency portfolio value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationReport {
    pub valuation_date: NaiveDate,
    pub position_count: usize,
    pub values: Valuation,
    pub total: f64,
}

impl ValuationReport {
    pub fn from_engine(engine: &ScenarioEngine<'_>) -> Result<Self, ScenarioError> {
        let values = engine.valuation_today()?;
        let total = values.values().fold(0.0, |acc, v| acc + v);
        Ok(Self {
            valuation_date: engine.market().valuation_date,
            position_count: engine.positions().len(),
            values,
            total,
        })
    }
}

impl fmt::Display for ValuationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Portfolio Valuation ===")?;
        writeln!(f, "Date:       {}", self.valuation_date)?;
        writeln!(f, "Positions:  {}", self.position_count)?;
        for (currency, value) in &self.values {
            writeln!(f, "  {:<8}{:>18.2}", currency.as_str(), value)?;
        }
        writeln!(f, "  {:<8}{:>18.2}", "Total", self.total)
    }
}

impl fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (currency, profit) in &self.by_currency {
            writeln!(f, "  {:<8}{:>18.2}", currency.as_str(), profit)?;
        }
        writeln!(f, "  {:<8}{:>18.2}", "Total", self.total)
    }
}

impl fmt::Display for RankedScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let moves: Vec<String> = self
            .moves
            .iter()
            .map(|(currency, z)| format!("{}={:+}", currency, z))
            .collect();
        writeln!(f, "--- Scenario #{} ---", self.index)?;
        writeln!(f, "Moves (sd):   {}", moves.join(", "))?;
        writeln!(f, "Extremeness:  {}", self.extremeness)?;
        writeln!(f, "Profit:")?;
        write!(f, "{}", self.result)
    }
}
