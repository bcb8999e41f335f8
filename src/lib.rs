//! # fx-stress
//!
//! FX portfolio valuation and worst-case overnight scenario search.
//!
//! A portfolio of foreign-currency spot holdings and European FX options is
//! valued in a base currency, then revalued one day later under every
//! combination of standardized spot moves to find the worst loss.
//!
//! ## Architecture
//!
//! - **core** — Currency codes and quoting conventions, positions, market data
//! - **pricing** — Garman-Kohlhagen closed form for FX options
//! - **simulation** — Scenario engine, exhaustive grid search, reports, random portfolios

pub mod core;
pub mod pricing;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::currency::{quoting_convention, CurrencyCode, CurrencyPair};
    pub use crate::core::market::{MarketError, MarketSnapshot, PortfolioInput};
    pub use crate::core::position::{OptionType, Position, PositionKind};
    pub use crate::simulation::scenario::{
        MoveVector, ScenarioEngine, ScenarioError, ScenarioResult, Valuation,
    };
    pub use crate::simulation::search::{RankedScenario, ScenarioSearch, SearchConfig};
}
