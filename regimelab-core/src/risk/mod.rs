//! Risk filter chain — independent gates that can veto a signal.
//!
//! Applied in a fixed order: volatility, whipsaw, circuit breaker, regime
//! persistence. Every filter is evaluated even after one blocks, so the audit
//! trail records all fired filters, not just the first.

pub mod circuit_breaker;
pub mod persistence;
pub mod volatility;
pub mod whipsaw;

pub use circuit_breaker::CircuitBreaker;
pub use persistence::PersistenceGate;
pub use volatility::VolatilityFilter;
pub use whipsaw::WhipsawFilter;

use crate::config::AdaptiveConfig;
use crate::domain::{SignalAction, Trade};
use crate::regime::RegimeState;

/// Everything a gate may inspect at one candle.
pub struct RiskContext<'a> {
    pub closes: &'a [f64],
    pub index: usize,
    /// Pre-gate action under evaluation.
    pub action: SignalAction,
    pub regime: &'a RegimeState,
    /// Trade log so far this run (append-only).
    pub trades: &'a [Trade],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskVerdict {
    Passed,
    Blocked,
}

impl RiskVerdict {
    pub fn is_passed(&self) -> bool {
        matches!(self, RiskVerdict::Passed)
    }
}

/// A single independent risk gate.
pub trait RiskFilter: Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(&self, ctx: &RiskContext<'_>) -> RiskVerdict;
}

/// Outcome of running the whole chain at one candle.
#[derive(Debug, Clone, Default)]
pub struct RiskReport {
    pub passed: Vec<String>,
    pub blocked: Vec<String>,
}

impl RiskReport {
    pub fn allowed(&self) -> bool {
        self.blocked.is_empty()
    }
}

/// The fixed-order filter chain for one configuration.
pub struct RiskChain {
    filters: Vec<Box<dyn RiskFilter>>,
}

impl RiskChain {
    pub fn from_config(config: &AdaptiveConfig) -> Self {
        Self {
            filters: vec![
                Box::new(VolatilityFilter::new(config.max_volatility)),
                Box::new(WhipsawFilter::new(
                    config.whipsaw_detection_periods,
                    config.whipsaw_max_changes,
                )),
                Box::new(CircuitBreaker::new(
                    config.circuit_breaker_lookback,
                    config.circuit_breaker_win_rate,
                )),
                Box::new(PersistenceGate::new(config.regime_persistence_periods)),
            ],
        }
    }

    /// Run every filter in order and collect the full verdict list.
    pub fn evaluate(&self, ctx: &RiskContext<'_>) -> RiskReport {
        let mut report = RiskReport::default();
        for filter in &self.filters {
            match filter.evaluate(ctx) {
                RiskVerdict::Passed => report.passed.push(filter.name().to_string()),
                RiskVerdict::Blocked => report.blocked.push(filter.name().to_string()),
            }
        }
        report
    }
}
