//! Regime-persistence gate — the action-layer safety net behind the
//! detector's hysteresis.

use crate::risk::{RiskContext, RiskFilter, RiskVerdict};

/// Blocks action until the committed regime has held for at least
/// `persistence_periods` steps.
///
/// The detector already debounces regime switches; this gate re-checks the
/// same bound at the action layer so a freshly-committed regime cannot trade
/// immediately.
#[derive(Debug, Clone)]
pub struct PersistenceGate {
    persistence_periods: usize,
}

impl PersistenceGate {
    pub fn new(persistence_periods: usize) -> Self {
        Self {
            persistence_periods,
        }
    }
}

impl RiskFilter for PersistenceGate {
    fn name(&self) -> &'static str {
        "regime_persistence"
    }

    fn evaluate(&self, ctx: &RiskContext<'_>) -> RiskVerdict {
        if ctx.regime.committed_for < self.persistence_periods {
            RiskVerdict::Blocked
        } else {
            RiskVerdict::Passed
        }
    }
}
