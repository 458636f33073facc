//! Whipsaw gate — blocks trading while the regime is flip-flopping.

use crate::risk::{RiskContext, RiskFilter, RiskVerdict};

/// Blocks when the observed regime label changed more than `max_changes`
/// times within the trailing `window` steps.
#[derive(Debug, Clone)]
pub struct WhipsawFilter {
    window: usize,
    max_changes: usize,
}

impl WhipsawFilter {
    pub fn new(window: usize, max_changes: usize) -> Self {
        Self {
            window,
            max_changes,
        }
    }
}

impl RiskFilter for WhipsawFilter {
    fn name(&self) -> &'static str {
        "whipsaw"
    }

    fn evaluate(&self, ctx: &RiskContext<'_>) -> RiskVerdict {
        if ctx.regime.recent_changes(self.window) > self.max_changes {
            RiskVerdict::Blocked
        } else {
            RiskVerdict::Passed
        }
    }
}
