//! Volatility gate — blocks trading in erratic tape.

use crate::indicators::realized_volatility;
use crate::risk::{RiskContext, RiskFilter, RiskVerdict};

/// Trailing candles used for the realized-volatility estimate.
pub const VOLATILITY_WINDOW: usize = 20;

/// Blocks any action when trailing realized volatility exceeds the cap.
#[derive(Debug, Clone)]
pub struct VolatilityFilter {
    max_volatility: f64,
}

impl VolatilityFilter {
    pub fn new(max_volatility: f64) -> Self {
        Self { max_volatility }
    }
}

impl RiskFilter for VolatilityFilter {
    fn name(&self) -> &'static str {
        "volatility"
    }

    fn evaluate(&self, ctx: &RiskContext<'_>) -> RiskVerdict {
        let end = (ctx.index + 1).min(ctx.closes.len());
        let start = end.saturating_sub(VOLATILITY_WINDOW);
        match realized_volatility(&ctx.closes[start..end]) {
            Some(vol) if vol > self.max_volatility => RiskVerdict::Blocked,
            _ => RiskVerdict::Passed,
        }
    }
}
