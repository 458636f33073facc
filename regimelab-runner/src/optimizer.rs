//! Optimization harness — every (config, window) pair, scored and ranked.
//!
//! Each run owns a fresh engine context (nothing is shared between runs), so
//! the pairs are mutually independent and fan out across rayon workers. The
//! ranking is fully deterministic: scores depend only on run outputs, and
//! ties break on config id.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::NamedConfig;
use crate::runner::{run_backtest, BacktestError, BacktestResult};
use crate::windows::{BacktestWindow, WindowRole};

/// Weights of the composite score, in percentage-point units of the
/// underlying metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Primary-window return.
    pub primary_return: f64,
    /// Synthetic stand-in for the primary window.
    pub synthetic_primary_return: f64,
    /// Secondary bullish historical window.
    pub secondary_bull_return: f64,
    /// Synthetic bull run.
    pub synthetic_bull_return: f64,
    /// Outperformance vs buy-and-hold, applied on both primary-role windows.
    pub outperformance: f64,
    /// Drawdown penalty, applied on both primary-role windows. The drawdown
    /// metric is negative, so a positive weight here subtracts from the score.
    pub drawdown_penalty: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            primary_return: 0.30,
            synthetic_primary_return: 0.30,
            secondary_bull_return: 0.10,
            synthetic_bull_return: 0.10,
            outperformance: 0.10,
            drawdown_penalty: 0.05,
        }
    }
}

impl ScoreWeights {
    /// Score contribution of one completed window run.
    fn window_score(&self, result: &BacktestResult) -> f64 {
        let m = &result.metrics;
        match result.window_role {
            WindowRole::Primary => {
                self.primary_return * m.return_pct
                    + self.outperformance * m.vs_buy_hold_pct
                    + self.drawdown_penalty * m.max_drawdown_pct
            }
            WindowRole::SyntheticPrimary => {
                self.synthetic_primary_return * m.return_pct
                    + self.outperformance * m.vs_buy_hold_pct
                    + self.drawdown_penalty * m.max_drawdown_pct
            }
            WindowRole::SecondaryBull => self.secondary_bull_return * m.return_pct,
            WindowRole::SyntheticBull => self.synthetic_bull_return * m.return_pct,
            WindowRole::Auxiliary => 0.0,
        }
    }
}

/// One config's ranked line in the report.
#[derive(Debug, Clone, Serialize)]
pub struct RankedConfig {
    /// 1-based rank after sorting.
    pub rank: usize,
    pub config_name: String,
    pub config_id: String,
    pub score: f64,
    /// One result per window, in catalog window order.
    pub windows: Vec<BacktestResult>,
}

/// The full optimization output: every config, ranked descending by score.
#[derive(Debug, Serialize)]
pub struct OptimizationReport {
    pub weights: ScoreWeights,
    pub window_names: Vec<String>,
    pub ranked: Vec<RankedConfig>,
}

impl OptimizationReport {
    pub fn best(&self) -> Option<&RankedConfig> {
        self.ranked.first()
    }
}

/// Run every config against every window and rank by weighted score.
pub fn optimize(
    catalog: &[NamedConfig],
    windows: &[BacktestWindow],
    weights: &ScoreWeights,
) -> Result<OptimizationReport, BacktestError> {
    info!(
        configs = catalog.len(),
        windows = windows.len(),
        "starting optimization sweep"
    );

    let mut ranked: Vec<RankedConfig> = catalog
        .par_iter()
        .map(|config| {
            let results: Vec<BacktestResult> = windows
                .iter()
                .map(|window| run_backtest(config, window))
                .collect::<Result<_, _>>()?;
            let score = results.iter().map(|r| weights.window_score(r)).sum();
            Ok(RankedConfig {
                rank: 0,
                config_name: config.name.clone(),
                config_id: config.config_id(),
                score,
                windows: results,
            })
        })
        .collect::<Result<_, BacktestError>>()?;

    // Descending score; config id breaks ties so the order never depends on
    // catalog order or scheduling.
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.config_id.cmp(&b.config_id))
    });
    for (index, entry) in ranked.iter_mut().enumerate() {
        entry.rank = index + 1;
    }

    for entry in &ranked {
        info!(
            rank = entry.rank,
            config = %entry.config_name,
            score = entry.score,
            "ranked"
        );
    }

    Ok(OptimizationReport {
        weights: *weights,
        window_names: windows.iter().map(|w| w.name.clone()).collect(),
        ranked,
    })
}
