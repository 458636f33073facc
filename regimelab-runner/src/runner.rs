//! Single-backtest runner: one (config, window) pair in, one result out.

use regimelab_core::config::ConfigId;
use regimelab_core::domain::Trade;
use regimelab_core::engine::{run_simulation, RunError, MIN_CANDLES};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::catalog::NamedConfig;
use crate::metrics::PeriodMetrics;
use crate::windows::{BacktestWindow, WindowRole};

#[derive(Debug, Error)]
pub enum BacktestError {
    /// Config or series rejected by the engine. Insufficient data is not
    /// routed here; short windows produce a zero-metrics result instead.
    #[error("simulation failed on window {window}: {source}")]
    Simulation {
        window: String,
        #[source]
        source: RunError,
    },
}

/// Everything one (config, window) run produced.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub config_name: String,
    pub config_id: ConfigId,
    pub window_name: String,
    pub window_role: WindowRole,
    pub metrics: PeriodMetrics,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<f64>,
    /// Evaluated bars (after warm-up).
    pub signal_count: usize,
    /// Total bars in the window.
    pub bar_count: usize,
}

impl BacktestResult {
    fn zero(config: &NamedConfig, window: &BacktestWindow) -> Self {
        Self {
            config_name: config.name.clone(),
            config_id: config.config_id(),
            window_name: window.name.clone(),
            window_role: window.role,
            metrics: PeriodMetrics::zero(),
            trades: Vec::new(),
            equity_curve: Vec::new(),
            signal_count: 0,
            bar_count: window.candles.len(),
        }
    }
}

/// Run one config over one window.
///
/// A window below [`MIN_CANDLES`] yields the all-zero result with empty
/// logs; invalid configs and malformed series are real errors.
pub fn run_backtest(
    config: &NamedConfig,
    window: &BacktestWindow,
) -> Result<BacktestResult, BacktestError> {
    if window.candles.len() < MIN_CANDLES {
        debug!(
            config = %config.name,
            window = %window.name,
            candles = window.candles.len(),
            "window below minimum, returning zero metrics"
        );
        return Ok(BacktestResult::zero(config, window));
    }

    let run = run_simulation(&window.candles, &config.config).map_err(|source| {
        BacktestError::Simulation {
            window: window.name.clone(),
            source,
        }
    })?;

    // The benchmark covers the same bars the equity curve covers.
    let closes = window.closes();
    let evaluated_closes = &closes[run.first_evaluated..];
    let metrics = PeriodMetrics::compute(
        &run.equity_curve,
        evaluated_closes,
        &run.trades,
        run.portfolio.initial_capital,
    );

    debug!(
        config = %config.name,
        window = %window.name,
        trades = run.trades.len(),
        return_pct = metrics.return_pct,
        "backtest complete"
    );

    Ok(BacktestResult {
        config_name: config.name.clone(),
        config_id: config.config_id(),
        window_name: window.name.clone(),
        window_role: window.role,
        metrics,
        trades: run.trades,
        equity_curve: run.equity_curve,
        signal_count: run.signals.len(),
        bar_count: run.bar_count,
    })
}
