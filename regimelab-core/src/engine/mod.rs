//! The simulation engine: one deterministic pass over a candle series.
//!
//! Per candle: score and (maybe) switch the regime, generate the adaptive
//! signal, run the risk chain on actionable signals, then hand approved
//! actions to the executor. All state lives in a per-run [`RunContext`], so
//! the same inputs always produce the same outputs.

pub mod context;
pub mod executor;

pub use context::{OpenLot, RunContext, StepOutcome};

use crate::config::{AdaptiveConfig, ConfigError};
use crate::domain::{validate_series, Candle, CandleError, Portfolio, Signal, SignalAction, Trade, TradeAudit};
use crate::regime::{Regime, RegimeDetector};
use crate::risk::{RiskChain, RiskContext};
use crate::signal::AdaptiveSignalGenerator;
use thiserror::Error;

/// Shortest series a simulation will accept.
pub const MIN_CANDLES: usize = 50;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Series(#[from] CandleError),
    #[error("insufficient data: got {got} candles, need at least {need}")]
    InsufficientData { got: usize, need: usize },
}

/// Everything a completed simulation produced.
#[derive(Debug)]
pub struct RunResult {
    /// One signal per evaluated candle.
    pub signals: Vec<Signal>,
    pub trades: Vec<Trade>,
    /// One outcome per evaluated candle, parallel to `signals`.
    pub outcomes: Vec<StepOutcome>,
    /// Portfolio total value per evaluated candle.
    pub equity_curve: Vec<f64>,
    pub portfolio: Portfolio,
    /// Index of the first evaluated candle (after indicator warm-up).
    pub first_evaluated: usize,
    pub bar_count: usize,
}

/// Run one full simulation of `config` over `candles`.
///
/// Validates the configuration and the series up front, then walks every
/// candle past the longest indicator warm-up. Pure besides the trade
/// timestamps carried from the input candles.
pub fn run_simulation(candles: &[Candle], config: &AdaptiveConfig) -> Result<RunResult, RunError> {
    config.validate()?;
    validate_series(candles)?;
    if candles.len() < MIN_CANDLES {
        return Err(RunError::InsufficientData {
            got: candles.len(),
            need: MIN_CANDLES,
        });
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let detector = RegimeDetector::from_closes(&closes, config.regime_persistence_periods);
    let generator = AdaptiveSignalGenerator::new(config, &closes);
    let chain = RiskChain::from_config(config);

    let warmup = detector.warmup().max(generator.warmup());
    let first_evaluated = warmup.min(candles.len());

    let mut portfolio = Portfolio::new(config.bullish.initial_capital);
    let mut ctx = RunContext::new();

    for index in first_evaluated..candles.len() {
        detector.step(&mut ctx.regime, index);
        let mut signal = generator.generate(&closes, index, &ctx.regime);

        let outcome = if signal.action == SignalAction::Hold {
            StepOutcome::Held
        } else {
            let report = chain.evaluate(&RiskContext {
                closes: &closes,
                index,
                action: signal.action,
                regime: &ctx.regime,
                trades: &ctx.trades,
            });
            if report.allowed() {
                let leg = if ctx.regime.current == Regime::Bullish {
                    &config.bullish
                } else {
                    &config.bearish
                };
                let audit = TradeAudit::at_decision(
                    ctx.regime.current,
                    ctx.regime.confidence,
                    &signal.active_config,
                    signal.momentum_confirmed,
                    signal.contributions.clone(),
                    report.passed,
                    report.blocked,
                );
                executor::apply_signal(
                    &mut portfolio,
                    &mut ctx,
                    &signal,
                    audit,
                    &candles[index],
                    index,
                    leg.max_position_pct,
                    &closes,
                )
            } else {
                signal.blocked_by = report.blocked;
                signal.action = SignalAction::Hold;
                StepOutcome::RiskBlocked
            }
        };

        portfolio.mark_to_market(closes[index]);
        ctx.equity_curve.push(portfolio.total_value);
        ctx.signals.push(signal);
        ctx.outcomes.push(outcome);
    }

    Ok(RunResult {
        signals: ctx.signals,
        trades: ctx.trades,
        outcomes: ctx.outcomes,
        equity_curve: ctx.equity_curve,
        portfolio,
        first_evaluated,
        bar_count: candles.len(),
    })
}
