//! Strategy configuration — fully-specified, validated before any simulation step.
//!
//! Every knob is resolved at construction time; nothing is re-derived ad hoc
//! inside the bar loop. `BTreeMap` keeps parameter order deterministic so the
//! blake3 `ConfigId` is stable across runs and machines.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Indicator families available to a strategy sub-config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Sma,
    Ema,
    Macd,
    Rsi,
    BollingerBands,
}

/// One weighted indicator in a sub-config's vote.
///
/// Weights need not sum to 1; they are normalized before fusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub kind: IndicatorKind,
    pub weight: f64,
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

impl IndicatorSpec {
    pub fn new(kind: IndicatorKind, weight: f64) -> Self {
        Self {
            kind,
            weight,
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: f64) -> Self {
        self.params.insert(key.to_string(), value);
        self
    }

    /// Read an integer parameter with a default, floored at 1.
    pub fn period_param(&self, key: &str, default: usize) -> usize {
        self.params
            .get(key)
            .map(|v| (*v).max(1.0) as usize)
            .unwrap_or(default)
    }

    /// Read a float parameter with a default.
    pub fn float_param(&self, key: &str, default: f64) -> f64 {
        self.params.get(key).copied().unwrap_or(default)
    }

    /// Stable display name, e.g. `sma_20` or `macd_12_26_9`.
    pub fn display_name(&self) -> String {
        match self.kind {
            IndicatorKind::Sma => format!("sma_{}", self.period_param("period", 20)),
            IndicatorKind::Ema => format!("ema_{}", self.period_param("period", 20)),
            IndicatorKind::Macd => format!(
                "macd_{}_{}_{}",
                self.period_param("fast", 12),
                self.period_param("slow", 26),
                self.period_param("signal", 9)
            ),
            IndicatorKind::Rsi => format!("rsi_{}", self.period_param("period", 14)),
            IndicatorKind::BollingerBands => {
                format!("bb_{}", self.period_param("period", 20))
            }
        }
    }
}

/// One leg of the adaptive strategy: the sub-config active in a given regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySubConfig {
    pub name: String,
    pub timeframe: String,
    pub indicators: Vec<IndicatorSpec>,
    /// Buy when the fused signal is at or above this, in [-1, 1].
    pub buy_threshold: f64,
    /// Sell when the fused signal is at or below this, in [-1, 1] (typically negative).
    pub sell_threshold: f64,
    /// Fraction of the relevant balance committed per trade, in (0, 1].
    pub max_position_pct: f64,
    pub initial_capital: f64,
}

/// The full adaptive configuration: one sub-config per regime plus the
/// regime/risk knobs shared across the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    pub bullish: StrategySubConfig,
    pub bearish: StrategySubConfig,

    /// Minimum regime confidence before the regime drives sizing, in [0, 1].
    pub regime_confidence_threshold: f64,
    /// Minimum secondary momentum magnitude for confirmation, in [0, 1].
    pub momentum_confirmation_threshold: f64,
    /// Position multiplier applied in a bullish regime (may exceed 1).
    pub bullish_position_multiplier: f64,
    /// Consecutive steps a candidate regime must hold before commit.
    pub regime_persistence_periods: usize,
    /// Scale position size by regime confidence.
    pub dynamic_position_sizing: bool,
    /// Hard cap on the position fraction while bullish, in (0, 1].
    pub max_bullish_position: f64,

    /// Block entries when trailing realized volatility exceeds this.
    pub max_volatility: f64,
    /// Block new buys when the recent realized win rate drops below this.
    pub circuit_breaker_win_rate: f64,
    /// Closed trades examined by the circuit breaker.
    pub circuit_breaker_lookback: usize,
    /// Window (steps) scanned for regime flip-flops.
    pub whipsaw_detection_periods: usize,
    /// Maximum regime changes tolerated inside the whipsaw window.
    pub whipsaw_max_changes: usize,
}

/// Content-addressed configuration identity (blake3 of canonical JSON).
pub type ConfigId = String;

impl AdaptiveConfig {
    /// Deterministic id for this exact configuration.
    ///
    /// Two configs differing in any field produce different ids; serialization
    /// is canonical because all maps are `BTreeMap`.
    pub fn config_id(&self) -> ConfigId {
        let json = serde_json::to_string(self).expect("AdaptiveConfig must serialize");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// Reject invalid configurations eagerly, before any simulation step runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bullish.validate("bullish")?;
        self.bearish.validate("bearish")?;

        check_unit_range(
            "regime_confidence_threshold",
            self.regime_confidence_threshold,
        )?;
        check_unit_range(
            "momentum_confirmation_threshold",
            self.momentum_confirmation_threshold,
        )?;
        check_unit_range("circuit_breaker_win_rate", self.circuit_breaker_win_rate)?;

        if self.bullish_position_multiplier <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "bullish_position_multiplier",
                value: self.bullish_position_multiplier,
            });
        }
        if self.max_bullish_position <= 0.0 || self.max_bullish_position > 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "max_bullish_position",
                value: self.max_bullish_position,
                expected: "(0, 1]",
            });
        }
        if self.max_volatility <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "max_volatility",
                value: self.max_volatility,
            });
        }
        if self.regime_persistence_periods == 0 {
            return Err(ConfigError::ZeroCount {
                field: "regime_persistence_periods",
            });
        }
        if self.circuit_breaker_lookback == 0 {
            return Err(ConfigError::ZeroCount {
                field: "circuit_breaker_lookback",
            });
        }
        if self.whipsaw_detection_periods == 0 {
            return Err(ConfigError::ZeroCount {
                field: "whipsaw_detection_periods",
            });
        }
        Ok(())
    }

    /// Built-in preset: slow regime commits, tight volatility and breaker
    /// limits, no bullish boost.
    pub fn conservative() -> Self {
        let leg = |name: &str, buy: f64, sell: f64| StrategySubConfig {
            name: name.to_string(),
            timeframe: "1h".to_string(),
            indicators: vec![
                IndicatorSpec::new(IndicatorKind::Sma, 1.0).with_param("period", 50.0),
                IndicatorSpec::new(IndicatorKind::Rsi, 1.0).with_param("period", 14.0),
                IndicatorSpec::new(IndicatorKind::BollingerBands, 0.5).with_param("period", 20.0),
            ],
            buy_threshold: buy,
            sell_threshold: sell,
            max_position_pct: 0.25,
            initial_capital: 10_000.0,
        };
        Self {
            bullish: leg("conservative_bull", 0.45, -0.35),
            bearish: leg("conservative_bear", 0.55, -0.25),
            regime_confidence_threshold: 0.5,
            momentum_confirmation_threshold: 0.15,
            bullish_position_multiplier: 1.0,
            regime_persistence_periods: 5,
            dynamic_position_sizing: true,
            max_bullish_position: 0.4,
            max_volatility: 0.03,
            circuit_breaker_win_rate: 0.45,
            circuit_breaker_lookback: 8,
            whipsaw_detection_periods: 12,
            whipsaw_max_changes: 2,
        }
    }

    /// Built-in preset: fast commits, boosted bullish sizing, loose limits.
    pub fn aggressive() -> Self {
        let leg = |name: &str, buy: f64, sell: f64| StrategySubConfig {
            name: name.to_string(),
            timeframe: "1h".to_string(),
            indicators: vec![
                IndicatorSpec::new(IndicatorKind::Ema, 1.0).with_param("period", 12.0),
                IndicatorSpec::new(IndicatorKind::Macd, 1.0),
                IndicatorSpec::new(IndicatorKind::Rsi, 0.5).with_param("period", 14.0),
            ],
            buy_threshold: buy,
            sell_threshold: sell,
            max_position_pct: 0.6,
            initial_capital: 10_000.0,
        };
        Self {
            bullish: leg("aggressive_bull", 0.2, -0.3),
            bearish: leg("aggressive_bear", 0.35, -0.2),
            regime_confidence_threshold: 0.25,
            momentum_confirmation_threshold: 0.05,
            bullish_position_multiplier: 1.8,
            regime_persistence_periods: 2,
            dynamic_position_sizing: false,
            max_bullish_position: 0.9,
            max_volatility: 0.08,
            circuit_breaker_win_rate: 0.3,
            circuit_breaker_lookback: 5,
            whipsaw_detection_periods: 10,
            whipsaw_max_changes: 4,
        }
    }
}

impl StrategySubConfig {
    fn validate(&self, leg: &'static str) -> Result<(), ConfigError> {
        if self.indicators.is_empty() {
            return Err(ConfigError::EmptyIndicators { leg });
        }
        if self.indicators.iter().any(|spec| spec.weight < 0.0) {
            return Err(ConfigError::NegativeWeight { leg });
        }
        if self.indicators.iter().map(|spec| spec.weight).sum::<f64>() <= 0.0 {
            return Err(ConfigError::AllZeroWeights { leg });
        }
        if !(-1.0..=1.0).contains(&self.buy_threshold) {
            return Err(ConfigError::OutOfRange {
                field: "buy_threshold",
                value: self.buy_threshold,
                expected: "[-1, 1]",
            });
        }
        if !(-1.0..=1.0).contains(&self.sell_threshold) {
            return Err(ConfigError::OutOfRange {
                field: "sell_threshold",
                value: self.sell_threshold,
                expected: "[-1, 1]",
            });
        }
        if self.sell_threshold >= self.buy_threshold {
            return Err(ConfigError::InvertedThresholds {
                leg,
                buy: self.buy_threshold,
                sell: self.sell_threshold,
            });
        }
        if self.max_position_pct <= 0.0 || self.max_position_pct > 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "max_position_pct",
                value: self.max_position_pct,
                expected: "(0, 1]",
            });
        }
        if self.initial_capital <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "initial_capital",
                value: self.initial_capital,
            });
        }
        Ok(())
    }
}

fn check_unit_range(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "[0, 1]",
        });
    }
    Ok(())
}

/// Configuration validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{leg} sub-config has no indicators")]
    EmptyIndicators { leg: &'static str },
    #[error("{leg} sub-config has a negative indicator weight")]
    NegativeWeight { leg: &'static str },
    #[error("{leg} sub-config indicator weights sum to zero")]
    AllZeroWeights { leg: &'static str },
    #[error("{leg} sub-config has sell threshold {sell} >= buy threshold {buy}")]
    InvertedThresholds {
        leg: &'static str,
        buy: f64,
        sell: f64,
    },
    #[error("{field} = {value}, expected {expected}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("{field} = {value}, expected a positive value")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must be at least 1")]
    ZeroCount { field: &'static str },
}

/// Build a plausible sub-config for tests.
#[cfg(test)]
pub fn sample_sub_config(name: &str) -> StrategySubConfig {
    StrategySubConfig {
        name: name.to_string(),
        timeframe: "1h".to_string(),
        indicators: vec![
            IndicatorSpec::new(IndicatorKind::Sma, 1.0).with_param("period", 20.0),
            IndicatorSpec::new(IndicatorKind::Rsi, 0.5).with_param("period", 14.0),
        ],
        buy_threshold: 0.3,
        sell_threshold: -0.3,
        max_position_pct: 0.5,
        initial_capital: 1000.0,
    }
}

/// Build a valid full configuration for tests.
#[cfg(test)]
pub fn sample_config() -> AdaptiveConfig {
    AdaptiveConfig {
        bullish: sample_sub_config("bull"),
        bearish: sample_sub_config("bear"),
        regime_confidence_threshold: 0.4,
        momentum_confirmation_threshold: 0.1,
        bullish_position_multiplier: 1.5,
        regime_persistence_periods: 3,
        dynamic_position_sizing: true,
        max_bullish_position: 0.8,
        max_volatility: 0.05,
        circuit_breaker_win_rate: 0.35,
        circuit_breaker_lookback: 5,
        whipsaw_detection_periods: 10,
        whipsaw_max_changes: 3,
    }
}
