//! Adaptive signal generation — regime-selected sub-config, weighted
//! indicator fusion, momentum confirmation, and position sizing.
//!
//! Indicator outputs are prepared once per run from the full close series;
//! per-candle generation is pure lookup. Each indicator contributes a
//! directional vote in [-1, 1]; the fused signal is the weight-normalized sum,
//! clipped to [-1, 1].

use std::collections::BTreeMap;

use crate::config::{AdaptiveConfig, IndicatorKind, IndicatorSpec, StrategySubConfig};
use crate::domain::{Signal, SignalAction};
use crate::indicators::{
    aligned_value, bollinger, ema, macd, rsi, sma, BollingerOutput, MacdOutput,
};
use crate::regime::{Regime, RegimeState};

/// RSI period backing the secondary momentum-confirmation measure.
const CONFIRMATION_PERIOD: usize = 14;
/// Price-vs-average gap steepness: a 10% gap saturates near tanh(1.0).
const GAP_SCALE: f64 = 10.0;
/// MACD histogram normalization: 1% of price saturates near tanh(1.0).
const HISTOGRAM_SCALE: f64 = 100.0;

/// One indicator's precomputed output plus its vote weight.
#[derive(Debug, Clone)]
pub struct PreparedIndicator {
    name: String,
    weight: f64,
    series: PreparedSeries,
}

#[derive(Debug, Clone)]
enum PreparedSeries {
    Average(Vec<f64>),
    Macd(MacdOutput),
    Rsi(Vec<f64>),
    Bollinger(BollingerOutput),
}

impl PreparedIndicator {
    fn prepare(spec: &IndicatorSpec, closes: &[f64]) -> Self {
        let series = match spec.kind {
            IndicatorKind::Sma => {
                PreparedSeries::Average(sma(closes, spec.period_param("period", 20)))
            }
            IndicatorKind::Ema => {
                PreparedSeries::Average(ema(closes, spec.period_param("period", 20)))
            }
            IndicatorKind::Macd => PreparedSeries::Macd(macd(
                closes,
                spec.period_param("fast", 12),
                spec.period_param("slow", 26),
                spec.period_param("signal", 9),
            )),
            IndicatorKind::Rsi => {
                PreparedSeries::Rsi(rsi(closes, spec.period_param("period", 14)))
            }
            IndicatorKind::BollingerBands => PreparedSeries::Bollinger(bollinger(
                closes,
                spec.period_param("period", 20),
                spec.float_param("k", 2.0),
            )),
        };
        Self {
            name: spec.display_name(),
            weight: spec.weight,
            series,
        }
    }

    /// Candles consumed before this indicator produces its first value.
    fn warmup(&self, series_len: usize) -> usize {
        let out_len = match &self.series {
            PreparedSeries::Average(values) | PreparedSeries::Rsi(values) => values.len(),
            PreparedSeries::Macd(out) => out.histogram.len(),
            PreparedSeries::Bollinger(out) => out.middle.len(),
        };
        series_len.saturating_sub(out_len)
    }

    /// Directional vote in [-1, 1] at a candle index; `None` during warm-up.
    fn contribution(&self, closes: &[f64], index: usize) -> Option<f64> {
        let price = *closes.get(index)?;
        let n = closes.len();
        let value = match &self.series {
            PreparedSeries::Average(values) => {
                let avg = aligned_value(values, n, index, 0)?;
                if avg == 0.0 {
                    return Some(0.0);
                }
                ((price - avg) / avg * GAP_SCALE).tanh()
            }
            PreparedSeries::Macd(out) => {
                let histogram = aligned_value(&out.histogram, n, index, 0)?;
                if price == 0.0 {
                    return Some(0.0);
                }
                (histogram / price * HISTOGRAM_SCALE).tanh()
            }
            PreparedSeries::Rsi(values) => {
                let v = aligned_value(values, n, index, 0)?;
                (v - 50.0) / 50.0
            }
            PreparedSeries::Bollinger(out) => {
                let upper = aligned_value(&out.upper, n, index, 0)?;
                let lower = aligned_value(&out.lower, n, index, 0)?;
                if upper == lower {
                    return Some(0.0);
                }
                // %B remapped from [0, 1] to [-1, 1].
                let percent_b = (price - lower) / (upper - lower);
                (percent_b - 0.5) * 2.0
            }
        };
        Some(value.clamp(-1.0, 1.0))
    }
}

/// One regime leg: the sub-config plus its prepared indicators.
#[derive(Debug, Clone)]
struct PreparedLeg {
    name: String,
    buy_threshold: f64,
    sell_threshold: f64,
    max_position_pct: f64,
    indicators: Vec<PreparedIndicator>,
    total_weight: f64,
}

impl PreparedLeg {
    fn prepare(sub: &StrategySubConfig, closes: &[f64]) -> Self {
        let indicators: Vec<PreparedIndicator> = sub
            .indicators
            .iter()
            .map(|spec| PreparedIndicator::prepare(spec, closes))
            .collect();
        let total_weight = indicators.iter().map(|i| i.weight).sum();
        Self {
            name: sub.name.clone(),
            buy_threshold: sub.buy_threshold,
            sell_threshold: sub.sell_threshold,
            max_position_pct: sub.max_position_pct,
            indicators,
            total_weight,
        }
    }
}

/// Per-run signal generator for one [`AdaptiveConfig`].
#[derive(Debug, Clone)]
pub struct AdaptiveSignalGenerator {
    bullish: PreparedLeg,
    bearish: PreparedLeg,
    confirmation: Vec<f64>,
    series_len: usize,
    regime_confidence_threshold: f64,
    momentum_confirmation_threshold: f64,
    bullish_position_multiplier: f64,
    dynamic_position_sizing: bool,
    max_bullish_position: f64,
}

impl AdaptiveSignalGenerator {
    pub fn new(config: &AdaptiveConfig, closes: &[f64]) -> Self {
        Self {
            bullish: PreparedLeg::prepare(&config.bullish, closes),
            bearish: PreparedLeg::prepare(&config.bearish, closes),
            confirmation: rsi(closes, CONFIRMATION_PERIOD),
            series_len: closes.len(),
            regime_confidence_threshold: config.regime_confidence_threshold,
            momentum_confirmation_threshold: config.momentum_confirmation_threshold,
            bullish_position_multiplier: config.bullish_position_multiplier,
            dynamic_position_sizing: config.dynamic_position_sizing,
            max_bullish_position: config.max_bullish_position,
        }
    }

    /// Longest warm-up across both legs and the confirmation measure.
    pub fn warmup(&self) -> usize {
        let leg_warmup = |leg: &PreparedLeg| {
            leg.indicators
                .iter()
                .map(|i| i.warmup(self.series_len))
                .max()
                .unwrap_or(0)
        };
        leg_warmup(&self.bullish)
            .max(leg_warmup(&self.bearish))
            .max(CONFIRMATION_PERIOD)
    }

    /// Generate the pre-risk-gate signal for one candle.
    pub fn generate(&self, closes: &[f64], index: usize, regime: &RegimeState) -> Signal {
        let leg = if regime.current == Regime::Bullish {
            &self.bullish
        } else {
            &self.bearish
        };

        // Weighted fusion. Indicators still warming up vote zero but keep
        // their weight in the denominator, pulling the fused value toward
        // hold rather than amplifying the remaining votes.
        let mut contributions = BTreeMap::new();
        let mut fused = 0.0;
        for indicator in &leg.indicators {
            let vote = indicator.contribution(closes, index).unwrap_or(0.0);
            contributions.insert(indicator.name.clone(), vote);
            if leg.total_weight > 0.0 {
                fused += indicator.weight / leg.total_weight * vote;
            }
        }
        let fused = fused.clamp(-1.0, 1.0);

        let mut action = if fused >= leg.buy_threshold {
            SignalAction::Buy
        } else if fused <= leg.sell_threshold {
            SignalAction::Sell
        } else {
            SignalAction::Hold
        };

        // Momentum confirmation: the secondary measure must agree in sign and
        // clear the configured magnitude, or the action degrades to hold.
        let momentum = aligned_value(&self.confirmation, self.series_len, index, 0)
            .map(|v| (v - 50.0) / 50.0)
            .unwrap_or(0.0);
        let momentum_confirmed = match action {
            SignalAction::Buy => momentum >= self.momentum_confirmation_threshold,
            SignalAction::Sell => momentum <= -self.momentum_confirmation_threshold,
            SignalAction::Hold => false,
        };
        if action != SignalAction::Hold && !momentum_confirmed {
            action = SignalAction::Hold;
        }

        let position_multiplier = self.position_multiplier(regime, leg);

        Signal {
            action,
            value: fused,
            active_config: leg.name.clone(),
            position_multiplier,
            confidence: fused.abs().clamp(0.0, 1.0),
            momentum_confirmed,
            contributions,
            blocked_by: Vec::new(),
        }
    }

    /// Multiplier on the active leg's max position fraction.
    ///
    /// The bullish boost applies only when the committed regime is bullish
    /// with confidence at or above the configured threshold; dynamic sizing
    /// scales further by confidence. While bullish the resulting fraction is
    /// bounded by the global `max_bullish_position` alone, so it may exceed
    /// the leg's `max_position_pct` and the returned multiplier may exceed 1.
    /// Outside a bullish regime the leg's own fraction is the cap.
    fn position_multiplier(&self, regime: &RegimeState, leg: &PreparedLeg) -> f64 {
        let bullish = regime.current == Regime::Bullish;
        let mut multiplier = if bullish && regime.confidence >= self.regime_confidence_threshold {
            self.bullish_position_multiplier
        } else {
            1.0
        };
        if self.dynamic_position_sizing {
            multiplier *= regime.confidence.clamp(0.0, 1.0);
        }

        let mut fraction = multiplier * leg.max_position_pct;
        fraction = if bullish {
            fraction.min(self.max_bullish_position)
        } else {
            fraction.min(leg.max_position_pct)
        };
        fraction = fraction.clamp(0.0, 1.0);

        if leg.max_position_pct > 0.0 {
            fraction / leg.max_position_pct
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IndicatorKind, IndicatorSpec};

    fn sub(name: &str, indicators: Vec<IndicatorSpec>) -> StrategySubConfig {
        StrategySubConfig {
            name: name.to_string(),
            timeframe: "1h".to_string(),
            indicators,
            buy_threshold: 0.1,
            sell_threshold: -0.1,
            max_position_pct: 0.5,
            initial_capital: 1000.0,
        }
    }

    fn config_with(indicators: Vec<IndicatorSpec>) -> AdaptiveConfig {
        AdaptiveConfig {
            bullish: sub("bull", indicators.clone()),
            bearish: sub("bear", indicators),
            regime_confidence_threshold: 0.3,
            momentum_confirmation_threshold: 0.05,
            bullish_position_multiplier: 1.5,
            regime_persistence_periods: 2,
            dynamic_position_sizing: false,
            max_bullish_position: 0.8,
            max_volatility: 0.5,
            circuit_breaker_win_rate: 0.0,
            circuit_breaker_lookback: 5,
            whipsaw_detection_periods: 10,
            whipsaw_max_changes: 9,
        }
    }

    fn sma_only() -> Vec<IndicatorSpec> {
        vec![IndicatorSpec::new(IndicatorKind::Sma, 1.0).with_param("period", 10.0)]
    }

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 * 1.01f64.powi(i as i32)).collect()
    }

    fn bullish_state() -> RegimeState {
        let mut state = RegimeState::new();
        state.observe(Regime::Bullish, 0.8, 1);
        state
    }

    #[test]
    fn flat_series_yields_hold_at_zero() {
        let closes = vec![100.0; 60];
        let generator = AdaptiveSignalGenerator::new(&config_with(sma_only()), &closes);
        let signal = generator.generate(&closes, 50, &RegimeState::new());
        assert_eq!(signal.action, SignalAction::Hold);
        assert_eq!(signal.value, 0.0);
    }

    #[test]
    fn rising_series_yields_buy() {
        let closes = rising(60);
        let generator = AdaptiveSignalGenerator::new(&config_with(sma_only()), &closes);
        let signal = generator.generate(&closes, 59, &bullish_state());
        assert_eq!(signal.action, SignalAction::Buy);
        assert!(signal.value > 0.1);
        assert!(signal.momentum_confirmed);
        assert_eq!(signal.active_config, "bull");
    }

    #[test]
    fn falling_series_yields_sell() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 * 0.99f64.powi(i)).collect();
        let generator = AdaptiveSignalGenerator::new(&config_with(sma_only()), &closes);
        let signal = generator.generate(&closes, 59, &RegimeState::new());
        assert_eq!(signal.action, SignalAction::Sell);
        assert_eq!(signal.active_config, "bear");
    }

    #[test]
    fn weight_normalization_is_scale_invariant() {
        let closes = rising(60);
        let light = config_with(vec![
            IndicatorSpec::new(IndicatorKind::Sma, 1.0).with_param("period", 10.0),
            IndicatorSpec::new(IndicatorKind::Rsi, 1.0).with_param("period", 14.0),
        ]);
        let heavy = config_with(vec![
            IndicatorSpec::new(IndicatorKind::Sma, 10.0).with_param("period", 10.0),
            IndicatorSpec::new(IndicatorKind::Rsi, 10.0).with_param("period", 14.0),
        ]);
        let state = bullish_state();
        let a = AdaptiveSignalGenerator::new(&light, &closes).generate(&closes, 59, &state);
        let b = AdaptiveSignalGenerator::new(&heavy, &closes).generate(&closes, 59, &state);
        assert!((a.value - b.value).abs() < 1e-12);
    }

    #[test]
    fn fused_value_is_clipped() {
        let closes = rising(80);
        let generator = AdaptiveSignalGenerator::new(&config_with(sma_only()), &closes);
        for index in 0..closes.len() {
            let signal = generator.generate(&closes, index, &bullish_state());
            assert!((-1.0..=1.0).contains(&signal.value));
        }
    }

    #[test]
    fn failed_momentum_confirmation_degrades_to_hold() {
        // Long decline followed by a sharp recovery: the 10-period SMA vote
        // turns positive before the 14-period RSI climbs over the midline.
        let mut closes: Vec<f64> = (0..50).map(|i| 200.0 * 0.99f64.powi(i)).collect();
        let bottom = *closes.last().unwrap();
        closes.extend((1..=3).map(|i| bottom * 1.03f64.powi(i)));
        let mut cfg = config_with(sma_only());
        cfg.bullish.buy_threshold = 0.01;
        cfg.bearish.buy_threshold = 0.01;
        cfg.momentum_confirmation_threshold = 0.9;
        let generator = AdaptiveSignalGenerator::new(&cfg, &closes);
        let signal = generator.generate(&closes, closes.len() - 1, &bullish_state());
        assert!(signal.value >= 0.01, "fused signal was {}", signal.value);
        assert!(!signal.momentum_confirmed);
        assert_eq!(signal.action, SignalAction::Hold);
    }

    #[test]
    fn bullish_boost_requires_confidence() {
        let closes = rising(60);
        let cfg = config_with(sma_only());
        let generator = AdaptiveSignalGenerator::new(&cfg, &closes);

        let mut weak = RegimeState::new();
        weak.observe(Regime::Bullish, 0.1, 1); // below the 0.3 threshold
        let signal = generator.generate(&closes, 59, &weak);
        assert!((signal.position_multiplier - 1.0).abs() < 1e-12);

        let strong = bullish_state();
        let boosted = generator.generate(&closes, 59, &strong);
        assert!(boosted.position_multiplier > 1.0);
    }

    #[test]
    fn bullish_fraction_capped_by_global_max() {
        let closes = rising(60);
        let mut cfg = config_with(sma_only());
        cfg.bullish_position_multiplier = 10.0;
        cfg.max_bullish_position = 0.8;
        let generator = AdaptiveSignalGenerator::new(&cfg, &closes);
        let signal = generator.generate(&closes, 59, &bullish_state());
        // fraction = multiplier * 0.5 capped at 0.8 -> multiplier 1.6
        assert!((signal.position_multiplier - 1.6).abs() < 1e-12);
    }

    #[test]
    fn dynamic_sizing_scales_by_confidence() {
        let closes = rising(60);
        let mut cfg = config_with(sma_only());
        cfg.dynamic_position_sizing = true;
        cfg.bullish_position_multiplier = 1.0;
        let generator = AdaptiveSignalGenerator::new(&cfg, &closes);
        let mut state = RegimeState::new();
        state.observe(Regime::Bullish, 0.5, 1);
        let signal = generator.generate(&closes, 59, &state);
        assert!((signal.position_multiplier - 0.5).abs() < 1e-12);
    }

    #[test]
    fn warmup_covers_all_indicators() {
        let closes = rising(120);
        let cfg = config_with(vec![
            IndicatorSpec::new(IndicatorKind::Macd, 1.0),
            IndicatorSpec::new(IndicatorKind::Sma, 1.0).with_param("period", 50.0),
        ]);
        let generator = AdaptiveSignalGenerator::new(&cfg, &closes);
        // sma_50 warmup 49 dominates macd (12/26/9 -> 33) and rsi_14.
        assert_eq!(generator.warmup(), 49);
    }

    #[test]
    fn contributions_are_recorded_per_indicator() {
        let closes = rising(60);
        let cfg = config_with(vec![
            IndicatorSpec::new(IndicatorKind::Sma, 1.0).with_param("period", 10.0),
            IndicatorSpec::new(IndicatorKind::Rsi, 0.5).with_param("period", 14.0),
        ]);
        let generator = AdaptiveSignalGenerator::new(&cfg, &closes);
        let signal = generator.generate(&closes, 59, &bullish_state());
        assert!(signal.contributions.contains_key("sma_10"));
        assert!(signal.contributions.contains_key("rsi_14"));
    }
}
