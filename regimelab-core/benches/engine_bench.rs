//! Criterion benchmarks for RegimeLab hot paths.
//!
//! Benchmarks:
//! 1. Full simulation over growing series lengths
//! 2. Indicator precompute batch (SMA, EMA, MACD, RSI, Bollinger)
//! 3. Regime scoring and hysteresis stepping

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chrono::{TimeZone, Utc};
use regimelab_core::config::{AdaptiveConfig, IndicatorKind, IndicatorSpec, StrategySubConfig};
use regimelab_core::domain::Candle;
use regimelab_core::engine::run_simulation;
use regimelab_core::indicators::{bollinger, ema, macd, rsi, sma};
use regimelab_core::regime::{RegimeDetector, RegimeState};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 10.0 + i as f64 * 0.02)
        .collect()
}

fn make_candles(n: usize) -> Vec<Candle> {
    make_closes(n)
        .into_iter()
        .enumerate()
        .map(|(i, close)| Candle {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
                + chrono::Duration::hours(i as i64),
            open: close - 0.3,
            high: close + 1.5,
            low: close - 1.5,
            close,
            volume: 1_000_000.0,
        })
        .collect()
}

fn bench_config() -> AdaptiveConfig {
    let sub = |name: &str| StrategySubConfig {
        name: name.to_string(),
        timeframe: "1h".to_string(),
        indicators: vec![
            IndicatorSpec::new(IndicatorKind::Sma, 1.0).with_param("period", 20.0),
            IndicatorSpec::new(IndicatorKind::Macd, 1.0),
            IndicatorSpec::new(IndicatorKind::Rsi, 0.5).with_param("period", 14.0),
            IndicatorSpec::new(IndicatorKind::BollingerBands, 0.5).with_param("period", 20.0),
        ],
        buy_threshold: 0.2,
        sell_threshold: -0.2,
        max_position_pct: 0.5,
        initial_capital: 10_000.0,
    };
    AdaptiveConfig {
        bullish: sub("bull"),
        bearish: sub("bear"),
        regime_confidence_threshold: 0.3,
        momentum_confirmation_threshold: 0.1,
        bullish_position_multiplier: 1.5,
        regime_persistence_periods: 3,
        dynamic_position_sizing: true,
        max_bullish_position: 0.8,
        max_volatility: 0.1,
        circuit_breaker_win_rate: 0.35,
        circuit_breaker_lookback: 5,
        whipsaw_detection_periods: 10,
        whipsaw_max_changes: 3,
    }
}

// ── 1. Full simulation ───────────────────────────────────────────────

fn bench_simulation(c: &mut Criterion) {
    let config = bench_config();
    let mut group = c.benchmark_group("run_simulation");
    for n in [500usize, 2_000, 10_000] {
        let candles = make_candles(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &candles, |b, candles| {
            b.iter(|| run_simulation(black_box(candles), black_box(&config)).unwrap());
        });
    }
    group.finish();
}

// ── 2. Indicator batch ───────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let closes = make_closes(10_000);
    c.bench_function("indicator_batch_10k", |b| {
        b.iter(|| {
            let closes = black_box(&closes);
            black_box(sma(closes, 20));
            black_box(ema(closes, 20));
            black_box(macd(closes, 12, 26, 9));
            black_box(rsi(closes, 14));
            black_box(bollinger(closes, 20, 2.0));
        });
    });
}

// ── 3. Regime stepping ───────────────────────────────────────────────

fn bench_regime(c: &mut Criterion) {
    let closes = make_closes(10_000);
    let detector = RegimeDetector::from_closes(&closes, 3);
    c.bench_function("regime_steps_10k", |b| {
        b.iter(|| {
            let mut state = RegimeState::new();
            for index in detector.warmup()..closes.len() {
                detector.step(&mut state, index);
            }
            black_box(state)
        });
    });
}

criterion_group!(benches, bench_simulation, bench_indicators, bench_regime);
criterion_main!(benches);
