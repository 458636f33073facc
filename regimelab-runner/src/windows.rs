//! Backtest windows — named candle slices, historical or synthetic.
//!
//! Synthetic windows are generated from a master seed expanded into
//! per-window sub-seeds via BLAKE3. Because derivation is hash-based (not
//! order-dependent), the same master seed produces identical windows
//! regardless of generation or evaluation order. Synthetic timestamps are
//! evenly spaced and never feed any computation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regimelab_core::domain::Candle;
use serde::{Deserialize, Serialize};

/// How a window's score contributes to the optimizer's weighted total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowRole {
    /// Main historical window: return, outperformance, drawdown penalty.
    Primary,
    /// Synthetic stand-in for the primary window: same weight trio.
    SyntheticPrimary,
    /// Secondary bullish historical window: return only.
    SecondaryBull,
    /// Synthetic bull run: return only.
    SyntheticBull,
    /// Reported but unweighted.
    Auxiliary,
}

/// One named candle window a config is evaluated against.
#[derive(Debug, Clone)]
pub struct BacktestWindow {
    pub name: String,
    pub role: WindowRole,
    pub candles: Vec<Candle>,
}

impl BacktestWindow {
    pub fn new(name: &str, role: WindowRole, candles: Vec<Candle>) -> Self {
        Self {
            name: name.to_string(),
            role,
            candles,
        }
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }
}

/// Derive a deterministic sub-seed for one window from the master seed.
///
/// Hash-based, so `sub_seed(s, "a")` is unaffected by whether `"b"` was
/// derived before or after it.
pub fn sub_seed(master_seed: u64, window_name: &str) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&master_seed.to_le_bytes());
    hasher.update(window_name.as_bytes());
    let hash = hasher.finalize();
    u64::from_le_bytes(
        hash.as_bytes()[..8]
            .try_into()
            .expect("blake3 output is 32 bytes"),
    )
}

fn base_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Build candles around a close path with small deterministic wicks.
fn candles_from_path(closes: &[f64]) -> Vec<Candle> {
    let mut candles = Vec::with_capacity(closes.len());
    let mut prev = closes.first().copied().unwrap_or(0.0);
    for (i, &close) in closes.iter().enumerate() {
        let (open, high, low) = if close >= prev {
            (prev, close * 1.002, prev * 0.998)
        } else {
            (prev, prev * 1.002, close * 0.998)
        };
        candles.push(Candle {
            timestamp: base_timestamp() + Duration::hours(i as i64),
            open,
            high,
            low,
            close,
            volume: 1_000.0 + (i % 97) as f64 * 10.0,
        });
        prev = close;
    }
    candles
}

/// Seeded geometric walk: per-bar return = drift + uniform shock.
fn walk(rng: &mut StdRng, length: usize, start: f64, drift: f64, shock: f64) -> Vec<f64> {
    let mut price = start;
    (0..length)
        .map(|_| {
            let step = drift + rng.gen_range(-shock..=shock);
            price *= 1.0 + step;
            price
        })
        .collect()
}

/// Random walk with mild upward drift — the synthetic primary stand-in.
pub fn synthetic_drift_walk(master_seed: u64, length: usize) -> BacktestWindow {
    let name = "synthetic_drift_walk";
    let mut rng = StdRng::seed_from_u64(sub_seed(master_seed, name));
    let closes = walk(&mut rng, length, 100.0, 0.0003, 0.01);
    BacktestWindow::new(name, WindowRole::SyntheticPrimary, candles_from_path(&closes))
}

/// Sustained bull run with noise.
pub fn synthetic_bull_run(master_seed: u64, length: usize) -> BacktestWindow {
    let name = "synthetic_bull_run";
    let mut rng = StdRng::seed_from_u64(sub_seed(master_seed, name));
    let closes = walk(&mut rng, length, 100.0, 0.004, 0.008);
    BacktestWindow::new(name, WindowRole::SyntheticBull, candles_from_path(&closes))
}

/// Sustained bear slide with noise.
pub fn synthetic_bear_slide(master_seed: u64, length: usize) -> BacktestWindow {
    let name = "synthetic_bear_slide";
    let mut rng = StdRng::seed_from_u64(sub_seed(master_seed, name));
    let closes = walk(&mut rng, length, 100.0, -0.003, 0.008);
    BacktestWindow::new(name, WindowRole::Auxiliary, candles_from_path(&closes))
}

/// Driftless sideways chop.
pub fn synthetic_sideways_chop(master_seed: u64, length: usize) -> BacktestWindow {
    let name = "synthetic_sideways_chop";
    let mut rng = StdRng::seed_from_u64(sub_seed(master_seed, name));
    let closes = walk(&mut rng, length, 100.0, 0.0, 0.006);
    BacktestWindow::new(name, WindowRole::Auxiliary, candles_from_path(&closes))
}

/// High-amplitude whipsaw: alternating drift segments plus noise.
pub fn synthetic_whipsaw(master_seed: u64, length: usize) -> BacktestWindow {
    let name = "synthetic_whipsaw";
    let mut rng = StdRng::seed_from_u64(sub_seed(master_seed, name));
    let mut price = 100.0;
    let closes: Vec<f64> = (0..length)
        .map(|i| {
            // Flip drift sign every 15 bars.
            let drift = if (i / 15) % 2 == 0 { 0.006 } else { -0.006 };
            let step = drift + rng.gen_range(-0.012..=0.012);
            price *= 1.0 + step;
            price
        })
        .collect();
    BacktestWindow::new(name, WindowRole::Auxiliary, candles_from_path(&closes))
}

/// The full synthetic window suite for one master seed.
pub fn synthetic_suite(master_seed: u64, length: usize) -> Vec<BacktestWindow> {
    vec![
        synthetic_drift_walk(master_seed, length),
        synthetic_bull_run(master_seed, length),
        synthetic_bear_slide(master_seed, length),
        synthetic_sideways_chop(master_seed, length),
        synthetic_whipsaw(master_seed, length),
    ]
}

/// Wrap an externally supplied historical series as the primary window.
pub fn historical_window(name: &str, role: WindowRole, candles: Vec<Candle>) -> BacktestWindow {
    BacktestWindow::new(name, role, candles)
}
