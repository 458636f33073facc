//! Market regime classification with hysteresis.
//!
//! The detector scores each step, maps the score to a candidate label, and
//! commits a regime change only after the candidate has persisted for a
//! configured number of consecutive steps. Until commit, the previously
//! active regime stays in effect for everything downstream.

pub mod detector;

pub use detector::{classify, RegimeDetector, REGIME_SCORE_THRESHOLD};

use serde::{Deserialize, Serialize};

/// Market-condition classification driving which sub-config is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    Bullish,
    Bearish,
    Neutral,
}

/// Cap on the rolling label history kept for whipsaw detection.
const MAX_HISTORY: usize = 64;

/// Run-scoped regime state.
///
/// Owned by exactly one simulation; created at run start and never shared
/// across runs, so repeated or concurrent backtests cannot cross-contaminate
/// (there is deliberately no global/static regime cache).
#[derive(Debug, Clone)]
pub struct RegimeState {
    /// Committed regime currently in effect.
    pub current: Regime,
    /// Confidence of the committed regime, in [0, 1].
    pub confidence: f64,
    /// Steps the committed regime has held (used by the persistence gate).
    pub committed_for: usize,
    candidate: Option<Regime>,
    candidate_run: usize,
    /// Raw observed labels, most recent last, capped at `MAX_HISTORY`.
    history: Vec<Regime>,
}

impl RegimeState {
    pub fn new() -> Self {
        Self {
            current: Regime::Neutral,
            confidence: 0.0,
            committed_for: 0,
            candidate: None,
            candidate_run: 0,
            history: Vec::new(),
        }
    }

    /// Explicit reset between independent runs.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed one step's observed label and confidence through the hysteresis.
    ///
    /// A label matching the committed regime clears any pending candidate.
    /// A differing label must repeat for `persistence_periods` consecutive
    /// steps before it replaces the committed regime.
    pub fn observe(&mut self, observed: Regime, confidence: f64, persistence_periods: usize) {
        self.history.push(observed);
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }

        if observed == self.current {
            self.candidate = None;
            self.candidate_run = 0;
            self.confidence = confidence;
            self.committed_for += 1;
            return;
        }

        if self.candidate == Some(observed) {
            self.candidate_run += 1;
        } else {
            self.candidate = Some(observed);
            self.candidate_run = 1;
        }

        if self.candidate_run >= persistence_periods {
            self.current = observed;
            self.confidence = confidence;
            self.committed_for = 1;
            self.candidate = None;
            self.candidate_run = 0;
        } else {
            // Candidate still pending; the committed regime stays in effect.
            self.committed_for += 1;
        }
    }

    /// Count label changes within the trailing `window` observed steps.
    pub fn recent_changes(&self, window: usize) -> usize {
        let tail = if self.history.len() > window {
            &self.history[self.history.len() - window..]
        } else {
            &self.history[..]
        };
        tail.windows(2).filter(|pair| pair[0] != pair[1]).count()
    }

    pub fn history(&self) -> &[Regime] {
        &self.history
    }
}

impl Default for RegimeState {
    fn default() -> Self {
        Self::new()
    }
}
