//! Run scoring
//!
//! Tracks the live score plus the high score and rounded average across
//! every run finished in this process. Nothing here persists across
//! restarts; writing the values to a display is the embedder's job.

use serde::{Deserialize, Serialize};

/// Read-only engine summary exposed for UI binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub running: bool,
    pub paused: bool,
    pub lost: bool,
    /// Remaining hits the player can absorb (0..=3)
    pub lives: u32,
    pub current_score: u32,
    pub high_score: u32,
    pub average_score: u32,
}

/// Score tracking across the runs of one process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    /// Points earned in the run currently in progress
    pub current: u32,
    /// Best finished-or-current run seen so far
    pub high: u32,
    history: Vec<u32>,
    average: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Award points to the current run.
    pub fn award(&mut self, points: u32) {
        self.current += points;
    }

    /// Close out the current run: fold it into the high score and the
    /// rounded average over all finished runs.
    pub fn finish_run(&mut self) {
        self.high = self.high.max(self.current);
        self.history.push(self.current);
        let sum: u64 = self.history.iter().map(|&s| u64::from(s)).sum();
        self.average = (sum as f64 / self.history.len() as f64).round() as u32;
        log::info!(
            "run finished: score={} high={} avg={}",
            self.current,
            self.high,
            self.average
        );
    }

    /// Begin a fresh run. Finished-run history and the high score are kept.
    pub fn start_run(&mut self) {
        self.current = 0;
    }

    /// Rounded mean score over finished runs (0 before any run ends).
    pub fn average(&self) -> u32 {
        self.average
    }

    pub fn runs_finished(&self) -> usize {
        self.history.len()
    }
}
