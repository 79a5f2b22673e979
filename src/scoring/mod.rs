//! Adaptive scoring - fatigue / recovery / performance model
//!
//! Three bounded scalars evolve after every logged session and with
//! elapsed time. Readiness blends them into a single 0-100 signal that
//! drives plan adaptation, advice, and deload suggestions.

pub mod advice;
pub mod progression;

pub use advice::{DeloadSuggestion, ReadinessTier};
pub use progression::Progression;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_FATIGUE: f64 = 35.0;
pub const DEFAULT_RECOVERY: f64 = 55.0;
pub const DEFAULT_PERFORMANCE: f64 = 55.0;

/// Performance drifts back toward this when not training
const PERFORMANCE_BASELINE: f64 = 55.0;

/// Logged sessions per counted week
const SESSIONS_PER_WEEK: usize = 4;

/// Earliest week a deload can be suggested
const DELOAD_MIN_WEEK: u32 = 5;
const DELOAD_FATIGUE: f64 = 65.0;
const DELOAD_READINESS: u8 = 45;

/// Perceived session intensity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Easy => "easy",
            Intensity::Normal => "normal",
            Intensity::Hard => "hard",
        }
    }

    fn fatigue_mod(&self) -> f64 {
        match self {
            Intensity::Hard => 8.0,
            Intensity::Easy => -4.0,
            Intensity::Normal => 2.0,
        }
    }

    fn recovery_cost(&self) -> f64 {
        match self {
            Intensity::Hard => 6.0,
            _ => 3.0,
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intensity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            _ => Err(format!("Unknown intensity: {}", s)),
        }
    }
}

/// Raw metrics of one logged session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionInput {
    /// 1-5
    pub rating: u8,
    /// 0-1
    pub completion: f64,
    pub intensity: Intensity,
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringState {
    pub fatigue: f64,
    pub recovery: f64,
    pub performance: f64,
    pub last_updated: DateTime<Utc>,
    /// Coarse week counter, +1 every fourth logged session
    pub week: u32,
    pub deload_suggested_at_week: Option<u32>,
}

impl Default for ScoringState {
    fn default() -> Self {
        Self {
            fatigue: DEFAULT_FATIGUE,
            recovery: DEFAULT_RECOVERY,
            performance: DEFAULT_PERFORMANCE,
            last_updated: Utc::now(),
            week: 1,
            deload_suggested_at_week: None,
        }
    }
}

impl ScoringState {
    /// Blend of recovery, performance and inverted fatigue, 0-100
    pub fn readiness(&self) -> u8 {
        let raw = self.recovery * 0.45 + self.performance * 0.35 + (100.0 - self.fatigue) * 0.20;
        clamp_score(raw).round() as u8
    }

    pub fn tier(&self) -> ReadinessTier {
        ReadinessTier::from_readiness(self.readiness())
    }

    pub fn is_within_bounds(&self) -> bool {
        [self.fatigue, self.recovery, self.performance]
            .iter()
            .all(|v| (0.0..=100.0).contains(v))
    }

    /// Fold one logged session into the model.
    ///
    /// `history_len` is the history size including this session; it
    /// drives the week counter. Inputs are never rejected, results are
    /// clamped.
    pub fn update_after_workout(
        &mut self,
        session: &SessionInput,
        history_len: usize,
        auto_deload: bool,
        now: DateTime<Utc>,
    ) -> Option<DeloadSuggestion> {
        let rating = f64::from(session.rating);
        let rated_well = session.rating >= 4;
        let relief = if rated_well { 2.0 } else { 0.0 };

        let rating_boost = (rating - 3.0) * 3.0;
        let completion_boost = (session.completion - 0.75) * 20.0;

        self.fatigue = clamp_score(
            self.fatigue + session.intensity.fatigue_mod() + session.completion * 6.0 - relief,
        );
        self.recovery = clamp_score(self.recovery - (10.0 + session.intensity.recovery_cost()) + relief);
        self.performance = clamp_score(self.performance + rating_boost + completion_boost);
        self.last_updated = now;

        if history_len > 0 && history_len % SESSIONS_PER_WEEK == 0 {
            self.week += 1;
        }

        info!(
            fatigue = self.fatigue,
            recovery = self.recovery,
            performance = self.performance,
            week = self.week,
            "scoring updated"
        );

        self.maybe_suggest_deload(auto_deload)
    }

    /// Apply recovery for whole days elapsed since the last update.
    /// Returns the number of days applied.
    pub fn recover_over_time(&mut self, now: DateTime<Utc>) -> i64 {
        let days = (now - self.last_updated).num_days();
        if days <= 0 {
            return 0;
        }
        let d = days as f64;

        self.fatigue = clamp_score(self.fatigue - 5.0 * d);
        self.recovery = clamp_score(self.recovery + 9.0 * d);

        let gap = PERFORMANCE_BASELINE - self.performance;
        let step = (2.0 * d).min(gap.abs());
        self.performance = clamp_score(self.performance + step.copysign(gap));

        self.last_updated = now;
        debug!(days, readiness = self.readiness(), "recovered over time");
        days
    }

    /// Suggest a deload at most once per week counter value
    pub fn maybe_suggest_deload(&mut self, auto_deload: bool) -> Option<DeloadSuggestion> {
        if !auto_deload || self.week < DELOAD_MIN_WEEK {
            return None;
        }
        if self.deload_suggested_at_week == Some(self.week) {
            return None;
        }

        let readiness = self.readiness();
        if self.fatigue >= DELOAD_FATIGUE || readiness < DELOAD_READINESS {
            self.deload_suggested_at_week = Some(self.week);
            info!(week = self.week, fatigue = self.fatigue, readiness, "deload suggested");
            return Some(DeloadSuggestion::new(self.week, readiness));
        }
        None
    }
}
