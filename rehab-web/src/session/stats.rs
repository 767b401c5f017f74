//! Session statistics
//!
//! Written only by the session that owns them; everyone else gets a
//! `Copy` snapshot.

use serde::Serialize;

use crate::config::ScoringConfig;

pub const MAX_ACCURACY: f32 = 100.0;

/// Whether a counted repetition was performed with correct form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormQuality {
    Good,
    Poor,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SessionStats {
    pub reps: u32,
    /// Rough energy proxy, kept low for rehab movement
    pub calories: f32,
    /// Stability score in [0, 100]
    pub accuracy: f32,
    /// Seconds since the session started
    pub duration: f64,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            reps: 0,
            calories: 0.0,
            accuracy: MAX_ACCURACY,
            duration: 0.0,
        }
    }
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one completed repetition
    pub fn record_repetition(&mut self, form: FormQuality, scoring: &ScoringConfig) {
        self.reps = self.reps.saturating_add(1);
        self.calories += scoring.calories_per_rep.max(0.0);
        self.accuracy = match form {
            FormQuality::Good => (self.accuracy + scoring.accuracy_reward).min(MAX_ACCURACY),
            FormQuality::Poor => (self.accuracy - scoring.accuracy_penalty).max(0.0),
        };
    }

    pub fn set_duration(&mut self, seconds: f64) {
        self.duration = seconds.max(0.0);
    }

    /// Stability score rounded for display and prompts
    pub fn rounded_accuracy(&self) -> u32 {
        self.accuracy.round() as u32
    }
}
