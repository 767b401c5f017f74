//! A running exercise session
//!
//! Owns the repetition tracker and statistics for one exercise. Frames
//! go in, a `FrameReport` comes out; nothing here blocks or waits on the
//! coaching service.

use serde::Serialize;
use tracing::info;

use crate::classifier::{classify_with, ExerciseType, MovementPhase};
use crate::coaching::CoachingIntent;
use crate::config::RehabConfig;
use crate::pose::{JointAngles, LandmarkFrame};

use super::stats::{FormQuality, SessionStats};
use super::tracker::{RepetitionEvent, RepetitionTracker};

/// Everything the UI needs after one frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameReport {
    pub session_id: u64,
    /// Classifier output for this frame
    pub phase: MovementPhase,
    /// Phase held by the repetition tracker
    pub tracked_phase: MovementPhase,
    pub instruction: &'static str,
    pub repetition: Option<RepetitionEvent>,
    pub coaching: Option<CoachingIntent>,
    pub joints: JointAngles,
    pub stats: SessionStats,
}

pub struct Session {
    id: u64,
    exercise: ExerciseType,
    started_at_ms: f64,
    tracker: RepetitionTracker,
    stats: SessionStats,
    instruction: &'static str,
    config: RehabConfig,
}

impl Session {
    pub fn new(id: u64, exercise: ExerciseType, started_at_ms: f64, config: RehabConfig) -> Self {
        Self {
            id,
            exercise,
            started_at_ms,
            tracker: RepetitionTracker::new(config.timing.rep_debounce_ms),
            stats: SessionStats::new(),
            instruction: exercise.info().instruction,
            config,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn exercise(&self) -> ExerciseType {
        self.exercise
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn instruction(&self) -> &'static str {
        self.instruction
    }

    pub fn tracked_phase(&self) -> MovementPhase {
        self.tracker.phase()
    }

    /// Classify one frame and advance the repetition state machine
    pub fn process(&mut self, frame: &LandmarkFrame, now_ms: f64) -> FrameReport {
        let classification = classify_with(self.exercise, frame, &self.config.thresholds);
        self.instruction = classification.instruction;
        self.refresh_duration(now_ms);

        let repetition = self.tracker.observe(classification.phase, now_ms);
        let coaching = repetition.map(|_| {
            // No form-error detection exists, so every counted rep is good form
            self.record_repetition(FormQuality::Good);
            CoachingIntent {
                session_id: self.id,
                exercise: self.exercise,
                stats: self.stats,
            }
        });

        FrameReport {
            session_id: self.id,
            phase: classification.phase,
            tracked_phase: self.tracker.phase(),
            instruction: classification.instruction,
            repetition,
            coaching,
            joints: JointAngles::measure(frame),
            stats: self.stats,
        }
    }

    pub fn record_repetition(&mut self, form: FormQuality) {
        self.stats.record_repetition(form, &self.config.scoring);
        info!(
            session = self.id,
            exercise = %self.exercise,
            reps = self.stats.reps,
            accuracy = self.stats.accuracy,
            "Repetition counted"
        );
    }

    pub fn refresh_duration(&mut self, now_ms: f64) {
        self.stats.set_duration((now_ms - self.started_at_ms) / 1000.0);
    }
}
