//! Repetition state machine
//!
//! Consumes the classified phase stream and credits a repetition on the
//! first frame that enters the target phase. A debounce window after each
//! repetition swallows every observation, so camera jitter around the
//! threshold cannot double count.

use serde::Serialize;

use crate::classifier::MovementPhase;

/// Emitted on the frame a repetition is credited
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RepetitionEvent {
    pub at_ms: f64,
}

/// Tracked phase plus the debounce clock
///
/// A plain value: `step` returns the next state instead of mutating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepetitionTracker {
    phase: MovementPhase,
    last_rep_ms: Option<f64>,
    debounce_ms: f64,
}

impl RepetitionTracker {
    pub fn new(debounce_ms: f64) -> Self {
        Self {
            phase: MovementPhase::Neutral,
            last_rep_ms: None,
            debounce_ms,
        }
    }

    /// Tracked phase (not the latest classifier output)
    pub fn phase(&self) -> MovementPhase {
        self.phase
    }

    pub fn last_repetition_ms(&self) -> Option<f64> {
        self.last_rep_ms
    }

    pub fn in_debounce(&self, now_ms: f64) -> bool {
        self.last_rep_ms
            .is_some_and(|last| now_ms - last < self.debounce_ms)
    }

    /// Advance by one observation
    pub fn step(self, observed: MovementPhase, now_ms: f64) -> (Self, Option<RepetitionEvent>) {
        if self.in_debounce(now_ms) {
            return (self, None);
        }

        match observed {
            MovementPhase::Target if self.phase != MovementPhase::Target => {
                let next = Self {
                    phase: MovementPhase::Target,
                    last_rep_ms: Some(now_ms),
                    ..self
                };
                (next, Some(RepetitionEvent { at_ms: now_ms }))
            }
            MovementPhase::Ready => (
                Self {
                    phase: MovementPhase::Ready,
                    ..self
                },
                None,
            ),
            // Neutral, or still holding the target
            _ => (self, None),
        }
    }

    /// In-place form of `step`
    pub fn observe(&mut self, observed: MovementPhase, now_ms: f64) -> Option<RepetitionEvent> {
        let (next, event) = self.step(observed, now_ms);
        *self = next;
        event
    }
}

impl Default for RepetitionTracker {
    fn default() -> Self {
        Self::new(2000.0)
    }
}
