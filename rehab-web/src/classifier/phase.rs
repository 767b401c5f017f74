//! Movement phases and per-frame classification output

use serde::Serialize;

/// Three-state phase shared by every exercise
///
/// `Target` is the effortful position whose entry counts a repetition,
/// `Ready` is the rest position the patient returns to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum MovementPhase {
    #[default]
    #[serde(rename = "NEUTRAL")]
    Neutral,
    #[serde(rename = "PHASE_1")]
    Target,
    #[serde(rename = "PHASE_2")]
    Ready,
}

impl MovementPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementPhase::Neutral => "NEUTRAL",
            MovementPhase::Target => "PHASE_1",
            MovementPhase::Ready => "PHASE_2",
        }
    }
}

/// Result of classifying one frame: a phase and on-screen guidance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub phase: MovementPhase,
    pub instruction: &'static str,
}

impl Classification {
    pub const fn new(phase: MovementPhase, instruction: &'static str) -> Self {
        Self { phase, instruction }
    }
}
