//! Classifier module - exercise phase classification
//!
//! Stateless: a frame plus an exercise type always maps to the same
//! phase and instruction. Repetition tracking lives in `session`.

mod exercise;
mod phase;
mod rules;

pub use exercise::{Difficulty, ExerciseInfo, ExerciseType, UnknownExercise};
pub use phase::{Classification, MovementPhase};
pub use rules::{ArmExtension, ExerciseRule, HandRaise, LegLift, NeckRotation, SideBend, STEP_INTO_VIEW};

use crate::config::Thresholds;
use crate::pose::LandmarkFrame;

/// Classify a frame with the default thresholds
pub fn classify(exercise: ExerciseType, frame: &LandmarkFrame) -> Classification {
    classify_with(exercise, frame, &Thresholds::default())
}

/// Classify a frame with configured thresholds
pub fn classify_with(
    exercise: ExerciseType,
    frame: &LandmarkFrame,
    thresholds: &Thresholds,
) -> Classification {
    let rule = exercise.rule();

    if thresholds.visibility_gate
        && !frame.all_visible(rule.key_landmarks(), thresholds.min_visibility)
    {
        return Classification::new(MovementPhase::Neutral, STEP_INTO_VIEW);
    }

    rule.evaluate(frame, thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Landmark, LEFT_WRIST, NOSE, RIGHT_WRIST};

    fn hands_up_frame() -> LandmarkFrame {
        LandmarkFrame::default()
            .with(NOSE, Landmark::at(0.5, 0.30))
            .with(LEFT_WRIST, Landmark::at(0.7, 0.10))
            .with(RIGHT_WRIST, Landmark::at(0.3, 0.10))
    }

    #[test]
    fn classification_is_deterministic_for_every_exercise() {
        let frame = hands_up_frame();
        for exercise in ExerciseType::ALL {
            let first = classify(exercise, &frame);
            let second = classify(exercise, &frame);
            assert_eq!(first, second);
            assert!(!first.instruction.is_empty());
        }
    }

    #[test]
    fn hand_raise_scenario() {
        assert_eq!(
            classify(ExerciseType::HandRaise, &hands_up_frame()),
            Classification::new(MovementPhase::Target, "Hold... Now Relax")
        );
    }

    #[test]
    fn visibility_gate_is_off_by_default() {
        let frame = hands_up_frame().with(NOSE, Landmark::new(0.5, 0.30, 0.0, 0.1));
        assert_eq!(classify(ExerciseType::HandRaise, &frame).phase, MovementPhase::Target);
    }

    #[test]
    fn visibility_gate_neutralises_hidden_key_landmarks() {
        let thresholds = Thresholds {
            visibility_gate: true,
            ..Thresholds::default()
        };
        let frame = hands_up_frame().with(NOSE, Landmark::new(0.5, 0.30, 0.0, 0.1));
        assert_eq!(
            classify_with(ExerciseType::HandRaise, &frame, &thresholds),
            Classification::new(MovementPhase::Neutral, STEP_INTO_VIEW)
        );

        // The nose is not a key landmark for leg lifts
        assert_ne!(
            classify_with(ExerciseType::LegLift, &frame, &thresholds).instruction,
            STEP_INTO_VIEW
        );
    }
}
