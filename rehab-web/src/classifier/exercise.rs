//! Exercise catalog
//!
//! Each exercise type selects one classification rule and carries the
//! descriptive text shown on the selection screen.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::rules::{ArmExtension, ExerciseRule, HandRaise, LegLift, NeckRotation, SideBend};

/// Supported rehabilitation exercises
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExerciseType {
    HandRaise,
    LegLift,
    SideBend,
    NeckRotation,
    ArmExtension,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Gentle,
    Moderate,
}

/// Display metadata for the exercise picker
#[derive(Clone, Debug, Serialize)]
pub struct ExerciseInfo {
    pub id: ExerciseType,
    pub name: &'static str,
    pub description: &'static str,
    pub instruction: &'static str,
    pub difficulty: Difficulty,
    pub target_muscles: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown exercise id: {0}")]
pub struct UnknownExercise(pub String);

impl ExerciseType {
    pub const ALL: [ExerciseType; 5] = [
        ExerciseType::HandRaise,
        ExerciseType::LegLift,
        ExerciseType::SideBend,
        ExerciseType::NeckRotation,
        ExerciseType::ArmExtension,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ExerciseType::HandRaise => "HAND_RAISE",
            ExerciseType::LegLift => "LEG_LIFT",
            ExerciseType::SideBend => "SIDE_BEND",
            ExerciseType::NeckRotation => "NECK_ROTATION",
            ExerciseType::ArmExtension => "ARM_EXTENSION",
        }
    }

    /// Classification rule for this exercise
    pub fn rule(&self) -> &'static dyn ExerciseRule {
        match self {
            ExerciseType::HandRaise => &HandRaise,
            ExerciseType::LegLift => &LegLift,
            ExerciseType::SideBend => &SideBend,
            ExerciseType::NeckRotation => &NeckRotation,
            ExerciseType::ArmExtension => &ArmExtension,
        }
    }

    pub fn info(&self) -> ExerciseInfo {
        match self {
            ExerciseType::HandRaise => ExerciseInfo {
                id: *self,
                name: "Dual Hand Reach",
                description: "Gentle overhead reaching to improve shoulder mobility.",
                instruction: "Slowly raise both hands above your head, then lower them.",
                difficulty: Difficulty::Gentle,
                target_muscles: &["Shoulders", "Upper Back"],
            },
            ExerciseType::LegLift => ExerciseInfo {
                id: *self,
                name: "Seated Knee Lift",
                description: "Hip strengthening exercise suitable for standing or sitting.",
                instruction: "Lift one knee up gently towards your chest, then switch.",
                difficulty: Difficulty::Moderate,
                target_muscles: &["Hip Flexors", "Thighs"],
            },
            ExerciseType::SideBend => ExerciseInfo {
                id: *self,
                name: "Torso Sway",
                description: "Lateral spine movement to reduce stiffness.",
                instruction: "Keep hips still. Gently lean your upper body to the left, then right.",
                difficulty: Difficulty::Gentle,
                target_muscles: &["Core", "Lower Back"],
            },
            ExerciseType::NeckRotation => ExerciseInfo {
                id: *self,
                name: "Visual Tracking",
                description: "Neck mobility and vestibular system engagement.",
                instruction: "Slowly turn your head to look left, then turn to look right.",
                difficulty: Difficulty::Gentle,
                target_muscles: &["Neck", "Vestibular System"],
            },
            ExerciseType::ArmExtension => ExerciseInfo {
                id: *self,
                name: "T-Pose Expansion",
                description: "Chest opening and posture correction.",
                instruction: "Start hands at chest, open arms wide to the sides like a 'T'.",
                difficulty: Difficulty::Gentle,
                target_muscles: &["Chest", "Upper Back"],
            },
        }
    }

    /// Full catalog in menu order
    pub fn catalog() -> Vec<ExerciseInfo> {
        Self::ALL.iter().map(ExerciseType::info).collect()
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ExerciseType {
    type Err = UnknownExercise;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|ex| ex.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownExercise(s.to_string()))
    }
}
