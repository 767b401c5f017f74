//! Joint angles and distances on the image plane
//!
//! All inputs are normalized (x, y) positions; z is ignored.

use serde::Serialize;

use super::landmarks::*;

/// Angle at vertex `b` formed by `a-b-c`, in degrees
///
/// Uses dot product formula: cos(θ) = (v1 · v2) / (|v1| × |v2|)
///
/// Returns angle in degrees within [0, 180]:
/// - 90° = right angle (e.g. elbow bent)
/// - 180° = points in a straight line
pub fn joint_angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    let v1 = (a.0 - b.0, a.1 - b.1);
    let v2 = (c.0 - b.0, c.1 - b.1);

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();

    // Degenerate: a point sits on the vertex
    if mag1 < 0.0001 || mag2 < 0.0001 {
        return 180.0;
    }

    let cos_angle = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

pub fn midpoint(a: (f32, f32), b: (f32, f32)) -> (f32, f32) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

/// Horizontal distance between two points
pub fn horizontal_span(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.0 - b.0).abs()
}

/// Vertical distance between two points
pub fn vertical_span(a: (f32, f32), b: (f32, f32)) -> f32 {
    (a.1 - b.1).abs()
}

/// Limb angles for the debug HUD (degrees, 180 = straight)
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct JointAngles {
    pub left_elbow: f32,
    pub right_elbow: f32,
    pub left_knee: f32,
    pub right_knee: f32,
}

impl JointAngles {
    pub fn measure(frame: &LandmarkFrame) -> Self {
        let angle_at = |a: usize, b: usize, c: usize| {
            joint_angle(frame.get(a).position(), frame.get(b).position(), frame.get(c).position())
        };

        Self {
            left_elbow: angle_at(LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST),
            right_elbow: angle_at(RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST),
            left_knee: angle_at(LEFT_HIP, LEFT_KNEE, LEFT_ANKLE),
            right_knee: angle_at(RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE),
        }
    }
}
