//! Skeleton connections for the overlay
//!
//! Drawing happens in JavaScript; Rust decides which bones are
//! trustworthy enough to draw.

use super::landmarks::*;

/// Body skeleton connections (pairs of landmark indices)
pub const BODY_SKELETON: [(usize, usize); 16] = [
    // Head
    (LEFT_EAR, LEFT_EYE),
    (RIGHT_EAR, RIGHT_EYE),
    // Torso
    (LEFT_SHOULDER, RIGHT_SHOULDER),
    (LEFT_SHOULDER, LEFT_HIP),
    (RIGHT_SHOULDER, RIGHT_HIP),
    (LEFT_HIP, RIGHT_HIP),
    // Arms
    (LEFT_SHOULDER, LEFT_ELBOW),
    (LEFT_ELBOW, LEFT_WRIST),
    (RIGHT_SHOULDER, RIGHT_ELBOW),
    (RIGHT_ELBOW, RIGHT_WRIST),
    // Legs
    (LEFT_HIP, LEFT_KNEE),
    (LEFT_KNEE, LEFT_ANKLE),
    (RIGHT_HIP, RIGHT_KNEE),
    (RIGHT_KNEE, RIGHT_ANKLE),
    // Eyes to nose
    (NOSE, LEFT_EYE),
    (NOSE, RIGHT_EYE),
];

/// Bones whose two endpoints both meet the visibility threshold
pub fn visible_bones(frame: &LandmarkFrame, min_visibility: f32) -> Vec<(usize, usize)> {
    BODY_SKELETON
        .iter()
        .copied()
        .filter(|&(a, b)| frame.all_visible(&[a, b], min_visibility))
        .collect()
}
