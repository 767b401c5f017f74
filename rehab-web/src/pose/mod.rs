//! Pose module - landmark frames and body geometry
//!
//! Re-exports only. All logic in submodules.

mod geometry;
mod landmarks;
mod skeleton;

pub use geometry::{horizontal_span, joint_angle, midpoint, vertical_span, JointAngles};
pub use landmarks::{
    FrameError, Landmark, LandmarkFrame,
    // Constants
    DEFAULT_MIN_VISIBILITY, FLOATS_PER_LANDMARK, LANDMARK_COUNT,
    NOSE, LEFT_EYE, RIGHT_EYE, LEFT_EAR, RIGHT_EAR,
    LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_ELBOW, RIGHT_ELBOW,
    LEFT_WRIST, RIGHT_WRIST, LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE, LEFT_ANKLE, RIGHT_ANKLE,
};
pub use skeleton::{visible_bones, BODY_SKELETON};
