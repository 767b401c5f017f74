//! Landmark frame - the per-frame pose snapshot
//!
//! The pose estimator runs in JavaScript (MediaPipe Pose) and hands us
//! 33 landmarks per frame. Everything downstream reads a `LandmarkFrame`,
//! which can only be built from a complete, finite set of landmarks.

use serde::{Deserialize, Serialize};

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

/// Number of landmarks in a complete pose frame
pub const LANDMARK_COUNT: usize = 33;

/// Floats per landmark in the flat JS buffer: x, y, z, visibility
pub const FLOATS_PER_LANDMARK: usize = 4;

pub const NOSE: usize = 0;
pub const LEFT_EYE: usize = 2;
pub const RIGHT_EYE: usize = 5;
pub const LEFT_EAR: usize = 7;
pub const RIGHT_EAR: usize = 8;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

/// Visibility below this is not trusted for drawing or reasoning
pub const DEFAULT_MIN_VISIBILITY: f32 = 0.5;

// ============================================================================
// LANDMARK DATA STRUCTURE
// ============================================================================

/// A single landmark in normalized frame coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,          // 0-1 normalized
    pub y: f32,          // 0-1 normalized, grows downward
    pub z: f32,          // Relative depth (unused by classification)
    pub visibility: f32, // 0-1 confidence
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }

    /// Fully visible landmark on the image plane
    pub fn at(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0, 1.0)
    }

    pub fn is_visible(&self, min_visibility: f32) -> bool {
        self.visibility >= min_visibility
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Reasons a frame is rejected before classification
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameError {
    #[error("frame has {found} landmarks, expected 33")]
    TooFewLandmarks { found: usize },
    #[error("landmark buffer length {len} is not a multiple of 4")]
    MisalignedBuffer { len: usize },
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// A complete 33-landmark pose for one camera frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandmarkFrame {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl LandmarkFrame {
    /// Build a frame from provider output. Extra entries are ignored.
    pub fn from_landmarks(landmarks: &[Landmark]) -> Result<Self, FrameError> {
        if landmarks.len() < LANDMARK_COUNT {
            return Err(FrameError::TooFewLandmarks {
                found: landmarks.len(),
            });
        }

        let mut frame = [Landmark::default(); LANDMARK_COUNT];
        frame.copy_from_slice(&landmarks[..LANDMARK_COUNT]);
        Self::checked(frame)
    }

    /// Build a frame from the flat Float32Array sent by JavaScript
    /// (33 landmarks x [x, y, z, visibility] = 132 values)
    pub fn from_flat(data: &[f32]) -> Result<Self, FrameError> {
        if data.len() % FLOATS_PER_LANDMARK != 0 {
            return Err(FrameError::MisalignedBuffer { len: data.len() });
        }

        let found = data.len() / FLOATS_PER_LANDMARK;
        if found < LANDMARK_COUNT {
            return Err(FrameError::TooFewLandmarks { found });
        }

        let mut frame = [Landmark::default(); LANDMARK_COUNT];
        for (slot, chunk) in frame
            .iter_mut()
            .zip(data.chunks_exact(FLOATS_PER_LANDMARK))
        {
            *slot = Landmark::new(chunk[0], chunk[1], chunk[2], chunk[3]);
        }
        Self::checked(frame)
    }

    fn checked(landmarks: [Landmark; LANDMARK_COUNT]) -> Result<Self, FrameError> {
        if let Some(index) = landmarks
            .iter()
            .position(|lm| !lm.x.is_finite() || !lm.y.is_finite())
        {
            return Err(FrameError::NonFinite { index });
        }
        Ok(Self { landmarks })
    }

    /// Landmark by MediaPipe index. Indices are the constants above.
    ///
    /// # Panics
    /// If `index >= LANDMARK_COUNT`.
    pub fn get(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// True when every listed landmark meets the visibility threshold
    ///
    /// # Panics
    /// If any index is `>= LANDMARK_COUNT`.
    pub fn all_visible(&self, indices: &[usize], min_visibility: f32) -> bool {
        indices
            .iter()
            .all(|&i| self.landmarks[i].is_visible(min_visibility))
    }

    /// Copy with one landmark replaced (test and fixture helper)
    ///
    /// # Panics
    /// If `index >= LANDMARK_COUNT`.
    pub fn with(mut self, index: usize, landmark: Landmark) -> Self {
        self.landmarks[index] = landmark;
        self
    }
}

impl Default for LandmarkFrame {
    /// All landmarks at the frame center, fully visible
    fn default() -> Self {
        Self {
            landmarks: [Landmark::at(0.5, 0.5); LANDMARK_COUNT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_landmark_list_is_rejected() {
        let lms = vec![Landmark::at(0.1, 0.1); 32];
        assert_eq!(
            LandmarkFrame::from_landmarks(&lms),
            Err(FrameError::TooFewLandmarks { found: 32 })
        );
    }

    #[test]
    fn extra_landmarks_are_ignored() {
        let mut lms = vec![Landmark::at(0.2, 0.3); 40];
        lms[NOSE] = Landmark::at(0.4, 0.1);
        let frame = LandmarkFrame::from_landmarks(&lms).unwrap();
        assert_eq!(frame.get(NOSE).position(), (0.4, 0.1));
    }

    #[test]
    fn flat_buffer_reads_four_values_per_landmark() {
        let mut data = vec![0.5; LANDMARK_COUNT * FLOATS_PER_LANDMARK];
        let base = LEFT_WRIST * FLOATS_PER_LANDMARK;
        data[base] = 0.25;
        data[base + 1] = 0.75;
        data[base + 2] = -0.1;
        data[base + 3] = 0.3;

        let frame = LandmarkFrame::from_flat(&data).unwrap();
        let wrist = frame.get(LEFT_WRIST);
        assert_eq!(wrist, Landmark::new(0.25, 0.75, -0.1, 0.3));
        assert!(!wrist.is_visible(DEFAULT_MIN_VISIBILITY));
    }

    #[test]
    fn flat_buffer_errors() {
        assert_eq!(
            LandmarkFrame::from_flat(&[0.0; 99]),
            Err(FrameError::MisalignedBuffer { len: 99 })
        );
        assert_eq!(
            LandmarkFrame::from_flat(&[]),
            Err(FrameError::TooFewLandmarks { found: 0 })
        );
    }

    #[test]
    #[should_panic]
    fn index_past_the_last_landmark_panics() {
        LandmarkFrame::default().get(LANDMARK_COUNT);
    }

    #[test]
    fn nan_coordinate_is_rejected() {
        let frame = LandmarkFrame::default().with(RIGHT_KNEE, Landmark::at(f32::NAN, 0.2));
        assert_eq!(
            LandmarkFrame::from_landmarks(frame.landmarks()),
            Err(FrameError::NonFinite { index: RIGHT_KNEE })
        );
    }
}
