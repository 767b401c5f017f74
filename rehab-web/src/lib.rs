//! Rehab Web - pose-driven rehabilitation coaching
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen start hook
//!
//! The camera, MediaPipe Pose, skeleton overlay and text-generation SDK
//! live in JavaScript. Rust classifies each frame into an exercise phase,
//! counts repetitions, keeps the session statistics and schedules coaching
//! requests.

pub mod bridge;
pub mod classifier;
pub mod coaching;
pub mod config;
pub mod engine;
pub mod logging;
pub mod pose;
pub mod session;

use wasm_bindgen::prelude::*;

pub use classifier::{classify, classify_with, Classification, ExerciseType, MovementPhase};
pub use config::RehabConfig;
pub use engine::{FinishedSession, RehabEngine};
pub use pose::{Landmark, LandmarkFrame};
pub use session::{FrameReport, SessionStats};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
