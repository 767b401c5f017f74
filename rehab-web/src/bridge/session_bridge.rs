//! Session bridge - JS ↔ Rust entry points for the rehab engine
//!
//! JavaScript owns the camera, MediaPipe and the text-generation SDK.
//! Per frame it pushes a flat landmark buffer and gets a JSON report back.
//! Coaching requests are pulled with `take_coaching_requests` and answered
//! with `resolve_coaching` / `fail_coaching`.

use std::cell::RefCell;
use std::fmt::Display;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::classifier::ExerciseType;
use crate::coaching::CoachingError;
use crate::config::RehabConfig;
use crate::engine::RehabEngine;
use crate::logging;
use crate::pose::{visible_bones as bones_in_frame, LandmarkFrame};

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static ENGINE: RefCell<RehabEngine> = RefCell::new(RehabEngine::default());
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Apply a JSON config document (any subset of fields)
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = RehabConfig::from_json(json).map_err(js_error)?;
    ensure_logging(&config.log_level);
    ENGINE.with(|engine| engine.borrow_mut().set_config(config));
    Ok(())
}

/// Exercise catalog as a JSON array
#[wasm_bindgen]
pub fn list_exercises() -> Option<String> {
    to_json(&ExerciseType::catalog())
}

// ============================================================================
// SESSION LIFECYCLE
// ============================================================================

/// Start a session for an exercise id such as "HAND_RAISE".
/// Returns the session id.
#[wasm_bindgen]
pub fn start_session(exercise_id: &str, now_ms: f64) -> Result<f64, JsValue> {
    let exercise: ExerciseType = exercise_id.parse().map_err(js_error)?;
    ENGINE.with(|engine| {
        let mut engine = engine.borrow_mut();
        ensure_logging(&engine.config().log_level);
        engine
            .start_session(exercise, now_ms)
            .map(|id| id as f64)
            .ok_or_else(|| js_error(format!("Invalid timestamp: {now_ms}")))
    })
}

/// End the running session. Returns the frozen stats as JSON.
#[wasm_bindgen]
pub fn end_session(now_ms: f64) -> Option<String> {
    let stats = ENGINE.with(|engine| engine.borrow_mut().end_session(now_ms))?;
    to_json(&stats)
}

#[wasm_bindgen]
pub fn is_session_active() -> bool {
    ENGINE.with(|engine| engine.borrow().is_active())
}

// ============================================================================
// PER-FRAME ENTRY POINT
// ============================================================================

/// Called from JavaScript with a flat Float32Array of 132 values
/// (33 landmarks × x, y, z, visibility). Returns a JSON frame report, or
/// undefined when no session is running or the frame is unusable.
#[wasm_bindgen]
pub fn process_landmarks(data: &[f32], now_ms: f64) -> Option<String> {
    let report = ENGINE.with(|engine| engine.borrow_mut().process_flat(data, now_ms))?;
    to_json(&report)
}

/// Advance coaching timeouts between frames. Returns how many requests
/// were settled with a fallback.
#[wasm_bindgen]
pub fn tick(now_ms: f64) -> u32 {
    let settled = ENGINE.with(|engine| engine.borrow_mut().tick(now_ms));
    settled.len() as u32
}

/// Bone index pairs (flattened) that are safe to draw for this frame
#[wasm_bindgen]
pub fn visible_bones(data: &[f32]) -> Vec<u32> {
    let Ok(frame) = LandmarkFrame::from_flat(data) else {
        return Vec::new();
    };
    let min_visibility = ENGINE.with(|engine| engine.borrow().config().thresholds.min_visibility);

    bones_in_frame(&frame, min_visibility)
        .into_iter()
        .flat_map(|(a, b)| [a as u32, b as u32])
        .collect()
}

// ============================================================================
// OBSERVERS
// ============================================================================

/// Live stats, or the frozen stats of the last session, as JSON
#[wasm_bindgen]
pub fn session_stats() -> Option<String> {
    let stats = ENGINE.with(|engine| engine.borrow().stats())?;
    to_json(&stats)
}

#[wasm_bindgen]
pub fn current_instruction() -> Option<String> {
    ENGINE.with(|engine| engine.borrow().instruction().map(str::to_string))
}

#[wasm_bindgen]
pub fn coaching_message() -> Option<String> {
    ENGINE.with(|engine| engine.borrow().coaching_message().map(|m| m.text.clone()))
}

#[wasm_bindgen]
pub fn session_summary() -> Option<String> {
    ENGINE.with(|engine| engine.borrow().summary().map(|m| m.text.clone()))
}

// ============================================================================
// COACHING CHANNEL
// ============================================================================

/// Drain queued text-generation requests as a JSON array
#[wasm_bindgen]
pub fn take_coaching_requests() -> String {
    let requests = ENGINE.with(|engine| engine.borrow_mut().take_requests());
    to_json(&requests).unwrap_or_else(|| "[]".to_string())
}

/// Deliver generated text for a ticket. Returns true when it reached
/// the display (false for stale or unknown tickets).
#[wasm_bindgen]
pub fn resolve_coaching(ticket: f64, text: String) -> bool {
    ENGINE.with(|engine| engine.borrow_mut().resolve(ticket as u64, Ok(text)).is_some())
}

/// Report a failed text-generation call; the fallback text is shown
#[wasm_bindgen]
pub fn fail_coaching(ticket: f64, reason: String) -> bool {
    ENGINE.with(|engine| {
        engine
            .borrow_mut()
            .resolve(ticket as u64, Err(CoachingError::Failed(reason)))
            .is_some()
    })
}

// ============================================================================
// HELPERS
// ============================================================================

fn ensure_logging(level: &str) {
    if let Err(err) = logging::init(level) {
        logging::console_line(&format!("Logging disabled: {err}"));
    }
}

fn to_json<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(json) => Some(json),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to serialize bridge payload");
            None
        }
    }
}

fn js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
