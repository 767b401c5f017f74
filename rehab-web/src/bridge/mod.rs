//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod session_bridge;

pub use session_bridge::{
    // Configuration
    configure,
    list_exercises,
    // Session lifecycle
    start_session,
    end_session,
    is_session_active,
    // Per frame
    process_landmarks,
    tick,
    visible_bones,
    // Observers
    session_stats,
    current_instruction,
    coaching_message,
    session_summary,
    // Coaching channel
    take_coaching_requests,
    resolve_coaching,
    fail_coaching,
};
