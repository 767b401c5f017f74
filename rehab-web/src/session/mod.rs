//! Session module - repetition counting and statistics
//!
//! # Components
//! - `tracker.rs`: debounced repetition state machine
//! - `stats.rs`: reps, stability score, calories and duration
//! - `live.rs`: one running exercise session tying both to the classifier

mod live;
mod stats;
mod tracker;

pub use live::{FrameReport, Session};
pub use stats::{FormQuality, SessionStats, MAX_ACCURACY};
pub use tracker::{RepetitionEvent, RepetitionTracker};
