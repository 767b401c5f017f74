//! Coaching module - rate-limited requests to the text-generation service
//!
//! Re-exports only. All logic in submodules.

mod gate;
mod prompt;
mod scheduler;

pub use gate::FeedbackGate;
pub use prompt::{summary_prompt, tip_prompt};
pub use scheduler::{
    CoachingError, CoachingIntent, CoachingKind, CoachingMessage, CoachingRequest,
    CoachingScheduler, MessageSource, GREETING, SUMMARY_PENDING,
};
