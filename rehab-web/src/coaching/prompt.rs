//! Prompt text sent to the text-generation service

use crate::classifier::ExerciseType;
use crate::session::SessionStats;

/// Short encouragement while the patient is exercising
pub fn tip_prompt(exercise: ExerciseType, stats: &SessionStats) -> String {
    format!(
        "You are a gentle, patient and encouraging medical rehabilitation assistant.\n\
         The user is an elderly person or a patient recovering from neurological issues.\n\
         Current exercise: {} ({}).\n\
         Reps completed: {}.\n\
         Provide a very short, kind and clear encouragement.\n\
         Focus on slow movement, breathing and doing their best.\n\
         Avoid high-energy fitness slang. Use soothing language.\n\
         Max 10 words.",
        exercise.info().name,
        exercise.id(),
        stats.reps,
    )
}

/// End-of-session report
pub fn summary_prompt(exercise: ExerciseType, stats: &SessionStats) -> String {
    format!(
        "The user is an elderly or neurological patient who just finished a therapy session of {} ({}).\n\
         Stats: {} repetitions performed.\n\
         Stability score: {}%.\n\
         Session length: {} seconds.\n\
         Write a 2-sentence summary. Be extremely positive, validating their effort regardless of the numbers.\n\
         Mention that consistent movement is key to recovery.",
        exercise.info().name,
        exercise.id(),
        stats.reps,
        stats.rounded_accuracy(),
        stats.duration.round(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tip_prompt_mentions_exercise_and_reps() {
        let stats = SessionStats {
            reps: 7,
            ..SessionStats::default()
        };
        let prompt = tip_prompt(ExerciseType::LegLift, &stats);
        assert!(prompt.contains("Seated Knee Lift (LEG_LIFT)"));
        assert!(prompt.contains("Reps completed: 7."));
        assert!(prompt.contains("Max 10 words"));
    }

    #[test]
    fn summary_prompt_rounds_stability() {
        let stats = SessionStats {
            reps: 12,
            accuracy: 97.6,
            duration: 95.4,
            ..SessionStats::default()
        };
        let prompt = summary_prompt(ExerciseType::HandRaise, &stats);
        assert!(prompt.contains("12 repetitions"));
        assert!(prompt.contains("Stability score: 98%"));
        assert!(prompt.contains("95 seconds"));
    }
}
