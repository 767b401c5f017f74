//! Coaching scheduler - the channel between frame processing and the
//! text-generation service
//!
//! The frame path only submits intents. Requests that pass the gate wait
//! in an outbox until the host (JavaScript) drains them, calls the
//! service once, and reports back by ticket. Every result is checked
//! against the session it was issued for before it reaches the message
//! sink, so a slow reply can never land in a newer session.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classifier::ExerciseType;
use crate::config::Timing;
use crate::session::SessionStats;

use super::gate::FeedbackGate;
use super::prompt::{summary_prompt, tip_prompt};

pub const GREETING: &str = "System Ready. Move gently.";
pub const SUMMARY_PENDING: &str = "Analyzing movement patterns...";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoachingKind {
    Tip,
    Summary,
}

impl CoachingKind {
    /// Text shown when the service fails or times out
    pub fn fallback(&self) -> &'static str {
        match self {
            CoachingKind::Tip => "Take your time. Breathe deeply.",
            CoachingKind::Summary => "Session Complete. Wonderful effort today. Rest well.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoachingError {
    #[error("text generation failed: {0}")]
    Failed(String),
    #[error("text generation timed out after {0} ms")]
    TimedOut(f64),
}

/// Raised by a session on every counted repetition
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CoachingIntent {
    pub session_id: u64,
    pub exercise: ExerciseType,
    pub stats: SessionStats,
}

/// One call the host should make to the text-generation service
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoachingRequest {
    pub ticket: u64,
    pub session_id: u64,
    pub kind: CoachingKind,
    pub exercise: ExerciseType,
    pub stats: SessionStats,
    pub prompt: String,
    pub issued_at_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSource {
    /// Written by the text-generation service
    Generated,
    /// Fixed text substituted after a failure
    Fallback,
    /// Local status text (greeting, "analyzing")
    Status,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoachingMessage {
    pub session_id: u64,
    pub kind: CoachingKind,
    pub text: String,
    pub source: MessageSource,
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    ticket: u64,
    session_id: u64,
    kind: CoachingKind,
    issued_at_ms: f64,
}

pub struct CoachingScheduler {
    gate: FeedbackGate,
    timeout_ms: f64,
    next_ticket: u64,
    outbox: VecDeque<CoachingRequest>,
    pending: Vec<Pending>,
    /// Session currently accepting tips
    live_session: Option<u64>,
    /// Most recently started session, live or ended
    latest_session: Option<u64>,
    tip: Option<CoachingMessage>,
    summary: Option<CoachingMessage>,
}

impl CoachingScheduler {
    pub fn new(timing: &Timing) -> Self {
        Self {
            gate: FeedbackGate::new(timing.coaching_interval_ms),
            timeout_ms: timing.coaching_timeout_ms,
            next_ticket: 1,
            outbox: VecDeque::new(),
            pending: Vec::new(),
            live_session: None,
            latest_session: None,
            tip: None,
            summary: None,
        }
    }

    /// Apply new clock settings; the gate starts over
    pub fn configure(&mut self, timing: &Timing) {
        self.gate = FeedbackGate::new(timing.coaching_interval_ms);
        self.timeout_ms = timing.coaching_timeout_ms;
    }

    // ========================================================================
    // SESSION LIFECYCLE
    // ========================================================================

    pub fn begin_session(&mut self, session_id: u64) {
        self.gate.reset();
        self.live_session = Some(session_id);
        self.latest_session = Some(session_id);
        // Requests the host never picked up are dropped, not sent late
        self.withdraw(|req| req.session_id != session_id);
        self.tip = Some(CoachingMessage {
            session_id,
            kind: CoachingKind::Tip,
            text: GREETING.to_string(),
            source: MessageSource::Status,
        });
        self.summary = None;
    }

    pub fn end_session(&mut self, session_id: u64) {
        if self.live_session == Some(session_id) {
            self.live_session = None;
        }
        self.withdraw(|req| req.session_id == session_id && req.kind == CoachingKind::Tip);
    }

    /// Drop unsent requests matching `pred` from the outbox and pending list
    fn withdraw(&mut self, pred: impl Fn(&CoachingRequest) -> bool) {
        let mut withdrawn = Vec::new();
        self.outbox.retain(|req| {
            let gone = pred(req);
            if gone {
                withdrawn.push(req.ticket);
            }
            !gone
        });
        if !withdrawn.is_empty() {
            debug!(?withdrawn, "Unsent coaching requests withdrawn");
            self.pending.retain(|p| !withdrawn.contains(&p.ticket));
        }
    }

    // ========================================================================
    // REQUESTS
    // ========================================================================

    /// Gate a repetition's coaching intent. Returns the ticket when a
    /// request was queued.
    pub fn submit_tip(&mut self, intent: CoachingIntent, now_ms: f64) -> Option<u64> {
        if self.live_session != Some(intent.session_id) {
            debug!(session = intent.session_id, "Tip intent for inactive session ignored");
            return None;
        }
        if !self.gate.try_pass(now_ms) {
            return None;
        }

        let prompt = tip_prompt(intent.exercise, &intent.stats);
        let ticket = self.enqueue(
            intent.session_id,
            CoachingKind::Tip,
            intent.exercise,
            intent.stats,
            prompt,
            now_ms,
        );
        info!(ticket, reps = intent.stats.reps, "Coaching tip requested");
        Some(ticket)
    }

    /// Queue the one end-of-session summary request
    pub fn request_summary(
        &mut self,
        session_id: u64,
        exercise: ExerciseType,
        stats: SessionStats,
        now_ms: f64,
    ) -> u64 {
        self.summary = Some(CoachingMessage {
            session_id,
            kind: CoachingKind::Summary,
            text: SUMMARY_PENDING.to_string(),
            source: MessageSource::Status,
        });

        let prompt = summary_prompt(exercise, &stats);
        let ticket = self.enqueue(session_id, CoachingKind::Summary, exercise, stats, prompt, now_ms);
        info!(ticket, session = session_id, "Session summary requested");
        ticket
    }

    fn enqueue(
        &mut self,
        session_id: u64,
        kind: CoachingKind,
        exercise: ExerciseType,
        stats: SessionStats,
        prompt: String,
        now_ms: f64,
    ) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        self.pending.push(Pending {
            ticket,
            session_id,
            kind,
            issued_at_ms: now_ms,
        });
        self.outbox.push_back(CoachingRequest {
            ticket,
            session_id,
            kind,
            exercise,
            stats,
            prompt,
            issued_at_ms: now_ms,
        });
        ticket
    }

    /// Hand queued requests to the host
    pub fn take_requests(&mut self) -> Vec<CoachingRequest> {
        self.outbox.drain(..).collect()
    }

    // ========================================================================
    // RESULTS
    // ========================================================================

    /// Settle a ticket. Each ticket settles once; there are no retries.
    /// Returns the message that reached the sink, if any.
    pub fn resolve(
        &mut self,
        ticket: u64,
        result: Result<String, CoachingError>,
    ) -> Option<CoachingMessage> {
        let Some(index) = self.pending.iter().position(|p| p.ticket == ticket) else {
            debug!(ticket, "Result for unknown or settled coaching ticket ignored");
            return None;
        };
        let pending = self.pending.swap_remove(index);
        self.outbox.retain(|req| req.ticket != ticket);

        let (text, source) = match result {
            Ok(text) if !text.trim().is_empty() => (text.trim().to_string(), MessageSource::Generated),
            Ok(_) => {
                warn!(ticket, "Text generation returned nothing, using fallback");
                (pending.kind.fallback().to_string(), MessageSource::Fallback)
            }
            Err(err) => {
                warn!(ticket, error = %err, "Text generation failed, using fallback");
                (pending.kind.fallback().to_string(), MessageSource::Fallback)
            }
        };

        let still_relevant = match pending.kind {
            CoachingKind::Tip => self.live_session == Some(pending.session_id),
            CoachingKind::Summary => self.latest_session == Some(pending.session_id),
        };
        if !still_relevant {
            debug!(ticket, session = pending.session_id, "Stale coaching result discarded");
            return None;
        }

        let message = CoachingMessage {
            session_id: pending.session_id,
            kind: pending.kind,
            text,
            source,
        };
        match pending.kind {
            CoachingKind::Tip => self.tip = Some(message.clone()),
            CoachingKind::Summary => self.summary = Some(message.clone()),
        }
        Some(message)
    }

    /// Time out requests that have waited too long
    pub fn expire(&mut self, now_ms: f64) -> Vec<CoachingMessage> {
        let timeout_ms = self.timeout_ms;
        let overdue: Vec<u64> = self
            .pending
            .iter()
            .filter(|p| now_ms - p.issued_at_ms >= timeout_ms)
            .map(|p| p.ticket)
            .collect();

        overdue
            .into_iter()
            .filter_map(|ticket| self.resolve(ticket, Err(CoachingError::TimedOut(timeout_ms))))
            .collect()
    }

    // ========================================================================
    // MESSAGE SINK
    // ========================================================================

    pub fn tip_message(&self) -> Option<&CoachingMessage> {
        self.tip.as_ref()
    }

    pub fn summary_message(&self) -> Option<&CoachingMessage> {
        self.summary.as_ref()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for CoachingScheduler {
    fn default() -> Self {
        Self::new(&Timing::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(session_id: u64, reps: u32) -> CoachingIntent {
        CoachingIntent {
            session_id,
            exercise: ExerciseType::HandRaise,
            stats: SessionStats {
                reps,
                ..SessionStats::default()
            },
        }
    }

    fn live_scheduler(session_id: u64) -> CoachingScheduler {
        let mut scheduler = CoachingScheduler::default();
        scheduler.begin_session(session_id);
        scheduler
    }

    #[test]
    fn greeting_is_shown_at_session_start() {
        let scheduler = live_scheduler(1);
        let tip = scheduler.tip_message().unwrap();
        assert_eq!(tip.text, GREETING);
        assert_eq!(tip.source, MessageSource::Status);
    }

    #[test]
    fn second_tip_within_interval_is_gated() {
        let mut scheduler = live_scheduler(1);
        assert_eq!(scheduler.submit_tip(intent(1, 1), 0.0), Some(1));
        assert_eq!(scheduler.submit_tip(intent(1, 2), 5_000.0), None);

        let requests = scheduler.take_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].kind, CoachingKind::Tip);
        assert_eq!(requests[0].stats.reps, 1);
        assert!(scheduler.take_requests().is_empty());
    }

    #[test]
    fn gate_advances_before_the_reply_arrives() {
        let mut scheduler = live_scheduler(1);
        scheduler.submit_tip(intent(1, 1), 0.0);
        // No resolve yet; another rep 13 s later still opens a new request
        assert_eq!(scheduler.submit_tip(intent(1, 2), 13_000.0), Some(2));
        assert_eq!(scheduler.pending_count(), 2);
    }

    #[test]
    fn generated_text_is_trimmed_into_the_sink() {
        let mut scheduler = live_scheduler(1);
        let ticket = scheduler.submit_tip(intent(1, 1), 0.0).unwrap();

        let message = scheduler
            .resolve(ticket, Ok("  Lovely and slow.\n".to_string()))
            .unwrap();
        assert_eq!(message.text, "Lovely and slow.");
        assert_eq!(message.source, MessageSource::Generated);
        assert_eq!(scheduler.tip_message(), Some(&message));
    }

    #[test]
    fn failure_and_empty_text_use_fallback() {
        let mut scheduler = live_scheduler(1);
        let first = scheduler.submit_tip(intent(1, 1), 0.0).unwrap();
        let message = scheduler
            .resolve(first, Err(CoachingError::Failed("503".to_string())))
            .unwrap();
        assert_eq!(message.text, "Take your time. Breathe deeply.");
        assert_eq!(message.source, MessageSource::Fallback);

        let second = scheduler.submit_tip(intent(1, 2), 20_000.0).unwrap();
        let message = scheduler.resolve(second, Ok("   ".to_string())).unwrap();
        assert_eq!(message.source, MessageSource::Fallback);
    }

    #[test]
    fn tickets_settle_once() {
        let mut scheduler = live_scheduler(1);
        let ticket = scheduler.submit_tip(intent(1, 1), 0.0).unwrap();
        assert!(scheduler.resolve(ticket, Ok("One".to_string())).is_some());
        assert!(scheduler.resolve(ticket, Ok("Two".to_string())).is_none());
        assert_eq!(scheduler.tip_message().unwrap().text, "One");
    }

    #[test]
    fn tip_for_ended_session_is_discarded() {
        let mut scheduler = live_scheduler(1);
        let ticket = scheduler.submit_tip(intent(1, 3), 0.0).unwrap();
        scheduler.take_requests();
        scheduler.end_session(1);
        scheduler.begin_session(2);

        assert!(scheduler.resolve(ticket, Ok("Late words".to_string())).is_none());
        assert_eq!(scheduler.tip_message().unwrap().text, GREETING);
        assert_eq!(scheduler.tip_message().unwrap().session_id, 2);
    }

    #[test]
    fn summary_survives_session_end_but_not_a_new_session() {
        let mut scheduler = live_scheduler(1);
        scheduler.end_session(1);
        let ticket = scheduler.request_summary(1, ExerciseType::SideBend, SessionStats::default(), 0.0);
        assert_eq!(scheduler.summary_message().unwrap().text, SUMMARY_PENDING);

        let message = scheduler.resolve(ticket, Ok("Well done.".to_string())).unwrap();
        assert_eq!(message.kind, CoachingKind::Summary);
        assert_eq!(scheduler.summary_message().unwrap().text, "Well done.");

        let stale = scheduler.request_summary(1, ExerciseType::SideBend, SessionStats::default(), 0.0);
        scheduler.begin_session(2);
        assert!(scheduler.resolve(stale, Ok("Too late.".to_string())).is_none());
        assert!(scheduler.summary_message().is_none());
    }

    #[test]
    fn overdue_requests_time_out_to_fallback() {
        let mut scheduler = live_scheduler(1);
        scheduler.end_session(1);
        scheduler.request_summary(1, ExerciseType::NeckRotation, SessionStats::default(), 1_000.0);

        assert!(scheduler.expire(10_000.0).is_empty());
        let expired = scheduler.expire(16_000.0);
        assert_eq!(expired.len(), 1);
        assert_eq!(
            expired[0].text,
            "Session Complete. Wonderful effort today. Rest well."
        );
        assert_eq!(scheduler.pending_count(), 0);
        // Never picked up, so it is withdrawn from the outbox too
        assert!(scheduler.take_requests().is_empty());
    }

    #[test]
    fn ending_a_session_withdraws_unsent_tips() {
        let mut scheduler = live_scheduler(1);
        scheduler.submit_tip(intent(1, 1), 0.0);
        scheduler.end_session(1);
        assert!(scheduler.take_requests().is_empty());
        assert_eq!(scheduler.pending_count(), 0);
        assert!(scheduler.submit_tip(intent(1, 2), 20_000.0).is_none());
    }
}
