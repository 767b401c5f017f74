//! Rehab engine - session lifecycle and the per-frame entry point
//!
//! One engine per page. It owns the live session, the statistics of the
//! last finished session (for the summary screen) and the coaching
//! scheduler. All methods take the caller's clock in milliseconds.

use tracing::{debug, info};

use crate::classifier::ExerciseType;
use crate::coaching::{CoachingError, CoachingMessage, CoachingRequest, CoachingScheduler};
use crate::config::RehabConfig;
use crate::pose::{Landmark, LandmarkFrame};
use crate::session::{FrameReport, Session, SessionStats};

/// Frozen result of an ended session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FinishedSession {
    pub session_id: u64,
    pub exercise: ExerciseType,
    pub stats: SessionStats,
}

pub struct RehabEngine {
    config: RehabConfig,
    session: Option<Session>,
    finished: Option<FinishedSession>,
    scheduler: CoachingScheduler,
    next_session_id: u64,
}

impl RehabEngine {
    pub fn new(config: RehabConfig) -> Self {
        let scheduler = CoachingScheduler::new(&config.timing);
        Self {
            config,
            session: None,
            finished: None,
            scheduler,
            next_session_id: 1,
        }
    }

    pub fn config(&self) -> &RehabConfig {
        &self.config
    }

    /// Takes effect from the next session
    pub fn set_config(&mut self, config: RehabConfig) {
        self.config = config;
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Reset statistics and clocks and begin tracking `exercise`.
    /// `None` when `now_ms` is not a finite timestamp.
    pub fn start_session(&mut self, exercise: ExerciseType, now_ms: f64) -> Option<u64> {
        if !clock_ok(now_ms) {
            return None;
        }
        if let Some(previous) = self.session.take() {
            info!(session = previous.id(), "Session replaced without summary");
            self.scheduler.end_session(previous.id());
        }

        let id = self.next_session_id;
        self.next_session_id += 1;

        self.scheduler.configure(&self.config.timing);
        self.scheduler.begin_session(id);
        self.session = Some(Session::new(id, exercise, now_ms, self.config.clone()));
        self.finished = None;

        info!(session = id, exercise = %exercise, "Session started");
        Some(id)
    }

    /// Freeze statistics and request the one summary. `None` when no
    /// session is running or `now_ms` is not finite (the session keeps
    /// running).
    pub fn end_session(&mut self, now_ms: f64) -> Option<SessionStats> {
        if !clock_ok(now_ms) {
            return None;
        }
        let mut session = self.session.take()?;
        session.refresh_duration(now_ms);
        let stats = session.stats();

        self.scheduler.end_session(session.id());
        self.scheduler
            .request_summary(session.id(), session.exercise(), stats, now_ms);
        self.finished = Some(FinishedSession {
            session_id: session.id(),
            exercise: session.exercise(),
            stats,
        });

        info!(
            session = session.id(),
            reps = stats.reps,
            accuracy = stats.accuracy,
            duration = stats.duration,
            "Session ended"
        );
        Some(stats)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    // ========================================================================
    // FRAMES
    // ========================================================================

    /// Frames with a non-finite timestamp are dropped
    pub fn process_frame(&mut self, frame: &LandmarkFrame, now_ms: f64) -> Option<FrameReport> {
        if !clock_ok(now_ms) {
            return None;
        }
        self.scheduler.expire(now_ms);

        let report = self.session.as_mut()?.process(frame, now_ms);
        if let Some(intent) = report.coaching {
            self.scheduler.submit_tip(intent, now_ms);
        }
        Some(report)
    }

    /// Flat JS buffer entry point. Invalid frames are dropped.
    pub fn process_flat(&mut self, data: &[f32], now_ms: f64) -> Option<FrameReport> {
        match LandmarkFrame::from_flat(data) {
            Ok(frame) => self.process_frame(&frame, now_ms),
            Err(err) => {
                debug!(error = %err, "Discarding invalid landmark frame");
                self.tick(now_ms);
                None
            }
        }
    }

    pub fn process_landmarks(&mut self, landmarks: &[Landmark], now_ms: f64) -> Option<FrameReport> {
        match LandmarkFrame::from_landmarks(landmarks) {
            Ok(frame) => self.process_frame(&frame, now_ms),
            Err(err) => {
                debug!(error = %err, "Discarding invalid landmark frame");
                self.tick(now_ms);
                None
            }
        }
    }

    /// Advance coaching timeouts when no frames are arriving
    pub fn tick(&mut self, now_ms: f64) -> Vec<CoachingMessage> {
        if !clock_ok(now_ms) {
            return Vec::new();
        }
        self.scheduler.expire(now_ms)
    }

    // ========================================================================
    // OBSERVERS
    // ========================================================================

    /// Live statistics, or the frozen ones after the session ended
    pub fn stats(&self) -> Option<SessionStats> {
        self.session
            .as_ref()
            .map(Session::stats)
            .or_else(|| self.finished.map(|f| f.stats))
    }

    pub fn finished(&self) -> Option<FinishedSession> {
        self.finished
    }

    pub fn exercise(&self) -> Option<ExerciseType> {
        self.session.as_ref().map(Session::exercise)
    }

    pub fn session_id(&self) -> Option<u64> {
        self.session.as_ref().map(Session::id)
    }

    pub fn instruction(&self) -> Option<&'static str> {
        self.session.as_ref().map(Session::instruction)
    }

    pub fn coaching_message(&self) -> Option<&CoachingMessage> {
        self.scheduler.tip_message()
    }

    pub fn summary(&self) -> Option<&CoachingMessage> {
        self.scheduler.summary_message()
    }

    // ========================================================================
    // COACHING CHANNEL
    // ========================================================================

    pub fn take_requests(&mut self) -> Vec<CoachingRequest> {
        self.scheduler.take_requests()
    }

    pub fn resolve(
        &mut self,
        ticket: u64,
        result: Result<String, CoachingError>,
    ) -> Option<CoachingMessage> {
        self.scheduler.resolve(ticket, result)
    }
}

/// NaN would disable every later clock comparison in the session
fn clock_ok(now_ms: f64) -> bool {
    if now_ms.is_finite() {
        true
    } else {
        debug!(now_ms, "Ignoring call with non-finite timestamp");
        false
    }
}

impl Default for RehabEngine {
    fn default() -> Self {
        Self::new(RehabConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coaching::{CoachingKind, GREETING, SUMMARY_PENDING};

    #[test]
    fn frames_without_session_are_ignored() {
        let mut engine = RehabEngine::default();
        assert!(engine.process_frame(&LandmarkFrame::default(), 0.0).is_none());
        assert!(engine.stats().is_none());
    }

    #[test]
    fn start_resets_stats_and_greets() {
        let mut engine = RehabEngine::default();
        let id = engine.start_session(ExerciseType::SideBend, 0.0).unwrap();
        assert_eq!(engine.stats(), Some(SessionStats::default()));
        assert_eq!(engine.coaching_message().unwrap().text, GREETING);
        assert_eq!(engine.session_id(), Some(id));
    }

    #[test]
    fn end_twice_requests_one_summary() {
        let mut engine = RehabEngine::default();
        engine.start_session(ExerciseType::NeckRotation, 0.0);

        let stats = engine.end_session(30_000.0).unwrap();
        assert_eq!(stats.duration, 30.0);
        assert!(engine.end_session(31_000.0).is_none());

        let requests = engine.take_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].kind, CoachingKind::Summary);
        assert_eq!(engine.summary().unwrap().text, SUMMARY_PENDING);
        assert_eq!(engine.stats(), Some(stats));
        assert!(!engine.is_active());
    }

    #[test]
    fn invalid_flat_frame_is_discarded() {
        let mut engine = RehabEngine::default();
        engine.start_session(ExerciseType::HandRaise, 0.0);
        assert!(engine.process_flat(&[0.5; 40], 100.0).is_none());
        assert!(engine.process_landmarks(&[Landmark::at(0.1, 0.1); 10], 200.0).is_none());
        assert_eq!(engine.stats().unwrap().reps, 0);
    }

    #[test]
    fn non_finite_timestamps_are_ignored() {
        let mut engine = RehabEngine::default();
        assert!(engine.start_session(ExerciseType::HandRaise, f64::NAN).is_none());
        assert!(!engine.is_active());

        engine.start_session(ExerciseType::HandRaise, 0.0).unwrap();
        let hands_up = LandmarkFrame::default()
            .with(crate::pose::NOSE, Landmark::at(0.5, 0.3))
            .with(crate::pose::LEFT_WRIST, Landmark::at(0.6, 0.1))
            .with(crate::pose::RIGHT_WRIST, Landmark::at(0.4, 0.1));

        assert!(engine.process_frame(&hands_up, f64::NAN).is_none());
        assert!(engine.process_frame(&hands_up, f64::INFINITY).is_none());
        assert!(engine.tick(f64::NAN).is_empty());
        assert!(engine.end_session(f64::NAN).is_none());
        assert!(engine.is_active());

        // The debounce clock was not poisoned: first rep counts, a retry
        // inside the window does not
        assert_eq!(engine.process_frame(&hands_up, 1_000.0).unwrap().stats.reps, 1);
        let down = hands_up
            .with(crate::pose::LEFT_WRIST, Landmark::at(0.6, 0.9))
            .with(crate::pose::RIGHT_WRIST, Landmark::at(0.4, 0.9));
        engine.process_frame(&down, 1_500.0);
        assert_eq!(engine.process_frame(&hands_up, 1_800.0).unwrap().stats.reps, 1);
    }

    #[test]
    fn config_applies_to_next_session() {
        let mut engine = RehabEngine::default();
        let mut config = RehabConfig::default();
        config.timing.rep_debounce_ms = 500.0;
        engine.set_config(config);
        assert_eq!(engine.config().timing.rep_debounce_ms, 500.0);
    }
}
