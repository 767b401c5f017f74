//! Feedback gate - rate limits coaching requests by wall time

/// Passes at most once per interval, independent of frame rate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeedbackGate {
    interval_ms: f64,
    last_pass_ms: Option<f64>,
}

impl FeedbackGate {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_pass_ms: None,
        }
    }

    /// Check the gate and, when open, record `now_ms` as the last pass
    pub fn try_pass(&mut self, now_ms: f64) -> bool {
        let open = self
            .last_pass_ms
            .map_or(true, |last| now_ms - last >= self.interval_ms);
        if open {
            self.last_pass_ms = Some(now_ms);
        }
        open
    }

    pub fn last_pass_ms(&self) -> Option<f64> {
        self.last_pass_ms
    }

    pub fn reset(&mut self) {
        self.last_pass_ms = None;
    }
}

impl Default for FeedbackGate {
    fn default() -> Self {
        Self::new(12_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_always_passes() {
        let mut gate = FeedbackGate::default();
        assert!(gate.try_pass(0.0));
        assert_eq!(gate.last_pass_ms(), Some(0.0));
    }

    #[test]
    fn closed_until_interval_elapses() {
        let mut gate = FeedbackGate::default();
        assert!(gate.try_pass(1_000.0));
        assert!(!gate.try_pass(6_000.0));
        // A refused check does not move the clock
        assert_eq!(gate.last_pass_ms(), Some(1_000.0));
        assert!(gate.try_pass(13_000.0));
    }

    #[test]
    fn reset_reopens_the_gate() {
        let mut gate = FeedbackGate::default();
        gate.try_pass(500.0);
        gate.reset();
        assert!(gate.try_pass(600.0));
    }
}
