//! Tunable thresholds and timings
//!
//! Defaults are the gentle rehabilitation values. The host page may send a
//! JSON document overriding any subset of fields.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Per-exercise geometric thresholds, in normalized frame units
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// LEG_LIFT: hip-to-knee height below this counts as lifted
    pub leg_lift_hip_knee: f32,
    /// SIDE_BEND: shoulder height difference above this counts as tilted
    pub side_bend_tilt: f32,
    /// NECK_ROTATION: nose offset as a fraction of shoulder width
    pub neck_offset_ratio: f32,
    /// ARM_EXTENSION: wrist span over shoulder span to count as open
    pub arm_open_ratio: f32,
    /// ARM_EXTENSION: wrist span over shoulder span to count as closed
    pub arm_closed_ratio: f32,
    pub min_visibility: f32,
    /// Treat frames with hidden key landmarks as NEUTRAL. Off by default,
    /// which reproduces the ungated per-exercise rules.
    pub visibility_gate: bool,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            leg_lift_hip_knee: 0.15,
            side_bend_tilt: 0.15,
            neck_offset_ratio: 0.25,
            arm_open_ratio: 2.5,
            arm_closed_ratio: 1.5,
            min_visibility: 0.5,
            visibility_gate: false,
        }
    }
}

/// Clocks, all in milliseconds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub rep_debounce_ms: f64,
    pub coaching_interval_ms: f64,
    pub coaching_timeout_ms: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            rep_debounce_ms: 2000.0,
            coaching_interval_ms: 12000.0,
            coaching_timeout_ms: 15000.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub calories_per_rep: f32,
    pub accuracy_reward: f32,
    pub accuracy_penalty: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            calories_per_rep: 0.1,
            accuracy_reward: 0.5,
            accuracy_penalty: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RehabConfig {
    pub thresholds: Thresholds,
    pub timing: Timing,
    pub scoring: ScoringConfig,
    /// tracing level name: error, warn, info, debug or trace
    pub log_level: String,
}

impl Default for RehabConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            timing: Timing::default(),
            scoring: ScoringConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl RehabConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        positive("thresholds.leg_lift_hip_knee", f64::from(t.leg_lift_hip_knee))?;
        positive("thresholds.side_bend_tilt", f64::from(t.side_bend_tilt))?;
        positive("thresholds.neck_offset_ratio", f64::from(t.neck_offset_ratio))?;
        positive("thresholds.arm_open_ratio", f64::from(t.arm_open_ratio))?;
        positive("thresholds.arm_closed_ratio", f64::from(t.arm_closed_ratio))?;
        if t.arm_closed_ratio >= t.arm_open_ratio {
            return Err(ConfigError::Invalid {
                field: "thresholds.arm_closed_ratio",
                reason: format!(
                    "{} must be below arm_open_ratio {}",
                    t.arm_closed_ratio, t.arm_open_ratio
                ),
            });
        }
        if !(0.0..=1.0).contains(&t.min_visibility) {
            return Err(ConfigError::Invalid {
                field: "thresholds.min_visibility",
                reason: format!("{} is outside [0, 1]", t.min_visibility),
            });
        }

        let timing = &self.timing;
        non_negative("timing.rep_debounce_ms", timing.rep_debounce_ms)?;
        non_negative("timing.coaching_interval_ms", timing.coaching_interval_ms)?;
        // Zero would expire every request in the millisecond it was issued
        positive("timing.coaching_timeout_ms", timing.coaching_timeout_ms)?;

        let s = &self.scoring;
        non_negative("scoring.calories_per_rep", f64::from(s.calories_per_rep))?;
        non_negative("scoring.accuracy_reward", f64::from(s.accuracy_reward))?;
        non_negative("scoring.accuracy_penalty", f64::from(s.accuracy_penalty))?;

        crate::logging::parse_level(&self.log_level).map_err(|err| ConfigError::Invalid {
            field: "log_level",
            reason: err.to_string(),
        })?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be a positive number"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be zero or more"),
        })
    }
}
