//! [`CalibrationProfile`] – camera-to-steering calibration.
//!
//! Pixel columns grow towards the robot's left, so a valid profile always
//! satisfies `spread_left > line_center > spread_right`.  The invariant is
//! checked once at construction; a `CalibrationProfile` value that exists is
//! always usable by the mapper.

use linebot_types::LineBotError;
use serde::{Deserialize, Serialize};

/// Upper bound of `pid_range`.
pub const MAX_PID_RANGE: f32 = 2.0;

/// Immutable mapping parameters established at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCalibration", into = "RawCalibration")]
pub struct CalibrationProfile {
    pid_range: f32,
    line_center: i32,
    spread_left: i32,
    spread_right: i32,
}

impl CalibrationProfile {
    /// Build a profile.
    ///
    /// # Errors
    ///
    /// Returns [`LineBotError::InvalidCalibration`] unless
    /// `0 < pid_range <= 2` and `spread_left > line_center > spread_right`.
    pub fn new(
        pid_range: f32,
        line_center: i32,
        spread_left: i32,
        spread_right: i32,
    ) -> Result<Self, LineBotError> {
        if !(pid_range > 0.0 && pid_range <= MAX_PID_RANGE) {
            return Err(invalid(format!(
                "pid_range must lie in (0, {MAX_PID_RANGE}], got {pid_range}"
            )));
        }
        if spread_left <= line_center {
            return Err(invalid(format!(
                "spread_left ({spread_left}) must be greater than line_center ({line_center})"
            )));
        }
        if line_center <= spread_right {
            return Err(invalid(format!(
                "line_center ({line_center}) must be greater than spread_right ({spread_right})"
            )));
        }
        Ok(Self {
            pid_range,
            line_center,
            spread_left,
            spread_right,
        })
    }

    pub fn pid_range(&self) -> f32 {
        self.pid_range
    }

    pub fn line_center(&self) -> i32 {
        self.line_center
    }

    pub fn spread_left(&self) -> i32 {
        self.spread_left
    }

    pub fn spread_right(&self) -> i32 {
        self.spread_right
    }

    /// Largest steering magnitude the mapper can produce.
    pub fn max_steer(&self) -> f32 {
        0.5 * self.pid_range
    }

    /// Width in pixels of the left interpolation segment.
    pub fn left_span(&self) -> f32 {
        (self.spread_left as i64 - self.line_center as i64) as f32
    }

    /// Width in pixels of the right interpolation segment.
    pub fn right_span(&self) -> f32 {
        (self.line_center as i64 - self.spread_right as i64) as f32
    }
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            pid_range: default_pid_range(),
            line_center: default_line_center(),
            spread_left: default_spread_left(),
            spread_right: default_spread_right(),
        }
    }
}

fn invalid(reason: String) -> LineBotError {
    LineBotError::InvalidCalibration { reason }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serde shadow type
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawCalibration {
    #[serde(default = "default_pid_range")]
    pid_range: f32,
    #[serde(default = "default_line_center")]
    line_center: i32,
    #[serde(default = "default_spread_left")]
    spread_left: i32,
    #[serde(default = "default_spread_right")]
    spread_right: i32,
}

fn default_pid_range() -> f32 {
    0.8
}
fn default_line_center() -> i32 {
    25
}
fn default_spread_left() -> i32 {
    41
}
fn default_spread_right() -> i32 {
    11
}

impl TryFrom<RawCalibration> for CalibrationProfile {
    type Error = LineBotError;

    fn try_from(raw: RawCalibration) -> Result<Self, Self::Error> {
        CalibrationProfile::new(
            raw.pid_range,
            raw.line_center,
            raw.spread_left,
            raw.spread_right,
        )
    }
}

impl From<CalibrationProfile> for RawCalibration {
    fn from(profile: CalibrationProfile) -> Self {
        Self {
            pid_range: profile.pid_range,
            line_center: profile.line_center,
            spread_left: profile.spread_left,
            spread_right: profile.spread_right,
        }
    }
}
