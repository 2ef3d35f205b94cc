use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pixel-column index of the line centroid at the scan row.
///
/// The vision boundary has no explicit "no line" signal, so a failed
/// detection may surface as any integer, including values outside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineEstimate(pub i32);

impl LineEstimate {
    /// Raw pixel column.
    pub fn column(self) -> i32 {
        self.0
    }

    /// `true` when the column lies in `[0, frame_width)`.
    pub fn within(self, frame_width: u32) -> bool {
        self.0 >= 0 && (self.0 as i64) < frame_width as i64
    }
}

impl fmt::Display for LineEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signed steering scalar: negative steers left, positive steers right.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct SteeringCommand(pub f32);

impl SteeringCommand {
    pub const STRAIGHT: Self = Self(0.0);

    pub fn value(self) -> f32 {
        self.0
    }
}

impl fmt::Display for SteeringCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Forward duty-cycle fractions for both wheels, each in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelCommand {
    pub left_speed: f32,
    pub right_speed: f32,
}

impl WheelCommand {
    /// Both wheels at full forward speed.
    pub const FULL_AHEAD: Self = Self {
        left_speed: 1.0,
        right_speed: 1.0,
    };

    /// Build a command, clamping both speeds into `[0.0, 1.0]`.
    pub fn new(left_speed: f32, right_speed: f32) -> Self {
        Self {
            left_speed: left_speed.clamp(0.0, 1.0),
            right_speed: right_speed.clamp(0.0, 1.0),
        }
    }

    /// Speed for the given wheel.
    pub fn speed(&self, wheel: Wheel) -> f32 {
        match wheel {
            Wheel::Left => self.left_speed,
            Wheel::Right => self.right_speed,
        }
    }
}

/// One side of the differential drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wheel {
    Left,
    Right,
}

impl Wheel {
    pub const ALL: [Wheel; 2] = [Wheel::Left, Wheel::Right];
}

impl fmt::Display for Wheel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wheel::Left => write!(f, "left"),
            Wheel::Right => write!(f, "right"),
        }
    }
}

/// Rotation sense of a motor channel.  Every wheel has one PWM channel per
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Forward, Direction::Backward];
}

/// Error type for the fallible edges of the system: calibration, pin maps,
/// configuration and replay scripts.  The control pipeline itself never fails.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LineBotError {
    #[error("Invalid calibration: {reason}")]
    InvalidCalibration { reason: String },

    #[error("Invalid motor pin map: {reason}")]
    InvalidPinMap { reason: String },

    #[error("Invalid PWM wrap value {wrap}: must be non-zero")]
    InvalidPwmWrap { wrap: u16 },

    #[error("Config Error: {0}")]
    Config(String),

    #[error("Invalid centroid script at line {line}: {reason}")]
    InvalidScript { line: usize, reason: String },

    #[error("Centroid script contains no centroids")]
    EmptyScript,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_estimate_within_frame() {
        assert!(LineEstimate(0).within(80));
        assert!(LineEstimate(79).within(80));
        assert!(!LineEstimate(80).within(80));
        assert!(!LineEstimate(-1).within(80));
        assert!(!LineEstimate(i32::MAX).within(0));
    }

    #[test]
    fn steering_command_displays_two_decimals() {
        assert_eq!(SteeringCommand(-0.4).to_string(), "-0.40");
        assert_eq!(SteeringCommand::STRAIGHT.to_string(), "0.00");
    }

    #[test]
    fn wheel_command_new_clamps_both_speeds() {
        let cmd = WheelCommand::new(-0.3, 1.7);
        assert_eq!(cmd.left_speed, 0.0);
        assert_eq!(cmd.right_speed, 1.0);
        assert_eq!(cmd.speed(Wheel::Left), 0.0);
        assert_eq!(cmd.speed(Wheel::Right), 1.0);
    }

    #[test]
    fn wheel_serializes_lowercase() {
        let json = serde_json::to_string(&Wheel::Left).unwrap();
        assert_eq!(json, "\"left\"");
        let back: Direction = serde_json::from_str("\"backward\"").unwrap();
        assert_eq!(back, Direction::Backward);
    }

    #[test]
    fn line_bot_error_display() {
        let err = LineBotError::InvalidCalibration {
            reason: "spread_left must exceed line_center".to_string(),
        };
        assert!(err.to_string().contains("Invalid calibration"));
        assert!(err.to_string().contains("spread_left"));

        let err2 = LineBotError::Config("missing [motors]".to_string());
        assert!(err2.to_string().contains("missing [motors]"));

        let err3 = LineBotError::InvalidScript {
            line: 4,
            reason: "not an integer".to_string(),
        };
        assert!(err3.to_string().contains("line 4"));

        let err4 = LineBotError::InvalidPwmWrap { wrap: 0 };
        assert!(err4.to_string().contains("PWM wrap"));
        assert!(!err4.to_string().contains("pin map"));

        assert!(!LineBotError::EmptyScript.to_string().contains("line"));
    }
}
