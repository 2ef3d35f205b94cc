//! PWM-backed motor driver.
//!
//! [`PwmMotorDriver`] translates wheel speeds into compare levels for four
//! PWM pins, one per (wheel, direction) channel.  The register-level work is
//! delegated to a [`PwmOutput`], so the same driver runs against the real
//! peripheral or the recording [`SimPwm`][crate::sim::SimPwm].
//!
//! # Example
//!
//! ```rust
//! use linebot_hal::pwm::{MotorPins, PwmMotorDriver, DEFAULT_WRAP};
//! use linebot_hal::sim::SimPwm;
//! use linebot_hal::MotorDriver;
//! use linebot_types::Wheel;
//!
//! let mut driver = PwmMotorDriver::new(SimPwm::new(), MotorPins::default(), DEFAULT_WRAP)
//!     .expect("default pin map is valid");
//! driver.set_forward_speed(Wheel::Left, 0.5);
//! assert_eq!(driver.output().level(19), Some(6250));
//! ```

use linebot_types::{Direction, LineBotError, Wheel};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::motor::MotorDriver;

/// Counter wrap value: 125 MHz / 12500 = 10 kHz PWM.
pub const DEFAULT_WRAP: u16 = 12_500;

/// Register-level PWM peripheral.
pub trait PwmOutput: Send {
    /// Route `pin` to its PWM slice, set the counter wrap and enable it.
    fn configure(&mut self, pin: u8, wrap: u16);

    /// Set the compare level of `pin`'s channel.
    fn set_level(&mut self, pin: u8, level: u16);
}

/// GPIO pin assignment of the four H-bridge inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorPins {
    #[serde(default = "default_left_forward")]
    pub left_forward: u8,
    #[serde(default = "default_left_backward")]
    pub left_backward: u8,
    #[serde(default = "default_right_forward")]
    pub right_forward: u8,
    #[serde(default = "default_right_backward")]
    pub right_backward: u8,
}

fn default_left_forward() -> u8 {
    19
}
fn default_left_backward() -> u8 {
    18
}
fn default_right_forward() -> u8 {
    17
}
fn default_right_backward() -> u8 {
    16
}

impl Default for MotorPins {
    fn default() -> Self {
        Self {
            left_forward: default_left_forward(),
            left_backward: default_left_backward(),
            right_forward: default_right_forward(),
            right_backward: default_right_backward(),
        }
    }
}

impl MotorPins {
    /// Pin wired to the given channel.
    pub fn pin(&self, wheel: Wheel, direction: Direction) -> u8 {
        match (wheel, direction) {
            (Wheel::Left, Direction::Forward) => self.left_forward,
            (Wheel::Left, Direction::Backward) => self.left_backward,
            (Wheel::Right, Direction::Forward) => self.right_forward,
            (Wheel::Right, Direction::Backward) => self.right_backward,
        }
    }

    /// All four pins in (left fwd, left back, right fwd, right back) order.
    pub fn all(&self) -> [u8; 4] {
        [
            self.left_forward,
            self.left_backward,
            self.right_forward,
            self.right_backward,
        ]
    }

    /// Reject maps where two channels share a pin.
    ///
    /// # Errors
    ///
    /// Returns [`LineBotError::InvalidPinMap`] naming the duplicated pin.
    pub fn validate(&self) -> Result<(), LineBotError> {
        let pins = self.all();
        for (i, pin) in pins.iter().enumerate() {
            if pins[i + 1..].contains(pin) {
                return Err(LineBotError::InvalidPinMap {
                    reason: format!("pin {pin} is assigned to more than one channel"),
                });
            }
        }
        Ok(())
    }
}

/// Convert a speed fraction to a compare level for a counter wrapping at
/// `wrap`.  The speed is clamped to `[0.0, 1.0]` first.
pub fn duty_to_level(speed: f32, wrap: u16) -> u16 {
    (speed.clamp(0.0, 1.0) * wrap as f32) as u16
}

/// [`MotorDriver`] writing duty cycles to four PWM pins.
pub struct PwmMotorDriver<P: PwmOutput> {
    output: P,
    pins: MotorPins,
    wrap: u16,
}

impl<P: PwmOutput> PwmMotorDriver<P> {
    /// Configure every motor pin with `wrap` and park it at level 0, so the
    /// motors are stopped until the first command arrives.
    ///
    /// # Errors
    ///
    /// Returns [`LineBotError::InvalidPinMap`] if two channels share a pin
    /// and [`LineBotError::InvalidPwmWrap`] if `wrap` is zero.
    pub fn new(mut output: P, pins: MotorPins, wrap: u16) -> Result<Self, LineBotError> {
        pins.validate()?;
        if wrap == 0 {
            return Err(LineBotError::InvalidPwmWrap { wrap });
        }
        for pin in pins.all() {
            output.configure(pin, wrap);
        }
        for pin in pins.all() {
            output.set_level(pin, 0);
        }
        Ok(Self { output, pins, wrap })
    }

    pub fn pins(&self) -> &MotorPins {
        &self.pins
    }

    pub fn wrap(&self) -> u16 {
        self.wrap
    }

    /// Borrow the underlying PWM peripheral.
    pub fn output(&self) -> &P {
        &self.output
    }
}

impl<P: PwmOutput> MotorDriver for PwmMotorDriver<P> {
    fn set_speed(&mut self, wheel: Wheel, direction: Direction, speed: f32) {
        let pin = self.pins.pin(wheel, direction);
        let level = duty_to_level(speed, self.wrap);
        trace!(%wheel, ?direction, pin, level, "pwm write");
        self.output.set_level(pin, level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimPwm;

    #[test]
    fn duty_to_level_scales_and_clamps() {
        assert_eq!(duty_to_level(0.0, DEFAULT_WRAP), 0);
        assert_eq!(duty_to_level(1.0, DEFAULT_WRAP), 12_500);
        assert_eq!(duty_to_level(0.6, 1000), 600);
        assert_eq!(duty_to_level(-0.5, DEFAULT_WRAP), 0);
        assert_eq!(duty_to_level(3.0, DEFAULT_WRAP), 12_500);
    }

    #[test]
    fn new_configures_and_parks_every_pin() {
        let driver = PwmMotorDriver::new(SimPwm::new(), MotorPins::default(), DEFAULT_WRAP)
            .unwrap();
        for pin in [16, 17, 18, 19] {
            assert_eq!(driver.output().wrap(pin), Some(DEFAULT_WRAP));
            assert_eq!(driver.output().level(pin), Some(0));
        }
    }

    #[test]
    fn set_speed_routes_to_mapped_pin() {
        let mut driver =
            PwmMotorDriver::new(SimPwm::new(), MotorPins::default(), 1000).unwrap();
        driver.set_speed(Wheel::Right, Direction::Forward, 0.25);
        driver.set_speed(Wheel::Left, Direction::Backward, 1.0);

        assert_eq!(driver.output().level(17), Some(250));
        assert_eq!(driver.output().level(18), Some(1000));
        // Untouched channels stay parked.
        assert_eq!(driver.output().level(19), Some(0));
        assert_eq!(driver.output().level(16), Some(0));
    }

    #[test]
    fn duplicate_pins_are_rejected() {
        let pins = MotorPins {
            right_backward: 19,
            ..MotorPins::default()
        };
        let result = PwmMotorDriver::new(SimPwm::new(), pins, DEFAULT_WRAP);
        assert!(matches!(result, Err(LineBotError::InvalidPinMap { .. })));
    }

    #[test]
    fn zero_wrap_is_rejected() {
        let result = PwmMotorDriver::new(SimPwm::new(), MotorPins::default(), 0);
        assert!(matches!(result, Err(LineBotError::InvalidPwmWrap { wrap: 0 })));
    }

    #[test]
    fn motor_pins_fill_missing_fields_with_defaults() {
        let pins: MotorPins = toml::from_str("left_forward = 2\nleft_backward = 3").unwrap();
        assert_eq!(pins.left_forward, 2);
        assert_eq!(pins.left_backward, 3);
        assert_eq!(pins.right_forward, 17);
        assert_eq!(pins.right_backward, 16);
    }
}
