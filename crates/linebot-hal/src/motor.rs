//! `MotorDriver` trait for the two drive motors.
//!
//! Each wheel is wired to an H-bridge with one input per rotation sense, so a
//! driver exposes four channels addressed by ([`Wheel`], [`Direction`]).

use linebot_types::{Direction, Wheel};

/// Duty-cycle sink for the drive motors.
///
/// Writes are fire-and-forget: there is no acknowledgment and a write that
/// fails in hardware is not reported back.  Speeds are clamped to
/// `[0.0, 1.0]` by the caller before the call.
pub trait MotorDriver: Send {
    /// Set the duty cycle of one wheel's `direction` channel.
    fn set_speed(&mut self, wheel: Wheel, direction: Direction, speed: f32);

    /// Set the duty cycle of one wheel's forward channel.
    fn set_forward_speed(&mut self, wheel: Wheel, speed: f32) {
        self.set_speed(wheel, Direction::Forward, speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockDriver {
        channels: HashMap<(Wheel, Direction), f32>,
    }

    impl MotorDriver for MockDriver {
        fn set_speed(&mut self, wheel: Wheel, direction: Direction, speed: f32) {
            self.channels.insert((wheel, direction), speed);
        }
    }

    #[test]
    fn set_forward_speed_targets_forward_channel() {
        let mut driver = MockDriver::default();
        driver.set_forward_speed(Wheel::Left, 0.6);

        assert_eq!(driver.channels[&(Wheel::Left, Direction::Forward)], 0.6);
        assert!(!driver.channels.contains_key(&(Wheel::Left, Direction::Backward)));
        assert!(!driver.channels.contains_key(&(Wheel::Right, Direction::Forward)));
    }
}
