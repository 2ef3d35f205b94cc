//! [`DifferentialDriveActuator`] – steering scalar to wheel speeds.
//!
//! The turning law only ever slows one wheel; the other stays at full forward
//! speed.  At `control = 0` both wheels run at full speed, at `±1` the inner
//! wheel stops and the robot pivots in place.  This path never drives in
//! reverse: the backward channel of each wheel is held at zero on every
//! [`apply`][DifferentialDriveActuator::apply].
//!
//! [`drive`] is pure so the actuation law can be tested without hardware;
//! [`DifferentialDriveActuator::apply`] performs the motor writes.

use linebot_hal::MotorDriver;
use linebot_types::{Direction, SteeringCommand, Wheel, WheelCommand};

/// Compute wheel speeds for a steering command.
///
/// `control` is clamped to `[-1.0, 1.0]` first.  Positive values steer right
/// by slowing the right wheel, negative values steer left by slowing the left
/// wheel.
///
/// ```rust
/// use linebot_control::drive::drive;
/// use linebot_types::SteeringCommand;
///
/// let wheels = drive(SteeringCommand(0.25));
/// assert_eq!(wheels.left_speed, 1.0);
/// assert_eq!(wheels.right_speed, 0.75);
/// ```
pub fn drive(control: SteeringCommand) -> WheelCommand {
    let control = control.value().clamp(-1.0, 1.0);

    let mut left_speed = 1.0;
    let mut right_speed = 1.0;
    if control > 0.0 {
        right_speed = 1.0 - control;
    } else if control < 0.0 {
        left_speed = 1.0 + control;
    }

    WheelCommand::new(left_speed, right_speed)
}

/// Writes wheel commands to a [`MotorDriver`].
pub struct DifferentialDriveActuator<M: MotorDriver> {
    driver: M,
}

impl<M: MotorDriver> DifferentialDriveActuator<M> {
    pub fn new(driver: M) -> Self {
        Self { driver }
    }

    /// Drive both wheels forward at the commanded speeds, holding each
    /// backward channel at zero.
    pub fn apply(&mut self, command: WheelCommand) {
        for wheel in Wheel::ALL {
            self.driver
                .set_speed(wheel, Direction::Forward, command.speed(wheel));
            self.driver.set_speed(wheel, Direction::Backward, 0.0);
        }
    }

    /// [`drive`] followed by [`apply`][Self::apply].
    pub fn actuate(&mut self, control: SteeringCommand) -> WheelCommand {
        let command = drive(control);
        self.apply(command);
        command
    }

    /// Write zero to all four channels.
    pub fn stop(&mut self) {
        for wheel in Wheel::ALL {
            for direction in Direction::ALL {
                self.driver.set_speed(wheel, direction, 0.0);
            }
        }
    }

    pub fn driver(&self) -> &M {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut M {
        &mut self.driver
    }

    pub fn into_inner(self) -> M {
        self.driver
    }
}
