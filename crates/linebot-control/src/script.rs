//! [`DriveScript`] – open-loop sequence of steering commands.
//!
//! Used to check the motor wiring and the actuation law on the bench without
//! a camera: each step holds a fixed steering command for a dwell period.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use linebot_control::drive::DifferentialDriveActuator;
//! use linebot_control::script::DriveScript;
//! use linebot_hal::sim::RecordingMotorDriver;
//!
//! let mut actuator = DifferentialDriveActuator::new(RecordingMotorDriver::new());
//! let mut labels = Vec::new();
//! DriveScript::bench().play(&mut actuator, Duration::ZERO, |step, _| labels.push(step.label.clone()));
//! assert_eq!(labels.len(), 8);
//! ```

use std::time::Duration;

use linebot_hal::MotorDriver;
use linebot_types::{SteeringCommand, WheelCommand};
use tracing::info;

use crate::drive::DifferentialDriveActuator;

/// One scripted steering command.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveStep {
    pub label: String,
    pub control: SteeringCommand,
}

impl DriveStep {
    pub fn new(label: impl Into<String>, control: f32) -> Self {
        Self {
            label: label.into(),
            control: SteeringCommand(control),
        }
    }
}

/// Ordered list of [`DriveStep`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriveScript {
    steps: Vec<DriveStep>,
}

impl DriveScript {
    pub fn new(steps: Vec<DriveStep>) -> Self {
        Self { steps }
    }

    /// The bench routine: straight, three increasing right turns, straight,
    /// three increasing left turns.
    pub fn bench() -> Self {
        Self::new(vec![
            DriveStep::new("straight", 0.0),
            DriveStep::new("slight right", 0.2),
            DriveStep::new("hard right", 0.4),
            DriveStep::new("sharp right", 0.6),
            DriveStep::new("straight", 0.0),
            DriveStep::new("slight left", -0.2),
            DriveStep::new("hard left", -0.4),
            DriveStep::new("sharp left", -0.6),
        ])
    }

    pub fn steps(&self) -> &[DriveStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply each step in order, sleeping `dwell` after every write.
    /// `on_step` sees the step and the wheel speeds it produced.
    pub fn play<M: MotorDriver>(
        &self,
        actuator: &mut DifferentialDriveActuator<M>,
        dwell: Duration,
        mut on_step: impl FnMut(&DriveStep, &WheelCommand),
    ) {
        for step in &self.steps {
            let wheels = actuator.actuate(step.control);
            info!(
                step = %step.label,
                control = step.control.value(),
                left = wheels.left_speed,
                right = wheels.right_speed,
                "drive step"
            );
            on_step(step, &wheels);
            if !dwell.is_zero() {
                std::thread::sleep(dwell);
            }
        }
    }
}
