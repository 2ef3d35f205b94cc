//! `linebot-hal` – hardware boundary of the line follower.
//!
//! The control pipeline only ever talks to the traits defined here, so the
//! camera and motor hardware can be swapped for simulated drivers without
//! touching the steering logic.
//!
//! # Modules
//!
//! - [`vision`] – [`VisionChannel`][vision::VisionChannel]: capture handshake
//!   with the frame producer and the per-row line centroid query.
//! - [`motor`] – [`MotorDriver`][motor::MotorDriver]: per-wheel,
//!   per-direction duty-cycle writes.
//! - [`pwm`] – [`PwmMotorDriver`][pwm::PwmMotorDriver]: a [`MotorDriver`]
//!   that drives four PWM pins through a register-level
//!   [`PwmOutput`][pwm::PwmOutput].
//! - [`sim`] – scripted vision channel and recording drivers for host runs
//!   and tests.
//!
//! [`MotorDriver`]: motor::MotorDriver

pub mod motor;
pub mod pwm;
pub mod sim;
pub mod vision;

pub use motor::MotorDriver;
pub use pwm::{MotorPins, PwmMotorDriver, PwmOutput};
pub use vision::VisionChannel;
