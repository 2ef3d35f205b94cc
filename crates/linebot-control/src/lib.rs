//! `linebot-control` – the line-following control pipeline.
//!
//! Turns the camera's line centroid into differential wheel speeds, once per
//! frame, forever.
//!
//! # Modules
//!
//! - [`calibration`] – [`CalibrationProfile`][calibration::CalibrationProfile]:
//!   validated, immutable mapping parameters.
//! - [`steering`] – [`SteeringMapper`][steering::SteeringMapper]: the
//!   piecewise-linear centroid → steering law.
//! - [`drive`] – [`DifferentialDriveActuator`][drive::DifferentialDriveActuator]:
//!   the pure steering → wheel-speed law and the motor writes.
//! - [`control_loop`] – [`ControlLoop`][control_loop::ControlLoop]: the
//!   acquire / estimate / map / actuate / report cycle.
//! - [`script`] – [`DriveScript`][script::DriveScript]: open-loop bench
//!   routine for checking the drive without a camera.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: global
//!   `tracing` subscriber setup.

pub mod calibration;
pub mod control_loop;
pub mod drive;
pub mod script;
pub mod steering;
pub mod telemetry;

pub use calibration::CalibrationProfile;
pub use control_loop::{ControlLoop, CycleReport, acquire_frame};
pub use drive::{DifferentialDriveActuator, drive};
pub use script::{DriveScript, DriveStep};
pub use steering::{SteeringMapper, map_centroid};
pub use telemetry::init_tracing;
