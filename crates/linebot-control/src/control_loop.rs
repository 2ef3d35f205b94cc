//! [`ControlLoop`] – the closed-loop line follower.
//!
//! Every cycle:
//!
//! 1. **Acquire** – request a capture and spin on
//!    [`VisionChannel::is_ready`] until the frame is available
//!    ([`acquire_frame`]).  This is the only point where the loop waits.
//! 2. **Estimate** – convert the frame and read the centroid at the scan row.
//! 3. **Map** – [`SteeringMapper::map`] turns the centroid into a steering
//!    command.
//! 4. **Actuate** – [`DifferentialDriveActuator::actuate`] writes the wheel
//!    speeds.
//! 5. **Report** – hand a [`CycleReport`] to the caller's sink.
//!
//! There are no retries and no timeouts.  A vision channel that never becomes
//! ready blocks the loop forever.
//!
//! # Example
//!
//! ```rust
//! use linebot_control::calibration::CalibrationProfile;
//! use linebot_control::control_loop::ControlLoop;
//! use linebot_hal::sim::{RecordingMotorDriver, SimVisionChannel};
//!
//! let camera = SimVisionChannel::new("front", 80, 60).with_script(vec![25, 41, 11]);
//! let mut control = ControlLoop::new(camera, RecordingMotorDriver::new(), CalibrationProfile::default());
//!
//! let mut lines = Vec::new();
//! control.run_cycles(3, |report| lines.push(report.to_string()));
//! assert_eq!(lines, ["25,0.00", "41,-0.40", "11,0.40"]);
//! ```

use std::fmt;

use linebot_hal::{MotorDriver, VisionChannel};
use linebot_types::{LineEstimate, SteeringCommand, WheelCommand};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::calibration::CalibrationProfile;
use crate::drive::DifferentialDriveActuator;
use crate::steering::SteeringMapper;

/// Request a capture and busy-wait until `vision` reports it ready.
///
/// The wait is a pure spin: the calling thread keeps the processor for the
/// whole wait and nothing else runs.  Returns the number of polls it took.
pub fn acquire_frame<V: VisionChannel + ?Sized>(vision: &mut V) -> u64 {
    vision.request_capture();
    let mut polls = 1;
    while !vision.is_ready() {
        std::hint::spin_loop();
        polls += 1;
    }
    polls
}

/// Outcome of one control cycle.
///
/// Renders as the diagnostic status line `<centroid>,<control>`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CycleReport {
    /// 1-based cycle counter.
    pub cycle: u64,
    pub centroid: LineEstimate,
    pub control: SteeringCommand,
    pub wheels: WheelCommand,
    /// `is_ready` polls spent waiting for the frame.
    pub polls: u64,
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.centroid, self.control)
    }
}

/// Orchestrates vision, steering and actuation for one robot.
pub struct ControlLoop<V: VisionChannel, M: MotorDriver> {
    vision: V,
    mapper: SteeringMapper,
    actuator: DifferentialDriveActuator<M>,
    scan_row: u32,
    cycles: u64,
}

impl<V: VisionChannel, M: MotorDriver> ControlLoop<V, M> {
    /// Wire up the loop.  The scan row defaults to mid-frame and every motor
    /// channel is parked at zero until the first cycle.
    pub fn new(vision: V, driver: M, profile: CalibrationProfile) -> Self {
        let scan_row = vision.frame_height() / 2;
        let mut actuator = DifferentialDriveActuator::new(driver);
        actuator.stop();
        info!(
            vision = vision.id(),
            scan_row,
            pid_range = profile.pid_range(),
            line_center = profile.line_center(),
            spread_left = profile.spread_left(),
            spread_right = profile.spread_right(),
            "control loop ready"
        );
        Self {
            vision,
            mapper: SteeringMapper::new(profile),
            actuator,
            scan_row,
            cycles: 0,
        }
    }

    /// Read the centroid from `row` instead of mid-frame.  A row below the
    /// frame is clamped to the last row.
    pub fn with_scan_row(mut self, row: u32) -> Self {
        let last = self.vision.frame_height().saturating_sub(1);
        if row > last {
            warn!(row, last, "scan row outside frame, clamping");
        }
        self.scan_row = row.min(last);
        self
    }

    pub fn scan_row(&self) -> u32 {
        self.scan_row
    }

    pub fn profile(&self) -> &CalibrationProfile {
        self.mapper.profile()
    }

    /// Number of completed cycles.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn vision(&self) -> &V {
        &self.vision
    }

    pub fn actuator(&self) -> &DifferentialDriveActuator<M> {
        &self.actuator
    }

    /// Run a single acquire → estimate → map → actuate cycle.
    pub fn run_cycle(&mut self) -> CycleReport {
        let polls = acquire_frame(&mut self.vision);

        self.vision.convert();
        let centroid = LineEstimate(self.vision.estimate_line_column(self.scan_row));
        let frame_width = self.vision.frame_width();
        if !centroid.within(frame_width) {
            warn!(
                centroid = centroid.column(),
                frame_width, "line estimate outside frame; steering will saturate"
            );
        }

        let control = self.mapper.map(centroid.column());
        let wheels = self.actuator.actuate(control);

        self.cycles += 1;
        let report = CycleReport {
            cycle: self.cycles,
            centroid,
            control,
            wheels,
            polls,
        };
        debug!(
            cycle = report.cycle,
            centroid = centroid.column(),
            control = control.value(),
            left = wheels.left_speed,
            right = wheels.right_speed,
            polls,
            "control cycle"
        );
        report
    }

    /// Run `count` cycles, passing each report to `report`.
    pub fn run_cycles(&mut self, count: u64, mut report: impl FnMut(&CycleReport)) {
        for _ in 0..count {
            let r = self.run_cycle();
            report(&r);
        }
    }

    /// Run forever.  There is no stop signal; the loop ends with the process.
    pub fn run(&mut self, mut report: impl FnMut(&CycleReport)) -> ! {
        loop {
            let r = self.run_cycle();
            report(&r);
        }
    }
}
