//! In-process simulation drivers for host runs and CI without hardware.
//!
//! | Driver | Stub behaviour |
//! |---|---|
//! | [`SimVisionChannel`] | Becomes ready after a fixed number of polls and replays a scripted centroid sequence. |
//! | [`SimPwm`] | Records the wrap and latest compare level of every pin. |
//! | [`RecordingMotorDriver`] | Records every channel write in order. |
//!
//! # Example
//!
//! ```rust
//! use linebot_hal::sim::SimVisionChannel;
//! use linebot_hal::VisionChannel;
//!
//! let mut camera = SimVisionChannel::new("front", 80, 60)
//!     .with_script(vec![25, 41])
//!     .with_polls_until_ready(3);
//!
//! camera.request_capture();
//! while !camera.is_ready() {}
//! camera.convert();
//! assert_eq!(camera.estimate_line_column(30), 25);
//! assert_eq!(camera.polls(), 3);
//! ```

use std::collections::HashMap;

use linebot_types::{Direction, Wheel};
use tracing::trace;

use crate::motor::MotorDriver;
use crate::pwm::PwmOutput;
use crate::vision::VisionChannel;

// ────────────────────────────────────────────────────────────────────────────
// Scripted vision channel
// ────────────────────────────────────────────────────────────────────────────

/// A simulated camera that replays a fixed list of centroids, one per
/// capture, wrapping around at the end of the script.
///
/// Each capture becomes ready on the `polls_until_ready`-th call to
/// [`is_ready`][VisionChannel::is_ready].  An empty script reports the frame
/// center.
#[derive(Debug, Clone)]
pub struct SimVisionChannel {
    id: String,
    frame_width: u32,
    frame_height: u32,
    script: Vec<i32>,
    cursor: usize,
    /// Right-most column of a sweep; `None` when replaying `script`.
    sweep_last: Option<u32>,
    sweep_step: u64,
    polls_until_ready: u32,
    remaining_polls: Option<u32>,
    ready: bool,
    captures: u64,
    polls: u64,
    last_row: Option<u32>,
}

impl SimVisionChannel {
    /// Create a channel for a `frame_width` × `frame_height` sensor that is
    /// ready on the first poll.
    pub fn new(id: impl Into<String>, frame_width: u32, frame_height: u32) -> Self {
        Self {
            id: id.into(),
            frame_width,
            frame_height,
            script: Vec::new(),
            cursor: 0,
            sweep_last: None,
            sweep_step: 0,
            polls_until_ready: 1,
            remaining_polls: None,
            ready: false,
            captures: 0,
            polls: 0,
            last_row: None,
        }
    }

    /// Replace the centroid script.
    pub fn with_script(mut self, script: Vec<i32>) -> Self {
        self.script = script;
        self.cursor = 0;
        self.sweep_last = None;
        self
    }

    /// Number of polls each capture takes to complete (minimum 1).
    pub fn with_polls_until_ready(mut self, polls: u32) -> Self {
        self.polls_until_ready = polls.max(1);
        self
    }

    /// A channel whose line drifts from the left edge of the frame to the
    /// right edge and back, one column per capture.  Columns are computed
    /// per capture, so the frame width does not bound memory.
    pub fn sweep(id: impl Into<String>, frame_width: u32, frame_height: u32) -> Self {
        let mut channel = Self::new(id, frame_width, frame_height);
        channel.sweep_last = Some(frame_width.saturating_sub(1).min(i32::MAX as u32));
        channel
    }

    fn next_sweep_column(&mut self, last: u32) -> i32 {
        let last = u64::from(last);
        let period = (2 * last).max(1);
        let pos = self.sweep_step % period;
        self.sweep_step = self.sweep_step.wrapping_add(1);
        let column = if pos <= last { last - pos } else { pos - last };
        // `column <= last <= i32::MAX`.
        column as i32
    }

    /// Total captures requested so far.
    pub fn captures(&self) -> u64 {
        self.captures
    }

    /// Total `is_ready` polls so far.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Scan row of the most recent centroid query.
    pub fn last_row(&self) -> Option<u32> {
        self.last_row
    }
}

impl VisionChannel for SimVisionChannel {
    fn id(&self) -> &str {
        &self.id
    }

    fn frame_width(&self) -> u32 {
        self.frame_width
    }

    fn frame_height(&self) -> u32 {
        self.frame_height
    }

    fn request_capture(&mut self) {
        self.captures += 1;
        self.ready = false;
        self.remaining_polls = Some(self.polls_until_ready);
    }

    fn is_ready(&mut self) -> bool {
        self.polls += 1;
        if let Some(remaining) = self.remaining_polls {
            if remaining <= 1 {
                self.ready = true;
                self.remaining_polls = None;
            } else {
                self.remaining_polls = Some(remaining - 1);
            }
        }
        self.ready
    }

    fn convert(&mut self) {}

    fn estimate_line_column(&mut self, row: u32) -> i32 {
        self.last_row = Some(row);
        if let Some(last) = self.sweep_last {
            return self.next_sweep_column(last);
        }
        if self.script.is_empty() {
            return (self.frame_width / 2) as i32;
        }
        let column = self.script[self.cursor];
        self.cursor = (self.cursor + 1) % self.script.len();
        column
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recording PWM peripheral
// ────────────────────────────────────────────────────────────────────────────

/// A simulated PWM peripheral that stores the configured wrap and latest
/// level per pin.
#[derive(Debug, Default, Clone)]
pub struct SimPwm {
    wraps: HashMap<u8, u16>,
    levels: HashMap<u8, u16>,
    writes: u64,
}

impl SimPwm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap value `pin` was configured with.
    pub fn wrap(&self, pin: u8) -> Option<u16> {
        self.wraps.get(&pin).copied()
    }

    /// Most recent compare level written to `pin`.
    pub fn level(&self, pin: u8) -> Option<u16> {
        self.levels.get(&pin).copied()
    }

    /// Number of `set_level` calls so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl PwmOutput for SimPwm {
    fn configure(&mut self, pin: u8, wrap: u16) {
        self.wraps.insert(pin, wrap);
    }

    fn set_level(&mut self, pin: u8, level: u16) {
        trace!(pin, level, "sim pwm level");
        self.writes += 1;
        self.levels.insert(pin, level);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Recording motor driver
// ────────────────────────────────────────────────────────────────────────────

/// One recorded channel write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorWrite {
    pub wheel: Wheel,
    pub direction: Direction,
    pub speed: f32,
}

/// A motor driver that records every write for later assertions.
#[derive(Debug, Default, Clone)]
pub struct RecordingMotorDriver {
    writes: Vec<MotorWrite>,
}

impl RecordingMotorDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All writes in call order.
    pub fn writes(&self) -> &[MotorWrite] {
        &self.writes
    }

    /// Latest speed written to a channel, if any.
    pub fn speed(&self, wheel: Wheel, direction: Direction) -> Option<f32> {
        self.writes
            .iter()
            .rev()
            .find(|w| w.wheel == wheel && w.direction == direction)
            .map(|w| w.speed)
    }

    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl MotorDriver for RecordingMotorDriver {
    fn set_speed(&mut self, wheel: Wheel, direction: Direction, speed: f32) {
        self.writes.push(MotorWrite {
            wheel,
            direction,
            speed,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_vision_ready_after_configured_polls() {
        let mut cam = SimVisionChannel::new("cam", 80, 60).with_polls_until_ready(4);
        cam.request_capture();
        assert!(!cam.is_ready());
        assert!(!cam.is_ready());
        assert!(!cam.is_ready());
        assert!(cam.is_ready());
        assert_eq!(cam.polls(), 4);
        assert_eq!(cam.captures(), 1);
    }

    #[test]
    fn sim_vision_never_ready_without_capture_request() {
        let mut cam = SimVisionChannel::new("cam", 80, 60);
        assert!(!cam.is_ready());
        assert!(!cam.is_ready());
    }

    #[test]
    fn new_capture_clears_readiness() {
        let mut cam = SimVisionChannel::new("cam", 80, 60).with_polls_until_ready(2);
        cam.request_capture();
        assert!(!cam.is_ready());
        assert!(cam.is_ready());
        cam.request_capture();
        assert!(!cam.is_ready());
        assert!(cam.is_ready());
    }

    #[test]
    fn zero_polls_is_treated_as_one() {
        let mut cam = SimVisionChannel::new("cam", 80, 60).with_polls_until_ready(0);
        cam.request_capture();
        assert!(cam.is_ready());
    }

    #[test]
    fn script_wraps_around() {
        let mut cam = SimVisionChannel::new("cam", 80, 60).with_script(vec![10, 20]);
        assert_eq!(cam.estimate_line_column(30), 10);
        assert_eq!(cam.estimate_line_column(30), 20);
        assert_eq!(cam.estimate_line_column(30), 10);
        assert_eq!(cam.last_row(), Some(30));
    }

    #[test]
    fn empty_script_reports_frame_center() {
        let mut cam = SimVisionChannel::new("cam", 80, 60);
        assert_eq!(cam.estimate_line_column(30), 40);
    }

    #[test]
    fn sweep_covers_every_column() {
        let mut cam = SimVisionChannel::sweep("cam", 5, 4);
        let seen: Vec<i32> = (0..8).map(|_| cam.estimate_line_column(2)).collect();
        assert_eq!(seen, vec![4, 3, 2, 1, 0, 1, 2, 3]);
        // Second pass repeats the first.
        assert_eq!(cam.estimate_line_column(2), 4);
    }

    #[test]
    fn sweep_of_huge_frame_stays_in_range() {
        let mut cam = SimVisionChannel::sweep("cam", u32::MAX, 4);
        assert_eq!(cam.estimate_line_column(2), i32::MAX);
        assert_eq!(cam.estimate_line_column(2), i32::MAX - 1);
    }

    #[test]
    fn sweep_of_single_column_frame_stays_on_it() {
        let mut cam = SimVisionChannel::sweep("cam", 1, 4);
        assert_eq!(cam.estimate_line_column(2), 0);
        assert_eq!(cam.estimate_line_column(2), 0);
    }

    #[test]
    fn sim_pwm_records_configuration_and_levels() {
        let mut pwm = SimPwm::new();
        pwm.configure(19, 12_500);
        pwm.set_level(19, 300);
        pwm.set_level(19, 600);
        assert_eq!(pwm.wrap(19), Some(12_500));
        assert_eq!(pwm.level(19), Some(600));
        assert_eq!(pwm.level(18), None);
        assert_eq!(pwm.writes(), 2);
    }

    #[test]
    fn recording_driver_keeps_latest_speed_per_channel() {
        let mut driver = RecordingMotorDriver::new();
        driver.set_forward_speed(Wheel::Left, 0.2);
        driver.set_speed(Wheel::Left, Direction::Backward, 0.0);
        driver.set_forward_speed(Wheel::Left, 0.9);

        assert_eq!(driver.writes().len(), 3);
        assert_eq!(driver.speed(Wheel::Left, Direction::Forward), Some(0.9));
        assert_eq!(driver.speed(Wheel::Left, Direction::Backward), Some(0.0));
        assert_eq!(driver.speed(Wheel::Right, Direction::Forward), None);

        driver.clear();
        assert!(driver.writes().is_empty());
    }
}
