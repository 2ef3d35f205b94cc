//! [`SteeringMapper`] – line centroid to steering command.
//!
//! The mapping is a proportional, two-segment piecewise-linear law:
//!
//! ```text
//!  control
//!   +0.5·r ─────┐
//!               │╲
//!               │  ╲
//!       0 ──────┼────●────────────── centroid
//!               │      ╲
//!   -0.5·r      │        ╲┌──────────
//!           spread_right  line_center  spread_left
//! ```
//!
//! A centroid at `line_center` maps to exactly zero.  Moving towards either
//! spread bound ramps linearly to the maximum magnitude `0.5 · pid_range`,
//! which is held for every centroid beyond the bound.  A line seen to the left
//! (larger column) produces a negative (left) steer.
//!
//! # Example
//!
//! ```rust
//! use linebot_control::calibration::CalibrationProfile;
//! use linebot_control::steering::SteeringMapper;
//!
//! let mapper = SteeringMapper::new(CalibrationProfile::default());
//! assert_eq!(mapper.map(25).value(), 0.0);
//! assert!((mapper.map(50).value() + 0.4).abs() < 1e-6);
//! ```

use linebot_types::SteeringCommand;

use crate::calibration::CalibrationProfile;

/// Map `centroid` to a steering command under `profile`.
///
/// Total over all integers; the result always lies in
/// `[-0.5 · pid_range, 0.5 · pid_range]` and is non-increasing in
/// `centroid`.
pub fn map_centroid(centroid: i32, profile: &CalibrationProfile) -> SteeringCommand {
    let max_steer = profile.max_steer();
    let centroid = centroid as i64;
    let line_center = profile.line_center() as i64;

    if centroid == line_center {
        return SteeringCommand::STRAIGHT;
    }

    let control = if centroid > line_center {
        if centroid >= profile.spread_left() as i64 {
            -max_steer
        } else {
            let offset = (centroid - line_center) as f32;
            -max_steer * (offset / profile.left_span())
        }
    } else if centroid <= profile.spread_right() as i64 {
        max_steer
    } else {
        let offset = (centroid - profile.spread_right() as i64) as f32;
        max_steer * (1.0 - offset / profile.right_span())
    };

    SteeringCommand(control.clamp(-max_steer, max_steer))
}

/// Steering law bound to one calibration profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringMapper {
    profile: CalibrationProfile,
}

impl SteeringMapper {
    pub fn new(profile: CalibrationProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &CalibrationProfile {
        &self.profile
    }

    /// Steering command for a centroid column.  See [`map_centroid`].
    pub fn map(&self, centroid: i32) -> SteeringCommand {
        map_centroid(centroid, &self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiles() -> Vec<CalibrationProfile> {
        vec![
            CalibrationProfile::default(),
            CalibrationProfile::new(1.0, 40, 70, 10).unwrap(),
            CalibrationProfile::new(2.0, 0, 1, -1).unwrap(),
            CalibrationProfile::new(0.1, -20, 5, -60).unwrap(),
            CalibrationProfile::new(1.5, 100, 101, 0).unwrap(),
        ]
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn line_center_maps_to_exactly_zero() {
        for p in profiles() {
            let c = map_centroid(p.line_center(), &p).value();
            assert_eq!(c, 0.0);
            assert!(c.is_sign_positive(), "zero must not print as -0.00");
        }
    }

    #[test]
    fn spread_bounds_map_to_max_magnitude() {
        for p in profiles() {
            assert_eq!(map_centroid(p.spread_left(), &p).value(), -p.max_steer());
            assert_eq!(map_centroid(p.spread_right(), &p).value(), p.max_steer());
        }
    }

    #[test]
    fn beyond_bounds_clamps() {
        for p in profiles() {
            for c in [p.spread_left() + 1, p.spread_left() + 1000, i32::MAX] {
                assert_eq!(map_centroid(c, &p).value(), -p.max_steer());
            }
            for c in [p.spread_right() - 1, p.spread_right() - 1000, i32::MIN] {
                assert_eq!(map_centroid(c, &p).value(), p.max_steer());
            }
        }
    }

    #[test]
    fn output_is_bounded_and_non_increasing() {
        for p in profiles() {
            let lo = p.spread_right() - 20;
            let hi = p.spread_left() + 20;
            let mut prev = map_centroid(lo - 1, &p).value();
            for c in lo..=hi {
                let cur = map_centroid(c, &p).value();
                assert!(cur.abs() <= p.max_steer(), "out of range at {c}: {cur}");
                assert!(cur <= prev, "not monotonic at {c}: {prev} -> {cur}");
                prev = cur;
            }
        }
    }

    #[test]
    fn continuous_at_breakpoints() {
        // Adjacent columns never jump by more than one interpolation step.
        for p in profiles() {
            let step_left = p.max_steer() / p.left_span();
            let step_right = p.max_steer() / p.right_span();
            let step = step_left.max(step_right) + 1e-6;
            for c in (p.spread_right() - 2)..=(p.spread_left() + 2) {
                let a = map_centroid(c, &p).value();
                let b = map_centroid(c + 1, &p).value();
                assert!((a - b).abs() <= step, "jump between {c} and {}", c + 1);
            }
        }
    }

    #[test]
    fn bench_profile_values() {
        let mapper = SteeringMapper::new(CalibrationProfile::default());
        assert!(approx(mapper.map(25).value(), 0.0));
        assert!(approx(mapper.map(41).value(), -0.4));
        assert!(approx(mapper.map(50).value(), -0.4));
        assert!(approx(mapper.map(11).value(), 0.4));
        assert!(approx(mapper.map(0).value(), 0.4));
        // Halfway along the left segment.
        assert!(approx(mapper.map(33).value(), -0.2));
        // Right segment: 0.4 * (1 - 7/14) = 0.2
        assert!(approx(mapper.map(18).value(), 0.2));
        let c = mapper.map(18).value();
        assert!(c > 0.0 && c < 0.4);
    }

    #[test]
    fn mapper_exposes_profile() {
        let p = CalibrationProfile::new(1.0, 40, 70, 10).unwrap();
        let mapper = SteeringMapper::new(p);
        assert_eq!(mapper.profile(), &p);
    }
}
