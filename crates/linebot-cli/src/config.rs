//! Robot configuration – reads/writes `~/.linebot/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use linebot_control::CalibrationProfile;
use linebot_hal::pwm::{DEFAULT_WRAP, MotorPins};
use linebot_types::LineBotError;
use serde::{Deserialize, Serialize};

/// Camera geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionConfig {
    #[serde(default = "default_frame_width")]
    pub frame_width: u32,

    #[serde(default = "default_frame_height")]
    pub frame_height: u32,

    /// Row the centroid is read from.  Mid-frame when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_row: Option<u32>,
}

/// Largest accepted frame dimension in pixels.
pub const MAX_FRAME_DIM: u32 = 4096;

impl VisionConfig {
    /// Effective scan row.
    pub fn scan_row(&self) -> u32 {
        self.scan_row.unwrap_or(self.frame_height / 2)
    }

    /// Check the frame geometry: both dimensions in `1..=MAX_FRAME_DIM` and
    /// the scan row inside the frame.
    ///
    /// # Errors
    ///
    /// Returns [`LineBotError::Config`] describing the first violation.
    pub fn validate(&self) -> Result<(), LineBotError> {
        for (name, dim) in [
            ("frame_width", self.frame_width),
            ("frame_height", self.frame_height),
        ] {
            if dim == 0 || dim > MAX_FRAME_DIM {
                return Err(LineBotError::Config(format!(
                    "vision.{name} = {dim} is outside 1..={MAX_FRAME_DIM}"
                )));
            }
        }
        let row = self.scan_row();
        if row >= self.frame_height {
            return Err(LineBotError::Config(format!(
                "vision.scan_row = {row} is outside a frame of height {}",
                self.frame_height
            )));
        }
        Ok(())
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
            scan_row: None,
        }
    }
}

/// Motor wiring and PWM timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorConfig {
    #[serde(default = "default_pwm_wrap")]
    pub pwm_wrap: u16,

    #[serde(default)]
    pub pins: MotorPins,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            pwm_wrap: default_pwm_wrap(),
            pins: MotorPins::default(),
        }
    }
}

/// Persisted robot configuration stored in `~/.linebot/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calibration: CalibrationProfile,

    #[serde(default)]
    pub vision: VisionConfig,

    #[serde(default)]
    pub motors: MotorConfig,
}

fn default_frame_width() -> u32 {
    80
}
fn default_frame_height() -> u32 {
    60
}
fn default_pwm_wrap() -> u16 {
    DEFAULT_WRAP
}

/// Return the path to `~/.linebot/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".linebot").join("config.toml")
}

/// Load the config from a specific path.  Returns `None` if the file does
/// not exist.
pub fn load_from(path: &Path) -> Result<Option<Config>, LineBotError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        LineBotError::Config(format!("Failed to read config at {}: {}", path.display(), e))
    })?;
    let cfg: Config = toml::from_str(&raw)
        .map_err(|e| LineBotError::Config(format!("Failed to parse config: {}", e)))?;
    cfg.vision.validate()?;
    Ok(Some(cfg))
}

/// Load the config at `path` (or the default location), fall back to
/// defaults when the file is absent, then apply environment overrides.
pub fn resolve(path: Option<&Path>) -> Result<Config, LineBotError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);
    let mut cfg = load_from(&path)?.unwrap_or_default();
    apply_env_overrides(&mut cfg)?;
    Ok(cfg)
}

/// Apply `LINEBOT_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `LINEBOT_PID_RANGE` | `calibration.pid_range` |
/// | `LINEBOT_LINE_CENTER` | `calibration.line_center` |
/// | `LINEBOT_SCAN_ROW` | `vision.scan_row` |
/// | `LINEBOT_PWM_WRAP` | `motors.pwm_wrap` |
///
/// Values that do not parse are ignored.
///
/// # Errors
///
/// Returns [`LineBotError::InvalidCalibration`] when an override breaks the
/// calibration invariant and [`LineBotError::Config`] when the scan row no
/// longer fits the frame.
pub fn apply_env_overrides(cfg: &mut Config) -> Result<(), LineBotError> {
    let mut pid_range = cfg.calibration.pid_range();
    let mut line_center = cfg.calibration.line_center();
    if let Ok(v) = std::env::var("LINEBOT_PID_RANGE")
        && let Ok(range) = v.parse::<f32>()
    {
        pid_range = range;
    }
    if let Ok(v) = std::env::var("LINEBOT_LINE_CENTER")
        && let Ok(center) = v.parse::<i32>()
    {
        line_center = center;
    }
    cfg.calibration = CalibrationProfile::new(
        pid_range,
        line_center,
        cfg.calibration.spread_left(),
        cfg.calibration.spread_right(),
    )?;

    if let Ok(v) = std::env::var("LINEBOT_SCAN_ROW")
        && let Ok(row) = v.parse::<u32>()
    {
        cfg.vision.scan_row = Some(row);
    }
    if let Ok(v) = std::env::var("LINEBOT_PWM_WRAP")
        && let Ok(wrap) = v.parse::<u16>()
    {
        cfg.motors.pwm_wrap = wrap;
    }
    cfg.vision.validate()
}

/// Save the config to a specific path, creating parent directories.
pub fn save_to(cfg: &Config, path: &Path) -> Result<(), LineBotError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            LineBotError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| LineBotError::Config(format!("Failed to serialize config: {}", e)))?;
    fs::write(path, raw).map_err(|e| {
        LineBotError::Config(format!("Failed to write config at {}: {}", path.display(), e))
    })
}
