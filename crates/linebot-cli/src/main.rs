//! `linebot-cli` – LineBot command line interface.
//!
//! This binary is the entry point for the line follower.  It:
//!
//! 1. Loads `~/.linebot/config.toml` (or `--config`), applying `LINEBOT_*`
//!    environment overrides; `linebot init` writes the defaults.
//! 2. `linebot run` closes the loop against the simulated camera and PWM
//!    backend, printing one `<centroid>,<control>` status line per cycle.
//! 3. `linebot demo` replays the open-loop bench drive sequence.
//! 4. `linebot show-config` prints the effective configuration.

mod config;
mod replay;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use linebot_control::{ControlLoop, CycleReport, DifferentialDriveActuator, DriveScript};
use linebot_hal::PwmMotorDriver;
use linebot_hal::sim::{SimPwm, SimVisionChannel};
use linebot_types::LineBotError;

#[derive(Parser, Debug)]
#[command(name = "linebot", version, about = "Line-following robot controller")]
struct Cli {
    #[arg(long, global = true, help = "Config file (default ~/.linebot/config.toml)")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the default configuration file.
    Init {
        #[arg(long, default_value_t = false, help = "Overwrite an existing file")]
        force: bool,
    },
    /// Run the closed control loop against the simulated camera.
    Run {
        #[arg(long, help = "Stop after N cycles (runs forever when omitted)")]
        cycles: Option<u64>,
        #[arg(long, help = "Centroid replay file (default: sweep across the frame)")]
        script: Option<PathBuf>,
        #[arg(long, default_value_t = 1, help = "Polls until each frame is ready")]
        polls: u32,
        #[arg(long, default_value_t = false, help = "Emit each cycle as JSON")]
        json: bool,
    },
    /// Replay the open-loop bench drive sequence.
    Demo {
        #[arg(long, default_value_t = 1000)]
        dwell_ms: u64,
        #[arg(long, default_value_t = 1)]
        repeat: u32,
    },
    /// Print the effective configuration.
    ShowConfig,
}

fn main() -> ExitCode {
    linebot_control::init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), LineBotError> {
    match cli.command {
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::config_path);
            if path.exists() && !force {
                return Err(LineBotError::Config(format!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                )));
            }
            config::save_to(&config::Config::default(), &path)?;
            println!(
                "  {} Config saved to {}",
                "✓".green().bold(),
                path.display().to_string().bold()
            );
            Ok(())
        }
        Commands::Run {
            cycles,
            script,
            polls,
            json,
        } => {
            let cfg = config::resolve(cli.config.as_deref())?;
            let centroids = script
                .as_deref()
                .map(replay::load_centroids)
                .transpose()?;
            print_banner();
            run_loop(&cfg, centroids, polls, cycles, json)
        }
        Commands::Demo { dwell_ms, repeat } => {
            let cfg = config::resolve(cli.config.as_deref())?;
            print_banner();
            run_demo(&cfg, Duration::from_millis(dwell_ms), repeat)
        }
        Commands::ShowConfig => {
            let cfg = config::resolve(cli.config.as_deref())?;
            let raw = toml::to_string_pretty(&cfg)
                .map_err(|e| LineBotError::Config(format!("Failed to serialize config: {}", e)))?;
            print!("{raw}");
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Closed loop
// ─────────────────────────────────────────────────────────────────────────────

fn run_loop(
    cfg: &config::Config,
    centroids: Option<Vec<i32>>,
    polls: u32,
    cycles: Option<u64>,
    json: bool,
) -> Result<(), LineBotError> {
    let width = cfg.vision.frame_width;
    let height = cfg.vision.frame_height;
    let camera = match centroids {
        Some(script) => SimVisionChannel::new("sim-camera", width, height).with_script(script),
        None => SimVisionChannel::sweep("sim-camera", width, height),
    }
    .with_polls_until_ready(polls);

    let driver = PwmMotorDriver::new(SimPwm::new(), cfg.motors.pins, cfg.motors.pwm_wrap)?;
    let mut control = ControlLoop::new(camera, driver, cfg.calibration)
        .with_scan_row(cfg.vision.scan_row());

    let report = |r: &CycleReport| {
        if json {
            match serde_json::to_string(r) {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("{}: {}", "report".red(), e),
            }
        } else {
            println!("{r}");
        }
    };

    match cycles {
        Some(n) => {
            control.run_cycles(n, report);
            info!(cycles = control.cycles(), "simulation finished");
            Ok(())
        }
        None => control.run(report),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bench demo
// ─────────────────────────────────────────────────────────────────────────────

fn run_demo(cfg: &config::Config, dwell: Duration, repeat: u32) -> Result<(), LineBotError> {
    let driver = PwmMotorDriver::new(SimPwm::new(), cfg.motors.pins, cfg.motors.pwm_wrap)?;
    let mut actuator = DifferentialDriveActuator::new(driver);
    let script = DriveScript::bench();

    for _ in 0..repeat {
        script.play(&mut actuator, dwell, |step, wheels| {
            println!(
                "  {:<14} {:>6}   left {:.2}  right {:.2}",
                step.label.bold(),
                step.control.to_string(),
                wheels.left_speed,
                wheels.right_speed
            );
        });
    }
    actuator.stop();
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    eprintln!();
    eprintln!(
        "  {} {}",
        "LineBot".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    eprintln!("  Camera line follower");
    eprintln!();
}
