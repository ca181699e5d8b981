//! # cctv-ptz
//!
//! Control Pelco-D pan-tilt-zoom camera heads with a game controller.
//!
//! Two modes of operation:
//!
//! - **live** (default): poll the controller, map its state to Pelco-D
//!   frames, and fan each distinct frame out to the console, the record
//!   sink, and the RS-485 serial sink. A line on standard input ends the
//!   session.
//! - **playback**: read recorded `pelco-d <hex> <millis>` lines from
//!   standard input and retransmit them with the recorded inter-message
//!   spacing.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{info, warn};

use cctv_ptz::config::Config;
use cctv_ptz::joystick::device::{self, JoystickDevice};
use cctv_ptz::joystick::layout::PtzBindings;
use cctv_ptz::serial::PelcoSerial;
use cctv_ptz::session::live::{spawn_stop_listener, LiveSession};
use cctv_ptz::session::record::Recorder;
use cctv_ptz::session::replay;

/// CCTV pan-tilt-zoom via game controller
#[derive(Parser, Debug)]
#[command(name = "cctv-ptz", version, about)]
struct Cli {
    /// Pelco-D address 0-255
    #[arg(short, long)]
    address: Option<u8>,

    /// Baud rate of the serial port
    #[arg(short, long)]
    baud: Option<u32>,

    /// Use the Nth detected gamepad
    #[arg(short, long)]
    joystick: Option<usize>,

    /// Max speed setting 0-100
    #[arg(short = 'm', long)]
    maxspeed: Option<u8>,

    /// Serial port for RS-485 output (/dev/null disables output)
    #[arg(short, long)]
    serial: Option<String>,

    /// Record Pelco-D commands to FILE ("-" for stdout)
    #[arg(short, long)]
    record: Option<String>,

    /// Print Pelco-D commands to stdout
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (default: ./cctv-ptz.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recorded session from standard input
    Playback,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration.
    fn apply_to(&self, config: &mut Config) {
        if let Some(address) = self.address {
            config.address = address;
        }
        if let Some(baud) = self.baud {
            config.baud = baud;
        }
        if let Some(joystick) = self.joystick {
            config.joystick = joystick;
        }
        if let Some(maxspeed) = self.maxspeed {
            config.max_speed = maxspeed;
        }
        if let Some(serial) = &self.serial {
            config.serial = serial.clone();
        }
        if let Some(record) = &self.record {
            config.record = record.clone();
        }
        if self.verbose {
            config.verbose = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // diagnostics go to stderr so protocol output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;

    match cli.command {
        Some(Command::Playback) => playback(config).await,
        None => interactive(config).await,
    }
}

/// Live mode: controller in, frames out.
async fn interactive(config: Config) -> Result<()> {
    let stop = spawn_stop_listener();

    let samples = match JoystickDevice::open_index(config.joystick) {
        Ok(joystick) => {
            info!("joystick opened: {}", joystick.device_path());
            if let Some(name) = joystick.name() {
                info!("  joystick name: {name}");
            }
            info!("     axis count: {}", joystick.axis_count());
            info!("   button count: {}", joystick.button_count());
            device::spawn_poll_task(joystick)
        }
        Err(e) => {
            warn!("{e}; continuing without controller input");
            device::null_source()
        }
    };

    let serial = open_serial(&config, true)?;

    let recorder = Recorder::create(&config.record)?;

    let session = LiveSession::new(
        config.address,
        config.effective_max_speed(),
        config.verbose,
        PtzBindings::xbox(),
    );

    session.run(samples, stop, recorder, serial).await?;
    Ok(())
}

/// Playback mode: record stream in, paced frames out.
async fn playback(config: Config) -> Result<()> {
    let serial = open_serial(&config, false)?;

    let stdin = BufReader::new(tokio::io::stdin());
    replay::replay(stdin, serial, config.verbose).await?;
    Ok(())
}

/// Opens the serial sink per configuration.
///
/// A disabled sink (`/dev/null`) opens nothing. An enabled sink that fails
/// to open is fatal in live mode; playback degrades to replaying into the
/// void so recordings can be exercised without hardware.
fn open_serial(config: &Config, fatal: bool) -> Result<Option<PelcoSerial>> {
    if !config.serial_enabled() {
        info!("serial port disabled");
        return Ok(None);
    }

    match PelcoSerial::open(&config.serial, config.baud) {
        Ok(port) => {
            info!("serial port opened: {}", port.device_path());
            info!("   baud rate: {}", port.baud_rate());
            info!("   data bits: 8");
            info!("   stop bits: 1");
            info!("      parity: none");
            Ok(Some(port))
        }
        Err(e) if fatal => Err(e.into()),
        Err(e) => {
            warn!("{e}; continuing without serial output");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_live_mode() {
        let cli = Cli::try_parse_from(["cctv-ptz"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_playback_subcommand() {
        let cli = Cli::try_parse_from(["cctv-ptz", "playback", "-v"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Playback)));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from([
            "cctv-ptz", "-a", "12", "-b", "4800", "-m", "50", "-s", "/dev/ttyUSB9", "-r", "-",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_to(&mut config);

        assert_eq!(config.address, 12);
        assert_eq!(config.baud, 4800);
        assert_eq!(config.max_speed, 50);
        assert_eq!(config.serial, "/dev/ttyUSB9");
        assert_eq!(config.record, "-");
    }

    #[test]
    fn test_cli_absent_flags_leave_config_untouched() {
        let cli = Cli::try_parse_from(["cctv-ptz"]).unwrap();

        let mut config = Config::default();
        config.address = 7;
        config.verbose = true;
        cli.apply_to(&mut config);

        assert_eq!(config.address, 7);
        assert!(config.verbose);
    }

    #[test]
    fn test_cli_rejects_out_of_range_address() {
        assert!(Cli::try_parse_from(["cctv-ptz", "-a", "300"]).is_err());
    }
}
