use clap::Parser;
use embedded_hal::delay::DelayNs;
use sozo_core::utils::controllers::PinId;
use sozo_core::utils::{DifferentialDrive, DriveCommand, DriveConfig, Level, WheelIo};
use std::convert::Infallible;
use std::io::BufRead;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts
{
    /// left wheel pin
    #[clap(long, default_value_t = 1)]
    left_pin: PinId,
    /// right wheel pin
    #[clap(long, default_value_t = 2)]
    right_pin: PinId,
    /// left wheel speed (0-100)
    #[clap(long, default_value_t = 20.0)]
    left_speed: f32,
    /// right wheel speed (0-100)
    #[clap(long, default_value_t = 20.0)]
    right_speed: f32,
    /// log timed pauses instead of sleeping through them
    #[clap(long)]
    dry_run: bool,
}

// Wheel outputs that log to console
struct ConsoleWheels;

impl WheelIo for ConsoleWheels {
    type Error = Infallible;

    fn set_pulse(&mut self, pin: PinId, pulse_us: u16) -> Result<(), Self::Error> {
        info!(pin, pulse_us, "servo pulse");
        Ok(())
    }

    fn set_digital(&mut self, pin: PinId, level: Level) -> Result<(), Self::Error> {
        info!(pin, ?level, "digital write");
        Ok(())
    }
}

struct HostDelay {
    dry_run: bool,
}

impl DelayNs for HostDelay {
    fn delay_ns(&mut self, ns: u32) {
        if !self.dry_run {
            std::thread::sleep(Duration::from_nanos(ns.into()));
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        info!(ms, dry_run = self.dry_run, "pause");
        if !self.dry_run {
            std::thread::sleep(Duration::from_millis(ms.into()));
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts: Opts = Opts::parse();
    let config = DriveConfig {
        left_pin: opts.left_pin,
        right_pin: opts.right_pin,
        left_speed: opts.left_speed,
        right_speed: opts.right_speed,
    };
    info!(?config, "Starting mock robot, reading drive commands from stdin");

    let mut drive = DifferentialDrive::with_config(
        ConsoleWheels,
        HostDelay {
            dry_run: opts.dry_run,
        },
        config,
    );

    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                error!(?error, "failed to read stdin");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<DriveCommand>(line) {
            Ok(cmd) => {
                info!(?cmd, "Received drive command");
                if let Err(never) = drive.execute_command(cmd) {
                    match never {}
                }
            }
            Err(error) => warn!(?error, line, "Invalid command format"),
        }
    }

    info!("stdin closed, stopping");
    if let Err(never) = drive.stop() {
        match never {}
    }
}
