//! Differential drive controller for the sozo robot.
//!
//! Turns direction, duration and power commands into servo pulses on the two
//! configured wheel pins. Timed moves block on the supplied `DelayNs` and cannot
//! be cancelled once started.

use embedded_hal::delay::DelayNs;
use serde::{Deserialize, Serialize};

use super::{DriveCommand, Level, PinId, WheelIo};
use crate::utils::math::pulse::{wheel_pulses, Direction, FULL_POWER};

/// Wheel pin assignment and per-wheel base speed.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DriveConfig {
    pub left_pin: PinId,
    pub right_pin: PinId,
    /// Base speed of the left wheel, nominally 0-100.
    pub left_speed: f32,
    /// Base speed of the right wheel, nominally 0-100.
    pub right_speed: f32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            left_pin: 1,
            right_pin: 2,
            left_speed: 20.0,
            right_speed: 20.0,
        }
    }
}

/// Two-wheel servo drive over a [`WheelIo`] sink and a blocking delay.
pub struct DifferentialDrive<IO, D> {
    io: IO,
    delay: D,
    config: DriveConfig,
}

impl<IO, D, E> DifferentialDrive<IO, D>
where
    IO: WheelIo<Error = E>,
    D: DelayNs,
{
    /// Create a controller with the default pins (1, 2) and speeds (20, 20).
    pub fn new(
        io: IO,
        delay: D,
    ) -> Self {
        Self::with_config(io, delay, DriveConfig::default())
    }

    pub fn with_config(
        io: IO,
        delay: D,
        config: DriveConfig,
    ) -> Self {
        Self { io, delay, config }
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// Give back the output sink and the delay.
    pub fn release(self) -> (IO, D) {
        (self.io, self.delay)
    }

    /// Reassign the wheel pins. Takes effect on the next motion command.
    pub fn set_wheel_pins(
        &mut self,
        left: PinId,
        right: PinId,
    ) {
        self.config.left_pin = left;
        self.config.right_pin = right;
    }

    /// Set the per-wheel base speeds. Values outside 0-100 are not rejected; the
    /// resulting pulses are clamped instead.
    pub fn set_wheel_speeds(
        &mut self,
        left: f32,
        right: f32,
    ) {
        self.config.left_speed = left;
        self.config.right_speed = right;
    }

    /// Emit the pulses for `direction` at `power` on the left then the right pin.
    pub fn drive(
        &mut self,
        direction: Direction,
        power: f32,
    ) -> Result<(), E> {
        let speeds = (self.config.left_speed, self.config.right_speed);
        let pulses = wheel_pulses(speeds, direction, power);
        tracing::debug!(?direction, power, left = pulses.left, right = pulses.right, "drive");
        self.io.set_pulse(self.config.left_pin, pulses.left)?;
        self.io.set_pulse(self.config.right_pin, pulses.right)
    }

    pub fn forward(
        &mut self,
        power: f32,
    ) -> Result<(), E> {
        self.drive(Direction::Forward, power)
    }

    pub fn backward(
        &mut self,
        power: f32,
    ) -> Result<(), E> {
        self.drive(Direction::Backward, power)
    }

    /// Spin left in place.
    pub fn left(
        &mut self,
        power: f32,
    ) -> Result<(), E> {
        self.drive(Direction::TurnLeft, power)
    }

    /// Spin right in place.
    pub fn right(
        &mut self,
        power: f32,
    ) -> Result<(), E> {
        self.drive(Direction::TurnRight, power)
    }

    /// Pull both wheel pins low, left first.
    ///
    /// This cuts the servo signal rather than sending a 1500 µs neutral pulse.
    pub fn stop(&mut self) -> Result<(), E> {
        tracing::debug!("stop");
        self.io.set_digital(self.config.left_pin, Level::Low)?;
        self.io.set_digital(self.config.right_pin, Level::Low)
    }

    /// Drive in `direction` at `power`, block for `duration_ms`, then stop.
    pub fn timed(
        &mut self,
        direction: Direction,
        duration_ms: u32,
        power: f32,
    ) -> Result<(), E> {
        self.drive(direction, power)?;
        tracing::trace!(duration_ms, "holding");
        self.delay.delay_ms(duration_ms);
        self.stop()
    }

    pub fn drive_forward(
        &mut self,
        duration_ms: u32,
    ) -> Result<(), E> {
        self.timed(Direction::Forward, duration_ms, FULL_POWER)
    }

    pub fn drive_backward(
        &mut self,
        duration_ms: u32,
    ) -> Result<(), E> {
        self.timed(Direction::Backward, duration_ms, FULL_POWER)
    }

    pub fn turn_right(
        &mut self,
        duration_ms: u32,
    ) -> Result<(), E> {
        self.timed(Direction::TurnRight, duration_ms, FULL_POWER)
    }

    pub fn turn_left(
        &mut self,
        duration_ms: u32,
    ) -> Result<(), E> {
        self.timed(Direction::TurnLeft, duration_ms, FULL_POWER)
    }

    /// Timed forward move at a caller-chosen power (nominally 0-200).
    pub fn custom_forward(
        &mut self,
        duration_ms: u32,
        power: f32,
    ) -> Result<(), E> {
        self.timed(Direction::Forward, duration_ms, power)
    }

    pub fn custom_backward(
        &mut self,
        duration_ms: u32,
        power: f32,
    ) -> Result<(), E> {
        self.timed(Direction::Backward, duration_ms, power)
    }

    pub fn custom_right(
        &mut self,
        duration_ms: u32,
        power: f32,
    ) -> Result<(), E> {
        self.timed(Direction::TurnRight, duration_ms, power)
    }

    pub fn custom_left(
        &mut self,
        duration_ms: u32,
        power: f32,
    ) -> Result<(), E> {
        self.timed(Direction::TurnLeft, duration_ms, power)
    }

    /// Start moving in `direction` at full power. Motion continues until [`Self::stop`].
    pub fn continuous_run(
        &mut self,
        direction: Direction,
    ) -> Result<(), E> {
        match direction {
            Direction::Forward => self.forward(FULL_POWER),
            Direction::Backward => self.backward(FULL_POWER),
            Direction::TurnRight => self.right(FULL_POWER),
            Direction::TurnLeft => self.left(FULL_POWER),
        }
    }

    /// Continuous run keyed by a raw direction tag. Unknown tags stop the robot.
    pub fn continuous_run_tag(
        &mut self,
        tag: u8,
    ) -> Result<(), E> {
        match Direction::try_from(tag) {
            Ok(direction) => self.continuous_run(direction),
            Err(tag) => {
                tracing::warn!(tag, "unknown direction tag, stopping");
                self.stop()
            }
        }
    }

    /// Execute a high-level `DriveCommand`.
    pub fn execute_command(
        &mut self,
        command: DriveCommand,
    ) -> Result<(), E> {
        match command {
            DriveCommand::Pins { l, r } => {
                self.set_wheel_pins(l, r);
                Ok(())
            }
            DriveCommand::Speeds { l, r } => {
                self.set_wheel_speeds(l, r);
                Ok(())
            }
            DriveCommand::Move { d, p } => self.drive(d, p),
            DriveCommand::Timed { d, ms, p } => self.timed(d, ms, p.unwrap_or(FULL_POWER)),
            DriveCommand::Run { t } => self.continuous_run_tag(t),
            DriveCommand::Stop => self.stop(),
        }
    }
}
