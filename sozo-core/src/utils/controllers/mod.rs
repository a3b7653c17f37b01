//! Module Exports
//!
//! This file exports the modules used to drive the robot's wheels.
//!
//! - `drive`: the differential drive controller and its configuration.
//! - `i2c`: a PCA9685 servo board backend for the wheel outputs.

pub mod drive;
/// Module for the I2C-connected servo board.
pub mod i2c;

use serde::{Deserialize, Serialize};

use crate::utils::math::pulse::Direction;

pub use drive::{DifferentialDrive, DriveConfig};
pub use i2c::ServoBoard;

/// Output pin identifier.
pub type PinId = u8;

/// Logic level for a digital pin write.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Low,
    High,
}

/// Output sink for the wheel servos.
pub trait WheelIo {
    type Error;

    /// Emit a servo pulse of `pulse_us` microseconds on `pin`.
    fn set_pulse(
        &mut self,
        pin: PinId,
        pulse_us: u16,
    ) -> Result<(), Self::Error>;

    /// Drive `pin` to a fixed logic level.
    fn set_digital(
        &mut self,
        pin: PinId,
        level: Level,
    ) -> Result<(), Self::Error>;
}

impl<T: WheelIo + ?Sized> WheelIo for &mut T {
    type Error = T::Error;

    fn set_pulse(
        &mut self,
        pin: PinId,
        pulse_us: u16,
    ) -> Result<(), Self::Error> {
        T::set_pulse(self, pin, pulse_us)
    }

    fn set_digital(
        &mut self,
        pin: PinId,
        level: Level,
    ) -> Result<(), Self::Error> {
        T::set_digital(self, pin, level)
    }
}

/// Drive command variants accepted by [`DifferentialDrive::execute_command`].
///
/// Serialized as JSON with tag `"dc"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "dc", rename_all = "snake_case")] // dc = drive command
pub enum DriveCommand {
    // Configuration Variants
    /// Reassign the left and right wheel pins.
    Pins { l: PinId, r: PinId },
    /// Set the left and right wheel speeds (0-100).
    Speeds { l: f32, r: f32 },

    // Motion Variants
    /// Start moving in direction `d` at power `p` until stopped.
    Move { d: Direction, p: f32 },
    /// Move in direction `d` for `ms` milliseconds, then stop. `p` defaults to 100.
    Timed {
        d: Direction,
        ms: u32,
        p: Option<f32>,
    },
    /// Continuous run by raw direction tag; unknown tags stop.
    Run { t: u8 },
    /// Cut both wheel outputs.
    Stop,
}
