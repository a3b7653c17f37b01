//! Utility re-exports for the sozo robot.
//!
//! - `controllers`: the differential drive controller, the wheel output sink
//!   and the PCA9685 servo board backend
//! - `math`: servo pulse-width computation for each drive direction

pub mod controllers;
pub mod math;

pub use controllers::{DifferentialDrive, DriveCommand, DriveConfig, Level, WheelIo};
pub use math::pulse::Direction;
