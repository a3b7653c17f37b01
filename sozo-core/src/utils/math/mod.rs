//! Math utilities for the sozo robot.
//!
//! This module converts drive commands into servo pulse widths for a two-wheeled
//! robot with opposite-facing continuous-rotation servos.

pub mod pulse;
