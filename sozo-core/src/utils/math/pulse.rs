//! Servo pulse-width computation for a two-wheeled servo robot.
//!
//! Each wheel is a continuous-rotation servo: 1500 µs holds it still, shorter
//! or longer pulses spin it one way or the other. The two servos face opposite
//! directions, so driving straight needs opposite deviations on each wheel while
//! turning in place needs the same deviation on both.
//!
//! # Example
//! ```rust
//! use sozo_core::utils::math::pulse::{wheel_pulses, Direction};
//! let pulses = wheel_pulses((20.0, 20.0), Direction::Forward, 100.0);
//! assert_eq!((pulses.left, pulses.right), (1680, 1320));
//! ```
use serde::{Deserialize, Serialize};

/// Pulse width that holds a continuous-rotation servo still (µs).
pub const NEUTRAL_PULSE_US: u16 = 1500;
/// Full reverse (µs).
pub const MIN_PULSE_US: u16 = 600;
/// Full forward (µs).
pub const MAX_PULSE_US: u16 = 2400;
/// Maps a speed of 100 at power 100 onto the full ±900 µs swing.
pub const PULSE_GAIN: f32 = 9.0;
/// Power coefficient used by the plain and continuous-run primitives.
pub const FULL_POWER: f32 = 100.0;

/// Drive direction understood by the continuous-run dispatcher.
///
/// The numeric tags match the values sent by a block-based caller.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
    TurnRight,
    TurnLeft,
}

impl Direction {
    /// Numeric tag of this direction (0 forward, 1 backward, 2 turn right, 3 turn left).
    pub const fn tag(self) -> u8 {
        match self {
            Direction::Forward => 0,
            Direction::Backward => 1,
            Direction::TurnRight => 2,
            Direction::TurnLeft => 3,
        }
    }

    /// Per-wheel deviation signs `(left, right)`.
    pub const fn signs(self) -> (f32, f32) {
        match self {
            Direction::Forward => (1.0, -1.0),
            Direction::Backward => (-1.0, 1.0),
            Direction::TurnLeft => (-1.0, -1.0),
            Direction::TurnRight => (1.0, 1.0),
        }
    }
}

impl TryFrom<u8> for Direction {
    /// The unrecognized tag.
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Direction::Forward),
            1 => Ok(Direction::Backward),
            2 => Ok(Direction::TurnRight),
            3 => Ok(Direction::TurnLeft),
            other => Err(other),
        }
    }
}

/// Pulse widths for one drive step, in µs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelPulses {
    pub left: u16,
    pub right: u16,
}

/// Unclamped pulse width: `1500 + sign * 9 * speed * (power / 100)`.
pub fn raw_pulse(
    speed: f32,
    sign: f32,
    power: f32,
) -> f32 {
    NEUTRAL_PULSE_US as f32 + sign * PULSE_GAIN * speed * (power / 100.0)
}

/// Pulse width clamped to the servo range and truncated to whole microseconds.
///
/// NaN inputs yield the neutral pulse.
pub fn pulse_width(
    speed: f32,
    sign: f32,
    power: f32,
) -> u16 {
    let raw = raw_pulse(speed, sign, power);
    if raw.is_nan() {
        return NEUTRAL_PULSE_US;
    }
    raw.clamp(MIN_PULSE_US as f32, MAX_PULSE_US as f32) as u16
}

/// Compute both wheel pulses for `direction` from the `(left, right)` wheel speeds.
pub fn wheel_pulses(
    speeds: (f32, f32),
    direction: Direction,
    power: f32,
) -> WheelPulses {
    let (sl, sr) = direction.signs();
    WheelPulses {
        left: pulse_width(speeds.0, sl, power),
        right: pulse_width(speeds.1, sr, power),
    }
}
