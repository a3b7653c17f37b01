//! PCA9685 servo board backend for the sozo robot.
//!
//! Exposes the board's 16 PWM channels as [`WheelIo`] pins over a shared I2C bus,
//! so the drive controller can be wired to a real servo board.

use core::cell::RefCell;

use embedded_hal::i2c::I2c;
use embedded_hal_bus::i2c::RefCellDevice;
use pwm_pca9685::{Address as PwmAddress, Channel, Error as PwmError, Pca9685};

use super::{Level, PinId, WheelIo};

/// Servo frame period at 50 Hz (µs).
pub const SERVO_PERIOD_US: u32 = 20_000;
/// Prescale for a 50 Hz output from the 25 MHz internal oscillator.
pub const SERVO_PRESCALE: u8 = 121;
/// Highest 12-bit counter value.
const MAX_COUNT: u16 = 4095;

/// Errors that can occur when driving the servo board.
#[derive(Debug)]
pub enum DeviceError<E: core::fmt::Debug> {
    PwmError(PwmError<E>),
    PwmNotInitialized,
    /// The pin id has no matching PWM channel.
    InvalidPin(PinId),
}

/// PCA9685 servo driver sharing an I2C bus.
pub struct ServoBoard<'a, I2C> {
    i2c: &'a RefCell<I2C>,
    pub pwm: Option<Pca9685<RefCellDevice<'a, I2C>>>,
    address: u8,
}

impl<'a, I2C, E> ServoBoard<'a, I2C>
where
    I2C: I2c<Error = E>,
    E: core::fmt::Debug,
{
    pub fn new(
        i2c_bus: &'a RefCell<I2C>,
        address: u8,
    ) -> Self {
        ServoBoard {
            i2c: i2c_bus,
            pwm: None,
            address,
        }
    }

    /// Create the PCA9685 driver on the bus.
    pub fn init(&mut self) -> Result<(), DeviceError<E>> {
        let pwm = Pca9685::new(RefCellDevice::new(self.i2c), PwmAddress::from(self.address))
            .map_err(DeviceError::PwmError)?;
        self.pwm = Some(pwm);
        Ok(())
    }

    /// Enable the outputs and set the prescale for 50 Hz servo frames.
    pub fn configure(&mut self) -> Result<(), DeviceError<E>> {
        let pca = self.pwm.as_mut().ok_or(DeviceError::PwmNotInitialized)?;
        pca.enable().map_err(DeviceError::PwmError)?;
        tracing::info!("PWM enabled");
        pca.set_prescale(SERVO_PRESCALE)
            .map_err(DeviceError::PwmError)?;
        tracing::info!("PWM prescale set to 50Hz");
        Ok(())
    }

    /// Resolve `pin` to its channel and the initialized driver.
    fn channel(
        &mut self,
        pin: PinId,
    ) -> Result<(Channel, &mut Pca9685<RefCellDevice<'a, I2C>>), DeviceError<E>> {
        let channel = channel_for(pin).ok_or(DeviceError::InvalidPin(pin))?;
        match self.pwm.as_mut() {
            Some(pca) => Ok((channel, pca)),
            None => {
                tracing::error!("PWM not initialized");
                Err(DeviceError::PwmNotInitialized)
            }
        }
    }
}

impl<I2C, E> WheelIo for ServoBoard<'_, I2C>
where
    I2C: I2c<Error = E>,
    E: core::fmt::Debug,
{
    type Error = DeviceError<E>;

    fn set_pulse(
        &mut self,
        pin: PinId,
        pulse_us: u16,
    ) -> Result<(), Self::Error> {
        let (channel, pca) = self.channel(pin)?;
        pca.set_channel_on_off(channel, 0, pulse_to_counts(pulse_us))
            .map_err(DeviceError::PwmError)
    }

    fn set_digital(
        &mut self,
        pin: PinId,
        level: Level,
    ) -> Result<(), Self::Error> {
        let (channel, pca) = self.channel(pin)?;
        match level {
            Level::Low => pca.set_channel_full_off(channel),
            Level::High => {
                // full OFF wins over full ON, so clear it first
                pca.set_channel_off(channel, 0)
                    .and_then(|_| pca.set_channel_full_on(channel, 0))
            }
        }
        .map_err(DeviceError::PwmError)
    }
}

/// Convert a pulse width to the 12-bit OFF count within one servo frame.
pub fn pulse_to_counts(pulse_us: u16) -> u16 {
    let counts = pulse_us as u32 * (MAX_COUNT as u32 + 1) / SERVO_PERIOD_US;
    counts.min(MAX_COUNT as u32) as u16
}

fn channel_for(pin: PinId) -> Option<Channel> {
    let channel = match pin {
        0 => Channel::C0,
        1 => Channel::C1,
        2 => Channel::C2,
        3 => Channel::C3,
        4 => Channel::C4,
        5 => Channel::C5,
        6 => Channel::C6,
        7 => Channel::C7,
        8 => Channel::C8,
        9 => Channel::C9,
        10 => Channel::C10,
        11 => Channel::C11,
        12 => Channel::C12,
        13 => Channel::C13,
        14 => Channel::C14,
        15 => Channel::C15,
        _ => return None,
    };
    Some(channel)
}
