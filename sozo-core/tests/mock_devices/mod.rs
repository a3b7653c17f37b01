//! Recording wheel outputs and delays shared by the integration tests.
#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use embedded_hal::delay::DelayNs;
use embedded_hal_mock::eh1::i2c::Transaction as I2cTrans;
use sozo_core::utils::controllers::{Level, PinId, WheelIo};

/// Default I2C address for the servo board.
pub const PWM_ADDRESS: u8 = 0x40;

/// Create a write transaction for the given I2C address and data payload.
pub fn write(
    addr: u8,
    data: Vec<u8>,
) -> I2cTrans {
    I2cTrans::write(addr, data)
}

/// One observable effect of the drive controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Pulse(PinId, u16),
    Digital(PinId, Level),
    Pause(u32),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Wheel output that records every write into a shared log.
pub struct RecordingIo {
    pub log: Log,
}

impl WheelIo for RecordingIo {
    type Error = core::convert::Infallible;

    fn set_pulse(
        &mut self,
        pin: PinId,
        pulse_us: u16,
    ) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Pulse(pin, pulse_us));
        Ok(())
    }

    fn set_digital(
        &mut self,
        pin: PinId,
        level: Level,
    ) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Digital(pin, level));
        Ok(())
    }
}

/// Delay that records requested pauses instead of sleeping.
pub struct RecordingDelay {
    pub log: Log,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(
        &mut self,
        _ns: u32,
    ) {
    }

    fn delay_ms(
        &mut self,
        ms: u32,
    ) {
        self.log.borrow_mut().push(Event::Pause(ms));
    }
}

/// Delay that returns immediately.
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(
        &mut self,
        _ns: u32,
    ) {
    }
}

/// Wheel output whose writes always fail.
pub struct FailingIo {
    pub attempts: usize,
}

impl WheelIo for FailingIo {
    type Error = &'static str;

    fn set_pulse(
        &mut self,
        _pin: PinId,
        _pulse_us: u16,
    ) -> Result<(), Self::Error> {
        self.attempts += 1;
        Err("pulse write failed")
    }

    fn set_digital(
        &mut self,
        _pin: PinId,
        _level: Level,
    ) -> Result<(), Self::Error> {
        self.attempts += 1;
        Err("digital write failed")
    }
}
