use core::cell::RefCell;

use embedded_hal_mock::eh1::i2c::Mock as I2cMock;
use sozo_core::utils::controllers::i2c::{DeviceError, ServoBoard};
use sozo_core::utils::controllers::{DifferentialDrive, Level, WheelIo};

mod mock_devices;
use mock_devices::*;

#[test]
fn test_configure_servo_board() {
    // Enable, then sleep / prescale / wake for 50 Hz frames
    let expectations = [
        write(PWM_ADDRESS, vec![0x00, 0x01]),
        write(PWM_ADDRESS, vec![0x00, 0x11]),
        write(PWM_ADDRESS, vec![0xFE, 121]),
        write(PWM_ADDRESS, vec![0x00, 0x01]),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let mut board = ServoBoard::new(&i2c_bus, PWM_ADDRESS);
    board.init().unwrap();
    board.configure().unwrap();
    drop(board);
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_forward_writes_default_channels() {
    // Auto-increment, then C1 = 1680 us (344 counts), C2 = 1320 us (270 counts)
    let expectations = [
        write(PWM_ADDRESS, vec![0x00, 0x31]),
        write(PWM_ADDRESS, vec![0x0A, 0x00, 0x00, 0x58, 0x01]),
        write(PWM_ADDRESS, vec![0x0E, 0x00, 0x00, 0x0E, 0x01]),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let mut board = ServoBoard::new(&i2c_bus, PWM_ADDRESS);
    board.init().unwrap();

    let mut drive = DifferentialDrive::new(board, NoDelay);
    drive.forward(100.0).unwrap();
    drop(drive);
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_stop_pulls_channels_low() {
    // Full OFF bit (OFF_H bit 4) on C1 and C2, ON/OFF counts untouched
    let expectations = [
        write(PWM_ADDRESS, vec![0x00, 0x31]),
        write(PWM_ADDRESS, vec![0x0C, 0x00, 0x10]),
        write(PWM_ADDRESS, vec![0x10, 0x00, 0x10]),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let mut board = ServoBoard::new(&i2c_bus, PWM_ADDRESS);
    board.init().unwrap();

    let mut drive = DifferentialDrive::new(board, NoDelay);
    drive.stop().unwrap();
    drop(drive);
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_digital_high_after_stop() {
    // Clear full OFF, then set full ON (ON_H bit 4)
    let expectations = [
        write(PWM_ADDRESS, vec![0x00, 0x31]),
        write(PWM_ADDRESS, vec![0x0C, 0x00, 0x10]),
        write(PWM_ADDRESS, vec![0x0C, 0x00, 0x00]),
        write(PWM_ADDRESS, vec![0x0A, 0x00, 0x10]),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let mut board = ServoBoard::new(&i2c_bus, PWM_ADDRESS);
    board.init().unwrap();
    board.set_digital(1, Level::Low).unwrap();
    board.set_digital(1, Level::High).unwrap();
    drop(board);
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_reassigned_pins_use_new_channels() {
    // C6 and C7 after set_wheel_pins(6, 7)
    let expectations = [
        write(PWM_ADDRESS, vec![0x00, 0x31]),
        write(PWM_ADDRESS, vec![0x1E, 0x00, 0x00, 0x58, 0x01]),
        write(PWM_ADDRESS, vec![0x22, 0x00, 0x00, 0x0E, 0x01]),
    ];

    let mock = I2cMock::new(&expectations);
    let i2c_bus = RefCell::new(mock);
    let mut board = ServoBoard::new(&i2c_bus, PWM_ADDRESS);
    board.init().unwrap();

    let mut drive = DifferentialDrive::new(board, NoDelay);
    drive.set_wheel_pins(6, 7);
    drive.continuous_run_tag(0).unwrap();
    drop(drive);
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_invalid_pin_is_rejected_without_bus_traffic() {
    let mock = I2cMock::new(&[]);
    let i2c_bus = RefCell::new(mock);
    let mut board = ServoBoard::new(&i2c_bus, PWM_ADDRESS);
    board.init().unwrap();

    let mut drive = DifferentialDrive::new(board, NoDelay);
    drive.set_wheel_pins(16, 2);
    let result = drive.forward(100.0);
    assert!(matches!(result, Err(DeviceError::InvalidPin(16))));
    drop(drive);
    i2c_bus.borrow_mut().done();
}

#[test]
fn test_uninitialized_board_reports_error() {
    let mock = I2cMock::new(&[]);
    let i2c_bus = RefCell::new(mock);
    let mut board = ServoBoard::new(&i2c_bus, PWM_ADDRESS);

    assert!(matches!(
        board.set_digital(1, Level::Low),
        Err(DeviceError::PwmNotInitialized)
    ));
    assert!(matches!(board.configure(), Err(DeviceError::PwmNotInitialized)));
    drop(board);
    i2c_bus.borrow_mut().done();
}
