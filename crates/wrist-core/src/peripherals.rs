//! Hardware collaborators
//!
//! The UI core never touches a bus directly. Everything it needs from the
//! board goes through the small traits below; the firmware implements them
//! over real drivers, the simulator and the tests over fakes.

use core::fmt::Debug;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;
use embedded_hal::i2c::{I2c, Operation};

use crate::input::TouchEvent;

/// Destination for finished frames.
pub trait DisplaySink {
    type Error: Debug;

    /// Transmit one frame in the panel's packed 12-bit format.
    fn commit(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    fn set_backlight(&mut self, level: u16);
}

/// Source of recognized gestures. Returns `None` when nothing is pending;
/// implementations must not block.
pub trait TouchSource {
    fn next_event(&mut self) -> Option<TouchEvent>;
}

impl<M: RawMutex, const N: usize> TouchSource for Receiver<'_, M, TouchEvent, N> {
    fn next_event(&mut self) -> Option<TouchEvent> {
        self.try_receive().ok()
    }
}

/// Side button, edge triggered: reports a press once.
pub trait SideButton {
    fn is_pressed(&mut self) -> bool;
}

pub trait PowerMonitor {
    fn battery_percent(&mut self) -> u8;
    fn is_usb_plugged(&mut self) -> bool;
}

pub trait Haptic {
    fn vibrate(&mut self, duration_ms: u32);
}

pub trait SleepControl {
    /// Put the device into deep sleep. On hardware this does not return;
    /// wake-up goes through reset.
    fn enter_deep_sleep(&mut self);
}

/// Everything [`UiController::process_events`](crate::ui::UiController::process_events)
/// drives in one tick.
pub trait Board: DisplaySink + TouchSource + SideButton + PowerMonitor + SleepControl {}

impl<T> Board for T where T: DisplaySink + TouchSource + SideButton + PowerMonitor + SleepControl {}

// ----------------------------------------------------------------------
// Register access
// ----------------------------------------------------------------------

/// Register-oriented access to devices sharing a bus.
pub trait RegisterBus {
    type Error: Debug;

    fn read(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
    fn write(&mut self, addr: u8, reg: u8, data: &[u8]) -> Result<(), Self::Error>;

    fn read_u8(&mut self, addr: u8, reg: u8) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.read(addr, reg, &mut buf)?;
        Ok(buf[0])
    }

    fn write_u8(&mut self, addr: u8, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.write(addr, reg, &[value])
    }

    /// Read-modify-write of the bits selected by `mask`.
    fn update_bits(&mut self, addr: u8, reg: u8, mask: u8, value: u8) -> Result<(), Self::Error> {
        let current = self.read_u8(addr, reg)?;
        self.write_u8(addr, reg, (current & !mask) | (value & mask))
    }
}

/// [`RegisterBus`] over any blocking `embedded-hal` I2C bus.
pub struct I2cRegisters<I> {
    bus: I,
}

impl<I: I2c> I2cRegisters<I> {
    pub fn new(bus: I) -> Self {
        Self { bus }
    }

    pub fn release(self) -> I {
        self.bus
    }
}

impl<I: I2c> RegisterBus for I2cRegisters<I> {
    type Error = I::Error;

    fn read(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.bus.write_read(addr, &[reg], buf)
    }

    fn write(&mut self, addr: u8, reg: u8, data: &[u8]) -> Result<(), Self::Error> {
        // Adjacent writes go out as a single transfer
        self.bus
            .transaction(addr, &mut [Operation::Write(&[reg]), Operation::Write(data)])
    }
}
