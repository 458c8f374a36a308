//! Hardware-independent core library for wrist-rs
//!
//! This crate contains the platform-agnostic part of the watch firmware: the
//! 12-bit framebuffer and its drawing primitives, the image blitter and
//! bitmap text renderer, the widget toolkit, tiles and the UI controller
//! that drives page navigation, modal overlays and eco mode.
//!
//! Peripherals (display panel, touch controller, PMU, vibration motor) are
//! reached only through the traits in [`peripherals`], so the same code runs
//! on the ESP32 and on desktop hosts (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod config;
pub mod error;
pub mod graphics;
pub mod input;
pub mod peripherals;
pub mod ui;

pub use config::UiConfig;
pub use error::{UiError, UiResult};
