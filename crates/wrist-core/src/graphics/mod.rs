//! Framebuffer and drawing primitives
//!
//! - [`color`]: the 12-bit RGB444 color (plus optional opacity) used
//!   everywhere in the UI
//! - [`surface`]: the [`PixelSurface`] framebuffer with its clipping window
//! - [`canvas`]: origin-shifted drawing view handed to tiles and widgets
//! - [`packing`]: conversion to the panel's 12-bit wire format
//! - [`image`]: minimal bitmap format and blitter
//! - [`text`]: bitmap-font text at 1x and 2x scale

pub mod canvas;
pub mod color;
pub mod image;
pub mod packing;
pub mod surface;
pub mod text;

pub use canvas::Canvas;
pub use color::Color;
pub use image::{Image, ImageDepth, ImageEncoding};
pub use surface::{DrawingWindow, PixelSurface};
