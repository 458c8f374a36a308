//! In-memory framebuffer
//!
//! [`PixelSurface`] holds one full frame in 12-bit color together with a
//! rectangular drawing window. Every primitive clips against that window, so
//! narrowing the window before drawing a widget keeps the widget from
//! touching anything outside its own box.
//!
//! Coordinates are logical; the optional X/Y inversion is applied when a
//! pixel is addressed in the backing buffer, which is stored in panel order
//! and can be packed for the wire without reordering.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::Pixel;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::color::Color;
use super::packing::{pack_pixels, packed_len};
use crate::config::UiConfig;
use crate::peripherals::DisplaySink;

/// Inclusive clipping rectangle in screen coordinates.
///
/// A window with `x1 < x0` or `y1 < y0` is empty and rejects every pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawingWindow {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl DrawingWindow {
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    pub const fn is_empty(&self) -> bool {
        self.x1 < self.x0 || self.y1 < self.y0
    }

    /// Overlap of two windows, possibly empty.
    pub fn intersect(&self, other: &DrawingWindow) -> DrawingWindow {
        DrawingWindow {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    pub fn from_rectangle(rect: &Rectangle) -> DrawingWindow {
        DrawingWindow {
            x0: rect.top_left.x,
            y0: rect.top_left.y,
            x1: rect.top_left.x + rect.size.width as i32 - 1,
            y1: rect.top_left.y + rect.size.height as i32 - 1,
        }
    }
}

pub struct PixelSurface {
    width: u32,
    height: u32,
    /// Opaque raw colors, panel order
    pixels: Vec<u16>,
    window: DrawingWindow,
    invert_x: bool,
    invert_y: bool,
    /// Wire buffer reused across commits
    wire: Vec<u8>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let count = (width * height) as usize;
        Self {
            width,
            height,
            pixels: vec![Color::BLACK.into_raw(); count],
            window: Self::full_window(width, height),
            invert_x: false,
            invert_y: false,
            wire: vec![0; packed_len(count)],
        }
    }

    pub fn from_config(config: &UiConfig) -> Self {
        let mut surface = Self::new(config.screen_width, config.screen_height);
        surface.set_orientation(config.invert_x, config.invert_y);
        surface
    }

    const fn full_window(width: u32, height: u32) -> DrawingWindow {
        DrawingWindow {
            x0: 0,
            y0: 0,
            x1: width as i32 - 1,
            y1: height as i32 - 1,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_orientation(&mut self, invert_x: bool, invert_y: bool) {
        self.invert_x = invert_x;
        self.invert_y = invert_y;
    }

    // ------------------------------------------------------------------
    // Drawing window
    // ------------------------------------------------------------------

    pub fn drawing_window(&self) -> DrawingWindow {
        self.window
    }

    /// Set the clipping window. Corners are put in order, then clamped to
    /// the screen; a window lying fully off-screen ends up empty.
    pub fn set_drawing_window(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        self.window = DrawingWindow {
            x0: x0.max(0),
            y0: y0.max(0),
            x1: x1.min(self.width as i32 - 1),
            y1: y1.min(self.height as i32 - 1),
        };
    }

    pub fn reset_drawing_window(&mut self) {
        self.window = Self::full_window(self.width, self.height);
    }

    /// Narrow the window to its overlap with `area` and return the previous
    /// window so the caller can put it back with
    /// [`restore_drawing_window`](Self::restore_drawing_window).
    pub fn clip_to(&mut self, area: &Rectangle) -> DrawingWindow {
        let previous = self.window;
        self.window = previous.intersect(&DrawingWindow::from_rectangle(area));
        previous
    }

    pub fn restore_drawing_window(&mut self, window: DrawingWindow) {
        self.window = window;
    }

    // ------------------------------------------------------------------
    // Pixel access
    // ------------------------------------------------------------------

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let px = if self.invert_x {
            self.width as i32 - 1 - x
        } else {
            x
        };
        let py = if self.invert_y {
            self.height as i32 - 1 - y
        } else {
            y
        };
        Some((py as u32 * self.width + px as u32) as usize)
    }

    /// Write one pixel, blending if `color` has an opacity.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if !self.window.contains(x, y) {
            return;
        }
        if let Some(i) = self.index(x, y) {
            let resolved = color.blend_over(Color::from_raw(self.pixels[i]));
            self.pixels[i] = resolved.into_raw();
        }
    }

    /// Read one pixel; black outside the drawing window.
    pub fn get_pixel(&self, x: i32, y: i32) -> Color {
        if !self.window.contains(x, y) {
            return Color::BLACK;
        }
        self.index(x, y)
            .map(|i| Color::from_raw(self.pixels[i]))
            .unwrap_or(Color::BLACK)
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    /// Fill a rectangle clipped to the drawing window. Nothing happens when
    /// the clipped width or height is zero or negative.
    pub fn fill_region(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let x0 = x.max(self.window.x0);
        let y0 = y.max(self.window.y0);
        let x1 = (x + width - 1).min(self.window.x1);
        let y1 = (y + height - 1).min(self.window.y1);
        if x1 < x0 || y1 < y0 {
            return;
        }

        if color.has_alpha() {
            for py in y0..=y1 {
                for px in x0..=x1 {
                    self.set_pixel(px, py, color);
                }
            }
        } else {
            let raw = color.into_raw();
            for py in y0..=y1 {
                for px in x0..=x1 {
                    if let Some(i) = self.index(px, py) {
                        self.pixels[i] = raw;
                    }
                }
            }
        }
    }

    /// Straight line between two points, endpoints included.
    ///
    /// The endpoints are put in a canonical order first so that a line and
    /// its reverse cover exactly the same pixels.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        if x0 == x1 {
            let (top, bottom) = (y0.min(y1), y0.max(y1));
            self.fill_region(x0, top, 1, bottom - top + 1, color);
            return;
        }
        if y0 == y1 {
            let (left, right) = (x0.min(x1), x0.max(x1));
            self.fill_region(left, y0, right - left + 1, 1, color);
            return;
        }

        let ((mut x, mut y), (xe, ye)) = if (x0, y0) <= (x1, y1) {
            ((x0, y0), (x1, y1))
        } else {
            ((x1, y1), (x0, y0))
        };
        let dx = (xe - x).abs();
        let dy = -(ye - y).abs();
        let sx = if x < xe { 1 } else { -1 };
        let sy = if y < ye { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x, y, color);
            if x == xe && y == ye {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Circle outline. Opacity is ignored.
    pub fn draw_circle(&mut self, xc: i32, yc: i32, r: i32, color: Color) {
        let color = color.opaque();
        let mut x = 0;
        let mut y = r;
        let mut d = r - 1;

        while y >= x {
            for (px, py) in [
                (xc + x, yc + y),
                (xc + y, yc + x),
                (xc - x, yc + y),
                (xc - y, yc + x),
                (xc + x, yc - y),
                (xc + y, yc - x),
                (xc - x, yc - y),
                (xc - y, yc - x),
            ] {
                self.set_pixel(px, py, color);
            }

            if d >= 2 * x {
                d -= 2 * x + 1;
                x += 1;
            } else if d < 2 * (r - y) {
                d += 2 * y - 1;
                y -= 1;
            } else {
                d += 2 * (y - x - 1);
                y -= 1;
                x += 1;
            }
        }
    }

    /// Filled disc: one circle for every radius from 0 to `r`.
    pub fn draw_disc(&mut self, xc: i32, yc: i32, r: i32, color: Color) {
        for radius in 0..=r {
            self.draw_circle(xc, yc, radius, color);
        }
    }

    /// Write a horizontal run of already-resolved colors starting at
    /// `(x, y)`. Leading pixels left of the window are dropped, the run is
    /// truncated at the right edge, and rows outside the window are ignored.
    pub fn copy_line(&mut self, x: i32, y: i32, pixels: &[Color]) {
        if y < self.window.y0 || y > self.window.y1 {
            return;
        }
        let skip = (self.window.x0 - x).max(0) as usize;
        if skip >= pixels.len() {
            return;
        }
        let start = x + skip as i32;
        let room = (self.window.x1 - start + 1).max(0) as usize;
        for (offset, color) in pixels[skip..].iter().take(room).enumerate() {
            if let Some(i) = self.index(start + offset as i32, y) {
                self.pixels[i] = color.opaque().into_raw();
            }
        }
    }

    /// Clear the whole frame to black, ignoring the drawing window.
    pub fn blank(&mut self) {
        self.pixels.fill(Color::BLACK.into_raw());
    }

    /// Pack the frame and hand it to the display.
    pub fn commit<S: DisplaySink + ?Sized>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        // Two rows per chunk: an even pixel count keeps pairs continuous
        // across row boundaries when the width is odd
        let chunk = (self.width as usize * 2).max(2);
        let mut scratch = vec![Color::BLACK; chunk];
        let mut written = 0;
        for block in self.pixels.chunks(chunk) {
            for (dst, &raw) in scratch.iter_mut().zip(block) {
                *dst = Color::from_raw(raw);
            }
            written += pack_pixels(&scratch[..block.len()], &mut self.wire[written..]);
        }
        sink.commit(&self.wire[..written])
    }
}

impl OriginDimensions for PixelSurface {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for PixelSurface {
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_region(
            area.top_left.x,
            area.top_left.y,
            area.size.width as i32,
            area.size.height as i32,
            color,
        );
        Ok(())
    }
}
