use embedded_graphics::prelude::*;

use crate::graphics::Canvas;
use crate::ui::style::{PROGRESS_BAR, WidgetStyle};

/// Horizontal progress bar, display only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    min: i32,
    max: i32,
    value: i32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            min: 0,
            max: 100,
            value: 0,
        }
    }
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set range and value; inverted bounds are swapped, the value clamped.
    pub fn configure(&mut self, min: i32, max: i32, value: i32) {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        self.min = min;
        self.max = max;
        self.set_value(value);
    }

    pub fn set_value(&mut self, value: i32) {
        self.value = value.clamp(self.min, self.max);
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    fn filled_width(&self, inner: i32) -> i32 {
        let range = self.max as i64 - self.min as i64;
        if range == 0 || inner <= 0 {
            return 0;
        }
        ((self.value as i64 - self.min as i64) * inner as i64 / range) as i32
    }

    pub(crate) fn draw(&self, canvas: &mut Canvas<'_>, size: Size, style: &WidgetStyle) {
        let (w, h) = (size.width as i32, size.height as i32);
        canvas.draw_border(w, h, style.border);
        canvas.fill_region(1, 1, w - 2, h - 2, style.background);
        canvas.fill_region(2, 2, self.filled_width(w - 4), h - 4, PROGRESS_BAR);
    }
}
