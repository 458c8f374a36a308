use embedded_graphics::prelude::*;

use crate::graphics::Canvas;
use crate::ui::style::WidgetStyle;

/// Plain bordered box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame;

impl Frame {
    pub(crate) fn draw(&self, canvas: &mut Canvas<'_>, size: Size, style: &WidgetStyle) {
        let (w, h) = (size.width as i32, size.height as i32);
        canvas.fill_region(1, 1, w - 2, h - 2, style.background);
        canvas.draw_border(w, h, style.border);
    }
}
