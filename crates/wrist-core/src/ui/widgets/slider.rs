use embedded_graphics::prelude::*;

use crate::error::EventResult;
use crate::graphics::Canvas;
use crate::ui::event::{EventContext, NotificationKind, WidgetEvent};
use crate::ui::style::{SLIDER_CURSOR, SLIDER_TRACK, WidgetStyle};

pub const SLIDER_CURSOR_RADIUS: i32 = 10;
const SLIDER_FILL_RADIUS: i32 = 2;

/// Horizontal slider over an integer range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slider {
    min: i32,
    max: i32,
    value: i32,
}

impl Default for Slider {
    fn default() -> Self {
        Self {
            min: 0,
            max: 100,
            value: 0,
        }
    }
}

impl Slider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set range and value. Inverted bounds are swapped and the value is
    /// clamped into the range.
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

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Value selected by a press at local `x`.
    fn value_at(&self, x: i32, width: i32) -> i32 {
        let track = width - 2 * SLIDER_CURSOR_RADIUS;
        if track <= 0 || x < SLIDER_CURSOR_RADIUS {
            return self.min;
        }
        if x > width - SLIDER_CURSOR_RADIUS {
            return self.max;
        }
        let range = self.max as i64 - self.min as i64;
        let value = x as i64 * range / track as i64 + self.min as i64;
        value.clamp(self.min as i64, self.max as i64) as i32
    }

    fn cursor_x(&self, width: i32) -> i32 {
        let range = self.max as i64 - self.min as i64;
        let track = (width - 2 * SLIDER_CURSOR_RADIUS).max(0) as i64;
        if range == 0 {
            return SLIDER_CURSOR_RADIUS;
        }
        let along = (self.value as i64 - self.min as i64) * track / range;
        SLIDER_CURSOR_RADIUS + along as i32
    }

    pub(crate) fn draw(&self, canvas: &mut Canvas<'_>, size: Size, style: &WidgetStyle) {
        let (w, h) = (size.width as i32, size.height as i32);
        let x = self.cursor_x(w);
        let y = h / 2;

        canvas.fill_region(0, 0, w, h, style.background);
        canvas.draw_line(SLIDER_CURSOR_RADIUS, y, w - SLIDER_CURSOR_RADIUS, y, SLIDER_TRACK);

        let fill_start = SLIDER_CURSOR_RADIUS + SLIDER_FILL_RADIUS / 2;
        canvas.draw_disc(fill_start, y, SLIDER_FILL_RADIUS, SLIDER_CURSOR);
        canvas.fill_region(
            fill_start,
            y - SLIDER_FILL_RADIUS,
            x - fill_start,
            SLIDER_FILL_RADIUS * 2 + 1,
            SLIDER_CURSOR,
        );
        canvas.draw_disc(x, y, SLIDER_CURSOR_RADIUS, SLIDER_CURSOR);
    }

    pub(crate) fn handle_event(
        &mut self,
        event: WidgetEvent,
        point: Point,
        ctx: &mut EventContext<'_>,
    ) -> EventResult {
        match event {
            WidgetEvent::Press => {
                let local = ctx.local(point);
                self.value = self.value_at(local.x, ctx.bounds().size.width as i32);
                ctx.notify(NotificationKind::ValueChanged(self.value));
                EventResult::Processed
            }
            // Keeps a drag on the slider from paging the tile
            WidgetEvent::SwipeLeft | WidgetEvent::SwipeRight => EventResult::Processed,
            _ => EventResult::Unprocessed,
        }
    }
}
