use embedded_graphics::prelude::*;

use crate::graphics::Canvas;
use crate::ui::style::WidgetStyle;

/// Smallest thumb drawn, in pixels.
pub const MIN_THUMB: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Read-only scroll position indicator.
///
/// `min..=max` is the scrollable range and `viewport` the visible extent in
/// the same unit; the thumb covers `viewport / (viewport + range)` of the
/// track. A zero viewport stands for "as long as the track".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scrollbar {
    orientation: Orientation,
    min: i32,
    max: i32,
    value: i32,
    viewport: i32,
}

impl Scrollbar {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            ..Self::default()
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

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

    pub fn set_viewport(&mut self, viewport: i32) {
        self.viewport = viewport.max(0);
    }

    /// Thumb `(offset, length)` along a track of `track` pixels.
    pub fn thumb(&self, track: i32) -> (i32, i32) {
        let range = self.max as i64 - self.min as i64;
        if range <= 0 || track <= 0 {
            return (0, track.max(0));
        }
        let viewport = if self.viewport > 0 {
            self.viewport
        } else {
            track
        } as i64;
        let length = (track as i64 * viewport / (viewport + range)) as i32;
        let length = length.clamp(MIN_THUMB.min(track), track);
        let offset = (self.value as i64 - self.min as i64) * (track - length) as i64 / range;
        (offset as i32, length)
    }

    pub(crate) fn draw(&self, canvas: &mut Canvas<'_>, size: Size, style: &WidgetStyle) {
        let (w, h) = (size.width as i32, size.height as i32);
        canvas.fill_region(1, 1, w - 2, h - 2, style.background);
        canvas.draw_border(w, h, style.border);
        match self.orientation {
            Orientation::Vertical => {
                let (offset, length) = self.thumb(h - 2);
                canvas.fill_region(1, 1 + offset, w - 2, length, style.front);
            }
            Orientation::Horizontal => {
                let (offset, length) = self.thumb(w - 2);
                canvas.fill_region(1 + offset, 1, length, h - 2, style.front);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumb_proportional() {
        let mut bar = Scrollbar::new(Orientation::Vertical);
        bar.set_viewport(100);
        bar.configure(0, 300, 0);
        assert_eq!(bar.thumb(100), (0, 25));
        bar.set_value(300);
        assert_eq!(bar.thumb(100), (75, 25));
        bar.set_value(150);
        assert_eq!(bar.thumb(100).0, 37);
    }

    #[test]
    fn test_thumb_floor() {
        let mut bar = Scrollbar::new(Orientation::Vertical);
        bar.set_viewport(10);
        bar.configure(0, 10_000, 10_000);
        assert_eq!(bar.thumb(200), (190, MIN_THUMB));
    }

    #[test]
    fn test_thumb_full_i32_range() {
        let mut bar = Scrollbar::new(Orientation::Vertical);
        bar.configure(i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(bar.thumb(200), (190, MIN_THUMB));
        bar.set_value(i32::MIN);
        assert_eq!(bar.thumb(200), (0, MIN_THUMB));
    }

    #[test]
    fn test_thumb_fills_track_without_range() {
        let bar = Scrollbar::new(Orientation::Horizontal);
        assert_eq!(bar.thumb(80), (0, 80));
    }
}
