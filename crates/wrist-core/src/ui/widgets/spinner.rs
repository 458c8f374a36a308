use embedded_graphics::prelude::*;

use crate::graphics::Canvas;
use crate::ui::style::WidgetStyle;

const DISC_COUNT: i32 = 4;
const DISC_DIAM: i32 = 15;
const DISC_GAP: i32 = 15;
/// Frames spent on each animation step
const STEP_FRAMES: i32 = 10;

/// Four pulsing dots; advances one frame per draw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spinner {
    counter: i32,
    step: i32,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    fn tick(&mut self) {
        self.counter += 1;
        if self.counter >= STEP_FRAMES {
            self.step = (self.step + 1) % DISC_COUNT;
            self.counter = 0;
        }
    }

    fn radius_of(&self, disc: i32) -> i32 {
        let previous = (self.step + DISC_COUNT - 1) % DISC_COUNT;
        if disc == self.step {
            DISC_DIAM / 2 + self.counter / 2
        } else if disc == previous {
            DISC_DIAM / 2 + (STEP_FRAMES - 1 - self.counter) / 2
        } else {
            DISC_DIAM / 2
        }
    }

    pub(crate) fn draw(&mut self, canvas: &mut Canvas<'_>, size: Size, style: &WidgetStyle) {
        self.tick();
        let (w, h) = (size.width as i32, size.height as i32);
        canvas.fill_region(1, 1, w - 2, h - 2, style.background);

        let off_x = (w - DISC_COUNT * DISC_DIAM - (DISC_COUNT - 1) * DISC_GAP) / 2;
        let cy = (h - DISC_DIAM) / 2 + DISC_DIAM / 2;
        for i in 0..DISC_COUNT {
            let cx = off_x + DISC_DIAM / 2 + i * (DISC_DIAM + DISC_GAP);
            canvas.draw_disc(cx, cy, self.radius_of(i), style.front);
        }
    }
}
