// src/ui/widgets/button.rs
//! Push button with a centered label

use embedded_graphics::prelude::*;

use super::{WidgetText, widget_text};
use crate::error::EventResult;
use crate::graphics::Canvas;
use crate::graphics::text::{GLYPH_HEIGHT, text_width, text_width_x2};
use crate::ui::event::{EventContext, NotificationKind, WidgetEvent};
use crate::ui::style::{BUTTON_BG_PRESSED, WidgetStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Released,
    Pressed,
}

/// Button state machine.
///
/// Press and Release only change the look; the handler fires on Tap, which
/// the gesture recognizer emits after the Release of a short touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    text: WidgetText,
    state: ButtonState,
}

impl Button {
    pub fn new(text: &str) -> Self {
        Self {
            text: widget_text(text),
            state: ButtonState::Released,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text longer than [`WIDGET_TEXT_CAPACITY`](super::WIDGET_TEXT_CAPACITY)
    /// bytes is cut at a character boundary.
    pub fn set_text(&mut self, text: &str) {
        self.text = widget_text(text);
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub(crate) fn draw(&self, canvas: &mut Canvas<'_>, size: Size, style: &WidgetStyle) {
        let (w, h) = (size.width as i32, size.height as i32);
        let background = match self.state {
            ButtonState::Pressed => BUTTON_BG_PRESSED,
            ButtonState::Released => style.background,
        };
        canvas.fill_region(1, 1, w - 2, h - 2, background);
        canvas.draw_border(w, h, style.border);

        // Fall back to the small font when the large one does not fit
        if text_width_x2(&self.text) <= w - 4 {
            let dx = (w - text_width_x2(&self.text)) / 2;
            let dy = (h - GLYPH_HEIGHT * 2) / 2;
            canvas.draw_text_x2(dx, dy, &self.text, style.front);
        } else {
            let dx = (w - text_width(&self.text)) / 2;
            let dy = (h - GLYPH_HEIGHT) / 2;
            canvas.draw_text(dx, dy, &self.text, style.front);
        }
    }

    pub(crate) fn handle_event(
        &mut self,
        event: WidgetEvent,
        ctx: &mut EventContext<'_>,
    ) -> EventResult {
        match event {
            WidgetEvent::Press => {
                self.state = ButtonState::Pressed;
                EventResult::Processed
            }
            WidgetEvent::Release => {
                self.state = ButtonState::Released;
                EventResult::Processed
            }
            WidgetEvent::Tap => {
                ctx.notify(NotificationKind::Tapped);
                EventResult::Processed
            }
            _ => EventResult::Unprocessed,
        }
    }
}
