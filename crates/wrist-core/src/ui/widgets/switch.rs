use embedded_graphics::prelude::*;

use crate::error::EventResult;
use crate::graphics::Canvas;
use crate::graphics::text::{GLYPH_HEIGHT, text_width};
use crate::ui::event::{EventContext, NotificationKind, WidgetEvent};
use crate::ui::style::WidgetStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchState {
    On,
    #[default]
    Off,
}

impl SwitchState {
    pub fn toggled(self) -> Self {
        match self {
            SwitchState::On => SwitchState::Off,
            SwitchState::Off => SwitchState::On,
        }
    }
}

/// Two-position ON/OFF toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Switch {
    state: SwitchState,
}

impl Switch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SwitchState {
        self.state
    }

    /// Set without firing the handler.
    pub fn set_state(&mut self, state: SwitchState) {
        self.state = state;
    }

    pub(crate) fn draw(&self, canvas: &mut Canvas<'_>, size: Size, style: &WidgetStyle) {
        let (w, h) = (size.width as i32, size.height as i32);
        let on = self.state == SwitchState::On;
        let accent = if on { style.front } else { style.border };

        canvas.fill_region(1, 1, w - 2, h - 2, style.background);
        canvas.draw_border(w, h, accent);

        let dy = (h - GLYPH_HEIGHT) / 2;
        let half = w / 2;
        canvas.draw_text((half - text_width("ON")) / 2, dy, "ON", style.border);
        canvas.draw_text((half - text_width("OFF")) / 2 + half, dy, "OFF", style.border);

        // The knob covers the label of the inactive position
        let knob_x = if on { half } else { 0 };
        canvas.fill_region(knob_x, 1, half, h - 2, accent);
    }

    pub(crate) fn handle_event(
        &mut self,
        event: WidgetEvent,
        ctx: &mut EventContext<'_>,
    ) -> EventResult {
        match event {
            WidgetEvent::Tap => {
                self.state = self.state.toggled();
                ctx.notify(NotificationKind::Switched(self.state));
                EventResult::Processed
            }
            _ => EventResult::Unprocessed,
        }
    }
}
