use embedded_graphics::prelude::*;

use super::{WidgetText, widget_text};
use crate::error::EventResult;
use crate::graphics::Canvas;
use crate::ui::event::WidgetEvent;
use crate::ui::style::WidgetStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontSize {
    /// Double-size glyphs
    #[default]
    Normal,
    Small,
}

/// Static text. Inside a listbox it highlights itself while selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    text: WidgetText,
    font_size: FontSize,
    selected: bool,
}

impl Label {
    pub fn new(text: &str) -> Self {
        Self {
            text: widget_text(text),
            font_size: FontSize::default(),
            selected: false,
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

    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    pub fn set_font_size(&mut self, font_size: FontSize) {
        self.font_size = font_size;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn draw(&self, canvas: &mut Canvas<'_>, size: Size, style: &WidgetStyle) {
        let (w, h) = (size.width as i32, size.height as i32);
        let (background, text) = if self.selected {
            (style.front, style.background)
        } else {
            (style.background, style.front)
        };
        canvas.fill_region(1, 1, w - 2, h - 2, background);
        match self.font_size {
            FontSize::Normal => canvas.draw_text_x2(3, 3, &self.text, text),
            FontSize::Small => canvas.draw_text(3, 3, &self.text, text),
        };
    }

    pub(crate) fn handle_event(&mut self, event: WidgetEvent) -> EventResult {
        match event {
            WidgetEvent::Select => {
                self.selected = true;
                EventResult::Processed
            }
            WidgetEvent::Deselect => {
                self.selected = false;
                EventResult::Processed
            }
            _ => EventResult::Unprocessed,
        }
    }
}
