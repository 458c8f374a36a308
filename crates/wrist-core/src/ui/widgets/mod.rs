//! Widget variants
//!
//! Each variant only knows how to draw itself in local coordinates and how
//! to react to an event. Routing, clipping and handler plumbing live in the
//! controller.

mod button;
mod container;
mod frame;
mod image;
mod label;
mod listbox;
mod progress;
mod scrollbar;
mod slider;
mod spinner;
mod switch;

pub use button::{Button, ButtonState};
pub use container::Container;
pub use frame::Frame;
pub use image::ImageView;
pub use label::{FontSize, Label};
pub use listbox::{Listbox, ScrollState};
pub use progress::Progress;
pub use scrollbar::{Orientation, Scrollbar};
pub use slider::{SLIDER_CURSOR_RADIUS, Slider};
pub use spinner::Spinner;
pub use switch::{Switch, SwitchState};

pub(crate) use listbox::ListRoute;

/// Capacity of [`WidgetText`] in bytes.
pub const WIDGET_TEXT_CAPACITY: usize = 32;

/// Fixed-capacity text used by buttons and labels.
pub type WidgetText = heapless::String<WIDGET_TEXT_CAPACITY>;

/// Copy `text`, cut at the last whole character that fits.
pub(crate) fn widget_text(text: &str) -> WidgetText {
    let mut out = WidgetText::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            log::warn!(
                "widget text truncated to {} of {} bytes",
                out.len(),
                text.len()
            );
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_text_truncates_on_char_boundary() {
        assert_eq!(widget_text("OK").as_str(), "OK");

        let long = "0123456789abcdefghijklmnopqrstuvwxyz";
        assert_eq!(widget_text(long).as_str(), &long[..WIDGET_TEXT_CAPACITY]);

        // 31 ASCII bytes then a 2-byte char that does not fit
        let mut text = "a".repeat(31);
        text.push('é');
        assert_eq!(widget_text(&text).len(), 31);
    }
}
