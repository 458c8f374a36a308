//! Widget colors

use crate::graphics::Color;

pub const STYLE_BG_DEFAULT: Color = Color::BLACK;
pub const STYLE_BORDER_DEFAULT: Color = Color::WHITE;
pub const STYLE_FRONT_DEFAULT: Color = Color::WHITE;

pub const BUTTON_BG_PRESSED: Color = Color::DARK_GRAY;
pub const BUTTON_TEXT: Color = Color::LIGHT_GRAY;
pub const SLIDER_TRACK: Color = Color::rgb(0xd, 0xd, 0xd);
pub const SLIDER_CURSOR: Color = Color::ACCENT;
pub const PROGRESS_BAR: Color = Color::LIGHT_GRAY;

/// Colors and visibility shared by every widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetStyle {
    pub background: Color,
    pub border: Color,
    pub front: Color,
    pub visible: bool,
}

impl WidgetStyle {
    pub const fn new(background: Color, border: Color, front: Color) -> Self {
        Self {
            background,
            border,
            front,
            visible: true,
        }
    }
}

impl Default for WidgetStyle {
    fn default() -> Self {
        Self::new(STYLE_BG_DEFAULT, STYLE_BORDER_DEFAULT, STYLE_FRONT_DEFAULT)
    }
}
