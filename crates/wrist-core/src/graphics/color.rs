//! 12-bit color definitions
//!
//! The panel is driven in RGB444 mode, so every color carries three 4-bit
//! channels. A color may additionally carry a 4-bit opacity; such colors are
//! blended with the framebuffer content instead of overwriting it.
//!
//! # Raw format
//! The 16-bit raw encoding mirrors the one used by the panel driver:
//!
//! | bits  | meaning                                         |
//! |-------|-------------------------------------------------|
//! | 0-3   | green                                           |
//! | 4-7   | red                                             |
//! | 8-11  | blue                                            |
//! | 12-15 | transparency `t` (0 = opaque, opacity = 15 - t) |

use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::{PixelColor, Rgb565, RgbColor};

/// Maximum value of a color channel or of the opacity.
pub const CHANNEL_MAX: u8 = 0xf;

/// RGB444 color with optional opacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    opacity: Option<u8>,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xf, 0xf, 0xf);
    pub const LIGHT_GRAY: Color = Color::rgb(0xe, 0xe, 0xe);
    pub const GRAY: Color = Color::rgb(0x8, 0x8, 0x8);
    pub const DARK_GRAY: Color = Color::rgb(0x3, 0x3, 0x3);
    pub const RED: Color = Color::rgb(0xf, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 0xf, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 0xf);
    pub const ACCENT: Color = Color::rgb(0x5, 0x9, 0xf);

    /// Opaque color; channels are truncated to 4 bits.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r & CHANNEL_MAX,
            g: g & CHANNEL_MAX,
            b: b & CHANNEL_MAX,
            opacity: None,
        }
    }

    /// Color blended with the destination, `opacity` in `0..=15`
    /// (values above 15 are clamped).
    pub const fn rgba(r: u8, g: u8, b: u8, opacity: u8) -> Self {
        let opacity = if opacity > CHANNEL_MAX {
            CHANNEL_MAX
        } else {
            opacity
        };
        Self {
            r: r & CHANNEL_MAX,
            g: g & CHANNEL_MAX,
            b: b & CHANNEL_MAX,
            opacity: Some(opacity),
        }
    }

    pub const fn r(self) -> u8 {
        self.r
    }

    pub const fn g(self) -> u8 {
        self.g
    }

    pub const fn b(self) -> u8 {
        self.b
    }

    /// Opacity if this color blends, `None` if it overwrites.
    pub const fn opacity(self) -> Option<u8> {
        self.opacity
    }

    pub const fn has_alpha(self) -> bool {
        self.opacity.is_some()
    }

    /// Same channels without the alpha component.
    pub const fn opaque(self) -> Self {
        Self::rgb(self.r, self.g, self.b)
    }

    /// Decode the 16-bit driver representation.
    pub const fn from_raw(raw: u16) -> Self {
        let g = (raw & 0xf) as u8;
        let r = ((raw >> 4) & 0xf) as u8;
        let b = ((raw >> 8) & 0xf) as u8;
        let t = ((raw >> 12) & 0xf) as u8;
        if t == 0 {
            Self::rgb(r, g, b)
        } else {
            Self::rgba(r, g, b, CHANNEL_MAX - t)
        }
    }

    /// Encode to the 16-bit driver representation.
    pub const fn into_raw(self) -> u16 {
        let t = match self.opacity {
            Some(opacity) => CHANNEL_MAX - opacity,
            None => 0,
        };
        (self.g as u16) | ((self.r as u16) << 4) | ((self.b as u16) << 8) | ((t as u16) << 12)
    }

    /// Resolve this color against the pixel already in the framebuffer.
    ///
    /// Each channel is interpolated as `(old * (15 - a) + new * a) / 15`.
    /// The result is always opaque.
    pub fn blend_over(self, dst: Color) -> Color {
        match self.opacity {
            None => self,
            Some(a) => {
                let mix = |new: u8, old: u8| -> u8 {
                    let a = a as u16;
                    ((old as u16 * (15 - a) + new as u16 * a) / 15) as u8
                };
                Color::rgb(mix(self.r, dst.r), mix(self.g, dst.g), mix(self.b, dst.b))
            }
        }
    }
}

impl PixelColor for Color {
    type Raw = RawU16;
}

impl From<RawU16> for Color {
    fn from(raw: RawU16) -> Self {
        Color::from_raw(raw.into_inner())
    }
}

impl From<Color> for RawU16 {
    fn from(color: Color) -> Self {
        RawU16::new(color.into_raw())
    }
}

/// Widen a 4-bit channel to 5 or 6 bits for RGB565 displays.
const fn widen(channel: u8, max: u8) -> u8 {
    ((channel as u16 * max as u16 + 7) / 15) as u8
}

impl From<Color> for Rgb565 {
    fn from(color: Color) -> Self {
        Rgb565::new(
            widen(color.r, Rgb565::MAX_R),
            widen(color.g, Rgb565::MAX_G),
            widen(color.b, Rgb565::MAX_B),
        )
    }
}

impl From<Rgb565> for Color {
    fn from(color: Rgb565) -> Self {
        let narrow = |c: u8, max: u8| ((c as u16 * 15 + max as u16 / 2) / max as u16) as u8;
        Color::rgb(
            narrow(color.r(), Rgb565::MAX_R),
            narrow(color.g(), Rgb565::MAX_G),
            narrow(color.b(), Rgb565::MAX_B),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_layout_matches_driver() {
        let c = Color::rgb(0x1, 0x2, 0x3);
        assert_eq!(c.into_raw(), 0x0312);
        assert_eq!(Color::from_raw(0x0312), c);
    }

    #[test]
    fn test_raw_transparency_nibble() {
        // Transparency nibble 0xa means opacity 5
        let c = Color::from_raw(0xa0f0);
        assert_eq!(c.opacity(), Some(5));
        assert_eq!(c.r(), 0xf);
        assert_eq!(c.into_raw(), 0xa0f0);
    }

    #[test]
    fn test_blend_zero_opacity_keeps_destination() {
        let dst = Color::rgb(0x3, 0x7, 0xb);
        let src = Color::rgba(0xf, 0x0, 0x0, 0);
        assert_eq!(src.blend_over(dst), dst);
    }

    #[test]
    fn test_blend_full_opacity_replaces_destination() {
        let dst = Color::rgb(0x3, 0x7, 0xb);
        let src = Color::rgba(0xf, 0x1, 0x0, 15);
        assert_eq!(src.blend_over(dst), Color::rgb(0xf, 0x1, 0x0));
    }

    #[test]
    fn test_blend_half() {
        let dst = Color::BLACK;
        let src = Color::rgba(0xf, 0xf, 0xf, 5);
        assert_eq!(src.blend_over(dst), Color::rgb(5, 5, 5));
    }

    #[test]
    fn test_rgb565_extremes() {
        assert_eq!(Rgb565::from(Color::WHITE), Rgb565::WHITE);
        assert_eq!(Rgb565::from(Color::BLACK), Rgb565::BLACK);
        assert_eq!(Color::from(Rgb565::WHITE), Color::WHITE);
    }
}
