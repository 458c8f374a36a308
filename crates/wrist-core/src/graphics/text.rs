//! Bitmap text
//!
//! All UI text uses the 8x13 ASCII font. The large variant doubles every
//! glyph pixel into a 2x2 block rather than shipping a second font.

use embedded_graphics::Pixel;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_8X13;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};

use super::color::Color;

pub const GLYPH_WIDTH: i32 = 8;
pub const GLYPH_HEIGHT: i32 = 13;

/// Width in pixels of `text` at normal size.
pub fn text_width(text: &str) -> i32 {
    text.chars().count() as i32 * GLYPH_WIDTH
}

/// Width in pixels of `text` at double size.
pub fn text_width_x2(text: &str) -> i32 {
    text_width(text) * 2
}

/// Draw `text` with its top-left corner at `position`; returns the position
/// following the last glyph.
pub fn draw_text<D>(
    target: &mut D,
    position: Point,
    text: &str,
    color: Color,
) -> Result<Point, D::Error>
where
    D: DrawTarget<Color = Color>,
{
    let style = MonoTextStyle::new(&FONT_8X13, color);
    Text::with_baseline(text, position, style, Baseline::Top).draw(target)
}

/// Double-size variant of [`draw_text`].
pub fn draw_text_x2<D>(
    target: &mut D,
    position: Point,
    text: &str,
    color: Color,
) -> Result<Point, D::Error>
where
    D: DrawTarget<Color = Color>,
{
    let mut doubled = Doubled {
        target,
        origin: position,
    };
    let end = draw_text(&mut doubled, position, text, color)?;
    Ok(position + (end - position) * 2)
}

pub fn draw_char<D>(
    target: &mut D,
    position: Point,
    c: char,
    color: Color,
) -> Result<Point, D::Error>
where
    D: DrawTarget<Color = Color>,
{
    let mut buf = [0u8; 4];
    draw_text(target, position, c.encode_utf8(&mut buf), color)
}

pub fn draw_char_x2<D>(
    target: &mut D,
    position: Point,
    c: char,
    color: Color,
) -> Result<Point, D::Error>
where
    D: DrawTarget<Color = Color>,
{
    let mut buf = [0u8; 4];
    draw_text_x2(target, position, c.encode_utf8(&mut buf), color)
}

/// Scales everything drawn through it by two around `origin`.
struct Doubled<'a, D> {
    target: &'a mut D,
    origin: Point,
}

impl<D: DrawTarget<Color = Color>> Dimensions for Doubled<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        self.target.bounding_box()
    }
}

impl<D: DrawTarget<Color = Color>> DrawTarget for Doubled<'_, D> {
    type Color = Color;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let scaled = self.origin + (point - self.origin) * 2;
            self.target
                .fill_solid(&Rectangle::new(scaled, Size::new(2, 2)), color)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::PixelSurface;

    fn bounds_of(surface: &PixelSurface, color: Color) -> Option<(i32, i32, i32, i32)> {
        let mut bounds: Option<(i32, i32, i32, i32)> = None;
        for y in 0..240 {
            for x in 0..240 {
                if surface.get_pixel(x, y) == color {
                    bounds = Some(match bounds {
                        None => (x, y, x, y),
                        Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                    });
                }
            }
        }
        bounds
    }

    #[test]
    fn test_widths() {
        assert_eq!(text_width("OK"), 16);
        assert_eq!(text_width_x2("OK"), 32);
        assert_eq!(text_width(""), 0);
    }

    #[test]
    fn test_text_stays_in_glyph_cells() {
        let mut surface = PixelSurface::new(240, 240);
        let end = draw_text(&mut surface, Point::new(10, 20), "Hi", Color::WHITE).unwrap();
        assert_eq!(end.x, 26);
        let (x0, y0, x1, y1) = bounds_of(&surface, Color::WHITE).unwrap();
        assert!(x0 >= 10 && x1 < 26);
        assert!(y0 >= 20 && y1 < 20 + GLYPH_HEIGHT);
    }

    #[test]
    fn test_double_size_text() {
        let mut surface = PixelSurface::new(240, 240);
        let end = draw_text_x2(&mut surface, Point::new(10, 20), "Hi", Color::WHITE).unwrap();
        assert_eq!(end.x, 42);
        let (x0, y0, x1, y1) = bounds_of(&surface, Color::WHITE).unwrap();
        assert!(x0 >= 10 && x1 < 42);
        assert!(y0 >= 20 && y1 < 20 + GLYPH_HEIGHT * 2);
        // Every lit pixel belongs to a 2x2 block aligned on the origin
        for y in (20..46).step_by(2) {
            for x in (10..42).step_by(2) {
                let c = surface.get_pixel(x, y);
                assert_eq!(surface.get_pixel(x + 1, y + 1), c);
            }
        }
    }

    #[test]
    fn test_draw_char() {
        let mut surface = PixelSurface::new(240, 240);
        draw_char(&mut surface, Point::zero(), 'X', Color::GREEN).unwrap();
        assert!(bounds_of(&surface, Color::GREEN).is_some());
    }
}
