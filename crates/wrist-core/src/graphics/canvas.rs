//! Origin-shifted drawing view
//!
//! Tiles and widgets draw in their own coordinate space; a [`Canvas`]
//! translates those coordinates to the screen before forwarding to the
//! underlying [`PixelSurface`]. Clipping is whatever drawing window the
//! surface currently has.

use core::convert::Infallible;

use embedded_graphics::Pixel;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::color::Color;
use super::image::Image;
use super::surface::PixelSurface;
use super::text;

pub struct Canvas<'a> {
    surface: &'a mut PixelSurface,
    origin: Point,
}

impl<'a> Canvas<'a> {
    pub fn new(surface: &'a mut PixelSurface, origin: Point) -> Self {
        Self { surface, origin }
    }

    /// Screen position of the local `(0, 0)`.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn surface(&mut self) -> &mut PixelSurface {
        self.surface
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.surface
            .set_pixel(self.origin.x + x, self.origin.y + y, color);
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Color {
        self.surface.get_pixel(self.origin.x + x, self.origin.y + y)
    }

    pub fn fill_region(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        self.surface
            .fill_region(self.origin.x + x, self.origin.y + y, width, height, color);
    }

    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let Point { x: ox, y: oy } = self.origin;
        self.surface.draw_line(ox + x0, oy + y0, ox + x1, oy + y1, color);
    }

    pub fn draw_circle(&mut self, xc: i32, yc: i32, r: i32, color: Color) {
        self.surface
            .draw_circle(self.origin.x + xc, self.origin.y + yc, r, color);
    }

    pub fn draw_disc(&mut self, xc: i32, yc: i32, r: i32, color: Color) {
        self.surface
            .draw_disc(self.origin.x + xc, self.origin.y + yc, r, color);
    }

    /// Rectangle outline with the corner pixels left out, the frame used
    /// by most widgets.
    pub fn draw_border(&mut self, width: i32, height: i32, color: Color) {
        if width < 3 || height < 3 {
            return;
        }
        self.draw_line(1, 0, width - 2, 0, color);
        self.draw_line(1, height - 1, width - 2, height - 1, color);
        self.draw_line(0, 1, 0, height - 2, color);
        self.draw_line(width - 1, 1, width - 1, height - 2, color);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn blit(
        &mut self,
        image: &Image<'_>,
        src_x: i32,
        src_y: i32,
        width: i32,
        height: i32,
        dst_x: i32,
        dst_y: i32,
    ) {
        image.blit(
            self.surface,
            src_x,
            src_y,
            width,
            height,
            self.origin.x + dst_x,
            self.origin.y + dst_y,
        );
    }

    /// Returns the local x coordinate following the text.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color) -> i32 {
        let Ok(end) = text::draw_text(self, Point::new(x, y), text, color);
        end.x
    }

    pub fn draw_text_x2(&mut self, x: i32, y: i32, text: &str, color: Color) -> i32 {
        let Ok(end) = text::draw_text_x2(self, Point::new(x, y), text, color);
        end.x
    }

    pub fn draw_char(&mut self, x: i32, y: i32, c: char, color: Color) -> i32 {
        let Ok(end) = text::draw_char(self, Point::new(x, y), c, color);
        end.x
    }

    pub fn draw_char_x2(&mut self, x: i32, y: i32, c: char, color: Color) -> i32 {
        let Ok(end) = text::draw_char_x2(self, Point::new(x, y), c, color);
        end.x
    }
}

impl Dimensions for Canvas<'_> {
    fn bounding_box(&self) -> Rectangle {
        Rectangle::new(-self.origin, self.surface.size())
    }
}

impl DrawTarget for Canvas<'_> {
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let origin = self.origin;
        self.surface
            .draw_iter(pixels.into_iter().map(|Pixel(p, c)| Pixel(p + origin, c)))
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_region(
            area.top_left.x,
            area.top_left.y,
            area.size.width as i32,
            area.size.height as i32,
            color,
        );
        Ok(())
    }
}
