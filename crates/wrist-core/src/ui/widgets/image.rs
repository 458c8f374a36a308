use embedded_graphics::prelude::*;

use crate::graphics::{Canvas, Image};

/// Shows an image anchored at the widget origin, cropped to the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    image: Image<'static>,
}

impl ImageView {
    pub fn new(image: Image<'static>) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &Image<'static> {
        &self.image
    }

    pub fn set_image(&mut self, image: Image<'static>) {
        self.image = image;
    }

    pub(crate) fn draw(&self, canvas: &mut Canvas<'_>, size: Size) {
        canvas.blit(
            &self.image,
            0,
            0,
            size.width as i32,
            size.height as i32,
            0,
            0,
        );
    }
}
