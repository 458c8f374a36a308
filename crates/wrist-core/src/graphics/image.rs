//! Minimal bitmap format
//!
//! Serialized images start with a 6-byte little-endian header followed by
//! the pixel payload:
//!
//! | offset | size | field                                 |
//! |--------|------|---------------------------------------|
//! | 0      | 2    | width                                 |
//! | 2      | 2    | height                                |
//! | 4      | 1    | depth (0 = monochrome, 1 = RGB444)    |
//! | 5      | 1    | encoding (0 = raw, 1 = run-length)    |
//!
//! Monochrome payloads hold one bit per pixel, row-major, least significant
//! bit first. RGB444 payloads hold one little-endian `u16` per pixel using
//! the low 12 bits of the [`Color`] raw layout.

use alloc::vec::Vec;

use super::color::Color;
use super::surface::PixelSurface;
use crate::error::{UiError, UiResult};

pub const HEADER_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageDepth {
    Mono,
    Rgb444,
    Unknown(u8),
}

impl From<u8> for ImageDepth {
    fn from(value: u8) -> Self {
        match value {
            0 => ImageDepth::Mono,
            1 => ImageDepth::Rgb444,
            other => ImageDepth::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    Raw,
    /// Recognized but not decoded; blitting is a no-op.
    Rle,
    Unknown(u8),
}

impl From<u8> for ImageEncoding {
    fn from(value: u8) -> Self {
        match value {
            0 => ImageEncoding::Raw,
            1 => ImageEncoding::Rle,
            other => ImageEncoding::Unknown(other),
        }
    }
}

/// Borrowed view over image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image<'a> {
    width: u16,
    height: u16,
    depth: ImageDepth,
    encoding: ImageEncoding,
    data: &'a [u8],
}

impl<'a> Image<'a> {
    /// Parse a serialized image (header plus payload).
    pub fn from_bytes(bytes: &'a [u8]) -> UiResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(UiError::InvalidArgument("image header truncated"));
        }
        Ok(Self {
            width: u16::from_le_bytes([bytes[0], bytes[1]]),
            height: u16::from_le_bytes([bytes[2], bytes[3]]),
            depth: ImageDepth::from(bytes[4]),
            encoding: ImageEncoding::from(bytes[5]),
            data: &bytes[HEADER_LEN..],
        })
    }

    /// Raw monochrome image over a bare payload.
    pub const fn mono(width: u16, height: u16, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            depth: ImageDepth::Mono,
            encoding: ImageEncoding::Raw,
            data,
        }
    }

    /// Raw RGB444 image over a bare payload.
    pub const fn rgb444(width: u16, height: u16, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            depth: ImageDepth::Rgb444,
            encoding: ImageEncoding::Raw,
            data,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn depth(&self) -> ImageDepth {
        self.depth
    }

    pub fn encoding(&self) -> ImageEncoding {
        self.encoding
    }

    /// Pixel at `(x, y)`. `None` for transparent monochrome pixels and for
    /// anything this decoder does not understand or that lies outside the
    /// payload.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if self.encoding != ImageEncoding::Raw
            || x < 0
            || y < 0
            || x >= self.width as i32
            || y >= self.height as i32
        {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        match self.depth {
            ImageDepth::Mono => {
                let byte = *self.data.get(index / 8)?;
                (byte & (1 << (index % 8)) != 0).then_some(Color::WHITE)
            }
            ImageDepth::Rgb444 => {
                let lo = *self.data.get(index * 2)?;
                let hi = *self.data.get(index * 2 + 1)?;
                Some(Color::from_raw(u16::from_le_bytes([lo, hi]) & 0x0fff))
            }
            ImageDepth::Unknown(_) => None,
        }
    }

    /// Copy the `width` x `height` block at `(src_x, src_y)` onto the
    /// surface at `(dst_x, dst_y)`.
    ///
    /// The source block is first clamped to the image, then clipped by the
    /// surface's drawing window. Unsupported depths or encodings draw
    /// nothing.
    #[allow(clippy::too_many_arguments)]
    pub fn blit(
        &self,
        surface: &mut PixelSurface,
        src_x: i32,
        src_y: i32,
        width: i32,
        height: i32,
        dst_x: i32,
        dst_y: i32,
    ) {
        if self.encoding != ImageEncoding::Raw {
            log::debug!("image encoding {:?} not supported", self.encoding);
            return;
        }

        let (mut src_x, mut src_y, mut width, mut height) = (src_x, src_y, width, height);
        let (mut dst_x, mut dst_y) = (dst_x, dst_y);
        if src_x < 0 {
            width += src_x;
            dst_x -= src_x;
            src_x = 0;
        }
        if src_y < 0 {
            height += src_y;
            dst_y -= src_y;
            src_y = 0;
        }
        width = width.min(self.width as i32 - src_x);
        height = height.min(self.height as i32 - src_y);
        if width <= 0 || height <= 0 {
            return;
        }

        match self.depth {
            ImageDepth::Mono => {
                for y in 0..height {
                    for x in 0..width {
                        if let Some(color) = self.pixel(src_x + x, src_y + y) {
                            surface.set_pixel(dst_x + x, dst_y + y, color);
                        }
                    }
                }
            }
            ImageDepth::Rgb444 => {
                if dst_y < 0 {
                    src_y -= dst_y;
                    height += dst_y;
                    dst_y = 0;
                }
                height = height.min(surface.height() as i32 - dst_y);

                let mut row = Vec::with_capacity(width as usize);
                for y in 0..height.max(0) {
                    row.clear();
                    row.extend((0..width).map(|x| {
                        self.pixel(src_x + x, src_y + y)
                            .unwrap_or(Color::BLACK)
                    }));
                    surface.copy_line(dst_x, dst_y + y, &row);
                }
            }
            ImageDepth::Unknown(depth) => {
                log::debug!("image depth {} not supported", depth);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 4x2 checker, least significant bit first
    const CHECKER: [u8; 1] = [0b1010_0101];

    fn rgb_payload(colors: &[Color]) -> Vec<u8> {
        colors
            .iter()
            .flat_map(|c| c.into_raw().to_le_bytes())
            .collect()
    }

    #[test]
    fn test_parse_header() {
        let bytes = [3, 0, 2, 0, 1, 0, 0xff, 0xff];
        let image = Image::from_bytes(&bytes).unwrap();
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        assert_eq!(image.depth(), ImageDepth::Rgb444);
        assert_eq!(image.encoding(), ImageEncoding::Raw);
    }

    #[test]
    fn test_serialized_mono_image_blits() {
        // 1x1, depth 0, raw, one set bit
        let bytes = [1, 0, 1, 0, 0, 0, 0x01];
        let image = Image::from_bytes(&bytes).unwrap();
        assert_eq!(image.depth(), ImageDepth::Mono);
        let mut surface = PixelSurface::new(240, 240);
        image.blit(&mut surface, 0, 0, 1, 1, 5, 5);
        assert_eq!(surface.get_pixel(5, 5), Color::WHITE);
    }

    #[test]
    fn test_serialized_rgb_image_blits() {
        let raw = Color::rgb(0x1, 0x2, 0x3).into_raw().to_le_bytes();
        let bytes = [1, 0, 1, 0, 1, 0, raw[0], raw[1]];
        let image = Image::from_bytes(&bytes).unwrap();
        assert_eq!(image.depth(), ImageDepth::Rgb444);
        let mut surface = PixelSurface::new(240, 240);
        image.blit(&mut surface, 0, 0, 1, 1, 0, 0);
        assert_eq!(surface.get_pixel(0, 0), Color::rgb(0x1, 0x2, 0x3));
    }

    #[test]
    fn test_unknown_depth_draws_nothing() {
        let bytes = [1, 0, 1, 0, 12, 0, 0xff, 0xff];
        let image = Image::from_bytes(&bytes).unwrap();
        assert_eq!(image.depth(), ImageDepth::Unknown(12));
        let mut surface = PixelSurface::new(240, 240);
        image.blit(&mut surface, 0, 0, 1, 1, 0, 0);
        assert_eq!(surface.get_pixel(0, 0), Color::BLACK);
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            Image::from_bytes(&[1, 0, 1]),
            Err(UiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_mono_pixels() {
        let image = Image::mono(4, 2, &CHECKER);
        assert_eq!(image.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(image.pixel(1, 0), None);
        assert_eq!(image.pixel(1, 1), Some(Color::WHITE));
        assert_eq!(image.pixel(4, 0), None);
    }

    #[test]
    fn test_mono_blit_leaves_clear_bits() {
        let mut surface = PixelSurface::new(240, 240);
        surface.fill_region(0, 0, 10, 10, Color::RED);
        Image::mono(4, 2, &CHECKER).blit(&mut surface, 0, 0, 4, 2, 2, 2);
        assert_eq!(surface.get_pixel(2, 2), Color::WHITE);
        assert_eq!(surface.get_pixel(3, 2), Color::RED);
    }

    #[test]
    fn test_rgb_blit_with_negative_destination() {
        let payload = rgb_payload(&[Color::RED, Color::GREEN, Color::BLUE, Color::WHITE]);
        let image = Image::rgb444(2, 2, &payload);
        let mut surface = PixelSurface::new(240, 240);
        image.blit(&mut surface, 0, 0, 2, 2, -1, -1);
        assert_eq!(surface.get_pixel(0, 0), Color::WHITE);
        assert_eq!(surface.get_pixel(1, 0), Color::BLACK);
        assert_eq!(surface.get_pixel(0, 1), Color::BLACK);
    }

    #[test]
    fn test_rgb_blit_subregion() {
        let payload = rgb_payload(&[Color::RED, Color::GREEN, Color::BLUE, Color::WHITE]);
        let image = Image::rgb444(2, 2, &payload);
        let mut surface = PixelSurface::new(240, 240);
        image.blit(&mut surface, 1, 0, 5, 5, 100, 100);
        assert_eq!(surface.get_pixel(100, 100), Color::GREEN);
        assert_eq!(surface.get_pixel(100, 101), Color::WHITE);
        assert_eq!(surface.get_pixel(101, 100), Color::BLACK);
    }

    #[test]
    fn test_rle_is_noop() {
        let bytes = [1, 0, 1, 0, 1, 1, 0xff, 0x0f];
        let image = Image::from_bytes(&bytes).unwrap();
        let mut surface = PixelSurface::new(240, 240);
        image.blit(&mut surface, 0, 0, 1, 1, 0, 0);
        assert_eq!(surface.get_pixel(0, 0), Color::BLACK);
    }
}
