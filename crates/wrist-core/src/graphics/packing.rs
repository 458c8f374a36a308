//! Panel wire format
//!
//! The panel takes 12 bits per pixel: two pixels are packed into three
//! bytes, high nibble first.
//!
//! ```text
//! byte 0: R0 G0
//! byte 1: B0 R1
//! byte 2: G1 B1
//! ```
//!
//! A trailing odd pixel occupies two bytes (`R G`, `B 0`).

use super::color::Color;

/// Bytes needed to carry `pixels` pixels on the wire.
pub const fn packed_len(pixels: usize) -> usize {
    (pixels * 3).div_ceil(2)
}

/// Pack `pixels` into `out`, returning the number of bytes written.
///
/// Stops early if `out` is too short to hold the next pixel.
pub fn pack_pixels(pixels: &[Color], out: &mut [u8]) -> usize {
    let mut written = 0;
    for pair in pixels.chunks(2) {
        let a = pair[0];
        match pair.get(1) {
            Some(&b) => {
                if written + 3 > out.len() {
                    break;
                }
                out[written] = (a.r() << 4) | a.g();
                out[written + 1] = (a.b() << 4) | b.r();
                out[written + 2] = (b.g() << 4) | b.b();
                written += 3;
            }
            None => {
                if written + 2 > out.len() {
                    break;
                }
                out[written] = (a.r() << 4) | a.g();
                out[written + 1] = a.b() << 4;
                written += 2;
            }
        }
    }
    written
}

/// Inverse of [`pack_pixels`]; returns the number of pixels decoded.
pub fn unpack_pixels(bytes: &[u8], out: &mut [Color]) -> usize {
    let mut decoded = 0;
    for chunk in bytes.chunks(3) {
        if decoded >= out.len() || chunk.len() < 2 {
            break;
        }
        out[decoded] = Color::rgb(chunk[0] >> 4, chunk[0] & 0xf, chunk[1] >> 4);
        decoded += 1;

        if chunk.len() == 3 && decoded < out.len() {
            out[decoded] = Color::rgb(chunk[1] & 0xf, chunk[2] >> 4, chunk[2] & 0xf);
            decoded += 1;
        }
    }
    decoded
}
