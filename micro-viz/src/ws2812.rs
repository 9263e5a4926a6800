//! WS2812 wire encoding for an SPI data line.
//!
//! Every data bit becomes four SPI bits, so one SPI byte carries two LED
//! bits. At 3.2 MHz a data bit takes 1.25 µs. Colors go out in GRB order
//! followed by a run of zero bytes that latches the strip.

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};

use crate::error::VizError;

pub const WS2812_SPI_HZ: u32 = 3_200_000;
pub const BYTES_PER_PIXEL: usize = 12;
pub const RESET_BYTES: usize = 140;

const PATTERNS: [u8; 4] = [0b1000_1000, 0b1000_1110, 0b1110_1000, 0b1110_1110];

/// SPI buffer length needed for `pixels` LEDs.
pub const fn buffer_len(pixels: usize) -> usize {
    pixels * BYTES_PER_PIXEL + RESET_BYTES
}

fn encode_byte(out: &mut [u8], mut data: u8) {
    for o in out.iter_mut().take(4) {
        *o = PATTERNS[((data & 0b1100_0000) >> 6) as usize];
        data <<= 2;
    }
}

/// Encode `pixels` into `buffer` and return the number of bytes to send.
pub fn encode(pixels: &[Rgb888], buffer: &mut [u8]) -> Result<usize, VizError> {
    let len = buffer_len(pixels.len());
    if buffer.len() < len {
        return Err(VizError::BufferTooSmall {
            needed: len,
            available: buffer.len(),
        });
    }
    for (chunk, pixel) in buffer.chunks_exact_mut(BYTES_PER_PIXEL).zip(pixels.iter()) {
        encode_byte(&mut chunk[0..4], pixel.g());
        encode_byte(&mut chunk[4..8], pixel.r());
        encode_byte(&mut chunk[8..12], pixel.b());
    }
    buffer[pixels.len() * BYTES_PER_PIXEL..len].fill(0);
    Ok(len)
}
