//! WS2812 driven from an SPI bus. At 3.2 MHz one SPI bit lasts 312.5 ns, so
//! four SPI bits make one 1.25 us WS2812 bit: `1000` for a zero and `1110`
//! for a one. Each SPI byte carries two data bits.

use smart_leds::RGB8;

#[cfg(feature = "pi")]
use anyhow::{bail, Error};
#[cfg(feature = "pi")]
use log::info;
#[cfg(feature = "pi")]
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

#[cfg(feature = "pi")]
use super::PixelSink;
#[cfg(feature = "pi")]
use crate::config::StripConfig;

/// Zero bytes sent after the pixel data to latch it (well over 50 us)
pub const RESET_LEN: usize = 140;

/// SPI bytes per pixel, three colour bytes of four SPI bytes each
pub const BYTES_PER_PIXEL: usize = 12;

const PATTERNS: [u8; 4] = [0b1000_1000, 0b1000_1110, 0b1110_1000, 0b1110_1110];

/// Encode pixels into the SPI byte stream, reset gap included. The strip
/// wants green first.
pub fn encode(pixels: impl IntoIterator<Item = RGB8>, out: &mut Vec<u8>) {
    out.clear();
    for pixel in pixels {
        for mut value in [pixel.g, pixel.r, pixel.b] {
            for _ in 0..4 {
                out.push(PATTERNS[((value & 0b1100_0000) >> 6) as usize]);
                value <<= 2;
            }
        }
    }
    out.extend_from_slice(&[0; RESET_LEN]);
}

#[cfg(feature = "pi")]
pub struct Ws2812Spi {
    spi: Spi,
    pixels: Vec<RGB8>,
    brightness: u8,
    buffer: Vec<u8>,
}

#[cfg(feature = "pi")]
impl Ws2812Spi {
    pub fn init(config: &StripConfig) -> Result<Self, Error> {
        let bus = match config.spi_bus {
            0 => Bus::Spi0,
            1 => Bus::Spi1,
            2 => Bus::Spi2,
            3 => Bus::Spi3,
            4 => Bus::Spi4,
            5 => Bus::Spi5,
            6 => Bus::Spi6,
            other => bail!("SPI bus {} does not exist", other),
        };
        let slave_select = match config.slave_select {
            0 => SlaveSelect::Ss0,
            1 => SlaveSelect::Ss1,
            2 => SlaveSelect::Ss2,
            other => bail!("slave select {} is not supported", other),
        };
        let spi = Spi::new(bus, slave_select, config.clock_hz, Mode::Mode0)?;

        info!(
            "WS2812 on SPI bus {} at {} Hz, brightness {}",
            config.spi_bus, config.clock_hz, config.brightness
        );

        Ok(Self {
            spi,
            pixels: vec![RGB8::default(); config.pixel_count],
            brightness: config.brightness,
            buffer: Vec::with_capacity(config.pixel_count * BYTES_PER_PIXEL + RESET_LEN),
        })
    }
}

#[cfg(feature = "pi")]
impl PixelSink for Ws2812Spi {
    fn begin(&mut self) -> Result<(), Error> {
        // Hold the line low long enough for the strip to expect a new frame
        self.spi.write(&[0; RESET_LEN])?;
        Ok(())
    }

    fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    fn set_pixel(&mut self, index: usize, color: RGB8) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    fn show(&mut self) -> Result<(), Error> {
        let pixels = smart_leds::brightness(self.pixels.iter().copied(), self.brightness);
        encode(pixels, &mut self.buffer);
        self.spi.write(&self.buffer)?;
        Ok(())
    }
}
