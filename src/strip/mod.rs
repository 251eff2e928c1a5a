use anyhow::Error;
use log::{info, trace};
use smart_leds::RGB8;

pub mod spi;

#[cfg(feature = "pi")]
pub use spi::Ws2812Spi;

/// Something that can put pixels on a physical strip.
pub trait PixelSink {
    /// One-time hardware setup, called before the first frame
    fn begin(&mut self) -> Result<(), Error>;

    fn pixel_count(&self) -> usize;

    /// Stage a pixel. Nothing is transmitted until `show`.
    fn set_pixel(&mut self, index: usize, color: RGB8);

    /// Transmit the staged pixels
    fn show(&mut self) -> Result<(), Error>;
}

/// Owns the frame buffer and pushes it to a sink. The buffer survives between
/// frames, so patterns that only touch some pixels (wipes, chases) build on
/// whatever was shown before.
pub struct Strip<S> {
    sink: S,
    frame: Vec<RGB8>,
}

impl<S: PixelSink> Strip<S> {
    pub fn init(mut sink: S) -> Result<Self, Error> {
        sink.begin()?;
        let frame = vec![RGB8::default(); sink.pixel_count()];
        info!("Strip: {} pixels ready", frame.len());
        Ok(Self { sink, frame })
    }

    pub fn len(&self) -> usize {
        self.frame.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    pub fn frame(&self) -> &[RGB8] {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut [RGB8] {
        &mut self.frame
    }

    /// Send the whole buffer to the sink as one frame
    pub fn show(&mut self) -> Result<(), Error> {
        for (i, pixel) in self.frame.iter().enumerate() {
            self.sink.set_pixel(i, *pixel);
        }
        self.sink.show()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Stand-in for the hardware when running off the Pi. Keeps the pixel state
/// and logs every frame.
#[derive(Debug, Default)]
pub struct SimulatedSink {
    pixels: Vec<RGB8>,
    frames: u64,
}

impl SimulatedSink {
    pub fn new(pixel_count: usize) -> Self {
        Self {
            pixels: vec![RGB8::default(); pixel_count],
            frames: 0,
        }
    }

    pub fn pixels(&self) -> &[RGB8] {
        &self.pixels
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl PixelSink for SimulatedSink {
    fn begin(&mut self) -> Result<(), Error> {
        info!("Simulated strip with {} pixels", self.pixels.len());
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
        self.frames += 1;
        if log::log_enabled!(log::Level::Trace) {
            let hex = self
                .pixels
                .iter()
                .map(|p| format!("{:02X}{:02X}{:02X}", p.r, p.g, p.b))
                .collect::<Vec<_>>()
                .join(" ");
            trace!("Frame {}: {}", self.frames, hex);
        }
        Ok(())
    }
}
