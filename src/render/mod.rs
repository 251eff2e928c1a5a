//! Pure pixel pattern generators. Every function here writes into a frame
//! buffer and nothing else; pushing frames and pacing them is the animator's
//! job.

use smart_leds::RGB8;

/// Number of interpolation frames a fade is spread over
pub const FADE_STEPS: usize = 51;

/// Distance between lit pixels in a chase comb
pub const CHASE_SPACING: usize = 3;

pub const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Frame counter shared by the continuous patterns. It wraps at 256 and is
/// not reset when the mode changes, so a rainbow picks up where a run left
/// off and the other way around.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimationPhase(u8);

impl AnimationPhase {
    pub fn new(value: u8) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn advance(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// Map a position on the hue wheel to a colour. The wheel runs red to green
/// to blue and back in three linear segments.
pub fn wheel(pos: u8) -> RGB8 {
    let pos = pos as i32;
    let (r, g, b) = if pos < 85 {
        (pos * 3, 255 - pos * 3, 0)
    } else if pos < 170 {
        let pos = pos - 85;
        (255 - pos * 3, 0, pos * 3)
    } else {
        let pos = pos - 170;
        (0, pos * 3, 255 - pos * 3)
    };
    RGB8::new(channel(r), channel(g), channel(b))
}

fn channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Spread the whole wheel across the strip, shifted by the phase
pub fn rainbow(frame: &mut [RGB8], phase: AnimationPhase) {
    let count = frame.len();
    for (i, pixel) in frame.iter_mut().enumerate() {
        let pos = (i * 256 / count + phase.value() as usize) & 0xFF;
        *pixel = wheel(pos as u8);
    }
}

pub fn fill(frame: &mut [RGB8], color: RGB8) {
    frame.fill(color);
}

pub fn off(frame: &mut [RGB8]) {
    fill(frame, BLACK);
}

/// Set every pixel whose index is `offset` modulo the chase spacing. Call
/// with black to take the same comb back down.
pub fn chase_comb(frame: &mut [RGB8], offset: usize, color: RGB8) {
    for pixel in frame.iter_mut().skip(offset).step_by(CHASE_SPACING) {
        *pixel = color;
    }
}

/// Channel value for one step of a fade. The per-step delta is floored, so
/// the last step usually stops short of `to` and the caller finishes the fade
/// by showing `to` itself.
pub fn fade_step(from: u8, to: u8, step: usize) -> u8 {
    let delta = (to as i32 - from as i32).div_euclid(FADE_STEPS as i32);
    channel(from as i32 + delta * step as i32)
}

pub fn fade_color(from: RGB8, to: RGB8, step: usize) -> RGB8 {
    RGB8::new(
        fade_step(from.r, to.r, step),
        fade_step(from.g, to.g, step),
        fade_step(from.b, to.b, step),
    )
}

/// A bright head of `color` at the phase position with a linear falloff
/// over `length` pixels. Pixels past the tail are black.
pub fn run(frame: &mut [RGB8], color: RGB8, length: usize, phase: AnimationPhase) {
    let count = frame.len();
    let length = length.max(1);
    let falloff = |value: u8, i: usize| {
        let delta = value as usize / length;
        (value as usize).saturating_sub(delta * i) as u8
    };

    for i in 0..count {
        let n = (i + phase.value() as usize) % count;
        frame[n] = RGB8::new(
            falloff(color.r, i),
            falloff(color.g, i),
            falloff(color.b, i),
        );
    }
}
