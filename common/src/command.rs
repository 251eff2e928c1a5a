use alloc::string::{String, ToString};
use serde::{Deserialize, Serialize};

// Mode identifiers understood by the strip daemon
pub const MODE_IDLE: &str = "";
pub const MODE_RAINBOW: &str = "rainbow";
pub const MODE_FILL: &str = "fill";
pub const MODE_BLINK: &str = "blink";
pub const MODE_CHASE: &str = "chase";
pub const MODE_WIPE_TO: &str = "wipe_to";
pub const MODE_FADE_TO: &str = "fade_to";
pub const MODE_RUN: &str = "run";
pub const MODE_OFF: &str = "off";

pub const MODES: [&str; 9] = [
    MODE_IDLE,
    MODE_RAINBOW,
    MODE_FILL,
    MODE_BLINK,
    MODE_CHASE,
    MODE_WIPE_TO,
    MODE_FADE_TO,
    MODE_RUN,
    MODE_OFF,
];

/// A colour as it travels over the wire. Channels are signed and wide so a
/// publisher sending something out of range gets clamped by the daemon rather
/// than having the whole message thrown away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireColor {
    pub r: i64,
    pub g: i64,
    pub b: i64,
}

impl WireColor {
    pub fn new(r: i64, g: i64, b: i64) -> Self {
        Self { r, g, b }
    }

    /// The colour with every channel clamped into 0..=255
    pub fn clamped(&self) -> [u8; 3] {
        [clamp_channel(self.r), clamp_channel(self.g), clamp_channel(self.b)]
    }
}

pub fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, u8::MAX as i64) as u8
}

/// One command published to the strip. `length` and `wait_ms` are optional
/// and fall back to the daemon defaults for the mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedModeColor {
    pub mode: String,
    #[serde(default)]
    pub color: WireColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_ms: Option<u64>,
}

impl LedModeColor {
    pub fn new(mode: &str, r: i64, g: i64, b: i64) -> Self {
        Self {
            mode: mode.to_string(),
            color: WireColor::new(r, g, b),
            length: None,
            wait_ms: None,
        }
    }

    pub fn with_length(mut self, length: i64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_wait_ms(mut self, wait_ms: u64) -> Self {
        self.wait_ms = Some(wait_ms);
        self
    }
}

#[cfg(feature = "std")]
impl LedModeColor {
    /// Encode as a single newline terminated JSON line
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_message() {
        let message =
            LedModeColor::from_line(r#"{"mode":"fill","color":{"r":1,"g":2,"b":3}}"#).unwrap();

        assert_eq!(message, LedModeColor::new(MODE_FILL, 1, 2, 3));
    }

    #[test]
    fn test_parse_with_overrides() {
        let message = LedModeColor::from_line(
            "{\"mode\":\"run\",\"color\":{\"r\":255,\"g\":0,\"b\":0},\"length\":4,\"wait_ms\":40}\n",
        )
        .unwrap();

        assert_eq!(message.length, Some(4));
        assert_eq!(message.wait_ms, Some(40));
    }

    #[test]
    fn test_missing_color_is_black() {
        let message = LedModeColor::from_line(r#"{"mode":"off"}"#).unwrap();
        assert_eq!(message.color, WireColor::default());
    }

    #[test]
    fn test_line_is_newline_terminated() {
        let line = LedModeColor::new(MODE_OFF, 0, 0, 0).to_line().unwrap();

        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
        assert!(!line.contains("length"));
    }

    #[test]
    fn test_clamped_channels() {
        assert_eq!(WireColor::new(-20, 300, 128).clamped(), [0, 255, 128]);
    }
}
