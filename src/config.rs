use std::{path::Path, time::Duration};

use anyhow::{Context, Error};
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH: &str = "config.ron";

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct Config {
    pub strip: StripConfig,
    /// Name of the local socket commands are published on
    pub socket: String,
    /// How long the loop sleeps between checks while idle
    pub idle_tick_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct StripConfig {
    pub pixel_count: usize,
    /// Global brightness, 0 is dark and 255 is full
    pub brightness: u8,
    pub spi_bus: u8,
    pub slave_select: u8,
    pub clock_hz: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strip: StripConfig::default(),
            socket: "/tmp/ledtopic.sock".to_string(),
            idle_tick_ms: 10,
        }
    }
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            pixel_count: 2,
            brightness: 100,
            spi_bus: 0,
            slave_select: 0,
            clock_hz: 3_200_000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Config, Error> {
        Self::load_from(CONFIG_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Config, Error> {
        let path = path.as_ref();
        let config = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            ron::from_str(&config).with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.strip.pixel_count == 0 {
            anyhow::bail!("strip.pixel_count must be at least 1");
        }
        Ok(())
    }

    pub fn idle_tick(&self) -> Duration {
        Duration::from_millis(self.idle_tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.ron", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load() {
        let path = write_config(
            "ledstrip-full",
            r#"(
    strip: (
        pixel_count: 60,
        brightness: 255,
        spi_bus: 1,
        slave_select: 2,
        clock_hz: 3000000,
    ),
    socket: "/tmp/strip.sock",
    idle_tick_ms: 5,
)"#,
        );

        let config = Config::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            config,
            Config {
                strip: StripConfig {
                    pixel_count: 60,
                    brightness: 255,
                    spi_bus: 1,
                    slave_select: 2,
                    clock_hz: 3_000_000,
                },
                socket: "/tmp/strip.sock".to_string(),
                idle_tick_ms: 5,
            }
        );
        assert_eq!(config.idle_tick(), Duration::from_millis(5));
    }

    #[test]
    fn test_load_partial_uses_defaults() {
        let path = write_config("ledstrip-partial", "(strip: (pixel_count: 8))");

        let config = Config::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.strip.pixel_count, 8);
        assert_eq!(config.strip.brightness, 100);
        assert_eq!(config.socket, Config::default().socket);
    }

    #[test]
    fn test_zero_pixels_rejected() {
        let path = write_config("ledstrip-empty", "(strip: (pixel_count: 0))");

        let result = Config::load_from(&path);
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::load_from("/nonexistent/ledstrip/config.ron").is_err());
    }
}
