//! Runtime settings
//!
//! Optional RON file; every field has a default so a partial file (or no
//! file at all) is fine.
//!
//! ```text
//! Settings(
//!     window_scale: 3,
//!     scene: Some("my_garden.scene.ron"),
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Largest accepted `window_scale`
pub const MAX_WINDOW_SCALE: u32 = 16;

/// Error type for settings loading
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Static text drawn every frame before the entities
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Overlay {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial window size as a multiple of the console screen
    pub window_scale: u32,
    /// Palette index the screen is cleared to each frame
    pub background: u8,
    pub overlays: Vec<Overlay>,
    /// Scene file; the built-in scene when None
    pub scene: Option<PathBuf>,
    /// Cartridge file; the built-in cart when None
    pub cart: Option<PathBuf>,
    /// Random seed; taken from the clock when None
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_scale: 4,
            background: 13,
            overlays: vec![Overlay { text: "HELLO WORLD!".to_string(), x: 84, y: 84 }],
            scene: None,
            cart: None,
            seed: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Settings, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Settings, ConfigError> {
        Ok(ron::from_str(contents)?)
    }

    /// Window scale clamped to `1..=MAX_WINDOW_SCALE`
    pub fn window_scale(&self) -> u32 {
        self.window_scale.clamp(1, MAX_WINDOW_SCALE)
    }
}
