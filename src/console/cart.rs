//! Cartridge data
//!
//! Palette, sprite tiles and sprite flags in RON. Tiles and the palette are
//! hex strings in the same layout the console's cart sections use:
//! one hex digit per pixel (row-major, 8x8) and six hex digits per color.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{PALETTE_SIZE, SPRITE_COUNT, TILE_SIZE};

/// Built-in garden cartridge
pub const DEFAULT_CART: &str = include_str!("../../assets/garden.cart.ron");

const TILE_PIXELS: usize = (TILE_SIZE * TILE_SIZE) as usize;

/// Error type for cartridge loading
#[derive(Debug)]
pub enum CartError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    InvalidPalette(String),
    InvalidTile { sprite: u8, reason: String },
}

impl From<std::io::Error> for CartError {
    fn from(e: std::io::Error) -> Self {
        CartError::Io(e)
    }
}

impl From<ron::error::SpannedError> for CartError {
    fn from(e: ron::error::SpannedError) -> Self {
        CartError::Parse(e)
    }
}

impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartError::Io(e) => write!(f, "IO error: {}", e),
            CartError::Parse(e) => write!(f, "Parse error: {}", e),
            CartError::InvalidPalette(e) => write!(f, "Invalid palette: {}", e),
            CartError::InvalidTile { sprite, reason } => {
                write!(f, "Invalid tile {:03}: {}", sprite, reason)
            }
        }
    }
}

impl std::error::Error for CartError {}

/// Cartridge as stored on disk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Cart {
    /// 16 colors, RRGGBB each, concatenated
    pub palette: String,
    /// Sprite index -> 64 hex digits
    pub tiles: BTreeMap<u8, String>,
    /// Sprite index -> flag byte
    pub flags: BTreeMap<u8, u8>,
}

/// Decoded 16-color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette(pub [[u8; 3]; PALETTE_SIZE]);

impl Palette {
    /// RGB of a palette index (upper nibble ignored)
    pub fn rgb(&self, index: u8) -> [u8; 3] {
        self.0[(index & 0x0F) as usize]
    }
}

/// Decoded sprite sheet: palette indices per tile, plus flag bytes
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    tiles: Vec<[u8; TILE_PIXELS]>,
    flags: [u8; SPRITE_COUNT],
}

impl SpriteSheet {
    /// An all-zero sheet with no flags set
    pub fn blank() -> Self {
        Self {
            tiles: vec![[0; TILE_PIXELS]; SPRITE_COUNT],
            flags: [0; SPRITE_COUNT],
        }
    }

    /// Palette index of a pixel inside a tile
    pub fn pixel(&self, sprite: u8, x: i32, y: i32) -> u8 {
        self.tiles[sprite as usize][(y * TILE_SIZE + x) as usize]
    }

    pub fn set_tile(&mut self, sprite: u8, pixels: [u8; TILE_PIXELS]) {
        self.tiles[sprite as usize] = pixels;
    }

    pub fn flags(&self, sprite: u8) -> u8 {
        self.flags[sprite as usize]
    }

    pub fn set_flags(&mut self, sprite: u8, flags: u8) {
        self.flags[sprite as usize] = flags;
    }

    /// Is flag bit `flag` set for `sprite`? Bits above 7 are never set.
    pub fn flag(&self, sprite: u8, flag: u8) -> bool {
        flag < 8 && self.flags(sprite) & (1 << flag) != 0
    }
}

fn hex_digit(c: char) -> Option<u8> {
    c.to_digit(16).map(|d| d as u8)
}

impl Cart {
    /// Load a cartridge from a RON file
    pub fn load(path: &Path) -> Result<Cart, CartError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a cartridge from a RON string
    pub fn parse(contents: &str) -> Result<Cart, CartError> {
        Ok(ron::from_str(contents)?)
    }

    /// The embedded garden cartridge
    pub fn builtin() -> Result<Cart, CartError> {
        Self::parse(DEFAULT_CART)
    }

    pub fn decode_palette(&self) -> Result<Palette, CartError> {
        let digits: Vec<u8> = self
            .palette
            .chars()
            .map(|c| {
                hex_digit(c).ok_or_else(|| {
                    CartError::InvalidPalette(format!("'{}' is not a hex digit", c))
                })
            })
            .collect::<Result<_, _>>()?;

        if digits.len() != PALETTE_SIZE * 6 {
            return Err(CartError::InvalidPalette(format!(
                "expected {} hex digits, found {}",
                PALETTE_SIZE * 6,
                digits.len()
            )));
        }

        let mut colors = [[0u8; 3]; PALETTE_SIZE];
        for (i, color) in colors.iter_mut().enumerate() {
            for (c, channel) in color.iter_mut().enumerate() {
                let at = i * 6 + c * 2;
                *channel = digits[at] << 4 | digits[at + 1];
            }
        }
        Ok(Palette(colors))
    }

    pub fn decode_sheet(&self) -> Result<SpriteSheet, CartError> {
        let mut sheet = SpriteSheet::blank();

        for (&sprite, hex) in &self.tiles {
            let mut pixels = [0u8; TILE_PIXELS];
            let mut count = 0;
            for c in hex.chars() {
                let digit = hex_digit(c).ok_or_else(|| CartError::InvalidTile {
                    sprite,
                    reason: format!("'{}' is not a hex digit", c),
                })?;
                if count < TILE_PIXELS {
                    pixels[count] = digit;
                }
                count += 1;
            }
            if count != TILE_PIXELS {
                return Err(CartError::InvalidTile {
                    sprite,
                    reason: format!("expected {} pixels, found {}", TILE_PIXELS, count),
                });
            }
            sheet.set_tile(sprite, pixels);
        }

        for (&sprite, &flags) in &self.flags {
            sheet.set_flags(sprite, flags);
        }

        Ok(sheet)
    }
}
