//! Console Host Interface
//!
//! The fixed set of primitives the game consumes from the fantasy console:
//! sprite flags, sprite blit, screen clear, text, a trace sink and a random
//! integer source. Game code only ever sees `&mut dyn Console`, so the
//! software `Machine` and the test recorder are interchangeable.
//!
//! - `cart` - palette, tiles and sprite flags (RON)
//! - `screen` - palette-indexed framebuffer and sprite blitting
//! - `machine` - software `Console` implementation
//! - `present` - macroquad upload of the screen to the window

// Allow unused - inspection helpers are used by tests
#![allow(dead_code)]

pub mod cart;
pub mod screen;
pub mod machine;
pub mod present;

pub use cart::Cart;
pub use machine::Machine;
pub use present::present;

/// Screen width in pixels
pub const SCREEN_WIDTH: i32 = 240;

/// Screen height in pixels
pub const SCREEN_HEIGHT: i32 = 136;

/// Edge length of one sprite tile in pixels
pub const TILE_SIZE: i32 = 8;

/// Number of sprites addressable on the sprite sheet
pub const SPRITE_COUNT: usize = 256;

/// Number of palette entries
pub const PALETTE_SIZE: usize = 16;

/// Sprite flag bit: never flip or rotate this sprite
pub const FLAG_NO_TRANSFORM: u8 = 0;

/// Arguments of a single sprite blit (`spr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteBlit {
    pub sprite: u8,
    pub x: i32,
    pub y: i32,
    /// Palette index treated as transparent
    pub color_key: u8,
    pub scale: u32,
    /// Bit 0 mirrors horizontally, bit 1 vertically
    pub flip: u8,
    /// Clockwise quarter turns (0-3)
    pub rotation: u8,
}

/// Primitives provided by the host platform.
pub trait Console {
    /// Is `flag` (bit 0-7) set for `sprite`?
    fn sprite_flag(&self, sprite: u8, flag: u8) -> bool;

    /// Draw one sprite.
    fn spr(&mut self, blit: &SpriteBlit);

    /// Clear the whole screen to a palette index.
    fn cls(&mut self, color: u8);

    /// Draw text at a screen position.
    fn print(&mut self, text: &str, x: i32, y: i32);

    /// Diagnostic output.
    fn trace(&mut self, message: &str);

    /// Uniform random integer in `0..=max`.
    fn rand_int(&mut self, max: u32) -> u32;
}
