//! Entity Model
//!
//! `Entity` is the record every garden object carries: position, sprite
//! appearance and sprite size. Behavior lives behind the `Actor` trait so
//! the store can update and draw any kind of object without knowing which
//! variant it holds.
//!
//! Sizing fields can never be zero: a zero or missing scale/composite
//! dimension is normalized to 1 at construction and in the setters.
//! They are also capped at `MAX_SIZE_FACTOR`, which keeps the pixel size
//! of any sprite within `u32`.

use serde::Deserialize;

use crate::console::{Console, SpriteBlit, FLAG_NO_TRANSFORM, SCREEN_HEIGHT, SCREEN_WIDTH, TILE_SIZE};

/// Sprite index meaning "no sprite assigned"
pub const NO_SPRITE: u8 = 255;

/// Upper bound for sprite scale and composite dimensions
pub const MAX_SIZE_FACTOR: u32 = 4096;

/// Diagnostic emitted when a variant forgot to override `update`
pub const BASE_UPDATE_CALLED: &str =
    "Base Entity.update() was called. Every entity kind must provide its own update.";

/// Construction parameters. Any field left as `None` takes its default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub sprite_id: Option<u8>,
    pub color_key: Option<u8>,
    pub sprite_rotation: Option<u8>,
    pub sprite_flip: Option<u8>,
    pub sprite_scale: Option<u32>,
    pub composite_width: Option<u32>,
    pub composite_height: Option<u32>,
    pub gc_exempt: Option<bool>,
}

/// Clockwise rotation in quarter turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    /// Only the low two bits are meaningful
    pub fn from_code(code: u8) -> Self {
        match code & 3 {
            0 => Rotation::None,
            1 => Rotation::Quarter,
            2 => Rotation::Half,
            _ => Rotation::ThreeQuarter,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Axis mirroring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Flip {
    pub const NONE: Flip = Flip { horizontal: false, vertical: false };

    /// Bit 0 horizontal, bit 1 vertical
    pub fn from_code(code: u8) -> Self {
        Flip {
            horizontal: code & 1 != 0,
            vertical: code & 2 != 0,
        }
    }

    pub fn code(self) -> u8 {
        self.horizontal as u8 | (self.vertical as u8) << 1
    }
}

/// Base record shared by every entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    // Position
    pub x: f32,
    pub y: f32,

    // Sprite appearance
    pub sprite_id: u8,
    pub color_key: u8,
    pub sprite_rotation: Rotation,
    pub sprite_flip: Flip,

    // Sprite size (1..=MAX_SIZE_FACTOR)
    sprite_scale: u32,
    composite_width: u32,
    composite_height: u32,

    /// Reserved for a future eviction sweep; nothing reads it yet
    pub gc_exempt: bool,
}

fn size_factor(value: u32) -> u32 {
    value.clamp(1, MAX_SIZE_FACTOR)
}

impl Entity {
    pub fn new(config: &EntityConfig) -> Self {
        Self {
            x: config.x.unwrap_or(0.0),
            y: config.y.unwrap_or(0.0),
            sprite_id: config.sprite_id.unwrap_or(NO_SPRITE),
            color_key: config.color_key.unwrap_or(0),
            sprite_rotation: Rotation::from_code(config.sprite_rotation.unwrap_or(0)),
            sprite_flip: Flip::from_code(config.sprite_flip.unwrap_or(0)),
            sprite_scale: size_factor(config.sprite_scale.unwrap_or(1)),
            composite_width: size_factor(config.composite_width.unwrap_or(1)),
            composite_height: size_factor(config.composite_height.unwrap_or(1)),
            gc_exempt: config.gc_exempt.unwrap_or(false),
        }
    }

    pub fn get_position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn sprite_scale(&self) -> u32 {
        self.sprite_scale
    }

    pub fn composite_width(&self) -> u32 {
        self.composite_width
    }

    pub fn composite_height(&self) -> u32 {
        self.composite_height
    }

    /// Zero becomes 1, values above `MAX_SIZE_FACTOR` are capped
    pub fn set_sprite_scale(&mut self, scale: u32) {
        self.sprite_scale = size_factor(scale);
    }

    /// Zero dimensions become 1, values above `MAX_SIZE_FACTOR` are capped
    pub fn set_composite_size(&mut self, width: u32, height: u32) {
        self.composite_width = size_factor(width);
        self.composite_height = size_factor(height);
    }

    /// Drawn width in pixels
    pub fn sprite_size_x(&self) -> u32 {
        TILE_SIZE as u32 * self.composite_width * self.sprite_scale
    }

    /// Drawn height in pixels
    pub fn sprite_size_y(&self) -> u32 {
        TILE_SIZE as u32 * self.composite_height * self.sprite_scale
    }

    /// True while any part of the sprite can overlap the screen.
    /// Each axis is bounded by its own sprite size.
    pub fn get_is_onscreen(&self) -> bool {
        let min_x = -(self.sprite_size_x() as f32);
        let min_y = -(self.sprite_size_y() as f32);
        let x_onscreen = min_x <= self.x && self.x <= SCREEN_WIDTH as f32;
        let y_onscreen = min_y <= self.y && self.y <= SCREEN_HEIGHT as f32;
        x_onscreen && y_onscreen
    }

    /// Blit through the console. Sprites flagged no-transform always draw
    /// unrotated and unflipped.
    pub fn draw(&self, console: &mut dyn Console) {
        let (flip, rotation) = if console.sprite_flag(self.sprite_id, FLAG_NO_TRANSFORM) {
            (0, 0)
        } else {
            (self.sprite_flip.code(), self.sprite_rotation.code())
        };

        console.spr(&SpriteBlit {
            sprite: self.sprite_id,
            x: self.x.floor() as i32,
            y: self.y.floor() as i32,
            color_key: self.color_key,
            scale: self.sprite_scale,
            flip,
            rotation,
        });
    }
}

impl Default for Entity {
    fn default() -> Self {
        Entity::new(&EntityConfig::default())
    }
}

/// Anything the store can update and draw.
///
/// Implementors expose their base `Entity` and must override `update`;
/// the provided `update` only reports that it was reached. `draw` defaults
/// to the base entity's sprite blit.
pub trait Actor {
    fn entity(&self) -> &Entity;

    fn entity_mut(&mut self) -> &mut Entity;

    /// Kind name, used in logs
    fn kind(&self) -> &'static str;

    fn update(&mut self, console: &mut dyn Console) {
        console.trace(BASE_UPDATE_CALLED);
    }

    fn draw(&self, console: &mut dyn Console) {
        self.entity().draw(console);
    }
}

impl Actor for Entity {
    fn entity(&self) -> &Entity {
        self
    }

    fn entity_mut(&mut self) -> &mut Entity {
        self
    }

    fn kind(&self) -> &'static str {
        "Entity"
    }
}
