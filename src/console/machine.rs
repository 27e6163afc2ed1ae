//! Software console
//!
//! `Machine` owns the decoded cartridge and the framebuffer and implements
//! every `Console` primitive without touching the GPU, so the whole frame
//! can be exercised in tests. The presenter uploads `screen` afterwards.

use std::collections::VecDeque;

use super::cart::{Cart, CartError, Palette, SpriteSheet};
use super::screen::Screen;
use super::{Console, SpriteBlit};

/// Number of trace lines kept for inspection
pub const TRACE_HISTORY: usize = 32;

pub struct Machine {
    pub screen: Screen,
    pub palette: Palette,
    sheet: SpriteSheet,
    traces: VecDeque<String>,
}

impl Machine {
    /// Decode a cartridge into a ready-to-run machine
    pub fn new(cart: &Cart) -> Result<Self, CartError> {
        Ok(Self {
            screen: Screen::new(),
            palette: cart.decode_palette()?,
            sheet: cart.decode_sheet()?,
            traces: VecDeque::with_capacity(TRACE_HISTORY),
        })
    }

    /// Most recent trace lines, oldest first
    pub fn traces(&self) -> impl Iterator<Item = &str> {
        self.traces.iter().map(|s| s.as_str())
    }

    /// Seed the shared random generator
    pub fn seed(&self, seed: u64) {
        macroquad::rand::srand(seed);
    }
}

impl Console for Machine {
    fn sprite_flag(&self, sprite: u8, flag: u8) -> bool {
        self.sheet.flag(sprite, flag)
    }

    fn spr(&mut self, blit: &SpriteBlit) {
        self.screen.blit(&self.sheet, blit);
    }

    fn cls(&mut self, color: u8) {
        self.screen.clear(color);
    }

    fn print(&mut self, text: &str, x: i32, y: i32) {
        self.screen.queue_text(text, x, y);
    }

    fn trace(&mut self, message: &str) {
        log::warn!(target: "trace", "{}", message);
        if self.traces.len() == TRACE_HISTORY {
            self.traces.pop_front();
        }
        self.traces.push_back(message.to_string());
    }

    fn rand_int(&mut self, max: u32) -> u32 {
        macroquad::rand::gen_range(0u64, max as u64 + 1) as u32
    }
}
