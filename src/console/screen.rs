//! Palette-indexed framebuffer
//!
//! One byte per pixel holding a palette index. The presenter expands it to
//! RGBA once per frame. Text is not rasterized here; `print` calls are
//! queued as overlays and drawn by the presenter on top of the upload.

use super::cart::SpriteSheet;
use super::{SpriteBlit, SCREEN_HEIGHT, SCREEN_WIDTH, TILE_SIZE};

/// Queued `print` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOverlay {
    pub text: String,
    pub x: i32,
    pub y: i32,
}

pub struct Screen {
    pub pixels: Vec<u8>,
    pub width: i32,
    pub height: i32,
    pub texts: Vec<TextOverlay>,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            pixels: vec![0; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize],
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            texts: Vec::new(),
        }
    }

    /// Fill with a palette index and drop queued text
    pub fn clear(&mut self, color: u8) {
        self.pixels.fill(color & 0x0F);
        self.texts.clear();
    }

    /// Palette index at (x, y), None when outside the screen
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    fn set(&mut self, x: i32, y: i32, color: u8) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Fill a square block, clipped to the screen before iterating
    fn fill_block(&mut self, x: i64, y: i64, size: i64, color: u8) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(size).min(self.width as i64);
        let y1 = y.saturating_add(size).min(self.height as i64);
        for by in y0..y1 {
            for bx in x0..x1 {
                self.set(bx as i32, by as i32, color);
            }
        }
    }

    pub fn queue_text(&mut self, text: &str, x: i32, y: i32) {
        self.texts.push(TextOverlay { text: text.to_string(), x, y });
    }

    /// Blit one tile. Flip is applied first, then the clockwise rotation.
    pub fn blit(&mut self, sheet: &SpriteSheet, blit: &SpriteBlit) {
        let scale = blit.scale.max(1) as i64;

        for dy in 0..TILE_SIZE {
            for dx in 0..TILE_SIZE {
                let (sx, sy) = source_pixel(dx, dy, blit.flip, blit.rotation);
                let color = sheet.pixel(blit.sprite, sx, sy);
                if color == blit.color_key {
                    continue;
                }
                let bx = blit.x as i64 + dx as i64 * scale;
                let by = blit.y as i64 + dy as i64 * scale;
                self.fill_block(bx, by, scale, color);
            }
        }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a destination pixel back to the tile pixel that lands on it.
fn source_pixel(dx: i32, dy: i32, flip: u8, rotation: u8) -> (i32, i32) {
    let last = TILE_SIZE - 1;
    let (mut x, mut y) = (dx, dy);

    // Undo the clockwise quarter turns
    for _ in 0..(rotation & 3) {
        let (px, py) = (x, y);
        x = py;
        y = last - px;
    }

    if flip & 1 != 0 {
        x = last - x;
    }
    if flip & 2 != 0 {
        y = last - y;
    }
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sheet whose sprite 1 has a single lit pixel at (1, 0)
    fn marker_sheet() -> SpriteSheet {
        let mut sheet = SpriteSheet::blank();
        let mut pixels = [0u8; 64];
        pixels[1] = 5;
        sheet.set_tile(1, pixels);
        sheet
    }

    fn blit(flip: u8, rotation: u8, scale: u32) -> SpriteBlit {
        SpriteBlit { sprite: 1, x: 10, y: 20, color_key: 0, scale, flip, rotation }
    }

    fn lit(screen: &Screen) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..screen.height {
            for x in 0..screen.width {
                if screen.get(x, y) == Some(5) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_plain_blit() {
        let mut screen = Screen::new();
        screen.blit(&marker_sheet(), &blit(0, 0, 1));
        assert_eq!(lit(&screen), vec![(11, 20)]);
    }

    #[test]
    fn test_color_key_is_transparent() {
        let mut screen = Screen::new();
        screen.clear(3);
        screen.blit(&marker_sheet(), &blit(0, 0, 1));
        // Key 0 pixels leave the background untouched
        assert_eq!(screen.get(10, 20), Some(3));
    }

    #[test]
    fn test_flips() {
        let mut screen = Screen::new();
        screen.blit(&marker_sheet(), &blit(1, 0, 1));
        assert_eq!(lit(&screen), vec![(16, 20)]);

        let mut screen = Screen::new();
        screen.blit(&marker_sheet(), &blit(2, 0, 1));
        assert_eq!(lit(&screen), vec![(11, 27)]);
    }

    #[test]
    fn test_rotation_is_clockwise() {
        let mut screen = Screen::new();
        screen.blit(&marker_sheet(), &blit(0, 1, 1));
        assert_eq!(lit(&screen), vec![(17, 21)]);

        let mut screen = Screen::new();
        screen.blit(&marker_sheet(), &blit(0, 2, 1));
        assert_eq!(lit(&screen), vec![(16, 27)]);
    }

    #[test]
    fn test_scale_expands_pixels() {
        let mut screen = Screen::new();
        screen.blit(&marker_sheet(), &blit(0, 0, 2));
        assert_eq!(lit(&screen), vec![(12, 20), (13, 20), (12, 21), (13, 21)]);
    }

    #[test]
    fn test_blit_clips_at_edges() {
        let mut screen = Screen::new();
        let mut b = blit(0, 0, 1);
        b.x = -1;
        b.y = -1;
        screen.blit(&marker_sheet(), &b);
        // Pixel (1, 0) lands at (0, -1), off screen
        assert!(lit(&screen).is_empty());
    }

    #[test]
    fn test_blit_far_offscreen_draws_nothing() {
        let mut screen = Screen::new();
        let mut b = blit(0, 0, 1);
        b.x = i32::MAX;
        b.y = i32::MIN;
        screen.blit(&marker_sheet(), &b);
        assert!(lit(&screen).is_empty());
    }

    #[test]
    fn test_huge_scale_is_clipped() {
        let mut screen = Screen::new();
        let mut b = blit(0, 0, u32::MAX);
        b.x = -1;
        b.y = 0;
        screen.blit(&marker_sheet(), &b);
        // Pixel (1, 0) covers everything from x = u32::MAX - 1 onwards
        assert!(lit(&screen).is_empty());

        let mut b = blit(0, 0, 1 << 31);
        b.x = i32::MIN;
        b.y = 0;
        screen.blit(&marker_sheet(), &b);
        // Now pixel (1, 0) starts at x = 0 and fills the screen
        assert_eq!(lit(&screen).len(), (SCREEN_WIDTH * SCREEN_HEIGHT) as usize);
    }

    #[test]
    fn test_clear_drops_text() {
        let mut screen = Screen::new();
        screen.queue_text("HI", 1, 2);
        screen.clear(13);
        assert!(screen.texts.is_empty());
        assert_eq!(screen.get(0, 0), Some(13));
    }
}
