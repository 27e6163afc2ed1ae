//! Screen presentation
//!
//! Expands the palette-indexed screen to RGBA, uploads it as a
//! nearest-filtered texture and draws it integer-scaled and centered in the
//! window. Queued text overlays are drawn on top in screen space.

use macroquad::prelude::*;

use super::machine::Machine;

/// Largest whole-number scale that fits the window (at least 1)
pub fn fit_scale(window_w: f32, window_h: f32, screen_w: i32, screen_h: i32) -> f32 {
    let sx = (window_w / screen_w as f32).floor();
    let sy = (window_h / screen_h as f32).floor();
    sx.min(sy).max(1.0)
}

/// RGBA bytes for the current screen contents
pub fn to_rgba(machine: &Machine) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(machine.screen.pixels.len() * 4);
    for &index in &machine.screen.pixels {
        let [r, g, b] = machine.palette.rgb(index);
        rgba.extend_from_slice(&[r, g, b, 255]);
    }
    rgba
}

/// Draw the machine's screen to the window
pub fn present(machine: &Machine) {
    let screen = &machine.screen;
    let scale = fit_scale(screen_width(), screen_height(), screen.width, screen.height);
    let draw_w = screen.width as f32 * scale;
    let draw_h = screen.height as f32 * scale;
    let draw_x = ((screen_width() - draw_w) / 2.0).floor();
    let draw_y = ((screen_height() - draw_h) / 2.0).floor();

    clear_background(BLACK);

    let texture = Texture2D::from_rgba8(screen.width as u16, screen.height as u16, &to_rgba(machine));
    texture.set_filter(FilterMode::Nearest);

    draw_texture_ex(
        &texture,
        draw_x,
        draw_y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(Vec2::new(draw_w, draw_h)),
            ..Default::default()
        },
    );

    // Text baseline sits one glyph below the requested top-left corner
    let font_size = 8.0 * scale;
    let [r, g, b] = machine.palette.rgb(12);
    let text_color = Color::from_rgba(r, g, b, 255);
    for overlay in &screen.texts {
        draw_text(
            &overlay.text,
            draw_x + overlay.x as f32 * scale,
            draw_y + overlay.y as f32 * scale + font_size * 0.75,
            font_size,
            text_color,
        );
    }
}
