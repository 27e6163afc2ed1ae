//! GARDEN: a tiny garden game for a 240x136 fantasy console
//!
//! Plants, critters and weeds live in a nested entity store that is walked
//! once per frame. The console itself is a software framebuffer presented
//! through macroquad.
//!
//! Usage: `garden [settings.ron]`

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod console;
mod game;

use std::path::Path;

use macroquad::prelude::*;

use config::Settings;
use console::{present, Cart, Machine, SCREEN_HEIGHT, SCREEN_WIDTH};
use game::{EntityStore, FrameDriver, Scene};

/// Settings from the path given as the first argument, or defaults.
/// A file that fails to load is reported through `report` and ignored.
fn load_settings(report: impl FnOnce(&str, &config::ConfigError)) -> Settings {
    let Some(path) = std::env::args().nth(1) else {
        return Settings::default();
    };
    match Settings::load(Path::new(&path)) {
        Ok(settings) => settings,
        Err(e) => {
            report(&path, &e);
            Settings::default()
        }
    }
}

fn window_conf() -> Conf {
    // Runs before the logger exists
    let settings = load_settings(|path, e| eprintln!("Failed to load settings {}: {}", path, e));
    let scale = settings.window_scale() as i32;
    Conf {
        window_title: format!("GARDEN v{}", VERSION),
        window_width: SCREEN_WIDTH * scale,
        window_height: SCREEN_HEIGHT * scale,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Decode the cart, seed the RNG and spawn the scene into a fresh store
fn boot(settings: &Settings) -> Result<(Machine, FrameDriver), Box<dyn std::error::Error>> {
    let cart = match &settings.cart {
        Some(path) => Cart::load(path)?,
        None => Cart::builtin()?,
    };
    let machine = Machine::new(&cart)?;
    machine.seed(settings.seed.unwrap_or_else(|| miniquad::date::now() as u64));

    let scene = match &settings.scene {
        Some(path) => Scene::load(path)?,
        None => Scene::builtin()?,
    };
    let mut store = EntityStore::garden();
    scene.populate(&mut store)?;

    Ok((machine, FrameDriver::new(store, settings)))
}

#[macroquad::main(window_conf)]
async fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = load_settings(|path, e| {
        log::warn!("Failed to load settings {}: {}, using defaults", path, e)
    });

    let (mut machine, mut driver) = match boot(&settings) {
        Ok(booted) => booted,
        Err(e) => {
            log::error!("Boot failed: {}", e);
            return;
        }
    };

    log::info!("=== GARDEN v{} === {} entities", VERSION, driver.store.entity_count());

    loop {
        driver.tick(&mut machine);
        present(&machine);
        driver.stats.record_frame_end(get_time());

        if driver.frame % 600 == 0 {
            if let Some(fps) = driver.stats.average_fps() {
                log::debug!("frame {}: {:.1} fps", driver.frame, fps);
            }
        }

        next_frame().await;
    }
}
