//! Frame Driver
//!
//! Called once per host frame: clear, draw the static overlays, then walk
//! the entity store. Also keeps the frame counter and a short history of
//! frame durations for the FPS readout.

use std::collections::VecDeque;

use crate::console::Console;
use crate::config::{Overlay, Settings};
use super::store::EntityStore;

/// Frame durations kept for averaging
pub const FRAME_HISTORY: usize = 60;

/// Rolling frame timing
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frame_times: VecDeque<f64>,
    /// Host clock at the end of the last recorded frame (seconds)
    pub last_frame_end: f64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the host clock at the end of a frame
    pub fn record_frame_end(&mut self, now: f64) {
        if self.last_frame_end > 0.0 && now >= self.last_frame_end {
            if self.frame_times.len() == FRAME_HISTORY {
                self.frame_times.pop_front();
            }
            self.frame_times.push_back(now - self.last_frame_end);
        }
        self.last_frame_end = now;
    }

    /// Mean frame time in seconds, None before two frames were recorded
    pub fn average_frame_time(&self) -> Option<f64> {
        if self.frame_times.is_empty() {
            return None;
        }
        Some(self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64)
    }

    pub fn average_fps(&self) -> Option<f64> {
        self.average_frame_time()
            .filter(|&t| t > 0.0)
            .map(|t| 1.0 / t)
    }
}

pub struct FrameDriver {
    pub store: EntityStore,
    /// Palette index the screen is cleared to
    pub background: u8,
    pub overlays: Vec<Overlay>,
    /// Frames ticked so far
    pub frame: u64,
    pub stats: FrameStats,
}

impl FrameDriver {
    pub fn new(store: EntityStore, settings: &Settings) -> Self {
        Self {
            store,
            background: settings.background,
            overlays: settings.overlays.clone(),
            frame: 0,
            stats: FrameStats::new(),
        }
    }

    /// Run one frame against the console
    pub fn tick(&mut self, console: &mut dyn Console) -> bool {
        console.cls(self.background);
        for overlay in &self.overlays {
            console.print(&overlay.text, overlay.x, overlay.y);
        }
        let ok = self.store.update_and_draw(console, false);
        self.frame += 1;
        ok
    }
}
