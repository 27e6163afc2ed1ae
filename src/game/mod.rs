//! Garden Game Core
//!
//! Key concepts:
//! - Entity: position + sprite record shared by every garden object
//! - Actor: update/draw capability the store dispatches through
//! - EntityStore: named groups of ordered entity sequences
//! - FrameDriver: per-frame clear, overlays and store traversal
//! - Scene: RON list of entities spawned at boot

// Allow unused - store editing API is exercised by tests and gameplay events
#![allow(dead_code)]

pub mod entity;
pub mod variants;
pub mod store;
pub mod scene;
pub mod frame;

// Re-export main types
pub use store::EntityStore;
pub use scene::Scene;
pub use frame::FrameDriver;
