//! Scene files
//!
//! A scene lists the entities to spawn at boot and the store sequence each
//! one goes into. Stored as RON:
//!
//! ```text
//! Scene(
//!     spawns: [
//!         (group: "plants/row1", kind: Plant, config: (sprite_id: Some(0))),
//!     ],
//! )
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::entity::{Actor, EntityConfig};
use super::store::{EntityStore, StoreError};
use super::variants::{Critter, Plant};

/// Built-in garden scene
pub const DEFAULT_SCENE: &str = include_str!("../../assets/garden.scene.ron");

/// Error type for scene loading
#[derive(Debug)]
pub enum SceneError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    /// Spawn number `index` names a path the store cannot push into
    Store { index: usize, error: StoreError },
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::Parse(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::Io(e) => write!(f, "IO error: {}", e),
            SceneError::Parse(e) => write!(f, "Parse error: {}", e),
            SceneError::Store { index, error } => write!(f, "spawn {}: {}", index, error),
        }
    }
}

impl std::error::Error for SceneError {}

/// Which entity kind to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EntityKind {
    Plant,
    Critter,
}

impl EntityKind {
    pub fn build(self, config: &EntityConfig) -> Box<dyn Actor> {
        match self {
            EntityKind::Plant => Box::new(Plant::new(config)),
            EntityKind::Critter => Box::new(Critter::new(config)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Spawn {
    /// Slash-separated sequence path, e.g. "critters/pets/cats"
    pub group: String,
    pub kind: EntityKind,
    #[serde(default)]
    pub config: EntityConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub spawns: Vec<Spawn>,
}

impl Scene {
    pub fn load(path: &Path) -> Result<Scene, SceneError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Scene, SceneError> {
        Ok(ron::from_str(contents)?)
    }

    /// The embedded garden scene
    pub fn builtin() -> Result<Scene, SceneError> {
        Self::parse(DEFAULT_SCENE)
    }

    /// Push every spawn into `store`, in file order. Nothing is pushed if
    /// any spawn names a bad path. Returns the number of entities added.
    pub fn populate(&self, store: &mut EntityStore) -> Result<usize, SceneError> {
        for (index, spawn) in self.spawns.iter().enumerate() {
            store
                .sequence(&spawn.group)
                .map_err(|error| SceneError::Store { index, error })?;
        }

        for (index, spawn) in self.spawns.iter().enumerate() {
            store
                .push(&spawn.group, spawn.kind.build(&spawn.config))
                .map_err(|error| SceneError::Store { index, error })?;
        }

        log::info!("scene: spawned {} entities", self.spawns.len());
        Ok(self.spawns.len())
    }
}
