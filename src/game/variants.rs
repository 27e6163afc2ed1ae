//! Entity Kinds
//!
//! Concrete garden objects. Each wraps a base `Entity` built from the same
//! `EntityConfig` and supplies its own `update`; drawing is inherited.

use crate::console::Console;
use super::entity::{Actor, Entity, EntityConfig};

/// A planted crop. Plants do not act on their own yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Plant {
    pub entity: Entity,
}

impl Plant {
    pub fn new(config: &EntityConfig) -> Self {
        Self { entity: Entity::new(config) }
    }
}

impl Actor for Plant {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind(&self) -> &'static str {
        "Plant"
    }

    fn update(&mut self, _console: &mut dyn Console) {}
}

/// A small animal that shuffles one pixel at a time.
/// A step that would leave the screen is undone.
#[derive(Debug, Clone, PartialEq)]
pub struct Critter {
    pub entity: Entity,
}

impl Critter {
    pub fn new(config: &EntityConfig) -> Self {
        Self { entity: Entity::new(config) }
    }
}

impl Actor for Critter {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn kind(&self) -> &'static str {
        "Critter"
    }

    fn update(&mut self, console: &mut dyn Console) {
        // -1, 0 or +1 on each axis
        let dx = console.rand_int(2) as f32 - 1.0;
        let dy = console.rand_int(2) as f32 - 1.0;
        let (x, y) = self.entity.get_position();

        self.entity.set_position(x + dx, y + dy);
        if !self.entity.get_is_onscreen() {
            self.entity.set_position(x, y);
        }
    }
}
