//! Entity Store
//!
//! A tree of named groups whose leaves are ordered entity sequences.
//!
//! ```text
//! plants
//!   row1: [Plant, Plant]
//!   row2: []
//! critters
//!   pets
//!     cats: [Critter]
//! weeds: []
//! ```
//!
//! Group children keep insertion order and sequences keep push order, so a
//! traversal always visits entities in the same order. Within a sequence
//! that order is the draw layering: later entities draw on top.
//!
//! Every node is either a group or a sequence, so the traversal never has
//! to guess whether a child holds game data.

use crate::console::Console;
use super::entity::Actor;

/// Ordered, owning list of entities
pub type Sequence = Vec<Box<dyn Actor>>;

/// Error type for store lookups and edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    EmptyPath,
    UnknownGroup(String),
    NotAGroup(String),
    NotASequence(String),
    DuplicateName(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::EmptyPath => write!(f, "empty store path"),
            StoreError::UnknownGroup(p) => write!(f, "no group or sequence at '{}'", p),
            StoreError::NotAGroup(p) => write!(f, "'{}' is a sequence, not a group", p),
            StoreError::NotASequence(p) => write!(f, "'{}' is a group, not a sequence", p),
            StoreError::DuplicateName(p) => write!(f, "'{}' already exists", p),
        }
    }
}

impl std::error::Error for StoreError {}

/// A store node
pub enum Node {
    Group(Group),
    Sequence(Sequence),
}

impl Node {
    pub fn entity_count(&self) -> usize {
        match self {
            Node::Group(group) => group.entity_count(),
            Node::Sequence(seq) => seq.len(),
        }
    }

    /// Returns the number of entities visited
    pub fn update_and_draw(&mut self, console: &mut dyn Console, suppress_draw: bool) -> usize {
        match self {
            Node::Group(group) => group.update_and_draw(console, suppress_draw),
            Node::Sequence(seq) => {
                for actor in seq.iter_mut() {
                    actor.update(console);
                    if !suppress_draw {
                        actor.draw(console);
                    }
                }
                seq.len()
            }
        }
    }
}

/// Named children in insertion order
#[derive(Default)]
pub struct Group {
    children: Vec<(String, Node)>,
}

impl Group {
    pub fn new() -> Self {
        Self { children: Vec::new() }
    }

    /// Names must be unique; only used for fixed layouts
    fn with_children(children: Vec<(&str, Node)>) -> Self {
        Self {
            children: children.into_iter().map(|(n, node)| (n.to_string(), node)).collect(),
        }
    }

    fn check_free(&self, name: &str) -> Result<(), StoreError> {
        if self.child(name).is_some() {
            return Err(StoreError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// Append an empty subgroup and return it
    pub fn insert_group(&mut self, name: &str) -> Result<&mut Group, StoreError> {
        self.check_free(name)?;
        self.children.push((name.to_string(), Node::Group(Group::new())));
        match self.children.last_mut() {
            Some((_, Node::Group(group))) => Ok(group),
            _ => unreachable!("just pushed a group"),
        }
    }

    /// Append an empty sequence
    pub fn insert_sequence(&mut self, name: &str) -> Result<(), StoreError> {
        self.check_free(name)?;
        self.children.push((name.to_string(), Node::Sequence(Vec::new())));
        Ok(())
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    /// Children in traversal order
    pub fn children(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(n, node)| (n.as_str(), node))
    }

    pub fn entity_count(&self) -> usize {
        self.children.iter().map(|(_, node)| node.entity_count()).sum()
    }

    /// Update then draw (unless suppressed) every entity below this group,
    /// depth first in child order. Returns the number of entities visited.
    pub fn update_and_draw(&mut self, console: &mut dyn Console, suppress_draw: bool) -> usize {
        let mut visited = 0;
        for (_, node) in self.children.iter_mut() {
            visited += node.update_and_draw(console, suppress_draw);
        }
        visited
    }

    fn resolve(&self, path: &str) -> Result<&Node, StoreError> {
        let segments = split_path(path)?;
        let (last, parents) = segments.split_last().ok_or(StoreError::EmptyPath)?;

        let mut group = self;
        for segment in parents {
            group = match group.child(segment) {
                Some(Node::Group(g)) => g,
                Some(Node::Sequence(_)) => return Err(StoreError::NotAGroup(path.to_string())),
                None => return Err(StoreError::UnknownGroup(path.to_string())),
            };
        }
        group.child(last).ok_or_else(|| StoreError::UnknownGroup(path.to_string()))
    }

    fn resolve_mut(&mut self, path: &str) -> Result<&mut Node, StoreError> {
        let segments = split_path(path)?;
        let (last, parents) = segments.split_last().ok_or(StoreError::EmptyPath)?;

        let mut group = self;
        for segment in parents {
            group = match group.child_mut(segment) {
                Some(Node::Group(g)) => g,
                Some(Node::Sequence(_)) => return Err(StoreError::NotAGroup(path.to_string())),
                None => return Err(StoreError::UnknownGroup(path.to_string())),
            };
        }
        group.child_mut(last).ok_or_else(|| StoreError::UnknownGroup(path.to_string()))
    }
}

/// Split "a/b/c", rejecting empty segments
fn split_path(path: &str) -> Result<Vec<&str>, StoreError> {
    if path.is_empty() {
        return Err(StoreError::EmptyPath);
    }
    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(StoreError::UnknownGroup(path.to_string()));
    }
    Ok(segments)
}

/// Owner of every live entity, traversed once per frame.
#[derive(Default)]
pub struct EntityStore {
    root: Group,
}

impl EntityStore {
    /// A store with no groups
    pub fn new() -> Self {
        Self { root: Group::new() }
    }

    /// The garden layout with every sequence empty
    pub fn garden() -> Self {
        let seq = || Node::Sequence(Vec::new());
        let plants = Group::with_children(vec![("row1", seq()), ("row2", seq()), ("row3", seq())]);
        let pets = Group::with_children(vec![("cats", seq()), ("dogs", seq())]);
        let critters = Group::with_children(vec![
            ("squirrels", seq()),
            ("crows", seq()),
            ("pets", Node::Group(pets)),
        ]);
        let root = Group::with_children(vec![
            ("plants", Node::Group(plants)),
            ("critters", Node::Group(critters)),
            ("weeds", seq()),
        ]);
        Self { root }
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Group {
        &mut self.root
    }

    pub fn group(&self, path: &str) -> Result<&Group, StoreError> {
        match self.root.resolve(path)? {
            Node::Group(group) => Ok(group),
            Node::Sequence(_) => Err(StoreError::NotAGroup(path.to_string())),
        }
    }

    pub fn group_mut(&mut self, path: &str) -> Result<&mut Group, StoreError> {
        match self.root.resolve_mut(path)? {
            Node::Group(group) => Ok(group),
            Node::Sequence(_) => Err(StoreError::NotAGroup(path.to_string())),
        }
    }

    pub fn sequence(&self, path: &str) -> Result<&Sequence, StoreError> {
        match self.root.resolve(path)? {
            Node::Sequence(seq) => Ok(seq),
            Node::Group(_) => Err(StoreError::NotASequence(path.to_string())),
        }
    }

    pub fn sequence_mut(&mut self, path: &str) -> Result<&mut Sequence, StoreError> {
        match self.root.resolve_mut(path)? {
            Node::Sequence(seq) => Ok(seq),
            Node::Group(_) => Err(StoreError::NotASequence(path.to_string())),
        }
    }

    /// Append an entity to the end of a sequence (drawn on top of the rest)
    pub fn push(&mut self, path: &str, actor: Box<dyn Actor>) -> Result<(), StoreError> {
        let seq = self.sequence_mut(path)?;
        log::debug!("store: push {} into {}", actor.kind(), path);
        seq.push(actor);
        Ok(())
    }

    /// Take an entity out of a sequence, keeping the order of the rest.
    /// `Ok(None)` when the index is past the end.
    pub fn remove(&mut self, path: &str, index: usize) -> Result<Option<Box<dyn Actor>>, StoreError> {
        let seq = self.sequence_mut(path)?;
        if index >= seq.len() {
            return Ok(None);
        }
        let actor = seq.remove(index);
        log::debug!("store: removed {} from {}[{}]", actor.kind(), path, index);
        Ok(Some(actor))
    }

    pub fn entity_count(&self) -> usize {
        self.root.entity_count()
    }

    /// Update and draw every entity in the store. Always succeeds.
    pub fn update_and_draw(&mut self, console: &mut dyn Console, suppress_draw: bool) -> bool {
        let visited = self.root.update_and_draw(console, suppress_draw);
        log::trace!("store: visited {} entities (draw suppressed: {})", visited, suppress_draw);
        true
    }

    /// Same as `update_and_draw` but starting at the node at `path`
    pub fn update_and_draw_at(
        &mut self,
        path: &str,
        console: &mut dyn Console,
        suppress_draw: bool,
    ) -> Result<bool, StoreError> {
        let visited = self.root.resolve_mut(path)?.update_and_draw(console, suppress_draw);
        log::trace!("store: visited {} entities under {}", visited, path);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::testing::RecordingConsole;
    use crate::game::entity::{Entity, EntityConfig};
    use crate::game::variants::Plant;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records its updates and draws into a shared log
    struct Probe {
        name: &'static str,
        entity: Entity,
        log: Log,
    }

    impl Actor for Probe {
        fn entity(&self) -> &Entity {
            &self.entity
        }

        fn entity_mut(&mut self) -> &mut Entity {
            &mut self.entity
        }

        fn kind(&self) -> &'static str {
            "Probe"
        }

        fn update(&mut self, _console: &mut dyn Console) {
            self.log.borrow_mut().push(format!("update {}", self.name));
        }

        fn draw(&self, _console: &mut dyn Console) {
            self.log.borrow_mut().push(format!("draw {}", self.name));
        }
    }

    fn probe(name: &'static str, log: &Log) -> Box<dyn Actor> {
        Box::new(Probe { name, entity: Entity::default(), log: log.clone() })
    }

    /// a/b/c nested three deep, with sequences mixed in at every level
    fn nested_store(log: &Log) -> EntityStore {
        let mut store = EntityStore::new();
        let root = store.root_mut();
        root.insert_sequence("first").unwrap();
        let a = root.insert_group("a").unwrap();
        a.insert_sequence("a_seq").unwrap();
        let b = a.insert_group("b").unwrap();
        let c = b.insert_group("c").unwrap();
        c.insert_sequence("deep").unwrap();
        b.insert_sequence("b_seq").unwrap();
        root.insert_sequence("last").unwrap();

        store.push("first", probe("p1", log)).unwrap();
        store.push("a/a_seq", probe("p2", log)).unwrap();
        store.push("a/b/c/deep", probe("p3", log)).unwrap();
        store.push("a/b/c/deep", probe("p4", log)).unwrap();
        store.push("a/b/b_seq", probe("p5", log)).unwrap();
        store.push("last", probe("p6", log)).unwrap();
        store
    }

    fn updates(log: &Log) -> Vec<String> {
        log.borrow().iter().filter(|l| l.starts_with("update")).cloned().collect()
    }

    #[test]
    fn test_garden_layout_order() {
        let store = EntityStore::garden();
        let top: Vec<&str> = store.root().children().map(|(n, _)| n).collect();
        assert_eq!(top, vec!["plants", "critters", "weeds"]);

        let critters: Vec<&str> = store.group("critters").unwrap().children().map(|(n, _)| n).collect();
        assert_eq!(critters, vec!["squirrels", "crows", "pets"]);

        assert!(store.sequence("critters/pets/dogs").unwrap().is_empty());
        assert_eq!(store.entity_count(), 0);
    }

    #[test]
    fn test_visits_every_entity_once_depth_first() {
        let log = Log::default();
        let mut store = nested_store(&log);
        let mut console = RecordingConsole::new();

        assert!(store.update_and_draw(&mut console, false));
        assert_eq!(
            *log.borrow(),
            vec![
                "update p1", "draw p1",
                "update p2", "draw p2",
                "update p3", "draw p3",
                "update p4", "draw p4",
                "update p5", "draw p5",
                "update p6", "draw p6",
            ]
        );
    }

    #[test]
    fn test_suppress_draw_still_updates() {
        let log = Log::default();
        let mut store = nested_store(&log);
        let mut console = RecordingConsole::new();

        store.update_and_draw(&mut console, true);
        assert_eq!(updates(&log).len(), 6);
        assert!(log.borrow().iter().all(|l| !l.starts_with("draw")));
    }

    #[test]
    fn test_traversal_is_deterministic() {
        let log = Log::default();
        let mut store = nested_store(&log);
        let mut console = RecordingConsole::new();

        store.update_and_draw(&mut console, false);
        let first = log.borrow().clone();
        log.borrow_mut().clear();
        store.update_and_draw(&mut console, false);
        assert_eq!(*log.borrow(), first);
    }

    #[test]
    fn test_rows_with_empty_middle() {
        let mut store = EntityStore::new();
        let root = store.root_mut();
        root.insert_sequence("row1").unwrap();
        root.insert_sequence("row2").unwrap();
        root.insert_sequence("row3").unwrap();
        store.push("row1", Box::new(Plant::new(&EntityConfig { sprite_id: Some(1), ..Default::default() }))).unwrap();
        store.push("row3", Box::new(Plant::new(&EntityConfig { sprite_id: Some(3), ..Default::default() }))).unwrap();

        let mut console = RecordingConsole::new();
        store.update_and_draw(&mut console, false);

        let drawn: Vec<u8> = console.blits().iter().map(|b| b.sprite).collect();
        assert_eq!(drawn, vec![1, 3]);
        assert!(console.traces().is_empty());
    }

    #[test]
    fn test_base_entity_in_store_traces() {
        let mut store = EntityStore::garden();
        store.push("weeds", Box::new(Entity::default())).unwrap();

        let mut console = RecordingConsole::new();
        assert!(store.update_and_draw(&mut console, false));
        assert_eq!(console.traces().len(), 1);
        assert_eq!(console.blits().len(), 1);
    }

    #[test]
    fn test_update_and_draw_at_subtree() {
        let log = Log::default();
        let mut store = nested_store(&log);
        let mut console = RecordingConsole::new();

        assert_eq!(store.update_and_draw_at("a/b", &mut console, false), Ok(true));
        assert_eq!(updates(&log), vec!["update p3", "update p4", "update p5"]);

        log.borrow_mut().clear();
        store.update_and_draw_at("last", &mut console, true).unwrap();
        assert_eq!(*log.borrow(), vec!["update p6"]);

        assert_eq!(
            store.update_and_draw_at("a/nope", &mut console, false),
            Err(StoreError::UnknownGroup("a/nope".to_string()))
        );
    }

    #[test]
    fn test_path_errors() {
        let mut store = EntityStore::garden();
        let plant = || Box::new(Plant::new(&EntityConfig::default())) as Box<dyn Actor>;

        assert_eq!(store.push("", plant()), Err(StoreError::EmptyPath));
        assert_eq!(store.push("plants", plant()), Err(StoreError::NotASequence("plants".to_string())));
        assert_eq!(store.push("weeds/x", plant()), Err(StoreError::NotAGroup("weeds/x".to_string())));
        assert_eq!(store.push("trees/row1", plant()), Err(StoreError::UnknownGroup("trees/row1".to_string())));
        assert_eq!(store.push("plants//row1", plant()), Err(StoreError::UnknownGroup("plants//row1".to_string())));
        assert!(store.group("plants/row1").is_err());
        assert_eq!(store.entity_count(), 0);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut group = Group::new();
        group.insert_sequence("row1").unwrap();
        assert_eq!(group.insert_sequence("row1"), Err(StoreError::DuplicateName("row1".to_string())));
        assert!(group.insert_group("row1").is_err());
    }

    #[test]
    fn test_remove_keeps_order() {
        let log = Log::default();
        let mut store = EntityStore::garden();
        store.push("weeds", probe("w1", &log)).unwrap();
        store.push("weeds", probe("w2", &log)).unwrap();
        store.push("weeds", probe("w3", &log)).unwrap();

        let removed = store.remove("weeds", 1).unwrap();
        assert_eq!(removed.map(|a| a.kind()), Some("Probe"));
        assert!(store.remove("weeds", 5).unwrap().is_none());
        assert_eq!(store.entity_count(), 2);

        let mut console = RecordingConsole::new();
        store.update_and_draw(&mut console, true);
        assert_eq!(updates(&log), vec!["update w1", "update w3"]);
    }

    #[test]
    fn test_entities_mutable_between_frames() {
        let mut store = EntityStore::garden();
        store.push("plants/row2", Box::new(Plant::new(&EntityConfig { sprite_id: Some(0), ..Default::default() }))).unwrap();

        store.sequence_mut("plants/row2").unwrap()[0].entity_mut().set_position(30.0, 40.0);

        let mut console = RecordingConsole::new();
        store.update_and_draw(&mut console, false);
        let blit = console.blits()[0];
        assert_eq!((blit.x, blit.y), (30, 40));
    }
}
