//! Actors, items and their identifiers

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for actor instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Unique identifier for item instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// Unique identifier for maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "map#{}", self.0)
    }
}

/// Tile position on a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A living (or undead) creature placed on a map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    /// Model name, e.g. "zombie" or "police officer"
    pub model: String,
    pub name: String,
    pub position: Point,
    /// Set by whoever spawned a named one-of-a-kind actor
    pub is_unique: bool,
    pub is_dead: bool,
}

impl Actor {
    pub fn new(id: ActorId, model: impl Into<String>, name: impl Into<String>, position: Point) -> Self {
        Self {
            id,
            model: model.into(),
            name: name.into(),
            position,
            is_unique: false,
            is_dead: false,
        }
    }

    /// Mark as a named unique actor
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }
}

/// An item lying somewhere in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub model: String,
    pub is_unique: bool,
}

impl Item {
    pub fn new(id: ItemId, model: impl Into<String>) -> Self {
        Self {
            id,
            model: model.into(),
            is_unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }
}
