//! Paste targets and session keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a loaded world on the host server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(String);

impl WorldId {
    pub fn new(name: impl Into<String>) -> Self {
        WorldId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for WorldId {
    fn from(name: &str) -> Self {
        WorldId(name.to_string())
    }
}

impl From<String> for WorldId {
    fn from(name: String) -> Self {
        WorldId(name)
    }
}

/// Target coordinate for a paste.
///
/// Immutable once constructed; the session table keys on the full
/// (world, x, y, z) tuple, so a mutable coordinate would corrupt lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PastePos {
    world: WorldId,
    x: i32,
    y: i32,
    z: i32,
}

impl PastePos {
    pub fn new(world: impl Into<WorldId>, x: i32, y: i32, z: i32) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    pub fn world(&self) -> &WorldId {
        &self.world
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn z(&self) -> i32 {
        self.z
    }
}

impl fmt::Display for PastePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {}, {})", self.world, self.x, self.y, self.z)
    }
}
