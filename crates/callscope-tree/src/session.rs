//! Session-wide exploration state shared by the tree components.

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which edges of the call graph the tree follows when a node is expanded.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum Direction {
    /// Follow outgoing edges: what does this symbol call.
    #[strum(serialize = "outgoing")]
    #[serde(rename = "outgoing")]
    CallsFrom,
    /// Follow incoming edges: who calls this symbol.
    #[default]
    #[strum(serialize = "incoming")]
    #[serde(rename = "incoming")]
    CallsTo,
}

impl Direction {
    /// Returns the other direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::CallsFrom => Self::CallsTo,
            Self::CallsTo => Self::CallsFrom,
        }
    }

    /// Short tag used when composing node identities.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::CallsFrom => "outgoing",
            Self::CallsTo => "incoming",
        }
    }

    const fn to_bits(self) -> u8 {
        match self {
            Self::CallsFrom => 0,
            Self::CallsTo => 1,
        }
    }

    const fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Self::CallsFrom,
            _ => Self::CallsTo,
        }
    }
}

/// Shared state for one call hierarchy session.
///
/// The host owns the direction toggle; the data source, identity provider and
/// accessibility provider read it afresh on every call, so flipping it takes
/// effect on the next expansion without rebuilding any component.
#[derive(Debug)]
pub struct SessionContext {
    direction: AtomicU8,
}

impl SessionContext {
    /// Creates a session starting in the given direction.
    #[must_use]
    pub const fn new(direction: Direction) -> Self {
        Self {
            direction: AtomicU8::new(direction.to_bits()),
        }
    }

    /// Returns the current direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        Direction::from_bits(self.direction.load(Ordering::Acquire))
    }

    /// Replaces the current direction.
    pub fn set_direction(&self, direction: Direction) {
        self.direction.store(direction.to_bits(), Ordering::Release);
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(Direction::default())
    }
}
