//! Zone rules consulted by engagement validation.
//!
//! The world collaborator decides where multi-combat applies, how deep into
//! the wilderness a tile sits, and whether a pairing is permitted at all
//! (minigame hook). The combat runtime only consumes this interface.

use crate::types::{ActorId, Position};

/// Axis-aligned tile rectangle, inclusive on both corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneRect {
    pub min: Position,
    pub max: Position,
}

impl ZoneRect {
    pub const fn new(min: Position, max: Position) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }
}

/// Spatial combat rules oracle.
pub trait ZoneOracle: Send + Sync {
    /// True when several attackers may engage the same victim on this tile.
    fn multi_combat(&self, pos: Position) -> bool;

    /// Wilderness depth of the tile; zero outside the wilderness. Player
    /// versus player combat requires both sides' combat-level gap to fit
    /// within the shallower of the two depths.
    fn wilderness_level(&self, pos: Position) -> u32;

    /// Minigame-style override: may `attacker` hit `victim` here at all?
    fn attack_permitted(&self, _attacker: ActorId, _victim: ActorId) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_inclusive() {
        let rect = ZoneRect::new(Position::new(0, 0), Position::new(10, 10));
        assert!(rect.contains(Position::new(0, 0)));
        assert!(rect.contains(Position::new(10, 10)));
        assert!(!rect.contains(Position::new(11, 10)));
    }
}
