//! NPC combat definition catalog.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use combat_core::snapshot::Levels;
use combat_core::types::CombatType;

/// Combat-relevant portion of an NPC definition.
///
/// Everything the combat runtime needs to fight an NPC: ratings, the
/// definition-supplied damage cap, timing, leash, aggression, and the
/// optional key naming a bespoke strategy in the runtime dispatch table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcCombatDefinition {
    pub id: u32,
    pub name: String,
    pub combat_level: u32,
    pub levels: Levels,
    pub max_hit: u32,
    /// Ticks between attacks.
    pub attack_speed: u32,
    pub combat_type: CombatType,
    /// Reach override in tiles; defaults per combat type when absent.
    pub attack_distance: Option<u32>,
    /// Maximum distance from the spawn point before the NPC disengages and
    /// walks home.
    pub leash_radius: u32,
    /// Initiates combat against nearby players.
    pub aggressive: bool,
    /// Key into the runtime strategy dispatch table; `None` selects the
    /// default strategy for `combat_type`.
    pub strategy: Option<String>,
}

/// RON file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NpcFile {
    npcs: Vec<NpcCombatDefinition>,
}

/// Indexed NPC catalog.
#[derive(Debug, Clone, Default)]
pub struct NpcCatalog {
    by_id: HashMap<u32, NpcCombatDefinition>,
}

impl NpcCatalog {
    /// Parse a catalog from RON text.
    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        let file: NpcFile = ron::from_str(text).context("failed to parse NPC catalog RON")?;
        let mut by_id = HashMap::with_capacity(file.npcs.len());
        for npc in file.npcs {
            anyhow::ensure!(
                by_id.insert(npc.id, npc.clone()).is_none(),
                "duplicate NPC id {}",
                npc.id
            );
        }
        Ok(Self { by_id })
    }

    /// The catalog shipped with the crate.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_ron(include_str!("../data/npcs.ron"))
    }

    pub fn get(&self, id: u32) -> Option<&NpcCombatDefinition> {
        self.by_id.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NpcCombatDefinition> {
        self.by_id.values()
    }

    /// Ids of NPCs that initiate combat on proximity, for the spawning
    /// collaborator.
    pub fn aggressive_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .by_id
            .values()
            .filter(|n| n.aggressive)
            .map(|n| n.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_parses() {
        let catalog = NpcCatalog::embedded().expect("embedded catalog must parse");
        assert!(catalog.get(1).is_some());
        assert!(!catalog.aggressive_ids().is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let text = r#"(npcs: [
            (id: 1, name: "a", combat_level: 5,
             levels: (attack: 5, strength: 5, defence: 5, ranged: 1, magic: 1, hitpoints: 10),
             max_hit: 2, attack_speed: 4, combat_type: Melee, attack_distance: None,
             leash_radius: 8, aggressive: false, strategy: None),
            (id: 1, name: "b", combat_level: 5,
             levels: (attack: 5, strength: 5, defence: 5, ranged: 1, magic: 1, hitpoints: 10),
             max_hit: 2, attack_speed: 4, combat_type: Melee, attack_distance: None,
             leash_radius: 8, aggressive: false, strategy: None),
        ])"#;
        assert!(NpcCatalog::from_ron(text).is_err());
    }
}
