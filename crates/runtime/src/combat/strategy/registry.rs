//! Strategy dispatch table.

use std::collections::HashMap;
use std::sync::Arc;

use combat_core::special::SpecialAttackKind;
use combat_core::types::CombatType;

use combat_content::npcs::NpcCatalog;

use super::magic::MagicStrategy;
use super::melee::MeleeStrategy;
use super::npc::{FrostWyrmStrategy, GravelordStrategy, NpcStrategy};
use super::ranged::RangedStrategy;
use super::special::{
    AscendanceStrategy, GlaciateStrategy, ReaverStrategy, SunderStrategy, TwinFangStrategy,
};
use super::CombatStrategy;
use crate::world::Actor;

/// Shared, immutable strategy instances resolved per attacker.
///
/// Players get the default strategy for their current gear; NPCs get their
/// definition's keyed strategy or the per-combat-type NPC default; specials
/// dispatch by identity.
pub struct StrategyRegistry {
    melee: Arc<dyn CombatStrategy>,
    ranged: Arc<dyn CombatStrategy>,
    magic: Arc<dyn CombatStrategy>,
    npc_melee: Arc<dyn CombatStrategy>,
    npc_ranged: Arc<dyn CombatStrategy>,
    npc_magic: Arc<dyn CombatStrategy>,
    named: HashMap<String, Arc<dyn CombatStrategy>>,
    specials: HashMap<SpecialAttackKind, Arc<dyn CombatStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        let mut named: HashMap<String, Arc<dyn CombatStrategy>> = HashMap::new();
        named.insert("frost_wyrm".into(), Arc::new(FrostWyrmStrategy));
        named.insert("gravelord".into(), Arc::new(GravelordStrategy));

        let mut specials: HashMap<SpecialAttackKind, Arc<dyn CombatStrategy>> = HashMap::new();
        specials.insert(SpecialAttackKind::TwinFang, Arc::new(TwinFangStrategy));
        specials.insert(SpecialAttackKind::Sunder, Arc::new(SunderStrategy));
        specials.insert(SpecialAttackKind::Glaciate, Arc::new(GlaciateStrategy));
        specials.insert(SpecialAttackKind::Reaver, Arc::new(ReaverStrategy));
        specials.insert(SpecialAttackKind::Ascendance, Arc::new(AscendanceStrategy));

        Self {
            melee: Arc::new(MeleeStrategy),
            ranged: Arc::new(RangedStrategy),
            magic: Arc::new(MagicStrategy),
            npc_melee: Arc::new(NpcStrategy::new(CombatType::Melee)),
            npc_ranged: Arc::new(NpcStrategy::new(CombatType::Ranged)),
            npc_magic: Arc::new(NpcStrategy::new(CombatType::Magic)),
            named,
            specials,
        }
    }

    /// Validate a catalog's strategy keys against the table, warning about
    /// unknown ones (those NPCs fall back to their combat-type default).
    pub fn verify_catalog(&self, catalog: &NpcCatalog) {
        for npc in catalog.iter() {
            if let Some(key) = &npc.strategy
                && !self.named.contains_key(key)
            {
                tracing::warn!(
                    target: "runtime::combat",
                    npc = npc.id,
                    key = %key,
                    "unknown strategy key, using combat-type default"
                );
            }
        }
    }

    /// Install or replace a keyed NPC strategy.
    pub fn register_named(&mut self, key: impl Into<String>, strategy: Arc<dyn CombatStrategy>) {
        self.named.insert(key.into(), strategy);
    }

    /// Strategy for an actor's next engagement, from its current state.
    pub fn resolve(&self, actor: &Actor) -> Arc<dyn CombatStrategy> {
        if let Some(npc) = &actor.npc {
            if let Some(key) = &npc.strategy_key
                && let Some(strategy) = self.named.get(key)
            {
                return strategy.clone();
            }
            return match npc.combat_type {
                CombatType::Melee => self.npc_melee.clone(),
                CombatType::Ranged => self.npc_ranged.clone(),
                CombatType::Magic => self.npc_magic.clone(),
            };
        }
        match actor.combat_type() {
            CombatType::Melee => self.melee.clone(),
            CombatType::Ranged => self.ranged.clone(),
            CombatType::Magic => self.magic.clone(),
        }
    }

    /// One-shot override strategy for a special attack.
    pub fn special(&self, kind: SpecialAttackKind) -> Arc<dyn CombatStrategy> {
        match self.specials.get(&kind) {
            Some(strategy) => strategy.clone(),
            // The table covers every identity; reaching here means a new
            // variant was added without a strategy. Degrade to a normal hit.
            None => self.melee.clone(),
        }
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
