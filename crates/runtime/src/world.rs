//! Actor registry and live actor state.
//!
//! The [`World`] owns every combat-capable actor. Tasks hold [`ActorId`]
//! handles, never references, and revalidate them against the registry each
//! slice; a despawn between two slices is normal, not an error.

use std::collections::HashMap;

use combat_core::config::CombatConfig;
use combat_core::formulas;
use combat_core::snapshot::{
    CombatSnapshot, EquipmentBonuses, Levels, OverheadPrayers, PrayerBoosts, SetEffect,
    SpecialMultipliers, Weaken,
};
use combat_core::special::SpecialAttackKind;
use combat_core::types::{ActorId, ActorKind, CombatType, FightStyle, Position, Tick, WeaponClass};

use combat_content::npcs::NpcCombatDefinition;
use combat_content::weapons::WeaponDefinition;

use crate::combat::controller::CombatController;

/// Combat-relevant view of the equipped weapon.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponProfile {
    pub id: u32,
    pub class: WeaponClass,
    /// Ticks between attacks.
    pub speed: u32,
    pub special: Option<SpecialAttackKind>,
    pub poisonous: bool,
}

impl Default for WeaponProfile {
    fn default() -> Self {
        Self {
            id: 0,
            class: WeaponClass::Unarmed,
            speed: 4,
            special: None,
            poisonous: false,
        }
    }
}

impl From<&WeaponDefinition> for WeaponProfile {
    fn from(def: &WeaponDefinition) -> Self {
        Self {
            id: def.id,
            class: def.class,
            speed: def.speed,
            special: def.special,
            poisonous: def.poisonous,
        }
    }
}

/// Combat-relevant view of an NPC definition, denormalized onto the actor so
/// fights never reach back into the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct NpcProfile {
    pub definition_id: u32,
    pub max_hit: u32,
    pub attack_speed: u32,
    pub combat_type: CombatType,
    pub attack_distance: Option<u32>,
    pub leash_radius: u32,
    pub aggressive: bool,
    pub strategy_key: Option<String>,
}

impl From<&NpcCombatDefinition> for NpcProfile {
    fn from(def: &NpcCombatDefinition) -> Self {
        Self {
            definition_id: def.id,
            max_hit: def.max_hit,
            attack_speed: def.attack_speed,
            combat_type: def.combat_type,
            attack_distance: def.attack_distance,
            leash_radius: def.leash_radius,
            aggressive: def.aggressive,
            strategy_key: def.strategy.clone(),
        }
    }
}

/// A spell prepared for autocasting.
#[derive(Debug, Clone, PartialEq)]
pub struct Spell {
    pub projectile: u32,
    /// Spells carry their own damage cap; the strength formula never applies.
    pub max_hit: u32,
    /// Flat experience yield per cast, on top of the damage-scaled portion.
    pub base_experience: f64,
    /// Debuff applied through the on-success hook, e.g. weaken spells.
    pub weaken: Option<Weaken>,
}

/// Movement intents and restrictions owned by the movement collaborator.
/// Combat reads them for gating and writes follow/facing intents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Movement {
    pub follow: Option<ActorId>,
    pub facing: Option<ActorId>,
    pub frozen_until: Tick,
    /// Set while the actor is mid-teleport; attacks against it soft-fail.
    pub teleporting: bool,
}

impl Movement {
    pub fn is_frozen(&self, now: Tick) -> bool {
        now < self.frozen_until
    }
}

/// One live combat-capable actor.
#[derive(Debug)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub name: String,
    pub position: Position,
    pub spawn_point: Position,

    pub levels: Levels,
    pub health: u32,
    pub max_health: u32,
    pub combat_level: u32,

    pub bonuses: EquipmentBonuses,
    pub weapon: WeaponProfile,
    pub ammo: u32,
    pub spell: Option<Spell>,

    pub prayers: PrayerBoosts,
    pub overheads: OverheadPrayers,
    /// Prayer points backing the overheads; smite drains these.
    pub devotion: u32,

    pub fight_style: FightStyle,
    pub set_effect: Option<SetEffect>,

    pub special_energy: u32,
    /// Multipliers from an active activation-only special.
    pub special_boost: Option<SpecialMultipliers>,

    pub run_energy: u32,
    /// Guards against poison stacking; cleared when the poison task ends.
    pub poisoned: bool,
    pub weaken: Option<Weaken>,

    pub auto_retaliate: bool,
    pub movement: Movement,

    pub npc: Option<NpcProfile>,
    pub combat: CombatController,
}

impl Actor {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Apply damage, capped at remaining health. Returns the amount that
    /// actually landed.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.health);
        self.health -= applied;
        applied
    }

    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.max_health - self.health);
        self.health += healed;
        healed
    }

    /// Pipeline this actor's attacks resolve through.
    pub fn combat_type(&self) -> CombatType {
        if let Some(npc) = &self.npc {
            return npc.combat_type;
        }
        if self.weapon.class == WeaponClass::Staff && self.spell.is_some() {
            return CombatType::Magic;
        }
        if self.weapon.class.is_ranged() {
            return CombatType::Ranged;
        }
        CombatType::Melee
    }

    /// Ticks between attacks.
    pub fn attack_speed(&self) -> u32 {
        match &self.npc {
            Some(npc) => npc.attack_speed,
            None => self.weapon.speed,
        }
    }

    /// Reach in tiles. NPC definitions may override their class default.
    pub fn attack_reach(&self) -> u32 {
        match &self.npc {
            Some(npc) => npc
                .attack_distance
                .unwrap_or(match npc.combat_type {
                    CombatType::Melee => 1,
                    CombatType::Ranged => 7,
                    CombatType::Magic => 8,
                }),
            None => formulas::attack_distance(self.weapon.class),
        }
    }

    /// Freeze the formula-relevant state into an immutable snapshot.
    pub fn snapshot(&self) -> CombatSnapshot {
        CombatSnapshot {
            kind: self.kind,
            levels: self.levels,
            health: self.health,
            max_health: self.max_health,
            bonuses: self.bonuses,
            prayers: self.prayers,
            overheads: self.overheads,
            fight_style: self.fight_style,
            special: self.special_boost.unwrap_or_default(),
            set_effect: self.set_effect,
            weaken: self.weaken,
            npc_max_hit: self.npc.as_ref().map(|n| n.max_hit),
            combat_level: self.combat_level,
        }
    }
}

/// Immutable description used to register a new actor.
#[derive(Debug, Clone)]
pub struct ActorBlueprint {
    pub kind: ActorKind,
    pub name: String,
    pub position: Position,
    pub levels: Levels,
    pub bonuses: EquipmentBonuses,
    pub weapon: WeaponProfile,
    pub combat_level: u32,
    pub auto_retaliate: bool,
    pub npc: Option<NpcProfile>,
}

impl ActorBlueprint {
    pub fn player(name: impl Into<String>, levels: Levels) -> Self {
        Self {
            kind: ActorKind::Player,
            name: name.into(),
            position: Position::default(),
            levels,
            bonuses: EquipmentBonuses::default(),
            weapon: WeaponProfile::default(),
            combat_level: levels.attack.max(levels.ranged).max(levels.magic),
            auto_retaliate: true,
            npc: None,
        }
    }

    pub fn npc(def: &NpcCombatDefinition) -> Self {
        Self {
            kind: ActorKind::Npc,
            name: def.name.clone(),
            position: Position::default(),
            levels: def.levels,
            bonuses: EquipmentBonuses::default(),
            weapon: WeaponProfile::default(),
            combat_level: def.combat_level,
            auto_retaliate: true,
            npc: Some(NpcProfile::from(def)),
        }
    }

    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_weapon(mut self, weapon: WeaponProfile) -> Self {
        self.weapon = weapon;
        self
    }

    #[must_use]
    pub fn with_bonuses(mut self, bonuses: EquipmentBonuses) -> Self {
        self.bonuses = bonuses;
        self
    }
}

/// Registry of live actors.
#[derive(Default)]
pub struct World {
    actors: HashMap<ActorId, Actor>,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an actor and hand back its id. Ids are never reused within a
    /// session.
    pub fn spawn(&mut self, blueprint: ActorBlueprint, config: &CombatConfig) -> ActorId {
        self.next_id += 1;
        let id = ActorId::new(self.next_id);
        let actor = Actor {
            id,
            kind: blueprint.kind,
            name: blueprint.name,
            position: blueprint.position,
            spawn_point: blueprint.position,
            levels: blueprint.levels,
            health: blueprint.levels.hitpoints,
            max_health: blueprint.levels.hitpoints,
            combat_level: blueprint.combat_level,
            bonuses: blueprint.bonuses,
            weapon: blueprint.weapon,
            ammo: 0,
            spell: None,
            prayers: PrayerBoosts::default(),
            overheads: OverheadPrayers::default(),
            devotion: blueprint.levels.hitpoints,
            fight_style: FightStyle::default(),
            set_effect: None,
            special_energy: CombatConfig::MAX_SPECIAL_ENERGY,
            special_boost: None,
            run_energy: 100,
            poisoned: false,
            weaken: None,
            auto_retaliate: blueprint.auto_retaliate,
            movement: Movement::default(),
            npc: blueprint.npc,
            combat: CombatController::new(config.damage_cache_timeout),
        };
        self.actors.insert(id, actor);
        id
    }

    /// Deregister an actor. Tasks holding the id observe the removal on
    /// their next slice.
    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        self.actors.remove(&id)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn is_alive(&self, id: ActorId) -> bool {
        self.actors.get(&id).is_some_and(Actor::is_alive)
    }

    /// Ids in ascending order, for deterministic iteration.
    pub fn ids(&self) -> Vec<ActorId> {
        let mut ids: Vec<ActorId> = self.actors.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Living actors within `radius` tiles of `center`, ascending by id.
    pub fn actors_within(&self, center: Position, radius: u32) -> Vec<ActorId> {
        let mut ids: Vec<ActorId> = self
            .actors
            .values()
            .filter(|a| a.is_alive() && a.position.within(center, radius))
            .map(|a| a.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_player() -> (World, ActorId) {
        let mut world = World::new();
        let config = CombatConfig::new();
        let id = world.spawn(
            ActorBlueprint::player("tester", Levels::uniform(60)),
            &config,
        );
        (world, id)
    }

    #[test]
    fn damage_caps_at_remaining_health() {
        let (mut world, id) = world_with_player();
        let actor = world.get_mut(id).unwrap();
        assert_eq!(actor.apply_damage(45), 45);
        assert_eq!(actor.apply_damage(45), 15);
        assert!(!actor.is_alive());
    }

    #[test]
    fn heal_caps_at_max_health() {
        let (mut world, id) = world_with_player();
        let actor = world.get_mut(id).unwrap();
        actor.apply_damage(20);
        assert_eq!(actor.heal(50), 20);
        assert_eq!(actor.health, actor.max_health);
    }

    #[test]
    fn combat_type_follows_weapon_and_spell() {
        let (mut world, id) = world_with_player();
        let actor = world.get_mut(id).unwrap();
        assert_eq!(actor.combat_type(), CombatType::Melee);

        actor.weapon.class = WeaponClass::Shortbow;
        assert_eq!(actor.combat_type(), CombatType::Ranged);

        // A staff alone still whacks; the spell switches the pipeline.
        actor.weapon.class = WeaponClass::Staff;
        assert_eq!(actor.combat_type(), CombatType::Melee);
        actor.spell = Some(Spell {
            projectile: 1,
            max_hit: 8,
            base_experience: 30.0,
            weaken: None,
        });
        assert_eq!(actor.combat_type(), CombatType::Magic);
    }

    #[test]
    fn ids_are_never_reused() {
        let (mut world, id) = world_with_player();
        world.remove(id);
        let config = CombatConfig::new();
        let next = world.spawn(
            ActorBlueprint::player("second", Levels::uniform(10)),
            &config,
        );
        assert_ne!(id, next);
    }
}
