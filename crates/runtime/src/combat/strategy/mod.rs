//! Polymorphic combat behavior.
//!
//! A [`CombatStrategy`] decides how one attack executes: preconditions,
//! timing, reach, the hit plan, and hooks around resolution. Default
//! strategies cover the three combat types for players and NPCs; bespoke
//! NPC behaviors and special attacks override the hooks they need.
//! Strategies are stateless and shared as `Arc`s through the
//! [`StrategyRegistry`].

mod magic;
mod melee;
mod npc;
mod ranged;
mod registry;
mod special;

pub use registry::StrategyRegistry;

use combat_core::error::CombatError;
use combat_core::hit::HitPlan;
use combat_core::snapshot::CombatSnapshot;
use combat_core::types::ActorId;

use crate::context::CombatContext;
use crate::events::DeclineReason;
use crate::world::Actor;

pub trait CombatStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Ticks between attacks when this strategy drives the session.
    fn attack_delay(&self, actor: &Actor) -> u32 {
        actor.attack_speed()
    }

    /// Reach in tiles.
    fn attack_distance(&self, actor: &Actor) -> u32 {
        actor.attack_reach()
    }

    /// Precondition check on the firing tick (ammo, prepared spell, ...).
    fn can_attack(&self, _ctx: &CombatContext<'_>, _attacker: ActorId, _victim: ActorId) -> bool {
        true
    }

    /// Reason reported when [`Self::can_attack`] refuses.
    fn decline_reason(&self) -> Option<DeclineReason> {
        None
    }

    /// Execute the attack: roll accuracy and damage, build the hit plan.
    fn attack(
        &self,
        ctx: &mut CombatContext<'_>,
        attacker: ActorId,
        victim: ActorId,
    ) -> Result<HitPlan, CombatError>;

    /// Transform the plan just before it lands.
    fn before_hit(
        &self,
        _ctx: &mut CombatContext<'_>,
        _attacker: ActorId,
        _victim: ActorId,
        _plan: &mut HitPlan,
    ) {
    }

    /// Runs after an accurate plan landed, with the damage actually applied.
    fn on_success(
        &self,
        _ctx: &mut CombatContext<'_>,
        _attacker: ActorId,
        _victim: ActorId,
        _damage: u32,
    ) {
    }

    /// Runs after every resolution, accurate or not.
    fn after_hit(&self, _ctx: &mut CombatContext<'_>, _attacker: ActorId, _victim: ActorId) {}
}

/// Snapshot both sides of an attack, or fail if either despawned mid-swing.
pub(crate) fn snapshots(
    ctx: &CombatContext<'_>,
    attacker: ActorId,
    victim: ActorId,
) -> Result<(CombatSnapshot, CombatSnapshot), CombatError> {
    let atk = ctx
        .world
        .get(attacker)
        .ok_or(CombatError::ActorVanished { actor: attacker })?
        .snapshot();
    let vic = ctx
        .world
        .get(victim)
        .ok_or(CombatError::ActorVanished { actor: victim })?
        .snapshot();
    Ok((atk, vic))
}
