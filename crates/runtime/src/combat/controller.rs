//! Per-actor combat orchestration state.
//!
//! Every actor owns one [`CombatController`]. It tracks the current victim,
//! the active strategy, the attack and cooldown timers, the queued special,
//! and the victim-side damage attribution cache. The controller is plain
//! state; the attack session and resolution tasks drive it.

use std::sync::Arc;

use combat_core::damage_cache::DamageCache;
use combat_core::special::SpecialAttackKind;
use combat_core::types::{ActorId, ActorKind, Tick};

use crate::combat::effects;
use crate::combat::session::ApproachTask;
use crate::combat::strategy::CombatStrategy;
use crate::context::CombatContext;
use crate::events::{DeclineReason, GameEvent, StatusEffect, animation};
use crate::scheduler::{Repeat, TaskHandle};
use crate::world::World;

/// Ticks after the last incoming hit during which an actor still counts as
/// being attacked (about five seconds).
pub(crate) const IN_COMBAT_WINDOW: u64 = 8;

pub struct CombatController {
    pub(crate) victim: Option<ActorId>,
    pub(crate) last_attacker: Option<ActorId>,
    pub(crate) last_attacked_at: Option<Tick>,
    pub(crate) strategy: Option<Arc<dyn CombatStrategy>>,
    pub(crate) queued_special: Option<SpecialAttackKind>,
    /// Ticks until the next swing; attacks fire when this reaches zero.
    pub(crate) attack_timer: u32,
    /// Post-interruption grace; the session winds down while this drains.
    pub(crate) cooldown: u32,
    pub(crate) damage_cache: DamageCache,
    pub(crate) session: Option<TaskHandle>,
    pub(crate) approach: Option<TaskHandle>,
}

impl std::fmt::Debug for CombatController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatController")
            .field("victim", &self.victim)
            .field("last_attacker", &self.last_attacker)
            .field("attack_timer", &self.attack_timer)
            .field("cooldown", &self.cooldown)
            .finish_non_exhaustive()
    }
}

impl CombatController {
    pub fn new(cache_timeout: u64) -> Self {
        Self {
            victim: None,
            last_attacker: None,
            last_attacked_at: None,
            strategy: None,
            queued_special: None,
            attack_timer: 0,
            cooldown: 0,
            damage_cache: DamageCache::new(cache_timeout),
            session: None,
            approach: None,
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.victim.is_some()
    }

    pub fn victim(&self) -> Option<ActorId> {
        self.victim
    }

    pub fn last_attacker(&self) -> Option<ActorId> {
        self.last_attacker
    }

    pub fn is_being_attacked(&self, now: Tick) -> bool {
        self.last_attacked_at
            .is_some_and(|at| now.since(at) < IN_COMBAT_WINDOW)
    }

    pub fn in_combat(&self, now: Tick) -> bool {
        self.is_attacking() || self.is_being_attacked(now)
    }

    pub fn queued_special(&self) -> Option<SpecialAttackKind> {
        self.queued_special
    }

    pub fn damage_cache(&self) -> &DamageCache {
        &self.damage_cache
    }

    pub fn damage_cache_mut(&mut self) -> &mut DamageCache {
        &mut self.damage_cache
    }

    pub(crate) fn record_attacked_by(&mut self, attacker: ActorId, now: Tick) {
        self.last_attacker = Some(attacker);
        self.last_attacked_at = Some(now);
    }

    /// Return to `Idle`: cancel the session and approach tasks, drop the
    /// victim, strategy, and timers. Idempotent. The damage cache survives a
    /// reset; it only clears on death.
    pub fn reset(&mut self) {
        if let Some(handle) = self.session.take() {
            handle.cancel();
        }
        if let Some(handle) = self.approach.take() {
            handle.cancel();
        }
        self.victim = None;
        self.strategy = None;
        self.queued_special = None;
        self.attack_timer = 0;
        self.cooldown = 0;
    }

}

/// Reset an actor's combat state and clear its follow intent.
pub(crate) fn reset_combat(world: &mut World, id: ActorId) {
    if let Some(actor) = world.get_mut(id) {
        actor.combat.reset();
        actor.movement.follow = None;
    }
}

/// Enter the post-interruption grace phase without a full reset: arm the
/// countdown, drop the follow intent, and optionally re-arm the attack timer
/// to the strategy's delay. The session keeps running and resets once the
/// grace drains.
pub(crate) fn begin_cooldown(world: &mut World, id: ActorId, ticks: u32, reset_timer: bool) {
    let Some(actor) = world.get_mut(id) else {
        return;
    };
    let delay = actor.combat.strategy.clone().map(|s| s.attack_delay(actor));
    actor.combat.cooldown = ticks;
    actor.movement.follow = None;
    if reset_timer && let Some(delay) = delay {
        actor.combat.attack_timer = delay;
    }
}

fn decline(ctx: &CombatContext<'_>, actor: ActorId, target: ActorId, reason: DeclineReason) {
    ctx.events.publish(GameEvent::AttackDeclined {
        actor,
        target,
        reason,
    });
}

/// Begin or retarget an engagement.
///
/// Sets the victim and follow intent, resolves the strategy from current
/// gear, and schedules the proximity-wait task when no session is active.
/// Re-targeting the current victim while already in range only re-faces.
pub(crate) fn attack(ctx: &mut CombatContext<'_>, attacker_id: ActorId, target_id: ActorId) {
    if attacker_id == target_id {
        decline(ctx, attacker_id, target_id, DeclineReason::SelfTarget);
        return;
    }
    let Some(target) = ctx.world.get(target_id) else {
        decline(ctx, attacker_id, target_id, DeclineReason::TargetMissing);
        return;
    };
    if !target.is_alive() {
        decline(ctx, attacker_id, target_id, DeclineReason::TargetDead);
        return;
    }
    let target_position = target.position;

    let Some(attacker) = ctx.world.get(attacker_id) else {
        return;
    };
    if !attacker.is_alive() {
        return;
    }

    let strategy = ctx.strategies.resolve(attacker);
    let speed = strategy.attack_delay(attacker);
    let in_range = attacker
        .position
        .within(target_position, strategy.attack_distance(attacker));
    let retarget_in_place = attacker.combat.victim == Some(target_id) && in_range;
    let needs_watcher =
        attacker.combat.session.is_none() && attacker.combat.approach.is_none();

    let watcher = (!retarget_in_place && needs_watcher).then(|| {
        ctx.spawn_task(
            1,
            Repeat::EveryTick,
            ApproachTask {
                attacker: attacker_id,
            },
        )
    });

    // First borrow ended above; re-enter mutably to commit.
    let Some(attacker) = ctx.world.get_mut(attacker_id) else {
        return;
    };
    // An explicit order overrides the wind-down grace; the new fight starts
    // with a full wind-up.
    if attacker.combat.cooldown > 0 {
        attacker.combat.cooldown = 0;
        attacker.combat.attack_timer = speed;
    }
    attacker.combat.victim = Some(target_id);
    attacker.combat.strategy = Some(strategy);
    attacker.movement.facing = Some(target_id);
    if retarget_in_place {
        attacker.movement.follow = None;
        return;
    }
    attacker.movement.follow = Some(target_id);
    if let Some(handle) = watcher {
        attacker.combat.approach = Some(handle);
    }
}

/// Queue the equipped weapon's special attack, or fire it immediately for
/// activation-only specials.
pub(crate) fn queue_special(ctx: &mut CombatContext<'_>, actor_id: ActorId) {
    let Some(actor) = ctx.world.get(actor_id) else {
        return;
    };
    if actor.kind != ActorKind::Player || !actor.is_alive() {
        return;
    }
    let Some(kind) = actor.weapon.special else {
        tracing::debug!(
            target: "runtime::combat",
            actor = %actor_id,
            "special requested for a weapon without one"
        );
        return;
    };
    if actor.special_energy < kind.energy_cost() {
        decline(ctx, actor_id, actor_id, DeclineReason::NotEnoughEnergy);
        return;
    }

    if kind.is_activation_only() {
        activate_buff_special(ctx, actor_id, kind);
        return;
    }

    if let Some(actor) = ctx.world.get_mut(actor_id) {
        actor.combat.queued_special = Some(kind);
    }
}

/// Activation-only specials trade energy and the caster's own ratings for a
/// timed strength buff; they never override an attack.
fn activate_buff_special(ctx: &mut CombatContext<'_>, actor_id: ActorId, kind: SpecialAttackKind) {
    let remaining = {
        let Some(actor) = ctx.world.get_mut(actor_id) else {
            return;
        };
        actor.special_energy -= kind.energy_cost();
        actor.levels.attack = (actor.levels.attack * 9 / 10).max(1);
        actor.levels.defence = (actor.levels.defence * 9 / 10).max(1);
        actor.special_boost = Some(combat_core::snapshot::SpecialMultipliers {
            accuracy: 1.0,
            strength: 1.25,
        });
        actor.special_energy
    };
    effects::expire_special_boost(ctx, actor_id, effects::ASCENDANCE_DURATION);
    ctx.events.publish(GameEvent::SpecialDrained {
        actor: actor_id,
        kind,
        remaining,
    });
    ctx.events.publish(GameEvent::StatusApplied {
        actor: actor_id,
        status: StatusEffect::Ascended,
    });
    ctx.events.publish(GameEvent::AnimationPlayed {
        actor: actor_id,
        animation: animation::SPECIAL,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    use combat_core::config::CombatConfig;
    use combat_core::snapshot::Levels;

    use crate::combat::strategy::StrategyRegistry;
    use crate::world::ActorBlueprint;

    #[test]
    fn cooldown_entry_clears_follow_and_rearms_the_timer() {
        let mut world = World::new();
        let config = CombatConfig::new();
        let id = world.spawn(
            ActorBlueprint::player("tester", Levels::uniform(60)),
            &config,
        );
        let strategy = StrategyRegistry::new().resolve(world.get(id).unwrap());
        let actor = world.get_mut(id).unwrap();
        actor.combat.victim = Some(ActorId::new(9));
        actor.combat.strategy = Some(strategy);
        actor.combat.attack_timer = 1;
        actor.movement.follow = Some(ActorId::new(9));

        begin_cooldown(&mut world, id, 10, true);

        let actor = world.get(id).unwrap();
        assert_eq!(actor.combat.cooldown, 10);
        assert!(actor.movement.follow.is_none());
        assert_eq!(actor.combat.attack_timer, actor.attack_speed());
    }

    #[test]
    fn reset_is_idempotent_and_total() {
        let mut controller = CombatController::new(100);
        controller.victim = Some(ActorId::new(7));
        controller.attack_timer = 3;
        controller.cooldown = 5;
        controller.queued_special = Some(SpecialAttackKind::TwinFang);

        controller.reset();
        controller.reset();

        assert!(!controller.is_attacking());
        assert!(controller.strategy.is_none());
        assert_eq!(controller.attack_timer, 0);
        assert_eq!(controller.cooldown, 0);
        assert!(controller.queued_special.is_none());
    }

    #[test]
    fn being_attacked_window_expires() {
        let mut controller = CombatController::new(100);
        controller.record_attacked_by(ActorId::new(3), Tick(10));
        assert!(controller.is_being_attacked(Tick(10 + IN_COMBAT_WINDOW - 1)));
        assert!(!controller.is_being_attacked(Tick(10 + IN_COMBAT_WINDOW)));
    }

    #[test]
    fn damage_cache_survives_reset() {
        let mut controller = CombatController::new(100);
        controller
            .damage_cache_mut()
            .add(ActorId::new(2), ActorKind::Player, 10, Tick(1));
        controller.reset();
        assert!(!controller.damage_cache().is_empty());
    }
}
