//! Status effects as schedulable tasks.
//!
//! Poison ticks damage over time, freezes pin movement, weakens cut one
//! rating until a timed expiry. Application entry points live here so every
//! strategy and hook applies effects the same way.

use combat_core::hit::DamageKind;
use combat_core::snapshot::Weaken;
use combat_core::types::{ActorId, Tick};

use crate::combat::resolution;
use crate::context::CombatContext;
use crate::events::{GameEvent, StatusEffect};
use crate::scheduler::{Repeat, Task, TaskState};

/// Ticks between poison damage pulses.
const POISON_INTERVAL: u64 = 5;
/// Pulses one poison application delivers.
const POISON_PULSES: u32 = 4;
/// Ticks an activation-only special buff lasts.
pub(crate) const ASCENDANCE_DURATION: u64 = 100;

/// Poison the target. No-op while an earlier poison is still running.
pub(crate) fn poison(ctx: &mut CombatContext<'_>, target: ActorId, severity: u32) {
    {
        let Some(actor) = ctx.world.get_mut(target) else {
            return;
        };
        if !actor.is_alive() || actor.poisoned || severity == 0 {
            return;
        }
        actor.poisoned = true;
    }
    ctx.events.publish(GameEvent::StatusApplied {
        actor: target,
        status: StatusEffect::Poisoned,
    });
    ctx.spawn_task(
        POISON_INTERVAL,
        Repeat::Every(POISON_INTERVAL),
        PoisonTask {
            target,
            severity,
            remaining: POISON_PULSES,
        },
    );
}

struct PoisonTask {
    target: ActorId,
    severity: u32,
    remaining: u32,
}

impl Task for PoisonTask {
    fn execute(&mut self, ctx: &mut CombatContext<'_>) -> TaskState {
        let alive = ctx.world.get(self.target).is_some_and(|a| a.is_alive());
        if !alive || self.remaining == 0 {
            if let Some(actor) = ctx.world.get_mut(self.target) {
                actor.poisoned = false;
            }
            return TaskState::Stop;
        }
        self.remaining -= 1;

        // Poison has no attacker; it never earns kill credit.
        let health_after = {
            let Some(actor) = ctx.world.get_mut(self.target) else {
                return TaskState::Stop;
            };
            let applied = actor.apply_damage(self.severity);
            ctx.events.publish(GameEvent::HitApplied {
                attacker: None,
                victim: self.target,
                damage: applied,
                kind: DamageKind::Poison,
                accurate: true,
                health_after: actor.health,
            });
            actor.health
        };
        if health_after == 0 {
            if let Some(actor) = ctx.world.get_mut(self.target) {
                actor.poisoned = false;
            }
            resolution::process_death(ctx, self.target);
            return TaskState::Stop;
        }
        if self.remaining == 0 {
            if let Some(actor) = ctx.world.get_mut(self.target) {
                actor.poisoned = false;
            }
            return TaskState::Stop;
        }
        TaskState::Continue
    }
}

/// Pin the target in place for `ticks`. Extends but never shortens an
/// existing freeze.
pub(crate) fn freeze(ctx: &mut CombatContext<'_>, target: ActorId, ticks: u64) {
    let Some(actor) = ctx.world.get_mut(target) else {
        return;
    };
    if !actor.is_alive() {
        return;
    }
    let until = Tick(ctx.now.0 + ticks);
    if until > actor.movement.frozen_until {
        actor.movement.frozen_until = until;
    }
    ctx.events.publish(GameEvent::StatusApplied {
        actor: target,
        status: StatusEffect::Frozen,
    });
}

/// Apply a weaken debuff for `duration` ticks.
///
/// Stacking is first-applied-wins: returns false and changes nothing while
/// another weaken is active, regardless of kind or rate.
pub(crate) fn weaken(
    ctx: &mut CombatContext<'_>,
    target: ActorId,
    debuff: Weaken,
    duration: u64,
) -> bool {
    {
        let Some(actor) = ctx.world.get_mut(target) else {
            return false;
        };
        if !actor.is_alive() || actor.weaken.is_some() {
            return false;
        }
        actor.weaken = Some(debuff);
    }
    ctx.events.publish(GameEvent::StatusApplied {
        actor: target,
        status: StatusEffect::Weakened,
    });
    ctx.spawn_task(duration, Repeat::Once, WeakenExpiry { target });
    true
}

struct WeakenExpiry {
    target: ActorId,
}

impl Task for WeakenExpiry {
    fn execute(&mut self, ctx: &mut CombatContext<'_>) -> TaskState {
        if let Some(actor) = ctx.world.get_mut(self.target) {
            actor.weaken = None;
        }
        TaskState::Stop
    }
}

/// Schedule the end of an activation-only special buff.
pub(crate) fn expire_special_boost(ctx: &mut CombatContext<'_>, target: ActorId, duration: u64) {
    ctx.spawn_task(duration, Repeat::Once, SpecialBoostExpiry { target });
}

struct SpecialBoostExpiry {
    target: ActorId,
}

impl Task for SpecialBoostExpiry {
    fn execute(&mut self, ctx: &mut CombatContext<'_>) -> TaskState {
        if let Some(actor) = ctx.world.get_mut(self.target) {
            actor.special_boost = None;
        }
        TaskState::Stop
    }
}

/// World-wide special energy regeneration pulse for players.
pub(crate) struct SpecialRegenTask;

impl Task for SpecialRegenTask {
    fn execute(&mut self, ctx: &mut CombatContext<'_>) -> TaskState {
        let cap = combat_core::config::CombatConfig::MAX_SPECIAL_ENERGY;
        let amount = ctx.config.special_regen_amount;
        for id in ctx.world.ids() {
            if let Some(actor) = ctx.world.get_mut(id)
                && actor.kind == combat_core::types::ActorKind::Player
                && actor.special_energy < cap
            {
                actor.special_energy = (actor.special_energy + amount).min(cap);
            }
        }
        TaskState::Continue
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use combat_core::config::CombatConfig;
    use combat_core::snapshot::{Levels, Weaken, WeakenKind};
    use combat_core::types::ActorId;

    use combat_content::zones::OpenWorldRules;

    use super::{POISON_INTERVAL, POISON_PULSES};
    use crate::engine::CombatEngine;
    use crate::world::ActorBlueprint;

    fn engine() -> CombatEngine {
        CombatEngine::new(CombatConfig::new(), Arc::new(OpenWorldRules::new()), 7)
    }

    fn spawn(engine: &mut CombatEngine, hitpoints: u32) -> ActorId {
        engine.spawn_player(ActorBlueprint::player("subject", Levels::uniform(hitpoints)))
    }

    #[test]
    fn weaken_is_first_applied_wins() {
        let mut engine = engine();
        let id = spawn(&mut engine, 50);

        let first = Weaken::high(WeakenKind::Defence);
        let second = Weaken::low(WeakenKind::Attack);
        assert!(engine.run(|ctx| super::weaken(ctx, id, first, 10)));
        assert!(!engine.run(|ctx| super::weaken(ctx, id, second, 10)));
        assert_eq!(engine.world().get(id).unwrap().weaken, Some(first));

        for _ in 0..10 {
            engine.tick();
        }
        assert!(engine.world().get(id).unwrap().weaken.is_none());
        assert!(engine.run(|ctx| super::weaken(ctx, id, second, 10)));
    }

    #[test]
    fn poison_pulses_then_clears_without_stacking() {
        let mut engine = engine();
        let id = spawn(&mut engine, 50);

        engine.run(|ctx| super::poison(ctx, id, 3));
        // A second application while poisoned is discarded.
        engine.run(|ctx| super::poison(ctx, id, 3));

        for _ in 0..POISON_INTERVAL {
            engine.tick();
        }
        assert_eq!(engine.world().get(id).unwrap().health, 47);

        for _ in 0..POISON_INTERVAL * u64::from(POISON_PULSES - 1) {
            engine.tick();
        }
        let actor = engine.world().get(id).unwrap();
        assert_eq!(actor.health, 50 - 3 * POISON_PULSES);
        assert!(!actor.poisoned);

        // No further pulses after the course ends.
        for _ in 0..POISON_INTERVAL {
            engine.tick();
        }
        assert_eq!(engine.world().get(id).unwrap().health, 50 - 3 * POISON_PULSES);
    }

    #[test]
    fn freeze_extends_but_never_shortens() {
        let mut engine = engine();
        let id = spawn(&mut engine, 50);

        engine.run(|ctx| super::freeze(ctx, id, 8));
        let long = engine.world().get(id).unwrap().movement.frozen_until;
        engine.run(|ctx| super::freeze(ctx, id, 3));
        assert_eq!(engine.world().get(id).unwrap().movement.frozen_until, long);

        for _ in 0..8 {
            engine.tick();
        }
        let now = engine.now();
        assert!(!engine.world().get(id).unwrap().movement.is_frozen(now));
    }
}
