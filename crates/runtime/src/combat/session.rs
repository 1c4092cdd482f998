//! Per-attacker engagement tasks: proximity wait and the attack session.

use std::sync::Arc;

use combat_core::formulas;
use combat_core::types::{ActorId, ActorKind};

use crate::combat::controller::{self, reset_combat};
use crate::combat::resolution::ResolutionTask;
use crate::combat::strategy::CombatStrategy;
use crate::context::CombatContext;
use crate::events::{DeclineReason, GameEvent};
use crate::scheduler::{Repeat, Task, TaskState};

/// Repeating task covering the `Engaging` phase: waits until the attacker is
/// in range of its victim, then promotes the engagement to an active session.
pub(crate) struct ApproachTask {
    pub(crate) attacker: ActorId,
}

impl Task for ApproachTask {
    fn execute(&mut self, ctx: &mut CombatContext<'_>) -> TaskState {
        let attacker_id = self.attacker;
        let Some(attacker) = ctx.world.get(attacker_id) else {
            return TaskState::Stop;
        };
        let Some(victim_id) = attacker.combat.victim() else {
            // Engagement was abandoned before first contact.
            if let Some(a) = ctx.world.get_mut(attacker_id) {
                a.combat.approach = None;
            }
            return TaskState::Stop;
        };
        let Some(victim) = ctx.world.get(victim_id) else {
            reset_combat(ctx.world, attacker_id);
            return TaskState::Stop;
        };
        if !attacker.is_alive() || !victim.is_alive() {
            reset_combat(ctx.world, attacker_id);
            return TaskState::Stop;
        }

        let reach = attacker
            .combat
            .strategy
            .as_ref()
            .map_or_else(|| attacker.attack_reach(), |s| s.attack_distance(attacker));
        if !attacker.position.within(victim.position, reach) {
            // The movement collaborator is walking us in; keep waiting.
            return TaskState::Continue;
        }

        let session = ctx.spawn_task(
            1,
            Repeat::EveryTick,
            SessionTask {
                attacker: attacker_id,
            },
        );
        if let Some(a) = ctx.world.get_mut(attacker_id) {
            a.combat.session = Some(session);
            a.combat.approach = None;
            a.movement.follow = None;
        }
        // First swing fires on the contact tick, not one tick later.
        session_tick(ctx, attacker_id);
        TaskState::Stop
    }
}

/// Repeating task covering the `Active` and `Cooldown` phases.
pub(crate) struct SessionTask {
    pub(crate) attacker: ActorId,
}

impl Task for SessionTask {
    fn execute(&mut self, ctx: &mut CombatContext<'_>) -> TaskState {
        session_tick(ctx, self.attacker)
    }
}

/// One active-session tick: cooldown drain, validation, timer, attack.
///
/// Also invoked directly for instant attacks (e.g. the first swing on
/// contact), which behaves exactly like an on-schedule tick.
pub(crate) fn session_tick(ctx: &mut CombatContext<'_>, attacker_id: ActorId) -> TaskState {
    // Cooldown phase: drain and reset when the grace runs out.
    {
        let Some(attacker) = ctx.world.get_mut(attacker_id) else {
            return TaskState::Stop;
        };
        if attacker.combat.cooldown > 0 {
            attacker.combat.cooldown -= 1;
            attacker.combat.attack_timer = attacker.combat.attack_timer.saturating_sub(1);
            if attacker.combat.cooldown == 0 {
                attacker.combat.reset();
                return TaskState::Stop;
            }
            return TaskState::Continue;
        }
        if !attacker.is_alive() {
            attacker.combat.reset();
            return TaskState::Stop;
        }
    }

    let Some(victim_id) = ctx.world.get(attacker_id).and_then(|a| a.combat.victim()) else {
        reset_combat(ctx.world, attacker_id);
        return TaskState::Stop;
    };
    if !ctx.world.is_alive(victim_id) {
        reset_combat(ctx.world, attacker_id);
        return TaskState::Stop;
    }

    if let Some(reason) = validate_engagement(ctx, attacker_id, victim_id) {
        ctx.events.publish(GameEvent::AttackDeclined {
            actor: attacker_id,
            target: victim_id,
            reason,
        });
        reset_combat(ctx.world, attacker_id);
        return TaskState::Stop;
    }

    // NPCs past their leash give up and walk home.
    if let Some(attacker) = ctx.world.get(attacker_id)
        && let Some(npc) = &attacker.npc
        && attacker.position.distance(attacker.spawn_point) > npc.leash_radius
    {
        reset_combat(ctx.world, attacker_id);
        return TaskState::Stop;
    }

    // A teleporting victim is a soft failure: grace period, no full reset.
    if ctx
        .world
        .get(victim_id)
        .is_some_and(|v| v.movement.teleporting)
    {
        controller::begin_cooldown(ctx.world, attacker_id, ctx.config.cooldown_ticks, true);
        return TaskState::Continue;
    }

    // Attack timer.
    let due = {
        let Some(attacker) = ctx.world.get_mut(attacker_id) else {
            return TaskState::Stop;
        };
        if attacker.combat.attack_timer > 0 {
            attacker.combat.attack_timer -= 1;
        }
        attacker.combat.attack_timer == 0
    };
    if !due {
        return TaskState::Continue;
    }

    launch_attack(ctx, attacker_id, victim_id)
}

/// Engagement rules that can refuse a fight mid-session: zone permission,
/// single-combat exclusivity, wilderness gating for player-versus-player.
fn validate_engagement(
    ctx: &CombatContext<'_>,
    attacker_id: ActorId,
    victim_id: ActorId,
) -> Option<DeclineReason> {
    let attacker = ctx.world.get(attacker_id)?;
    let victim = ctx.world.get(victim_id)?;

    if !ctx.zones.attack_permitted(attacker_id, victim_id) {
        return Some(DeclineReason::NotPermitted);
    }

    // Outside multi-combat, each side may only fight one opponent.
    if !ctx.zones.multi_combat(victim.position) {
        let busy_attacking = victim.combat.is_attacking() && victim.combat.victim() != Some(attacker_id);
        let busy_defending = victim.combat.is_being_attacked(ctx.now)
            && victim.combat.last_attacker() != Some(attacker_id);
        if busy_attacking || busy_defending {
            return Some(DeclineReason::AlreadyInCombat);
        }
    }
    if !ctx.zones.multi_combat(attacker.position)
        && attacker.combat.is_being_attacked(ctx.now)
        && attacker.combat.last_attacker() != Some(victim_id)
    {
        return Some(DeclineReason::AlreadyInCombat);
    }

    if attacker.kind == ActorKind::Player && victim.kind == ActorKind::Player {
        let depth_a = ctx.zones.wilderness_level(attacker.position);
        let depth_v = ctx.zones.wilderness_level(victim.position);
        if depth_a == 0 || depth_v == 0 {
            return Some(DeclineReason::OutsideWilderness);
        }
        let gap = formulas::combat_level_difference(attacker.combat_level, victim.combat_level);
        if gap > depth_a.min(depth_v) {
            return Some(DeclineReason::LevelGap);
        }
    }

    None
}

/// The attack timer reached zero: pick the strategy (honoring a queued
/// special), re-verify range and preconditions, execute, and schedule the
/// delayed resolution.
fn launch_attack(
    ctx: &mut CombatContext<'_>,
    attacker_id: ActorId,
    victim_id: ActorId,
) -> TaskState {
    let (strategy, special): (Arc<dyn CombatStrategy>, _) = {
        let Some(attacker) = ctx.world.get(attacker_id) else {
            return TaskState::Stop;
        };
        let base = attacker
            .combat
            .strategy
            .clone()
            .unwrap_or_else(|| ctx.strategies.resolve(attacker));
        match attacker.combat.queued_special() {
            Some(kind)
                if !kind.is_activation_only()
                    && attacker.special_energy >= kind.energy_cost() =>
            {
                (ctx.strategies.special(kind), Some(kind))
            }
            _ => (base, None),
        }
    };

    let in_range = {
        let (Some(attacker), Some(victim)) =
            (ctx.world.get(attacker_id), ctx.world.get(victim_id))
        else {
            return TaskState::Stop;
        };
        attacker
            .position
            .within(victim.position, strategy.attack_distance(attacker))
    };
    if !in_range {
        // Drifted out of reach; hold the swing until we close back in.
        return TaskState::Continue;
    }

    if !strategy.can_attack(ctx, attacker_id, victim_id) {
        let reason = strategy
            .decline_reason()
            .unwrap_or(DeclineReason::NotPermitted);
        ctx.events.publish(GameEvent::AttackDeclined {
            actor: attacker_id,
            target: victim_id,
            reason,
        });
        reset_combat(ctx.world, attacker_id);
        return TaskState::Stop;
    }

    match strategy.attack(ctx, attacker_id, victim_id) {
        Ok(plan) => {
            let combat_type = plan.combat_type();
            let delay = u64::from(formulas::hit_delay(combat_type));
            // Melee resolution repeats until the pair is adjacent again;
            // projectiles land regardless of movement.
            let awaits_adjacency = combat_type == combat_core::types::CombatType::Melee;
            ctx.spawn_task(
                delay,
                Repeat::EveryTick,
                ResolutionTask::new(attacker_id, victim_id, strategy.clone(), plan, awaits_adjacency),
            );
            ctx.events.publish(GameEvent::AttackLaunched {
                attacker: attacker_id,
                victim: victim_id,
                combat_type,
            });

            let speed = ctx
                .world
                .get(attacker_id)
                .map_or(4, |a| strategy.attack_delay(a));
            if let Some(attacker) = ctx.world.get_mut(attacker_id) {
                if let Some(kind) = special {
                    attacker.special_energy -= kind.energy_cost();
                    attacker.combat.queued_special = None;
                    let remaining = attacker.special_energy;
                    ctx.events.publish(GameEvent::SpecialDrained {
                        actor: attacker_id,
                        kind,
                        remaining,
                    });
                }
                attacker.combat.attack_timer = speed;
                attacker.movement.facing = Some(victim_id);
            }
            TaskState::Continue
        }
        Err(err) => {
            tracing::error!(
                target: "runtime::combat",
                actor = %attacker_id,
                strategy = strategy.name(),
                severity = ?err.severity(),
                error = %err,
                "strategy execution failed, resetting engagement"
            );
            reset_combat(ctx.world, attacker_id);
            TaskState::Stop
        }
    }
}

/// Run an out-of-schedule session tick for `actor`, used for instant attacks.
pub(crate) fn instant(ctx: &mut CombatContext<'_>, actor: ActorId) {
    let _ = session_tick(ctx, actor);
}

/// Tiles within which an idle aggressive NPC picks a fight.
const AGGRO_RADIUS: u32 = 4;

/// World-wide scan that lets aggressive NPCs initiate combat against the
/// nearest player in range.
pub(crate) struct NpcAggressionTask;

impl Task for NpcAggressionTask {
    fn execute(&mut self, ctx: &mut CombatContext<'_>) -> TaskState {
        for id in ctx.world.ids() {
            let Some(actor) = ctx.world.get(id) else {
                continue;
            };
            let aggressive = actor
                .npc
                .as_ref()
                .is_some_and(|n| n.aggressive);
            if !aggressive || !actor.is_alive() || actor.combat.in_combat(ctx.now) {
                continue;
            }
            let position = actor.position;
            let target = ctx
                .world
                .actors_within(position, AGGRO_RADIUS)
                .into_iter()
                .filter(|&candidate| {
                    ctx.world
                        .get(candidate)
                        .is_some_and(|a| a.kind == ActorKind::Player && a.is_alive())
                })
                .min_by_key(|&candidate| {
                    let distance = ctx
                        .world
                        .get(candidate)
                        .map_or(u32::MAX, |a| a.position.distance(position));
                    (distance, candidate)
                });
            if let Some(target) = target {
                controller::attack(ctx, id, target);
            }
        }
        TaskState::Continue
    }
}
