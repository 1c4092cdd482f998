//! Delayed hit resolution.
//!
//! A strategy execution produces a [`HitPlan`]; this module owns the task
//! that applies it after the combat-type delay, plus everything that happens
//! at application time: damage attribution, experience hand-off, set procs,
//! overhead prayers, retaliation, and death processing.

use std::sync::Arc;

use combat_core::hit::{DamageKind, HitPlan};
use combat_core::rng::roll;
use combat_core::snapshot::{OverheadPrayers, SetEffect};
use combat_core::types::{ActorId, ActorKind, CombatType, Skill};

use crate::combat::controller;
use crate::combat::strategy::CombatStrategy;
use crate::context::CombatContext;
use crate::events::{GameEvent, animation};
use crate::scheduler::{Task, TaskState};

/// Applies one hit plan exactly once after its delay.
///
/// Melee plans wait for the pair to be adjacent again before landing and
/// keep waiting across ticks; projectile and spell plans land on schedule
/// wherever the victim went. A plan dies silently when either side despawns
/// or dies first.
pub(crate) struct ResolutionTask {
    attacker: ActorId,
    victim: ActorId,
    strategy: Arc<dyn CombatStrategy>,
    plan: Option<HitPlan>,
    awaits_adjacency: bool,
}

impl ResolutionTask {
    pub(crate) fn new(
        attacker: ActorId,
        victim: ActorId,
        strategy: Arc<dyn CombatStrategy>,
        plan: HitPlan,
        awaits_adjacency: bool,
    ) -> Self {
        Self {
            attacker,
            victim,
            strategy,
            plan: Some(plan),
            awaits_adjacency,
        }
    }
}

impl Task for ResolutionTask {
    fn execute(&mut self, ctx: &mut CombatContext<'_>) -> TaskState {
        if self.plan.is_none() {
            return TaskState::Stop;
        }
        let (Some(attacker), Some(victim)) =
            (ctx.world.get(self.attacker), ctx.world.get(self.victim))
        else {
            return TaskState::Stop;
        };
        if !attacker.is_alive() || !victim.is_alive() {
            return TaskState::Stop;
        }
        if self.awaits_adjacency {
            let reach = self.strategy.attack_distance(attacker);
            if !attacker.position.within(victim.position, reach) {
                return TaskState::Continue;
            }
        }

        let Some(mut plan) = self.plan.take() else {
            return TaskState::Stop;
        };
        self.strategy
            .before_hit(ctx, self.attacker, self.victim, &mut plan);
        resolve_hit(ctx, self.attacker, self.victim, &self.strategy, &plan);
        TaskState::Stop
    }
}

/// Apply a resolved plan to the victim and run every on-hit consequence.
pub(crate) fn resolve_hit(
    ctx: &mut CombatContext<'_>,
    attacker_id: ActorId,
    victim_id: ActorId,
    strategy: &Arc<dyn CombatStrategy>,
    plan: &HitPlan,
) {
    let now = ctx.now;
    let accurate = plan.accurate();
    let total = plan.total_damage();
    let Some(attacker_kind) = ctx.world.get(attacker_id).map(|a| a.kind) else {
        return;
    };

    let mut applied_total = 0;
    {
        let Some(victim) = ctx.world.get_mut(victim_id) else {
            return;
        };
        if accurate {
            victim
                .combat
                .damage_cache_mut()
                .add(attacker_id, attacker_kind, total, now);
            victim.combat.record_attacked_by(attacker_id, now);
        }
        for planned in plan.hits() {
            let applied = victim.apply_damage(planned.hit.damage);
            applied_total += applied;
            ctx.events.publish(GameEvent::HitApplied {
                attacker: Some(attacker_id),
                victim: victim_id,
                damage: applied,
                kind: planned.hit.kind,
                accurate: planned.accurate,
                health_after: victim.health,
            });
        }
    }

    award_experience(ctx, attacker_id, plan, applied_total);

    if accurate {
        strategy.on_success(ctx, attacker_id, victim_id, applied_total);
        apply_set_proc(ctx, attacker_id, victim_id, applied_total);
        apply_smite(ctx, attacker_id, victim_id, applied_total);
        apply_redemption(ctx, victim_id);
    }

    ctx.events.publish(GameEvent::AnimationPlayed {
        actor: victim_id,
        animation: animation::HURT,
    });
    strategy.after_hit(ctx, attacker_id, victim_id);

    maybe_retaliate(ctx, victim_id, attacker_id);

    if !ctx.world.is_alive(victim_id) && ctx.world.contains(victim_id) {
        process_death(ctx, victim_id);
    }
}

/// Apply damage outside a plan (cleaves, novas). Attribution and death
/// processing still run; experience and procs do not.
pub(crate) fn apply_direct_damage(
    ctx: &mut CombatContext<'_>,
    attacker_id: ActorId,
    victim_id: ActorId,
    damage: u32,
    kind: DamageKind,
) {
    let now = ctx.now;
    let Some(attacker_kind) = ctx.world.get(attacker_id).map(|a| a.kind) else {
        return;
    };
    {
        let Some(victim) = ctx.world.get_mut(victim_id) else {
            return;
        };
        if !victim.is_alive() {
            return;
        }
        victim
            .combat
            .damage_cache_mut()
            .add(attacker_id, attacker_kind, damage, now);
        victim.combat.record_attacked_by(attacker_id, now);
        let applied = victim.apply_damage(damage);
        ctx.events.publish(GameEvent::HitApplied {
            attacker: Some(attacker_id),
            victim: victim_id,
            damage: applied,
            kind,
            accurate: true,
            health_after: victim.health,
        });
    }
    if !ctx.world.is_alive(victim_id) {
        process_death(ctx, victim_id);
    }
}

/// Hand experience off to the progression collaborator via events. NPCs earn
/// nothing; magic scales the casting skill by damage on top of the spell's
/// flat yield.
fn award_experience(ctx: &mut CombatContext<'_>, attacker_id: ActorId, plan: &HitPlan, damage: u32) {
    let Some(attacker) = ctx.world.get(attacker_id) else {
        return;
    };
    if attacker.kind != ActorKind::Player {
        return;
    }
    let dealt = f64::from(damage);

    match plan.combat_type() {
        CombatType::Magic => {
            let amount = plan.spell_yield().unwrap_or(0.0) + dealt * ctx.config.style_xp_rate;
            ctx.events.publish(GameEvent::ExperienceAwarded {
                actor: attacker_id,
                skill: Skill::Magic,
                amount: amount as u32,
            });
        }
        _ => {
            let skills = plan.experience_skills();
            if !skills.is_empty() {
                let share = dealt * ctx.config.style_xp_rate / skills.len() as f64;
                for &skill in skills {
                    ctx.events.publish(GameEvent::ExperienceAwarded {
                        actor: attacker_id,
                        skill,
                        amount: share as u32,
                    });
                }
            }
        }
    }

    let vitality = (dealt * ctx.config.vitality_xp_rate) as u32;
    if vitality > 0 {
        ctx.events.publish(GameEvent::ExperienceAwarded {
            actor: attacker_id,
            skill: Skill::Hitpoints,
            amount: vitality,
        });
    }
}

/// Roll the attacker's four-piece set passive. SureStrike and Frenzy act in
/// the formulas; the proc-style passives fire here at 1-in-4 per accurate
/// hit.
fn apply_set_proc(ctx: &mut CombatContext<'_>, attacker_id: ActorId, victim_id: ActorId, damage: u32) {
    let Some(effect) = ctx.world.get(attacker_id).and_then(|a| a.set_effect) else {
        return;
    };
    let seed = ctx.seed(attacker_id, roll::SET_PROC);
    if !ctx.rng.one_in(seed, ctx.config.set_proc_odds) {
        return;
    }

    match effect {
        SetEffect::SureStrike | SetEffect::Frenzy => return,
        SetEffect::Siphon => {
            if let Some(attacker) = ctx.world.get_mut(attacker_id) {
                attacker.heal(damage / 4);
            }
        }
        SetEffect::Sap => {
            if let Some(victim) = ctx.world.get_mut(victim_id) {
                victim.run_energy = victim.run_energy.saturating_sub(damage);
            }
        }
        SetEffect::Cripple => {
            if let Some(victim) = ctx.world.get_mut(victim_id) {
                let drain = (damage / 5).max(1);
                victim.levels.defence = victim.levels.defence.saturating_sub(drain).max(1);
            }
        }
    }
    ctx.events.publish(GameEvent::SetEffectProcced {
        actor: attacker_id,
        effect,
    });
}

/// Smite: the attacker drains the victim's devotion by a fraction of damage.
fn apply_smite(ctx: &mut CombatContext<'_>, attacker_id: ActorId, victim_id: ActorId, damage: u32) {
    let smiting = ctx
        .world
        .get(attacker_id)
        .is_some_and(|a| a.overheads.contains(OverheadPrayers::SMITE));
    if !smiting || damage == 0 {
        return;
    }
    let drain = damage / ctx.config.smite_divisor;
    if drain == 0 {
        return;
    }
    if let Some(victim) = ctx.world.get_mut(victim_id) {
        if victim.devotion == 0 {
            return;
        }
        victim.devotion = victim.devotion.saturating_sub(drain);
        let remaining = victim.devotion;
        ctx.events.publish(GameEvent::DevotionDrained {
            actor: victim_id,
            remaining,
        });
    }
}

/// Redemption: when the wearer survives a hit below the health threshold, it
/// heals from its devotion pool and the prayer deactivates.
fn apply_redemption(ctx: &mut CombatContext<'_>, victim_id: ActorId) {
    let Some(victim) = ctx.world.get_mut(victim_id) else {
        return;
    };
    if !victim.is_alive()
        || !victim.overheads.contains(OverheadPrayers::REDEMPTION)
        || victim.devotion == 0
        || victim.health > victim.max_health / ctx.config.redemption_threshold_divisor
    {
        return;
    }
    let healed = victim.heal(victim.max_health / ctx.config.redemption_heal_divisor);
    victim.overheads.remove(OverheadPrayers::REDEMPTION);
    victim.devotion = 0;
    ctx.events.publish(GameEvent::RedemptionTriggered {
        actor: victim_id,
        healed,
    });
}

/// Victims that are idle and set to auto-retaliate strike back.
fn maybe_retaliate(ctx: &mut CombatContext<'_>, victim_id: ActorId, attacker_id: ActorId) {
    let wants_to = ctx.world.get(victim_id).is_some_and(|v| {
        v.is_alive() && v.auto_retaliate && !v.combat.is_attacking()
    });
    if wants_to && ctx.world.is_alive(attacker_id) {
        controller::attack(ctx, victim_id, attacker_id);
    }
}

/// Death: pick the credited killer, fire the retribution nova, clear the
/// controller, announce. Corpse removal and respawn belong to the spawning
/// collaborator, driven by the event.
pub(crate) fn process_death(ctx: &mut CombatContext<'_>, victim_id: ActorId) {
    let now = ctx.now;
    let Some(victim) = ctx.world.get(victim_id) else {
        return;
    };
    let position = victim.position;
    let overheads = victim.overheads;
    let max_health = victim.max_health;
    let cache = victim.combat.damage_cache().clone();

    let radius = ctx.config.kill_credit_radius;
    let killer = cache.credited_killer(now, |id| {
        ctx.world
            .get(id)
            .is_some_and(|a| a.is_alive() && a.position.within(position, radius))
    });

    if overheads.contains(OverheadPrayers::RETRIBUTION) {
        fire_retribution_nova(ctx, victim_id, position, max_health);
    }

    if let Some(victim) = ctx.world.get_mut(victim_id) {
        victim.combat.damage_cache_mut().clear();
        victim.combat.reset();
        victim.movement.follow = None;
    }
    ctx.events.publish(GameEvent::AnimationPlayed {
        actor: victim_id,
        animation: animation::DEATH,
    });
    ctx.events.publish(GameEvent::ActorDied {
        victim: victim_id,
        killer,
    });
}

fn fire_retribution_nova(
    ctx: &mut CombatContext<'_>,
    source: ActorId,
    position: combat_core::types::Position,
    max_health: u32,
) {
    let nova_max = max_health / ctx.config.retribution_divisor;
    if nova_max == 0 {
        return;
    }
    ctx.events.publish(GameEvent::RetributionNova { source });
    let targets: Vec<ActorId> = ctx
        .world
        .actors_within(position, ctx.config.retribution_radius)
        .into_iter()
        .filter(|&id| id != source)
        .collect();
    for (index, target) in targets.into_iter().enumerate() {
        let seed = ctx.seed(source, roll::EFFECT + index as u32);
        let damage = ctx.rng.range(seed, 0, nova_max);
        if damage > 0 {
            apply_direct_damage(ctx, source, target, damage, DamageKind::Regular);
        }
    }
}

