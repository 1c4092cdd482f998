//! Special attacks as one-shot strategy overrides.
//!
//! The session swaps the actor's strategy for exactly one swing when a
//! queued special fires, draining energy on success. Activation-only buffs
//! never reach these strategies; invoking one as an attack is a contract
//! violation surfaced as [`CombatError::UnsupportedStrategyOperation`].

use combat_core::error::CombatError;
use combat_core::formulas;
use combat_core::hit::{DamageKind, Hit, HitPlan};
use combat_core::rng::roll;
use combat_core::snapshot::{CombatSnapshot, SpecialMultipliers};
use combat_core::types::{ActorId, CombatType};

use super::{CombatStrategy, snapshots};
use crate::combat::effects;
use crate::combat::resolution;
use crate::context::CombatContext;
use crate::events::{GameEvent, StatusEffect, animation};

fn boost(snapshot: &mut CombatSnapshot, multipliers: SpecialMultipliers) {
    snapshot.special.accuracy *= multipliers.accuracy;
    snapshot.special.strength *= multipliers.strength;
}

fn roll_special_hit(
    ctx: &CombatContext<'_>,
    attacker: ActorId,
    atk: &CombatSnapshot,
    vic: &CombatSnapshot,
    combat_type: CombatType,
    accuracy_context: u32,
    damage_context: u32,
) -> (u32, bool) {
    let accurate = formulas::roll_hit(
        atk,
        vic,
        combat_type,
        ctx.config,
        ctx.rng,
        ctx.seed(attacker, accuracy_context),
        ctx.seed(attacker, roll::DEFENCE_BYPASS),
    );
    let damage = if accurate {
        let max = formulas::max_hit(atk, combat_type, ctx.config);
        formulas::random_hit(max, combat_type, ctx.rng, ctx.seed(attacker, damage_context))
    } else {
        0
    };
    (damage, accurate)
}

/// Two fast stabs, each with its own accuracy and damage roll.
pub(crate) struct TwinFangStrategy;

impl CombatStrategy for TwinFangStrategy {
    fn name(&self) -> &'static str {
        "special-twin-fang"
    }

    fn attack(
        &self,
        ctx: &mut CombatContext<'_>,
        attacker: ActorId,
        victim: ActorId,
    ) -> Result<HitPlan, CombatError> {
        let (mut atk, vic) = snapshots(ctx, attacker, victim)?;
        boost(
            &mut atk,
            SpecialMultipliers {
                accuracy: 1.25,
                strength: 1.0,
            },
        );
        ctx.events.publish(GameEvent::AnimationPlayed {
            actor: attacker,
            animation: animation::SPECIAL,
        });

        let (first, first_hit) = roll_special_hit(
            ctx,
            attacker,
            &atk,
            &vic,
            CombatType::Melee,
            roll::ACCURACY,
            roll::DAMAGE,
        );
        let (second, second_hit) = roll_special_hit(
            ctx,
            attacker,
            &atk,
            &vic,
            CombatType::Melee,
            roll::EXTRA_HIT,
            roll::EFFECT,
        );

        Ok(HitPlan::new(CombatType::Melee)
            .with_hit(Hit::new(first), first_hit)
            .with_hit(Hit::new(second), second_hit)
            .with_experience(atk.fight_style.experience_skills(CombatType::Melee)))
    }
}

/// A crushing blow that drains the victim's run energy.
pub(crate) struct SunderStrategy;

impl CombatStrategy for SunderStrategy {
    fn name(&self) -> &'static str {
        "special-sunder"
    }

    fn attack(
        &self,
        ctx: &mut CombatContext<'_>,
        attacker: ActorId,
        victim: ActorId,
    ) -> Result<HitPlan, CombatError> {
        let (mut atk, vic) = snapshots(ctx, attacker, victim)?;
        boost(
            &mut atk,
            SpecialMultipliers {
                accuracy: 1.1,
                strength: 1.15,
            },
        );
        ctx.events.publish(GameEvent::AnimationPlayed {
            actor: attacker,
            animation: animation::SPECIAL,
        });

        let (damage, accurate) = roll_special_hit(
            ctx,
            attacker,
            &atk,
            &vic,
            CombatType::Melee,
            roll::ACCURACY,
            roll::DAMAGE,
        );
        Ok(HitPlan::new(CombatType::Melee)
            .with_hit(Hit::new(damage), accurate)
            .with_experience(atk.fight_style.experience_skills(CombatType::Melee)))
    }

    fn on_success(
        &self,
        ctx: &mut CombatContext<'_>,
        _attacker: ActorId,
        victim: ActorId,
        damage: u32,
    ) {
        if let Some(victim_actor) = ctx.world.get_mut(victim) {
            victim_actor.run_energy = victim_actor.run_energy.saturating_sub(damage * 2);
        }
        ctx.events.publish(GameEvent::StatusApplied {
            actor: victim,
            status: StatusEffect::EnergyDrained,
        });
    }
}

/// A frozen bolt: magic-delayed hit that pins the victim on contact.
pub(crate) struct GlaciateStrategy;

impl GlaciateStrategy {
    const MAX_HIT: u32 = 12;
    const FREEZE_TICKS: u64 = 8;
}

impl CombatStrategy for GlaciateStrategy {
    fn name(&self) -> &'static str {
        "special-glaciate"
    }

    fn attack(
        &self,
        ctx: &mut CombatContext<'_>,
        attacker: ActorId,
        victim: ActorId,
    ) -> Result<HitPlan, CombatError> {
        let (mut atk, vic) = snapshots(ctx, attacker, victim)?;
        boost(
            &mut atk,
            SpecialMultipliers {
                accuracy: 1.2,
                strength: 1.0,
            },
        );
        ctx.events.publish(GameEvent::ProjectileFired {
            source: attacker,
            target: victim,
            projectile: ctx.world.get(attacker).map_or(0, |a| a.weapon.id),
        });

        let accurate = formulas::roll_hit(
            &atk,
            &vic,
            CombatType::Magic,
            ctx.config,
            ctx.rng,
            ctx.seed(attacker, roll::ACCURACY),
            ctx.seed(attacker, roll::DEFENCE_BYPASS),
        );
        let damage = if accurate {
            formulas::random_hit(
                Self::MAX_HIT,
                CombatType::Magic,
                ctx.rng,
                ctx.seed(attacker, roll::DAMAGE),
            )
        } else {
            0
        };
        Ok(HitPlan::new(CombatType::Magic)
            .with_hit(Hit::new(damage), accurate)
            .with_experience(&[combat_core::types::Skill::Magic]))
    }

    fn on_success(
        &self,
        ctx: &mut CombatContext<'_>,
        _attacker: ActorId,
        victim: ActorId,
        _damage: u32,
    ) {
        effects::freeze(ctx, victim, Self::FREEZE_TICKS);
    }
}

/// A sweeping cleave that carries half its damage to bystanders in
/// multi-combat.
pub(crate) struct ReaverStrategy;

impl ReaverStrategy {
    const CLEAVE_TARGETS: usize = 2;
    const CLEAVE_RADIUS: u32 = 1;
}

impl CombatStrategy for ReaverStrategy {
    fn name(&self) -> &'static str {
        "special-reaver"
    }

    fn attack(
        &self,
        ctx: &mut CombatContext<'_>,
        attacker: ActorId,
        victim: ActorId,
    ) -> Result<HitPlan, CombatError> {
        let (mut atk, vic) = snapshots(ctx, attacker, victim)?;
        boost(
            &mut atk,
            SpecialMultipliers {
                accuracy: 1.1,
                strength: 1.1,
            },
        );
        ctx.events.publish(GameEvent::AnimationPlayed {
            actor: attacker,
            animation: animation::SPECIAL,
        });

        let (damage, accurate) = roll_special_hit(
            ctx,
            attacker,
            &atk,
            &vic,
            CombatType::Melee,
            roll::ACCURACY,
            roll::DAMAGE,
        );
        Ok(HitPlan::new(CombatType::Melee)
            .with_hit(Hit::new(damage), accurate)
            .with_experience(atk.fight_style.experience_skills(CombatType::Melee)))
    }

    fn on_success(
        &self,
        ctx: &mut CombatContext<'_>,
        attacker: ActorId,
        victim: ActorId,
        damage: u32,
    ) {
        let cleave = damage / 2;
        if cleave == 0 {
            return;
        }
        let Some(center) = ctx.world.get(victim).map(|v| v.position) else {
            return;
        };
        if !ctx.zones.multi_combat(center) {
            return;
        }
        let bystanders: Vec<ActorId> = ctx
            .world
            .actors_within(center, Self::CLEAVE_RADIUS)
            .into_iter()
            .filter(|&id| id != attacker && id != victim)
            .take(Self::CLEAVE_TARGETS)
            .collect();
        for target in bystanders {
            resolution::apply_direct_damage(ctx, attacker, target, cleave, DamageKind::Regular);
        }
    }
}

/// Activation-only buff. Queuing it applies the buff immediately; it has no
/// attack component, so being driven as one is a dispatch bug.
pub(crate) struct AscendanceStrategy;

impl CombatStrategy for AscendanceStrategy {
    fn name(&self) -> &'static str {
        "special-ascendance"
    }

    fn attack(
        &self,
        _ctx: &mut CombatContext<'_>,
        _attacker: ActorId,
        _victim: ActorId,
    ) -> Result<HitPlan, CombatError> {
        Err(CombatError::UnsupportedStrategyOperation {
            strategy: "special-ascendance",
            operation: "attack",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use combat_core::config::CombatConfig;
    use combat_core::snapshot::Levels;
    use combat_core::types::Position;

    use combat_content::npcs::NpcCatalog;
    use combat_content::zones::OpenWorldRules;

    use crate::engine::CombatEngine;
    use crate::world::ActorBlueprint;

    fn engine() -> CombatEngine {
        CombatEngine::new(CombatConfig::new(), Arc::new(OpenWorldRules::new()), 3)
    }

    #[test]
    fn activation_only_attack_is_a_contract_violation() {
        let mut engine = engine();
        let hero = engine.spawn_player(ActorBlueprint::player("hero", Levels::uniform(60)));
        let other = engine.spawn_player(
            ActorBlueprint::player("other", Levels::uniform(60)).at(Position::new(0, 1)),
        );
        let err = engine
            .run(|ctx| AscendanceStrategy.attack(ctx, hero, other))
            .err()
            .expect("activation-only specials cannot attack");
        assert!(matches!(
            err,
            CombatError::UnsupportedStrategyOperation { .. }
        ));
    }

    #[test]
    fn activation_only_strategy_resets_the_session_instead_of_swinging() {
        let mut engine = engine();
        let hero = engine.spawn_player(
            ActorBlueprint::player("hero", Levels::uniform(60)).at(Position::new(0, 0)),
        );
        let catalog = NpcCatalog::embedded().unwrap();
        let rat = engine.spawn_npc(catalog.get(1).unwrap(), Position::new(0, 1));

        engine.attack(hero, rat);
        engine.world_mut().get_mut(hero).unwrap().combat.strategy =
            Some(Arc::new(AscendanceStrategy));
        for _ in 0..2 {
            engine.tick();
        }

        assert!(!engine.world().get(hero).unwrap().combat.is_attacking());
        let rat_actor = engine.world().get(rat).unwrap();
        assert_eq!(rat_actor.health, rat_actor.max_health);
    }
}
