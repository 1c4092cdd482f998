//! Default ranged strategy.

use combat_core::error::CombatError;
use combat_core::formulas;
use combat_core::hit::{Hit, HitPlan};
use combat_core::rng::roll;
use combat_core::types::{ActorId, CombatType};

use super::{CombatStrategy, snapshots};
use crate::context::CombatContext;
use crate::events::{DeclineReason, GameEvent};

pub(crate) struct RangedStrategy;

impl CombatStrategy for RangedStrategy {
    fn name(&self) -> &'static str {
        "ranged"
    }

    fn can_attack(&self, ctx: &CombatContext<'_>, attacker: ActorId, _victim: ActorId) -> bool {
        ctx.world.get(attacker).is_some_and(|a| a.ammo > 0)
    }

    fn decline_reason(&self) -> Option<DeclineReason> {
        Some(DeclineReason::OutOfAmmo)
    }

    fn attack(
        &self,
        ctx: &mut CombatContext<'_>,
        attacker: ActorId,
        victim: ActorId,
    ) -> Result<HitPlan, CombatError> {
        let (atk, vic) = snapshots(ctx, attacker, victim)?;

        let projectile = {
            let actor = ctx
                .world
                .get_mut(attacker)
                .ok_or(CombatError::ActorVanished { actor: attacker })?;
            actor.ammo = actor.ammo.saturating_sub(1);
            actor.weapon.id
        };
        ctx.events.publish(GameEvent::ProjectileFired {
            source: attacker,
            target: victim,
            projectile,
        });

        let accurate = formulas::roll_hit(
            &atk,
            &vic,
            CombatType::Ranged,
            ctx.config,
            ctx.rng,
            ctx.seed(attacker, roll::ACCURACY),
            ctx.seed(attacker, roll::DEFENCE_BYPASS),
        );
        let damage = if accurate {
            let max = formulas::max_hit(&atk, CombatType::Ranged, ctx.config);
            formulas::random_hit(max, CombatType::Ranged, ctx.rng, ctx.seed(attacker, roll::DAMAGE))
        } else {
            0
        };

        Ok(HitPlan::new(CombatType::Ranged)
            .with_hit(Hit::new(damage), accurate)
            .with_experience(atk.fight_style.experience_skills(CombatType::Ranged)))
    }
}
