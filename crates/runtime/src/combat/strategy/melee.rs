//! Default melee strategy.

use combat_core::error::CombatError;
use combat_core::formulas;
use combat_core::hit::{Hit, HitPlan};
use combat_core::rng::roll;
use combat_core::types::{ActorId, CombatType};

use super::{CombatStrategy, snapshots};
use crate::combat::effects;
use crate::context::CombatContext;

/// Odds (1-in-N) that a poisonous weapon applies on an accurate hit.
const POISON_ODDS: u32 = 4;
/// Damage per poison pulse from an envenomed blade.
const POISON_SEVERITY: u32 = 2;

pub(crate) struct MeleeStrategy;

impl CombatStrategy for MeleeStrategy {
    fn name(&self) -> &'static str {
        "melee"
    }

    fn attack(
        &self,
        ctx: &mut CombatContext<'_>,
        attacker: ActorId,
        victim: ActorId,
    ) -> Result<HitPlan, CombatError> {
        let (atk, vic) = snapshots(ctx, attacker, victim)?;
        let accurate = formulas::roll_hit(
            &atk,
            &vic,
            CombatType::Melee,
            ctx.config,
            ctx.rng,
            ctx.seed(attacker, roll::ACCURACY),
            ctx.seed(attacker, roll::DEFENCE_BYPASS),
        );
        let damage = if accurate {
            let max = formulas::max_hit(&atk, CombatType::Melee, ctx.config);
            formulas::random_hit(max, CombatType::Melee, ctx.rng, ctx.seed(attacker, roll::DAMAGE))
        } else {
            0
        };

        Ok(HitPlan::new(CombatType::Melee)
            .with_hit(Hit::new(damage), accurate)
            .with_experience(atk.fight_style.experience_skills(CombatType::Melee)))
    }

    fn on_success(
        &self,
        ctx: &mut CombatContext<'_>,
        attacker: ActorId,
        victim: ActorId,
        _damage: u32,
    ) {
        let poisonous = ctx
            .world
            .get(attacker)
            .is_some_and(|a| a.weapon.poisonous);
        if poisonous && ctx.rng.one_in(ctx.seed(attacker, roll::EFFECT), POISON_ODDS) {
            effects::poison(ctx, victim, POISON_SEVERITY);
        }
    }
}
