//! Default magic strategy.
//!
//! Spells bring their own damage cap and experience yield; the strength
//! formula never applies. Weaken spells push their debuff through the
//! on-success hook, where first-applied-wins stacking is enforced.

use combat_core::error::CombatError;
use combat_core::formulas;
use combat_core::hit::{Hit, HitPlan};
use combat_core::rng::roll;
use combat_core::types::{ActorId, CombatType};

use super::{CombatStrategy, snapshots};
use crate::combat::effects;
use crate::context::CombatContext;
use crate::events::{DeclineReason, GameEvent};

/// Ticks a spell-applied weaken lasts.
const WEAKEN_DURATION: u64 = 50;

pub(crate) struct MagicStrategy;

impl CombatStrategy for MagicStrategy {
    fn name(&self) -> &'static str {
        "magic"
    }

    fn can_attack(&self, ctx: &CombatContext<'_>, attacker: ActorId, _victim: ActorId) -> bool {
        ctx.world.get(attacker).is_some_and(|a| a.spell.is_some())
    }

    fn decline_reason(&self) -> Option<DeclineReason> {
        Some(DeclineReason::NoSpellPrepared)
    }

    fn attack(
        &self,
        ctx: &mut CombatContext<'_>,
        attacker: ActorId,
        victim: ActorId,
    ) -> Result<HitPlan, CombatError> {
        let (atk, vic) = snapshots(ctx, attacker, victim)?;
        let spell = ctx
            .world
            .get(attacker)
            .ok_or(CombatError::ActorVanished { actor: attacker })?
            .spell
            .clone()
            .ok_or(CombatError::NoSpellPrepared)?;

        ctx.events.publish(GameEvent::ProjectileFired {
            source: attacker,
            target: victim,
            projectile: spell.projectile,
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
        // Magic may splash for zero even on an accurate cast.
        let damage = if accurate {
            formulas::random_hit(
                spell.max_hit,
                CombatType::Magic,
                ctx.rng,
                ctx.seed(attacker, roll::DAMAGE),
            )
        } else {
            0
        };

        Ok(HitPlan::new(CombatType::Magic)
            .with_hit(Hit::new(damage), accurate)
            .with_experience(&[combat_core::types::Skill::Magic])
            .with_spell_yield(spell.base_experience))
    }

    fn on_success(
        &self,
        ctx: &mut CombatContext<'_>,
        attacker: ActorId,
        victim: ActorId,
        _damage: u32,
    ) {
        let debuff = ctx
            .world
            .get(attacker)
            .and_then(|a| a.spell.as_ref())
            .and_then(|s| s.weaken);
        if let Some(debuff) = debuff {
            effects::weaken(ctx, victim, debuff, WEAKEN_DURATION);
        }
    }
}
