//! NPC strategies: the per-combat-type default plus bespoke behaviors
//! selected through definition strategy keys.

use combat_core::error::CombatError;
use combat_core::formulas;
use combat_core::hit::{Hit, HitPlan};
use combat_core::rng::roll;
use combat_core::snapshot::{Weaken, WeakenKind};
use combat_core::types::{ActorId, CombatType};

use super::{CombatStrategy, snapshots};
use crate::combat::effects;
use crate::context::CombatContext;
use crate::events::GameEvent;

/// Roll one definition-capped hit for an NPC attacker.
fn npc_plan(
    ctx: &mut CombatContext<'_>,
    attacker: ActorId,
    victim: ActorId,
    combat_type: CombatType,
) -> Result<HitPlan, CombatError> {
    let (atk, vic) = snapshots(ctx, attacker, victim)?;

    if combat_type != CombatType::Melee {
        let projectile = ctx
            .world
            .get(attacker)
            .and_then(|a| a.npc.as_ref())
            .map_or(0, |n| n.definition_id);
        ctx.events.publish(GameEvent::ProjectileFired {
            source: attacker,
            target: victim,
            projectile,
        });
    }

    let accurate = formulas::roll_hit(
        &atk,
        &vic,
        combat_type,
        ctx.config,
        ctx.rng,
        ctx.seed(attacker, roll::ACCURACY),
        ctx.seed(attacker, roll::DEFENCE_BYPASS),
    );
    let damage = if accurate {
        let max = formulas::max_hit(&atk, combat_type, ctx.config);
        formulas::random_hit(max, combat_type, ctx.rng, ctx.seed(attacker, roll::DAMAGE))
    } else {
        0
    };
    Ok(HitPlan::new(combat_type).with_hit(Hit::new(damage), accurate))
}

/// Definition-driven default NPC behavior for one combat type.
pub(crate) struct NpcStrategy {
    combat_type: CombatType,
}

impl NpcStrategy {
    pub(crate) fn new(combat_type: CombatType) -> Self {
        Self { combat_type }
    }
}

impl CombatStrategy for NpcStrategy {
    fn name(&self) -> &'static str {
        match self.combat_type {
            CombatType::Melee => "npc-melee",
            CombatType::Ranged => "npc-ranged",
            CombatType::Magic => "npc-magic",
        }
    }

    fn attack(
        &self,
        ctx: &mut CombatContext<'_>,
        attacker: ActorId,
        victim: ActorId,
    ) -> Result<HitPlan, CombatError> {
        npc_plan(ctx, attacker, victim, self.combat_type)
    }
}

/// Frost wyrm: magic attacks with a chance to freeze the victim in place.
pub(crate) struct FrostWyrmStrategy;

impl FrostWyrmStrategy {
    const FREEZE_ODDS: u32 = 3;
    const FREEZE_TICKS: u64 = 5;
}

impl CombatStrategy for FrostWyrmStrategy {
    fn name(&self) -> &'static str {
        "frost_wyrm"
    }

    fn attack(
        &self,
        ctx: &mut CombatContext<'_>,
        attacker: ActorId,
        victim: ActorId,
    ) -> Result<HitPlan, CombatError> {
        npc_plan(ctx, attacker, victim, CombatType::Magic)
    }

    fn on_success(
        &self,
        ctx: &mut CombatContext<'_>,
        attacker: ActorId,
        victim: ActorId,
        _damage: u32,
    ) {
        if ctx
            .rng
            .one_in(ctx.seed(attacker, roll::EFFECT), Self::FREEZE_ODDS)
        {
            effects::freeze(ctx, victim, Self::FREEZE_TICKS);
        }
    }
}

/// Gravelord: heavy melee that saps the victim's strength on contact.
pub(crate) struct GravelordStrategy;

impl GravelordStrategy {
    const WEAKEN_DURATION: u64 = 30;
}

impl CombatStrategy for GravelordStrategy {
    fn name(&self) -> &'static str {
        "gravelord"
    }

    fn attack(
        &self,
        ctx: &mut CombatContext<'_>,
        attacker: ActorId,
        victim: ActorId,
    ) -> Result<HitPlan, CombatError> {
        npc_plan(ctx, attacker, victim, CombatType::Melee)
    }

    fn on_success(
        &self,
        ctx: &mut CombatContext<'_>,
        _attacker: ActorId,
        victim: ActorId,
        _damage: u32,
    ) {
        effects::weaken(
            ctx,
            victim,
            Weaken::high(WeakenKind::Strength),
            Self::WEAKEN_DURATION,
        );
    }
}
