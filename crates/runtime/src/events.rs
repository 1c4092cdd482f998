//! Combat event notifications.
//!
//! Everything observable about a fight leaves the engine as a [`GameEvent`]
//! on a broadcast channel: hits, declines, deaths, procs. Consumers (session
//! layer, interface, loggers) subscribe and render; the engine itself never
//! produces user-facing text.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use combat_core::hit::DamageKind;
use combat_core::snapshot::SetEffect;
use combat_core::special::SpecialAttackKind;
use combat_core::types::{ActorId, CombatType, Skill};

/// Why an attack request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclineReason {
    SelfTarget,
    TargetMissing,
    TargetDead,
    /// One of the two actors is already in a fight and the tile is not
    /// multi-combat.
    AlreadyInCombat,
    /// Player-versus-player attempted outside the wilderness.
    OutsideWilderness,
    /// Combat-level gap exceeds the wilderness depth.
    LevelGap,
    /// The zone oracle vetoed the pairing.
    NotPermitted,
    OutOfAmmo,
    NoSpellPrepared,
    NotEnoughEnergy,
}

/// Status effects announced when they land on an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusEffect {
    Poisoned,
    Frozen,
    Weakened,
    EnergyDrained,
    Ascended,
}

/// Animation identifiers the interface layer maps to actual sequences.
pub mod animation {
    pub const HURT: u32 = 1;
    pub const DEATH: u32 = 2;
    pub const SPECIAL: u32 = 3;
}

/// Notifications published by the combat engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    /// A strategy executed and its hits are in flight.
    AttackLaunched {
        attacker: ActorId,
        victim: ActorId,
        combat_type: CombatType,
    },
    /// An attack request or engagement was refused.
    AttackDeclined {
        actor: ActorId,
        target: ActorId,
        reason: DeclineReason,
    },
    /// A hit resolved against a victim. `attacker` is `None` for
    /// environmental damage such as poison ticks.
    HitApplied {
        attacker: Option<ActorId>,
        victim: ActorId,
        damage: u32,
        kind: DamageKind,
        accurate: bool,
        health_after: u32,
    },
    ProjectileFired {
        source: ActorId,
        target: ActorId,
        projectile: u32,
    },
    AnimationPlayed {
        actor: ActorId,
        animation: u32,
    },
    /// Experience hand-off to the progression collaborator.
    ExperienceAwarded {
        actor: ActorId,
        skill: Skill,
        amount: u32,
    },
    StatusApplied {
        actor: ActorId,
        status: StatusEffect,
    },
    SetEffectProcced {
        actor: ActorId,
        effect: SetEffect,
    },
    SpecialDrained {
        actor: ActorId,
        kind: SpecialAttackKind,
        remaining: u32,
    },
    /// Smite drained the victim's devotion points.
    DevotionDrained {
        actor: ActorId,
        remaining: u32,
    },
    /// Redemption fired: the wearer healed and the prayer deactivated.
    RedemptionTriggered {
        actor: ActorId,
        healed: u32,
    },
    /// Retribution nova released around a dying wearer.
    RetributionNova {
        source: ActorId,
    },
    ActorDied {
        victim: ActorId,
        killer: Option<ActorId>,
    },
}

/// Broadcast bus for combat events.
///
/// Publishing is best-effort: with no subscribers the event is dropped, which
/// is normal during headless simulation and tests.
pub struct EventBus {
    tx: broadcast::Sender<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: GameEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!(target: "runtime::events", "no subscribers, event dropped");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.tx.subscribe()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
