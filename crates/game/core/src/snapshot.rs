//! Per-actor combat value object consumed by the formulas.
//!
//! The runtime assembles a [`CombatSnapshot`] from an actor's live state at
//! the moment a roll is made. Formulas only ever see this immutable view,
//! which keeps them pure and directly testable.

use bitflags::bitflags;

use crate::types::{ActorKind, CombatType, FightStyle};

/// Base skill levels relevant to combat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Levels {
    pub attack: u32,
    pub strength: u32,
    pub defence: u32,
    pub ranged: u32,
    pub magic: u32,
    pub hitpoints: u32,
}

impl Levels {
    /// Uniform levels, convenient for NPC definitions and tests.
    pub const fn uniform(level: u32) -> Self {
        Self {
            attack: level,
            strength: level,
            defence: level,
            ranged: level,
            magic: level,
            hitpoints: level,
        }
    }

    /// Level driving the attack roll for the given combat type.
    pub const fn offensive(&self, combat_type: CombatType) -> u32 {
        match combat_type {
            CombatType::Melee => self.attack,
            CombatType::Ranged => self.ranged,
            CombatType::Magic => self.magic,
        }
    }
}

/// Equipment bonuses, offensive per combat type plus a shared strength bonus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentBonuses {
    pub attack_melee: i32,
    pub attack_ranged: i32,
    pub attack_magic: i32,
    pub defence_melee: i32,
    pub defence_ranged: i32,
    pub defence_magic: i32,
    pub strength: i32,
}

impl EquipmentBonuses {
    pub const fn attack(&self, combat_type: CombatType) -> i32 {
        match combat_type {
            CombatType::Melee => self.attack_melee,
            CombatType::Ranged => self.attack_ranged,
            CombatType::Magic => self.attack_magic,
        }
    }

    pub const fn defence(&self, combat_type: CombatType) -> i32 {
        match combat_type {
            CombatType::Melee => self.defence_melee,
            CombatType::Ranged => self.defence_ranged,
            CombatType::Magic => self.defence_magic,
        }
    }
}

/// Boost tier of an accuracy/strength/defence prayer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrayerTier {
    /// +5%
    Low,
    /// +10%
    Mid,
    /// +15%
    High,
}

impl PrayerTier {
    pub const fn multiplier(self) -> f64 {
        match self {
            PrayerTier::Low => 1.05,
            PrayerTier::Mid => 1.10,
            PrayerTier::High => 1.15,
        }
    }
}

/// Active stat-boosting prayers, one optional tier per roll family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrayerBoosts {
    pub accuracy: Option<PrayerTier>,
    pub strength: Option<PrayerTier>,
    pub defence: Option<PrayerTier>,
}

impl PrayerBoosts {
    pub fn accuracy_multiplier(&self) -> f64 {
        self.accuracy.map_or(1.0, PrayerTier::multiplier)
    }

    pub fn strength_multiplier(&self) -> f64 {
        self.strength.map_or(1.0, PrayerTier::multiplier)
    }

    pub fn defence_multiplier(&self) -> f64 {
        self.defence.map_or(1.0, PrayerTier::multiplier)
    }
}

bitflags! {
    /// Overhead prayer passives consulted during hit resolution.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct OverheadPrayers: u8 {
        /// Self-heal and deactivate when health drops critically low.
        const REDEMPTION = 1 << 0;
        /// Damage nova around the wearer on death.
        const RETRIBUTION = 1 << 1;
        /// Drain the opponent's devotion proportional to damage dealt.
        const SMITE = 1 << 2;
    }
}

/// Full four-piece armour set passives.
///
/// Detection happens in the runtime when equipment changes; the formulas and
/// resolution pipeline only consume the detected variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetEffect {
    /// Forces the victim's defence roll to zero outright.
    SureStrike,
    /// Bonus damage proportional to the wearer's missing health.
    Frenzy,
    /// 1-in-4 chance per accurate hit to leech health equal to a quarter of
    /// the damage dealt.
    Siphon,
    /// 1-in-4 chance per accurate hit to drain the victim's run energy.
    Sap,
    /// 1-in-4 chance per accurate hit to drain a victim combat stat.
    Cripple,
}

/// Which rating a weaken debuff cuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeakenKind {
    Attack,
    Strength,
    Defence,
}

/// Temporary percentage cut to one rating.
///
/// Stacking is first-applied-wins: a second weaken landing while one is
/// active is discarded until the first expires.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weaken {
    pub kind: WeakenKind,
    /// Fraction removed from the rating, in `[0, 1]`.
    pub rate: f64,
}

impl Weaken {
    /// Low-tier cut rate.
    pub const LOW_RATE: f64 = 0.05;
    /// High-tier cut rate.
    pub const HIGH_RATE: f64 = 0.10;

    pub const fn new(kind: WeakenKind, rate: f64) -> Self {
        Self { kind, rate }
    }

    pub const fn low(kind: WeakenKind) -> Self {
        Self::new(kind, Self::LOW_RATE)
    }

    pub const fn high(kind: WeakenKind) -> Self {
        Self::new(kind, Self::HIGH_RATE)
    }

    /// Multiplier applied to a rating of the matching kind.
    pub fn factor(&self, kind: WeakenKind) -> f64 {
        if self.kind == kind {
            1.0 - self.rate
        } else {
            1.0
        }
    }
}

/// Accuracy and strength multipliers granted by an active special attack.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialMultipliers {
    pub accuracy: f64,
    pub strength: f64,
}

impl Default for SpecialMultipliers {
    fn default() -> Self {
        Self {
            accuracy: 1.0,
            strength: 1.0,
        }
    }
}

/// Immutable view of everything the combat formulas need to know about one
/// actor at one instant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSnapshot {
    pub kind: ActorKind,
    pub levels: Levels,
    pub health: u32,
    pub max_health: u32,
    pub bonuses: EquipmentBonuses,
    pub prayers: PrayerBoosts,
    pub overheads: OverheadPrayers,
    pub fight_style: FightStyle,
    pub special: SpecialMultipliers,
    pub set_effect: Option<SetEffect>,
    pub weaken: Option<Weaken>,
    /// Definition-supplied damage cap; present for NPC actors only.
    pub npc_max_hit: Option<u32>,
    pub combat_level: u32,
}

impl CombatSnapshot {
    /// Baseline snapshot for a player actor; builders in the runtime and in
    /// tests adjust the fields they care about.
    pub fn player(levels: Levels) -> Self {
        Self {
            kind: ActorKind::Player,
            health: levels.hitpoints,
            max_health: levels.hitpoints,
            levels,
            bonuses: EquipmentBonuses::default(),
            prayers: PrayerBoosts::default(),
            overheads: OverheadPrayers::default(),
            fight_style: FightStyle::default(),
            special: SpecialMultipliers::default(),
            set_effect: None,
            weaken: None,
            npc_max_hit: None,
            combat_level: levels.attack.max(levels.ranged).max(levels.magic),
        }
    }

    /// Baseline snapshot for an NPC with a definition-supplied max hit.
    pub fn npc(levels: Levels, max_hit: u32) -> Self {
        Self {
            kind: ActorKind::Npc,
            npc_max_hit: Some(max_hit),
            ..Self::player(levels)
        }
    }

    /// Rating cut from an active weaken of the given kind, 1.0 when absent.
    pub fn weaken_factor(&self, kind: WeakenKind) -> f64 {
        self.weaken.map_or(1.0, |w| w.factor(kind))
    }

    /// Health the actor has lost, used by the Frenzy set passive.
    pub fn lost_health(&self) -> u32 {
        self.max_health.saturating_sub(self.health)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prayer_tiers_scale_multiplicatively() {
        let boosts = PrayerBoosts {
            accuracy: Some(PrayerTier::High),
            strength: None,
            defence: Some(PrayerTier::Low),
        };
        assert_eq!(boosts.accuracy_multiplier(), 1.15);
        assert_eq!(boosts.strength_multiplier(), 1.0);
        assert_eq!(boosts.defence_multiplier(), 1.05);
    }

    #[test]
    fn weaken_only_cuts_matching_rating() {
        let weaken = Weaken::new(WeakenKind::Strength, 0.5);
        assert_eq!(weaken.factor(WeakenKind::Strength), 0.5);
        assert_eq!(weaken.factor(WeakenKind::Defence), 1.0);
    }
}
