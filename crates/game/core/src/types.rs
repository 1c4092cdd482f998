//! Core identifier and coordinate types shared across the combat stack.
//!
//! Actors are referenced by [`ActorId`] handles into the world registry, never
//! by direct references. A despawned actor leaves a dangling id behind, which
//! every consumer revalidates against the registry before use.

use strum::{Display, EnumIter};

/// Handle identifying a combat-capable entity in the world registry.
///
/// Ids are opaque and never reused within a session. Holding an `ActorId`
/// grants no liveness guarantee; the registry is the single source of truth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl ActorId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for ActorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Whether an actor is driven by a player session or by the AI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActorKind {
    Player,
    Npc,
}

/// Discrete simulation time unit. One tick is a fixed wall-clock interval
/// (600 ms); all scheduled combat logic advances in whole ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Ticks elapsed since `earlier`, saturating at zero for out-of-order
    /// inputs.
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    pub const fn advance(self, ticks: u64) -> Tick {
        Tick(self.0 + ticks)
    }
}

impl core::ops::Add<u64> for Tick {
    type Output = Tick;

    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

/// Tile coordinates on the game surface.
///
/// Combat only needs range queries, so the type is deliberately small:
/// distance is Chebyshev (diagonal steps count as one tile), matching how
/// reach and kill-credit proximity are defined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance in tiles.
    pub fn distance(self, other: Position) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// True when `other` lies within `radius` tiles.
    pub fn within(self, other: Position, radius: u32) -> bool {
        self.distance(other) <= radius
    }
}

/// The three resolution pipelines an attack can run through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatType {
    Melee,
    Ranged,
    Magic,
}

/// Skills that combat can award experience to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Skill {
    Attack,
    Strength,
    Defence,
    Hitpoints,
    Ranged,
    Magic,
    Prayer,
}

/// Player-selected fight style. Each style carries a small flat bonus to one
/// or more rolls and designates the skills that receive combat experience.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FightStyle {
    #[default]
    Accurate,
    Aggressive,
    Defensive,
    Controlled,
}

impl FightStyle {
    /// Flat bonus applied to the attack roll: +3 accurate, +1 controlled.
    pub const fn accuracy_bonus(self) -> i32 {
        match self {
            FightStyle::Accurate => 3,
            FightStyle::Controlled => 1,
            FightStyle::Aggressive | FightStyle::Defensive => 0,
        }
    }

    /// Flat bonus applied to effective strength: +3 aggressive, +1 controlled.
    pub const fn strength_bonus(self) -> i32 {
        match self {
            FightStyle::Aggressive => 3,
            FightStyle::Controlled => 1,
            FightStyle::Accurate | FightStyle::Defensive => 0,
        }
    }

    /// Flat bonus applied to the defence roll: +3 defensive, +1 controlled.
    pub const fn defence_bonus(self) -> i32 {
        match self {
            FightStyle::Defensive => 3,
            FightStyle::Controlled => 1,
            FightStyle::Accurate | FightStyle::Aggressive => 0,
        }
    }

    /// Skills credited with combat experience for this style under the given
    /// combat type. Magic ignores the style and trains Magic directly.
    pub fn experience_skills(self, combat_type: CombatType) -> &'static [Skill] {
        match combat_type {
            CombatType::Magic => &[Skill::Magic],
            CombatType::Ranged => &[Skill::Ranged],
            CombatType::Melee => match self {
                FightStyle::Accurate => &[Skill::Attack],
                FightStyle::Aggressive => &[Skill::Strength],
                FightStyle::Defensive => &[Skill::Defence],
                FightStyle::Controlled => &[Skill::Attack, Skill::Strength, Skill::Defence],
            },
        }
    }
}

/// Weapon classes recognized by the reach table.
///
/// The set is closed: every equippable weapon maps to exactly one class at
/// definition-load time, so an unmapped class cannot reach the formulas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponClass {
    #[default]
    Unarmed,
    Dagger,
    Scimitar,
    Mace,
    Battleaxe,
    Warhammer,
    Spear,
    Halberd,
    Greatsword,
    Shortbow,
    Longbow,
    Crossbow,
    Thrown,
    Staff,
}

impl WeaponClass {
    /// True for classes resolved through the ranged pipeline.
    pub const fn is_ranged(self) -> bool {
        matches!(
            self,
            WeaponClass::Shortbow | WeaponClass::Longbow | WeaponClass::Crossbow | WeaponClass::Thrown
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chebyshev_distance_counts_diagonals_once() {
        let a = Position::new(10, 10);
        let b = Position::new(13, 12);
        assert_eq!(a.distance(b), 3);
        assert!(a.within(b, 3));
        assert!(!a.within(b, 2));
    }

    #[test]
    fn controlled_style_trains_all_melee_skills() {
        let skills = FightStyle::Controlled.experience_skills(CombatType::Melee);
        assert_eq!(skills, &[Skill::Attack, Skill::Strength, Skill::Defence]);
        assert_eq!(FightStyle::Controlled.accuracy_bonus(), 1);
        assert_eq!(FightStyle::Accurate.accuracy_bonus(), 3);
    }

    #[test]
    fn tick_since_saturates() {
        assert_eq!(Tick(5).since(Tick(9)), 0);
        assert_eq!(Tick(9).since(Tick(5)), 4);
    }
}
