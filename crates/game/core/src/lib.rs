//! Deterministic combat rules shared across the valegard stack.
//!
//! `combat-core` defines the canonical mathematics (accuracy, max hits,
//! delays), the hit-plan and damage-attribution data model, and the seeded
//! randomness oracle. Everything here is pure: the runtime owns state and
//! time, this crate only computes.

pub mod config;
pub mod damage_cache;
pub mod error;
pub mod formulas;
pub mod hit;
pub mod rng;
pub mod snapshot;
pub mod special;
pub mod types;
pub mod zone;

pub use config::CombatConfig;
pub use damage_cache::{DamageCache, DamageEntry};
pub use error::{CombatError, ErrorSeverity};
pub use formulas::{
    attack_distance, attack_roll, combat_level_difference, defence_roll, hit_chance, hit_delay,
    hit_probability, max_hit, random_hit, roll_hit,
};
pub use hit::{DamageKind, Hit, HitPlan, PlannedHit};
pub use rng::{RngOracle, SplitMix64, compute_seed, roll};
pub use snapshot::{
    CombatSnapshot, EquipmentBonuses, Levels, OverheadPrayers, PrayerBoosts, PrayerTier,
    SetEffect, SpecialMultipliers, Weaken, WeakenKind,
};
pub use special::SpecialAttackKind;
pub use types::{ActorId, ActorKind, CombatType, FightStyle, Position, Skill, Tick, WeaponClass};
pub use zone::{ZoneOracle, ZoneRect};
