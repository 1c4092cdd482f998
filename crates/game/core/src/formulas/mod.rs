//! Combat mathematics.
//!
//! Pure functions over [`CombatSnapshot`](crate::snapshot::CombatSnapshot)
//! values and an injected [`RngOracle`](crate::rng::RngOracle). Nothing in
//! this module mutates state or reads a clock; the runtime supplies every
//! input explicitly.

pub mod accuracy;
pub mod damage;
pub mod timing;

pub use accuracy::{attack_roll, defence_roll, hit_chance, hit_probability, roll_hit};
pub use damage::{max_hit, random_hit};
pub use timing::{attack_distance, combat_level_difference, hit_delay};
