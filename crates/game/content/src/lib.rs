//! Game data for the valegard combat stack.
//!
//! `combat-content` ships the embedded definition catalogs (NPCs, weapons)
//! and the default zone rules. The runtime builds its injected registries
//! from these catalogs at startup; nothing here is a hidden global.

pub mod npcs;
pub mod weapons;
pub mod zones;

pub use npcs::{NpcCatalog, NpcCombatDefinition};
pub use weapons::{WeaponCatalog, WeaponDefinition};
pub use zones::OpenWorldRules;
