//! Resolution delays, weapon reach, and level-gap helpers.

use crate::types::{CombatType, WeaponClass};

/// Ticks between strategy execution and hit application.
///
/// Melee lands next tick; projectiles and spells travel longer. These
/// constants are part of the resolution contract and round-trip unchanged
/// for every combat type.
pub const fn hit_delay(combat_type: CombatType) -> u32 {
    match combat_type {
        CombatType::Melee => 1,
        CombatType::Ranged => 2,
        CombatType::Magic => 3,
    }
}

/// Reach in tiles for each weapon class.
pub const fn attack_distance(class: WeaponClass) -> u32 {
    match class {
        WeaponClass::Unarmed
        | WeaponClass::Dagger
        | WeaponClass::Scimitar
        | WeaponClass::Mace
        | WeaponClass::Battleaxe
        | WeaponClass::Warhammer
        | WeaponClass::Greatsword => 1,
        WeaponClass::Spear | WeaponClass::Halberd => 2,
        WeaponClass::Thrown => 4,
        WeaponClass::Shortbow | WeaponClass::Crossbow => 7,
        WeaponClass::Longbow | WeaponClass::Staff => 8,
    }
}

/// Symmetric combat-level gap, used by the wilderness range-restriction
/// rules in the zone collaborator.
pub const fn combat_level_difference(a: u32, b: u32) -> u32 {
    a.abs_diff(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn delays_round_trip_for_all_combat_types() {
        assert_eq!(hit_delay(CombatType::Melee), 1);
        assert_eq!(hit_delay(CombatType::Ranged), 2);
        assert_eq!(hit_delay(CombatType::Magic), 3);
        for combat_type in CombatType::iter() {
            assert!((1..=3).contains(&hit_delay(combat_type)));
        }
    }

    #[test]
    fn every_weapon_class_has_a_reach() {
        for class in WeaponClass::iter() {
            let reach = attack_distance(class);
            assert!((1..=8).contains(&reach), "{class} reach {reach}");
        }
        assert_eq!(attack_distance(WeaponClass::Halberd), 2);
        assert_eq!(attack_distance(WeaponClass::Shortbow), 7);
    }

    #[test]
    fn level_difference_is_symmetric() {
        assert_eq!(combat_level_difference(126, 3), 123);
        assert_eq!(combat_level_difference(3, 126), 123);
        assert_eq!(combat_level_difference(44, 44), 0);
    }
}
