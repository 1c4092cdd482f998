//! Maximum-hit and damage-roll calculations.

use crate::config::CombatConfig;
use crate::rng::RngOracle;
use crate::snapshot::{CombatSnapshot, SetEffect, WeakenKind};
use crate::types::{ActorKind, CombatType};

/// Maximum damage one hit from `attacker` can deal.
///
/// NPC actors use their definition-supplied cap, cut by any active strength
/// weaken. Players under melee/ranged use the effective-strength formula:
///
/// ```text
/// eff = base × prayer + style_bonus        (×1.8 when base ≤ 10)
/// max = 1.3 + eff/10 + bonus/80 + eff·bonus/640
/// ```
///
/// scaled by the active special-attack strength multiplier and truncated.
/// The `Frenzy` set passive then adds damage proportional to health lost.
///
/// Magic is never computed here: the spell being cast supplies its own max
/// hit, so a magic query returns zero by contract.
pub fn max_hit(attacker: &CombatSnapshot, combat_type: CombatType, config: &CombatConfig) -> u32 {
    if attacker.kind == ActorKind::Npc {
        let cap = f64::from(attacker.npc_max_hit.unwrap_or(0));
        return (cap * attacker.weaken_factor(WeakenKind::Strength)) as u32;
    }

    let base = match combat_type {
        CombatType::Melee => attacker.levels.strength,
        CombatType::Ranged => attacker.levels.ranged,
        CombatType::Magic => return 0,
    };

    let mut effective = f64::from(base) * attacker.prayers.strength_multiplier()
        + f64::from(attacker.fight_style.strength_bonus());
    if base <= config.low_level_threshold {
        effective *= config.low_level_multiplier;
    }

    let bonus = f64::from(attacker.bonuses.strength);
    let mut damage =
        1.3 + effective / 10.0 + bonus / 80.0 + effective * bonus / 640.0;
    damage *= attacker.special.strength;
    let mut damage = damage as u32;

    if attacker.set_effect == Some(SetEffect::Frenzy) && attacker.max_health > 0 {
        let lost = f64::from(attacker.lost_health()) / f64::from(attacker.max_health);
        damage += (f64::from(damage) * lost) as u32;
    }

    damage
}

/// Draw the damage of one hit against a computed maximum.
///
/// Melee and ranged hits land for at least 1 when the maximum allows it;
/// magic can deal zero even when the accuracy roll succeeded.
pub fn random_hit(
    max: u32,
    combat_type: CombatType,
    rng: &dyn RngOracle,
    seed: u64,
) -> u32 {
    match combat_type {
        CombatType::Melee | CombatType::Ranged => {
            if max == 0 {
                0
            } else {
                rng.range(seed, 1, max)
            }
        }
        CombatType::Magic => rng.range(seed, 0, max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SplitMix64;
    use crate::snapshot::{Levels, PrayerTier, SpecialMultipliers, Weaken};
    use crate::types::FightStyle;

    fn config() -> CombatConfig {
        CombatConfig::new()
    }

    #[test]
    fn npc_cap_is_cut_by_strength_weaken() {
        let mut npc = CombatSnapshot::npc(Levels::uniform(50), 20);
        assert_eq!(max_hit(&npc, CombatType::Melee, &config()), 20);

        npc.weaken = Some(Weaken::new(WeakenKind::Strength, 0.5));
        assert_eq!(max_hit(&npc, CombatType::Melee, &config()), 10);

        // A defence weaken leaves the cap alone.
        npc.weaken = Some(Weaken::new(WeakenKind::Defence, 0.5));
        assert_eq!(max_hit(&npc, CombatType::Melee, &config()), 20);
    }

    #[test]
    fn player_melee_formula() {
        let mut player = CombatSnapshot::player(Levels::uniform(80));
        player.bonuses.strength = 60;
        player.fight_style = FightStyle::Aggressive;
        player.prayers.strength = Some(PrayerTier::High);

        // eff = 80 × 1.15 + 3 = 95, max = 1.3 + 9.5 + 0.75 + 8.90625 = 20.45..
        let max = max_hit(&player, CombatType::Melee, &config());
        assert_eq!(max, 20);
    }

    #[test]
    fn low_level_multiplier_applies_at_threshold() {
        let player = CombatSnapshot::player(Levels::uniform(10));
        // eff = 10 × 1.8 = 18, max = 1.3 + 1.8 = 3.1
        assert_eq!(max_hit(&player, CombatType::Melee, &config()), 3);

        let player = CombatSnapshot::player(Levels::uniform(11));
        // eff = 11, max = 1.3 + 1.1 = 2.4
        assert_eq!(max_hit(&player, CombatType::Melee, &config()), 2);
    }

    #[test]
    fn special_multiplier_scales_damage() {
        let mut player = CombatSnapshot::player(Levels::uniform(80));
        player.bonuses.strength = 60;
        let base = max_hit(&player, CombatType::Melee, &config());

        player.special = SpecialMultipliers {
            accuracy: 1.0,
            strength: 1.25,
        };
        assert!(max_hit(&player, CombatType::Melee, &config()) > base);
    }

    #[test]
    fn frenzy_adds_damage_for_lost_health() {
        let mut player = CombatSnapshot::player(Levels::uniform(80));
        player.bonuses.strength = 60;
        player.set_effect = Some(SetEffect::Frenzy);
        let full = max_hit(&player, CombatType::Melee, &config());

        player.health = player.max_health / 4;
        let hurt = max_hit(&player, CombatType::Melee, &config());
        assert!(hurt > full, "hurt={hurt} full={full}");
    }

    #[test]
    fn magic_max_hit_is_supplied_by_the_spell() {
        let player = CombatSnapshot::player(Levels::uniform(80));
        assert_eq!(max_hit(&player, CombatType::Magic, &config()), 0);
    }

    #[test]
    fn melee_hits_never_roll_below_one() {
        let rng = SplitMix64;
        for seed in 0..500 {
            let hit = random_hit(12, CombatType::Melee, &rng, seed);
            assert!((1..=12).contains(&hit));
        }
    }

    #[test]
    fn magic_hits_can_roll_zero() {
        let rng = SplitMix64;
        let rolled_zero = (0..500).any(|seed| random_hit(3, CombatType::Magic, &rng, seed) == 0);
        assert!(rolled_zero);
    }

    #[test]
    fn zero_max_yields_zero() {
        assert_eq!(random_hit(0, CombatType::Melee, &SplitMix64, 1), 0);
        assert_eq!(random_hit(0, CombatType::Magic, &SplitMix64, 1), 0);
    }
}
