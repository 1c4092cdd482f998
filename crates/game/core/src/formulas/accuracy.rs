//! Hit-chance calculation.

use crate::config::CombatConfig;
use crate::rng::RngOracle;
use crate::snapshot::{CombatSnapshot, SetEffect, WeakenKind};
use crate::types::CombatType;

/// Convert an attack roll and a defence roll into a hit probability.
///
/// # Formula
///
/// ```text
/// if A < D:  p = 1 - (D + 1) / (2A)
/// else:      p = (A - 1) / (2D)
/// clamped to [floor, ceiling]
/// ```
///
/// The two branches meet at roughly 0.5 when A == D. Degenerate rolls are
/// resolved before the division: a non-positive attack roll bottoms out at
/// the floor, a non-positive defence roll tops out at the ceiling. The clamp
/// guarantees an attack is never a certainty in either direction.
pub fn hit_probability(attack_roll: f64, defence_roll: f64, config: &CombatConfig) -> f64 {
    if attack_roll <= 0.0 {
        return config.hit_chance_floor;
    }
    if defence_roll <= 0.0 {
        return config.hit_chance_ceiling;
    }

    let chance = if attack_roll < defence_roll {
        1.0 - (defence_roll + 1.0) / (2.0 * attack_roll)
    } else {
        (attack_roll - 1.0) / (2.0 * defence_roll)
    };

    chance.clamp(config.hit_chance_floor, config.hit_chance_ceiling)
}

/// Attacker's roll: effective level (base × prayer + style bonus) scaled by
/// equipment bonus, the active special-attack accuracy multiplier, and any
/// attack weaken.
pub fn attack_roll(attacker: &CombatSnapshot, combat_type: CombatType) -> f64 {
    let level = f64::from(attacker.levels.offensive(combat_type));
    let effective = level * attacker.prayers.accuracy_multiplier()
        + f64::from(attacker.fight_style.accuracy_bonus());

    let bonus = f64::from(attacker.bonuses.attack(combat_type));
    effective * ((bonus + 64.0) / 64.0)
        * attacker.special.accuracy
        * attacker.weaken_factor(WeakenKind::Attack)
}

/// Victim's roll against the given attacker.
///
/// Two rules can zero the roll outright:
/// - the attacker wears a full `SureStrike` set;
/// - the victim's defence bonus sits at or below the negative floor, which
///   exposes a 1-in-8 bypass roll (the odds are fixed; they model a rare
///   high-tier passive proc).
pub fn defence_roll(
    attacker: &CombatSnapshot,
    victim: &CombatSnapshot,
    combat_type: CombatType,
    config: &CombatConfig,
    rng: &dyn RngOracle,
    bypass_seed: u64,
) -> f64 {
    if attacker.set_effect == Some(SetEffect::SureStrike) {
        return 0.0;
    }

    let bonus = victim.bonuses.defence(combat_type);
    if bonus <= config.negative_bonus_floor && rng.one_in(bypass_seed, config.defence_bypass_odds) {
        return 0.0;
    }

    let effective = f64::from(victim.levels.defence) * victim.prayers.defence_multiplier()
        + f64::from(victim.fight_style.defence_bonus());

    effective * ((f64::from(bonus) + 64.0) / 64.0) * victim.weaken_factor(WeakenKind::Defence)
}

/// Probability that `attacker` lands a hit of `combat_type` on `victim`.
pub fn hit_chance(
    attacker: &CombatSnapshot,
    victim: &CombatSnapshot,
    combat_type: CombatType,
    config: &CombatConfig,
    rng: &dyn RngOracle,
    bypass_seed: u64,
) -> f64 {
    let attack = attack_roll(attacker, combat_type);
    let defence = defence_roll(attacker, victim, combat_type, config, rng, bypass_seed);
    hit_probability(attack, defence, config)
}

/// Draw the accuracy roll: true when the attack lands.
pub fn roll_hit(
    attacker: &CombatSnapshot,
    victim: &CombatSnapshot,
    combat_type: CombatType,
    config: &CombatConfig,
    rng: &dyn RngOracle,
    accuracy_seed: u64,
    bypass_seed: u64,
) -> bool {
    let chance = hit_chance(attacker, victim, combat_type, config, rng, bypass_seed);
    rng.fraction(accuracy_seed) < chance
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
    fn worked_example_matches() {
        // A=50, D=80 -> 1 - 81/100 = 0.19 before clamping.
        let p = hit_probability(50.0, 80.0, &config());
        assert!((p - 0.19).abs() < 1e-9);
    }

    #[test]
    fn probability_is_never_certain() {
        let cfg = config();
        for (a, d) in [(1.0, 10_000.0), (10_000.0, 1.0), (0.0, 50.0), (50.0, 0.0)] {
            let p = hit_probability(a, d, &cfg);
            assert!(p >= cfg.hit_chance_floor, "p={p} for A={a} D={d}");
            assert!(p <= cfg.hit_chance_ceiling, "p={p} for A={a} D={d}");
        }
    }

    #[test]
    fn branches_meet_near_one_half() {
        let cfg = config();
        let below = hit_probability(99.999, 100.0, &cfg);
        let above = hit_probability(100.0, 100.0, &cfg);
        assert!((below - above).abs() < 0.02);
    }

    #[test]
    fn prayers_and_style_raise_the_attack_roll() {
        let mut attacker = CombatSnapshot::player(Levels::uniform(60));
        let base = attack_roll(&attacker, CombatType::Melee);

        attacker.prayers.accuracy = Some(PrayerTier::High);
        attacker.fight_style = FightStyle::Accurate;
        let boosted = attack_roll(&attacker, CombatType::Melee);
        assert!(boosted > base);

        attacker.special = SpecialMultipliers {
            accuracy: 1.25,
            strength: 1.0,
        };
        assert!(attack_roll(&attacker, CombatType::Melee) > boosted);
    }

    #[test]
    fn sure_strike_zeroes_defence() {
        let mut attacker = CombatSnapshot::player(Levels::uniform(60));
        attacker.set_effect = Some(SetEffect::SureStrike);
        let victim = CombatSnapshot::player(Levels::uniform(99));

        let roll = defence_roll(
            &attacker,
            &victim,
            CombatType::Melee,
            &config(),
            &SplitMix64,
            0,
        );
        assert_eq!(roll, 0.0);

        let chance = hit_chance(
            &attacker,
            &victim,
            CombatType::Melee,
            &config(),
            &SplitMix64,
            0,
        );
        assert_eq!(chance, config().hit_chance_ceiling);
    }

    #[test]
    fn extreme_negative_bonus_bypasses_defence_at_one_in_eight() {
        let attacker = CombatSnapshot::player(Levels::uniform(60));
        let mut victim = CombatSnapshot::player(Levels::uniform(60));
        victim.bonuses.defence_melee = -40;

        let cfg = config();
        let rng = SplitMix64;
        let bypasses = (0..8000u64)
            .filter(|&seed| {
                defence_roll(&attacker, &victim, CombatType::Melee, &cfg, &rng, seed) == 0.0
            })
            .count();

        // Expect ~1/8 of seeds to zero the roll (binomial, generous bounds).
        assert!((800..1200).contains(&bypasses), "bypasses={bypasses}");
    }

    #[test]
    fn defence_weaken_lowers_the_roll() {
        let attacker = CombatSnapshot::player(Levels::uniform(60));
        let mut victim = CombatSnapshot::player(Levels::uniform(60));
        let clean = defence_roll(
            &victim.clone(),
            &victim,
            CombatType::Melee,
            &config(),
            &SplitMix64,
            0,
        );

        victim.weaken = Some(Weaken::new(WeakenKind::Defence, 0.5));
        let weakened = defence_roll(
            &attacker,
            &victim,
            CombatType::Melee,
            &config(),
            &SplitMix64,
            0,
        );
        assert!((weakened - clean * 0.5).abs() < 1e-9);
    }
}
