//! Special-attack identities.
//!
//! A special attack is a one-time strategy override consuming special energy
//! for an enhanced attack. The closed set of identities lives here so weapon
//! definitions can name them; the behavior behind each variant is a strategy
//! in the runtime's dispatch table.

use strum::{Display, EnumIter};

/// Closed set of weapon special attacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialAttackKind {
    /// Two fast stabs in a single attack, each rolled independently.
    TwinFang,
    /// A crushing blow that drains the victim's run energy.
    Sunder,
    /// A bolt that freezes the victim in place for several ticks.
    Glaciate,
    /// A sweeping cleave hitting nearby actors in multi-combat areas.
    Reaver,
    /// Activation-only: sacrifices the wielder's own combat stats for a
    /// large strength buff. Has no attack component; invoking it as an
    /// attack is a programming-contract violation.
    Ascendance,
}

impl SpecialAttackKind {
    /// Special energy consumed per use, on the 0–100 scale.
    pub const fn energy_cost(self) -> u32 {
        match self {
            SpecialAttackKind::TwinFang => 25,
            SpecialAttackKind::Sunder => 60,
            SpecialAttackKind::Glaciate => 50,
            SpecialAttackKind::Reaver => 50,
            SpecialAttackKind::Ascendance => 100,
        }
    }

    /// True for buffs that activate immediately instead of overriding the
    /// next attack.
    pub const fn is_activation_only(self) -> bool {
        matches!(self, SpecialAttackKind::Ascendance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn costs_stay_on_the_energy_scale() {
        for kind in SpecialAttackKind::iter() {
            assert!((1..=100).contains(&kind.energy_cost()));
        }
    }
}
