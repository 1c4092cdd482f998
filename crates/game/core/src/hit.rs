//! Hits and the per-attack hit plan.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::types::{CombatType, Skill};

/// Damage classification carried by a single hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageKind {
    Regular,
    Poison,
    Disease,
}

/// One immutable damage quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    pub damage: u32,
    pub kind: DamageKind,
}

impl Hit {
    pub const fn new(damage: u32) -> Self {
        Self {
            damage,
            kind: DamageKind::Regular,
        }
    }

    pub const fn with_kind(damage: u32, kind: DamageKind) -> Self {
        Self { damage, kind }
    }
}

/// A hit inside a plan: the damage plus whether its accuracy roll landed.
/// Strategies set the damage of an inaccurate hit to zero; the flag is kept
/// so resolution can distinguish a blocked hit from a landed zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedHit {
    pub hit: Hit,
    pub accurate: bool,
}

/// Precomputed outcome of one strategy execution.
///
/// Built once when the attack timer fires, consumed exactly once by the
/// delayed resolution task, then dropped. Holds up to four hits; a plan may
/// legitimately hold zero hits yet flag itself accurate (pure-effect
/// specials that deal their damage through hooks).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitPlan {
    hits: ArrayVec<PlannedHit, { CombatConfig::MAX_HITS_PER_PLAN }>,
    combat_type: CombatType,
    experience: ArrayVec<Skill, 3>,
    /// Accuracy override for plans with no precomputed hits.
    force_accurate: bool,
    /// Base experience yield of the spell behind a magic plan.
    spell_yield: Option<f64>,
}

impl HitPlan {
    pub fn new(combat_type: CombatType) -> Self {
        Self {
            hits: ArrayVec::new(),
            combat_type,
            experience: ArrayVec::new(),
            force_accurate: false,
            spell_yield: None,
        }
    }

    /// Append a hit. Silently ignores hits past the structural limit; four
    /// simultaneous hits is already the most any weapon produces.
    pub fn push_hit(&mut self, hit: Hit, accurate: bool) {
        let _ = self.hits.try_push(PlannedHit { hit, accurate });
    }

    #[must_use]
    pub fn with_hit(mut self, hit: Hit, accurate: bool) -> Self {
        self.push_hit(hit, accurate);
        self
    }

    /// Mark the plan accurate independent of its hits, for pure-effect
    /// specials.
    #[must_use]
    pub fn accurate_without_hits(mut self) -> Self {
        self.force_accurate = true;
        self
    }

    #[must_use]
    pub fn with_experience(mut self, skills: &[Skill]) -> Self {
        self.experience.clear();
        for &skill in skills.iter().take(self.experience.capacity()) {
            self.experience.push(skill);
        }
        self
    }

    #[must_use]
    pub fn with_spell_yield(mut self, base_experience: f64) -> Self {
        self.spell_yield = Some(base_experience);
        self
    }

    pub fn hits(&self) -> &[PlannedHit] {
        &self.hits
    }

    pub fn hits_mut(&mut self) -> &mut [PlannedHit] {
        &mut self.hits
    }

    pub const fn combat_type(&self) -> CombatType {
        self.combat_type
    }

    pub fn experience_skills(&self) -> &[Skill] {
        &self.experience
    }

    /// True when any hit landed, or when the plan flags itself accurate
    /// despite carrying no hits.
    pub fn accurate(&self) -> bool {
        self.force_accurate || self.hits.iter().any(|h| h.accurate)
    }

    pub const fn spell_yield(&self) -> Option<f64> {
        self.spell_yield
    }

    /// Sum of all precomputed damage. Inaccurate hits carry zero damage, so
    /// this is the damage that will actually land.
    pub fn total_damage(&self) -> u32 {
        self.hits.iter().map(|h| h.hit.damage).sum()
    }

    /// Scale every hit, used by pre-resolution transforms.
    pub fn scale_damage(&mut self, factor: f64) {
        for planned in &mut self.hits {
            planned.hit.damage = (f64::from(planned.hit.damage) * factor) as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_caps_at_four_hits() {
        let mut plan = HitPlan::new(CombatType::Melee);
        for i in 0..6 {
            plan.push_hit(Hit::new(i), true);
        }
        assert_eq!(plan.hits().len(), 4);
        assert_eq!(plan.total_damage(), 0 + 1 + 2 + 3);
    }

    #[test]
    fn accuracy_follows_hits() {
        let miss = HitPlan::new(CombatType::Melee).with_hit(Hit::new(0), false);
        assert!(!miss.accurate());

        let mixed = HitPlan::new(CombatType::Melee)
            .with_hit(Hit::new(0), false)
            .with_hit(Hit::new(7), true);
        assert!(mixed.accurate());
    }

    #[test]
    fn zero_hit_plan_can_force_accuracy() {
        let plan = HitPlan::new(CombatType::Melee).accurate_without_hits();
        assert!(plan.accurate());
        assert_eq!(plan.total_damage(), 0);
    }
}
