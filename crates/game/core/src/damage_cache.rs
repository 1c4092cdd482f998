//! Damage attribution cache for kill crediting.
//!
//! Each victim tracks who hurt it, how much, and when. On death the cache
//! picks the credited killer among attackers that are still alive, still
//! registered, still nearby, and whose contribution has not timed out.
//!
//! Entries are kept in first-contribution order; expiry is lazy (read-time),
//! matching the contract that a stale entry is excluded but never proactively
//! removed.

use crate::types::{ActorId, ActorKind, Tick};

/// One attacker's running contribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageEntry {
    pub attacker: ActorId,
    pub total: u32,
    pub last_contribution: Tick,
}

impl DamageEntry {
    fn expired(&self, now: Tick, timeout: u64) -> bool {
        now.since(self.last_contribution) >= timeout
    }
}

/// Per-victim mapping from attacker to damage dealt with a contribution
/// timeout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageCache {
    entries: Vec<DamageEntry>,
    timeout: u64,
}

impl DamageCache {
    pub fn new(timeout: u64) -> Self {
        Self {
            entries: Vec::new(),
            timeout,
        }
    }

    /// Record damage dealt by `attacker`.
    ///
    /// No-ops for zero amounts and for attacker kinds that never receive kill
    /// credit (NPCs). A contribution landing after the attacker's previous
    /// entry expired restarts the counter instead of adding to it.
    pub fn add(&mut self, attacker: ActorId, kind: ActorKind, amount: u32, now: Tick) {
        if amount == 0 || kind != ActorKind::Player {
            return;
        }

        if let Some(entry) = self.entries.iter_mut().find(|e| e.attacker == attacker) {
            if entry.expired(now, self.timeout) {
                entry.total = amount;
            } else {
                entry.total += amount;
            }
            entry.last_contribution = now;
        } else {
            self.entries.push(DamageEntry {
                attacker,
                total: amount,
                last_contribution: now,
            });
        }
    }

    /// Select the attacker credited with the kill.
    ///
    /// `eligible` is the caller's registry check: alive, still registered,
    /// and within kill-credit range of the victim. Expired entries are
    /// skipped here. The highest valid total wins; on a tie the earliest
    /// contributor keeps the credit (strictly-greater comparison over
    /// insertion-ordered entries).
    pub fn credited_killer(
        &self,
        now: Tick,
        mut eligible: impl FnMut(ActorId) -> bool,
    ) -> Option<ActorId> {
        let mut best: Option<&DamageEntry> = None;
        for entry in &self.entries {
            if entry.expired(now, self.timeout) || !eligible(entry.attacker) {
                continue;
            }
            match best {
                Some(current) if entry.total <= current.total => {}
                _ => best = Some(entry),
            }
        }
        best.map(|e| e.attacker)
    }

    /// Reset the cache; called on death.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[DamageEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: u64 = 100;

    fn cache() -> DamageCache {
        DamageCache::new(TIMEOUT)
    }

    #[test]
    fn contributions_accumulate_within_the_window() {
        let mut cache = cache();
        let p1 = ActorId::new(1);
        cache.add(p1, ActorKind::Player, 10, Tick(0));
        cache.add(p1, ActorKind::Player, 5, Tick(50));
        assert_eq!(cache.entries()[0].total, 15);
    }

    #[test]
    fn expired_entry_restarts_instead_of_accumulating() {
        let mut cache = cache();
        let p1 = ActorId::new(1);
        cache.add(p1, ActorKind::Player, 10, Tick(0));
        cache.add(p1, ActorKind::Player, 5, Tick(TIMEOUT));
        assert_eq!(cache.entries()[0].total, 5);
    }

    #[test]
    fn expired_entries_are_excluded_from_credit() {
        let mut cache = cache();
        let p1 = ActorId::new(1);
        cache.add(p1, ActorKind::Player, 10, Tick(0));
        assert_eq!(cache.credited_killer(Tick(99), |_| true), Some(p1));
        assert_eq!(cache.credited_killer(Tick(100), |_| true), None);
    }

    #[test]
    fn npc_damage_and_zero_damage_are_ignored() {
        let mut cache = cache();
        cache.add(ActorId::new(1), ActorKind::Npc, 10, Tick(0));
        cache.add(ActorId::new(2), ActorKind::Player, 0, Tick(0));
        assert!(cache.is_empty());
    }

    #[test]
    fn highest_valid_total_wins() {
        let mut cache = cache();
        let (p1, p2, p3) = (ActorId::new(1), ActorId::new(2), ActorId::new(3));
        cache.add(p1, ActorKind::Player, 10, Tick(0));
        cache.add(p2, ActorKind::Player, 30, Tick(0));
        cache.add(p3, ActorKind::Player, 20, Tick(0));
        assert_eq!(cache.credited_killer(Tick(10), |_| true), Some(p2));
        // p2 out of range / dead: next best valid entry takes the credit.
        assert_eq!(cache.credited_killer(Tick(10), |a| a != p2), Some(p3));
    }

    #[test]
    fn ties_go_to_the_earliest_contributor() {
        let mut cache = cache();
        let (p1, p2) = (ActorId::new(1), ActorId::new(2));
        cache.add(p1, ActorKind::Player, 25, Tick(0));
        cache.add(p2, ActorKind::Player, 25, Tick(5));
        assert_eq!(cache.credited_killer(Tick(10), |_| true), Some(p1));
    }

    #[test]
    fn empty_cache_yields_no_killer() {
        let cache = cache();
        assert_eq!(cache.credited_killer(Tick(0), |_| true), None);
    }

    #[test]
    fn clear_resets_everything() {
        let mut cache = cache();
        cache.add(ActorId::new(1), ActorKind::Player, 10, Tick(0));
        cache.clear();
        assert!(cache.is_empty());
    }
}
