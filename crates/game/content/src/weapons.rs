//! Weapon definition catalog.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use combat_core::special::SpecialAttackKind;
use combat_core::types::WeaponClass;

/// Combat-relevant portion of a weapon definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDefinition {
    pub id: u32,
    pub name: String,
    pub class: WeaponClass,
    /// Ticks between attacks.
    pub speed: u32,
    /// Special attack carried by this weapon, if any.
    pub special: Option<SpecialAttackKind>,
    /// Applies poison through the on-success hook.
    pub poisonous: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WeaponFile {
    weapons: Vec<WeaponDefinition>,
}

/// Indexed weapon catalog.
#[derive(Debug, Clone, Default)]
pub struct WeaponCatalog {
    by_id: HashMap<u32, WeaponDefinition>,
}

impl WeaponCatalog {
    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        let file: WeaponFile = ron::from_str(text).context("failed to parse weapon catalog RON")?;
        let mut by_id = HashMap::with_capacity(file.weapons.len());
        for weapon in file.weapons {
            anyhow::ensure!(
                by_id.insert(weapon.id, weapon.clone()).is_none(),
                "duplicate weapon id {}",
                weapon.id
            );
        }
        Ok(Self { by_id })
    }

    /// The catalog shipped with the crate.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_ron(include_str!("../data/weapons.ron"))
    }

    pub fn get(&self, id: u32) -> Option<&WeaponDefinition> {
        self.by_id.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeaponDefinition> {
        self.by_id.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_parses() {
        let catalog = WeaponCatalog::embedded().expect("embedded catalog must parse");
        let with_special = catalog.iter().filter(|w| w.special.is_some()).count();
        assert!(with_special >= 4, "expected several special weapons");
    }

    #[test]
    fn activation_only_special_is_present() {
        let catalog = WeaponCatalog::embedded().unwrap();
        assert!(
            catalog
                .iter()
                .any(|w| w.special == Some(SpecialAttackKind::Ascendance))
        );
    }
}
