//! Per-peer weapon store.

use std::collections::BTreeMap;

use crate::ids::WeaponId;
use crate::weapon::Weapon;

/// Weapons a peer holds replicas of, keyed by id. Iteration is in id order so
/// every peer visits weapons deterministically.
#[derive(Clone, Debug, Default)]
pub struct Arsenal {
    weapons: BTreeMap<WeaponId, Weapon>,
}

impl Arsenal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a weapon, returning the replica it replaced.
    pub fn insert(&mut self, weapon: Weapon) -> Option<Weapon> {
        self.weapons.insert(weapon.id(), weapon)
    }

    pub fn remove(&mut self, id: WeaponId) -> Option<Weapon> {
        self.weapons.remove(&id)
    }

    pub fn get(&self, id: WeaponId) -> Option<&Weapon> {
        self.weapons.get(&id)
    }

    pub fn get_mut(&mut self, id: WeaponId) -> Option<&mut Weapon> {
        self.weapons.get_mut(&id)
    }

    pub fn contains(&self, id: WeaponId) -> bool {
        self.weapons.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Weapon> {
        self.weapons.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Weapon> {
        self.weapons.values_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = WeaponId> + '_ {
        self.weapons.keys().copied()
    }

    /// Runs every weapon's due timers.
    pub fn tick(&mut self, now: f32) {
        for weapon in self.weapons.values_mut() {
            weapon.tick(now);
        }
    }
}
