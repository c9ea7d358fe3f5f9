//! Character weapon inventory.
//!
//! An ordered set of weapon ids plus the currently held weapon. The weapons
//! themselves live in the peer's [`Arsenal`](crate::arsenal::Arsenal); the
//! inventory only records membership and order.

use arrayvec::ArrayVec;

use crate::config::GameplayConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::ids::WeaponId;

/// Ordered, duplicate-free weapon list with an optional current weapon.
///
/// Invariant: on peers that see the list, `current` is `None` or a member of
/// `weapons`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    weapons: ArrayVec<WeaponId, { GameplayConfig::MAX_INVENTORY_SLOTS }>,
    current: Option<WeaponId>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weapons(&self) -> &[WeaponId] {
        &self.weapons
    }

    pub fn current(&self) -> Option<WeaponId> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    pub fn contains(&self, weapon: WeaponId) -> bool {
        self.weapons.contains(&weapon)
    }

    pub fn index_of(&self, weapon: WeaponId) -> Option<usize> {
        self.weapons.iter().position(|w| *w == weapon)
    }

    pub fn get(&self, slot: usize) -> Option<WeaponId> {
        self.weapons.get(slot).copied()
    }

    pub fn first(&self) -> Option<WeaponId> {
        self.get(0)
    }

    pub fn add(&mut self, weapon: WeaponId) -> Result<(), InventoryError> {
        if self.contains(weapon) {
            return Err(InventoryError::Duplicate(weapon));
        }
        self.weapons
            .try_push(weapon)
            .map_err(|_| InventoryError::Full {
                capacity: GameplayConfig::MAX_INVENTORY_SLOTS,
            })
    }

    /// Removes `weapon`, clearing `current` if it was held.
    pub fn remove(&mut self, weapon: WeaponId) -> Result<(), InventoryError> {
        let index = self
            .index_of(weapon)
            .ok_or(InventoryError::NotFound(weapon))?;
        self.weapons.remove(index);
        if self.current == Some(weapon) {
            self.current = None;
        }
        Ok(())
    }

    /// Sets the held weapon; it must be a member.
    pub fn set_current(&mut self, weapon: Option<WeaponId>) -> Result<(), InventoryError> {
        if let Some(weapon) = weapon {
            if !self.contains(weapon) {
                return Err(InventoryError::NotFound(weapon));
            }
        }
        self.current = weapon;
        Ok(())
    }

    /// Records the held weapon on a replica that is not sent the list.
    pub fn observe_current(&mut self, weapon: Option<WeaponId>) {
        self.current = weapon;
    }

    /// Weapon after `weapon`, wrapping around.
    pub fn next_after(&self, weapon: WeaponId) -> Option<WeaponId> {
        let index = self.index_of(weapon)?;
        self.get((index + 1) % self.weapons.len())
    }

    /// Weapon before `weapon`, wrapping around.
    pub fn previous_before(&self, weapon: WeaponId) -> Option<WeaponId> {
        let index = self.index_of(weapon)?;
        let len = self.weapons.len();
        self.get((index + len - 1) % len)
    }

    /// Replaces the contents with an authoritative list. Entries past capacity
    /// and duplicates are dropped; `current` is cleared if no longer a member.
    pub fn replace_with(&mut self, weapons: &[WeaponId]) {
        self.weapons.clear();
        for weapon in weapons {
            if self.weapons.is_full() {
                break;
            }
            if !self.weapons.contains(weapon) {
                self.weapons.push(*weapon);
            }
        }
        if let Some(current) = self.current {
            if !self.contains(current) {
                self.current = None;
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("{0} is already in the inventory")]
    Duplicate(WeaponId),

    #[error("inventory is full ({capacity} slots)")]
    Full { capacity: usize },

    #[error("{0} is not in the inventory")]
    NotFound(WeaponId),
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Duplicate(_) | Self::NotFound(_) => ErrorSeverity::Validation,
            Self::Full { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Duplicate(_) => "INVENTORY_DUPLICATE",
            Self::Full { .. } => "INVENTORY_FULL",
            Self::NotFound(_) => "INVENTORY_NOT_FOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicates_and_overflow() {
        let mut inventory = Inventory::new();
        inventory.add(WeaponId(1)).unwrap();
        assert_eq!(
            inventory.add(WeaponId(1)),
            Err(InventoryError::Duplicate(WeaponId(1)))
        );
        for id in 2..=GameplayConfig::MAX_INVENTORY_SLOTS as u32 {
            inventory.add(WeaponId(id)).unwrap();
        }
        assert!(matches!(
            inventory.add(WeaponId(100)),
            Err(InventoryError::Full { .. })
        ));
    }

    #[test]
    fn current_must_be_a_member() {
        let mut inventory = Inventory::new();
        inventory.add(WeaponId(1)).unwrap();
        assert!(inventory.set_current(Some(WeaponId(2))).is_err());
        inventory.set_current(Some(WeaponId(1))).unwrap();
        inventory.remove(WeaponId(1)).unwrap();
        assert_eq!(inventory.current(), None);
    }

    #[test]
    fn cycling_wraps_around() {
        let mut inventory = Inventory::new();
        for id in [3, 5, 9] {
            inventory.add(WeaponId(id)).unwrap();
        }
        assert_eq!(inventory.next_after(WeaponId(9)), Some(WeaponId(3)));
        assert_eq!(inventory.previous_before(WeaponId(3)), Some(WeaponId(9)));
        assert_eq!(inventory.next_after(WeaponId(4)), None);
    }

    #[test]
    fn replace_with_drops_stale_current() {
        let mut inventory = Inventory::new();
        inventory.add(WeaponId(1)).unwrap();
        inventory.set_current(Some(WeaponId(1))).unwrap();
        inventory.replace_with(&[WeaponId(2), WeaponId(2), WeaponId(3)]);
        assert_eq!(inventory.weapons(), &[WeaponId(2), WeaponId(3)]);
        assert_eq!(inventory.current(), None);
    }
}
