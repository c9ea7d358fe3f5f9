//! Replication policy tables, dirty tracking and sync messages.
//!
//! Each replicated field has exactly one [`Visibility`]. Mutators mark the
//! field dirty; the host later asks for a sync per observer and receives only
//! the dirty fields that observer may see.

use bitflags::{Flags, bitflags};
use glam::Vec3;

use super::role::Observer;
use crate::ids::{CharacterId, WeaponId};
use crate::locomotion::{Gait, OverlayState, RotationMode, Stance, ViewMode};
use crate::math::Rotator;

/// Which observers receive a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    All,
    OwnerOnly,
    SkipOwner,
}

impl Visibility {
    pub const fn visible_to(self, observer: Observer) -> bool {
        match self {
            Self::All => true,
            Self::OwnerOnly => matches!(observer, Observer::Owner),
            Self::SkipOwner => matches!(observer, Observer::Other),
        }
    }
}

bitflags! {
    /// Replicated fields of a weapon.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct WeaponFields: u8 {
        const OWNER          = 1 << 0;
        const AMMO           = 1 << 1;
        const BURST_COUNTER  = 1 << 2;
        const PENDING_RELOAD = 1 << 3;
    }
}

bitflags! {
    /// Replicated fields of a character.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CharacterFields: u16 {
        const INVENTORY        = 1 << 0;
        const CURRENT_WEAPON   = 1 << 1;
        const MOVEMENT         = 1 << 2;
        const CONTROL_ROTATION = 1 << 3;
        const ACCELERATION     = 1 << 4;
        const MODES            = 1 << 5;
        const OVERLAY          = 1 << 6;
        const HEALTH           = 1 << 7;
    }
}

/// Weapon replication table.
pub const WEAPON_REPLICATION: &[(WeaponFields, Visibility)] = &[
    (WeaponFields::OWNER, Visibility::All),
    (WeaponFields::AMMO, Visibility::OwnerOnly),
    (WeaponFields::BURST_COUNTER, Visibility::SkipOwner),
    (WeaponFields::PENDING_RELOAD, Visibility::SkipOwner),
];

/// Character replication table.
pub const CHARACTER_REPLICATION: &[(CharacterFields, Visibility)] = &[
    (CharacterFields::INVENTORY, Visibility::OwnerOnly),
    (CharacterFields::CURRENT_WEAPON, Visibility::All),
    (CharacterFields::MOVEMENT, Visibility::SkipOwner),
    (CharacterFields::CONTROL_ROTATION, Visibility::SkipOwner),
    (CharacterFields::ACCELERATION, Visibility::SkipOwner),
    (CharacterFields::MODES, Visibility::SkipOwner),
    (CharacterFields::OVERLAY, Visibility::All),
    (CharacterFields::HEALTH, Visibility::All),
];

/// Subset of `dirty` that `observer` is allowed to receive under `table`.
pub fn visible_fields<F>(dirty: F, table: &[(F, Visibility)], observer: Observer) -> F
where
    F: Flags + Copy,
{
    let mut visible = F::empty();
    for (field, visibility) in table {
        if visibility.visible_to(observer) && dirty.contains(*field) {
            visible.insert(*field);
        }
    }
    visible
}

/// Authoritative ammo counters, sent to the owner only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmmoSnapshot {
    pub in_clip: u32,
    pub reserve: u32,
}

/// Server-to-client weapon state update. `None` means "unchanged".
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponSync {
    pub weapon: WeaponId,
    pub owner: Option<Option<CharacterId>>,
    pub ammo: Option<AmmoSnapshot>,
    pub burst_counter: Option<u32>,
    pub pending_reload: Option<bool>,
}

impl WeaponSync {
    pub fn is_empty(&self) -> bool {
        self.owner.is_none()
            && self.ammo.is_none()
            && self.burst_counter.is_none()
            && self.pending_reload.is_none()
    }
}

/// Replicated kinematic state of a character.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementSnapshot {
    pub location: Vec3,
    pub velocity: Vec3,
    pub rotation: Rotator,
}

/// Replicated locomotion mode selections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeSnapshot {
    pub desired_gait: Gait,
    pub stance: Stance,
    pub rotation_mode: RotationMode,
    pub view_mode: ViewMode,
}

/// Server-to-client character state update. `None` means "unchanged".
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSync {
    pub character: CharacterId,
    pub inventory: Option<Vec<WeaponId>>,
    pub current_weapon: Option<Option<WeaponId>>,
    pub movement: Option<MovementSnapshot>,
    pub control_rotation: Option<Rotator>,
    pub acceleration: Option<Vec3>,
    pub modes: Option<ModeSnapshot>,
    pub overlay: Option<OverlayState>,
    pub health: Option<f32>,
}

impl CharacterSync {
    pub fn empty(character: CharacterId) -> Self {
        Self {
            character,
            inventory: None,
            current_weapon: None,
            movement: None,
            control_rotation: None,
            acceleration: None,
            modes: None,
            overlay: None,
            health: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inventory.is_none()
            && self.current_weapon.is_none()
            && self.movement.is_none()
            && self.control_rotation.is_none()
            && self.acceleration.is_none()
            && self.modes.is_none()
            && self.overlay.is_none()
            && self.health.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ammo_only_reaches_the_owner() {
        let dirty = WeaponFields::AMMO | WeaponFields::BURST_COUNTER;
        assert_eq!(
            visible_fields(dirty, WEAPON_REPLICATION, Observer::Owner),
            WeaponFields::AMMO
        );
        assert_eq!(
            visible_fields(dirty, WEAPON_REPLICATION, Observer::Other),
            WeaponFields::BURST_COUNTER
        );
    }

    #[test]
    fn every_field_has_exactly_one_policy() {
        let mut seen = WeaponFields::empty();
        for (field, _) in WEAPON_REPLICATION {
            assert!(!seen.intersects(*field));
            seen |= *field;
        }
        assert_eq!(seen, WeaponFields::all());

        let mut seen = CharacterFields::empty();
        for (field, _) in CHARACTER_REPLICATION {
            assert!(!seen.intersects(*field));
            seen |= *field;
        }
        assert_eq!(seen, CharacterFields::all());
    }

    #[test]
    fn current_weapon_is_public_inventory_is_private() {
        let dirty = CharacterFields::INVENTORY | CharacterFields::CURRENT_WEAPON;
        assert_eq!(
            visible_fields(dirty, CHARACTER_REPLICATION, Observer::Other),
            CharacterFields::CURRENT_WEAPON
        );
        assert_eq!(visible_fields(dirty, CHARACTER_REPLICATION, Observer::Owner), dirty);
    }
}
