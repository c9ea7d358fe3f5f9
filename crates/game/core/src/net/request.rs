//! Client-to-authority request messages.

use glam::Vec3;

use crate::ids::{CharacterId, WeaponId};
use crate::locomotion::{Gait, OverlayState, RotationMode, Stance, ViewMode};
use crate::math::Rotator;

/// Weapon state transitions a non-authoritative replica asks the authority to
/// perform on its behalf.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponRequest {
    StartFire,
    StopFire,
    StartReload,
    StopReload,
    /// One shot was simulated locally; the authority spends the ammo.
    HandleFiring,
    /// Spawn a projectile; origin and direction come from the shooter's aim.
    FireProjectile { origin: Vec3, direction: Vec3 },
}

impl WeaponRequest {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StartFire => "start_fire",
            Self::StopFire => "stop_fire",
            Self::StartReload => "start_reload",
            Self::StopReload => "stop_reload",
            Self::HandleFiring => "handle_firing",
            Self::FireProjectile { .. } => "fire_projectile",
        }
    }
}

/// Locomotion input owned by the controlling client.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveInput {
    pub velocity: Vec3,
    /// Current input acceleration (direction times input strength).
    pub acceleration: Vec3,
    pub control_rotation: Rotator,
    /// Ground point under the cursor, for characters that aim at a point.
    pub aim_point: Option<Vec3>,
    pub desired_gait: Gait,
    pub stance: Stance,
    pub rotation_mode: RotationMode,
    pub view_mode: ViewMode,
}

/// Character-level requests.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharacterRequest {
    EquipWeapon(WeaponId),
    NextWeapon,
    PreviousWeapon,
    SetOverlay(OverlayState),
    Move(MoveInput),
}

impl CharacterRequest {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EquipWeapon(_) => "equip_weapon",
            Self::NextWeapon => "next_weapon",
            Self::PreviousWeapon => "previous_weapon",
            Self::SetOverlay(_) => "set_overlay",
            Self::Move(_) => "move",
        }
    }
}

/// Any request travelling from a client to the authority.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Request {
    Weapon {
        weapon: WeaponId,
        request: WeaponRequest,
    },
    Character {
        character: CharacterId,
        request: CharacterRequest,
    },
}

impl Request {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Weapon { request, .. } => request.name(),
            Self::Character { request, .. } => request.name(),
        }
    }
}
