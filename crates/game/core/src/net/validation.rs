//! Authority-side checks for client requests.
//!
//! Every request names the object it targets. The authority only acts on a
//! request after it passes the active [`ValidationPolicy`].

use glam::Vec3;

use crate::error::{ErrorSeverity, GameError};
use crate::ids::{CharacterId, WeaponId};
use crate::inventory::Inventory;
use crate::weapon::Weapon;

use super::request::{CharacterRequest, MoveInput, WeaponRequest};

/// How strictly the authority vets incoming requests.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ValidationPolicy {
    /// Apply every request that names an existing object.
    AcceptAll,
    /// Also require ownership and an equipped weapon where relevant.
    #[default]
    Strict,
}

/// Why the authority refused a request.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RequestRejection {
    #[error("{0} does not exist")]
    UnknownWeapon(WeaponId),

    #[error("{0} does not exist")]
    UnknownCharacter(CharacterId),

    #[error("{requester} does not own {weapon}")]
    WeaponNotOwned {
        requester: CharacterId,
        weapon: WeaponId,
    },

    #[error("{requester} does not control {character}")]
    CharacterNotControlled {
        requester: CharacterId,
        character: CharacterId,
    },

    #[error("{0} is not equipped")]
    NotEquipped(WeaponId),

    #[error("{weapon} is not in the inventory of {character}")]
    NotInInventory {
        character: CharacterId,
        weapon: WeaponId,
    },

    #[error("non-finite or degenerate {0}")]
    Malformed(&'static str),

    #[error("{character} is dead")]
    Dead { character: CharacterId },

    #[error("{0} has no spent round to launch")]
    NoShotSpent(WeaponId),

    #[error("projectile origin is {distance:.1} from the muzzle of {character}")]
    OriginMismatch {
        character: CharacterId,
        distance: f32,
    },
}

impl GameError for RequestRejection {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotEquipped(_) | Self::Dead { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownWeapon(_) => "REQUEST_UNKNOWN_WEAPON",
            Self::UnknownCharacter(_) => "REQUEST_UNKNOWN_CHARACTER",
            Self::WeaponNotOwned { .. } => "REQUEST_WEAPON_NOT_OWNED",
            Self::CharacterNotControlled { .. } => "REQUEST_CHARACTER_NOT_CONTROLLED",
            Self::NotEquipped(_) => "REQUEST_NOT_EQUIPPED",
            Self::NotInInventory { .. } => "REQUEST_NOT_IN_INVENTORY",
            Self::Malformed(_) => "REQUEST_MALFORMED",
            Self::Dead { .. } => "REQUEST_DEAD",
            Self::NoShotSpent(_) => "REQUEST_NO_SHOT_SPENT",
            Self::OriginMismatch { .. } => "REQUEST_ORIGIN_MISMATCH",
        }
    }
}

/// Vets a weapon request sent by the client controlling `requester`.
pub fn validate_weapon_request(
    policy: ValidationPolicy,
    requester: CharacterId,
    weapon_id: WeaponId,
    weapon: Option<&Weapon>,
    request: &WeaponRequest,
) -> Result<(), RequestRejection> {
    let weapon = weapon.ok_or(RequestRejection::UnknownWeapon(weapon_id))?;
    if policy == ValidationPolicy::AcceptAll {
        return Ok(());
    }

    if weapon.owner() != Some(requester) {
        return Err(RequestRejection::WeaponNotOwned {
            requester,
            weapon: weapon_id,
        });
    }

    match request {
        // Releasing the trigger is always honored so a burst can end.
        WeaponRequest::StopFire => Ok(()),
        WeaponRequest::FireProjectile { origin, direction } => {
            if !origin.is_finite() {
                return Err(RequestRejection::Malformed("projectile origin"));
            }
            if !direction.is_finite() || direction.length_squared() <= f32::EPSILON {
                return Err(RequestRejection::Malformed("projectile direction"));
            }
            require_alive(weapon, requester)?;
            require_equipped(weapon)?;
            if weapon.unclaimed_shots() == 0 {
                return Err(RequestRejection::NoShotSpent(weapon_id));
            }
            Ok(())
        }
        WeaponRequest::StartFire | WeaponRequest::HandleFiring => {
            require_alive(weapon, requester)?;
            require_equipped(weapon)
        }
        WeaponRequest::StartReload | WeaponRequest::StopReload => require_equipped(weapon),
    }
}

/// Vets where a client says its projectile left the barrel. `muzzle` is the
/// authority's own muzzle location for `character`, if it knows the character.
pub fn validate_projectile_origin(
    policy: ValidationPolicy,
    character: CharacterId,
    origin: Vec3,
    muzzle: Option<Vec3>,
    tolerance: f32,
) -> Result<(), RequestRejection> {
    let muzzle = muzzle.ok_or(RequestRejection::UnknownCharacter(character))?;
    if policy == ValidationPolicy::AcceptAll {
        return Ok(());
    }

    let distance = origin.distance(muzzle);
    if distance > tolerance {
        return Err(RequestRejection::OriginMismatch {
            character,
            distance,
        });
    }
    Ok(())
}

fn require_alive(weapon: &Weapon, requester: CharacterId) -> Result<(), RequestRejection> {
    if weapon.owner_status().alive {
        Ok(())
    } else {
        Err(RequestRejection::Dead {
            character: requester,
        })
    }
}

fn require_equipped(weapon: &Weapon) -> Result<(), RequestRejection> {
    if weapon.is_attached() {
        Ok(())
    } else {
        Err(RequestRejection::NotEquipped(weapon.id()))
    }
}

/// Vets a character request against the target's inventory.
pub fn validate_character_request(
    policy: ValidationPolicy,
    requester: CharacterId,
    character: CharacterId,
    inventory: Option<&Inventory>,
    request: &CharacterRequest,
) -> Result<(), RequestRejection> {
    let inventory = inventory.ok_or(RequestRejection::UnknownCharacter(character))?;
    if policy == ValidationPolicy::AcceptAll {
        return Ok(());
    }

    if requester != character {
        return Err(RequestRejection::CharacterNotControlled {
            requester,
            character,
        });
    }

    match request {
        CharacterRequest::EquipWeapon(weapon) => {
            if inventory.contains(*weapon) {
                Ok(())
            } else {
                Err(RequestRejection::NotInInventory {
                    character,
                    weapon: *weapon,
                })
            }
        }
        CharacterRequest::Move(input) => validate_move(input),
        CharacterRequest::NextWeapon
        | CharacterRequest::PreviousWeapon
        | CharacterRequest::SetOverlay(_) => Ok(()),
    }
}

fn validate_move(input: &MoveInput) -> Result<(), RequestRejection> {
    if !input.velocity.is_finite() || !input.acceleration.is_finite() {
        return Err(RequestRejection::Malformed("movement input"));
    }
    if input.aim_point.is_some_and(|point| !point.is_finite()) {
        return Err(RequestRejection::Malformed("aim point"));
    }
    let rotation = input.control_rotation;
    if !(rotation.pitch.is_finite() && rotation.yaw.is_finite() && rotation.roll.is_finite()) {
        return Err(RequestRejection::Malformed("control rotation"));
    }
    Ok(())
}
