//! Network roles, replication policy and client requests.
mod replication;
mod request;
mod role;
mod validation;

pub use replication::{
    AmmoSnapshot, CHARACTER_REPLICATION, CharacterFields, CharacterSync, ModeSnapshot,
    MovementSnapshot, Visibility, WEAPON_REPLICATION, WeaponFields, WeaponSync, visible_fields,
};
pub use request::{CharacterRequest, MoveInput, Request, WeaponRequest};
pub use role::{NetContext, NetRole, Observer};
pub use validation::{
    RequestRejection, ValidationPolicy, validate_character_request, validate_projectile_origin,
    validate_weapon_request,
};
