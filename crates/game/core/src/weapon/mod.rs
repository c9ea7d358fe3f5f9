//! Weapons: ammo ledger, tuning, and the replicated fire/reload/equip state
//! machine.

mod ammo;
mod cue;
mod definition;
mod machine;
mod state;
mod sync;

pub use ammo::AmmoLedger;
pub use cue::{WeaponAction, WeaponCue};
pub use definition::{
    DEFAULT_EQUIP_DURATION, DefinitionError, MIN_RELOAD_TRANSFER_DELAY, WeaponDefinition,
};
pub use machine::Weapon;
pub use state::{OwnerStatus, WeaponState, WeaponTimer};
