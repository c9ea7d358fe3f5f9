//! Messages exchanged between the authority and its clients.
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use gameplay_core::{CharacterId, CharacterSync, ClientId, Request, Rotator, WeaponId, WeaponSync};

/// Address of a peer on the transport.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum PeerId {
    Server,
    Client(ClientId),
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerId::Server => write!(f, "server"),
            PeerId::Client(client) => write!(f, "{}", client),
        }
    }
}

/// Authority-to-client traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerMessage {
    /// A weapon replica must exist before any sync naming it.
    SpawnWeapon {
        weapon: WeaponId,
        definition: String,
        autonomous: bool,
    },
    SpawnCharacter {
        character: CharacterId,
        location: Vec3,
        rotation: Rotator,
        /// The receiving client controls this character.
        autonomous: bool,
    },
    Weapon(WeaponSync),
    Character(CharacterSync),
    DespawnCharacter(CharacterId),
    DespawnWeapon(WeaponId),
}

impl ServerMessage {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SpawnWeapon { .. } => "spawn_weapon",
            Self::SpawnCharacter { .. } => "spawn_character",
            Self::Weapon(_) => "weapon_sync",
            Self::Character(_) => "character_sync",
            Self::DespawnCharacter(_) => "despawn_character",
            Self::DespawnWeapon(_) => "despawn_weapon",
        }
    }
}

/// Everything that crosses the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Envelope {
    /// Client request; the sender is stamped by the transport.
    Request { from: ClientId, request: Request },
    Server(ServerMessage),
}
