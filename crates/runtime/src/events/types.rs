//! Event types for different topics.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use gameplay_core::{CharacterId, ClientId, ProjectileId, WeaponCue, WeaponId};

use crate::net::PeerId;

/// Cosmetic and state cues emitted by a weapon replica.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponEvent {
    /// Peer whose replica emitted the cue.
    pub peer: PeerId,
    pub weapon: WeaponId,
    pub owner: Option<CharacterId>,
    pub cue: WeaponCue,
    pub time: f32,
}

/// Equip notifications, visible to every observer in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InventoryEvent {
    Equipped {
        peer: PeerId,
        character: Option<CharacterId>,
        weapon: WeaponId,
    },
    Unequipped {
        peer: PeerId,
        character: Option<CharacterId>,
        weapon: WeaponId,
    },
}

/// Projectile and damage outcomes resolved by the authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    ProjectileLaunched {
        projectile: ProjectileId,
        instigator: Option<CharacterId>,
        weapon: WeaponId,
        origin: Vec3,
        direction: Vec3,
    },
    ProjectileExploded {
        projectile: ProjectileId,
        location: Vec3,
        /// Character the projectile struck directly, if any.
        struck: Option<CharacterId>,
    },
    ProjectileExpired {
        projectile: ProjectileId,
    },
    Damaged {
        character: CharacterId,
        instigator: Option<CharacterId>,
        amount: f32,
        health: f32,
    },
    Killed {
        character: CharacterId,
        instigator: Option<CharacterId>,
    },
}

/// Connection and request-handling notices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NetEvent {
    ClientConnected {
        client: ClientId,
    },
    CharacterSpawned {
        character: CharacterId,
        controller: ClientId,
    },
    CharacterDespawned {
        character: CharacterId,
    },
    RequestRejected {
        client: ClientId,
        request: String,
        code: String,
        reason: String,
    },
}
