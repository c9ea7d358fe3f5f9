//! Unified error types surfaced by the session API.
use thiserror::Error;

use gameplay_core::{CharacterId, ClientId, ConfigError, InventoryError};

use crate::net::PeerId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("tick rate must be positive, got {0}")]
    InvalidTickRate(f32),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("weapon catalog has no definition named '{0}'")]
    UnknownWeaponDefinition(String),

    #[error("{0} is not connected")]
    UnknownClient(ClientId),

    #[error("{0} does not exist")]
    UnknownCharacter(CharacterId),

    #[error("{client} already controls {character}")]
    AlreadyControlling {
        client: ClientId,
        character: CharacterId,
    },

    #[error("{0} controls no character")]
    NoCharacter(ClientId),

    #[error("no client ids left")]
    ClientLimit,

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failures moving envelopes between peers.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to encode envelope for {to}")]
    Encode {
        to: PeerId,
        #[source]
        source: bincode::Error,
    },

    #[error("failed to decode envelope for {to}")]
    Decode {
        to: PeerId,
        #[source]
        source: bincode::Error,
    },

    #[error("{0} has no inbox")]
    UnknownPeer(PeerId),
}
