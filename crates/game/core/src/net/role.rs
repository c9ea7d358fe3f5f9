/// Network role of one replica of an object.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum NetRole {
    /// The single decision-making replica (server).
    #[default]
    Authority,
    /// Replica on the client that controls the owning character.
    AutonomousProxy,
    /// Replica on every other client; visual replay only.
    SimulatedProxy,
}

impl NetRole {
    pub const fn is_authority(self) -> bool {
        matches!(self, Self::Authority)
    }
}

/// Who is receiving a replication update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Observer {
    /// The client controlling the owning character.
    Owner,
    /// Any other client.
    Other,
}

/// Role information a replica needs to decide what to simulate locally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetContext {
    pub role: NetRole,
    /// A dedicated server never plays cosmetic effects.
    pub dedicated_server: bool,
}

impl NetContext {
    pub const fn authority(dedicated_server: bool) -> Self {
        Self {
            role: NetRole::Authority,
            dedicated_server,
        }
    }

    pub const fn proxy(role: NetRole) -> Self {
        Self {
            role,
            dedicated_server: false,
        }
    }

    pub const fn has_authority(&self) -> bool {
        self.role.is_authority()
    }
}
