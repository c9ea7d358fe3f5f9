/// Coarse weapon state.
///
/// Invariant: `Firing` only while the trigger is held, a round is available
/// and no reload is pending.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum WeaponState {
    #[default]
    Idle,
    Equipping,
    Firing,
    Reloading,
}

impl WeaponState {
    /// States from which firing or reloading may begin.
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Idle | Self::Firing)
    }
}

/// Deferred weapon callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum WeaponTimer {
    /// Delayed first shot of a burst.
    HandleFiring,
    /// Next shot of an automatic burst.
    HandleReFiring,
    StopReload,
    /// Ammo transfer, slightly ahead of the reload animation end.
    ReloadWeapon,
    EquipFinished,
}

/// Liveness and control of the character holding a weapon, as seen by the
/// weapon's replica.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwnerStatus {
    pub alive: bool,
    pub locally_controlled: bool,
}

impl Default for OwnerStatus {
    fn default() -> Self {
        Self {
            alive: true,
            locally_controlled: false,
        }
    }
}
