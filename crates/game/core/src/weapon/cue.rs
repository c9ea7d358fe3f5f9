//! Cosmetic and notification output of a weapon replica.
//!
//! Cues are buffered by the weapon and drained by the host each tick. They
//! never feed back into gameplay state.

/// Animated weapon actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum WeaponAction {
    Equip,
    Reload,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponCue {
    /// Muzzle effects for one shot; looping effects start with the first.
    SimulateFire,
    /// Looping fire effects end.
    StopSimulatingFire,
    /// The locally controlled replica fired a round; the host launches the
    /// projectile from the wielder's muzzle.
    Shot { burst_counter: u32 },
    /// Trigger pulled on an empty weapon with nothing to reload.
    OutOfAmmo,
    PlayAnimation(WeaponAction),
    StopAnimation(WeaponAction),
    PlaySound(WeaponAction),
    /// Mesh attached to the wielder.
    Attached,
    Detached,
    /// Equip began (world-scoped notification).
    Equipped,
    /// Unequip completed (world-scoped notification).
    Unequipped,
    /// Ammo moved from reserve into the clip.
    Reloaded { added: u32 },
}

impl WeaponCue {
    /// Cues that only matter to presentation.
    pub const fn is_cosmetic(&self) -> bool {
        !matches!(
            self,
            Self::Shot { .. } | Self::Equipped | Self::Unequipped | Self::Reloaded { .. }
        )
    }
}
