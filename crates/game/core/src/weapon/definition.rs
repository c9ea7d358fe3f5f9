//! Static weapon tuning loaded from content.

use crate::error::{ErrorSeverity, GameError};
use crate::locomotion::OverlayState;
use crate::projectile::ProjectileConfig;

use super::ammo::AmmoLedger;

/// Equip duration used when no equip animation length is known.
pub const DEFAULT_EQUIP_DURATION: f32 = 0.5;

/// Minimum delay between reload start and ammo transfer.
pub const MIN_RELOAD_TRANSFER_DELAY: f32 = 0.1;

/// Tuning for one weapon kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeaponDefinition {
    pub name: String,
    pub clip_capacity: u32,
    pub max_ammo: u32,
    /// Clips carried at spawn; one is loaded.
    pub initial_clips: u32,
    /// Seconds between shots while the trigger is held; `0` is semi-auto.
    pub time_between_shots: f32,
    /// Reload length used when no reload animation length is known.
    pub no_anim_reload_duration: f32,
    pub equip_anim_duration: Option<f32>,
    pub reload_anim_duration: Option<f32>,
    pub infinite_ammo: bool,
    pub infinite_clip: bool,
    /// Subtract frame overshoot from the next refire interval.
    pub automatic_catchup: bool,
    /// Upper-body overlay the wielder switches to.
    pub overlay: OverlayState,
    pub projectile: ProjectileConfig,
}

impl Default for WeaponDefinition {
    fn default() -> Self {
        Self {
            name: "rifle".to_owned(),
            clip_capacity: 30,
            max_ammo: 150,
            initial_clips: 4,
            time_between_shots: 0.1,
            no_anim_reload_duration: 1.0,
            equip_anim_duration: None,
            reload_anim_duration: None,
            infinite_ammo: false,
            infinite_clip: false,
            automatic_catchup: true,
            overlay: OverlayState::Rifle,
            projectile: ProjectileConfig::default(),
        }
    }
}

impl WeaponDefinition {
    /// Checks the tuning values for obviously broken content.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.name.trim().is_empty() {
            return Err(DefinitionError::MissingName);
        }
        if self.clip_capacity == 0 {
            return Err(DefinitionError::ZeroClipCapacity {
                name: self.name.clone(),
            });
        }
        if !is_non_negative(self.time_between_shots) {
            return Err(DefinitionError::InvalidDuration {
                name: self.name.clone(),
                field: "time_between_shots",
            });
        }
        if !is_positive(self.no_anim_reload_duration) {
            return Err(DefinitionError::InvalidDuration {
                name: self.name.clone(),
                field: "no_anim_reload_duration",
            });
        }
        if !is_positive(self.projectile.speed) {
            return Err(DefinitionError::InvalidDuration {
                name: self.name.clone(),
                field: "projectile.speed",
            });
        }
        Ok(())
    }

    /// Ledger for a freshly spawned weapon of this kind.
    pub fn initial_ledger(&self) -> AmmoLedger {
        AmmoLedger::new(
            self.clip_capacity,
            self.max_ammo,
            self.initial_clips,
            self.infinite_ammo,
            self.infinite_clip,
        )
    }

    /// Equip length: animation length, or [`DEFAULT_EQUIP_DURATION`] when
    /// absent or non-positive.
    pub fn equip_duration(&self) -> f32 {
        self.equip_anim_duration
            .filter(|d| *d > 0.0)
            .unwrap_or(DEFAULT_EQUIP_DURATION)
    }

    pub fn has_reload_animation(&self) -> bool {
        self.reload_anim_duration.is_some_and(|d| d > 0.0)
    }

    /// Reload length: animation length, or the configured fallback.
    pub fn reload_duration(&self) -> f32 {
        self.reload_anim_duration
            .filter(|d| *d > 0.0)
            .unwrap_or(self.no_anim_reload_duration)
    }

    /// When the clip is refilled, measured from the reload start: just ahead
    /// of the reload's end, never sooner than [`MIN_RELOAD_TRANSFER_DELAY`].
    pub fn reload_transfer_delay(&self) -> f32 {
        (self.reload_duration() - MIN_RELOAD_TRANSFER_DELAY).max(MIN_RELOAD_TRANSFER_DELAY)
    }
}

fn is_positive(value: f32) -> bool {
    value > 0.0
}

fn is_non_negative(value: f32) -> bool {
    value >= 0.0
}

/// Broken weapon content.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("weapon definition has no name")]
    MissingName,

    #[error("weapon '{name}' has zero clip capacity")]
    ZeroClipCapacity { name: String },

    #[error("weapon '{name}' has an invalid {field}")]
    InvalidDuration { name: String, field: &'static str },
}

impl GameError for DefinitionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingName => "WEAPON_DEF_MISSING_NAME",
            Self::ZeroClipCapacity { .. } => "WEAPON_DEF_ZERO_CLIP",
            Self::InvalidDuration { .. } => "WEAPON_DEF_INVALID_DURATION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_fall_back_when_animation_missing_or_non_positive() {
        let mut def = WeaponDefinition::default();
        assert_eq!(def.equip_duration(), DEFAULT_EQUIP_DURATION);
        def.equip_anim_duration = Some(-1.0);
        assert_eq!(def.equip_duration(), DEFAULT_EQUIP_DURATION);
        def.equip_anim_duration = Some(0.8);
        assert_eq!(def.equip_duration(), 0.8);

        def.reload_anim_duration = Some(0.0);
        assert_eq!(def.reload_duration(), def.no_anim_reload_duration);
        assert!(!def.has_reload_animation());
    }

    #[test]
    fn reload_transfer_lands_just_before_the_reload_ends() {
        let mut def = WeaponDefinition {
            reload_anim_duration: Some(1.8),
            ..Default::default()
        };
        assert!((def.reload_transfer_delay() - 1.7).abs() < 1e-6);

        def.reload_anim_duration = None;
        def.no_anim_reload_duration = 0.15;
        assert_eq!(def.reload_transfer_delay(), MIN_RELOAD_TRANSFER_DELAY);
    }

    #[test]
    fn validate_rejects_broken_content() {
        let def = WeaponDefinition {
            clip_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            def.validate(),
            Err(DefinitionError::ZeroClipCapacity { .. })
        ));

        let def = WeaponDefinition {
            no_anim_reload_duration: f32::NAN,
            ..Default::default()
        };
        assert_eq!(def.validate().unwrap_err().error_code(), "WEAPON_DEF_INVALID_DURATION");
        assert!(WeaponDefinition::default().validate().is_ok());
    }
}
