use glam::Vec3;

use crate::camera::{CameraBehaviorParams, CameraPivotPolicy, ThirdPersonPivot, TopDownPivot};
use crate::error::{ErrorSeverity, GameError};
use crate::locomotion::{
    LocomotionPolicy, MovementSettingsTable, ThirdPersonLocomotion, TopDownLocomotion,
};
use crate::net::ValidationPolicy;

/// Which set of locomotion and camera rules a character uses.
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
pub enum CharacterVariant {
    #[default]
    ThirdPerson,
    TopDown,
}

/// Per-character tunables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CharacterSettings {
    pub max_health: f32,
    /// Acceleration at full input; movement input amount is measured against it.
    pub max_acceleration: f32,
    /// Weapon definitions handed out on spawn, by name, in slot order.
    pub default_inventory: Vec<String>,
    /// Projectile spawn point relative to the character, in its yaw frame.
    pub muzzle_offset: Vec3,
    /// How far a client-reported projectile origin may stray from the
    /// authority's muzzle location.
    pub muzzle_tolerance: f32,
    /// Fire input is ignored unless the character is aiming.
    pub fire_requires_aiming: bool,
}

impl Default for CharacterSettings {
    fn default() -> Self {
        Self {
            max_health: GameplayConfig::DEFAULT_MAX_HEALTH,
            max_acceleration: GameplayConfig::DEFAULT_MAX_ACCELERATION,
            default_inventory: vec!["rifle".to_owned(), "launcher".to_owned()],
            muzzle_offset: Vec3::new(50.0, 0.0, 60.0),
            muzzle_tolerance: GameplayConfig::DEFAULT_MUZZLE_TOLERANCE,
            fire_requires_aiming: true,
        }
    }
}

/// Camera tuning for both variants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CameraSettings {
    pub third_person: CameraBehaviorParams,
    pub third_person_pivot: ThirdPersonPivot,
    pub top_down: CameraBehaviorParams,
    pub top_down_pivot: TopDownPivot,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            third_person: CameraBehaviorParams::default(),
            third_person_pivot: ThirdPersonPivot::default(),
            top_down: CameraBehaviorParams::top_down(),
            top_down_pivot: TopDownPivot::default(),
        }
    }
}

/// Gameplay configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameplayConfig {
    pub variant: CharacterVariant,
    pub validation: ValidationPolicy,
    pub character: CharacterSettings,
    pub locomotion: ThirdPersonLocomotion,
    pub movement: MovementSettingsTable,
    pub camera: CameraSettings,
}

impl GameplayConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_INVENTORY_SLOTS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_HEALTH: f32 = 100.0;
    pub const DEFAULT_MAX_ACCELERATION: f32 = 1500.0;
    pub const DEFAULT_MUZZLE_TOLERANCE: f32 = 150.0;

    pub fn new() -> Self {
        Self {
            variant: CharacterVariant::default(),
            validation: ValidationPolicy::default(),
            character: CharacterSettings::default(),
            locomotion: ThirdPersonLocomotion::default(),
            movement: MovementSettingsTable::default(),
            camera: CameraSettings::default(),
        }
    }

    pub fn with_variant(variant: CharacterVariant) -> Self {
        Self {
            variant,
            ..Self::new()
        }
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.character.max_health) {
            return Err(ConfigError::NonPositive("character.max_health"));
        }
        if !is_positive(self.character.max_acceleration) {
            return Err(ConfigError::NonPositive("character.max_acceleration"));
        }
        if !is_positive(self.character.muzzle_tolerance) {
            return Err(ConfigError::NonPositive("character.muzzle_tolerance"));
        }
        if self.character.default_inventory.len() > Self::MAX_INVENTORY_SLOTS {
            return Err(ConfigError::DefaultInventoryTooLarge {
                count: self.character.default_inventory.len(),
                capacity: Self::MAX_INVENTORY_SLOTS,
            });
        }
        Ok(())
    }

    pub fn locomotion_policy(&self) -> Box<dyn LocomotionPolicy> {
        match self.variant {
            CharacterVariant::ThirdPerson => Box::new(self.locomotion),
            CharacterVariant::TopDown => Box::new(TopDownLocomotion {
                base: self.locomotion,
            }),
        }
    }

    pub fn camera_policy(&self) -> Box<dyn CameraPivotPolicy> {
        match self.variant {
            CharacterVariant::ThirdPerson => Box::new(self.camera.third_person_pivot),
            CharacterVariant::TopDown => Box::new(self.camera.top_down_pivot),
        }
    }

    pub fn camera_params(&self) -> &CameraBehaviorParams {
        match self.variant {
            CharacterVariant::ThirdPerson => &self.camera.third_person,
            CharacterVariant::TopDown => &self.camera.top_down,
        }
    }
}

fn is_positive(value: f32) -> bool {
    value > 0.0
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration the simulation refuses to start with.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be positive")]
    NonPositive(&'static str),

    #[error("default inventory lists {count} weapons but only {capacity} slots exist")]
    DefaultInventoryTooLarge { count: usize, capacity: usize },
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositive(_) => "CONFIG_NON_POSITIVE",
            Self::DefaultInventoryTooLarge { .. } => "CONFIG_DEFAULT_INVENTORY_TOO_LARGE",
        }
    }
}
