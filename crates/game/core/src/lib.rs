//! Gameplay rules shared by every peer of a session.
//!
//! `gameplay-core` defines the replicated weapon state machine, the character
//! inventory and equip flow, the locomotion blender, camera behavior and
//! projectile kinematics. Everything here is pure: hosts drive it with a clock
//! and input, then drain cues, requests and sync messages from it.
pub mod arsenal;
pub mod camera;
pub mod character;
pub mod collision;
pub mod config;
pub mod curve;
pub mod error;
pub mod ids;
pub mod inventory;
pub mod locomotion;
pub mod math;
pub mod net;
pub mod projectile;
pub mod timer;
pub mod weapon;

pub use arsenal::Arsenal;
pub use camera::{
    CameraBehaviorParams, CameraController, CameraPivotPolicy, CameraPose, CameraSubject,
    CameraTargets, CameraTrace, ThirdPersonPivot, TopDownPivot,
};
pub use character::{AIM_POINT_INTERP_SPEED, Character, CharacterSpawn};
pub use collision::{CollisionQuery, EmptyWorld, Hit};
pub use config::{CameraSettings, CharacterSettings, CharacterVariant, ConfigError, GameplayConfig};
pub use curve::{CurveKey, FloatCurve};
pub use error::{ErrorSeverity, GameError};
pub use ids::{CharacterId, ClientId, IdAllocator, ProjectileId, WeaponId};
pub use inventory::{Inventory, InventoryError};
pub use locomotion::{
    AnimCurves, AnimationFeed, Gait, LocomotionInput, LocomotionPolicy, LocomotionState,
    MovementAction, MovementSettings, MovementSettingsTable, MovementState, NoCurves, OverlayState,
    RotationMode, Stance, ThirdPersonLocomotion, TopDownLocomotion, ViewMode,
};
pub use math::{Rotator, Transform};
pub use net::{
    CharacterFields, CharacterRequest, CharacterSync, MoveInput, NetContext, NetRole, Observer,
    Request, RequestRejection, ValidationPolicy, WeaponFields, WeaponRequest, WeaponSync,
};
pub use projectile::{GRAVITY_Z, Projectile, ProjectileConfig, ProjectileStep, radial_damage};
pub use timer::{TimerCutoff, TimerHandle, TimerQueue};
pub use weapon::{
    AmmoLedger, DefinitionError, OwnerStatus, Weapon, WeaponAction, WeaponCue, WeaponDefinition,
    WeaponState, WeaponTimer,
};
