//! Locomotion blender.
//!
//! Turns raw velocity, input acceleration and control rotation into the
//! derived values an animation graph consumes: speed, smoothed acceleration,
//! gait, aim yaw rate and the actor rotation.

mod blender;
mod feed;
mod policy;
mod rotation;
mod settings;
mod state;
mod types;

pub use blender::{
    REMOTE_AIM_INTERP_SPEED, SPRINT_INPUT_THRESHOLD, SPRINT_MAX_YAW_DELTA, actual_gait,
    mapped_speed,
};
pub use feed::AnimationFeed;
pub use policy::{
    AnimCurves, CurveSample, DEFAULT_GAIT_HYSTERESIS, GaitRequest, LocomotionPolicy, NoCurves,
    ThirdPersonLocomotion, TopDownLocomotion,
};
pub use settings::{MovementSettings, MovementSettingsTable, StanceSettings};
pub use state::{LocomotionInput, LocomotionState};
pub use types::{Gait, MovementAction, MovementState, OverlayState, RotationMode, Stance, ViewMode};
