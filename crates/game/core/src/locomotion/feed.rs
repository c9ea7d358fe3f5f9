use glam::Vec3;

use crate::math::Rotator;

use super::state::LocomotionState;
use super::types::{Gait, MovementAction, MovementState, OverlayState, RotationMode, Stance, ViewMode};

/// Snapshot of the locomotion values an animation graph reads each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationFeed {
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub movement_input: Vec3,
    pub is_moving: bool,
    pub has_movement_input: bool,
    pub speed: f32,
    pub movement_input_amount: f32,
    pub aiming_rotation: Rotator,
    pub aim_yaw_rate: f32,
    pub movement_state: MovementState,
    pub previous_movement_state: MovementState,
    pub movement_action: MovementAction,
    pub rotation_mode: RotationMode,
    pub gait: Gait,
    pub stance: Stance,
    pub view_mode: ViewMode,
    pub overlay_state: OverlayState,
}

impl From<&LocomotionState> for AnimationFeed {
    fn from(state: &LocomotionState) -> Self {
        Self {
            velocity: state.velocity(),
            acceleration: state.acceleration(),
            movement_input: state.current_acceleration(),
            is_moving: state.is_moving(),
            has_movement_input: state.has_movement_input(),
            speed: state.speed(),
            movement_input_amount: state.movement_input_amount(),
            aiming_rotation: state.aiming_rotation(),
            aim_yaw_rate: state.aim_yaw_rate(),
            movement_state: state.movement_state(),
            previous_movement_state: state.previous_movement_state(),
            movement_action: state.movement_action(),
            rotation_mode: state.rotation_mode(),
            gait: state.gait(),
            stance: state.stance(),
            view_mode: state.view_mode(),
            overlay_state: state.overlay_state(),
        }
    }
}
