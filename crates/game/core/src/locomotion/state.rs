//! Per-character locomotion state and mode selection.

use glam::Vec3;

use crate::math::Rotator;

use super::types::{Gait, MovementAction, MovementState, OverlayState, RotationMode, Stance, ViewMode};

/// Per-tick input from the movement component and controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocomotionInput {
    pub velocity: Vec3,
    /// Input acceleration the movement component is applying.
    pub current_acceleration: Vec3,
    pub max_acceleration: f32,
    pub control_rotation: Rotator,
    pub delta_time: f32,
    pub locally_controlled: bool,
}

/// Everything the locomotion blender derives and carries between ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct LocomotionState {
    // ===== modes =====
    pub(super) movement_state: MovementState,
    pub(super) previous_movement_state: MovementState,
    pub(super) movement_action: MovementAction,
    pub(super) rotation_mode: RotationMode,
    pub(super) desired_rotation_mode: RotationMode,
    pub(super) gait: Gait,
    pub(super) desired_gait: Gait,
    pub(super) allowed_gait: Gait,
    pub(super) stance: Stance,
    pub(super) view_mode: ViewMode,
    pub(super) overlay_state: OverlayState,

    // ===== essentials =====
    pub(super) velocity: Vec3,
    pub(super) acceleration: Vec3,
    pub(super) current_acceleration: Vec3,
    pub(super) eased_max_acceleration: f32,
    pub(super) speed: f32,
    pub(super) is_moving: bool,
    pub(super) has_movement_input: bool,
    pub(super) movement_input_amount: f32,
    pub(super) last_velocity_rotation: Rotator,
    pub(super) last_movement_input_rotation: Rotator,
    pub(super) control_rotation: Rotator,
    pub(super) aiming_rotation: Rotator,
    pub(super) aim_yaw_rate: f32,
    pub(super) max_speed: f32,

    // ===== rotation =====
    pub(super) rotation: Rotator,
    pub(super) target_rotation: Rotator,
    pub(super) in_air_rotation: Rotator,

    // ===== cached from the previous tick =====
    pub(super) previous_velocity: Vec3,
    pub(super) previous_aim_yaw: f32,
}

impl Default for LocomotionState {
    fn default() -> Self {
        Self::new(Rotator::ZERO)
    }
}

impl LocomotionState {
    /// Grounded, standing and still, facing `rotation`.
    pub fn new(rotation: Rotator) -> Self {
        Self {
            movement_state: MovementState::Grounded,
            previous_movement_state: MovementState::None,
            movement_action: MovementAction::None,
            rotation_mode: RotationMode::LookingDirection,
            desired_rotation_mode: RotationMode::LookingDirection,
            gait: Gait::Walking,
            desired_gait: Gait::Running,
            allowed_gait: Gait::Walking,
            stance: Stance::Standing,
            view_mode: ViewMode::ThirdPerson,
            overlay_state: OverlayState::Default,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            current_acceleration: Vec3::ZERO,
            eased_max_acceleration: 0.0,
            speed: 0.0,
            is_moving: false,
            has_movement_input: false,
            movement_input_amount: 0.0,
            last_velocity_rotation: rotation,
            last_movement_input_rotation: rotation,
            control_rotation: rotation,
            aiming_rotation: rotation,
            aim_yaw_rate: 0.0,
            max_speed: 0.0,
            rotation,
            target_rotation: rotation,
            in_air_rotation: rotation,
            previous_velocity: Vec3::ZERO,
            previous_aim_yaw: rotation.yaw,
        }
    }

    // ===== accessors =====

    pub fn movement_state(&self) -> MovementState {
        self.movement_state
    }

    pub fn previous_movement_state(&self) -> MovementState {
        self.previous_movement_state
    }

    pub fn movement_action(&self) -> MovementAction {
        self.movement_action
    }

    pub fn rotation_mode(&self) -> RotationMode {
        self.rotation_mode
    }

    pub fn desired_rotation_mode(&self) -> RotationMode {
        self.desired_rotation_mode
    }

    /// Gait the character is actually moving at.
    pub fn gait(&self) -> Gait {
        self.gait
    }

    pub fn desired_gait(&self) -> Gait {
        self.desired_gait
    }

    pub fn allowed_gait(&self) -> Gait {
        self.allowed_gait
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn overlay_state(&self) -> OverlayState {
        self.overlay_state
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Smoothed acceleration derived from velocity change.
    pub fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Input acceleration (replicated to observers).
    pub fn current_acceleration(&self) -> Vec3 {
        self.current_acceleration
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn has_movement_input(&self) -> bool {
        self.has_movement_input
    }

    pub fn movement_input_amount(&self) -> f32 {
        self.movement_input_amount
    }

    pub fn last_velocity_rotation(&self) -> Rotator {
        self.last_velocity_rotation
    }

    pub fn last_movement_input_rotation(&self) -> Rotator {
        self.last_movement_input_rotation
    }

    pub fn control_rotation(&self) -> Rotator {
        self.control_rotation
    }

    pub fn aiming_rotation(&self) -> Rotator {
        self.aiming_rotation
    }

    pub fn aim_yaw_rate(&self) -> f32 {
        self.aim_yaw_rate
    }

    /// Speed cap for the movement component at the allowed gait.
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Actor rotation.
    pub fn rotation(&self) -> Rotator {
        self.rotation
    }

    pub fn target_rotation(&self) -> Rotator {
        self.target_rotation
    }

    pub fn in_air_rotation(&self) -> Rotator {
        self.in_air_rotation
    }

    // ===== mode setters =====

    pub fn set_movement_state(&mut self, state: MovementState) {
        if state == self.movement_state {
            return;
        }
        self.previous_movement_state = self.movement_state;
        self.movement_state = state;

        if state == MovementState::InAir {
            if self.movement_action == MovementAction::None {
                self.in_air_rotation = self.rotation;
                if self.stance == Stance::Crouching {
                    self.stance = Stance::Standing;
                }
            } else if self.movement_action == MovementAction::Rolling {
                self.movement_action = MovementAction::None;
            }
        }
    }

    pub fn set_movement_action(&mut self, action: MovementAction) {
        self.movement_action = action;
    }

    pub fn set_desired_gait(&mut self, gait: Gait) {
        self.desired_gait = gait;
    }

    pub fn set_stance(&mut self, stance: Stance) {
        self.stance = stance;
    }

    pub fn set_overlay_state(&mut self, overlay: OverlayState) {
        self.overlay_state = overlay;
    }

    /// Records the player's preferred rotation mode and applies it unless the
    /// view mode forbids it.
    pub fn set_desired_rotation_mode(&mut self, mode: RotationMode) {
        self.desired_rotation_mode = mode;
        self.set_rotation_mode(mode);
    }

    /// Velocity-direction rotation is third-person only; switching to it in
    /// first person also switches the view.
    pub fn set_rotation_mode(&mut self, mode: RotationMode) {
        if mode == self.rotation_mode {
            return;
        }
        self.rotation_mode = mode;
        if mode == RotationMode::VelocityDirection && self.view_mode == ViewMode::FirstPerson {
            self.set_view_mode(ViewMode::ThirdPerson);
        }
    }

    /// First person forces looking-direction rotation; returning to third
    /// person restores the desired rotation mode.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode == self.view_mode {
            return;
        }
        self.view_mode = mode;
        match mode {
            ViewMode::ThirdPerson => {
                if self.rotation_mode != RotationMode::Aiming {
                    self.set_rotation_mode(self.desired_rotation_mode);
                }
            }
            ViewMode::FirstPerson => {
                if self.rotation_mode == RotationMode::VelocityDirection {
                    self.set_rotation_mode(RotationMode::LookingDirection);
                }
            }
        }
    }

    /// Teleports the actor rotation, resetting the smoothing targets.
    pub fn set_rotation(&mut self, rotation: Rotator) {
        self.rotation = rotation;
        self.target_rotation = rotation;
    }

    /// Overrides replicated inputs on a simulated replica.
    pub fn apply_replicated_inputs(&mut self, control_rotation: Rotator, current_acceleration: Vec3) {
        self.control_rotation = control_rotation;
        self.current_acceleration = current_acceleration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_person_leaves_velocity_direction() {
        let mut state = LocomotionState::default();
        state.set_desired_rotation_mode(RotationMode::VelocityDirection);
        state.set_view_mode(ViewMode::FirstPerson);
        assert_eq!(state.rotation_mode(), RotationMode::LookingDirection);

        state.set_view_mode(ViewMode::ThirdPerson);
        assert_eq!(state.rotation_mode(), RotationMode::VelocityDirection);
    }

    #[test]
    fn velocity_direction_forces_third_person() {
        let mut state = LocomotionState::default();
        state.set_view_mode(ViewMode::FirstPerson);
        state.set_desired_rotation_mode(RotationMode::VelocityDirection);
        assert_eq!(state.view_mode(), ViewMode::ThirdPerson);
        assert_eq!(state.rotation_mode(), RotationMode::VelocityDirection);
    }

    #[test]
    fn leaving_the_ground_stores_in_air_rotation_and_stands_up() {
        let mut state = LocomotionState::new(Rotator::from_yaw(45.0));
        state.set_stance(Stance::Crouching);
        state.set_movement_state(MovementState::InAir);
        assert_eq!(state.in_air_rotation().yaw, 45.0);
        assert_eq!(state.stance(), Stance::Standing);
        assert_eq!(state.previous_movement_state(), MovementState::Grounded);
    }
}
