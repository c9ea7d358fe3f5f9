//! Actor rotation while grounded, rolling or airborne.

use crate::math::{Rotator, r_interp_constant_to, r_interp_to};

use super::policy::AnimCurves;
use super::settings::MovementSettings;
use super::state::LocomotionState;
use super::types::{Gait, MovementAction, RotationMode, ViewMode};

/// Speed above which the character keeps turning toward its heading even
/// without input.
const MOVING_ROTATION_MIN_SPEED: f32 = 150.0;
/// Turn-in-place curves are authored per 1/30 s frame.
const CURVE_FRAME_TIME: f32 = 1.0 / 30.0;
const AIM_YAW_LIMIT: f32 = 100.0;

impl LocomotionState {
    /// Two-stage smoothing: the target approaches `goal` at a constant rate,
    /// then the actor approaches the target exponentially.
    pub fn smooth_rotation(&mut self, goal: Rotator, target_speed: f32, actor_speed: f32, dt: f32) {
        self.target_rotation = r_interp_constant_to(self.target_rotation, goal, dt, target_speed);
        self.rotation = r_interp_to(self.rotation, self.target_rotation, dt, actor_speed);
    }

    /// Keeps the actor within `[min, max]` degrees of the aim yaw.
    pub fn limit_rotation(&mut self, min: f32, max: f32, speed: f32, dt: f32) {
        let delta = (self.aiming_rotation - self.rotation).normalized().yaw;
        if delta < min || delta > max {
            let edge = if delta > 0.0 { min } else { max };
            let goal = Rotator::from_yaw(self.aiming_rotation.yaw + edge);
            self.smooth_rotation(goal, 0.0, speed, dt);
        }
    }

    pub(super) fn update_grounded_rotation(
        &mut self,
        settings: &MovementSettings,
        curves: &dyn AnimCurves,
        dt: f32,
    ) {
        match self.movement_action {
            MovementAction::None => {}
            MovementAction::Rolling => {
                if self.has_movement_input {
                    let goal = Rotator::from_yaw(self.last_movement_input_rotation.yaw);
                    self.smooth_rotation(goal, 0.0, 2.0, dt);
                }
                return;
            }
            _ => return,
        }

        let can_update_moving_rotation = (self.is_moving && self.has_movement_input)
            || self.speed > MOVING_ROTATION_MIN_SPEED;

        if can_update_moving_rotation {
            let rate = self.grounded_rotation_rate(settings);
            match self.rotation_mode {
                RotationMode::VelocityDirection => {
                    let goal = Rotator::from_yaw(self.last_velocity_rotation.yaw);
                    self.smooth_rotation(goal, 800.0, rate, dt);
                }
                RotationMode::LookingDirection => {
                    let yaw = if self.gait == Gait::Sprinting {
                        self.last_velocity_rotation.yaw
                    } else {
                        self.aiming_rotation.yaw + curves.yaw_offset()
                    };
                    self.smooth_rotation(Rotator::from_yaw(yaw), 500.0, rate, dt);
                }
                RotationMode::Aiming => {
                    let goal = Rotator::from_yaw(self.aiming_rotation.yaw);
                    self.smooth_rotation(goal, 1000.0, 20.0, dt);
                }
            }
            return;
        }

        let aiming_in_third_person =
            self.view_mode == ViewMode::ThirdPerson && self.rotation_mode == RotationMode::Aiming;
        if aiming_in_third_person || self.view_mode == ViewMode::FirstPerson {
            self.limit_rotation(-AIM_YAW_LIMIT, AIM_YAW_LIMIT, 20.0, dt);
        }

        let rotation_amount = curves.rotation_amount();
        if rotation_amount.abs() > 0.001 {
            let yaw = self.rotation.yaw + rotation_amount * (dt / CURVE_FRAME_TIME);
            self.rotation = Rotator::new(
                self.rotation.pitch,
                Rotator::normalize_axis(yaw),
                self.rotation.roll,
            );
            self.target_rotation = self.rotation;
        }
    }

    pub(super) fn update_in_air_rotation(&mut self, dt: f32) {
        match self.rotation_mode {
            RotationMode::VelocityDirection | RotationMode::LookingDirection => {
                let goal = Rotator::from_yaw(self.in_air_rotation.yaw);
                self.smooth_rotation(goal, 0.0, 5.0, dt);
            }
            RotationMode::Aiming => {
                let goal = Rotator::from_yaw(self.aiming_rotation.yaw);
                self.smooth_rotation(goal, 0.0, 15.0, dt);
                self.in_air_rotation = self.rotation;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::Vec3;

    use super::*;
    use crate::locomotion::policy::{CurveSample, NoCurves, ThirdPersonLocomotion};
    use crate::locomotion::settings::MovementSettingsTable;
    use crate::locomotion::state::LocomotionInput;
    use crate::locomotion::types::{MovementState, Stance};

    const DT: f32 = 1.0 / 30.0;

    fn settings() -> MovementSettings {
        MovementSettingsTable::default()
            .get(RotationMode::LookingDirection, Stance::Standing)
            .clone()
    }

    fn step(state: &mut LocomotionState, velocity: Vec3, input: Vec3, aim_yaw: f32, curves: &dyn AnimCurves) {
        state.tick(
            &LocomotionInput {
                velocity,
                current_acceleration: input,
                max_acceleration: 1500.0,
                control_rotation: Rotator::from_yaw(aim_yaw),
                delta_time: DT,
                locally_controlled: true,
            },
            &settings(),
            &ThirdPersonLocomotion::default(),
            curves,
        );
    }

    #[test]
    fn velocity_direction_turns_toward_travel() {
        let mut state = LocomotionState::default();
        state.set_desired_rotation_mode(RotationMode::VelocityDirection);
        let velocity = Vec3::new(0.0, 300.0, 0.0);
        let mut previous = 0.0;
        for _ in 0..60 {
            step(&mut state, velocity, velocity, 0.0, &NoCurves);
            let yaw = state.rotation().yaw;
            assert!(yaw >= previous - 1e-3);
            previous = yaw;
        }
        assert_abs_diff_eq!(state.rotation().yaw, 90.0, epsilon = 0.5);
    }

    #[test]
    fn looking_direction_adds_yaw_offset_curve() {
        let mut state = LocomotionState::default();
        let velocity = Vec3::new(300.0, 0.0, 0.0);
        let curves = CurveSample {
            yaw_offset: 20.0,
            rotation_amount: 0.0,
        };
        for _ in 0..120 {
            step(&mut state, velocity, velocity, 10.0, &curves);
        }
        assert_abs_diff_eq!(state.rotation().yaw, 30.0, epsilon = 0.5);
    }

    #[test]
    fn stationary_turn_in_place_uses_rotation_amount() {
        let mut state = LocomotionState::default();
        let curves = CurveSample {
            yaw_offset: 0.0,
            rotation_amount: 2.0,
        };
        step(&mut state, Vec3::ZERO, Vec3::ZERO, 0.0, &curves);
        assert_abs_diff_eq!(state.rotation().yaw, 2.0, epsilon = 1e-3);
        assert_eq!(state.target_rotation(), state.rotation());

        let tiny = CurveSample {
            yaw_offset: 0.0,
            rotation_amount: 0.0005,
        };
        step(&mut state, Vec3::ZERO, Vec3::ZERO, 0.0, &tiny);
        assert_abs_diff_eq!(state.rotation().yaw, 2.0, epsilon = 1e-3);
    }

    #[test]
    fn stationary_aiming_limits_rotation_to_aim() {
        let mut state = LocomotionState::default();
        state.set_desired_rotation_mode(RotationMode::Aiming);
        for _ in 0..120 {
            step(&mut state, Vec3::ZERO, Vec3::ZERO, 170.0, &NoCurves);
        }
        let delta = (Rotator::from_yaw(170.0) - state.rotation()).normalized().yaw;
        assert!(delta.abs() <= 100.5, "{delta}");
    }

    #[test]
    fn in_air_holds_take_off_heading() {
        let mut state = LocomotionState::new(Rotator::from_yaw(30.0));
        state.set_movement_state(MovementState::InAir);
        for _ in 0..30 {
            step(&mut state, Vec3::new(0.0, 400.0, 0.0), Vec3::ZERO, 120.0, &NoCurves);
        }
        assert_abs_diff_eq!(state.rotation().yaw, 30.0, epsilon = 1e-3);

        state.set_desired_rotation_mode(RotationMode::Aiming);
        for _ in 0..60 {
            step(&mut state, Vec3::new(0.0, 400.0, 0.0), Vec3::ZERO, 120.0, &NoCurves);
        }
        assert_abs_diff_eq!(state.rotation().yaw, 120.0, epsilon = 0.5);
        assert_eq!(state.in_air_rotation(), state.rotation());
    }
}
