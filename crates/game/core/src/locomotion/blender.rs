//! Per-tick locomotion blending: essential values, gait resolution and
//! rotation update.

use crate::math::{Rotator, mapped_range_clamped, r_interp_to};

use super::policy::{AnimCurves, GaitRequest, LocomotionPolicy};
use super::settings::MovementSettings;
use super::state::{LocomotionInput, LocomotionState};
use super::types::{Gait, MovementState, RotationMode};

/// Rotation speed used to smooth remote aim toward the replicated control
/// rotation.
pub const REMOTE_AIM_INTERP_SPEED: f32 = 30.0;

/// Input strength required to sprint.
pub const SPRINT_INPUT_THRESHOLD: f32 = 0.9;

/// Largest input-to-aim yaw difference that still permits a
/// looking-direction sprint.
pub const SPRINT_MAX_YAW_DELTA: f32 = 50.0;

impl LocomotionState {
    /// Runs one locomotion tick.
    pub fn tick(
        &mut self,
        input: &LocomotionInput,
        settings: &MovementSettings,
        policy: &dyn LocomotionPolicy,
        curves: &dyn AnimCurves,
    ) {
        if input.delta_time <= 0.0 {
            return;
        }
        if let Some(view_mode) = policy.locked_view_mode() {
            self.set_view_mode(view_mode);
        }

        self.update_essentials(input);

        match self.movement_state {
            MovementState::Grounded => {
                self.update_gait(settings, policy);
                self.update_grounded_rotation(settings, curves, input.delta_time);
            }
            MovementState::InAir => self.update_in_air_rotation(input.delta_time),
            MovementState::None | MovementState::Mantling | MovementState::Ragdoll => {}
        }

        self.previous_velocity = self.velocity;
        self.previous_aim_yaw = self.aiming_rotation.yaw;
    }

    /// Derives speed, acceleration, input amount and aim from raw input.
    pub fn update_essentials(&mut self, input: &LocomotionInput) {
        let dt = input.delta_time;

        if input.locally_controlled {
            self.current_acceleration = input.current_acceleration;
            self.control_rotation = input.control_rotation;
            self.eased_max_acceleration = input.max_acceleration;
            self.aiming_rotation = input.control_rotation;
        } else {
            self.eased_max_acceleration = if input.max_acceleration != 0.0 {
                input.max_acceleration
            } else {
                self.eased_max_acceleration / 2.0
            };
            self.aiming_rotation =
                r_interp_to(self.aiming_rotation, self.control_rotation, dt, REMOTE_AIM_INTERP_SPEED);
        }

        self.velocity = input.velocity;
        let new_acceleration = (self.velocity - self.previous_velocity) / dt;
        self.acceleration = if new_acceleration.length_squared() < 1.0e-8 || input.locally_controlled {
            new_acceleration
        } else {
            self.acceleration / 2.0
        };

        self.speed = self.velocity.truncate().length();
        self.is_moving = self.speed > 1.0;
        if self.is_moving {
            self.last_velocity_rotation = Rotator::from_direction(self.velocity);
        }

        self.movement_input_amount = if self.eased_max_acceleration > 0.0 {
            self.current_acceleration.length() / self.eased_max_acceleration
        } else {
            0.0
        };
        self.has_movement_input = self.movement_input_amount > 0.0;
        if self.has_movement_input {
            self.last_movement_input_rotation = Rotator::from_direction(self.current_acceleration);
        }

        self.aim_yaw_rate = ((self.aiming_rotation.yaw - self.previous_aim_yaw) / dt).abs();
    }

    /// Sprint eligibility from input strength and heading.
    pub fn can_sprint(&self) -> bool {
        if !self.has_movement_input || self.rotation_mode == RotationMode::Aiming {
            return false;
        }
        let valid_input_amount = self.movement_input_amount > SPRINT_INPUT_THRESHOLD;
        match self.rotation_mode {
            RotationMode::VelocityDirection => valid_input_amount,
            RotationMode::LookingDirection => {
                let input_rotation = Rotator::from_direction(self.current_acceleration);
                let delta = (input_rotation - self.aiming_rotation).normalized();
                valid_input_amount && delta.yaw.abs() < SPRINT_MAX_YAW_DELTA
            }
            RotationMode::Aiming => false,
        }
    }

    /// Gait ceiling from the variant's policy.
    pub fn resolve_allowed_gait(&self, policy: &dyn LocomotionPolicy) -> Gait {
        policy.allowed_gait(GaitRequest {
            desired_gait: self.desired_gait,
            stance: self.stance,
            rotation_mode: self.rotation_mode,
            can_sprint: self.can_sprint(),
        })
    }

    fn update_gait(&mut self, settings: &MovementSettings, policy: &dyn LocomotionPolicy) {
        let allowed = self.resolve_allowed_gait(policy);
        self.allowed_gait = allowed;
        self.gait = actual_gait(self.speed, allowed, settings, policy.gait_hysteresis());
        self.max_speed = settings.speed_for_gait(allowed);
    }

    /// Speed mapped onto `0..3` across the walk, run and sprint speeds.
    pub fn mapped_speed(&self, settings: &MovementSettings) -> f32 {
        mapped_speed(self.speed, settings)
    }

    /// Grounded rotation rate: the settings curve at the mapped speed, scaled
    /// by how fast the aim is turning.
    pub fn grounded_rotation_rate(&self, settings: &MovementSettings) -> f32 {
        let curve = settings.rotation_rate_curve.evaluate(self.mapped_speed(settings));
        let aim_scale = mapped_range_clamped((0.0, 300.0), (1.0, 3.0), self.aim_yaw_rate);
        curve * aim_scale
    }
}

/// Gait implied by `speed` under `allowed`, with a dead band of `hysteresis`
/// above the walk and run speeds.
pub fn actual_gait(speed: f32, allowed: Gait, settings: &MovementSettings, hysteresis: f32) -> Gait {
    if speed > settings.run_speed + hysteresis {
        if allowed == Gait::Sprinting {
            Gait::Sprinting
        } else {
            Gait::Running
        }
    } else if speed >= settings.walk_speed + hysteresis {
        Gait::Running
    } else {
        Gait::Walking
    }
}

/// `0..1` walking, `1..2` running, `2..3` sprinting.
pub fn mapped_speed(speed: f32, settings: &MovementSettings) -> f32 {
    if speed > settings.run_speed {
        mapped_range_clamped((settings.run_speed, settings.sprint_speed), (2.0, 3.0), speed)
    } else if speed > settings.walk_speed {
        mapped_range_clamped((settings.walk_speed, settings.run_speed), (1.0, 2.0), speed)
    } else {
        mapped_range_clamped((0.0, settings.walk_speed), (0.0, 1.0), speed)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use glam::Vec3;

    use super::*;
    use crate::locomotion::policy::{NoCurves, ThirdPersonLocomotion};
    use crate::locomotion::settings::MovementSettingsTable;
    use crate::locomotion::types::Stance;

    fn standing() -> MovementSettings {
        MovementSettingsTable::default()
            .get(RotationMode::LookingDirection, Stance::Standing)
            .clone()
    }

    fn input(velocity: Vec3, current_acceleration: Vec3) -> LocomotionInput {
        LocomotionInput {
            velocity,
            current_acceleration,
            max_acceleration: 1500.0,
            control_rotation: Rotator::ZERO,
            delta_time: 1.0 / 30.0,
            locally_controlled: true,
        }
    }

    #[test]
    fn gait_bands_with_sprint_disabled() {
        let settings = standing();
        let walk = settings.walk_speed;
        let run = settings.run_speed;
        for (speed, expected) in [
            (0.0, Gait::Walking),
            (walk + 9.9, Gait::Walking),
            (walk + 10.0, Gait::Running),
            (run + 10.0, Gait::Running),
            (run + 10.1, Gait::Running),
            (2000.0, Gait::Running),
        ] {
            assert_eq!(actual_gait(speed, Gait::Running, &settings, 10.0), expected, "{speed}");
        }
        assert_eq!(
            actual_gait(run + 10.1, Gait::Sprinting, &settings, 10.0),
            Gait::Sprinting
        );
    }

    #[test]
    fn mapped_speed_spans_three_bands() {
        let settings = standing();
        assert_abs_diff_eq!(mapped_speed(0.0, &settings), 0.0);
        assert_abs_diff_eq!(mapped_speed(settings.walk_speed, &settings), 1.0);
        assert_abs_diff_eq!(mapped_speed(settings.run_speed, &settings), 2.0);
        assert_abs_diff_eq!(mapped_speed(10_000.0, &settings), 3.0);
    }

    #[test]
    fn mapped_speed_handles_collapsed_sprint_band() {
        let aiming = MovementSettingsTable::default()
            .get(RotationMode::Aiming, Stance::Standing)
            .clone();
        assert_abs_diff_eq!(mapped_speed(aiming.run_speed + 50.0, &aiming), 3.0);
    }

    #[test]
    fn essentials_follow_velocity_and_input() {
        let mut state = LocomotionState::default();
        let step = input(Vec3::new(300.0, 0.0, 0.0), Vec3::new(1500.0, 0.0, 0.0));
        state.update_essentials(&step);
        assert_abs_diff_eq!(state.speed(), 300.0);
        assert!(state.is_moving());
        assert!(state.has_movement_input());
        assert_abs_diff_eq!(state.movement_input_amount(), 1.0);
        assert_abs_diff_eq!(state.acceleration().x, 9000.0, epsilon = 0.1);
    }

    #[test]
    fn remote_acceleration_decays_by_half() {
        let mut state = LocomotionState::default();
        let mut step = input(Vec3::new(300.0, 0.0, 0.0), Vec3::ZERO);
        step.locally_controlled = false;
        state.acceleration = Vec3::new(100.0, 0.0, 0.0);
        state.update_essentials(&step);
        assert_abs_diff_eq!(state.acceleration().x, 50.0);
    }

    #[test]
    fn remote_aim_is_smoothed_toward_replicated_control() {
        let mut state = LocomotionState::default();
        state.apply_replicated_inputs(Rotator::from_yaw(90.0), Vec3::ZERO);
        let mut step = input(Vec3::ZERO, Vec3::ZERO);
        step.locally_controlled = false;
        step.delta_time = 1.0 / 60.0;
        state.update_essentials(&step);
        let yaw = state.aiming_rotation().yaw;
        assert_abs_diff_eq!(yaw, 45.0, epsilon = 1e-3);
        assert_abs_diff_eq!(state.aim_yaw_rate(), yaw * 60.0, epsilon = 1e-1);
    }

    #[test]
    fn tick_resolves_gait_from_speed() {
        let settings = standing();
        let policy = ThirdPersonLocomotion::default();
        let mut state = LocomotionState::default();
        state.set_desired_gait(Gait::Sprinting);
        state.tick(
            &input(Vec3::new(590.0, 0.0, 0.0), Vec3::new(1500.0, 0.0, 0.0)),
            &settings,
            &policy,
            &NoCurves,
        );
        assert_eq!(state.allowed_gait(), Gait::Running);
        assert_eq!(state.gait(), Gait::Running);
        assert_abs_diff_eq!(state.max_speed(), settings.run_speed);

        let sprinting = ThirdPersonLocomotion {
            sprint_enabled: true,
            ..Default::default()
        };
        state.tick(
            &input(Vec3::new(590.0, 0.0, 0.0), Vec3::new(1500.0, 0.0, 0.0)),
            &settings,
            &sprinting,
            &NoCurves,
        );
        assert_eq!(state.gait(), Gait::Sprinting);
    }

    #[test]
    fn looking_direction_sprint_requires_aligned_input() {
        let mut state = LocomotionState::default();
        state.update_essentials(&input(Vec3::ZERO, Vec3::new(0.0, 1500.0, 0.0)));
        // Input points 90 degrees away from the aim.
        assert!(!state.can_sprint());
        state.update_essentials(&input(Vec3::ZERO, Vec3::new(1500.0, 0.0, 0.0)));
        assert!(state.can_sprint());
    }
}
