use glam::Vec3;

use crate::collision::CollisionQuery;
use crate::ids::CharacterId;
use crate::math::{
    Rotator, Transform, f_interp_to, interp_ease_in, interp_ease_out, lerp, r_interp_to, range_pct,
};

use super::params::CameraBehaviorParams;
use super::policy::CameraTargets;

/// Final camera pose for a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraPose {
    pub location: Vec3,
    pub rotation: Rotator,
    pub fov: f32,
}

/// Smoothing state carried between frames.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CameraController {
    smoothed_pivot: Transform,
    pivot_location: Vec3,
    target_rotation: Rotator,
    target_location: Vec3,
    pose: Option<CameraPose>,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> Option<CameraPose> {
        self.pose
    }

    pub fn smoothed_pivot(&self) -> Transform {
        self.smoothed_pivot
    }

    pub fn pivot_location(&self) -> Vec3 {
        self.pivot_location
    }

    pub fn target_rotation(&self) -> Rotator {
        self.target_rotation
    }

    pub fn target_location(&self) -> Vec3 {
        self.target_location
    }

    /// Snaps every smoothed value onto its target on the next update.
    pub fn reset(&mut self) {
        self.pose = None;
    }

    pub fn update(
        &mut self,
        targets: &CameraTargets,
        params: &CameraBehaviorParams,
        delta_time: f32,
        world: &dyn CollisionQuery,
        ignore: Option<CharacterId>,
    ) -> CameraPose {
        let first_frame = self.pose.is_none();
        if first_frame {
            self.smoothed_pivot = targets.pivot_target;
            self.target_rotation = targets.view_rotation;
        }

        // Rotation.
        let interp = if params.rotation_lag_speed > 0.0 && !first_frame {
            r_interp_to(
                self.target_rotation,
                targets.view_rotation,
                delta_time,
                params.rotation_lag_speed,
            )
        } else {
            targets.view_rotation
        };
        self.target_rotation =
            interp.lerp_shortest(params.debug_view_rotation, params.debug_override_weight);

        // Smoothed pivot.
        let destination = match (params.pivot_limit_radius, targets.pivot_anchor) {
            (Some(radius), Some(anchor)) => limit_pivot_target(
                anchor,
                targets.pivot_target.location,
                radius,
                params.pivot_limit_exponent,
            ),
            _ => targets.pivot_target.location,
        };
        let lagged = if first_frame {
            destination
        } else {
            axis_independent_lag(
                self.smoothed_pivot.location,
                destination,
                self.target_rotation,
                params.pivot_lag_speed,
                delta_time,
            )
        };
        self.smoothed_pivot = Transform::new(lagged, targets.pivot_target.rotation);

        // Pivot offset in the pivot target's frame.
        let pivot_rotation = self.smoothed_pivot.rotation;
        self.pivot_location = self.smoothed_pivot.location
            + pivot_rotation.forward() * params.pivot_offset.x
            + pivot_rotation.right() * params.pivot_offset.y
            + pivot_rotation.up() * params.pivot_offset.z;

        // Camera offset in the camera's frame.
        let shoulder = if targets.right_shoulder { 1.0 } else { -1.0 };
        let offset = Vec3::new(
            params.camera_offset.x,
            params.camera_offset.y * shoulder,
            params.camera_offset.z,
        );
        let offset_location = self.pivot_location + self.target_rotation.rotate_vector(offset);
        self.target_location = offset_location.lerp(
            targets.pivot_target.location + params.debug_view_offset,
            params.debug_override_weight,
        );

        if let Some(trace) = targets.trace {
            if let Some(hit) =
                world.sweep_sphere(trace.origin, self.target_location, trace.radius, ignore)
            {
                self.target_location += hit.location - self.target_location;
            }
        }

        let fp_weight = targets
            .first_person_weight
            .unwrap_or(params.first_person_weight)
            .clamp(0.0, 1.0);
        let third_person = Transform::new(self.target_location, self.target_rotation);
        let first_person = Transform::new(targets.first_person_target, self.target_rotation);
        let mixed = third_person.lerp(first_person, fp_weight);
        let debug = Transform::new(self.target_location, params.debug_view_rotation);
        let final_transform = mixed.lerp(debug, params.debug_override_weight);

        let pose = CameraPose {
            location: final_transform.location,
            rotation: final_transform.rotation,
            fov: lerp(targets.third_person_fov, targets.first_person_fov, fp_weight),
        };
        self.pose = Some(pose);
        pose
    }
}

/// Interpolates each axis independently in the camera's yaw frame.
pub fn axis_independent_lag(
    current: Vec3,
    target: Vec3,
    camera_rotation: Rotator,
    lag_speeds: Vec3,
    delta_time: f32,
) -> Vec3 {
    let yaw = camera_rotation.yaw_only();
    let current_local = yaw.unrotate_vector(current);
    let target_local = yaw.unrotate_vector(target);
    let result = Vec3::new(
        f_interp_to(current_local.x, target_local.x, delta_time, lag_speeds.x),
        f_interp_to(current_local.y, target_local.y, delta_time, lag_speeds.y),
        f_interp_to(current_local.z, target_local.z, delta_time, lag_speeds.z),
    );
    yaw.rotate_vector(result)
}

/// Maps `alpha` in `[0, 1]` onto `[-radius, radius]`: ease-out up to the
/// midpoint, ease-in after it.
pub fn limit_radius_axis(radius: f32, alpha: f32, exponent: f32) -> f32 {
    let shaped = if alpha < 0.5 {
        interp_ease_out(0.0, 1.0, alpha * 2.0, exponent) * 0.5
    } else {
        interp_ease_in(0.0, 1.0, alpha * 2.0 - 1.0, exponent) * 0.5 + 0.5
    };
    lerp(-radius, radius, shaped)
}

/// Pulls `target` toward `anchor` so it never leaves `radius`. Distances
/// near the anchor shrink the most.
pub fn limit_pivot_target(anchor: Vec3, target: Vec3, radius: f32, exponent: f32) -> Vec3 {
    if radius <= 0.0 {
        return anchor;
    }
    let offset = target - anchor;
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return target;
    }
    let alpha = range_pct(-radius, radius, distance).clamp(0.0, 1.0);
    anchor + offset / distance * limit_radius_axis(radius, alpha, exponent)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::camera::policy::{CameraPivotPolicy, CameraSubject, ThirdPersonPivot, TopDownPivot};
    use crate::collision::{EmptyWorld, Hit};

    const DT: f32 = 1.0 / 60.0;

    fn subject(location: Vec3) -> CameraSubject {
        CameraSubject {
            location,
            rotation: Rotator::ZERO,
            control_rotation: Rotator::ZERO,
            aim_location: location,
            right_shoulder: true,
        }
    }

    struct Wall {
        x: f32,
    }

    impl CollisionQuery for Wall {
        fn sweep_sphere(
            &self,
            start: Vec3,
            end: Vec3,
            _radius: f32,
            _ignore: Option<CharacterId>,
        ) -> Option<Hit> {
            let lo = start.x.min(end.x);
            let hi = start.x.max(end.x);
            if self.x < lo || self.x > hi || (end.x - start.x).abs() < f32::EPSILON {
                return None;
            }
            let t = (self.x - start.x) / (end.x - start.x);
            Some(Hit {
                time: t,
                location: start.lerp(end, t),
                character: None,
            })
        }
    }

    #[test]
    fn first_frame_snaps_to_targets() {
        let targets = ThirdPersonPivot::default().targets(&subject(Vec3::ZERO));
        let params = CameraBehaviorParams::default();
        let mut camera = CameraController::new();
        let pose = camera.update(&targets, &params, DT, &EmptyWorld, None);

        assert_eq!(camera.smoothed_pivot().location, targets.pivot_target.location);
        assert_abs_diff_eq!(pose.location.x, -250.0, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.location.y, 40.0, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.location.z, 60.0, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.fov, 90.0);
    }

    #[test]
    fn left_shoulder_mirrors_lateral_offset() {
        let mut s = subject(Vec3::ZERO);
        s.right_shoulder = false;
        let targets = ThirdPersonPivot::default().targets(&s);
        let pose = CameraController::new().update(
            &targets,
            &CameraBehaviorParams::default(),
            DT,
            &EmptyWorld,
            None,
        );
        assert_abs_diff_eq!(pose.location.y, -40.0, epsilon = 1e-3);
    }

    #[test]
    fn pivot_lags_behind_moving_target() {
        let policy = ThirdPersonPivot::default();
        let params = CameraBehaviorParams::default();
        let mut camera = CameraController::new();
        camera.update(&policy.targets(&subject(Vec3::ZERO)), &params, DT, &EmptyWorld, None);

        let moved = policy.targets(&subject(Vec3::new(100.0, 0.0, 0.0)));
        camera.update(&moved, &params, DT, &EmptyWorld, None);
        let x = camera.smoothed_pivot().location.x;
        assert!(x > 0.0 && x < 100.0, "{x}");

        for _ in 0..600 {
            camera.update(&moved, &params, DT, &EmptyWorld, None);
        }
        assert_abs_diff_eq!(camera.smoothed_pivot().location.x, 100.0, epsilon = 1e-2);
    }

    #[test]
    fn lag_is_axis_independent_in_yaw_space() {
        let speeds = Vec3::new(0.0, 10.0, 0.0);
        let result = axis_independent_lag(
            Vec3::ZERO,
            Vec3::new(100.0, 100.0, 100.0),
            Rotator::new(-30.0, 0.0, 0.0),
            speeds,
            0.05,
        );
        // Zero speed snaps, so only y is smoothed.
        assert_abs_diff_eq!(result.x, 100.0, epsilon = 1e-3);
        assert_abs_diff_eq!(result.y, 50.0, epsilon = 1e-3);
        assert_abs_diff_eq!(result.z, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn pivot_limit_eases_toward_radius() {
        let anchor = Vec3::ZERO;
        let far = limit_pivot_target(anchor, Vec3::new(500.0, 0.0, 0.0), 100.0, 2.0);
        assert_abs_diff_eq!(far.x, 100.0, epsilon = 1e-3);

        let mid = limit_pivot_target(anchor, Vec3::new(50.0, 0.0, 0.0), 100.0, 2.0);
        assert_abs_diff_eq!(mid.x, 25.0, epsilon = 1e-3);

        let near = limit_pivot_target(anchor, Vec3::new(0.0, 20.0, 0.0), 100.0, 2.0);
        assert_abs_diff_eq!(near.y, 4.0, epsilon = 1e-3);

        assert_eq!(limit_pivot_target(anchor, anchor, 100.0, 2.0), anchor);
    }

    #[test]
    fn limit_axis_is_symmetric_about_the_midpoint() {
        assert_abs_diff_eq!(limit_radius_axis(10.0, 0.0, 2.0), -10.0);
        assert_abs_diff_eq!(limit_radius_axis(10.0, 0.5, 2.0), 0.0);
        assert_abs_diff_eq!(limit_radius_axis(10.0, 1.0, 2.0), 10.0);
        assert_abs_diff_eq!(
            limit_radius_axis(10.0, 0.25, 2.0),
            -limit_radius_axis(10.0, 0.75, 2.0),
            epsilon = 1e-5
        );
    }

    #[test]
    fn collision_pulls_camera_in_front_of_blocker() {
        let targets = ThirdPersonPivot::default().targets(&subject(Vec3::ZERO));
        let mut camera = CameraController::new();
        let pose = camera.update(
            &targets,
            &CameraBehaviorParams::default(),
            DT,
            &Wall { x: -100.0 },
            None,
        );
        assert_abs_diff_eq!(pose.location.x, -100.0, epsilon = 1e-3);
    }

    #[test]
    fn first_person_weight_blends_pose_and_fov() {
        let mut policy = ThirdPersonPivot::default();
        policy.first_person_fov = 110.0;
        let targets = policy.targets(&subject(Vec3::ZERO));
        let params = CameraBehaviorParams {
            first_person_weight: 1.0,
            ..CameraBehaviorParams::default()
        };
        let pose = CameraController::new().update(&targets, &params, DT, &EmptyWorld, None);
        assert_abs_diff_eq!(pose.location.x, targets.first_person_target.x, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.location.z, 70.0, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.fov, 110.0);
    }

    #[test]
    fn top_down_uses_fixed_rotation_without_first_person_or_collision() {
        let mut s = subject(Vec3::new(10.0, 20.0, 0.0));
        s.control_rotation = Rotator::from_yaw(135.0);
        let targets = TopDownPivot::default().targets(&s);
        assert!(targets.trace.is_none());

        let params = CameraBehaviorParams {
            first_person_weight: 1.0,
            ..CameraBehaviorParams::top_down()
        };
        let pose = CameraController::new().update(
            &targets,
            &params,
            DT,
            &Wall { x: 0.0 },
            None,
        );
        assert_abs_diff_eq!(pose.rotation.pitch, -60.0, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.rotation.yaw, -45.0, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.fov, 90.0);
        assert!(pose.location.z > 600.0);
    }

    #[test]
    fn top_down_pivot_leans_toward_clamped_aim() {
        let policy = TopDownPivot {
            aim_max_radius: 100.0,
            ..TopDownPivot::default()
        };
        let mut s = subject(Vec3::ZERO);
        s.aim_location = Vec3::new(400.0, 0.0, 0.0);
        let targets = policy.targets(&s);
        assert_abs_diff_eq!(targets.pivot_target.location.x, 100.0, epsilon = 1e-3);
        assert_eq!(targets.pivot_anchor, Some(Vec3::ZERO));

        let params = CameraBehaviorParams {
            pivot_limit_radius: Some(100.0),
            ..CameraBehaviorParams::top_down()
        };
        let mut camera = CameraController::new();
        camera.update(&targets, &params, DT, &EmptyWorld, None);
        assert_abs_diff_eq!(camera.smoothed_pivot().location.x, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn debug_override_replaces_view() {
        let targets = ThirdPersonPivot::default().targets(&subject(Vec3::ZERO));
        let params = CameraBehaviorParams {
            debug_override_weight: 1.0,
            debug_view_rotation: Rotator::from_yaw(90.0),
            debug_view_offset: Vec3::new(0.0, 0.0, 300.0),
            ..CameraBehaviorParams::default()
        };
        let pose = CameraController::new().update(&targets, &params, DT, &EmptyWorld, None);
        assert_abs_diff_eq!(pose.rotation.yaw, 90.0, epsilon = 1e-3);
        assert_abs_diff_eq!(pose.location.z, 350.0, epsilon = 1e-3);
    }
}
