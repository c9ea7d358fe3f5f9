use glam::Vec3;

use crate::math::Rotator;

/// Camera behavior tuning, normally driven by camera animation curves.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CameraBehaviorParams {
    /// Speed at which the camera rotation follows the view rotation.
    pub rotation_lag_speed: f32,
    /// Per-axis speeds at which the pivot follows its target, in yaw space.
    pub pivot_lag_speed: Vec3,
    /// Offset of the pivot in the pivot target's frame.
    pub pivot_offset: Vec3,
    /// Offset of the camera in the camera rotation's frame. `y` is mirrored
    /// for the left shoulder.
    pub camera_offset: Vec3,
    /// `0` third person, `1` first person.
    pub first_person_weight: f32,
    /// Blend toward the debug view.
    pub debug_override_weight: f32,
    pub debug_view_rotation: Rotator,
    pub debug_view_offset: Vec3,
    /// Maximum distance the smoothed pivot may trail its target.
    pub pivot_limit_radius: Option<f32>,
    /// Exponent of the ease curve used inside the limit radius.
    pub pivot_limit_exponent: f32,
}

impl Default for CameraBehaviorParams {
    fn default() -> Self {
        Self {
            rotation_lag_speed: 10.0,
            pivot_lag_speed: Vec3::new(10.0, 10.0, 15.0),
            pivot_offset: Vec3::ZERO,
            camera_offset: Vec3::new(-250.0, 40.0, 10.0),
            first_person_weight: 0.0,
            debug_override_weight: 0.0,
            debug_view_rotation: Rotator::ZERO,
            debug_view_offset: Vec3::ZERO,
            pivot_limit_radius: None,
            pivot_limit_exponent: 2.0,
        }
    }
}

impl CameraBehaviorParams {
    /// Defaults for a fixed overhead camera.
    pub fn top_down() -> Self {
        Self {
            rotation_lag_speed: 0.0,
            pivot_lag_speed: Vec3::new(6.0, 6.0, 6.0),
            camera_offset: Vec3::new(-800.0, 0.0, 0.0),
            pivot_limit_radius: Some(150.0),
            ..Self::default()
        }
    }
}
