//! Where the camera looks from and at, per character variant.

use core::fmt;

use glam::Vec3;

use crate::math::{Rotator, Transform};

/// What a pivot policy knows about the character it follows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSubject {
    pub location: Vec3,
    pub rotation: Rotator,
    pub control_rotation: Rotator,
    /// Point the character is aiming at on its ground plane.
    pub aim_location: Vec3,
    pub right_shoulder: bool,
}

/// Sphere sweep used to pull the camera in front of blockers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTrace {
    pub origin: Vec3,
    pub radius: f32,
}

/// Targets the camera controller smooths toward each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTargets {
    pub pivot_target: Transform,
    pub first_person_target: Vec3,
    pub third_person_fov: f32,
    pub first_person_fov: f32,
    pub right_shoulder: bool,
    /// `None` disables collision correction.
    pub trace: Option<CameraTrace>,
    /// Centre of the pivot limit radius, when the behavior has one.
    pub pivot_anchor: Option<Vec3>,
    /// Rotation the camera follows.
    pub view_rotation: Rotator,
    /// Replaces the behavior's first-person weight when set.
    pub first_person_weight: Option<f32>,
}

/// Camera targets injected per character variant.
pub trait CameraPivotPolicy: fmt::Debug + Send + Sync {
    fn targets(&self, subject: &CameraSubject) -> CameraTargets;
}

/// Over-the-shoulder camera following the control rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThirdPersonPivot {
    pub pivot_height: f32,
    pub eye_height: f32,
    pub trace_height: f32,
    pub trace_shoulder_offset: f32,
    pub trace_radius: f32,
    pub third_person_fov: f32,
    pub first_person_fov: f32,
}

impl Default for ThirdPersonPivot {
    fn default() -> Self {
        Self {
            pivot_height: 50.0,
            eye_height: 70.0,
            trace_height: 60.0,
            trace_shoulder_offset: 15.0,
            trace_radius: 15.0,
            third_person_fov: 90.0,
            first_person_fov: 90.0,
        }
    }
}

impl CameraPivotPolicy for ThirdPersonPivot {
    fn targets(&self, subject: &CameraSubject) -> CameraTargets {
        let side = if subject.right_shoulder { 1.0 } else { -1.0 };
        let right = subject.rotation.right();
        CameraTargets {
            pivot_target: Transform::new(
                subject.location + Vec3::Z * self.pivot_height,
                subject.rotation,
            ),
            first_person_target: subject.location + Vec3::Z * self.eye_height,
            third_person_fov: self.third_person_fov,
            first_person_fov: self.first_person_fov,
            right_shoulder: subject.right_shoulder,
            trace: Some(CameraTrace {
                origin: subject.location
                    + Vec3::Z * self.trace_height
                    + right * (self.trace_shoulder_offset * side),
                radius: self.trace_radius,
            }),
            pivot_anchor: None,
            view_rotation: subject.control_rotation,
            first_person_weight: None,
        }
    }
}

/// Overhead camera with a fixed view rotation and no first-person mode. The
/// pivot leans toward the aim point, at most `aim_max_radius` away from the
/// character.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TopDownPivot {
    pub view_rotation: Rotator,
    pub fov: f32,
    pub aim_max_radius: f32,
}

impl Default for TopDownPivot {
    fn default() -> Self {
        Self {
            view_rotation: Rotator::new(-60.0, -45.0, 0.0),
            fov: 90.0,
            aim_max_radius: 500.0,
        }
    }
}

impl TopDownPivot {
    /// Aim point pulled back inside `aim_max_radius` of `anchor`.
    pub fn clamped_aim(&self, anchor: Vec3, aim: Vec3) -> Vec3 {
        anchor + (aim - anchor).clamp_length_max(self.aim_max_radius.max(0.0))
    }
}

impl CameraPivotPolicy for TopDownPivot {
    fn targets(&self, subject: &CameraSubject) -> CameraTargets {
        CameraTargets {
            pivot_target: Transform::new(
                self.clamped_aim(subject.location, subject.aim_location),
                subject.rotation,
            ),
            first_person_target: subject.location,
            third_person_fov: self.fov,
            first_person_fov: self.fov,
            right_shoulder: false,
            trace: None,
            pivot_anchor: Some(subject.location),
            view_rotation: self.view_rotation,
            first_person_weight: Some(0.0),
        }
    }
}
