//! Camera behavior: smoothed pivot, shoulder offsets, collision pull-in and
//! first-person blending.
//!
//! A [`CameraPivotPolicy`] says what to look at; [`CameraController`] owns the
//! frame-to-frame smoothing.

mod controller;
mod params;
mod policy;

pub use controller::{
    CameraController, CameraPose, axis_independent_lag, limit_pivot_target, limit_radius_axis,
};
pub use params::CameraBehaviorParams;
pub use policy::{
    CameraPivotPolicy, CameraSubject, CameraTargets, CameraTrace, ThirdPersonPivot, TopDownPivot,
};
