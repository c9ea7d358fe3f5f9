//! Per-variant locomotion rules and animation curve access.

use core::fmt;

use super::types::{Gait, RotationMode, Stance, ViewMode};

/// Default dead band above a gait's speed before the next gait engages.
pub const DEFAULT_GAIT_HYSTERESIS: f32 = 10.0;

/// What the blender needs to decide the allowed gait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GaitRequest {
    pub desired_gait: Gait,
    pub stance: Stance,
    pub rotation_mode: RotationMode,
    pub can_sprint: bool,
}

/// Locomotion rules injected per character variant.
pub trait LocomotionPolicy: fmt::Debug + Send + Sync {
    /// Gait ceiling for this tick.
    fn allowed_gait(&self, request: GaitRequest) -> Gait;

    /// Dead band added to walk/run speeds when resolving the actual gait.
    fn gait_hysteresis(&self) -> f32 {
        DEFAULT_GAIT_HYSTERESIS
    }

    /// A view mode this variant never leaves.
    fn locked_view_mode(&self) -> Option<ViewMode> {
        None
    }
}

/// Shared allowed-gait rule: sprint only when standing, not aiming, eligible
/// and enabled; otherwise `wanted` capped at running.
fn standard_allowed_gait(request: GaitRequest, wanted: Gait, sprint_enabled: bool) -> Gait {
    let upright = request.stance == Stance::Standing && request.rotation_mode != RotationMode::Aiming;
    match wanted {
        Gait::Sprinting if upright && sprint_enabled && request.can_sprint => Gait::Sprinting,
        wanted => wanted.capped_at(Gait::Running),
    }
}

/// Third/first person character.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThirdPersonLocomotion {
    pub sprint_enabled: bool,
    /// Ceiling used for every request instead of the desired gait.
    /// `None` follows the desired gait, so a walk request caps at walking;
    /// `Some(Gait::Running)` allows running whatever the input asks for.
    pub fixed_gait: Option<Gait>,
    pub gait_hysteresis: f32,
}

impl Default for ThirdPersonLocomotion {
    fn default() -> Self {
        Self {
            sprint_enabled: false,
            fixed_gait: None,
            gait_hysteresis: DEFAULT_GAIT_HYSTERESIS,
        }
    }
}

impl LocomotionPolicy for ThirdPersonLocomotion {
    fn allowed_gait(&self, request: GaitRequest) -> Gait {
        let wanted = self.fixed_gait.unwrap_or(request.desired_gait);
        standard_allowed_gait(request, wanted, self.sprint_enabled)
    }

    fn gait_hysteresis(&self) -> f32 {
        self.gait_hysteresis
    }
}

/// Top-down character: same gait rules, always viewed in third person.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TopDownLocomotion {
    pub base: ThirdPersonLocomotion,
}

impl LocomotionPolicy for TopDownLocomotion {
    fn allowed_gait(&self, request: GaitRequest) -> Gait {
        self.base.allowed_gait(request)
    }

    fn gait_hysteresis(&self) -> f32 {
        self.base.gait_hysteresis
    }

    fn locked_view_mode(&self) -> Option<ViewMode> {
        Some(ViewMode::ThirdPerson)
    }
}

/// Animation curve values sampled from the animation graph this frame.
pub trait AnimCurves {
    /// Yaw offset applied to the looking-direction rotation target.
    fn yaw_offset(&self) -> f32;

    /// Turn-in-place rotation per 1/30 s.
    fn rotation_amount(&self) -> f32;
}

/// No animation graph attached; every curve reads zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCurves;

impl AnimCurves for NoCurves {
    fn yaw_offset(&self) -> f32 {
        0.0
    }

    fn rotation_amount(&self) -> f32 {
        0.0
    }
}

/// Fixed curve values, handy for hosts that sample curves elsewhere.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CurveSample {
    pub yaw_offset: f32,
    pub rotation_amount: f32,
}

impl AnimCurves for CurveSample {
    fn yaw_offset(&self) -> f32 {
        self.yaw_offset
    }

    fn rotation_amount(&self) -> f32 {
        self.rotation_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(desired_gait: Gait, rotation_mode: RotationMode) -> GaitRequest {
        GaitRequest {
            desired_gait,
            stance: Stance::Standing,
            rotation_mode,
            can_sprint: true,
        }
    }

    #[test]
    fn sprint_is_disabled_by_default() {
        let policy = ThirdPersonLocomotion::default();
        assert_eq!(
            policy.allowed_gait(request(Gait::Sprinting, RotationMode::LookingDirection)),
            Gait::Running
        );
        assert_eq!(
            policy.allowed_gait(request(Gait::Walking, RotationMode::LookingDirection)),
            Gait::Walking
        );
    }

    #[test]
    fn enabled_sprint_still_respects_stance_and_aiming() {
        let policy = ThirdPersonLocomotion {
            sprint_enabled: true,
            ..Default::default()
        };
        assert_eq!(
            policy.allowed_gait(request(Gait::Sprinting, RotationMode::VelocityDirection)),
            Gait::Sprinting
        );
        assert_eq!(
            policy.allowed_gait(request(Gait::Sprinting, RotationMode::Aiming)),
            Gait::Running
        );
        let crouched = GaitRequest {
            stance: Stance::Crouching,
            ..request(Gait::Sprinting, RotationMode::VelocityDirection)
        };
        assert_eq!(policy.allowed_gait(crouched), Gait::Running);
        let ineligible = GaitRequest {
            can_sprint: false,
            ..request(Gait::Sprinting, RotationMode::VelocityDirection)
        };
        assert_eq!(policy.allowed_gait(ineligible), Gait::Running);
    }

    #[test]
    fn fixed_gait_ignores_the_desired_gait() {
        let policy = ThirdPersonLocomotion {
            fixed_gait: Some(Gait::Running),
            ..Default::default()
        };
        for desired in [Gait::Walking, Gait::Running, Gait::Sprinting] {
            assert_eq!(
                policy.allowed_gait(request(desired, RotationMode::LookingDirection)),
                Gait::Running
            );
        }

        let top_down = TopDownLocomotion { base: policy };
        assert_eq!(
            top_down.allowed_gait(request(Gait::Walking, RotationMode::Aiming)),
            Gait::Running
        );
    }

    #[test]
    fn top_down_locks_third_person() {
        assert_eq!(
            TopDownLocomotion::default().locked_view_mode(),
            Some(ViewMode::ThirdPerson)
        );
    }
}
