//! Speed and rotation tuning per rotation mode and stance.

use crate::curve::FloatCurve;

use super::types::{Gait, RotationMode, Stance};

/// Gait speeds and the grounded rotation-rate curve for one mode/stance pair.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementSettings {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub sprint_speed: f32,
    /// Rotation rate over mapped speed (`0` still .. `3` sprinting).
    pub rotation_rate_curve: FloatCurve,
}

impl MovementSettings {
    pub fn new(walk_speed: f32, run_speed: f32, sprint_speed: f32) -> Self {
        Self {
            walk_speed,
            run_speed,
            sprint_speed,
            rotation_rate_curve: default_rotation_rate_curve(),
        }
    }

    /// Maximum speed the movement component allows at `gait`.
    pub fn speed_for_gait(&self, gait: Gait) -> f32 {
        match gait {
            Gait::Walking => self.walk_speed,
            Gait::Running => self.run_speed,
            Gait::Sprinting => self.sprint_speed,
        }
    }
}

fn default_rotation_rate_curve() -> FloatCurve {
    FloatCurve::new([(0.0, 5.0), (1.0, 10.0), (2.0, 15.0), (3.0, 20.0)])
}

/// Standing and crouching settings for one rotation mode.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StanceSettings {
    pub standing: MovementSettings,
    pub crouching: MovementSettings,
}

impl StanceSettings {
    pub fn for_stance(&self, stance: Stance) -> &MovementSettings {
        match stance {
            Stance::Standing => &self.standing,
            Stance::Crouching => &self.crouching,
        }
    }
}

/// The full movement settings table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementSettingsTable {
    pub velocity_direction: StanceSettings,
    pub looking_direction: StanceSettings,
    pub aiming: StanceSettings,
}

impl MovementSettingsTable {
    pub fn get(&self, rotation_mode: RotationMode, stance: Stance) -> &MovementSettings {
        let by_mode = match rotation_mode {
            RotationMode::VelocityDirection => &self.velocity_direction,
            RotationMode::LookingDirection => &self.looking_direction,
            RotationMode::Aiming => &self.aiming,
        };
        by_mode.for_stance(stance)
    }
}

impl Default for MovementSettingsTable {
    fn default() -> Self {
        let normal = StanceSettings {
            standing: MovementSettings::new(165.0, 350.0, 600.0),
            crouching: MovementSettings::new(150.0, 200.0, 300.0),
        };
        Self {
            velocity_direction: normal.clone(),
            looking_direction: normal,
            aiming: StanceSettings {
                standing: MovementSettings::new(165.0, 350.0, 350.0),
                crouching: MovementSettings::new(150.0, 200.0, 200.0),
            },
        }
    }
}
