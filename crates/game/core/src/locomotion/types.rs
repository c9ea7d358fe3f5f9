//! Categorical locomotion states.

macro_rules! locomotion_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(#[default] $default:ident,)?
            $($variant:ident),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            Debug,
            Default,
            PartialEq,
            Eq,
            Hash,
            strum::Display,
            strum::EnumString,
            strum::AsRefStr,
            strum::EnumIter,
        )]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
        #[strum(serialize_all = "snake_case", ascii_case_insensitive)]
        pub enum $name {
            $(#[default] $default,)?
            $($variant),*
        }
    };
}

locomotion_enum! {
    /// Movement speed tier.
    pub enum Gait {
        #[default]
        Walking,
        Running,
        Sprinting,
    }
}

locomotion_enum! {
    /// Coarse physical state of the character.
    pub enum MovementState {
        #[default]
        None,
        Grounded,
        InAir,
        Mantling,
        Ragdoll,
    }
}

locomotion_enum! {
    /// Montage-driven action that overrides normal rotation.
    pub enum MovementAction {
        #[default]
        None,
        LowMantle,
        HighMantle,
        Rolling,
        GettingUp,
    }
}

locomotion_enum! {
    /// What the character's facing follows.
    pub enum RotationMode {
        #[default]
        LookingDirection,
        VelocityDirection,
        Aiming,
    }
}

locomotion_enum! {
    pub enum Stance {
        #[default]
        Standing,
        Crouching,
    }
}

locomotion_enum! {
    pub enum ViewMode {
        #[default]
        ThirdPerson,
        FirstPerson,
    }
}

locomotion_enum! {
    /// Upper-body pose layered over locomotion (carried item or mood).
    pub enum OverlayState {
        #[default]
        Default,
        Masculine,
        Feminine,
        Injured,
        HandsTied,
        Rifle,
        PistolOneHanded,
        PistolTwoHanded,
        Bow,
        Torch,
        Binoculars,
        Box,
        Barrel,
    }
}

impl OverlayState {
    /// Overlays that hold a firearm; switching to one equips inventory slot 0.
    pub const fn is_weapon_overlay(self) -> bool {
        matches!(
            self,
            Self::Rifle | Self::PistolOneHanded | Self::PistolTwoHanded
        )
    }
}

impl Gait {
    /// Caps this gait at `ceiling` (Walking < Running < Sprinting).
    pub fn capped_at(self, ceiling: Gait) -> Gait {
        if (self as u8) > (ceiling as u8) {
            ceiling
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn weapon_overlays_are_firearms_only() {
        let weapons: Vec<_> = OverlayState::iter()
            .filter(|o| o.is_weapon_overlay())
            .collect();
        assert_eq!(
            weapons,
            vec![
                OverlayState::Rifle,
                OverlayState::PistolOneHanded,
                OverlayState::PistolTwoHanded
            ]
        );
    }

    #[test]
    fn names_round_trip_through_strum() {
        assert_eq!(Gait::from_str("sprinting").unwrap(), Gait::Sprinting);
        assert_eq!(OverlayState::PistolTwoHanded.to_string(), "pistol_two_handed");
    }

    #[test]
    fn capped_gait_never_exceeds_ceiling() {
        assert_eq!(Gait::Sprinting.capped_at(Gait::Running), Gait::Running);
        assert_eq!(Gait::Walking.capped_at(Gait::Running), Gait::Walking);
    }
}
