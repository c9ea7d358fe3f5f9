//! Rotation types and interpolation helpers used by locomotion and camera code.
mod interp;
mod rotator;

pub use interp::{
    KINDA_SMALL_NUMBER, SMALL_NUMBER, f_interp_to, interp_ease_in, interp_ease_out, lerp,
    mapped_range_clamped, r_interp_constant_to, r_interp_to, range_pct, v_interp_to,
};
pub use rotator::{Rotator, Transform};
