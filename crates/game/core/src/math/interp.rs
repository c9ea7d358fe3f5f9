//! Frame-rate aware interpolators and easing helpers.

use glam::Vec3;

use super::Rotator;

pub const SMALL_NUMBER: f32 = 1.0e-8;
pub const KINDA_SMALL_NUMBER: f32 = 1.0e-4;

#[inline]
pub fn lerp(a: f32, b: f32, alpha: f32) -> f32 {
    a + (b - a) * alpha
}

/// Exponential approach of `current` toward `target`.
///
/// Non-positive speed snaps to the target.
pub fn f_interp_to(current: f32, target: f32, delta_time: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }
    let dist = target - current;
    if dist * dist < SMALL_NUMBER {
        return target;
    }
    current + dist * (delta_time * speed).clamp(0.0, 1.0)
}

/// Vector variant of [`f_interp_to`].
pub fn v_interp_to(current: Vec3, target: Vec3, delta_time: f32, speed: f32) -> Vec3 {
    if speed <= 0.0 {
        return target;
    }
    let dist = target - current;
    if dist.length_squared() < KINDA_SMALL_NUMBER {
        return target;
    }
    current + dist * (delta_time * speed).clamp(0.0, 1.0)
}

/// Exponential approach between rotations along the shortest path.
pub fn r_interp_to(current: Rotator, target: Rotator, delta_time: f32, speed: f32) -> Rotator {
    if delta_time == 0.0 || current == target {
        return current;
    }
    if speed <= 0.0 {
        return target;
    }
    let delta = (target - current).normalized();
    if delta.is_nearly_zero(KINDA_SMALL_NUMBER) {
        return target;
    }
    (current + delta * (speed * delta_time).clamp(0.0, 1.0)).normalized()
}

/// Constant angular-rate approach; `speed` is in degrees per second.
pub fn r_interp_constant_to(
    current: Rotator,
    target: Rotator,
    delta_time: f32,
    speed: f32,
) -> Rotator {
    if delta_time == 0.0 || current == target {
        return current;
    }
    if speed <= 0.0 {
        return target;
    }
    let step = speed * delta_time;
    let delta = (target - current).normalized();
    Rotator::new(
        current.pitch + delta.pitch.clamp(-step, step),
        current.yaw + delta.yaw.clamp(-step, step),
        current.roll + delta.roll.clamp(-step, step),
    )
    .normalized()
}

/// Fraction of `value` between `min` and `max` (unclamped).
pub fn range_pct(min: f32, max: f32, value: f32) -> f32 {
    let divisor = max - min;
    if divisor.abs() < SMALL_NUMBER {
        return if value >= max { 1.0 } else { 0.0 };
    }
    (value - min) / divisor
}

/// Maps `value` from `input` to `output`, clamping to the output range.
pub fn mapped_range_clamped(input: (f32, f32), output: (f32, f32), value: f32) -> f32 {
    let pct = range_pct(input.0, input.1, value).clamp(0.0, 1.0);
    lerp(output.0, output.1, pct)
}

pub fn interp_ease_in(a: f32, b: f32, alpha: f32, exponent: f32) -> f32 {
    lerp(a, b, alpha.powf(exponent))
}

pub fn interp_ease_out(a: f32, b: f32, alpha: f32, exponent: f32) -> f32 {
    lerp(a, b, 1.0 - (1.0 - alpha).powf(exponent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn f_interp_to_moves_fraction_of_distance() {
        assert_abs_diff_eq!(f_interp_to(0.0, 10.0, 0.1, 5.0), 5.0);
        assert_abs_diff_eq!(f_interp_to(0.0, 10.0, 1.0, 5.0), 10.0);
        assert_abs_diff_eq!(f_interp_to(3.0, 10.0, 0.1, 0.0), 10.0);
    }

    #[test]
    fn r_interp_constant_to_limits_step() {
        let r = r_interp_constant_to(Rotator::ZERO, Rotator::from_yaw(90.0), 0.1, 100.0);
        assert_abs_diff_eq!(r.yaw, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn r_interp_to_takes_short_way_round() {
        let r = r_interp_to(Rotator::from_yaw(170.0), Rotator::from_yaw(-170.0), 0.1, 5.0);
        assert!(r.yaw > 170.0 || r.yaw < -170.0);
    }

    #[test]
    fn mapped_range_clamps_both_ends() {
        assert_abs_diff_eq!(mapped_range_clamped((0.0, 300.0), (1.0, 3.0), -10.0), 1.0);
        assert_abs_diff_eq!(mapped_range_clamped((0.0, 300.0), (1.0, 3.0), 150.0), 2.0);
        assert_abs_diff_eq!(mapped_range_clamped((0.0, 300.0), (1.0, 3.0), 900.0), 3.0);
    }

    #[test]
    fn ease_in_and_ease_out_mirror_each_other() {
        let slow = interp_ease_in(0.0, 1.0, 0.25, 2.0);
        let fast = interp_ease_out(0.0, 1.0, 0.75, 2.0);
        assert_abs_diff_eq!(slow + fast, 1.0, epsilon = 1e-6);
        assert!(slow < 0.25);
        assert_abs_diff_eq!(interp_ease_in(2.0, 4.0, 1.0, 3.0), 4.0);
    }
}
