//! Collision queries consumed by the camera and projectile code.
//!
//! The host world implements [`CollisionQuery`]; gameplay code only ever asks
//! "what does this swept sphere hit first".

use glam::Vec3;

use crate::ids::CharacterId;

/// First blocking hit of a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    /// Sweep fraction in `[0, 1]` at which the hit occurred.
    pub time: f32,
    /// Location of the sphere centre at the moment of impact.
    pub location: Vec3,
    /// Character that was hit, if the blocker is a character.
    pub character: Option<CharacterId>,
}

/// World geometry queries.
pub trait CollisionQuery {
    /// Sweeps a sphere of `radius` from `start` to `end`, returning the first
    /// blocking hit. `ignore` is excluded from the query.
    fn sweep_sphere(
        &self,
        start: Vec3,
        end: Vec3,
        radius: f32,
        ignore: Option<CharacterId>,
    ) -> Option<Hit>;
}

/// A world with nothing in it.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyWorld;

impl CollisionQuery for EmptyWorld {
    fn sweep_sphere(
        &self,
        _start: Vec3,
        _end: Vec3,
        _radius: f32,
        _ignore: Option<CharacterId>,
    ) -> Option<Hit> {
        None
    }
}

/// Parametric `t` at which segment `[p0, p1]` first enters the AABB
/// `[min, max]`, or `None` if it misses. `t` is in `[0, 1]`.
#[inline]
pub fn segment_aabb_enter_t(p0: Vec3, p1: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let d = p1 - p0;
    let mut tmin = 0.0f32;
    let mut tmax = 1.0f32;
    for i in 0..3 {
        let s = p0[i];
        let dir = d[i];
        if dir.abs() < 1e-6 {
            if s < min[i] || s > max[i] {
                return None;
            }
        } else {
            let inv = 1.0 / dir;
            let mut t0 = (min[i] - s) * inv;
            let mut t1 = (max[i] - s) * inv;
            if t0 > t1 {
                core::mem::swap(&mut t0, &mut t1);
            }
            tmin = tmin.max(t0);
            tmax = tmax.min(t1);
            if tmin > tmax {
                return None;
            }
        }
    }
    Some(tmin)
}

/// Parametric `t` of the first point of segment `[p0, p1]` within `radius`
/// of `center`, or `None`.
#[inline]
pub fn segment_sphere_enter_t(p0: Vec3, p1: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let d = p1 - p0;
    let m = p0 - center;
    let c = m.dot(m) - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let a = d.dot(d);
    if a <= 1e-12 {
        return None;
    }
    let b = m.dot(d);
    if b > 0.0 {
        return None;
    }
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / a;
    (t <= 1.0).then_some(t.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn segment_enters_box_at_face() {
        let t = segment_aabb_enter_t(
            Vec3::new(-2.0, 0.5, 0.5),
            Vec3::new(2.0, 0.5, 0.5),
            Vec3::ZERO,
            Vec3::ONE,
        )
        .unwrap();
        assert_abs_diff_eq!(t, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn segment_misses_box() {
        assert!(
            segment_aabb_enter_t(
                Vec3::new(-2.0, 5.0, 0.5),
                Vec3::new(2.0, 5.0, 0.5),
                Vec3::ZERO,
                Vec3::ONE
            )
            .is_none()
        );
    }

    #[test]
    fn segment_enters_sphere() {
        let t = segment_sphere_enter_t(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0), 1.0)
            .unwrap();
        assert_abs_diff_eq!(t, 0.4, epsilon = 1e-5);
        assert!(
            segment_sphere_enter_t(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0), 1.0)
                .is_none()
        );
    }
}
