use core::ops::{Add, Mul, Neg, Sub};

use glam::Vec3;

/// Euler rotation in degrees.
///
/// Conventions: Z is up, X is forward, positive yaw turns X toward Y and
/// positive pitch lifts the nose toward Z.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotator {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Rotation about the up axis only.
    pub const fn from_yaw(yaw: f32) -> Self {
        Self::new(0.0, yaw, 0.0)
    }

    /// Wraps an angle into `(-180, 180]`.
    pub fn normalize_axis(angle: f32) -> f32 {
        let mut angle = angle % 360.0;
        if angle < 0.0 {
            angle += 360.0;
        }
        if angle > 180.0 {
            angle -= 360.0;
        }
        angle
    }

    /// Returns a copy with every axis wrapped into `(-180, 180]`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::new(
            Self::normalize_axis(self.pitch),
            Self::normalize_axis(self.yaw),
            Self::normalize_axis(self.roll),
        )
    }

    /// Returns only the yaw component.
    #[must_use]
    pub fn yaw_only(self) -> Self {
        Self::from_yaw(self.yaw)
    }

    pub fn is_nearly_zero(self, tolerance: f32) -> bool {
        let n = self.normalized();
        n.pitch.abs() <= tolerance && n.yaw.abs() <= tolerance && n.roll.abs() <= tolerance
    }

    /// Orientation that points the forward axis along `direction`. Roll is zero.
    pub fn from_direction(direction: Vec3) -> Self {
        let yaw = direction.y.atan2(direction.x).to_degrees();
        let planar = (direction.x * direction.x + direction.y * direction.y).sqrt();
        let pitch = direction.z.atan2(planar).to_degrees();
        Self::new(pitch, yaw, 0.0)
    }

    /// Rotation matrix axes as `(forward, right, up)`.
    pub fn axes(self) -> (Vec3, Vec3, Vec3) {
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sr, cr) = self.roll.to_radians().sin_cos();

        let forward = Vec3::new(cp * cy, cp * sy, sp);
        let right = Vec3::new(sr * sp * cy - cr * sy, sr * sp * sy + cr * cy, -sr * cp);
        let up = Vec3::new(-(cr * sp * cy + sr * sy), cy * sr - cr * sp * sy, cr * cp);
        (forward, right, up)
    }

    pub fn forward(self) -> Vec3 {
        self.axes().0
    }

    pub fn right(self) -> Vec3 {
        self.axes().1
    }

    pub fn up(self) -> Vec3 {
        self.axes().2
    }

    /// Transforms a local-space vector into world space.
    pub fn rotate_vector(self, v: Vec3) -> Vec3 {
        let (x, y, z) = self.axes();
        x * v.x + y * v.y + z * v.z
    }

    /// Transforms a world-space vector into this rotation's local space.
    pub fn unrotate_vector(self, v: Vec3) -> Vec3 {
        let (x, y, z) = self.axes();
        Vec3::new(v.dot(x), v.dot(y), v.dot(z))
    }

    /// Interpolates along the shortest path on every axis.
    pub fn lerp_shortest(self, target: Self, alpha: f32) -> Self {
        let delta = (target - self).normalized();
        (self + delta * alpha).normalized()
    }
}

impl Add for Rotator {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.pitch + rhs.pitch, self.yaw + rhs.yaw, self.roll + rhs.roll)
    }
}

impl Sub for Rotator {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.pitch - rhs.pitch, self.yaw - rhs.yaw, self.roll - rhs.roll)
    }
}

impl Mul<f32> for Rotator {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.pitch * rhs, self.yaw * rhs, self.roll * rhs)
    }
}

impl Neg for Rotator {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.pitch, -self.yaw, -self.roll)
    }
}

/// Location plus rotation; scale is always one in this crate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub location: Vec3,
    pub rotation: Rotator,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        location: Vec3::ZERO,
        rotation: Rotator::ZERO,
    };

    pub const fn new(location: Vec3, rotation: Rotator) -> Self {
        Self { location, rotation }
    }

    /// Blends location linearly and rotation along the shortest path.
    pub fn lerp(self, target: Self, alpha: f32) -> Self {
        Self {
            location: self.location.lerp(target.location, alpha),
            rotation: self.rotation.lerp_shortest(target.rotation, alpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normalize_axis_wraps_into_half_open_range() {
        assert_abs_diff_eq!(Rotator::normalize_axis(190.0), -170.0);
        assert_abs_diff_eq!(Rotator::normalize_axis(-190.0), 170.0);
        assert_abs_diff_eq!(Rotator::normalize_axis(180.0), 180.0);
        assert_abs_diff_eq!(Rotator::normalize_axis(-180.0), 180.0);
        assert_abs_diff_eq!(Rotator::normalize_axis(720.0 + 45.0), 45.0);
    }

    #[test]
    fn yaw_rotates_forward_toward_right() {
        let r = Rotator::from_yaw(90.0);
        let v = r.rotate_vector(Vec3::X);
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(v.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn unrotate_inverts_rotate() {
        let r = Rotator::new(20.0, -35.0, 10.0);
        let v = Vec3::new(3.0, -2.0, 5.0);
        let back = r.unrotate_vector(r.rotate_vector(v));
        assert_abs_diff_eq!(back.x, v.x, epsilon = 1e-4);
        assert_abs_diff_eq!(back.y, v.y, epsilon = 1e-4);
        assert_abs_diff_eq!(back.z, v.z, epsilon = 1e-4);
    }

    #[test]
    fn from_direction_matches_forward() {
        let dir = Vec3::new(1.0, 1.0, 0.0).normalize();
        let r = Rotator::from_direction(dir);
        assert_abs_diff_eq!(r.yaw, 45.0, epsilon = 1e-4);
        let f = r.forward();
        assert_abs_diff_eq!(f.dot(dir), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn lerp_shortest_crosses_the_seam() {
        let a = Rotator::from_yaw(170.0);
        let b = Rotator::from_yaw(-170.0);
        let mid = a.lerp_shortest(b, 0.5);
        assert_abs_diff_eq!(mid.yaw.abs(), 180.0, epsilon = 1e-4);
    }
}
