//! Projectile kinematics and explosion falloff.
//!
//! Projectiles are authority-only: the owning client asks for a launch, the
//! authority integrates the projectile and resolves its explosion.

use glam::Vec3;

use crate::collision::{CollisionQuery, Hit};
use crate::ids::{CharacterId, ProjectileId, WeaponId};

/// Tunables for projectiles launched by a weapon.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProjectileConfig {
    /// Initial speed along the launch direction (units per second).
    pub speed: f32,
    /// Seconds before the projectile expires without exploding.
    pub lifespan: f32,
    /// Collision radius of the projectile body.
    pub radius: f32,
    /// Damage at the explosion centre.
    pub explosion_damage: f32,
    /// Radius within which explosion damage is applied.
    pub explosion_radius: f32,
    /// Multiplier on world gravity; `0` flies straight.
    pub gravity_scale: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 2000.0,
            lifespan: 10.0,
            radius: 5.0,
            explosion_damage: 100.0,
            explosion_radius: 300.0,
            gravity_scale: 0.0,
        }
    }
}

/// World gravity along Z, in units per second squared.
pub const GRAVITY_Z: f32 = -980.0;

/// A live projectile.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub id: ProjectileId,
    pub instigator: Option<CharacterId>,
    pub weapon: WeaponId,
    pub location: Vec3,
    pub velocity: Vec3,
    pub remaining_life: f32,
    pub config: ProjectileConfig,
}

/// Result of advancing a projectile by one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectileStep {
    /// Still flying.
    Flying,
    /// Hit something and exploded at `hit.location`.
    Exploded(Hit),
    /// Lifespan ran out in mid-air.
    Expired,
}

impl Projectile {
    /// Launches a projectile from `origin` along `direction` (normalised here).
    pub fn launch(
        id: ProjectileId,
        instigator: Option<CharacterId>,
        weapon: WeaponId,
        origin: Vec3,
        direction: Vec3,
        config: ProjectileConfig,
    ) -> Self {
        let velocity = direction.normalize_or_zero() * config.speed;
        Self {
            id,
            instigator,
            weapon,
            location: origin,
            velocity,
            remaining_life: config.lifespan,
            config,
        }
    }

    /// Integrates `dt` seconds and sweeps the travelled segment.
    pub fn step(&mut self, dt: f32, world: &dyn CollisionQuery) -> ProjectileStep {
        if self.remaining_life <= 0.0 {
            return ProjectileStep::Expired;
        }
        let start = self.location;
        self.velocity.z += GRAVITY_Z * self.config.gravity_scale * dt;
        let end = start + self.velocity * dt;

        if let Some(hit) = world.sweep_sphere(start, end, self.config.radius, self.instigator) {
            self.location = hit.location;
            self.remaining_life = 0.0;
            return ProjectileStep::Exploded(hit);
        }

        self.location = end;
        self.remaining_life -= dt;
        if self.remaining_life <= 0.0 {
            ProjectileStep::Expired
        } else {
            ProjectileStep::Flying
        }
    }
}

/// Explosion damage at `target` with linear falloff to zero at `radius`.
pub fn radial_damage(center: Vec3, radius: f32, base_damage: f32, target: Vec3) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    let distance = center.distance(target);
    if distance >= radius {
        return 0.0;
    }
    base_damage * (1.0 - distance / radius)
}
