//! Authoritative projectile integration and explosion resolution.

use glam::Vec3;

use gameplay_core::{
    CharacterId, CollisionQuery, IdAllocator, Projectile, ProjectileConfig, ProjectileId,
    ProjectileStep, WeaponId, radial_damage,
};

/// What happened to a projectile this step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileOutcome {
    Exploded {
        projectile: ProjectileId,
        instigator: Option<CharacterId>,
        location: Vec3,
        struck: Option<CharacterId>,
        damage: f32,
        radius: f32,
    },
    Expired {
        projectile: ProjectileId,
    },
}

impl ProjectileOutcome {
    /// Damage this outcome deals to a body at `target`.
    pub fn damage_at(&self, target: Vec3) -> f32 {
        match *self {
            Self::Exploded {
                location,
                damage,
                radius,
                ..
            } => radial_damage(location, radius, damage, target),
            Self::Expired { .. } => 0.0,
        }
    }
}

/// Live projectiles on the authority.
#[derive(Debug, Default)]
pub struct ProjectileSystem {
    projectiles: Vec<Projectile>,
}

impl ProjectileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launch(
        &mut self,
        ids: &mut IdAllocator,
        instigator: Option<CharacterId>,
        weapon: WeaponId,
        origin: Vec3,
        direction: Vec3,
        config: ProjectileConfig,
    ) -> ProjectileId {
        let id = ids.next_projectile();
        self.projectiles
            .push(Projectile::launch(id, instigator, weapon, origin, direction, config));
        tracing::debug!(target: "runtime::projectiles", %id, ?origin, ?direction, "launched");
        id
    }

    /// Integrates every projectile by `dt` and removes the ones that ended.
    pub fn step(&mut self, dt: f32, world: &dyn CollisionQuery) -> Vec<ProjectileOutcome> {
        let mut outcomes = Vec::new();
        self.projectiles.retain_mut(|projectile| match projectile.step(dt, world) {
            ProjectileStep::Flying => true,
            ProjectileStep::Exploded(hit) => {
                tracing::debug!(
                    target: "runtime::projectiles",
                    id = %projectile.id,
                    location = ?hit.location,
                    struck = ?hit.character,
                    "exploded"
                );
                outcomes.push(ProjectileOutcome::Exploded {
                    projectile: projectile.id,
                    instigator: projectile.instigator,
                    location: hit.location,
                    struck: hit.character,
                    damage: projectile.config.explosion_damage,
                    radius: projectile.config.explosion_radius,
                });
                false
            }
            ProjectileStep::Expired => {
                outcomes.push(ProjectileOutcome::Expired {
                    projectile: projectile.id,
                });
                false
            }
        });
        outcomes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }
}
