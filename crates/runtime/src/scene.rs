//! Static level geometry plus the authority's characters, as one collision
//! world.

use glam::Vec3;

use gameplay_core::collision::{segment_aabb_enter_t, segment_sphere_enter_t};
use gameplay_core::{CharacterId, CollisionQuery, Hit};

/// Radius of the sphere standing in for a character body.
pub const CHARACTER_RADIUS: f32 = 40.0;

/// Axis-aligned box that blocks sweeps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blocker {
    pub min: Vec3,
    pub max: Vec3,
}

impl Blocker {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }
}

/// Level geometry that never moves.
#[derive(Debug, Clone, Default)]
pub struct StaticScene {
    blockers: Vec<Blocker>,
}

impl StaticScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_blocker(&mut self, blocker: Blocker) {
        self.blockers.push(blocker);
    }

    pub fn blockers(&self) -> &[Blocker] {
        &self.blockers
    }

    /// The scene together with character bodies at the given locations.
    pub fn with_characters<'a>(&'a self, characters: &'a [(CharacterId, Vec3)]) -> SceneQuery<'a> {
        SceneQuery {
            scene: self,
            characters,
        }
    }
}

impl CollisionQuery for StaticScene {
    fn sweep_sphere(
        &self,
        start: Vec3,
        end: Vec3,
        radius: f32,
        ignore: Option<CharacterId>,
    ) -> Option<Hit> {
        self.with_characters(&[]).sweep_sphere(start, end, radius, ignore)
    }
}

/// Borrowed view used for one frame of queries.
#[derive(Debug, Clone, Copy)]
pub struct SceneQuery<'a> {
    scene: &'a StaticScene,
    characters: &'a [(CharacterId, Vec3)],
}

impl CollisionQuery for SceneQuery<'_> {
    fn sweep_sphere(
        &self,
        start: Vec3,
        end: Vec3,
        radius: f32,
        ignore: Option<CharacterId>,
    ) -> Option<Hit> {
        let mut best: Option<(f32, Option<CharacterId>)> = None;
        let inflate = Vec3::splat(radius.max(0.0));

        // Sphere vs box is approximated by a segment against the inflated box.
        for blocker in &self.scene.blockers {
            if let Some(t) =
                segment_aabb_enter_t(start, end, blocker.min - inflate, blocker.max + inflate)
            {
                if best.is_none_or(|(best_t, _)| t < best_t) {
                    best = Some((t, None));
                }
            }
        }

        for (id, center) in self.characters {
            if Some(*id) == ignore {
                continue;
            }
            if let Some(t) = segment_sphere_enter_t(start, end, *center, CHARACTER_RADIUS + radius) {
                if best.is_none_or(|(best_t, _)| t < best_t) {
                    best = Some((t, Some(*id)));
                }
            }
        }

        best.map(|(time, character)| Hit {
            time,
            location: start + (end - start) * time,
            character,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn nearest_hit_wins() {
        let mut scene = StaticScene::new();
        scene.add_blocker(Blocker::new(Vec3::new(500.0, -50.0, -50.0), Vec3::new(600.0, 50.0, 50.0)));
        let characters = [(CharacterId(2), Vec3::new(300.0, 0.0, 0.0))];
        let query = scene.with_characters(&characters);

        let hit = query
            .sweep_sphere(Vec3::ZERO, Vec3::new(1000.0, 0.0, 0.0), 0.0, None)
            .unwrap();
        assert_eq!(hit.character, Some(CharacterId(2)));
        assert_abs_diff_eq!(hit.location.x, 300.0 - CHARACTER_RADIUS, epsilon = 1e-3);

        let past = query
            .sweep_sphere(Vec3::ZERO, Vec3::new(1000.0, 0.0, 0.0), 0.0, Some(CharacterId(2)))
            .unwrap();
        assert_eq!(past.character, None);
        assert_abs_diff_eq!(past.location.x, 500.0, epsilon = 1e-3);
    }

    #[test]
    fn sweep_radius_inflates_blockers() {
        let mut scene = StaticScene::new();
        scene.add_blocker(Blocker::new(Vec3::new(100.0, 20.0, -10.0), Vec3::new(200.0, 40.0, 10.0)));
        let start = Vec3::ZERO;
        let end = Vec3::new(300.0, 0.0, 0.0);
        assert!(scene.sweep_sphere(start, end, 5.0, None).is_none());
        assert!(scene.sweep_sphere(start, end, 25.0, None).is_some());
    }
}
