use glam::{Mat4, Vec3};

use crate::math::AABB;

/// Static box the player cannot enter
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub bounds: AABB,
    /// Owning object, only used for logging
    pub label: String,
}

impl Collider {
    pub fn new(bounds: AABB, label: impl Into<String>) -> Self {
        Self {
            bounds,
            label: label.into(),
        }
    }

    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            bounds: self.bounds.transformed(matrix),
            label: self.label.clone(),
        }
    }
}

/// First collider overlapping `bounds`, in slice order
pub fn first_intersection<'a>(bounds: &AABB, colliders: &'a [Collider]) -> Option<&'a Collider> {
    colliders.iter().find(|collider| bounds.intersects(&collider.bounds))
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollisionOutcome {
    Clear,
    /// The move was rejected; the camera must go back to `restored`
    Blocked { label: String, restored: Vec3 },
}

/// Collision volume that follows the camera
#[derive(Debug, Clone)]
pub struct Player {
    position: Vec3,
    half_extents: Vec3,
}

impl Player {
    pub const DEFAULT_SIZE: Vec3 = Vec3::new(1.0, 4.0, 1.0);

    pub fn new(position: Vec3) -> Self {
        Self::with_size(position, Self::DEFAULT_SIZE)
    }

    pub fn with_size(position: Vec3, size: Vec3) -> Self {
        Self {
            position,
            half_extents: size * 0.5,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    pub fn bounds(&self) -> AABB {
        AABB::new(self.position - self.half_extents, self.position + self.half_extents)
    }

    /// Moves without any collision check (spawning, scene switches)
    pub fn teleport(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Follows the camera to `camera_position` unless that overlaps a collider.
    ///
    /// On overlap the player stays where it was and the outcome carries that
    /// position so the caller can put the camera back. A collider the player
    /// was already inside (a model that loaded on top of it) only blocks
    /// moves that push deeper into it, so the player can always walk out.
    pub fn update(&mut self, camera_position: Vec3, colliders: &[Collider]) -> CollisionOutcome {
        let previous = self.position;
        let previous_bounds = self.bounds();
        self.position = camera_position;
        let bounds = self.bounds();

        let hit = colliders.iter().find(|collider| {
            bounds.intersects(&collider.bounds) && !leaves(&previous_bounds, &bounds, &collider.bounds)
        });

        match hit {
            Some(hit) => {
                log::debug!(
                    "Collision with {} at {:?}, restoring {:?}",
                    hit.label,
                    camera_position,
                    previous
                );
                self.position = previous;
                CollisionOutcome::Blocked {
                    label: hit.label.clone(),
                    restored: previous,
                }
            }
            None => CollisionOutcome::Clear,
        }
    }
}

/// True when the player started inside `collider` and the move does not
/// deepen the overlap
fn leaves(previous: &AABB, next: &AABB, collider: &AABB) -> bool {
    let before = previous.overlap_volume(collider);
    before > 0.0 && next.overlap_volume(collider) <= before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_at_z(z: f32) -> Collider {
        Collider::new(
            AABB::new(Vec3::new(-100.0, 0.0, z - 0.5), Vec3::new(100.0, 100.0, z + 0.5)),
            "wall",
        )
    }

    #[test]
    fn free_movement_is_clear() {
        let mut player = Player::new(Vec3::new(0.0, 25.0, 10.0));
        let colliders = [wall_at_z(-100.0)];

        let outcome = player.update(Vec3::new(0.0, 25.0, 9.0), &colliders);
        assert_eq!(outcome, CollisionOutcome::Clear);
        assert_eq!(player.position(), Vec3::new(0.0, 25.0, 9.0));
    }

    #[test]
    fn blocked_movement_restores_previous_position() {
        let start = Vec3::new(0.0, 25.0, -98.0);
        let mut player = Player::new(start);
        let colliders = [wall_at_z(-100.0)];

        let outcome = player.update(Vec3::new(0.0, 25.0, -99.2), &colliders);
        assert_eq!(
            outcome,
            CollisionOutcome::Blocked {
                label: "wall".to_string(),
                restored: start
            }
        );
        assert_eq!(player.position(), start);
    }

    #[test]
    fn touching_counts_as_collision() {
        let mut player = Player::new(Vec3::ZERO);
        // Player box spans z in [-0.5, 0.5]; wall starts exactly at 0.5
        let colliders = [Collider::new(
            AABB::new(Vec3::new(-10.0, -10.0, 0.5), Vec3::new(10.0, 10.0, 1.0)),
            "edge",
        )];
        assert!(matches!(
            player.update(Vec3::ZERO, &colliders),
            CollisionOutcome::Blocked { .. }
        ));
    }

    #[test]
    fn collider_appearing_around_the_player_lets_it_out() {
        let mut player = Player::new(Vec3::new(0.0, 25.0, 0.0));
        let statue = [Collider::new(
            AABB::from_center_size(Vec3::new(0.0, 25.0, 0.0), Vec3::new(10.0, 50.0, 10.0)),
            "statue",
        )];

        // Fully inside: the overlap stays the same while crossing
        assert_eq!(player.update(Vec3::new(0.0, 25.0, -1.0), &statue), CollisionOutcome::Clear);
        // Leaving through the face shrinks it
        assert_eq!(player.update(Vec3::new(0.0, 25.0, -5.2), &statue), CollisionOutcome::Clear);
        assert_eq!(player.update(Vec3::new(0.0, 25.0, -6.0), &statue), CollisionOutcome::Clear);
        assert_eq!(player.position(), Vec3::new(0.0, 25.0, -6.0));

        // Once out, the statue is solid again
        assert!(matches!(
            player.update(Vec3::new(0.0, 25.0, -5.2), &statue),
            CollisionOutcome::Blocked { .. }
        ));
    }

    #[test]
    fn partial_overlap_blocks_moving_deeper() {
        // Player box spans z in [-0.5, 0.5]; the box reaches in to z = 0.2
        let start = Vec3::ZERO;
        let mut player = Player::new(start);
        let colliders = [Collider::new(
            AABB::new(Vec3::new(-10.0, -10.0, 0.2), Vec3::new(10.0, 10.0, 5.0)),
            "sofa",
        )];

        assert!(matches!(
            player.update(Vec3::new(0.0, 0.0, 0.1), &colliders),
            CollisionOutcome::Blocked { .. }
        ));
        assert_eq!(player.position(), start);
        assert_eq!(player.update(Vec3::new(0.0, 0.0, -0.1), &colliders), CollisionOutcome::Clear);
    }

    #[test]
    fn first_hit_wins() {
        let colliders = [
            Collider::new(AABB::new(Vec3::splat(10.0), Vec3::splat(11.0)), "far"),
            Collider::new(AABB::new(Vec3::splat(-1.0), Vec3::splat(1.0)), "a"),
            Collider::new(AABB::new(Vec3::splat(-2.0), Vec3::splat(2.0)), "b"),
        ];
        let query = AABB::from_center_size(Vec3::ZERO, Vec3::ONE);
        assert_eq!(first_intersection(&query, &colliders).unwrap().label, "a");
    }

    #[test]
    fn transformed_collider_moves_with_room() {
        let collider = wall_at_z(-100.0);
        let moved = collider.transformed(&Mat4::from_translation(Vec3::new(-202.0, 0.0, 140.5)));
        assert_eq!(moved.bounds.min, Vec3::new(-302.0, 0.0, 40.0));
        assert_eq!(moved.label, "wall");
    }
}
