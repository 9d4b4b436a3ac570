//! Proximity collision detection
//!
//! The asymmetric "upper-half rectangle plus horizontal band" test probed
//! by missiles and the player ship. Deliberately not full AABB overlap:
//! the vertical bias registers a hit before a missile visually covers its
//! target.

use glam::Vec2;

use super::entity::{Body, Bounded, EntityId};

/// Copied bounds of a matched entity.
///
/// Returned by value so the caller holds no borrow into the registry
/// while it removes the target or spawns an explosion over it.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
}

impl HitRecord {
    fn of(body: &Body) -> Self {
        Self {
            id: body.id,
            pos: body.pos,
            size: body.size,
        }
    }
}

/// True when `probe` sits above the target's vertical midline and within
/// half a width of its horizontal extent.
#[inline]
pub fn probe_hits(probe: Vec2, target: &Body) -> bool {
    probe.y <= target.pos.y + target.size.y / 2.0
        && probe.x >= target.pos.x - target.size.x / 2.0
        && probe.x <= target.pos.x + target.size.x / 2.0
}

/// First candidate (in iteration order) whose bounds match the probe;
/// ties go to the earliest candidate. An empty category yields no match.
pub fn first_hit<'a, T, I>(candidates: I, probe: Vec2) -> Option<HitRecord>
where
    T: Bounded + 'a,
    I: IntoIterator<Item = &'a T>,
{
    candidates
        .into_iter()
        .map(Bounded::body)
        .find(|body| probe_hits(probe, body))
        .map(HitRecord::of)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EnemyShip;

    fn enemy(id: u32, x: f32, y: f32, w: f32, h: f32) -> EnemyShip {
        let mut enemy = EnemyShip::at(EntityId(id), x);
        enemy.body.pos = Vec2::new(x, y);
        enemy.body.size = Vec2::new(w, h);
        enemy
    }

    #[test]
    fn probe_inside_the_band_and_upper_half_matches() {
        // Enemy bounding box x in [480, 520], y in [190, 230].
        let targets = vec![enemy(1, 480.0, 190.0, 40.0, 40.0)];
        let hit = first_hit(&targets, Vec2::new(500.0, 200.0)).expect("should hit");
        assert_eq!(hit.id, EntityId(1));
        assert_eq!(hit.pos, Vec2::new(480.0, 190.0));
    }

    #[test]
    fn probe_below_the_midline_misses() {
        let targets = vec![enemy(1, 480.0, 190.0, 40.0, 40.0)];
        assert!(first_hit(&targets, Vec2::new(500.0, 400.0)).is_none());
    }

    #[test]
    fn band_edges_are_inclusive() {
        let target = enemy(1, 480.0, 190.0, 40.0, 40.0);
        // Half a width beyond either edge still matches.
        assert!(probe_hits(Vec2::new(460.0, 200.0), &target.body));
        assert!(probe_hits(Vec2::new(520.0, 200.0), &target.body));
        assert!(!probe_hits(Vec2::new(459.9, 200.0), &target.body));
        assert!(!probe_hits(Vec2::new(520.1, 200.0), &target.body));
    }

    #[test]
    fn empty_category_yields_no_match() {
        let targets: Vec<EnemyShip> = Vec::new();
        assert!(first_hit(&targets, Vec2::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn ties_resolve_to_the_first_in_iteration_order() {
        let targets = vec![
            enemy(7, 480.0, 190.0, 40.0, 40.0),
            enemy(9, 480.0, 190.0, 40.0, 40.0),
        ];
        let hit = first_hit(&targets, Vec2::new(500.0, 200.0)).unwrap();
        assert_eq!(hit.id, EntityId(7));
    }
}
