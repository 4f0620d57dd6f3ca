//! Tests for CollisionWorld queries.

#[cfg(test)]
mod tests {
    use crate::components::{ColliderShape, LAYER_ENEMY, LAYER_OBSTACLE, LAYER_PLAYER};
    use crate::physics::{CollisionQuery, CollisionWorld};
    use bevy::prelude::*;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    fn circle(radius: f32) -> ColliderShape {
        ColliderShape::Circle { radius }
    }

    #[test]
    fn test_overlap_circle_respects_mask_and_orders_by_distance() {
        let mut world = CollisionWorld::new();
        world.insert(entity(1), Vec2::new(3.0, 0.0), circle(0.5), LAYER_ENEMY);
        world.insert(entity(2), Vec2::new(1.0, 0.0), circle(0.5), LAYER_ENEMY);
        world.insert(entity(3), Vec2::new(0.5, 0.0), circle(0.5), LAYER_PLAYER);
        world.insert(entity(4), Vec2::new(10.0, 0.0), circle(0.5), LAYER_ENEMY);

        let hits = world.overlap_circle(Vec2::ZERO, 3.0, LAYER_ENEMY);
        assert_eq!(hits, vec![entity(2), entity(1)]);

        let both = world.overlap_circle(Vec2::ZERO, 3.0, LAYER_ENEMY | LAYER_PLAYER);
        assert_eq!(both, vec![entity(3), entity(2), entity(1)]);
    }

    #[test]
    fn test_equal_distance_ordered_by_index() {
        let mut world = CollisionWorld::new();
        world.insert(entity(7), Vec2::new(-1.0, 0.0), circle(0.25), LAYER_ENEMY);
        world.insert(entity(5), Vec2::new(1.0, 0.0), circle(0.25), LAYER_ENEMY);

        let hits = world.overlap_circle(Vec2::ZERO, 2.0, LAYER_ENEMY);
        assert_eq!(hits, vec![entity(5), entity(7)]);
    }

    #[test]
    fn test_overlap_box_hits_rect_and_circle() {
        let mut world = CollisionWorld::new();
        world.insert(
            entity(1),
            Vec2::new(2.0, 0.0),
            ColliderShape::Rect {
                half_size: Vec2::splat(0.5),
            },
            LAYER_ENEMY,
        );
        world.insert(entity(2), Vec2::new(0.0, 1.5), circle(0.75), LAYER_ENEMY);
        world.insert(entity(3), Vec2::new(0.0, -5.0), circle(0.5), LAYER_ENEMY);

        let hits = world.overlap_box(Vec2::ZERO, Vec2::new(1.75, 1.0), LAYER_ENEMY);
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&entity(1)));
        assert!(hits.contains(&entity(2)));
    }

    #[test]
    fn test_box_cast_sweeps_along_direction() {
        let mut world = CollisionWorld::new();
        world.insert(entity(1), Vec2::new(4.0, 0.0), circle(0.5), LAYER_ENEMY);
        world.insert(entity(2), Vec2::new(-4.0, 0.0), circle(0.5), LAYER_ENEMY);
        world.insert(entity(3), Vec2::new(9.0, 0.0), circle(0.5), LAYER_ENEMY);

        let right = world.box_cast(Vec2::ZERO, Vec2::splat(0.5), Vec2::X, 5.0, LAYER_ENEMY);
        assert_eq!(right, vec![entity(1)]);

        let left = world.box_cast(Vec2::ZERO, Vec2::splat(0.5), Vec2::NEG_X, 5.0, LAYER_ENEMY);
        assert_eq!(left, vec![entity(2)]);
    }

    #[test]
    fn test_box_cast_includes_initial_overlap_and_zero_direction() {
        let mut world = CollisionWorld::new();
        world.insert(entity(1), Vec2::new(0.25, 0.0), circle(0.5), LAYER_ENEMY);

        let hits = world.box_cast(Vec2::ZERO, Vec2::splat(0.5), Vec2::X, 5.0, LAYER_ENEMY);
        assert_eq!(hits, vec![entity(1)]);

        let hits = world.box_cast(Vec2::ZERO, Vec2::splat(0.5), Vec2::ZERO, 5.0, LAYER_ENEMY);
        assert_eq!(hits, vec![entity(1)]);
    }

    #[test]
    fn test_line_of_sight_blocked_by_obstacle_only() {
        let mut world = CollisionWorld::new();
        world.insert(
            entity(1),
            Vec2::new(2.0, 0.0),
            ColliderShape::Rect {
                half_size: Vec2::new(0.5, 2.0),
            },
            LAYER_OBSTACLE,
        );
        world.insert(entity(2), Vec2::new(2.0, 4.0), circle(0.5), LAYER_ENEMY);

        assert!(!world.line_of_sight(Vec2::ZERO, Vec2::new(4.0, 0.0), LAYER_OBSTACLE));
        // Enemy на пути: не obstacle
        assert!(world.line_of_sight(Vec2::new(0.0, 4.0), Vec2::new(4.0, 4.0), LAYER_OBSTACLE));
        // Obstacle за целью не мешает
        assert!(world.line_of_sight(Vec2::ZERO, Vec2::new(1.0, 0.0), LAYER_OBSTACLE));
        assert!(world.line_of_sight(Vec2::ONE, Vec2::ONE, LAYER_OBSTACLE));
    }

    #[test]
    fn test_insert_replaces_and_position_of() {
        let mut world = CollisionWorld::new();
        world.insert(entity(1), Vec2::ZERO, circle(0.5), LAYER_ENEMY);
        world.insert(entity(1), Vec2::new(3.0, 1.0), circle(0.5), LAYER_ENEMY);

        assert_eq!(world.len(), 1);
        assert_eq!(world.position_of(entity(1)), Some(Vec2::new(3.0, 1.0)));
        assert_eq!(world.position_of(entity(9)), None);
    }
}
