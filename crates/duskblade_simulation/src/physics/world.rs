//! Collision query service
//!
//! Снимок всех включённых коллайдеров, пересобирается в начале каждого тика.
//! Геометрия: `bevy::math::bounding` (BoundingCircle / Aabb2d / ray + aabb casts).
//!
//! Результаты query отсортированы: ближе к началу query → раньше, при равенстве
//! по `Entity::index()` (детерминизм порядка для AI и skill damage).

use bevy::math::bounding::{
    Aabb2d, AabbCast2d, BoundingCircle, IntersectsVolume, RayCast2d,
};
use bevy::prelude::*;

use crate::components::{planar_position, Collider, ColliderShape, CollisionLayers};

/// Физические query, нужные контроллерам
///
/// Контроллеры получают `&impl CollisionQuery`, а не `CollisionWorld` напрямую,
/// поэтому в unit тестах можно подставить snapshot без ECS.
pub trait CollisionQuery {
    /// Все entity на слоях `mask`, пересекающие круг
    fn overlap_circle(&self, center: Vec2, radius: f32, mask: u32) -> Vec<Entity>;

    /// Все entity на слоях `mask`, пересекающие axis-aligned box
    fn overlap_box(&self, center: Vec2, half_size: Vec2, mask: u32) -> Vec<Entity>;

    /// Box протягивается от `origin` вдоль `direction` на `distance`
    ///
    /// Нулевое направление вырождается в `overlap_box`.
    fn box_cast(
        &self,
        origin: Vec2,
        half_size: Vec2,
        direction: Vec2,
        distance: f32,
        mask: u32,
    ) -> Vec<Entity>;

    /// true если отрезок `from → to` не пересекает ни одного obstacle из `obstacle_mask`
    fn line_of_sight(&self, from: Vec2, to: Vec2, obstacle_mask: u32) -> bool;

    fn position_of(&self, entity: Entity) -> Option<Vec2>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEntry {
    pub entity: Entity,
    pub position: Vec2,
    pub shape: ColliderShape,
    pub membership: u32,
}

impl CollisionEntry {
    fn aabb(&self) -> Aabb2d {
        match self.shape {
            ColliderShape::Circle { radius } => Aabb2d::new(self.position, Vec2::splat(radius)),
            ColliderShape::Rect { half_size } => Aabb2d::new(self.position, half_size),
        }
    }

    fn intersects_circle(&self, circle: &BoundingCircle) -> bool {
        match self.shape {
            ColliderShape::Circle { radius } => {
                circle.intersects(&BoundingCircle::new(self.position, radius))
            }
            ColliderShape::Rect { half_size } => {
                circle.intersects(&Aabb2d::new(self.position, half_size))
            }
        }
    }

    fn intersects_aabb(&self, aabb: &Aabb2d) -> bool {
        match self.shape {
            ColliderShape::Circle { radius } => {
                aabb.intersects(&BoundingCircle::new(self.position, radius))
            }
            ColliderShape::Rect { half_size } => aabb.intersects(&Aabb2d::new(self.position, half_size)),
        }
    }

    fn ray_hit(&self, ray: &RayCast2d) -> Option<f32> {
        match self.shape {
            ColliderShape::Circle { radius } => {
                ray.circle_intersection_at(&BoundingCircle::new(self.position, radius))
            }
            ColliderShape::Rect { half_size } => {
                ray.aabb_intersection_at(&Aabb2d::new(self.position, half_size))
            }
        }
    }
}

/// Snapshot коллайдеров текущего тика
#[derive(Resource, Debug, Clone, Default)]
pub struct CollisionWorld {
    entries: Vec<CollisionEntry>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: Entity, position: Vec2, shape: ColliderShape, membership: u32) {
        self.entries.retain(|entry| entry.entity != entity);
        self.entries.push(CollisionEntry {
            entity,
            position,
            shape,
            membership,
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn on_layers(&self, mask: u32) -> impl Iterator<Item = &CollisionEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.membership & mask != 0)
    }

    /// Сортировка по (distance, entity index)
    fn sorted(mut hits: Vec<(f32, Entity)>) -> Vec<Entity> {
        hits.sort_by(|a, b| {
            a.0.total_cmp(&b.0)
                .then_with(|| a.1.index().cmp(&b.1.index()))
        });
        hits.into_iter().map(|(_, entity)| entity).collect()
    }
}

impl CollisionQuery for CollisionWorld {
    fn overlap_circle(&self, center: Vec2, radius: f32, mask: u32) -> Vec<Entity> {
        let circle = BoundingCircle::new(center, radius.max(0.0));
        let hits = self
            .on_layers(mask)
            .filter(|entry| entry.intersects_circle(&circle))
            .map(|entry| (entry.position.distance(center), entry.entity))
            .collect();
        Self::sorted(hits)
    }

    fn overlap_box(&self, center: Vec2, half_size: Vec2, mask: u32) -> Vec<Entity> {
        let aabb = Aabb2d::new(center, half_size.abs());
        let hits = self
            .on_layers(mask)
            .filter(|entry| entry.intersects_aabb(&aabb))
            .map(|entry| (entry.position.distance(center), entry.entity))
            .collect();
        Self::sorted(hits)
    }

    fn box_cast(
        &self,
        origin: Vec2,
        half_size: Vec2,
        direction: Vec2,
        distance: f32,
        mask: u32,
    ) -> Vec<Entity> {
        let Ok(direction) = Dir2::new(direction) else {
            return self.overlap_box(origin, half_size, mask);
        };

        let half_size = half_size.abs();
        let start = Aabb2d::new(origin, half_size);
        // AabbCast2d ждёт box с центром в нуле, origin задаётся отдельно
        let cast = AabbCast2d::new(
            Aabb2d::new(Vec2::ZERO, half_size),
            origin,
            direction,
            distance.max(0.0),
        );

        let hits = self
            .on_layers(mask)
            .filter_map(|entry| {
                if entry.intersects_aabb(&start) {
                    return Some((0.0, entry.entity));
                }
                cast.aabb_collision_at(entry.aabb())
                    .map(|at| (at, entry.entity))
            })
            .collect();
        Self::sorted(hits)
    }

    fn line_of_sight(&self, from: Vec2, to: Vec2, obstacle_mask: u32) -> bool {
        let delta = to - from;
        let length = delta.length();
        let Ok(direction) = Dir2::new(delta) else {
            // from == to
            return true;
        };

        let ray = RayCast2d::new(from, direction, length);
        !self
            .on_layers(obstacle_mask)
            .any(|entry| entry.ray_hit(&ray).is_some())
    }

    fn position_of(&self, entity: Entity) -> Option<Vec2> {
        self.entries
            .iter()
            .find(|entry| entry.entity == entity)
            .map(|entry| entry.position)
    }
}

/// Система: пересборка CollisionWorld из включённых коллайдеров
///
/// Выключенные коллайдеры (мёртвые враги) в snapshot не попадают.
pub fn rebuild_collision_world(
    mut world: ResMut<CollisionWorld>,
    colliders: Query<(Entity, &Transform, &Collider, &CollisionLayers)>,
) {
    world.clear();
    for (entity, transform, collider, layers) in colliders.iter() {
        if !collider.enabled {
            continue;
        }
        world.entries.push(CollisionEntry {
            entity,
            position: planar_position(transform),
            shape: collider.shape,
            membership: layers.membership,
        });
    }
}
