//! Physics: collision queries + движение
//!
//! Никакого solver'а: тела двигаются по velocity, коллайдеры служат только
//! для query (overlap / cast / line of sight).

pub mod movement;
pub mod world;

#[cfg(test)]
mod world_tests;

// Re-export основных типов
pub use movement::integrate_velocity;
pub use world::{rebuild_collision_world, CollisionEntry, CollisionQuery, CollisionWorld};
