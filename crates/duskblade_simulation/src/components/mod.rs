//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: Actor, Health, Facing, SpriteTint
//! - movement: PhysicsBody
//! - collision: Collider, CollisionLayers, layer masks
//! - animation: AnimationParams (animation sink) + имена параметров
//! - player: Player marker

pub mod actor;
pub mod animation;
pub mod collision;
pub mod movement;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use animation::*;
pub use collision::*;
pub use movement::*;
pub use player::*;
