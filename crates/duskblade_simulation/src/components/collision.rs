//! Collision Layers + Collider
//!
//! ## Слои (битовая маска):
//! - PLAYER (0b10): управляемый персонаж
//! - ENEMY (0b100): враги (skill / melee targets)
//! - OBSTACLE (0b1000): стены, блокируют line of sight
//! - TRIGGER (0b10000): порталы и прочие trigger-зоны
//!
//! Query принимает mask: объект попадает в выборку если
//! `layers.membership & mask != 0`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Layer 2: Player
pub const LAYER_PLAYER: u32 = 0b10;

/// Layer 3: Enemies
pub const LAYER_ENEMY: u32 = 0b100;

/// Layer 4: Obstacles (line of sight blockers)
pub const LAYER_OBSTACLE: u32 = 0b1000;

/// Layer 5: Trigger areas
pub const LAYER_TRIGGER: u32 = 0b1_0000;

/// Форма коллайдера (центр = позиция entity)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub enum ColliderShape {
    Circle { radius: f32 },
    Rect { half_size: Vec2 },
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Collider {
    pub shape: ColliderShape,
    /// false: entity не попадает ни в один query (мёртвые враги)
    pub enabled: bool,
}

impl Collider {
    pub fn circle(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Circle { radius },
            enabled: true,
        }
    }

    pub fn rect(half_size: Vec2) -> Self {
        Self {
            shape: ColliderShape::Rect { half_size },
            enabled: true,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct CollisionLayers {
    pub membership: u32,
}

impl CollisionLayers {
    pub fn new(membership: u32) -> Self {
        Self { membership }
    }

    pub fn matches(&self, mask: u32) -> bool {
        self.membership & mask != 0
    }
}
