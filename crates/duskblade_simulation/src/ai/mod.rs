//! AI decision-making module
//!
//! Летающий глаз: patrol → chase → attack, hurt lock, смерть.
//! Sensing (circle + line of sight) отделён от контроллера, чтобы
//! контроллер оставался чистой state machine.

use bevy::prelude::*;

pub mod components;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use systems::*;

use crate::combat::HitVolume;
use crate::components::{
    Actor, AnimationParams, Collider, CollisionLayers, Health, SpriteTint, LAYER_ENEMY,
    PARAM_IS_PATROLLING,
};
use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. detect_target: EnemySenses из CollisionWorld (EnemyControl)
/// 2. tick_enemy_controllers: state machine → команды (EnemyControl)
/// 3. resolve_enemy_hits: контакты hit volume → DamageRequest (HitResolution)
/// 4. apply_damage_to_enemies: takeDamage (Damage)
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (detect_target, tick_enemy_controllers)
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::EnemyControl),
        )
        .add_systems(
            FixedUpdate,
            resolve_enemy_hits
                .after(crate::player::resolve_player_hits)
                .in_set(SimulationSet::HitResolution),
        )
        .add_systems(
            FixedUpdate,
            apply_damage_to_enemies
                .after(crate::player::apply_damage_to_player)
                .in_set(SimulationSet::Damage),
        )
        .add_systems(
            FixedUpdate,
            forget_dead_enemy_targets.in_set(SimulationSet::Cleanup),
        );
    }
}

/// Spawn helper для летающего глаза
///
/// Точка спавна = центр области патруля. Hit volume (index 0) бьёт по
/// `config.target_mask`.
pub fn spawn_flying_eye(world: &mut World, position: Vec2, config: &EnemyConfig) -> Entity {
    let mut animation = AnimationParams::default();
    animation.set_bool(PARAM_IS_PATROLLING, true);

    let enemy = world
        .spawn((
            Actor,
            Health::new(config.max_health),
            Transform::from_translation(position.extend(0.0)),
            animation,
            Collider::circle(config.collider_radius),
            CollisionLayers::new(LAYER_ENEMY),
            SpriteTint::default(),
            EnemySenses::default(),
            EnemyAIController::new(config.clone(), position),
        ))
        .id();

    world.spawn(HitVolume::new(
        enemy,
        ENEMY_HIT_VOLUME,
        config.hit_volume,
        config.target_mask,
    ));

    crate::log_info(&format!("Spawned flying eye {:?} at {:?}", enemy, position));
    enemy
}
