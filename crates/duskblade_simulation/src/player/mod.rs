//! Player module
//!
//! ECS ответственность:
//! - PlayerCombatController: движение, питьё, комбо из трёх ударов
//! - Hit flash + invincibility после получения урона
//! - PlayerDefeated после смерти (game over)
//!
//! Input пишет host в `PlayerInput`, контроллер тикает в PlayerControl.

use bevy::prelude::*;

pub mod config;
pub mod controller;
pub mod input;
pub mod systems;

#[cfg(test)]
mod controller_tests;

// Re-export основных типов
pub use config::PlayerConfig;
pub use controller::{PlayerCombatController, PlayerState, MAX_COMBO_STEP};
pub use input::PlayerInput;
pub use systems::*;

use crate::combat::HitVolume;
use crate::components::{
    Actor, Collider, CollisionLayers, Health, Player, SpriteTint, LAYER_ENEMY, LAYER_PLAYER,
};
use crate::config::GameplayConfig;
use crate::skills::SkillCaster;
use crate::SimulationSet;

/// Игрок побеждён: `game_over_delay` секунд после смерти
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerDefeated {
    pub player: Entity,
}

/// Player Plugin
///
/// Порядок внутри тика:
/// 1. tick_player_controllers (PlayerControl)
/// 2. resolve_player_hits (HitResolution): контакты hit volumes игрока
/// 3. apply_damage_to_player (Damage)
/// 4. clear_input_edges (Cleanup)
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerDefeated>();

        app.add_systems(
            FixedUpdate,
            tick_player_controllers.in_set(SimulationSet::PlayerControl),
        )
        .add_systems(
            FixedUpdate,
            resolve_player_hits.in_set(SimulationSet::HitResolution),
        )
        .add_systems(
            FixedUpdate,
            apply_damage_to_player.in_set(SimulationSet::Damage),
        )
        .add_systems(
            FixedUpdate,
            (clear_input_edges, forget_dead_player_targets).in_set(SimulationSet::Cleanup),
        );
    }
}

/// Spawn helper для игрока
///
/// Создает entity с полным набором компонентов:
/// - Actor (+ Health, PhysicsBody, Facing, AnimationParams, Transform)
/// - Collider (circle) на слое PLAYER
/// - PlayerInput, PlayerCombatController, SkillCaster
///
/// И три hit volume entity (индексы 1..=3) по целям слоя ENEMY.
pub fn spawn_player(world: &mut World, position: Vec2, config: &GameplayConfig) -> Entity {
    let player_config = config.player.clone();

    let player = world
        .spawn((
            Actor,
            Player,
            Health::new(player_config.max_health),
            Transform::from_translation(position.extend(0.0)),
            Collider::circle(player_config.collider_radius),
            CollisionLayers::new(LAYER_PLAYER),
            SpriteTint::default(),
            PlayerInput::default(),
            SkillCaster::new(config.skills.clone()),
            PlayerCombatController::new(player_config.clone()),
        ))
        .id();

    for (step, shape) in (1..=MAX_COMBO_STEP).zip(player_config.hit_volumes.iter()) {
        world.spawn(HitVolume::new(player, step, *shape, LAYER_ENEMY));
    }

    crate::log_info(&format!("Spawned player {:?} at {:?}", player, position));
    player
}
