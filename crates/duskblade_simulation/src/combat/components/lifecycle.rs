//! Death / despawn маркеры

use bevy::prelude::*;

/// Компонент-маркер: entity мертв (Health <= 0)
///
/// Используется для визуальных эффектов (death animation, fade-out)
/// и чтобы исключить entity из AI/skill логики до деспавна.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Деспавн entity по таймауту
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DespawnAfter {
    /// Время деспавна (в секундах от старта симуляции, Time<Fixed>)
    pub despawn_time: f32,
}
