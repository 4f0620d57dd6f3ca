//! Movement компоненты: скорость тела, kinematic флаг

use bevy::prelude::*;

/// Физическое тело актора (2D, единицы мира/сек)
///
/// Контроллеры пишут `velocity` через `ControllerCommand::SetVelocity`,
/// `integrate_velocity` переносит её в `Transform`.
/// `kinematic = true`: тело больше не реагирует на физику (мёртвые враги).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec2,
    pub kinematic: bool,
}

impl PhysicsBody {
    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
    }
}

/// 2D позиция из Transform (z: только порядок отрисовки)
pub fn planar_position(transform: &Transform) -> Vec2 {
    transform.translation.truncate()
}
