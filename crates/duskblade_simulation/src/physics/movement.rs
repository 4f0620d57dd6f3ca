//! Интеграция скорости
//!
//! Контроллеры только выставляют `PhysicsBody::velocity`,
//! позицию двигает эта система (один шаг Эйлера на тик).

use bevy::prelude::*;

use crate::components::PhysicsBody;

/// Система: position += velocity × dt
///
/// Kinematic тела (мёртвые враги) стоят на месте.
pub fn integrate_velocity(
    mut query: Query<(&mut Transform, &PhysicsBody)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, body) in query.iter_mut() {
        if body.kinematic {
            continue;
        }
        transform.translation += body.velocity.extend(0.0) * delta;
    }
}
