//! FSM AI systems (target sensing, controller tick).

use bevy::prelude::*;

use crate::ai::{sense_target, EnemyAIController, EnemySenses};
use crate::combat::Dead;
use crate::commands::{ActorHandles, HostActorData, HostOutbox};
use crate::components::{planar_position, Health};
use crate::physics::CollisionWorld;
use crate::DeterministicRng;

/// Система: circle query + line of sight → EnemySenses
///
/// Мёртвые цели (Health == 0) не отслеживаются.
pub fn detect_target(
    world: Res<CollisionWorld>,
    mut enemies: Query<
        (Entity, &Transform, &EnemyAIController, &mut EnemySenses),
        Without<Dead>,
    >,
    targets: Query<&Health>,
) {
    for (entity, transform, controller, mut senses) in enemies.iter_mut() {
        let position = planar_position(transform);
        let sensed = sense_target(world.as_ref(), position, controller.config(), |candidate| {
            targets
                .get(candidate)
                .map(|health| health.is_alive())
                .unwrap_or(false)
        });

        let previous = senses.target.map(|(target, _)| target);
        let current = sensed.map(|(target, _)| target);
        if previous != current {
            crate::log(&format!("AI: {:?} target {:?} → {:?}", entity, previous, current));
        }
        senses.target = sensed;
    }
}

/// Система: один тик EnemyAIController
pub fn tick_enemy_controllers(
    mut enemies: Query<(HostActorData, &mut EnemyAIController, &EnemySenses), Without<Dead>>,
    mut outbox: HostOutbox,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let now = time.elapsed_secs();

    for (mut actor, mut controller, senses) in enemies.iter_mut() {
        let mut handles = ActorHandles::from_item(&mut actor);
        let commands = controller.tick(handles.position, senses, delta, &mut rng.rng);
        outbox.apply(&mut handles, commands, now);
    }
}
