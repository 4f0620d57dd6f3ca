//! Despawn по таймауту

use bevy::prelude::*;

use crate::combat::DespawnAfter;

/// Система: деспавн entities с истёкшим DespawnAfter timeout
///
/// Проверяет все entities с компонентом DespawnAfter.
/// Удаляет entity если текущее время >= despawn_time.
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::log(&format!("Despawning entity {:?} (timeout)", entity));
            if let Ok(mut entity_commands) = commands.get_entity(entity) {
                entity_commands.despawn();
            }
        }
    }
}
