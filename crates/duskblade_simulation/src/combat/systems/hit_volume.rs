//! Hit volume systems: toggle → facing sync → scan → contact events

use bevy::prelude::*;

use crate::combat::{HitVolume, HitVolumeContact, HitVolumeToggle};
use crate::components::{planar_position, Actor, Facing};
use crate::error::GameplayError;
use crate::physics::CollisionWorld;

/// Система: применение HitVolumeToggle событий
///
/// Toggle без подходящего volume (неверный index или volume не заспавнен)
/// логируется и игнорируется.
pub fn apply_hit_volume_toggles(
    mut toggles: EventReader<HitVolumeToggle>,
    mut volumes: Query<&mut HitVolume>,
) {
    for toggle in toggles.read() {
        let mut found = false;

        for mut volume in volumes.iter_mut() {
            if volume.owner != toggle.owner || volume.index != toggle.index {
                continue;
            }
            found = true;
            if toggle.enabled {
                volume.enable();
            } else {
                volume.disable();
            }
        }

        if !found {
            let err = GameplayError::missing(toggle.owner, "hit volume");
            crate::log_warning(&format!("HitVolumeToggle index {}: {}", toggle.index, err));
        }
    }
}

/// Система: hit volumes зеркалятся вместе с владельцем
pub fn sync_hit_volume_facing(mut volumes: Query<&mut HitVolume>, owners: Query<&Facing>) {
    for mut volume in volumes.iter_mut() {
        if let Ok(facing) = owners.get(volume.owner) {
            if volume.mirror != facing.sign() {
                volume.mirror = facing.sign();
            }
        }
    }
}

/// Система: overlap query для включённых volumes → HitVolumeContact
///
/// Позиция владельца берётся из Transform (уже после controller tick),
/// цели: из CollisionWorld snapshot этого тика.
pub fn scan_hit_volumes(
    world: Res<CollisionWorld>,
    mut volumes: Query<(Entity, &mut HitVolume)>,
    owners: Query<&Transform>,
    mut contacts: EventWriter<HitVolumeContact>,
) {
    for (volume_entity, mut volume) in volumes.iter_mut() {
        if !volume.enabled {
            continue;
        }
        let Ok(owner_transform) = owners.get(volume.owner) else {
            continue;
        };

        let entered = volume.scan(world.as_ref(), planar_position(owner_transform));
        for target in entered {
            contacts.write(HitVolumeContact {
                volume: volume_entity,
                owner: volume.owner,
                index: volume.index,
                target,
                activation: volume.activation(),
            });
        }
    }
}

/// Система: volumes без владельца удаляются (отписка при teardown)
pub fn despawn_orphan_hit_volumes(
    mut commands: Commands,
    volumes: Query<(Entity, &HitVolume)>,
    owners: Query<(), With<Actor>>,
) {
    for (entity, volume) in volumes.iter() {
        if owners.get(volume.owner).is_ok() {
            continue;
        }
        crate::log(&format!(
            "Despawning hit volume {:?} (owner {:?} gone)",
            entity, volume.owner
        ));
        if let Ok(mut entity_commands) = commands.get_entity(entity) {
            entity_commands.despawn();
        }
    }
}
