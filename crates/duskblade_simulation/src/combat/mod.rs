//! Combat module
//!
//! ECS ответственность:
//! - Hit volumes: включение по timeline атаки, overlap scan, contact события
//! - HitRecordGuard: per-pair hit cooldown (используют player и AI контроллеры)
//! - Events: DamageRequest (takeDamage контракт), DamageDealt, EntityDied
//! - Lifecycle: Dead marker, DespawnAfter
//!
//! Сам урон применяют контроллеры целей (player / ai), потому что правила
//! приёма урона у них разные (invincibility vs hurt lock).

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use events::*;
pub use systems::*;

use crate::SimulationSet;

/// Combat Plugin
///
/// Регистрирует combat события и системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. apply_hit_volume_toggles: команды контроллеров этого тика
/// 2. sync_hit_volume_facing: зеркалирование по facing владельца
/// 3. scan_hit_volumes: overlap → HitVolumeContact
/// 4. despawn_after_timeout / despawn_orphan_hit_volumes: cleanup
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageRequest>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<EffectSpawnRequested>()
            .add_event::<SoundRequested>()
            .add_event::<HitVolumeToggle>()
            .add_event::<HitVolumeContact>();

        app.add_systems(
            FixedUpdate,
            (
                apply_hit_volume_toggles,
                sync_hit_volume_facing,
                scan_hit_volumes,
            )
                .chain()
                .in_set(SimulationSet::HitDetection),
        );

        app.add_systems(
            FixedUpdate,
            (despawn_after_timeout, despawn_orphan_hit_volumes)
                .chain()
                .in_set(SimulationSet::Cleanup),
        );
    }
}
