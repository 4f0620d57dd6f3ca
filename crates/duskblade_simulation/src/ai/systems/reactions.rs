//! AI reaction systems (melee hits, incoming damage, death).

use bevy::prelude::*;

use crate::ai::EnemyAIController;
use crate::combat::{DamageDealt, DamageOutcome, DamageRequest, EntityDied, HitVolumeContact};
use crate::commands::{ActorHandles, HostActorData, HostOutbox};
use crate::components::{planar_position, Health};

/// Система: контакт hit volume врага → DamageRequest
///
/// Контакт получает только владелец volume. Повтор по той же цели в
/// одной activation отсекает контроллер.
pub fn resolve_enemy_hits(
    mut contacts: EventReader<HitVolumeContact>,
    mut enemies: Query<(&mut EnemyAIController, &Transform)>,
    targets: Query<(&Transform, &Health)>,
    mut requests: EventWriter<DamageRequest>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for contact in contacts.read() {
        let Ok((mut controller, enemy_transform)) = enemies.get_mut(contact.owner) else {
            continue;
        };
        let Ok((target_transform, target_health)) = targets.get(contact.target) else {
            crate::log_warning(&format!(
                "Enemy hit {:?}: target has no Health, ignored",
                contact.target
            ));
            continue;
        };
        if !target_health.is_alive() {
            continue;
        }

        let Some(amount) = controller.on_hit_volume_contact(
            contact.owner,
            contact.target,
            contact.activation,
            now,
        ) else {
            continue;
        };

        let direction = (planar_position(target_transform) - planar_position(enemy_transform))
            .normalize_or_zero();
        requests.write(DamageRequest {
            attacker: contact.owner,
            target: contact.target,
            amount,
            direction,
        });
    }
}

/// Система: DamageRequest по врагу → takeDamage контракт
///
/// Смерть: EntityDied + Dead marker; collider off, despawn по таймеру
/// приходят командами контроллера.
pub fn apply_damage_to_enemies(
    mut requests: EventReader<DamageRequest>,
    mut enemies: Query<(HostActorData, &mut EnemyAIController, &mut Health)>,
    mut outbox: HostOutbox,
    mut dealt: EventWriter<DamageDealt>,
    mut died: EventWriter<EntityDied>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for request in requests.read() {
        let Ok((mut actor, mut controller, mut health)) = enemies.get_mut(request.target) else {
            continue;
        };

        let outcome = controller.take_damage(&mut health, request.amount, request.direction);
        if outcome == DamageOutcome::Ignored {
            continue;
        }

        dealt.write(DamageDealt {
            attacker: request.attacker,
            target: request.target,
            damage: request.amount,
            remaining_health: health.current,
            target_died: outcome == DamageOutcome::Killed,
        });

        if outcome == DamageOutcome::Killed {
            crate::log_info(&format!(
                "Enemy {:?} killed by {:?}",
                request.target, request.attacker
            ));
            died.write(EntityDied {
                entity: request.target,
                killer: Some(request.attacker),
            });
            outbox.mark_dead(request.target);
        }

        let mut handles = ActorHandles::from_item(&mut actor);
        outbox.apply(&mut handles, controller.take_commands(), now);
    }
}

/// Система: EntityDied → запись о погибшем удаляется из hit ledgers врагов
pub fn forget_dead_enemy_targets(
    mut died: EventReader<EntityDied>,
    mut enemies: Query<&mut EnemyAIController>,
) {
    for event in died.read() {
        for mut controller in enemies.iter_mut() {
            controller.forget_target(event.entity);
        }
    }
}
