//! Player systems: controller tick, melee hit resolution, damage intake

use bevy::prelude::*;

use crate::combat::{
    DamageDealt, DamageOutcome, DamageRequest, EffectSpawnRequested, EntityDied, HitVolumeContact,
};
use crate::commands::{ActorHandles, HostActorData, HostOutbox};
use crate::components::{planar_position, Health, Player};
use crate::player::{PlayerCombatController, PlayerDefeated, PlayerInput};

/// Система: один тик PlayerCombatController
///
/// Input → controller.tick → команды применяются к компонентам актора.
pub fn tick_player_controllers(
    mut players: Query<(HostActorData, &mut PlayerCombatController, &PlayerInput), With<Player>>,
    mut outbox: HostOutbox,
    mut defeated: EventWriter<PlayerDefeated>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let now = time.elapsed_secs();

    for (mut actor, mut controller, input) in players.iter_mut() {
        let commands = controller.tick(input, delta, now);
        let mut handles = ActorHandles::from_item(&mut actor);
        outbox.apply(&mut handles, commands, now);

        if controller.take_game_over() {
            crate::log_info(&format!("Player {:?} defeated (game over)", handles.entity));
            defeated.write(PlayerDefeated {
                player: handles.entity,
            });
        }
    }
}

/// Система: контакт hit volume игрока → DamageRequest
///
/// Урон зависит от текущего шага комбо. Цель получает урон не больше
/// одного раза за activation, повтор по паре блокирует HitRecordGuard.
pub fn resolve_player_hits(
    mut contacts: EventReader<HitVolumeContact>,
    mut players: Query<(&mut PlayerCombatController, &Transform)>,
    targets: Query<(&Transform, &Health)>,
    mut requests: EventWriter<DamageRequest>,
    mut effects: EventWriter<EffectSpawnRequested>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for contact in contacts.read() {
        let Ok((mut controller, player_transform)) = players.get_mut(contact.owner) else {
            // Не игрок (volume врага)
            continue;
        };
        let Ok((target_transform, target_health)) = targets.get(contact.target) else {
            crate::log_warning(&format!(
                "Player hit {:?}: target has no Health, ignored",
                contact.target
            ));
            continue;
        };
        if !target_health.is_alive() {
            continue;
        }

        let Some(amount) = controller.register_hit(
            contact.owner,
            contact.target,
            contact.index,
            contact.activation,
            now,
        ) else {
            continue;
        };

        let player_position = planar_position(player_transform);
        let target_position = planar_position(target_transform);

        // Knockback от игрока
        requests.write(DamageRequest {
            attacker: contact.owner,
            target: contact.target,
            amount,
            direction: (target_position - player_position).normalize_or_zero(),
        });

        if let Some(effect) = controller.config().hit_effect.clone() {
            effects.write(EffectSpawnRequested {
                effect,
                position: target_position,
                lifetime: controller.config().hit_effect_lifetime,
                mirror_x: false,
            });
        }
    }
}

/// Система: DamageRequest по игроку → takeDamage контракт
pub fn apply_damage_to_player(
    mut requests: EventReader<DamageRequest>,
    mut players: Query<(HostActorData, &mut PlayerCombatController, &mut Health), With<Player>>,
    mut outbox: HostOutbox,
    mut dealt: EventWriter<DamageDealt>,
    mut died: EventWriter<EntityDied>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for request in requests.read() {
        let Ok((mut actor, mut controller, mut health)) = players.get_mut(request.target) else {
            continue;
        };

        let outcome = controller.take_damage(&mut health, request.amount);
        if outcome == DamageOutcome::Ignored {
            continue;
        }

        crate::log(&format!(
            "Player {:?} took {} from {:?} (health {}/{})",
            request.target, request.amount, request.attacker, health.current, health.max
        ));

        dealt.write(DamageDealt {
            attacker: request.attacker,
            target: request.target,
            damage: request.amount,
            remaining_health: health.current,
            target_died: outcome == DamageOutcome::Killed,
        });

        if outcome == DamageOutcome::Killed {
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

/// Система: сброс edge-флагов input в конце тика
pub fn clear_input_edges(mut inputs: Query<&mut PlayerInput>) {
    for mut input in inputs.iter_mut() {
        input.clear_edges();
    }
}

/// Система: EntityDied → запись о погибшем удаляется из hit ledgers игрока
pub fn forget_dead_player_targets(
    mut died: EventReader<EntityDied>,
    mut players: Query<&mut PlayerCombatController>,
) {
    for event in died.read() {
        for mut controller in players.iter_mut() {
            controller.forget_target(event.entity);
        }
    }
}
