//! Controller → host commands.
//!
//! Player/enemy controllers are plain state machines: every tick they
//! return a list of `ControllerCommand`s instead of touching the world.
//! `HostOutbox` applies such a list to one actor inside an ECS system.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::combat::{Dead, DespawnAfter, EffectSpawnRequested, HitVolumeToggle};
use crate::components::{
    planar_position, AnimationParams, Collider, Facing, PhysicsBody, SpriteTint,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerCommand {
    SetVelocity(Vec2),
    SetFacing(f32),
    /// Hit-volume index as configured on the owner (player: 1..=3, enemy: 0).
    EnableHitVolume(u8),
    DisableHitVolume(u8),
    SetBool(&'static str, bool),
    SetFloat(&'static str, f32),
    SetTrigger(&'static str),
    SetSpriteAlpha(f32),
    /// Collider off + kinematic body (no further physics response).
    DisableCollision,
    SpawnEffect {
        effect: String,
        offset: Vec2,
        lifetime: f32,
        mirror_x: bool,
    },
    Despawn { delay: f32 },
}

/// Mutable view of the components a command list may touch.
pub struct ActorHandles<'a> {
    pub entity: Entity,
    pub position: Vec2,
    pub body: &'a mut PhysicsBody,
    pub facing: &'a mut Facing,
    pub animation: &'a mut AnimationParams,
    pub tint: Option<&'a mut SpriteTint>,
    pub collider: Option<&'a mut Collider>,
}

/// Query data актора, к которому применяются команды
pub type HostActorData = (
    Entity,
    &'static Transform,
    &'static mut PhysicsBody,
    &'static mut Facing,
    &'static mut AnimationParams,
    Option<&'static mut SpriteTint>,
    Option<&'static mut Collider>,
);

/// Item для `HostActorData`
pub type HostActorItem<'w> = (
    Entity,
    &'w Transform,
    Mut<'w, PhysicsBody>,
    Mut<'w, Facing>,
    Mut<'w, AnimationParams>,
    Option<Mut<'w, SpriteTint>>,
    Option<Mut<'w, Collider>>,
);

impl<'a> ActorHandles<'a> {
    pub fn from_item(item: &'a mut HostActorItem<'_>) -> Self {
        let (entity, transform, body, facing, animation, tint, collider) = item;
        Self {
            entity: *entity,
            position: planar_position(transform),
            body: &mut **body,
            facing: &mut **facing,
            animation: &mut **animation,
            tint: tint.as_deref_mut(),
            collider: collider.as_deref_mut(),
        }
    }
}

#[derive(SystemParam)]
pub struct HostOutbox<'w, 's> {
    commands: Commands<'w, 's>,
    toggles: EventWriter<'w, HitVolumeToggle>,
    effects: EventWriter<'w, EffectSpawnRequested>,
}

impl HostOutbox<'_, '_> {
    pub fn apply(
        &mut self,
        actor: &mut ActorHandles,
        commands: impl IntoIterator<Item = ControllerCommand>,
        now: f32,
    ) {
        for command in commands {
            match command {
                ControllerCommand::SetVelocity(velocity) => {
                    actor.body.velocity = velocity;
                }
                ControllerCommand::SetFacing(sign) => {
                    actor.facing.0 = sign;
                }
                ControllerCommand::EnableHitVolume(index) => {
                    self.toggles.write(HitVolumeToggle {
                        owner: actor.entity,
                        index,
                        enabled: true,
                    });
                }
                ControllerCommand::DisableHitVolume(index) => {
                    self.toggles.write(HitVolumeToggle {
                        owner: actor.entity,
                        index,
                        enabled: false,
                    });
                }
                ControllerCommand::SetBool(name, value) => actor.animation.set_bool(name, value),
                ControllerCommand::SetFloat(name, value) => actor.animation.set_float(name, value),
                ControllerCommand::SetTrigger(name) => actor.animation.set_trigger(name),
                ControllerCommand::SetSpriteAlpha(alpha) => match actor.tint.as_deref_mut() {
                    Some(tint) => tint.alpha = alpha.clamp(0.0, 1.0),
                    None => crate::log(&format!(
                        "{:?} has no SpriteTint, hit flash skipped",
                        actor.entity
                    )),
                },
                ControllerCommand::DisableCollision => {
                    if let Some(collider) = actor.collider.as_deref_mut() {
                        collider.enabled = false;
                    }
                    actor.body.kinematic = true;
                    actor.body.stop();
                }
                ControllerCommand::SpawnEffect {
                    effect,
                    offset,
                    lifetime,
                    mirror_x,
                } => {
                    self.effects.write(EffectSpawnRequested {
                        effect,
                        position: actor.position + offset,
                        lifetime,
                        mirror_x,
                    });
                }
                ControllerCommand::Despawn { delay } => {
                    if let Ok(mut entity_commands) = self.commands.get_entity(actor.entity) {
                        entity_commands.insert(DespawnAfter {
                            despawn_time: now + delay.max(0.0),
                        });
                    }
                }
            }
        }
    }

    /// Dead marker (AI / skills больше не трогают entity)
    pub fn mark_dead(&mut self, entity: Entity) {
        if let Ok(mut entity_commands) = self.commands.get_entity(entity) {
            entity_commands.insert(Dead);
        }
    }
}
