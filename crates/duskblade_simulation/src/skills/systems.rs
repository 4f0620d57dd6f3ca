//! Skill systems: input → try_cast, ready casts → DamageRequest

use bevy::prelude::*;

use crate::combat::{Dead, DamageRequest, EffectSpawnRequested, SoundRequested};
use crate::components::{planar_position, Facing};
use crate::physics::CollisionWorld;
use crate::player::PlayerInput;
use crate::skills::{resolve_skill, SkillCastScheduler, SkillData};

/// Набор скиллов entity (слоты = индексы в `skills`)
#[derive(Component, Debug, Clone, Default)]
pub struct SkillCaster {
    pub scheduler: SkillCastScheduler,
}

impl SkillCaster {
    pub fn new(skills: Vec<SkillData>) -> Self {
        Self {
            scheduler: SkillCastScheduler::new(skills),
        }
    }
}

/// Система: кулдауны → нажатые слоты → урон готовых кастов
///
/// Facing читается в момент применения урона, а не в момент каста.
/// Звук играет при касте, эффект при применении.
pub fn cast_skills(
    world: Res<CollisionWorld>,
    mut casters: Query<
        (
            Entity,
            &Transform,
            &Facing,
            Option<&PlayerInput>,
            &mut SkillCaster,
        ),
        Without<Dead>,
    >,
    mut requests: EventWriter<DamageRequest>,
    mut effects: EventWriter<EffectSpawnRequested>,
    mut sounds: EventWriter<SoundRequested>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, transform, facing, input, mut caster) in casters.iter_mut() {
        let position = planar_position(transform);
        let scheduler = &mut caster.scheduler;
        scheduler.tick(delta);

        for &slot in input.map(|input| input.skill_pressed.as_slice()).unwrap_or(&[]) {
            if !scheduler.try_cast(slot) {
                continue;
            }
            if let Ok(Some(sound)) = scheduler.skill(slot).map(|skill| skill.sound.clone()) {
                sounds.write(SoundRequested { sound, position });
            }
        }

        for slot in scheduler.take_ready() {
            let Ok(skill) = scheduler.skill(slot) else {
                continue;
            };
            let impact = resolve_skill(world.as_ref(), entity, position, facing.sign(), skill);
            crate::log(&format!(
                "Skill '{}' resolved: {} target(s)",
                skill.name,
                impact.targets.len()
            ));

            if let Some(effect) = skill.effect.clone() {
                effects.write(EffectSpawnRequested {
                    effect,
                    position: impact.effect_position,
                    lifetime: skill.effect_lifetime,
                    mirror_x: impact.mirror_effect,
                });
            }

            for target in impact.targets {
                requests.write(DamageRequest {
                    attacker: entity,
                    target,
                    amount: skill.damage,
                    direction: impact.direction,
                });
            }
        }
    }
}
