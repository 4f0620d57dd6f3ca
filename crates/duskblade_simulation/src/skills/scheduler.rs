//! SkillCastScheduler: кулдауны по слотам + отложенный cast
//!
//! Кулдаун стартует в момент каста, урон приходит сразу (cast_delay = 0)
//! или через `cast_delay`. Отложенный cast нельзя отменить: он сработает,
//! пока жив владелец. Одновременно может ждать любое число кастов.

use bevy::prelude::*;

use crate::error::GameplayError;
use crate::physics::CollisionQuery;
use crate::skills::{SkillData, SkillShape};
use crate::timers::ScheduledTasks;

#[derive(Debug, Clone, Default)]
pub struct SkillCastScheduler {
    skills: Vec<SkillData>,
    /// Оставшийся кулдаун по слотам (≥ 0)
    cooldowns: Vec<f32>,
    delayed: ScheduledTasks<usize>,
    ready: Vec<usize>,
}

impl SkillCastScheduler {
    pub fn new(skills: Vec<SkillData>) -> Self {
        let cooldowns = vec![0.0; skills.len()];
        Self {
            skills,
            cooldowns,
            delayed: ScheduledTasks::new(),
            ready: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn skill(&self, slot: usize) -> Result<&SkillData, GameplayError> {
        self.skills.get(slot).ok_or(GameplayError::InvalidIndex {
            what: "skill slot",
            index: slot,
            len: self.skills.len(),
        })
    }

    /// Оставшийся кулдаун; 0 для несуществующего слота
    pub fn remaining_cooldown(&self, slot: usize) -> f32 {
        self.cooldowns.get(slot).copied().unwrap_or(0.0)
    }

    /// Касты, ожидающие cast_delay
    pub fn pending_casts(&self) -> usize {
        self.delayed.len()
    }

    /// Продвинуть кулдауны и отложенные касты на `dt`
    pub fn tick(&mut self, dt: f32) {
        for remaining in self.cooldowns.iter_mut() {
            *remaining = (*remaining - dt).max(0.0);
        }
        let due = self.delayed.advance(dt);
        self.ready.extend(due);
    }

    /// Попытка каста. false: слот на кулдауне или не существует.
    pub fn try_cast(&mut self, slot: usize) -> bool {
        let skill = match self.skill(slot) {
            Ok(skill) => skill,
            Err(err) => {
                crate::log_warning(&format!("try_cast ignored: {}", err));
                return false;
            }
        };
        if self.cooldowns[slot] > 0.0 {
            crate::log(&format!(
                "Skill '{}' on cooldown ({:.2}s left)",
                skill.name, self.cooldowns[slot]
            ));
            return false;
        }

        let cooldown = skill.cooldown.max(0.0);
        let cast_delay = skill.cast_delay;
        crate::log(&format!("Cast skill '{}' (slot {})", skill.name, slot));

        self.cooldowns[slot] = cooldown;
        if cast_delay > 0.0 {
            self.delayed.schedule(cast_delay, slot);
        } else {
            self.ready.push(slot);
        }
        true
    }

    /// Слоты, чей урон нужно применить в этом тике (в порядке готовности)
    pub fn take_ready(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.ready)
    }
}

/// Результат применения скилла
#[derive(Debug, Clone, PartialEq)]
pub struct SkillImpact {
    pub targets: Vec<Entity>,
    /// Направление удара для takeDamage (ноль для круга)
    pub direction: Vec2,
    pub effect_position: Vec2,
    pub mirror_effect: bool,
}

/// Collision query скилла от позиции кастера с текущим facing
pub fn resolve_skill(
    world: &impl CollisionQuery,
    caster: Entity,
    position: Vec2,
    facing: f32,
    skill: &SkillData,
) -> SkillImpact {
    let (targets, direction) = match skill.shape {
        SkillShape::Circle { radius } => (
            world.overlap_circle(position, radius, skill.target_mask),
            Vec2::ZERO,
        ),
        SkillShape::Box {
            width,
            height,
            cast_distance,
            cast_direction,
        } => {
            let direction = Vec2::new(cast_direction.x * facing, cast_direction.y);
            let half_size = Vec2::new(width, height) * 0.5;
            (
                world.box_cast(
                    position,
                    half_size,
                    direction,
                    cast_distance,
                    skill.target_mask,
                ),
                direction,
            )
        }
    };

    SkillImpact {
        targets: targets.into_iter().filter(|entity| *entity != caster).collect(),
        direction,
        effect_position: position + skill.effect_offset(facing),
        mirror_effect: skill.mirror_effect(facing),
    }
}
