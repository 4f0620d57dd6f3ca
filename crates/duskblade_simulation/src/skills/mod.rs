//! Skills module
//!
//! ECS ответственность:
//! - SkillCastScheduler: кулдауны по слотам, cast delay
//! - cast_skills: нажатия → каст, готовые касты → area / box-cast урон
//!
//! В отличие от melee, у скиллов нет hit cooldown: один каст бьёт
//! всех целей в области.

use bevy::prelude::*;

pub mod data;
pub mod scheduler;
pub mod systems;

// Re-export основных типов
pub use data::{SkillData, SkillShape};
pub use scheduler::{resolve_skill, SkillCastScheduler, SkillImpact};
pub use systems::{cast_skills, SkillCaster};

use crate::SimulationSet;

pub struct SkillsPlugin;

impl Plugin for SkillsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, cast_skills.in_set(SimulationSet::SkillCast));
    }
}
