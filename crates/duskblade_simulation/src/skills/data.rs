//! Skill definitions (serde, RON section `skills`)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::LAYER_ENEMY;

/// Форма области урона скилла (facing = +1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SkillShape {
    /// Круг вокруг кастера, без направления
    Circle { radius: f32 },
    /// Box cast от кастера; X направления зеркалится по facing
    Box {
        width: f32,
        height: f32,
        cast_distance: f32,
        cast_direction: Vec2,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillData {
    pub name: String,
    pub cooldown: f32,
    /// 0: урон сразу при касте
    pub cast_delay: f32,
    pub damage: f32,
    pub shape: SkillShape,
    pub target_mask: u32,
    pub effect: Option<String>,
    pub effect_lifetime: f32,
    pub sound: Option<String>,
}

impl Default for SkillData {
    fn default() -> Self {
        Self {
            name: "Skill".to_string(),
            cooldown: 2.0,
            cast_delay: 0.0,
            damage: 10.0,
            shape: SkillShape::Circle { radius: 2.0 },
            target_mask: LAYER_ENEMY,
            effect: None,
            effect_lifetime: 2.0,
            sound: None,
        }
    }
}

impl SkillData {
    /// Круговой взрыв вокруг игрока (слот 0)
    pub fn nova() -> Self {
        Self {
            name: "Nova".to_string(),
            cast_delay: 0.3,
            shape: SkillShape::Circle { radius: 2.5 },
            effect: Some("NovaEffect".to_string()),
            sound: Some("NovaCast".to_string()),
            ..Default::default()
        }
    }

    /// Волна вперёд по facing (слот 1)
    pub fn slash_wave() -> Self {
        Self {
            name: "Slash Wave".to_string(),
            damage: 15.0,
            shape: SkillShape::Box {
                width: 1.0,
                height: 0.8,
                cast_distance: 4.0,
                cast_direction: Vec2::X,
            },
            effect: Some("SlashWaveEffect".to_string()),
            sound: Some("SlashWaveCast".to_string()),
            ..Default::default()
        }
    }

    /// Смещение эффекта относительно кастера
    pub fn effect_offset(&self, facing: f32) -> Vec2 {
        match self.shape {
            SkillShape::Circle { .. } => Vec2::new(0.0, 0.3),
            SkillShape::Box { .. } => Vec2::new(0.5 * facing, 0.2),
        }
    }

    /// Box эффект разворачивается влево вместе с кастером
    pub fn mirror_effect(&self, facing: f32) -> bool {
        matches!(self.shape, SkillShape::Box { .. }) && facing < 0.0
    }

    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.cooldown < 0.0 {
            warnings.push(format!("skill '{}': negative cooldown", self.name));
        }
        if self.cast_delay < 0.0 {
            warnings.push(format!("skill '{}': negative cast_delay", self.name));
        }
        match self.shape {
            SkillShape::Circle { radius } if radius <= 0.0 => {
                warnings.push(format!("skill '{}': circle radius must be > 0", self.name));
            }
            SkillShape::Box {
                width,
                height,
                cast_direction,
                ..
            } => {
                if width <= 0.0 || height <= 0.0 {
                    warnings.push(format!("skill '{}': empty box", self.name));
                }
                if cast_direction == Vec2::ZERO {
                    warnings.push(format!(
                        "skill '{}': zero cast_direction (overlap only)",
                        self.name
                    ));
                }
            }
            _ => {}
        }
        warnings
    }
}
