//! Enemy FSM state + tuning (serde, RON section `enemy`)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{HitShape, HitWindow};
use crate::components::{LAYER_OBSTACLE, LAYER_PLAYER};

/// Состояния летающего глаза
///
/// Dead терминальное. Hurt: короткий interrupt, после него всегда Patrol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum EnemyState {
    #[default]
    Patrol,
    Chase,
    Attack,
    Hurt,
    Dead,
}

/// Параметры врага
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub max_health: f32,
    pub move_speed: f32,
    /// Скорость погони = move_speed × multiplier
    pub chase_speed_multiplier: f32,

    /// Прямоугольник патруля вокруг точки спавна (полные размеры)
    pub patrol_area: Vec2,
    /// Новая точка патруля не ближе этого расстояния к текущей позиции
    pub min_patrol_distance: f32,
    pub arrival_epsilon: f32,
    pub min_wait: f32,
    pub max_wait: f32,

    pub detect_radius: f32,
    /// Слои, на которых ищем цель
    pub target_mask: u32,
    /// Слои, перекрывающие line of sight
    pub obstacle_mask: u32,

    pub attack_range: f32,
    pub attack_damage: f32,
    pub attack_cooldown: f32,
    /// Когда внутри attack cycle включён hit volume
    pub attack_window: HitWindow,
    pub hit_volume: HitShape,
    pub hit_cooldown: f32,

    pub hurt_force: f32,
    pub hurt_duration: f32,

    pub death_destroy_delay: f32,
    pub death_effect: Option<String>,
    pub death_effect_lifetime: f32,

    pub collider_radius: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            move_speed: 2.0,
            chase_speed_multiplier: 1.5,
            patrol_area: Vec2::new(8.0, 6.0),
            min_patrol_distance: 2.0,
            arrival_epsilon: 0.1,
            min_wait: 2.0,
            max_wait: 4.0,
            detect_radius: 8.0,
            target_mask: LAYER_PLAYER,
            obstacle_mask: LAYER_OBSTACLE,
            attack_range: 1.5,
            attack_damage: 20.0,
            attack_cooldown: 1.0,
            attack_window: HitWindow::new(0.3, 0.5),
            hit_volume: HitShape::Circle {
                offset: Vec2::new(0.6, 0.0),
                radius: 0.7,
            },
            hit_cooldown: 0.1,
            hurt_force: 5.0,
            hurt_duration: 0.07,
            death_destroy_delay: 0.0,
            death_effect: Some("FlyingEyeDeathEffect".to_string()),
            death_effect_lifetime: 2.0,
            collider_radius: 0.5,
        }
    }
}

impl EnemyConfig {
    pub fn chase_speed(&self) -> f32 {
        self.move_speed * self.chase_speed_multiplier
    }

    /// (min, max) ожидания; перепутанные границы меняются местами
    pub fn wait_range(&self) -> (f32, f32) {
        if self.min_wait <= self.max_wait {
            (self.min_wait, self.max_wait)
        } else {
            (self.max_wait, self.min_wait)
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.min_wait > self.max_wait {
            warnings.push(format!(
                "enemy.min_wait {} > max_wait {} (swapped at runtime)",
                self.min_wait, self.max_wait
            ));
        }
        if self.attack_cooldown <= 0.0 {
            warnings.push("enemy.attack_cooldown must be > 0".to_string());
        }
        if self.attack_window.start >= self.attack_window.end {
            warnings.push("enemy.attack_window is empty".to_string());
        }
        if self.attack_range > self.detect_radius {
            warnings.push("enemy.attack_range exceeds detect_radius".to_string());
        }
        if self.patrol_area.x < 0.0 || self.patrol_area.y < 0.0 {
            warnings.push("enemy.patrol_area has negative size".to_string());
        }
        warnings
    }
}
