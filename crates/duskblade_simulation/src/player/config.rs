//! Player tuning (serde, RON section `player`)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{HitShape, HitWindow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: f32,
    pub move_speed: f32,
    pub drink_duration: f32,
    /// Длительность одного удара комбо
    pub attack_duration: f32,
    /// Сколько можно простоять между ударами, прежде чем комбо сбросится
    pub combo_timeout: f32,
    /// Урон ударов 1 / 2 / 3
    pub combo_damage: [f32; 3],
    pub hit_cooldown: f32,
    /// Hit volumes ударов 1 / 2 / 3 (facing = +1)
    pub hit_volumes: [HitShape; 3],
    pub hit_windows: [HitWindow; 3],
    pub single_flash_duration: f32,
    pub flash_count: u32,
    pub flash_alpha: f32,
    /// Задержка между смертью и PlayerDefeated (game over экран)
    pub game_over_delay: f32,
    /// Эффект на цели при попадании melee (None: без эффекта)
    pub hit_effect: Option<String>,
    pub hit_effect_lifetime: f32,
    pub collider_radius: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            move_speed: 5.0,
            drink_duration: 0.375,
            attack_duration: 0.5,
            combo_timeout: 0.5,
            combo_damage: [1.0, 2.0, 3.0],
            hit_cooldown: 0.1,
            hit_volumes: [
                HitShape::Box {
                    offset: Vec2::new(0.6, 0.0),
                    half_size: Vec2::new(0.5, 0.4),
                },
                HitShape::Box {
                    offset: Vec2::new(0.7, 0.0),
                    half_size: Vec2::new(0.6, 0.4),
                },
                HitShape::Box {
                    offset: Vec2::new(0.8, 0.1),
                    half_size: Vec2::new(0.7, 0.5),
                },
            ],
            hit_windows: [HitWindow::default(); 3],
            single_flash_duration: 0.1,
            flash_count: 3,
            flash_alpha: 0.3,
            game_over_delay: 0.5,
            hit_effect: Some("PlayerHitEffect".to_string()),
            hit_effect_lifetime: 0.8,
            collider_radius: 0.4,
        }
    }
}

impl PlayerConfig {
    /// Полная длительность hit flash = длительность invincibility
    pub fn invincibility_duration(&self) -> f32 {
        self.single_flash_duration * 2.0 * self.flash_count as f32
    }

    /// Урон удара `step` (1..=3); 0 вне диапазона
    pub fn damage_for_step(&self, step: u8) -> f32 {
        match step {
            1..=3 => self.combo_damage[usize::from(step - 1)],
            _ => 0.0,
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.attack_duration <= 0.0 {
            warnings.push("player.attack_duration must be > 0".to_string());
        }
        if self.drink_duration <= 0.0 {
            warnings.push("player.drink_duration must be > 0".to_string());
        }
        if self.combo_timeout <= 0.0 {
            warnings.push("player.combo_timeout must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.flash_alpha) {
            warnings.push(format!("player.flash_alpha {} outside 0..=1", self.flash_alpha));
        }
        for (i, window) in self.hit_windows.iter().enumerate() {
            if window.start >= window.end {
                warnings.push(format!("player.hit_windows[{}] is empty", i));
            }
            if window.start >= self.attack_duration {
                warnings.push(format!(
                    "player.hit_windows[{}] starts after the swing ends",
                    i
                ));
            }
        }
        if self.combo_damage.iter().any(|damage| *damage < 0.0) {
            warnings.push("player.combo_damage has negative values".to_string());
        }
        warnings
    }
}
