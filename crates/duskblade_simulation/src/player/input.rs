//! Input snapshot игрока
//!
//! Host (клавиатура / геймпад / скрипт теста) пишет сюда оси и нажатия.
//! Флаги нажатий: edge-triggered: сбрасываются в конце каждого тика.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct PlayerInput {
    /// -1..1
    pub horizontal: f32,
    /// -1..1
    pub vertical: f32,
    pub attack_pressed: bool,
    pub drink_pressed: bool,
    /// Слоты скиллов, нажатые в этом тике
    pub skill_pressed: Vec<usize>,
}

impl PlayerInput {
    pub fn with_axes(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
            ..Default::default()
        }
    }

    pub fn press_attack(&mut self) {
        self.attack_pressed = true;
    }

    pub fn press_drink(&mut self) {
        self.drink_pressed = true;
    }

    pub fn press_skill(&mut self, slot: usize) {
        if !self.skill_pressed.contains(&slot) {
            self.skill_pressed.push(slot);
        }
    }

    /// Сброс нажатий (оси держатся пока host их не поменяет)
    pub fn clear_edges(&mut self) {
        self.attack_pressed = false;
        self.drink_pressed = false;
        self.skill_pressed.clear();
    }
}
