//! Базовые компоненты акторов: Actor, Health, Facing, SpriteTint

use bevy::prelude::*;

use crate::components::{AnimationParams, PhysicsBody};

/// Актор (игрок или враг): базовый компонент для живых существ
///
/// Через Required Components сразу получает Health, PhysicsBody, Facing,
/// AnimationParams и Transform.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, PhysicsBody, Facing, AnimationParams, Transform)]
pub struct Actor;

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max. Меняется только через `take_damage` / `heal`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// `current = clamp(current - amount, 0, max)`
    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).clamp(0.0, self.max);
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).clamp(0.0, self.max);
    }

    /// Доля здоровья 0..1 (для health bar на стороне host)
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }
}

/// Горизонтальная ориентация: +1 вправо, -1 влево. Никогда не 0.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Facing(pub f32);

impl Default for Facing {
    fn default() -> Self {
        Self(1.0)
    }
}

impl Facing {
    /// Знак горизонтального ввода; 0 оставляет текущее направление
    pub fn update_from(&mut self, horizontal: f32) -> bool {
        if horizontal == 0.0 {
            return false;
        }
        let next = horizontal.signum();
        let changed = next != self.0;
        self.0 = next;
        changed
    }

    pub fn sign(&self) -> f32 {
        self.0
    }
}

/// Прозрачность спрайта (hit flash). Рендер читает, симуляция пишет.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SpriteTint {
    pub alpha: f32,
}

impl Default for SpriteTint {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}
