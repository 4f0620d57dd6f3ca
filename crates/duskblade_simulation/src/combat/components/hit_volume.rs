//! Hit volumes: области урона, которые включаются только на время атаки
//!
//! Каждый volume: отдельная entity с `owner`. Включение открывает новую
//! activation (contacts очищаются), поэтому цели, уже стоящие внутри
//! области в момент включения, тоже считаются "вошедшими".

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::physics::CollisionQuery;

/// Форма hit volume в локальных координатах владельца (facing = +1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HitShape {
    Box { offset: Vec2, half_size: Vec2 },
    Circle { offset: Vec2, radius: f32 },
}

impl HitShape {
    pub fn offset(&self) -> Vec2 {
        match self {
            HitShape::Box { offset, .. } | HitShape::Circle { offset, .. } => *offset,
        }
    }

    /// Центр в мире; X offset зеркалится по facing владельца
    pub fn world_center(&self, owner_position: Vec2, facing: f32) -> Vec2 {
        let offset = self.offset();
        owner_position + Vec2::new(offset.x * facing, offset.y)
    }
}

/// Окно активности hit volume внутри одного удара (секунды от начала swing)
///
/// Заменяет animation events: volume включён пока `start <= t < end`.
/// Игрок отсчитывает от начала swing, враг от начала attack cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitWindow {
    pub start: f32,
    pub end: f32,
}

impl Default for HitWindow {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 0.5,
        }
    }
}

impl HitWindow {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, t: f32) -> bool {
        t >= self.start && t < self.end
    }
}

/// Hit volume entity
#[derive(Component, Debug, Clone)]
pub struct HitVolume {
    pub owner: Entity,
    /// Индекс как его видит владелец (игрок: 1..=3, враг: 0)
    pub index: u8,
    pub shape: HitShape,
    /// Слои целей (LAYER_ENEMY для игрока, LAYER_PLAYER для врага)
    pub target_mask: u32,
    pub enabled: bool,
    /// Facing владельца (копируется каждый тик)
    pub mirror: f32,
    contacts: HashSet<Entity>,
    activation: u32,
}

impl HitVolume {
    pub fn new(owner: Entity, index: u8, shape: HitShape, target_mask: u32) -> Self {
        Self {
            owner,
            index,
            shape,
            target_mask,
            enabled: false,
            mirror: 1.0,
            contacts: HashSet::new(),
            activation: 0,
        }
    }

    /// Открыть новую activation. Повторное включение без выключения: no-op.
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        self.activation = self.activation.wrapping_add(1);
        self.contacts.clear();
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.contacts.clear();
    }

    /// Номер текущей (или последней) activation
    pub fn activation(&self) -> u32 {
        self.activation
    }

    pub fn world_center(&self, owner_position: Vec2) -> Vec2 {
        self.shape.world_center(owner_position, self.mirror)
    }

    /// Все цели внутри области прямо сейчас (без владельца)
    pub fn overlapping(&self, world: &impl CollisionQuery, owner_position: Vec2) -> Vec<Entity> {
        let center = self.world_center(owner_position);
        let hits = match self.shape {
            HitShape::Box { half_size, .. } => world.overlap_box(center, half_size, self.target_mask),
            HitShape::Circle { radius, .. } => world.overlap_circle(center, radius, self.target_mask),
        };
        hits.into_iter().filter(|entity| *entity != self.owner).collect()
    }

    /// Обновить contacts и вернуть новые входы (trigger enter)
    ///
    /// Цель, вышедшая из области, при повторном входе снова считается входом.
    pub fn scan(&mut self, world: &impl CollisionQuery, owner_position: Vec2) -> Vec<Entity> {
        if !self.enabled {
            return Vec::new();
        }

        let current = self.overlapping(world, owner_position);
        let entered: Vec<Entity> = current
            .iter()
            .copied()
            .filter(|entity| !self.contacts.contains(entity))
            .collect();

        self.contacts = current.into_iter().collect();
        entered
    }
}

/// Включение / выключение hit volume владельца (animation timeline marker)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitVolumeToggle {
    pub owner: Entity,
    pub index: u8,
    pub enabled: bool,
}

/// Цель вошла в включённый hit volume. Получатель: только `owner`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitVolumeContact {
    pub volume: Entity,
    pub owner: Entity,
    pub index: u8,
    pub target: Entity,
    pub activation: u32,
}
