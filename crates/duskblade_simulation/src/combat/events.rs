//! Combat events
//!
//! `DamageRequest`: единственный путь урона между акторами (takeDamage контракт).
//! Остальные события: для host стороны (UI, VFX, звук).

use bevy::prelude::*;

/// Запрос урона: attacker хочет нанести `amount` цели
///
/// `direction`: направление отбрасывания (нулевой вектор = без knockback).
/// Обрабатывается контроллером цели (игрок / враг), который решает,
/// принимать ли урон (invincibility, hurt lock, смерть).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageRequest {
    pub attacker: Entity,
    pub target: Entity,
    pub amount: f32,
    pub direction: Vec2,
}

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для UI (health bar), звуков, эффектов.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    pub remaining_health: f32,
    pub target_died: bool,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Host: заспавнить визуальный эффект
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EffectSpawnRequested {
    pub effect: String,
    pub position: Vec2,
    pub lifetime: f32,
    /// Отразить эффект по X (skill влево)
    pub mirror_x: bool,
}

/// Host: проиграть звук один раз
#[derive(Event, Debug, Clone, PartialEq)]
pub struct SoundRequested {
    pub sound: String,
    pub position: Vec2,
}

/// Результат takeDamage для контроллера цели
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Урон отклонён (invincible / hurt lock / уже мёртв)
    Ignored,
    Damaged,
    Killed,
}
