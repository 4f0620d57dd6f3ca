//! HitRecordGuard: per (attacker, target) hit cooldown ledger
//!
//! Один guard на канал урона: игрок → враги и враг → игрок ведут
//! независимые экземпляры. Ключ: пара `Entity`, не ссылка на объект,
//! поэтому запись о погибшей entity удаляется через `forget` по `EntityDied`
//! (остальные протухают в `purge_expired`).

use bevy::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitRecordGuard {
    /// (attacker, target) → время последнего успешного удара
    records: HashMap<(Entity, Entity), f32>,
}

impl HitRecordGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Запомнить удар (перезаписывает предыдущий timestamp пары)
    pub fn record_hit(&mut self, attacker: Entity, target: Entity, now: f32) {
        self.records.insert((attacker, target), now);
    }

    /// true пока `now - last_hit < cooldown`
    pub fn is_in_cooldown(&self, attacker: Entity, target: Entity, now: f32, cooldown: f32) -> bool {
        self.records
            .get(&(attacker, target))
            .is_some_and(|last_hit| now - last_hit < cooldown)
    }

    /// Удалить записи с истёкшим cooldown
    pub fn purge_expired(&mut self, now: f32, cooldown: f32) {
        self.records.retain(|_, last_hit| now - *last_hit < cooldown);
    }

    /// Удалить все пары с участием entity (actor removal)
    pub fn forget(&mut self, entity: Entity) {
        self.records
            .retain(|(attacker, target), _| *attacker != entity && *target != entity);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_is_per_pair() {
        let player = Entity::from_raw(1);
        let eye_a = Entity::from_raw(2);
        let eye_b = Entity::from_raw(3);

        let mut guard = HitRecordGuard::new();
        guard.record_hit(player, eye_a, 1.0);

        assert!(guard.is_in_cooldown(player, eye_a, 1.05, 0.1));
        // Другая цель не заблокирована
        assert!(!guard.is_in_cooldown(player, eye_b, 1.05, 0.1));
        // Обратное направление: другая пара
        assert!(!guard.is_in_cooldown(eye_a, player, 1.05, 0.1));
        // Окно закончилось
        assert!(!guard.is_in_cooldown(player, eye_a, 1.25, 0.1));
    }

    #[test]
    fn test_purge_and_forget() {
        let player = Entity::from_raw(1);
        let eye_a = Entity::from_raw(2);
        let eye_b = Entity::from_raw(3);

        let mut guard = HitRecordGuard::new();
        guard.record_hit(player, eye_a, 0.0);
        guard.record_hit(player, eye_b, 0.5);

        guard.purge_expired(0.5, 0.25);
        assert_eq!(guard.len(), 1);
        assert!(guard.is_in_cooldown(player, eye_b, 0.5, 0.25));

        guard.forget(eye_b);
        assert!(guard.is_empty());
    }
}
