//! LevelPortal: trigger зона перехода на другую сцену
//!
//! Вход игрока → (trigger_delay) → Start transition → (transition_time) →
//! загрузка. Повторный вход игнорируется, пока переход в процессе.
//! Ошибка загрузки (или "последняя сцена") сбрасывает портал.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::components::LAYER_PLAYER;
use crate::error::GameplayError;
use crate::level::SceneCatalog;
use crate::timers::ScheduledTasks;

/// Куда ведёт портал
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalTarget {
    /// Следующая сцена каталога
    Next,
    Named(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PortalTask {
    BeginTransition,
    Load,
}

/// Что произошло с порталом за тик
#[derive(Debug, Clone, PartialEq)]
pub enum PortalEvent {
    TransitionStarted,
    Loaded(String),
    Failed(GameplayError),
}

#[derive(Component, Debug, Clone)]
pub struct LevelPortal {
    pub target: PortalTarget,
    pub half_size: Vec2,
    pub trigger_mask: u32,
    pub trigger_delay: f32,
    pub transition_time: f32,
    triggered: bool,
    occupants: HashSet<Entity>,
    tasks: ScheduledTasks<PortalTask>,
}

impl LevelPortal {
    pub fn new(target: PortalTarget, half_size: Vec2) -> Self {
        Self {
            target,
            half_size,
            trigger_mask: LAYER_PLAYER,
            trigger_delay: 1.0,
            transition_time: 1.0,
            triggered: false,
            occupants: HashSet::new(),
            tasks: ScheduledTasks::new(),
        }
    }

    pub fn to_next(half_size: Vec2) -> Self {
        Self::new(PortalTarget::Next, half_size)
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Текущие entity в зоне. true: портал сработал на этом входе.
    pub fn update_occupants(&mut self, current: impl IntoIterator<Item = Entity>) -> bool {
        let current: HashSet<Entity> = current.into_iter().collect();
        let entered = current.iter().any(|entity| !self.occupants.contains(entity));
        self.occupants = current;

        if !entered || self.triggered {
            return false;
        }
        self.triggered = true;
        self.tasks
            .schedule(self.trigger_delay, PortalTask::BeginTransition);
        true
    }

    /// Продвинуть отложенные шаги перехода
    pub fn advance(&mut self, dt: f32, catalog: &mut SceneCatalog) -> Vec<PortalEvent> {
        let mut events = Vec::new();

        for task in self.tasks.advance(dt) {
            match task {
                PortalTask::BeginTransition => {
                    if self.target == PortalTarget::Next && catalog.next_scene().is_none() {
                        self.triggered = false;
                        events.push(PortalEvent::Failed(GameplayError::SceneLoadFailure {
                            scene: catalog.active_scene().unwrap_or_default().to_string(),
                            reason: "already the last scene".to_string(),
                        }));
                        continue;
                    }
                    self.tasks.schedule(self.transition_time, PortalTask::Load);
                    events.push(PortalEvent::TransitionStarted);
                }
                PortalTask::Load => {
                    let result = match &self.target {
                        PortalTarget::Next => catalog.load_next(),
                        PortalTarget::Named(name) => catalog.load_by_name(name),
                    };
                    self.triggered = false;
                    events.push(match result {
                        Ok(scene) => PortalEvent::Loaded(scene),
                        Err(err) => PortalEvent::Failed(err),
                    });
                }
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.25;
    const NOBODY: [Entity; 0] = [];

    fn catalog() -> SceneCatalog {
        SceneCatalog::new(vec!["Level1".to_string(), "Level2".to_string()])
    }

    fn run(portal: &mut LevelPortal, catalog: &mut SceneCatalog, ticks: usize) -> Vec<PortalEvent> {
        (0..ticks)
            .flat_map(|_| portal.advance(DT, catalog))
            .collect()
    }

    #[test]
    fn test_entry_starts_transition_then_loads() {
        let mut scenes = catalog();
        let mut portal = LevelPortal::to_next(Vec2::ONE);
        let player = Entity::from_raw(1);

        assert!(portal.update_occupants([player]));
        assert!(portal.is_triggered());
        // Стоим внутри: повторного срабатывания нет
        assert!(!portal.update_occupants([player]));

        assert!(run(&mut portal, &mut scenes, 3).is_empty());
        assert_eq!(run(&mut portal, &mut scenes, 1), vec![PortalEvent::TransitionStarted]);
        assert!(run(&mut portal, &mut scenes, 3).is_empty());
        assert_eq!(
            run(&mut portal, &mut scenes, 1),
            vec![PortalEvent::Loaded("Level2".to_string())]
        );
        assert!(!portal.is_triggered());
        assert_eq!(scenes.active_scene(), Some("Level2"));
    }

    #[test]
    fn test_last_scene_resets_portal() {
        let mut scenes = catalog();
        scenes.load_by_name("Level2").unwrap();
        let mut portal = LevelPortal::to_next(Vec2::ONE);
        let player = Entity::from_raw(1);

        portal.update_occupants([player]);
        let events = run(&mut portal, &mut scenes, 4);
        assert!(matches!(
            events.as_slice(),
            [PortalEvent::Failed(GameplayError::SceneLoadFailure { .. })]
        ));
        assert!(!portal.is_triggered());

        // Выйти и снова войти
        portal.update_occupants(NOBODY);
        assert!(portal.update_occupants([player]));
    }

    #[test]
    fn test_unknown_named_scene_fails_and_resets() {
        let mut scenes = catalog();
        let mut portal = LevelPortal::new(PortalTarget::Named("Secret".to_string()), Vec2::ONE);

        portal.update_occupants([Entity::from_raw(1)]);
        let events = run(&mut portal, &mut scenes, 8);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], PortalEvent::TransitionStarted);
        assert!(matches!(events[1], PortalEvent::Failed(_)));
        assert!(!portal.is_triggered());
        assert_eq!(scenes.active_scene(), Some("Level1"));
    }

    #[test]
    fn test_leaving_does_not_cancel_transition() {
        let mut scenes = catalog();
        let mut portal = LevelPortal::to_next(Vec2::ONE);

        portal.update_occupants([Entity::from_raw(1)]);
        portal.update_occupants(NOBODY);
        let events = run(&mut portal, &mut scenes, 8);
        assert_eq!(events.last(), Some(&PortalEvent::Loaded("Level2".to_string())));
    }
}
