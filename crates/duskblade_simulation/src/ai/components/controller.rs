//! EnemyAIController: patrol / chase / attack / hurt / dead
//!
//! Как и игрок, контроллер не трогает ECS: `tick` получает позицию и
//! результат sensing, возвращает `ControllerCommand`. Случайность (точки
//! патруля, ожидание) берётся только из переданного RNG.

use bevy::prelude::*;
use rand::Rng;
use std::collections::HashSet;

use crate::ai::{EnemyConfig, EnemyState};
use crate::combat::{DamageOutcome, HitRecordGuard};
use crate::commands::ControllerCommand;
use crate::components::{
    Health, PARAM_ENEMY_ATTACKING, PARAM_IS_CHASING, PARAM_IS_PATROLLING, TRIGGER_DIE,
    TRIGGER_HURT,
};
use crate::error::GameplayError;
use crate::physics::CollisionQuery;
use crate::timers::ScheduledTasks;

/// Индекс единственного hit volume врага
pub const ENEMY_HIT_VOLUME: u8 = 0;

/// Попыток найти точку патруля дальше `min_patrol_distance`
const PATROL_POINT_ATTEMPTS: usize = 30;

/// Результат sensing за тик (пишет `detect_target`)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct EnemySenses {
    /// Отслеживаемая цель и её позиция
    pub target: Option<(Entity, Vec2)>,
}

/// Circle query + line of sight: первая видимая цель (ближайшая первой)
pub fn sense_target(
    world: &impl CollisionQuery,
    position: Vec2,
    config: &EnemyConfig,
    is_valid: impl Fn(Entity) -> bool,
) -> Option<(Entity, Vec2)> {
    world
        .overlap_circle(position, config.detect_radius, config.target_mask)
        .into_iter()
        .filter(|entity| is_valid(*entity))
        .find_map(|entity| {
            let target_position = world.position_of(entity)?;
            world
                .line_of_sight(position, target_position, config.obstacle_mask)
                .then_some((entity, target_position))
        })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EnemyTask {
    HurtUnlock,
}

#[derive(Component, Debug, Clone)]
pub struct EnemyAIController {
    config: EnemyConfig,
    state: EnemyState,
    spawn_point: Vec2,
    facing: f32,
    target: Option<Entity>,

    patrol_point: Option<Vec2>,
    waiting: bool,
    wait_timer: f32,
    wait_duration: f32,

    attack_cycle: f32,
    volume_enabled: bool,
    activation: u32,
    /// Цели, уже получившие урон в текущей activation
    damaged: HashSet<Entity>,
    hit_guard: HitRecordGuard,

    hurt: bool,
    dying: bool,

    tasks: ScheduledTasks<EnemyTask>,
    pending: Vec<ControllerCommand>,
}

impl EnemyAIController {
    pub fn new(config: EnemyConfig, spawn_point: Vec2) -> Self {
        Self {
            config,
            state: EnemyState::Patrol,
            spawn_point,
            facing: 1.0,
            target: None,
            patrol_point: None,
            waiting: false,
            wait_timer: 0.0,
            wait_duration: 0.0,
            attack_cycle: 0.0,
            volume_enabled: false,
            activation: 0,
            damaged: HashSet::new(),
            hit_guard: HitRecordGuard::new(),
            hurt: false,
            dying: false,
            tasks: ScheduledTasks::new(),
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &EnemyConfig {
        &self.config
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }

    pub fn patrol_point(&self) -> Option<Vec2> {
        self.patrol_point
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Сколько ждём на текущей точке (сэмплируется один раз при прибытии)
    pub fn wait_duration(&self) -> f32 {
        self.wait_duration
    }

    pub fn is_hurt(&self) -> bool {
        self.hurt
    }

    pub fn is_dead(&self) -> bool {
        self.dying
    }

    pub fn hit_volume_enabled(&self) -> bool {
        self.volume_enabled
    }

    pub fn activation(&self) -> u32 {
        self.activation
    }

    /// Один тик AI
    pub fn tick(
        &mut self,
        position: Vec2,
        senses: &EnemySenses,
        dt: f32,
        rng: &mut impl Rng,
    ) -> Vec<ControllerCommand> {
        self.run_tasks(dt);
        if !self.dying && !self.hurt {
            self.select_state(position, senses);
            match self.state {
                EnemyState::Patrol => self.patrol(position, dt, rng),
                EnemyState::Chase => self.chase(position, senses),
                EnemyState::Attack => self.attack(position, senses, dt),
                EnemyState::Hurt | EnemyState::Dead => {}
            }
        }
        self.take_commands()
    }

    pub fn take_commands(&mut self) -> Vec<ControllerCommand> {
        std::mem::take(&mut self.pending)
    }

    fn emit(&mut self, command: ControllerCommand) {
        self.pending.push(command);
    }

    fn run_tasks(&mut self, dt: f32) {
        for task in self.tasks.advance(dt) {
            match task {
                EnemyTask::HurtUnlock => {
                    if self.dying {
                        continue;
                    }
                    self.hurt = false;
                    self.emit(ControllerCommand::SetVelocity(Vec2::ZERO));
                    self.set_state(EnemyState::Patrol);
                }
            }
        }
    }

    fn select_state(&mut self, position: Vec2, senses: &EnemySenses) {
        let next = match senses.target {
            Some((entity, target_position)) => {
                self.target = Some(entity);
                if position.distance(target_position) <= self.config.attack_range {
                    EnemyState::Attack
                } else {
                    EnemyState::Chase
                }
            }
            None => {
                self.target = None;
                EnemyState::Patrol
            }
        };

        if next == EnemyState::Attack && self.state != EnemyState::Attack {
            // Первый удар сразу
            self.attack_cycle = self.config.attack_cooldown;
            self.emit(ControllerCommand::SetVelocity(Vec2::ZERO));
        }
        self.set_state(next);
    }

    fn set_state(&mut self, next: EnemyState) {
        if next == self.state {
            return;
        }
        crate::log(&format!("Enemy: {:?} → {:?}", self.state, next));
        if self.state == EnemyState::Attack {
            self.close_volume();
        }
        self.state = next;
        self.emit(ControllerCommand::SetBool(
            PARAM_IS_PATROLLING,
            next == EnemyState::Patrol,
        ));
        self.emit(ControllerCommand::SetBool(
            PARAM_IS_CHASING,
            next == EnemyState::Chase,
        ));
        self.emit(ControllerCommand::SetBool(
            PARAM_ENEMY_ATTACKING,
            next == EnemyState::Attack,
        ));
    }

    fn face(&mut self, horizontal: f32) {
        if horizontal == 0.0 {
            return;
        }
        let sign = horizontal.signum();
        if sign != self.facing {
            self.facing = sign;
            self.emit(ControllerCommand::SetFacing(sign));
        }
    }

    fn patrol(&mut self, position: Vec2, dt: f32, rng: &mut impl Rng) {
        if self.waiting {
            self.wait_timer += dt;
            if self.wait_timer < self.wait_duration {
                self.emit(ControllerCommand::SetVelocity(Vec2::ZERO));
                return;
            }
            self.waiting = false;
            self.wait_timer = 0.0;
            self.patrol_point = Some(self.pick_patrol_point(position, rng));
        }

        let point = match self.patrol_point {
            Some(point) => point,
            None => {
                let point = self.pick_patrol_point(position, rng);
                self.patrol_point = Some(point);
                point
            }
        };

        let offset = point - position;
        let distance = offset.length();
        if distance <= self.config.arrival_epsilon {
            self.waiting = true;
            self.wait_timer = 0.0;
            let (low, high) = self.config.wait_range();
            self.wait_duration = if low < high {
                rng.gen_range(low..=high)
            } else {
                low
            };
            self.emit(ControllerCommand::SetVelocity(Vec2::ZERO));
            return;
        }

        // Не перелетаем точку за один тик
        let speed = if dt > 0.0 {
            self.config.move_speed.min(distance / dt)
        } else {
            self.config.move_speed
        };
        let direction = offset / distance;
        self.face(direction.x);
        self.emit(ControllerCommand::SetVelocity(direction * speed));
    }

    /// Случайная точка в прямоугольнике патруля, не ближе `min_patrol_distance`
    ///
    /// Если за `PATROL_POINT_ATTEMPTS` попыток подходящей нет (маленькая
    /// область), берётся самая дальняя из кандидатов.
    fn pick_patrol_point(&self, position: Vec2, rng: &mut impl Rng) -> Vec2 {
        let half = self.config.patrol_area.abs() * 0.5;
        let mut farthest = self.spawn_point;
        let mut farthest_distance = f32::NEG_INFINITY;

        for _ in 0..PATROL_POINT_ATTEMPTS {
            let candidate = self.spawn_point
                + Vec2::new(
                    rng.gen_range(-half.x..=half.x),
                    rng.gen_range(-half.y..=half.y),
                );
            let distance = candidate.distance(position);
            if distance >= self.config.min_patrol_distance {
                return candidate;
            }
            if distance > farthest_distance {
                farthest = candidate;
                farthest_distance = distance;
            }
        }

        crate::log(&format!(
            "Enemy: no patrol point {} away from {:?}, using farthest",
            self.config.min_patrol_distance, position
        ));
        farthest
    }

    fn chase(&mut self, position: Vec2, senses: &EnemySenses) {
        let Some((_, target_position)) = senses.target else {
            return;
        };
        let direction = (target_position - position).normalize_or_zero();
        self.face(direction.x);
        self.emit(ControllerCommand::SetVelocity(
            direction * self.config.chase_speed(),
        ));
    }

    fn attack(&mut self, position: Vec2, senses: &EnemySenses, dt: f32) {
        if let Some((_, target_position)) = senses.target {
            self.face(target_position.x - position.x);
        }

        if self.attack_cycle >= self.config.attack_cooldown {
            self.attack_cycle = 0.0;
            crate::log(&format!("Enemy: attack cycle on {:?}", self.target));
        }

        if self.config.attack_window.contains(self.attack_cycle) {
            self.open_volume();
        } else {
            self.close_volume();
        }

        self.attack_cycle += dt;
    }

    fn open_volume(&mut self) {
        if self.volume_enabled {
            return;
        }
        self.volume_enabled = true;
        self.activation = self.activation.wrapping_add(1);
        self.damaged.clear();
        self.emit(ControllerCommand::EnableHitVolume(ENEMY_HIT_VOLUME));
    }

    fn close_volume(&mut self) {
        if !self.volume_enabled {
            return;
        }
        self.volume_enabled = false;
        self.emit(ControllerCommand::DisableHitVolume(ENEMY_HIT_VOLUME));
    }

    fn check_volume_index(index: u8) -> Result<(), GameplayError> {
        if index == ENEMY_HIT_VOLUME {
            Ok(())
        } else {
            Err(GameplayError::InvalidIndex {
                what: "enemy hit volume",
                index: usize::from(index),
                len: 1,
            })
        }
    }

    /// Ручное включение hit volume (animation event). Только в Attack.
    pub fn enable_hit_volume(&mut self, index: u8) -> Result<(), GameplayError> {
        Self::check_volume_index(index)?;
        if !self.dying && self.state == EnemyState::Attack {
            self.open_volume();
        }
        Ok(())
    }

    pub fn disable_hit_volume(&mut self, index: u8) -> Result<(), GameplayError> {
        Self::check_volume_index(index)?;
        if !self.dying {
            self.close_volume();
        }
        Ok(())
    }

    /// Цель вошла в hit volume врага
    ///
    /// Урон засчитывается один раз на цель за activation и не чаще
    /// `hit_cooldown` на пару attacker→target.
    pub fn on_hit_volume_contact(
        &mut self,
        attacker: Entity,
        target: Entity,
        activation: u32,
        now: f32,
    ) -> Option<f32> {
        if self.dying
            || self.state != EnemyState::Attack
            || !self.volume_enabled
            || activation != self.activation
        {
            return None;
        }
        if self.damaged.contains(&target) {
            return None;
        }
        if self
            .hit_guard
            .is_in_cooldown(attacker, target, now, self.config.hit_cooldown)
        {
            return None;
        }

        self.damaged.insert(target);
        self.hit_guard.record_hit(attacker, target, now);
        self.hit_guard.purge_expired(now, self.config.hit_cooldown);
        Some(self.config.attack_damage)
    }

    /// Убрать погибшую / удалённую entity из hit ledgers
    pub fn forget_target(&mut self, entity: Entity) {
        self.damaged.remove(&entity);
        self.hit_guard.forget(entity);
    }

    /// Число живых записей hit cooldown
    pub fn hit_records(&self) -> usize {
        self.hit_guard.len()
    }

    /// takeDamage контракт врага
    ///
    /// Во время hurt lock и после смерти урон игнорируется.
    pub fn take_damage(
        &mut self,
        health: &mut Health,
        amount: f32,
        direction: Vec2,
    ) -> DamageOutcome {
        if self.dying || !health.is_alive() {
            crate::log("Enemy: already dead, damage ignored");
            return DamageOutcome::Ignored;
        }
        if self.hurt {
            return DamageOutcome::Ignored;
        }

        health.take_damage(amount);
        crate::log(&format!("Enemy: took {}, health {}", amount, health.current));

        if health.is_alive() {
            self.enter_hurt(direction);
            DamageOutcome::Damaged
        } else {
            self.die();
            DamageOutcome::Killed
        }
    }

    fn enter_hurt(&mut self, direction: Vec2) {
        self.hurt = true;
        self.set_state(EnemyState::Hurt);
        self.emit(ControllerCommand::SetTrigger(TRIGGER_HURT));
        self.emit(ControllerCommand::SetVelocity(
            direction.normalize_or_zero() * self.config.hurt_force,
        ));
        self.tasks
            .schedule(self.config.hurt_duration, EnemyTask::HurtUnlock);
    }

    fn die(&mut self) {
        self.dying = true;
        self.hurt = false;
        self.set_state(EnemyState::Dead);
        self.close_volume();
        self.hit_guard.clear();

        self.emit(ControllerCommand::SetVelocity(Vec2::ZERO));
        self.emit(ControllerCommand::DisableCollision);
        self.emit(ControllerCommand::SetTrigger(TRIGGER_DIE));
        if let Some(effect) = self.config.death_effect.clone() {
            self.emit(ControllerCommand::SpawnEffect {
                effect,
                offset: Vec2::ZERO,
                lifetime: self.config.death_effect_lifetime,
                mirror_x: self.facing < 0.0,
            });
        }
        self.emit(ControllerCommand::Despawn {
            delay: self.config.death_destroy_delay,
        });
        crate::log_info("Enemy died");
    }
}
