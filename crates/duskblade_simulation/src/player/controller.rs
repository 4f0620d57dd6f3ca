//! PlayerCombatController: movement / drink / 3-hit combo state machine
//!
//! Приоритеты: Drinking > Attacking > Moving/Idle. Более приоритетное
//! состояние при входе сбрасывает менее приоритетные.
//!
//! Контроллер ничего не знает про ECS: `tick` получает input snapshot и
//! возвращает список `ControllerCommand` для host. Hit flash, invincibility
//! и game over: отложенные задачи в `ScheduledTasks`, они идут параллельно
//! state machine и никогда её не блокируют.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::combat::{DamageOutcome, HitRecordGuard};
use crate::commands::ControllerCommand;
use crate::components::{
    Health, PARAM_ATTACK_COMBO_COUNT, PARAM_HORIZONTAL, PARAM_IS_ATTACKING, PARAM_IS_DRINKING,
    PARAM_IS_MOVING, PARAM_VERTICAL,
};
use crate::error::GameplayError;
use crate::player::{PlayerConfig, PlayerInput};
use crate::timers::ScheduledTasks;

/// Последний шаг комбо
pub const MAX_COMBO_STEP: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum PlayerState {
    #[default]
    Idle,
    Moving,
    Drinking,
    /// Идёт удар комбо `step` (1..=3)
    Attacking { step: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PlayerTask {
    /// Прозрачность спрайта (hit flash)
    Flash(f32),
    EndInvincibility,
    GameOver,
}

#[derive(Component, Debug, Clone)]
pub struct PlayerCombatController {
    config: PlayerConfig,
    state: PlayerState,
    facing: f32,

    drinking: bool,
    drink_timer: f32,

    attacking: bool,
    combo_step: u8,
    attack_timer: f32,
    /// Время простоя между ударами (тикает только вне swing)
    combo_idle_timer: f32,
    active_volume: Option<u8>,
    /// Счётчик activation для каждого volume (1..=3), синхронен с `HitVolume`
    activations: [u32; MAX_COMBO_STEP as usize],
    /// Цели, уже получившие урон в текущей activation
    damaged: HashSet<Entity>,

    invincible: bool,
    dead: bool,
    game_over_pending: bool,

    hit_guard: HitRecordGuard,
    tasks: ScheduledTasks<PlayerTask>,
    pending: Vec<ControllerCommand>,
}

impl Default for PlayerCombatController {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

impl PlayerCombatController {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            state: PlayerState::Idle,
            facing: 1.0,
            drinking: false,
            drink_timer: 0.0,
            attacking: false,
            combo_step: 0,
            attack_timer: 0.0,
            combo_idle_timer: 0.0,
            active_volume: None,
            activations: [0; MAX_COMBO_STEP as usize],
            damaged: HashSet::new(),
            invincible: false,
            dead: false,
            game_over_pending: false,
            hit_guard: HitRecordGuard::new(),
            tasks: ScheduledTasks::new(),
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn combo_step(&self) -> u8 {
        self.combo_step
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn is_drinking(&self) -> bool {
        self.drinking
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Hit volume, включённый сейчас (1..=3)
    pub fn active_hit_volume(&self) -> Option<u8> {
        self.active_volume
    }

    /// Номер последней activation volume `index` (0, если он не включался)
    pub fn activation(&self, index: u8) -> u32 {
        index
            .checked_sub(1)
            .and_then(|i| self.activations.get(usize::from(i)).copied())
            .unwrap_or(0)
    }

    /// Один тик state machine
    pub fn tick(&mut self, input: &PlayerInput, dt: f32, now: f32) -> Vec<ControllerCommand> {
        self.run_tasks(dt);
        if !self.dead {
            self.step(input, dt, now);
        }
        self.take_commands()
    }

    /// Команды, накопленные вне `tick` (take_damage, ручной toggle volume)
    pub fn take_commands(&mut self) -> Vec<ControllerCommand> {
        std::mem::take(&mut self.pending)
    }

    /// Game over наступил (`game_over_delay` после смерти). Флаг читается один раз.
    pub fn take_game_over(&mut self) -> bool {
        std::mem::replace(&mut self.game_over_pending, false)
    }

    fn emit(&mut self, command: ControllerCommand) {
        self.pending.push(command);
    }

    fn run_tasks(&mut self, dt: f32) {
        for task in self.tasks.advance(dt) {
            match task {
                PlayerTask::Flash(alpha) => self.emit(ControllerCommand::SetSpriteAlpha(alpha)),
                PlayerTask::EndInvincibility => {
                    self.invincible = false;
                    crate::log("Player: invincibility ended");
                }
                PlayerTask::GameOver => self.game_over_pending = true,
            }
        }
    }

    fn step(&mut self, input: &PlayerInput, dt: f32, now: f32) {
        // 1. Facing: меняется только при ненулевом горизонтальном вводе
        if input.horizontal != 0.0 {
            let sign = input.horizontal.signum();
            if sign != self.facing {
                self.facing = sign;
                self.emit(ControllerCommand::SetFacing(sign));
            }
        }
        self.emit(ControllerCommand::SetFloat(PARAM_HORIZONTAL, self.facing));

        // 2. Drink (высший приоритет)
        if input.drink_pressed && !self.drinking {
            self.enter_drink();
        }
        if self.drinking {
            self.drink_timer += dt;
            if self.drink_timer >= self.config.drink_duration {
                self.exit_drink();
            } else {
                self.state = PlayerState::Drinking;
                self.hold_still();
                return;
            }
        }

        // 3. Attack combo
        if input.attack_pressed && !self.attacking && self.combo_step < MAX_COMBO_STEP {
            self.enter_swing();
        }
        if self.attacking {
            self.attack_timer += dt;
            self.update_hit_window(dt);
            if self.attack_timer >= self.config.attack_duration {
                self.exit_swing();
            }
        }

        if self.combo_step > 0 && !self.attacking {
            self.combo_idle_timer += dt;
            if self.combo_idle_timer >= self.config.combo_timeout {
                crate::log(&format!(
                    "Player: combo timed out at step {}",
                    self.combo_step
                ));
                self.reset_combo();
            }
        } else {
            self.combo_idle_timer = 0.0;
        }

        if self.attacking {
            self.state = PlayerState::Attacking {
                step: self.combo_step,
            };
            self.hold_still();
            self.emit(ControllerCommand::SetFloat(
                PARAM_ATTACK_COMBO_COUNT,
                f32::from(self.combo_step),
            ));
            return;
        }

        // 4. Movement
        let moving = input.horizontal != 0.0 || input.vertical != 0.0;
        let velocity = Vec2::new(input.horizontal, input.vertical).normalize_or_zero()
            * self.config.move_speed;

        self.state = if moving {
            PlayerState::Moving
        } else {
            PlayerState::Idle
        };
        self.emit(ControllerCommand::SetVelocity(velocity));
        self.emit(ControllerCommand::SetFloat(
            PARAM_VERTICAL,
            if moving { input.vertical } else { 0.0 },
        ));
        self.emit(ControllerCommand::SetBool(PARAM_IS_MOVING, moving));
        self.emit(ControllerCommand::SetBool(PARAM_IS_DRINKING, false));
        self.emit(ControllerCommand::SetBool(PARAM_IS_ATTACKING, false));
        self.emit(ControllerCommand::SetFloat(
            PARAM_ATTACK_COMBO_COUNT,
            f32::from(self.combo_step),
        ));

        self.hit_guard.purge_expired(now, self.config.hit_cooldown);
    }

    fn hold_still(&mut self) {
        self.emit(ControllerCommand::SetVelocity(Vec2::ZERO));
        self.emit(ControllerCommand::SetBool(PARAM_IS_MOVING, false));
    }

    fn enter_drink(&mut self) {
        // Питьё прерывает комбо
        self.reset_combo();
        self.drinking = true;
        self.drink_timer = 0.0;
        self.emit(ControllerCommand::SetBool(PARAM_IS_DRINKING, true));
        crate::log("Player: drinking");
    }

    fn exit_drink(&mut self) {
        self.drinking = false;
        self.drink_timer = 0.0;
        self.emit(ControllerCommand::SetBool(PARAM_IS_DRINKING, false));
    }

    fn enter_swing(&mut self) {
        self.combo_step += 1;
        self.attacking = true;
        self.attack_timer = 0.0;
        self.combo_idle_timer = 0.0;
        self.emit(ControllerCommand::SetBool(PARAM_IS_ATTACKING, true));
        crate::log(&format!("Player: combo step {}", self.combo_step));
    }

    fn exit_swing(&mut self) {
        self.attacking = false;
        self.attack_timer = 0.0;
        self.close_active_volume();
        self.emit(ControllerCommand::SetBool(PARAM_IS_ATTACKING, false));

        if self.combo_step >= MAX_COMBO_STEP {
            self.reset_combo();
        }
    }

    fn reset_combo(&mut self) {
        self.attacking = false;
        self.combo_step = 0;
        self.attack_timer = 0.0;
        self.combo_idle_timer = 0.0;
        self.close_active_volume();
        self.hit_guard.clear();
        self.emit(ControllerCommand::SetBool(PARAM_IS_ATTACKING, false));
        self.emit(ControllerCommand::SetFloat(PARAM_ATTACK_COMBO_COUNT, 0.0));
    }

    /// Timeline markers текущего удара
    ///
    /// Volume включается, когда swing timer пересёк `start` (и окно ещё
    /// не прошло целиком), выключается не раньше следующего тика после `end`.
    fn update_hit_window(&mut self, dt: f32) {
        let step = self.combo_step;
        let Some(window) = step
            .checked_sub(1)
            .and_then(|i| self.config.hit_windows.get(usize::from(i)).copied())
        else {
            return;
        };

        let previous = self.attack_timer - dt;
        if self.active_volume.is_none() {
            if self.attack_timer >= window.start && previous < window.end {
                self.open_volume(step);
            }
        } else if self.attack_timer >= window.end {
            self.close_active_volume();
        }
    }

    fn open_volume(&mut self, index: u8) {
        if self.active_volume == Some(index) {
            return;
        }
        self.close_active_volume();
        if let Some(slot) = index
            .checked_sub(1)
            .and_then(|i| self.activations.get_mut(usize::from(i)))
        {
            *slot = slot.wrapping_add(1);
        }
        self.active_volume = Some(index);
        self.damaged.clear();
        self.emit(ControllerCommand::EnableHitVolume(index));
    }

    fn close_active_volume(&mut self) {
        if let Some(index) = self.active_volume.take() {
            self.emit(ControllerCommand::DisableHitVolume(index));
        }
    }

    fn check_volume_index(index: u8) -> Result<(), GameplayError> {
        if (1..=MAX_COMBO_STEP).contains(&index) {
            Ok(())
        } else {
            Err(GameplayError::InvalidIndex {
                what: "player hit volume",
                index: usize::from(index),
                len: usize::from(MAX_COMBO_STEP),
            })
        }
    }

    /// Ручное включение hit volume (1..=3), как animation event
    pub fn enable_hit_volume(&mut self, index: u8) -> Result<(), GameplayError> {
        Self::check_volume_index(index)?;
        self.open_volume(index);
        Ok(())
    }

    pub fn disable_hit_volume(&mut self, index: u8) -> Result<(), GameplayError> {
        Self::check_volume_index(index)?;
        if self.active_volume == Some(index) {
            self.close_active_volume();
        } else {
            self.emit(ControllerCommand::DisableHitVolume(index));
        }
        Ok(())
    }

    /// Цель вошла в hit volume игрока
    ///
    /// Возвращает урон текущего шага комбо, если удар засчитан: идёт swing,
    /// contact пришёл от активной activation volume `index`, цель ещё не
    /// получала урон в этой activation и пара attacker→target не в hit cooldown.
    pub fn register_hit(
        &mut self,
        attacker: Entity,
        target: Entity,
        index: u8,
        activation: u32,
        now: f32,
    ) -> Option<f32> {
        if self.dead
            || !self.attacking
            || self.active_volume != Some(index)
            || activation != self.activation(index)
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

        let damage = self.config.damage_for_step(self.combo_step);
        self.damaged.insert(target);
        self.hit_guard.record_hit(attacker, target, now);
        crate::log(&format!(
            "Player: combo step {} hit {:?} for {}",
            self.combo_step, target, damage
        ));
        Some(damage)
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

    /// takeDamage контракт игрока
    ///
    /// Пока активна invincibility, урон игнорируется полностью.
    /// Flash и invincibility не трогают state machine (ввод обрабатывается).
    pub fn take_damage(&mut self, health: &mut Health, amount: f32) -> DamageOutcome {
        if self.dead || !health.is_alive() {
            return DamageOutcome::Ignored;
        }
        if self.invincible {
            crate::log("Player: invincible, damage ignored");
            return DamageOutcome::Ignored;
        }

        health.take_damage(amount);
        self.start_hit_flash();

        if health.is_alive() {
            DamageOutcome::Damaged
        } else {
            self.die();
            DamageOutcome::Killed
        }
    }

    fn start_hit_flash(&mut self) {
        let flash = self.config.single_flash_duration;
        for i in 0..self.config.flash_count {
            let start = flash * 2.0 * i as f32;
            self.tasks
                .schedule(start, PlayerTask::Flash(self.config.flash_alpha));
            self.tasks.schedule(start + flash, PlayerTask::Flash(1.0));
        }

        let total = self.config.invincibility_duration();
        self.tasks.schedule(total, PlayerTask::Flash(1.0));
        self.tasks.schedule(total, PlayerTask::EndInvincibility);
        self.invincible = true;
    }

    fn die(&mut self) {
        self.dead = true;
        self.drinking = false;
        self.reset_combo();
        self.state = PlayerState::Idle;
        self.hold_still();
        self.tasks
            .schedule(self.config.game_over_delay, PlayerTask::GameOver);
        crate::log_info("Player died");
    }
}
