//! Tests for PlayerCombatController (без ECS, чистый tick)

#[cfg(test)]
mod tests {
    use crate::combat::DamageOutcome;
    use crate::commands::ControllerCommand;
    use crate::components::Health;
    use crate::error::GameplayError;
    use crate::player::{PlayerCombatController, PlayerConfig, PlayerInput, PlayerState};
    use bevy::prelude::*;

    const DT: f32 = 0.125;

    struct Harness {
        controller: PlayerCombatController,
        now: f32,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                controller: PlayerCombatController::new(PlayerConfig::default()),
                now: 0.0,
            }
        }

        fn tick(&mut self, input: &PlayerInput) -> Vec<ControllerCommand> {
            self.now += DT;
            self.controller.tick(input, DT, self.now)
        }

        fn idle(&mut self) -> Vec<ControllerCommand> {
            self.tick(&PlayerInput::default())
        }

        fn attack(&mut self) -> Vec<ControllerCommand> {
            let mut input = PlayerInput::default();
            input.press_attack();
            self.tick(&input)
        }

        fn drink(&mut self) -> Vec<ControllerCommand> {
            let mut input = PlayerInput::default();
            input.press_drink();
            self.tick(&input)
        }
    }

    #[test]
    fn test_combo_climbs_to_three_then_resets() {
        let mut h = Harness::new();
        let mut steps = Vec::new();

        for _ in 0..13 {
            h.attack();
            steps.push(h.controller.combo_step());
        }

        // Каждый swing длится 4 тика, нажатие во время swing игнорируется
        assert_eq!(steps, vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 0, 1]);
        assert!(steps.iter().all(|step| *step <= 3));
        assert!(steps.windows(2).all(|w| w[1] <= w[0] + 1));
    }

    #[test]
    fn test_combo_times_out_when_idle() {
        let mut h = Harness::new();
        h.attack();
        for _ in 0..5 {
            h.idle();
        }
        // Swing закончился на 4-м тике, ещё 0.5 с простоя сбросили комбо
        assert_eq!(h.controller.combo_step(), 1);
        h.idle();
        assert_eq!(h.controller.combo_step(), 0);

        h.attack();
        assert_eq!(h.controller.combo_step(), 1);
    }

    #[test]
    fn test_second_press_within_timeout_continues_combo() {
        let mut h = Harness::new();
        h.attack();
        for _ in 0..3 {
            h.idle();
        }
        h.attack();
        assert_eq!(h.controller.combo_step(), 2);
        assert_eq!(h.controller.state(), PlayerState::Attacking { step: 2 });
    }

    #[test]
    fn test_swing_opens_and_closes_hit_volume() {
        let mut h = Harness::new();
        let first = h.attack();
        assert!(first.contains(&ControllerCommand::EnableHitVolume(1)));
        assert!(first.contains(&ControllerCommand::SetVelocity(Vec2::ZERO)));
        assert_eq!(h.controller.active_hit_volume(), Some(1));

        h.idle();
        h.idle();
        let last = h.idle();
        assert!(last.contains(&ControllerCommand::DisableHitVolume(1)));
        assert_eq!(h.controller.active_hit_volume(), None);
        assert!(!h.controller.is_attacking());
    }

    #[test]
    fn test_drink_preempts_combo_and_blocks_attack() {
        let mut h = Harness::new();
        h.attack();
        assert_eq!(h.controller.combo_step(), 1);

        let commands = h.drink();
        assert!(h.controller.is_drinking());
        assert_eq!(h.controller.combo_step(), 0);
        assert_eq!(h.controller.state(), PlayerState::Drinking);
        assert!(commands.contains(&ControllerCommand::DisableHitVolume(1)));

        h.attack();
        assert!(h.controller.is_drinking());
        assert_eq!(h.controller.combo_step(), 0);

        // 0.375 с истекли: питьё закончилось, этот же тик уже обычный
        h.tick(&PlayerInput::with_axes(1.0, 0.0));
        assert!(!h.controller.is_drinking());
        assert_eq!(h.controller.state(), PlayerState::Moving);
    }

    #[test]
    fn test_movement_is_normalized() {
        let mut h = Harness::new();
        let commands = h.tick(&PlayerInput::with_axes(1.0, 1.0));

        let velocity = commands
            .iter()
            .find_map(|command| match command {
                ControllerCommand::SetVelocity(v) => Some(*v),
                _ => None,
            })
            .unwrap();
        assert!((velocity.length() - 5.0).abs() < 1e-4);
        assert!((velocity.x - velocity.y).abs() < 1e-6);
        assert_eq!(h.controller.state(), PlayerState::Moving);

        h.idle();
        assert_eq!(h.controller.state(), PlayerState::Idle);
    }

    #[test]
    fn test_facing_persists_without_horizontal_input() {
        let mut h = Harness::new();
        let commands = h.tick(&PlayerInput::with_axes(-0.3, 0.0));
        assert!(commands.contains(&ControllerCommand::SetFacing(-1.0)));
        assert_eq!(h.controller.facing(), -1.0);

        let commands = h.tick(&PlayerInput::with_axes(0.0, 1.0));
        assert_eq!(h.controller.facing(), -1.0);
        assert!(!commands
            .iter()
            .any(|command| matches!(command, ControllerCommand::SetFacing(_))));
    }

    #[test]
    fn test_invincibility_blocks_damage_but_not_input() {
        let mut h = Harness::new();
        let mut health = Health::new(100.0);

        assert_eq!(
            h.controller.take_damage(&mut health, 10.0),
            DamageOutcome::Damaged
        );
        assert_eq!(health.current, 90.0);
        assert!(h.controller.is_invincible());

        for _ in 0..3 {
            assert_eq!(
                h.controller.take_damage(&mut health, 25.0),
                DamageOutcome::Ignored
            );
        }
        assert_eq!(health.current, 90.0);

        // Flash начинается сразу, ввод обрабатывается
        let commands = h.attack();
        assert!(commands.contains(&ControllerCommand::SetSpriteAlpha(0.3)));
        assert_eq!(h.controller.combo_step(), 1);

        // flash_count × 2 × single_flash = 0.6 с
        for _ in 0..3 {
            h.idle();
        }
        assert!(h.controller.is_invincible());
        let commands = h.idle();
        assert!(!h.controller.is_invincible());
        assert!(commands.contains(&ControllerCommand::SetSpriteAlpha(1.0)));

        h.controller.take_damage(&mut health, 15.0);
        assert_eq!(health.current, 75.0);
    }

    #[test]
    fn test_lethal_damage_clamps_and_schedules_game_over() {
        let mut h = Harness::new();
        let mut health = Health::new(100.0);

        assert_eq!(
            h.controller.take_damage(&mut health, 250.0),
            DamageOutcome::Killed
        );
        assert_eq!(health.current, 0.0);
        assert!(h.controller.is_dead());
        assert_eq!(
            h.controller.take_damage(&mut health, 5.0),
            DamageOutcome::Ignored
        );

        // Мёртвый игрок не двигается
        for _ in 0..3 {
            let commands = h.tick(&PlayerInput::with_axes(1.0, 0.0));
            assert!(!commands.iter().any(|command| matches!(
                command,
                ControllerCommand::SetVelocity(v) if *v != Vec2::ZERO
            )));
            assert!(!h.controller.take_game_over());
        }

        h.idle();
        assert!(h.controller.take_game_over());
        assert!(!h.controller.take_game_over());
    }

    #[test]
    fn test_hit_volume_index_out_of_range() {
        let mut h = Harness::new();

        assert_eq!(
            h.controller.enable_hit_volume(0),
            Err(GameplayError::InvalidIndex {
                what: "player hit volume",
                index: 0,
                len: 3,
            })
        );
        assert!(h.controller.disable_hit_volume(4).is_err());
        assert!(h.controller.take_commands().is_empty());

        assert!(h.controller.enable_hit_volume(2).is_ok());
        assert_eq!(h.controller.active_hit_volume(), Some(2));
        assert_eq!(
            h.controller.take_commands(),
            vec![ControllerCommand::EnableHitVolume(2)]
        );

        assert!(h.controller.disable_hit_volume(2).is_ok());
        assert_eq!(h.controller.active_hit_volume(), None);
    }

    #[test]
    fn test_register_hit_uses_step_damage_and_pair_cooldown() {
        let mut h = Harness::new();
        let player = Entity::from_raw(1);
        let eye = Entity::from_raw(2);
        let other = Entity::from_raw(3);

        assert_eq!(h.controller.register_hit(player, eye, 1, 0, 0.0), None);

        h.attack();
        assert_eq!(h.controller.active_hit_volume(), Some(1));
        assert_eq!(h.controller.activation(1), 1);
        assert_eq!(h.controller.register_hit(player, eye, 1, 1, 0.125), Some(1.0));
        assert_eq!(h.controller.register_hit(player, eye, 1, 1, 0.15), None);
        assert_eq!(h.controller.register_hit(player, other, 1, 1, 0.15), Some(1.0));

        for _ in 0..4 {
            h.attack();
        }
        assert_eq!(h.controller.combo_step(), 2);
        assert_eq!(h.controller.active_hit_volume(), Some(2));
        assert_eq!(h.controller.register_hit(player, eye, 2, 1, 1.0), Some(2.0));
    }

    #[test]
    fn test_register_hit_once_per_activation_even_after_cooldown() {
        let mut h = Harness::new();
        let player = Entity::from_raw(1);
        let eye = Entity::from_raw(2);

        h.attack();
        assert_eq!(h.controller.register_hit(player, eye, 1, 1, 0.125), Some(1.0));
        // Цель вышла и вернулась в тот же swing: cooldown уже истёк
        assert_eq!(h.controller.register_hit(player, eye, 1, 1, 0.375), None);

        // Contact от чужого volume или устаревшей activation
        assert_eq!(h.controller.register_hit(player, eye, 2, 1, 0.375), None);
        assert_eq!(h.controller.register_hit(player, eye, 1, 0, 0.375), None);

        // Ручное переоткрытие volume: новая activation
        assert!(h.controller.disable_hit_volume(1).is_ok());
        assert!(h.controller.enable_hit_volume(1).is_ok());
        assert_eq!(h.controller.activation(1), 2);
        assert_eq!(h.controller.register_hit(player, eye, 1, 2, 0.375), Some(1.0));
    }

    #[test]
    fn test_forget_target_clears_hit_ledgers() {
        let mut h = Harness::new();
        let player = Entity::from_raw(1);
        let eye = Entity::from_raw(2);
        let other = Entity::from_raw(3);

        h.attack();
        assert_eq!(h.controller.register_hit(player, eye, 1, 1, 0.125), Some(1.0));
        assert_eq!(h.controller.register_hit(player, other, 1, 1, 0.125), Some(1.0));
        assert_eq!(h.controller.hit_records(), 2);

        h.controller.forget_target(eye);
        assert_eq!(h.controller.hit_records(), 1);
        // Entity id переиспользован: новая цель с тем же id не заблокирована
        assert_eq!(h.controller.register_hit(player, eye, 1, 1, 0.15), Some(1.0));
        assert_eq!(h.controller.register_hit(player, other, 1, 1, 0.15), None);
    }
}
