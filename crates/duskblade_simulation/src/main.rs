//! Headless симуляция Duskblade
//!
//! Игрок против двух летающих глаз по скриптованному вводу, без рендера.
//! Первый аргумент: путь к RON конфигу (иначе defaults).

use duskblade_simulation::{
    create_headless_app, run_fixed_tick, spawn_flying_eye, spawn_player, EnemyAIController,
    EntityDied, GameplayConfig, Health, PlayerCombatController, PlayerDefeated, PlayerInput,
    SceneCatalog, SimulationPlugin,
};
use bevy::prelude::*;

const TICKS: u32 = 1200;

fn main() {
    let (config, error) = match std::env::args().nth(1) {
        Some(path) => GameplayConfig::load_or_default(path),
        None => (GameplayConfig::default(), None),
    };
    if let Some(error) = error {
        eprintln!("Config error, using defaults: {}", error);
    }
    for warning in config.validate() {
        eprintln!("Config warning: {}", warning);
    }

    let seed = config.simulation.seed;
    let dt = (1.0 / config.simulation.tick_hz) as f32;
    println!("Starting Duskblade headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.insert_resource(config.clone());
    app.add_plugins(SimulationPlugin);

    let player = spawn_player(app.world_mut(), Vec2::ZERO, &config);
    spawn_flying_eye(app.world_mut(), Vec2::new(4.0, 0.5), &config.enemy);
    spawn_flying_eye(app.world_mut(), Vec2::new(-6.0, 2.0), &config.enemy);

    let mut kills = 0;
    let mut defeated = false;

    for tick in 0..TICKS {
        script_input(app.world_mut(), player, tick);
        run_fixed_tick(&mut app, dt);

        let world = app.world();
        kills += world
            .resource::<Events<EntityDied>>()
            .iter_current_update_events()
            .filter(|died| died.entity != player)
            .count();
        defeated |= world
            .resource::<Events<PlayerDefeated>>()
            .iter_current_update_events()
            .next()
            .is_some();
        app.world_mut().resource_mut::<Events<EntityDied>>().update();
        app.world_mut().resource_mut::<Events<PlayerDefeated>>().update();

        if tick % 120 == 0 {
            report(&mut app, player, tick);
        }
        if defeated {
            println!("Tick {}: player defeated", tick);
            break;
        }
    }

    report(&mut app, player, TICKS);
    println!(
        "Simulation complete! kills: {}, scene: {:?}",
        kills,
        app.world().resource::<SceneCatalog>().active_scene()
    );
}

/// Ходим вправо-влево, бьём каждые полсекунды, кастуем скиллы
fn script_input(world: &mut World, player: Entity, tick: u32) {
    let Some(mut input) = world.get_mut::<PlayerInput>(player) else {
        return;
    };
    let phase = (tick / 180) % 2;
    input.horizontal = if phase == 0 { 1.0 } else { -1.0 };
    input.vertical = 0.0;
    if tick % 30 == 0 {
        input.press_attack();
    }
    if tick % 240 == 60 {
        input.press_skill(0);
    }
    if tick % 240 == 180 {
        input.press_skill(1);
    }
    if tick == 600 {
        input.press_drink();
    }
}

fn report(app: &mut App, player: Entity, tick: u32) {
    let world = app.world_mut();
    let health = world
        .get::<Health>(player)
        .map(|health| health.current)
        .unwrap_or(0.0);
    let combo = world
        .get::<PlayerCombatController>(player)
        .map(|controller| controller.combo_step())
        .unwrap_or(0);
    let enemies = world
        .query::<&EnemyAIController>()
        .iter(world)
        .filter(|enemy| !enemy.is_dead())
        .count();
    println!(
        "Tick {}: player hp {:.0}, combo {}, enemies alive {}, entities {}",
        tick,
        health,
        combo,
        enemies,
        world.entities().len()
    );
}
