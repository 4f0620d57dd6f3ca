//! Duskblade Simulation Core
//!
//! Gameplay ядро 2D action игры на Bevy ECS 0.16 (headless).
//!
//! - Player: движение, питьё зелья, трёхударное комбо, hit flash + invincibility
//! - AI: летающий глаз (patrol / chase / attack / hurt / dead)
//! - Skills: кулдауны, cast delay, area / box-cast урон
//! - Level: порталы и каталог сцен
//!
//! Рендер, звук, анимации и загрузка ассетов: на стороне host: симуляция
//! только пишет AnimationParams / SpriteTint и шлёт события запросов.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod commands;
pub mod components;
pub mod config;
pub mod error;
pub mod level;
pub mod logger;
pub mod physics;
pub mod player;
pub mod skills;
pub mod timers;

// Re-export базовых типов для удобства
pub use ai::{spawn_flying_eye, AIPlugin, EnemyAIController, EnemyConfig, EnemyState};
pub use combat::{
    CombatPlugin, DamageDealt, DamageOutcome, DamageRequest, Dead, DespawnAfter,
    EffectSpawnRequested, EntityDied, HitRecordGuard, HitShape, HitVolume, SoundRequested,
};
pub use commands::{ControllerCommand, HostOutbox};
pub use components::*;
pub use config::{GameplayConfig, SimulationConfig};
pub use error::GameplayError;
pub use level::{LevelPlugin, LevelPortal, SceneCatalog, SceneLoaded};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};
pub use physics::{CollisionQuery, CollisionWorld};
pub use player::{
    spawn_player, PlayerCombatController, PlayerConfig, PlayerDefeated, PlayerInput, PlayerPlugin,
    PlayerState,
};
pub use skills::{SkillCastScheduler, SkillCaster, SkillData, SkillShape, SkillsPlugin};
pub use timers::ScheduledTasks;

/// Фазы fixed тика (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// CollisionWorld snapshot
    Sense,
    PlayerControl,
    SkillCast,
    EnemyControl,
    LevelFlow,
    /// Toggle → facing sync → overlap scan
    HitDetection,
    /// HitVolumeContact → DamageRequest
    HitResolution,
    /// DamageRequest → Health
    Damage,
    Movement,
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Ресурсы, вставленные до plugin (GameplayConfig, DeterministicRng),
/// не перезаписываются.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameplayConfig>();

        let simulation = app.world().resource::<GameplayConfig>().simulation.clone();

        // Fixed timestep для simulation tick
        app.insert_resource(Time::<Fixed>::from_hz(simulation.tick_hz));

        // Детерминистичный RNG (seed из конфига, если тест не задал свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(simulation.seed));
        }

        app.init_resource::<CollisionWorld>();

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Sense,
                SimulationSet::PlayerControl,
                SimulationSet::SkillCast,
                SimulationSet::EnemyControl,
                SimulationSet::LevelFlow,
                SimulationSet::HitDetection,
                SimulationSet::HitResolution,
                SimulationSet::Damage,
                SimulationSet::Movement,
                SimulationSet::Cleanup,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            physics::rebuild_collision_world.in_set(SimulationSet::Sense),
        )
        .add_systems(
            FixedUpdate,
            physics::integrate_velocity.in_set(SimulationSet::Movement),
        );

        // Подсистемы
        app.add_plugins((CombatPlugin, PlayerPlugin, SkillsPlugin, AIPlugin, LevelPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Gameplay plugins не добавляются: `app.add_plugins(SimulationPlugin)`.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0));

    app
}

/// Один fixed тик длиной `dt` секунд
///
/// Двигает `Time<Fixed>` вручную и запускает FixedUpdate, без wall clock.
/// Так тесты и headless demo не зависят от реального времени.
pub fn run_fixed_tick(app: &mut App, dt: f32) {
    let world = app.world_mut();
    world.flush();
    world
        .resource_mut::<Time<Fixed>>()
        .advance_by(Duration::from_secs_f32(dt.max(0.0)));
    world.run_schedule(FixedUpdate);
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
