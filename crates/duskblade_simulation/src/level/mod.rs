//! Level module: каталог сцен + порталы перехода

use bevy::prelude::*;

pub mod catalog;
pub mod portal;

// Re-export основных типов
pub use catalog::SceneCatalog;
pub use portal::{LevelPortal, PortalEvent, PortalTarget};

use crate::components::{planar_position, AnimationParams, TRIGGER_TRANSITION_START};
use crate::config::GameplayConfig;
use crate::error::GameplayError;
use crate::physics::{CollisionQuery, CollisionWorld};
use crate::SimulationSet;

/// Сцена сменилась (host грузит ассеты)
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SceneLoaded {
    pub scene: String,
    pub portal: Entity,
}

/// Level Plugin
///
/// SceneCatalog берётся из `GameplayConfig::scenes`, если host не
/// вставил свой до plugin.
pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<SceneCatalog>() {
            let scenes = app
                .world()
                .get_resource::<GameplayConfig>()
                .map(|config| config.scenes.clone())
                .unwrap_or_default();
            app.insert_resource(SceneCatalog::new(scenes));
        }

        app.add_event::<SceneLoaded>().add_systems(
            FixedUpdate,
            tick_level_portals.in_set(SimulationSet::LevelFlow),
        );
    }
}

/// Система: вход в зону портала → отложенный переход → SceneLoaded
pub fn tick_level_portals(
    world: Res<CollisionWorld>,
    mut catalog: ResMut<SceneCatalog>,
    mut portals: Query<(
        Entity,
        &Transform,
        &mut LevelPortal,
        Option<&mut AnimationParams>,
    )>,
    mut loaded: EventWriter<SceneLoaded>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, transform, mut portal, mut animation) in portals.iter_mut() {
        let inside = world.overlap_box(
            planar_position(transform),
            portal.half_size,
            portal.trigger_mask,
        );
        if portal.update_occupants(inside) {
            crate::log_info(&format!(
                "Portal {:?} triggered, transition in {}s",
                entity, portal.trigger_delay
            ));
        }

        for event in portal.advance(delta, &mut catalog) {
            match event {
                PortalEvent::TransitionStarted => match animation.as_deref_mut() {
                    Some(params) => params.set_trigger(TRIGGER_TRANSITION_START),
                    None => crate::log_warning(
                        &GameplayError::missing(entity, "transition AnimationParams").to_string(),
                    ),
                },
                PortalEvent::Loaded(scene) => {
                    crate::log_info(&format!("Portal {:?} loaded scene '{}'", entity, scene));
                    loaded.write(SceneLoaded {
                        scene,
                        portal: entity,
                    });
                }
                PortalEvent::Failed(err) => {
                    crate::log_error(&format!("Portal {:?}: {}", entity, err));
                }
            }
        }
    }
}

/// Spawn helper для портала (с AnimationParams для transition trigger)
pub fn spawn_level_portal(world: &mut World, position: Vec2, portal: LevelPortal) -> Entity {
    world
        .spawn((
            Transform::from_translation(position.extend(0.0)),
            AnimationParams::default(),
            portal,
        ))
        .id()
}
