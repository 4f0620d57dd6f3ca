//! Player control marker component
//!
//! Отмечает entity которым управляет игрок через input (в отличие от AI).

use bevy::prelude::*;

/// Marker component для player-controlled entity
///
/// - AI/skill target queries ищут игрока по `LAYER_PLAYER` + этому маркеру
/// - Input systems используют `With<Player>` filter
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;
