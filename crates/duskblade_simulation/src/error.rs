//! Gameplay error taxonomy.
//!
//! Nothing here is fatal: systems log the error and degrade to a no-op
//! (or reset in-flight state, for scene loads).

use bevy::prelude::Entity;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameplayError {
    /// A required companion component or resource is absent.
    #[error("{}", describe_missing(.entity, .dependency))]
    MissingDependency {
        entity: Option<Entity>,
        dependency: &'static str,
    },
    /// Skill slot / hit-volume index outside the configured range.
    #[error("{what} index {index} out of range (configured: {len})")]
    InvalidIndex {
        what: &'static str,
        index: usize,
        len: usize,
    },
    /// Target scene is not part of the scene catalog.
    #[error("failed to load scene '{scene}': {reason}")]
    SceneLoadFailure { scene: String, reason: String },
    /// Configuration could not be read or parsed.
    #[error("config: {0}")]
    Config(String),
}

fn describe_missing(entity: &Option<Entity>, dependency: &str) -> String {
    match entity {
        Some(entity) => format!("{:?} is missing required {}", entity, dependency),
        None => format!("missing required {}", dependency),
    }
}

impl GameplayError {
    pub fn missing(entity: Entity, dependency: &'static str) -> Self {
        Self::MissingDependency {
            entity: Some(entity),
            dependency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = GameplayError::InvalidIndex {
            what: "skill slot",
            index: 4,
            len: 2,
        };
        assert_eq!(err.to_string(), "skill slot index 4 out of range (configured: 2)");

        let err = GameplayError::SceneLoadFailure {
            scene: "Level3".into(),
            reason: "not in catalog".into(),
        };
        assert!(err.to_string().contains("Level3"));

        let err = GameplayError::MissingDependency {
            entity: None,
            dependency: "CollisionWorld",
        };
        assert_eq!(err.to_string(), "missing required CollisionWorld");

        let entity = Entity::from_raw(7);
        let err = GameplayError::missing(entity, "Collider");
        assert_eq!(
            err.to_string(),
            format!("{:?} is missing required Collider", entity)
        );
    }

    #[test]
    fn test_is_std_error() {
        fn as_std(err: &GameplayError) -> &dyn std::error::Error {
            err
        }
        let err = GameplayError::Config("bad ron".into());
        assert_eq!(as_std(&err).to_string(), "config: bad ron");
        assert!(as_std(&err).source().is_none());
    }
}
