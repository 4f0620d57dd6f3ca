//! Gameplay configuration (RON)
//!
//! Каждая секция имеет `#[serde(default)]`, так что RON файл может
//! переопределять только нужные поля. Ошибки валидации не фатальны:
//! `validate` возвращает список предупреждений.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::ai::EnemyConfig;
use crate::error::GameplayError;
use crate::player::PlayerConfig;
use crate::skills::SkillData;

/// Fixed tick + seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_hz: f64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            seed: 42,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    pub simulation: SimulationConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    /// Слоты скиллов игрока (порядок = номер слота)
    pub skills: Vec<SkillData>,
    /// Сцены сборки по порядку
    pub scenes: Vec<String>,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            skills: vec![SkillData::nova(), SkillData::slash_wave()],
            scenes: vec![
                "MainMenu".to_string(),
                "Level1".to_string(),
                "Level2".to_string(),
            ],
        }
    }
}

impl GameplayConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, GameplayError> {
        ron::from_str(text).map_err(|e| GameplayError::Config(format!("parse RON: {e}")))
    }

    pub fn to_ron_string(&self) -> Result<String, GameplayError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| GameplayError::Config(format!("serialize RON: {e}")))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, GameplayError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|e| GameplayError::Config(format!("read {}: {e}", path.display())))?;
        Self::from_ron_str(&data)
    }

    /// Defaults + сообщение об ошибке, если файл не прочитался
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(path) {
            Ok(config) => (config, None),
            Err(err) => (Self::default(), Some(err.to_string())),
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.simulation.tick_hz <= 0.0 {
            warnings.push("simulation.tick_hz must be > 0".to_string());
        }
        warnings.extend(self.player.validate());
        warnings.extend(self.enemy.validate());
        for skill in &self.skills {
            warnings.extend(skill.validate());
        }
        if self.scenes.is_empty() {
            warnings.push("scenes: empty catalog, portals can never load".to_string());
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::SkillShape;

    #[test]
    fn test_default_round_trips_through_ron() {
        let config = GameplayConfig::default();
        let text = config.to_ron_string().unwrap();
        let parsed = GameplayConfig::from_ron_str(&text).unwrap();
        assert_eq!(parsed, config);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let text = r#"(
            simulation: (seed: 7),
            enemy: (attack_damage: 35.0, min_wait: 5.0, max_wait: 1.0),
            skills: [(name: "Ring", shape: Circle(radius: 1.0))],
        )"#;
        let config = GameplayConfig::from_ron_str(text).unwrap();

        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.tick_hz, 60.0);
        assert_eq!(config.enemy.attack_damage, 35.0);
        assert_eq!(config.enemy.max_health, 100.0);
        assert_eq!(config.skills.len(), 1);
        assert_eq!(config.skills[0].shape, SkillShape::Circle { radius: 1.0 });
        assert_eq!(config.skills[0].cooldown, 2.0);
        assert_eq!(config.player, PlayerConfig::default());

        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("min_wait")));
    }

    #[test]
    fn test_malformed_ron_is_an_error() {
        let err = GameplayConfig::from_ron_str("(simulation: [").unwrap_err();
        assert!(matches!(err, GameplayError::Config(_)));

        let (config, message) = GameplayConfig::load_or_default("/nonexistent/duskblade.ron");
        assert_eq!(config, GameplayConfig::default());
        assert!(message.is_some());
    }
}
