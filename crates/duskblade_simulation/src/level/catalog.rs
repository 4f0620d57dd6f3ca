//! Scene catalog: упорядоченный список сцен сборки + активная сцена
//!
//! Симуляция не грузит ассеты: "загрузка" переключает активный индекс,
//! host по событию SceneLoaded делает остальное.

use bevy::prelude::*;

use crate::error::GameplayError;

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SceneCatalog {
    scenes: Vec<String>,
    active: Option<usize>,
}

impl SceneCatalog {
    /// Активна первая сцена списка (если он не пуст)
    pub fn new(scenes: Vec<String>) -> Self {
        let active = if scenes.is_empty() { None } else { Some(0) };
        Self { scenes, active }
    }

    pub fn scenes(&self) -> &[String] {
        &self.scenes
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_scene(&self) -> Option<&str> {
        self.active
            .and_then(|index| self.scenes.get(index))
            .map(String::as_str)
    }

    /// Следующая сцена после активной (None: активная последняя)
    pub fn next_scene(&self) -> Option<&str> {
        let next = self.active.map_or(0, |index| index + 1);
        self.scenes.get(next).map(String::as_str)
    }

    pub fn load_by_name(&mut self, name: &str) -> Result<String, GameplayError> {
        let index = self
            .scenes
            .iter()
            .position(|scene| scene == name)
            .ok_or_else(|| GameplayError::SceneLoadFailure {
                scene: name.to_string(),
                reason: "not in the scene catalog".to_string(),
            })?;
        self.active = Some(index);
        Ok(self.scenes[index].clone())
    }

    pub fn load_next(&mut self) -> Result<String, GameplayError> {
        let next = self.active.map_or(0, |index| index + 1);
        let scene = self
            .scenes
            .get(next)
            .cloned()
            .ok_or_else(|| GameplayError::SceneLoadFailure {
                scene: format!("#{}", next),
                reason: "already the last scene".to_string(),
            })?;
        self.active = Some(next);
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SceneCatalog {
        SceneCatalog::new(vec![
            "MainMenu".to_string(),
            "Level1".to_string(),
            "Level2".to_string(),
        ])
    }

    #[test]
    fn test_load_next_until_last() {
        let mut scenes = catalog();
        assert_eq!(scenes.active_scene(), Some("MainMenu"));

        assert_eq!(scenes.load_next(), Ok("Level1".to_string()));
        assert_eq!(scenes.load_next(), Ok("Level2".to_string()));
        assert_eq!(scenes.next_scene(), None);

        let err = scenes.load_next().unwrap_err();
        assert!(matches!(err, GameplayError::SceneLoadFailure { .. }));
        assert_eq!(scenes.active_scene(), Some("Level2"));
    }

    #[test]
    fn test_load_by_name() {
        let mut scenes = catalog();
        assert_eq!(scenes.load_by_name("Level2"), Ok("Level2".to_string()));
        assert_eq!(scenes.active_index(), Some(2));

        assert!(scenes.load_by_name("Level9").is_err());
        assert_eq!(scenes.active_scene(), Some("Level2"));

        assert_eq!(scenes.load_by_name("MainMenu"), Ok("MainMenu".to_string()));
        assert_eq!(scenes.next_scene(), Some("Level1"));
    }

    #[test]
    fn test_empty_catalog() {
        let mut scenes = SceneCatalog::new(Vec::new());
        assert_eq!(scenes.active_scene(), None);
        assert!(scenes.load_next().is_err());
    }
}
