//! Animation parameter sink.
//!
//! Controllers push named parameters here; the renderer (outside this
//! crate) reads them and drains one-shot triggers every frame.

use bevy::prelude::*;
use std::collections::HashMap;

// Player
pub const PARAM_HORIZONTAL: &str = "Horizontal";
pub const PARAM_VERTICAL: &str = "Vertical";
pub const PARAM_IS_MOVING: &str = "IsMoving";
pub const PARAM_IS_DRINKING: &str = "IsDrinking";
pub const PARAM_IS_ATTACKING: &str = "IsAttacking";
pub const PARAM_ATTACK_COMBO_COUNT: &str = "AttackComboCount";

// Enemy
pub const PARAM_IS_PATROLLING: &str = "isPatrolling";
pub const PARAM_IS_CHASING: &str = "isChasing";
pub const PARAM_ENEMY_ATTACKING: &str = "isAttacking";
pub const TRIGGER_HURT: &str = "hurtTrigger";
pub const TRIGGER_DIE: &str = "dieTrigger";

// Scene transition
pub const TRIGGER_TRANSITION_START: &str = "Start";

#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct AnimationParams {
    bools: HashMap<&'static str, bool>,
    floats: HashMap<&'static str, f32>,
    triggers: Vec<&'static str>,
}

impl AnimationParams {
    pub fn set_bool(&mut self, name: &'static str, value: bool) {
        self.bools.insert(name, value);
    }

    pub fn set_float(&mut self, name: &'static str, value: f32) {
        self.floats.insert(name, value);
    }

    pub fn set_trigger(&mut self, name: &'static str) {
        self.triggers.push(name);
    }

    /// Unset bools read as false.
    pub fn get_bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    /// Pending one-shot triggers (not yet drained).
    pub fn triggers(&self) -> &[&'static str] {
        &self.triggers
    }

    pub fn has_trigger(&self, name: &str) -> bool {
        self.triggers.iter().any(|t| *t == name)
    }

    /// Host side: consume triggers fired since the last call.
    pub fn take_triggers(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.triggers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_and_triggers() {
        let mut params = AnimationParams::default();
        assert!(!params.get_bool(PARAM_IS_MOVING));

        params.set_bool(PARAM_IS_MOVING, true);
        params.set_float(PARAM_HORIZONTAL, -1.0);
        params.set_trigger(TRIGGER_HURT);

        assert!(params.get_bool(PARAM_IS_MOVING));
        assert_eq!(params.get_float(PARAM_HORIZONTAL), Some(-1.0));
        assert!(params.has_trigger(TRIGGER_HURT));

        assert_eq!(params.take_triggers(), vec![TRIGGER_HURT]);
        assert!(params.triggers().is_empty());
    }
}
