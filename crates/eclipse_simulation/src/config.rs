//! Глобальный tuning боевой системы
//!
//! Per-actor параметры живут в компонентах (AIConfig, Weapon, CombatActor).
//! Здесь — то, что одинаково для всех акторов.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Боевые константы (resource, хост может подменить/загрузить через serde)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Задержка включения hitbox после старта атаки (секунды игрового времени)
    ///
    /// Нога/клинок должны дойти до позиции, иначе ловим hit в нулевом кадре.
    /// 0.0 → hitbox включается сразу.
    pub hitbox_enable_delay: f32,
    /// Урон от удара ногой (limb hitboxes)
    pub kick_damage: u32,
    /// Урон weapon hitbox, если у актора нет ни оружия, ни AIConfig
    pub unarmed_weapon_damage: u32,
    /// Через сколько секунд после смерти замораживаем последний кадр death анимации
    pub death_pose_hold: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            hitbox_enable_delay: 0.1,
            kick_damage: 15,
            unarmed_weapon_damage: 10,
            death_pose_hold: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuning_defaults() {
        let tuning = CombatTuning::default();
        assert_eq!(tuning.hitbox_enable_delay, 0.1);
        assert_eq!(tuning.kick_damage, 15);
    }
}
