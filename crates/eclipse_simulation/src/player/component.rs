//! Player control marker component

use bevy::prelude::*;

/// Marker component для player-controlled актора
///
/// Акторы без этого компонента управляются AI (`AiAgent`).
/// Атака игрока по умолчанию — kick (limb hitboxes), см. `Player::combat_actor`.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

impl Player {
    /// Бандл игрока: marker + kick hitboxes + combat actor с kick атакой
    pub fn bundle(faction_id: u64) -> impl Bundle {
        (
            Player,
            crate::components::Actor { faction_id },
            crate::combat::Hitboxes::with_kicks(),
            crate::combat::CombatActor::default()
                .with_attack_hitboxes(crate::combat::HitboxGroup::Limb),
        )
    }
}
