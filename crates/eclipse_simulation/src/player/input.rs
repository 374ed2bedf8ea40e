//! Input intents игрока и HUD feedback

use bevy::prelude::*;

/// Нажата кнопка атаки
///
/// `variant = Some(i)` — явная секция (binding Attack1..AttackN, index с нуля),
/// `None` — следующая секция combo (generic Attack).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackInput {
    pub entity: Entity,
    pub variant: Option<usize>,
}

/// HUD: игрок задел врага, показать его health bar
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudTargetChanged {
    pub viewer: Entity,
    pub target: Entity,
}
