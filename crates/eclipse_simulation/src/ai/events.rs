//! AI Events — события perception хоста для AI систем

use bevy::prelude::*;

/// Perception обновился (sight sense хоста)
///
/// `visible` — все акторы, которых наблюдатель сейчас видит.
/// Фильтрация по фракциям и выбор цели — на стороне ECS.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PerceptionUpdated {
    pub observer: Entity,
    pub visible: Vec<Entity>,
}
