//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (faction, health, facing, collision)
//! - movement: навигация (MovementCommand, NavigationStatus)
//!
//! Боевые компоненты (CombatActor, Hitboxes, Weapon) живут в `crate::combat`,
//! AI компоненты — в `crate::ai`.

pub mod actor;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
