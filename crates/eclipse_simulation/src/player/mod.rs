//! Player: marker, attack input и HUD события
//!
//! Хост переводит input bindings (Attack1/Attack2/Attack3, generic Attack)
//! в `AttackInput` и показывает HUD по `HudTargetChanged`/`HealthPercentChanged`.

pub mod component;
pub mod input;

pub use component::Player;
pub use input::{AttackInput, HudTargetChanged};
