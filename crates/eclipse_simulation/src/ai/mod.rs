//! AI decision-making module
//!
//! Patrol/chase FSM для врагов. Атакует через общую combat state machine.
//!
//! Хост ответственность: perception (sight), pathfinding (MovementCommand → path follower).

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::{
    choose_patrol_target, effective_attack_range, in_attack_range, roll_patrol_wait,
    within_patrol_radius, AIConfig, AiAgent, PatrolPoint, PatrolRoute, PatrolState,
};
pub use events::PerceptionUpdated;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate (`SimulationSet::Ai`, до combat).
/// Порядок выполнения:
/// 1. handle_ai_death — Dead состояние для умерших агентов
/// 2. aggro_on_damage — преследование обидчика
/// 3. update_perception — Patrolling ↔ Chasing по perception
/// 4. fire_patrol_timers — ожидание на точке истекло → следующая точка
/// 5. ai_decision_tick — атака в радиусе / движение к цели / старт ожидания
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PerceptionUpdated>();

        app.add_systems(
            FixedUpdate,
            (
                systems::handle_ai_death,
                systems::aggro_on_damage,
                systems::update_perception,
                systems::fire_patrol_timers,
                systems::ai_decision_tick,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(crate::SimulationSet::Ai),
        );
    }
}
