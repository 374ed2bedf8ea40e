//! Eclipse Simulation Core
//!
//! ECS-симуляция ближнего боя на Bevy 0.16 (strategic layer)
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (combat state machine, hit registry, AI решения, health)
//! - Хост = tactical layer (анимации, collision geometry, perception, pathfinding)
//!
//! Связь только через events и компоненты-команды (`AnimationCommand`, `MovementCommand`,
//! `HitboxOverlap`, `MontageEnded`, `PerceptionUpdated`).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod headless;
pub mod logger;
pub mod player;
pub mod timers;

// Re-export базовых компонентов для удобства
pub use ai::{AIConfig, AIPlugin, AiAgent, PatrolPoint, PatrolRoute, PatrolState, PerceptionUpdated};
pub use combat::{
    ActionState, AnimationCommand, AttackEndCue, CombatActor, CombatPlugin, DamageDealt,
    DamageRequest, Dead, EntityDied, EquipWeaponRequest, HealthPercentChanged, HitDirection,
    HitboxGroup, HitboxId, HitboxOverlap, HitboxWindow, Hitboxes, Montage, MontageEnded,
    WindowPhase,
};
pub use components::*;
pub use config::CombatTuning;
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_logger, LogLevel, LogPrinter};
pub use player::{AttackInput, HudTargetChanged, Player};
pub use timers::{ActorTimers, DeferredTask, TaskKind};

/// Порядок подсистем внутри FixedUpdate: AI решает, combat применяет
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Ai,
    Combat,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Ресурсы, уже вставленные хостом (DeterministicRng, CombatTuning), не перезаписываются.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<DeterministicRng>() {
            // Детерминистичный RNG (seed по умолчанию)
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<Time>()
            .init_resource::<CombatTuning>()
            .configure_sets(FixedUpdate, (SimulationSet::Ai, SimulationSet::Combat).chain())
            // Подсистемы (ECS strategic layer)
            .add_plugins((CombatPlugin, AIPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт Bevy App для headless симуляции
///
/// Время не берётся с часов: хост (или тест) двигает его через `step_simulation`.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}

/// Один simulation tick: сдвинуть игровое время на `dt` и прогнать FixedUpdate
///
/// `First` идёт раньше: там Bevy меняет буферы `Events<T>`. Событие живёт
/// два тика (читатели следующего тика его ещё видят), потом удаляется.
pub fn step_simulation(app: &mut App, dt: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(std::time::Duration::from_secs_f32(dt));
    app.world_mut().run_schedule(First);
    app.world_mut().run_schedule(FixedUpdate);
}

/// Байтовый отпечаток всех компонентов `T` (сравнение прогонов с одним seed)
///
/// Entity упорядочены по index: порядок query между прогонами не гарантирован.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut query = world.query::<(Entity, &T)>();
    let mut rows: Vec<(u32, String)> = query
        .iter(world)
        .map(|(entity, component)| (entity.index(), format!("{:?}", component)))
        .collect();
    rows.sort_by_key(|(index, _)| *index);

    rows.into_iter()
        .flat_map(|(index, debug)| {
            index
                .to_le_bytes()
                .into_iter()
                .chain(debug.into_bytes())
        })
        .collect()
}
