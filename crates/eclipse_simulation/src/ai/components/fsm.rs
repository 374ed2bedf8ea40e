//! Patrol/chase AI components (state, config, patrol route) и чистые helper'ы.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{MovementCommand, NavigationStatus};

/// AI состояния (поверх combat state machine)
///
/// Patrolling ↔ Chasing; атака — через CombatActor. Dead терминальный.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum PatrolState {
    /// Обход patrol точек, враг не виден
    #[default]
    Patrolling,

    /// Преследование врага
    Chasing { target: Entity },

    /// Актор мёртв, AI отключен
    Dead,
}

impl PatrolState {
    pub fn chase_target(&self) -> Option<Entity> {
        match self {
            PatrolState::Chasing { target } => Some(*target),
            _ => None,
        }
    }
}

/// Параметры AI (хост может загрузить через serde)
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AIConfig {
    /// Patrol точка считается достигнутой в этом радиусе
    pub patrol_radius: f32,
    /// Дистанция атаки (без учёта капсул)
    pub attack_range: f32,
    /// Урон weapon hitbox'а, если у актора нет оружия
    pub attack_damage: u32,
    /// Ожидание на patrol точке: uniform [wait_min, wait_max] секунд
    pub wait_min: f32,
    pub wait_max: f32,
    /// Запас к attack range (поверх радиусов капсул)
    pub range_buffer: f32,
    /// Повторный MoveTo не шлём, если уже идём к точке в этом радиусе
    pub move_tolerance: f32,
    /// Acceptance radius для path follower'а
    pub acceptance_radius: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            patrol_radius: 200.0,
            attack_range: 150.0,
            attack_damage: 20,
            wait_min: 5.0,
            wait_max: 10.0,
            range_buffer: 10.0,
            move_tolerance: 100.0,
            acceptance_radius: 100.0,
        }
    }
}

/// Patrol точка (entity принадлежит уровню, не агенту)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PatrolPoint;

/// Маршрут патруля: слабые ссылки на PatrolPoint entities
///
/// Точка может быть удалена хостом — агент тогда просто не находит её позицию.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct PatrolRoute {
    pub targets: Vec<Entity>,
    pub current: Option<Entity>,
}

impl PatrolRoute {
    pub fn new(targets: Vec<Entity>) -> Self {
        Self {
            current: targets.first().copied(),
            targets,
        }
    }
}

/// Marker: актор под управлением AI
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(PatrolState, AIConfig, PatrolRoute, MovementCommand, NavigationStatus)]
pub struct AiAgent;

impl AiAgent {
    /// Бандл врага: одна секция атаки, бьёт оружием
    pub fn bundle(faction_id: u64, route: PatrolRoute) -> impl Bundle {
        (
            AiAgent,
            route,
            crate::components::Actor { faction_id },
            crate::combat::CombatActor::new(1)
                .with_attack_hitboxes(crate::combat::HitboxGroup::Weapon),
        )
    }
}

/// AttackRange + радиусы обеих капсул + буфер
pub fn effective_attack_range(config: &AIConfig, self_radius: f32, target_radius: f32) -> f32 {
    config.attack_range + self_radius + target_radius + config.range_buffer
}

pub fn in_attack_range(
    config: &AIConfig,
    self_position: Vec3,
    self_radius: f32,
    target_position: Vec3,
    target_radius: f32,
) -> bool {
    self_position.distance(target_position)
        <= effective_attack_range(config, self_radius, target_radius)
}

pub fn within_patrol_radius(config: &AIConfig, self_position: Vec3, point: Vec3) -> bool {
    self_position.distance(point) <= config.patrol_radius
}

/// Случайная patrol точка, отличная от текущей.
///
/// None, если альтернатив нет (меньше двух точек) — текущая сохраняется.
pub fn choose_patrol_target<R: Rng + ?Sized>(route: &PatrolRoute, rng: &mut R) -> Option<Entity> {
    let candidates: Vec<Entity> = route
        .targets
        .iter()
        .copied()
        .filter(|target| Some(*target) != route.current)
        .collect();

    if candidates.is_empty() {
        return None;
    }

    Some(candidates[rng.gen_range(0..candidates.len())])
}

/// Длительность ожидания на точке: uniform [wait_min, wait_max]
pub fn roll_patrol_wait<R: Rng + ?Sized>(config: &AIConfig, rng: &mut R) -> f32 {
    if config.wait_max <= config.wait_min {
        return config.wait_min.max(0.0);
    }
    rng.gen_range(config.wait_min..=config.wait_max)
}
