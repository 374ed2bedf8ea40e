//! Patrol/chase FSM systems (perception transitions, patrol timers, decision tick).

use bevy::prelude::*;
use crate::ai::systems::{move_to_target, stop_movement};
use crate::ai::{
    choose_patrol_target, in_attack_range, roll_patrol_wait, within_patrol_radius, AIConfig,
    AiAgent, PatrolPoint, PatrolRoute, PatrolState, PerceptionUpdated,
};
use crate::combat::{begin_attack, ActionState, AnimationCommand, CombatActor, CombatTuning, Hitboxes};
use crate::components::{Actor, CollisionRadius, Facing, Health, MovementCommand, NavigationStatus};
use crate::timers::{ActorTimers, DeferredTask, TaskKind};
use crate::DeterministicRng;

/// Позиция patrol точки (None если хост её удалил)
fn patrol_goal(route: &PatrolRoute, points: &Query<&Transform, With<PatrolPoint>>) -> Option<(Entity, Vec3)> {
    let current = route.current?;
    let transform = points.get(current).ok()?;
    Some((current, transform.translation))
}

/// Система: PerceptionUpdated → Patrolling ↔ Chasing
///
/// Цель — ближайший живой враг (другая фракция) из видимых.
/// Враг пропал из вида → Patrolling и сразу проверка patrol точки:
/// уже на точке → следующая, иначе продолжаем идти к текущей.
pub fn update_perception(
    mut perceptions: EventReader<PerceptionUpdated>,
    mut agents: Query<
        (
            &Actor,
            &Transform,
            &AIConfig,
            &mut PatrolState,
            &mut PatrolRoute,
            &mut ActorTimers,
            Option<&mut MovementCommand>,
            Option<&NavigationStatus>,
        ),
        With<AiAgent>,
    >,
    candidates: Query<(&Actor, &Health, &Transform)>,
    points: Query<&Transform, With<PatrolPoint>>,
    mut rng: ResMut<DeterministicRng>,
) {
    for perception in perceptions.read() {
        let Ok((actor, transform, config, mut state, mut route, mut timers, mut movement, navigation)) =
            agents.get_mut(perception.observer)
        else {
            continue;
        };

        if *state == PatrolState::Dead {
            continue;
        }

        let position = transform.translation;
        let hostile = perception
            .visible
            .iter()
            .copied()
            .filter(|&candidate| candidate != perception.observer)
            .filter_map(|candidate| {
                let (other, health, other_transform) = candidates.get(candidate).ok()?;
                (actor.is_hostile_to(other) && health.is_alive())
                    .then(|| (candidate, position.distance(other_transform.translation)))
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(candidate, _)| candidate);

        match hostile {
            Some(target) => {
                if state.chase_target() != Some(target) {
                    *state = PatrolState::Chasing { target };
                    timers.cancel(TaskKind::PatrolWait);
                    crate::log(&format!("👁️ AI {:?} spotted {:?} → Chasing", perception.observer, target));
                }
            }
            None => {
                if *state == PatrolState::Patrolling {
                    continue;
                }

                *state = PatrolState::Patrolling;
                crate::log(&format!("👻 AI {:?} lost target → Patrolling", perception.observer));

                let reached = patrol_goal(&route, &points)
                    .is_some_and(|(_, goal)| within_patrol_radius(config, position, goal));
                if reached {
                    if let Some(next) = choose_patrol_target(&route, &mut rng.rng) {
                        route.current = Some(next);
                    }
                }

                move_to_target(
                    perception.observer,
                    movement.as_deref_mut(),
                    navigation,
                    patrol_goal(&route, &points),
                    config,
                );
            }
        }
    }
}

/// Система: ожидание на patrol точке истекло → следующая точка
///
/// Агент уже не патрулирует (погоня, смерть) → таймер устарел, discard.
pub fn fire_patrol_timers(
    mut agents: Query<
        (
            Entity,
            &PatrolState,
            &AIConfig,
            &mut PatrolRoute,
            &mut ActorTimers,
            Option<&mut MovementCommand>,
            Option<&NavigationStatus>,
        ),
        With<AiAgent>,
    >,
    points: Query<&Transform, With<PatrolPoint>>,
    time: Res<Time>,
    mut rng: ResMut<DeterministicRng>,
) {
    let now = time.elapsed_secs();

    for (entity, state, config, mut route, mut timers, mut movement, navigation) in agents.iter_mut() {
        if timers.take_due(now, TaskKind::PatrolWait).is_none() {
            continue;
        }

        if *state != PatrolState::Patrolling {
            crate::log(&format!("Patrol timer discarded: {:?} is {:?}", entity, state));
            continue;
        }

        // Меньше двух точек → остаёмся на текущей
        if let Some(next) = choose_patrol_target(&route, &mut rng.rng) {
            route.current = Some(next);
        }

        crate::log(&format!("⏰ Patrol wait finished: {:?} → {:?}", entity, route.current));
        move_to_target(entity, movement.as_deref_mut(), navigation, patrol_goal(&route, &points), config);
    }
}

/// Система: AI decision tick
///
/// - Patrolling: на точке → ожидание (если ещё не запущено), иначе идём к точке
/// - Chasing: цель в attack range → стоп + атака (если Unoccupied), иначе преследование
/// - Цель умерла/пропала → Patrolling
#[allow(clippy::too_many_arguments)]
pub fn ai_decision_tick(
    mut agents: Query<
        (
            Entity,
            &Transform,
            &CollisionRadius,
            &AIConfig,
            &mut PatrolState,
            &mut PatrolRoute,
            &mut CombatActor,
            &mut Hitboxes,
            &mut ActorTimers,
            &mut Facing,
            Option<&mut MovementCommand>,
            Option<&NavigationStatus>,
        ),
        With<AiAgent>,
    >,
    targets: Query<(&Transform, &CollisionRadius, &Health)>,
    points: Query<&Transform, With<PatrolPoint>>,
    time: Res<Time>,
    tuning: Res<CombatTuning>,
    mut rng: ResMut<DeterministicRng>,
    mut animations: EventWriter<AnimationCommand>,
) {
    let now = time.elapsed_secs();

    for (
        entity,
        transform,
        radius,
        config,
        mut state,
        mut route,
        mut actor,
        mut hitboxes,
        mut timers,
        mut facing,
        mut movement,
        navigation,
    ) in agents.iter_mut()
    {
        let position = transform.translation;
        let current_state = *state;

        match current_state {
            PatrolState::Dead => continue,

            PatrolState::Patrolling => {
                if route.current.is_none() {
                    route.current = choose_patrol_target(&route, &mut rng.rng);
                }

                let Some((point, goal)) = patrol_goal(&route, &points) else {
                    continue;
                };

                if within_patrol_radius(config, position, goal) {
                    if !timers.is_pending(TaskKind::PatrolWait) {
                        let wait = roll_patrol_wait(config, &mut rng.rng);
                        timers.schedule(now, wait, DeferredTask::PatrolWait);
                        crate::log(&format!(
                            "⏳ AI {:?} reached patrol point {:?}, waiting {:.1}s",
                            entity, point, wait
                        ));
                    }
                } else {
                    move_to_target(entity, movement.as_deref_mut(), navigation, Some((point, goal)), config);
                }
            }

            PatrolState::Chasing { target } => {
                let target_info = targets
                    .get(target)
                    .ok()
                    .filter(|(_, _, health)| health.is_alive())
                    .map(|(target_transform, target_radius, _)| {
                        (target_transform.translation, target_radius.0)
                    });

                let Some((target_position, target_radius)) = target_info else {
                    *state = PatrolState::Patrolling;
                    crate::log(&format!("AI {:?}: chase target {:?} gone → Patrolling", entity, target));
                    continue;
                };

                if !in_attack_range(config, position, radius.0, target_position, target_radius) {
                    move_to_target(
                        entity,
                        movement.as_deref_mut(),
                        navigation,
                        Some((target, target_position)),
                        config,
                    );
                    continue;
                }

                stop_movement(movement.as_deref_mut());

                if actor.state() != ActionState::Unoccupied {
                    continue;
                }

                // Разворот к цели до старта атаки (поворот залочен на время атаки)
                if let Some(towards) = Facing::towards(position, target_position) {
                    *facing = towards;
                }

                if let Err(rejected) = begin_attack(
                    entity,
                    &mut actor,
                    &mut hitboxes,
                    &mut timers,
                    None,
                    now,
                    &tuning,
                    &mut animations,
                ) {
                    crate::log(&format!("AI {:?} attack rejected: {}", entity, rejected));
                }
            }
        }
    }
}
