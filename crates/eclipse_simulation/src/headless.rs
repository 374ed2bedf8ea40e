//! Headless host: упрощённая замена движка для demo и сценарных тестов
//!
//! Играет роль tactical layer без рендера и физики:
//! - MovementCommand → прямолинейное движение Transform + NavigationStatus
//! - AnimationCommand → montage с фиксированной длительностью → MontageEnded
//! - Sight по радиусу → PerceptionUpdated (только при изменении набора)
//! - Включённые hitbox'ы → HitboxOverlap по дистанции и углу (каждый тик, дедуп — в hit registry)

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::combat::{
    ActionState, AnimationCommand, CombatActor, EquippedWeapon, HitboxGroup, HitboxOverlap, Hitboxes,
    Montage, MontageEnded, OrientationMode, PlaybackId,
};
use crate::components::{Actor, CollisionEnabled, CollisionRadius, Facing, MovementCommand, NavigationStatus};
use crate::ai::{AiAgent, PerceptionUpdated};

/// Параметры headless хоста
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct HostTuning {
    /// Скорость движения (units/sec)
    pub move_speed: f32,
    /// Радиус зрения AI
    pub sight_radius: f32,
    /// Досягаемость hitbox'а поверх радиусов капсул (не меньше attack range AI)
    pub hitbox_reach: f32,
    /// Cos половины угла удара (цель должна быть перед атакующим)
    pub hitbox_cone_cos: f32,
    pub attack_duration: f32,
    pub hit_react_duration: f32,
    pub death_duration: f32,
}

impl Default for HostTuning {
    fn default() -> Self {
        Self {
            move_speed: 300.0,
            sight_radius: 1000.0,
            hitbox_reach: 200.0,
            hitbox_cone_cos: 0.3,
            attack_duration: 0.8,
            hit_react_duration: 0.5,
            death_duration: 1.5,
        }
    }
}

impl HostTuning {
    fn duration_of(&self, montage: Montage) -> f32 {
        match montage {
            Montage::Attack => self.attack_duration,
            Montage::HitReact => self.hit_react_duration,
            Montage::Death => self.death_duration,
        }
    }
}

/// Montage, который сейчас играет хост
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlayingMontage {
    pub montage: Montage,
    pub section: String,
    pub playback: PlaybackId,
    pub remaining: f32,
}

/// Поза заморожена (последний кадр death секции)
#[derive(Component, Debug, Clone, PartialEq)]
pub struct FrozenPose {
    pub section: String,
}

/// Headless host plugin (после SimulationPlugin)
///
/// Системы хоста идут после combat: события хоста читаются симуляцией на следующем тике.
pub struct HeadlessHostPlugin;

impl Plugin for HeadlessHostPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HostTuning>();

        app.add_systems(
            FixedUpdate,
            (
                host_play_animations,
                host_tick_animations,
                host_move_actors,
                host_perception,
                host_hitbox_overlaps,
            )
                .chain()
                .after(crate::SimulationSet::Combat),
        );
    }
}

/// AnimationCommand → PlayingMontage
///
/// Новый Play вытесняет текущий montage (MontageEnded interrupted для старого).
pub fn host_play_animations(
    mut commands_in: EventReader<AnimationCommand>,
    mut commands: Commands,
    playing: Query<&PlayingMontage>,
    tuning: Res<HostTuning>,
    mut endings: EventWriter<MontageEnded>,
) {
    // Несколько команд одной entity за тик: последняя побеждает
    let mut latest: BTreeMap<Entity, Option<PlayingMontage>> = BTreeMap::new();

    for command in commands_in.read() {
        match command {
            AnimationCommand::Play {
                entity,
                montage,
                section,
                playback,
            } => {
                latest.insert(
                    *entity,
                    Some(PlayingMontage {
                        montage: *montage,
                        section: section.clone(),
                        playback: *playback,
                        remaining: tuning.duration_of(*montage),
                    }),
                );
            }
            AnimationCommand::StopAll { entity, .. } => {
                latest.insert(*entity, None);
            }
            AnimationCommand::FreezePose { entity, section, .. } => {
                if let Ok(mut entity_commands) = commands.get_entity(*entity) {
                    entity_commands.insert(FrozenPose {
                        section: section.clone(),
                    });
                }
                crate::log(&format!("🧊 Host: pose frozen {:?} ({})", entity, section));
            }
        }
    }

    for (entity, next) in latest {
        if let Ok(previous) = playing.get(entity) {
            endings.write(MontageEnded {
                entity,
                montage: previous.montage,
                playback: previous.playback,
                interrupted: true,
            });
        }

        let Ok(mut entity_commands) = commands.get_entity(entity) else {
            continue;
        };
        match next {
            Some(montage) => {
                entity_commands.insert(montage);
            }
            None => {
                entity_commands.remove::<PlayingMontage>();
            }
        }
    }
}

/// Тик montage → MontageEnded по окончании
pub fn host_tick_animations(
    mut playing: Query<(Entity, &mut PlayingMontage)>,
    mut commands: Commands,
    time: Res<Time>,
    mut endings: EventWriter<MontageEnded>,
) {
    let dt = time.delta_secs();

    for (entity, mut montage) in playing.iter_mut() {
        montage.remaining -= dt;
        if montage.remaining > 0.0 {
            continue;
        }

        endings.write(MontageEnded {
            entity,
            montage: montage.montage,
            playback: montage.playback,
            interrupted: false,
        });
        commands.entity(entity).remove::<PlayingMontage>();
    }
}

/// MovementCommand → движение по прямой + NavigationStatus
pub fn host_move_actors(
    mut actors: Query<(
        Entity,
        &mut Transform,
        Option<&MovementCommand>,
        Option<&mut NavigationStatus>,
        Option<&mut Facing>,
        Option<&CombatActor>,
    )>,
    time: Res<Time>,
    tuning: Res<HostTuning>,
) {
    let dt = time.delta_secs();
    let positions: BTreeMap<Entity, Vec3> = actors
        .iter()
        .map(|(entity, transform, ..)| (entity, transform.translation))
        .collect();

    for (_, mut transform, command, navigation, facing, combat) in actors.iter_mut() {
        let goal = match command {
            Some(MovementCommand::MoveToPosition {
                target,
                acceptance_radius,
            }) => Some((*target, *acceptance_radius)),
            Some(MovementCommand::MoveToEntity {
                target,
                acceptance_radius,
            }) => positions.get(target).map(|position| (*position, *acceptance_radius)),
            _ => None,
        };

        let mut moving = false;
        let mut destination = None;

        if let Some((goal, acceptance_radius)) = goal {
            let offset = Vec3::new(goal.x - transform.translation.x, 0.0, goal.z - transform.translation.z);
            let distance = offset.length();
            destination = Some(goal);

            if distance > acceptance_radius {
                let step = (tuning.move_speed * dt).min(distance - acceptance_radius);
                let direction = offset / distance;
                transform.translation += direction * step;
                moving = true;

                // Поворот по движению, если атака не залочила ориентацию
                let follows_movement = combat
                    .is_none_or(|combat| combat.orientation() == OrientationMode::FollowMovement);
                if let (Some(mut facing), true) = (facing, follows_movement) {
                    facing.0 = direction;
                }
            }
        }

        if let Some(mut navigation) = navigation {
            let status = NavigationStatus {
                moving,
                destination: if moving { destination } else { None },
            };
            if *navigation != status {
                *navigation = status;
            }
        }
    }
}

/// Sight: все живые акторы в радиусе → PerceptionUpdated (при изменении)
pub fn host_perception(
    observers: Query<(Entity, &Transform), With<AiAgent>>,
    actors: Query<(Entity, &Transform, &CombatActor), With<Actor>>,
    tuning: Res<HostTuning>,
    mut last_seen: Local<BTreeMap<Entity, Vec<Entity>>>,
    mut perceptions: EventWriter<PerceptionUpdated>,
) {
    for (observer, observer_transform) in observers.iter() {
        let visible: Vec<Entity> = actors
            .iter()
            .filter(|(entity, transform, combat)| {
                *entity != observer
                    && !combat.is_dead()
                    && transform.translation.distance(observer_transform.translation) <= tuning.sight_radius
            })
            .map(|(entity, ..)| entity)
            .collect();

        if last_seen.get(&observer) == Some(&visible) {
            continue;
        }

        last_seen.insert(observer, visible.clone());
        perceptions.write(PerceptionUpdated { observer, visible });
    }
}

/// Включённые hitbox'ы атакующих → HitboxOverlap с целями в досягаемости
pub fn host_hitbox_overlaps(
    attackers: Query<(Entity, &Transform, &Facing, &CollisionRadius, &CombatActor, &Hitboxes, Option<&EquippedWeapon>)>,
    targets: Query<(Entity, &Transform, &CollisionRadius, &CollisionEnabled), With<Actor>>,
    tuning: Res<HostTuning>,
    mut overlaps: EventWriter<HitboxOverlap>,
) {
    for (attacker, transform, facing, radius, combat, hitboxes, weapon) in attackers.iter() {
        if combat.state() != ActionState::Attacking || !hitboxes.any_enabled() {
            continue;
        }

        for slot in hitboxes.slots().iter().filter(|slot| slot.enabled) {
            let source = match (slot.group, weapon) {
                (HitboxGroup::Weapon, Some(weapon)) => weapon.0,
                _ => attacker,
            };

            for (target, target_transform, target_radius, collision) in targets.iter() {
                if target == attacker || !collision.0 {
                    continue;
                }

                let offset = target_transform.translation - transform.translation;
                let flat = Vec3::new(offset.x, 0.0, offset.z);
                let reach = radius.0 + target_radius.0 + tuning.hitbox_reach;
                let Some(direction) = flat.try_normalize() else {
                    continue;
                };

                if flat.length() > reach || facing.0.dot(direction) < tuning.hitbox_cone_cos {
                    continue;
                }

                // Точка на поверхности капсулы цели со стороны атакующего
                let impact_point = target_transform.translation - direction * target_radius.0;
                overlaps.write(HitboxOverlap {
                    source,
                    hitbox: slot.id,
                    other: target,
                    impact_point,
                });
            }
        }
    }
}
