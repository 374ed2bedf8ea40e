//! Health/damage model
//!
//! `DamageRequest` — единственный путь изменения Health.
//! Источники: hitbox overlaps (combat) и хост (ловушки, скрипты).
//!
//! Результат применения:
//! - жив → HitReacting (секция по направлению удара)
//! - HP = 0 → Dead: death поза, freeze через hold, коллизия/движение выключены, оружие уничтожено

use bevy::prelude::*;

use crate::combat::{
    ActionState, AnimationCommand, CombatActor, CombatTuning, DamageOutcome, EquippedWeapon, HitboxId, Hitboxes,
    ImpactGeometry, Montage,
};
use crate::components::{CollisionEnabled, Facing, Health, MovementCommand};
use crate::timers::{ActorTimers, DeferredTask, TaskKind};
use crate::DeterministicRng;

/// Запрос на урон
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: u32,
    pub instigator: Option<Entity>,
    /// Точка удара (world), определяет hit reaction. None → реакция спереди.
    pub impact_point: Option<Vec3>,
}

/// Событие: урон применён
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub damage: u32,
    /// Сколько HP реально снято (clamp в 0)
    pub applied: u32,
    pub target_died: bool,
    /// Состояние цели до удара (после удара она уже HitReacting/Dead)
    pub prior_state: ActionState,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// HUD: новая доля здоровья [0, 1]
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealthPercentChanged {
    pub entity: Entity,
    pub percent: f32,
}

/// Компонент-маркер: entity мертв (Health <= 0)
///
/// Деспавн не автоматический — трупы остаются на месте.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

/// Система: DamageRequest → Health + state machine
///
/// Урон по мёртвому — no-op (HUD не дёргается).
#[allow(clippy::too_many_arguments)]
pub fn apply_damage(
    mut requests: EventReader<DamageRequest>,
    mut targets: Query<(
        &mut CombatActor,
        &mut Health,
        &mut Hitboxes,
        &mut ActorTimers,
        &Facing,
        Option<&Transform>,
    )>,
    time: Res<Time>,
    tuning: Res<CombatTuning>,
    mut rng: ResMut<DeterministicRng>,
    mut animations: EventWriter<AnimationCommand>,
    mut damage_dealt: EventWriter<DamageDealt>,
    mut entity_died: EventWriter<EntityDied>,
    mut health_changed: EventWriter<HealthPercentChanged>,
) {
    let now = time.elapsed_secs();

    for request in requests.read() {
        let Ok((mut actor, mut health, mut hitboxes, mut timers, facing, transform)) =
            targets.get_mut(request.target)
        else {
            crate::logger::log_warning(&format!(
                "DamageRequest: target {:?} has no CombatActor/Health",
                request.target
            ));
            continue;
        };

        let impact = match (request.impact_point, transform) {
            (Some(impact_point), Some(transform)) => Some(ImpactGeometry {
                forward: facing.0,
                position: transform.translation,
                impact_point,
            }),
            _ => None,
        };

        let prior_state = actor.state();
        let outcome = match actor.apply_damage(&mut health, request.amount, impact, &mut rng.rng) {
            Ok(outcome) => outcome,
            Err(rejected) => {
                crate::logger::log(&format!(
                    "Damage ignored for {:?}: {}",
                    request.target, rejected
                ));
                continue;
            }
        };

        hitboxes.disable_all();

        match outcome {
            DamageOutcome::HitReact {
                direction, playback, ..
            } => {
                timers.cancel(TaskKind::HitboxEnable);
                animations.write(AnimationCommand::Play {
                    entity: request.target,
                    montage: Montage::HitReact,
                    section: direction.section().to_string(),
                    playback,
                });
                crate::logger::log(&format!(
                    "🩸 {:?} hit from {:?} ({} HP left)",
                    request.target, direction, health.current
                ));
            }
            DamageOutcome::Died { pose, playback, .. } => {
                timers.cancel_all();
                timers.schedule(
                    now,
                    tuning.death_pose_hold,
                    DeferredTask::FreezeDeathPose { playback },
                );
                animations.write(AnimationCommand::Play {
                    entity: request.target,
                    montage: Montage::Death,
                    section: pose.section().to_string(),
                    playback,
                });
                entity_died.write(EntityDied {
                    entity: request.target,
                    killer: request.instigator,
                });
                crate::logger::log_info(&format!(
                    "💀 {:?} killed by {:?} ({})",
                    request.target,
                    request.instigator,
                    pose.section()
                ));
            }
        }

        health_changed.write(HealthPercentChanged {
            entity: request.target,
            percent: health.percent(),
        });

        damage_dealt.write(DamageDealt {
            attacker: request.instigator,
            target: request.target,
            damage: request.amount,
            applied: outcome.applied(),
            target_died: matches!(outcome, DamageOutcome::Died { .. }),
            prior_state,
        });
    }
}

/// Система: последствия смерти
///
/// Dead маркер, движение остановлено, коллизия выключена, оружие уничтожено.
pub fn handle_deaths(
    mut deaths: EventReader<EntityDied>,
    mut commands: Commands,
    mut actors: Query<(
        Option<&EquippedWeapon>,
        Option<&mut MovementCommand>,
        &mut CollisionEnabled,
        &mut Hitboxes,
    )>,
) {
    for died in deaths.read() {
        let Ok((equipped, movement, mut collision, mut hitboxes)) = actors.get_mut(died.entity) else {
            continue;
        };

        if let Some(mut movement) = movement {
            *movement = MovementCommand::Stop;
        }
        collision.0 = false;

        if let Some(weapon) = equipped {
            if let Ok(mut weapon_commands) = commands.get_entity(weapon.0) {
                weapon_commands.despawn();
            }
            hitboxes.remove(HitboxId::WEAPON);
        }

        if let Ok(mut entity_commands) = commands.get_entity(died.entity) {
            entity_commands.insert(Dead).remove::<EquippedWeapon>();
        }
    }
}

/// Система: death hold истёк → заморозить финальный кадр
pub fn fire_death_pose_timers(
    mut actors: Query<(Entity, &CombatActor, &mut ActorTimers)>,
    time: Res<Time>,
    mut animations: EventWriter<AnimationCommand>,
) {
    let now = time.elapsed_secs();

    for (entity, actor, mut timers) in actors.iter_mut() {
        let Some(DeferredTask::FreezeDeathPose { playback }) =
            timers.take_due(now, TaskKind::DeathPoseFreeze)
        else {
            continue;
        };

        let Some(pose) = actor.death_pose() else {
            continue;
        };

        if actor.current_playback() != Some((Montage::Death, playback)) {
            continue;
        }

        animations.write(AnimationCommand::FreezePose {
            entity,
            montage: Montage::Death,
            section: pose.section().to_string(),
        });
    }
}
