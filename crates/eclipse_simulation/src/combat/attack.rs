//! Attack flow: input → swing → hitbox enable → конец атаки
//!
//! Порядок старта атаки:
//! 1. `CombatActor::request_attack` (только из Unoccupied)
//! 2. Все hitbox'ы выключаются
//! 3. Play секции attack montage
//! 4. Hitbox группа атаки включается сразу или через wind-up таймер
//!
//! Конец атаки: completion montage (не interrupted) или `AttackEndCue`.

use bevy::prelude::*;

use crate::combat::{
    AnimationCommand, AttackEndCue, CombatActor, CombatTuning, Hitboxes, Montage, MontageEnded,
    SwingStart, TransitionRejected,
};
use crate::player::AttackInput;
use crate::timers::{ActorTimers, DeferredTask, TaskKind};

/// Общий старт атаки для Player (input) и AI (decision tick)
#[allow(clippy::too_many_arguments)]
pub fn begin_attack(
    entity: Entity,
    actor: &mut CombatActor,
    hitboxes: &mut Hitboxes,
    timers: &mut ActorTimers,
    variant: Option<usize>,
    now: f32,
    tuning: &CombatTuning,
    animations: &mut EventWriter<AnimationCommand>,
) -> Result<SwingStart, TransitionRejected> {
    let start = actor.request_attack(entity, variant)?;

    hitboxes.disable_all();

    let group = actor.attack_hitboxes();
    if tuning.hitbox_enable_delay <= 0.0 {
        hitboxes.enable_group(group);
    } else {
        timers.schedule(
            now,
            tuning.hitbox_enable_delay,
            DeferredTask::EnableHitboxes {
                swing: start.swing,
                group,
            },
        );
    }

    animations.write(AnimationCommand::Play {
        entity,
        montage: Montage::Attack,
        section: start.section.clone(),
        playback: start.playback,
    });

    crate::logger::log(&format!(
        "⚔️ Attack started: {:?} {} (swing {:?})",
        entity, start.section, start.swing
    ));

    Ok(start)
}

/// Атака закончилась (любым путём): hitbox'ы и wind-up таймер гасятся
fn clear_attack(hitboxes: &mut Hitboxes, timers: &mut ActorTimers) {
    hitboxes.disable_all();
    timers.cancel(TaskKind::HitboxEnable);
}

/// Система: AttackInput игрока → begin_attack
///
/// Отказ (занят, мёртв) — тихий: лог на debug уровне, ничего не меняется.
pub fn handle_attack_input(
    mut inputs: EventReader<AttackInput>,
    mut actors: Query<(&mut CombatActor, &mut Hitboxes, &mut ActorTimers)>,
    time: Res<Time>,
    tuning: Res<CombatTuning>,
    mut animations: EventWriter<AnimationCommand>,
) {
    let now = time.elapsed_secs();

    for input in inputs.read() {
        let Ok((mut actor, mut hitboxes, mut timers)) = actors.get_mut(input.entity) else {
            crate::logger::log_warning(&format!(
                "AttackInput: entity {:?} is not a combat actor",
                input.entity
            ));
            continue;
        };

        if let Err(rejected) = begin_attack(
            input.entity,
            &mut actor,
            &mut hitboxes,
            &mut timers,
            input.variant,
            now,
            &tuning,
            &mut animations,
        ) {
            crate::logger::log(&format!("Attack rejected for {:?}: {}", input.entity, rejected));
        }
    }
}

/// Система: completion callbacks анимации
pub fn handle_montage_ended(
    mut endings: EventReader<MontageEnded>,
    mut actors: Query<(&mut CombatActor, &mut Hitboxes, &mut ActorTimers)>,
) {
    for ended in endings.read() {
        let Ok((mut actor, mut hitboxes, mut timers)) = actors.get_mut(ended.entity) else {
            continue;
        };

        match actor.finish_montage(ended.montage, ended.playback, ended.interrupted) {
            Ok(_) => {
                if ended.montage == Montage::Attack {
                    clear_attack(&mut hitboxes, &mut timers);
                }
                crate::logger::log(&format!(
                    "✅ {:?} montage finished: {:?} → {:?}",
                    ended.montage,
                    ended.entity,
                    actor.state()
                ));
            }
            Err(rejected) => {
                crate::logger::log(&format!(
                    "MontageEnded ignored for {:?}: {}",
                    ended.entity, rejected
                ));
            }
        }
    }
}

/// Система: явный AttackEnd notify из timeline
pub fn handle_attack_end_cues(
    mut cues: EventReader<AttackEndCue>,
    mut actors: Query<(&mut CombatActor, &mut Hitboxes, &mut ActorTimers)>,
) {
    for cue in cues.read() {
        let Ok((mut actor, mut hitboxes, mut timers)) = actors.get_mut(cue.entity) else {
            continue;
        };

        match actor.end_attack() {
            Ok(()) => clear_attack(&mut hitboxes, &mut timers),
            Err(rejected) => {
                crate::logger::log(&format!("AttackEnd ignored for {:?}: {}", cue.entity, rejected));
            }
        }
    }
}

/// Система: wind-up таймеры → включение hitbox группы
///
/// Таймер мог устареть (атака закончилась, начался новый swing) → discard.
pub fn fire_hitbox_timers(
    mut actors: Query<(Entity, &CombatActor, &mut Hitboxes, &mut ActorTimers)>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs();

    for (entity, actor, mut hitboxes, mut timers) in actors.iter_mut() {
        let Some(DeferredTask::EnableHitboxes { swing, group }) =
            timers.take_due(now, TaskKind::HitboxEnable)
        else {
            continue;
        };

        if !actor.is_current_swing(swing) {
            crate::logger::log(&format!(
                "Stale hitbox timer discarded: {:?} (swing {:?})",
                entity, swing
            ));
            continue;
        }

        hitboxes.enable_group(group);
        crate::logger::log(&format!("🦶 Hitboxes enabled: {:?} {:?}", entity, group));
    }
}
