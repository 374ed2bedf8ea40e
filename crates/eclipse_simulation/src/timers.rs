//! Отложенные single-shot задачи актора (аналог timer handle движка)
//!
//! Время — игровое (`Time::elapsed_secs`), не wall-clock.
//! На каждый `TaskKind` не больше одной pending задачи: повторный schedule перезаписывает.
//! Эффект задачи применяет владелец домена (combat/ai) и ОБЯЗАН перепроверить
//! состояние актора — задача могла устареть (смерть, конец атаки).

use bevy::prelude::*;

use crate::combat::{HitboxGroup, PlaybackId, SwingId};

/// Что сделать когда таймер сработает
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredTask {
    /// Wind-up закончился → включить hitbox группу (только для того же swing)
    EnableHitboxes { swing: SwingId, group: HitboxGroup },
    /// Ожидание на patrol точке закончилось → выбрать следующую
    PatrolWait,
    /// Death анимация доиграла → заморозить финальный кадр
    FreezeDeathPose { playback: PlaybackId },
}

impl DeferredTask {
    pub fn kind(&self) -> TaskKind {
        match self {
            DeferredTask::EnableHitboxes { .. } => TaskKind::HitboxEnable,
            DeferredTask::PatrolWait => TaskKind::PatrolWait,
            DeferredTask::FreezeDeathPose { .. } => TaskKind::DeathPoseFreeze,
        }
    }
}

/// Слот таймера (один pending task на слот)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    HitboxEnable,
    PatrolWait,
    DeathPoseFreeze,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScheduledTask {
    fire_at: f32,
    task: DeferredTask,
}

/// Pending таймеры актора
#[derive(Component, Debug, Clone, Default)]
pub struct ActorTimers {
    pending: Vec<ScheduledTask>,
}

impl ActorTimers {
    /// Запланировать задачу через `delay` секунд от `now`.
    ///
    /// Pending задача того же kind отменяется (single-shot слот).
    pub fn schedule(&mut self, now: f32, delay: f32, task: DeferredTask) {
        let kind = task.kind();
        self.pending.retain(|scheduled| scheduled.task.kind() != kind);
        self.pending.push(ScheduledTask {
            fire_at: now + delay.max(0.0),
            task,
        });
    }

    /// Отменить задачу. Возвращает true если что-то было pending.
    pub fn cancel(&mut self, kind: TaskKind) -> bool {
        let before = self.pending.len();
        self.pending.retain(|scheduled| scheduled.task.kind() != kind);
        before != self.pending.len()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, kind: TaskKind) -> bool {
        self.pending.iter().any(|scheduled| scheduled.task.kind() == kind)
    }

    pub fn fire_time(&self, kind: TaskKind) -> Option<f32> {
        self.pending
            .iter()
            .find(|scheduled| scheduled.task.kind() == kind)
            .map(|scheduled| scheduled.fire_at)
    }

    /// Забрать задачу, если её время наступило (`now >= fire_at`).
    pub fn take_due(&mut self, now: f32, kind: TaskKind) -> Option<DeferredTask> {
        let index = self
            .pending
            .iter()
            .position(|scheduled| scheduled.task.kind() == kind && now >= scheduled.fire_at)?;
        Some(self.pending.swap_remove(index).task)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
