//! Контракт с animation playback хоста
//!
//! ECS → хост: `AnimationCommand` (play section / stop / freeze pose).
//! Хост → ECS: `MontageEnded` (completion callback) и timeline cues (`HitboxWindow`, `AttackEndCue`).
//!
//! Каждый play несёт `PlaybackId`. Актор помнит токен текущего playback,
//! completion с чужим токеном — устаревший (playback вытеснен) и игнорируется.

use bevy::prelude::*;

/// Анимационный ассет (montage) со своими секциями
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Montage {
    Attack,
    HitReact,
    Death,
}

/// Токен конкретного проигрывания
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub struct PlaybackId(pub u64);

/// Имя секции атаки: "Attack1".."AttackN" (index с нуля)
pub fn attack_section(index: usize) -> String {
    format!("Attack{}", index + 1)
}

/// Команды для animation системы хоста (fire-and-forget)
#[derive(Event, Debug, Clone, PartialEq)]
pub enum AnimationCommand {
    /// Проиграть секцию montage
    Play {
        entity: Entity,
        montage: Montage,
        section: String,
        playback: PlaybackId,
    },
    /// Остановить все montage с blend out
    StopAll { entity: Entity, blend_out: f32 },
    /// Остановить montage на последнем кадре секции и заморозить позу
    FreezePose {
        entity: Entity,
        montage: Montage,
        section: String,
    },
}

/// Completion callback: montage доиграл или был прерван
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MontageEnded {
    pub entity: Entity,
    pub montage: Montage,
    pub playback: PlaybackId,
    pub interrupted: bool,
}

/// Явный AttackEnd notify из timeline (не дожидаясь конца montage)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AttackEndCue {
    pub entity: Entity,
}
