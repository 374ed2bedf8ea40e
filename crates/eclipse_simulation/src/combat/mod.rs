//! Combat module (melee)
//!
//! ECS ответственность:
//! - Combat actor state machine (Unoccupied/Attacking/HitReacting/Dead)
//! - Hit registry (один hit по цели за swing)
//! - Hitbox enable/disable окна
//! - Damage model: Health, hit reactions, смерть
//!
//! Хост ответственность:
//! - Animation playback (montage секции, timeline cues, completion callbacks)
//! - Collision geometry hitbox'ов и overlap detection
//!
//! Связь: `AnimationCommand` (ECS → хост), `MontageEnded`/`HitboxWindow`/`HitboxOverlap` (хост → ECS)

use bevy::prelude::*;

pub mod animation;
pub mod attack;
pub mod damage;
pub mod geometry;
pub mod hit_registry;
pub mod hitbox;
pub mod state;
pub mod weapon;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod state_tests;

// Re-export основных типов
pub use crate::config::CombatTuning;
pub use animation::{attack_section, AnimationCommand, AttackEndCue, Montage, MontageEnded, PlaybackId};
pub use attack::begin_attack;
pub use damage::{Dead, DamageDealt, DamageRequest, EntityDied, HealthPercentChanged};
pub use geometry::{classify_angle, classify_hit_direction, hit_angle_degrees, HitDirection};
pub use hit_registry::{Attachment, AttackSwing, SwingId};
pub use hitbox::{HitboxGroup, HitboxId, HitboxOverlap, HitboxSlot, HitboxWindow, Hitboxes, WindowPhase};
pub use state::{
    ActionState, AttackSequence, CombatActor, DamageOutcome, DeathPose, ImpactGeometry,
    OrientationMode, SwingStart, TransitionRejected, DEFAULT_COMBO_LENGTH,
};
pub use weapon::{AttachedTo, EquipWeaponRequest, EquippedWeapon, Weapon};

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate (`SimulationSet::Combat`).
///
/// Порядок выполнения:
/// 1. equip_weapons — выдача оружия
/// 2. handle_attack_input — старт атак игрока
/// 3. handle_hitbox_windows / fire_hitbox_timers — включение hitbox'ов
/// 4. resolve_hitbox_overlaps — hit registry → DamageRequest
/// 5. apply_damage / handle_deaths — Health, hit react, смерть
/// 6. handle_attack_end_cues / handle_montage_ended — завершение атак и реакций
/// 7. fire_death_pose_timers — freeze финального кадра
///
/// Урон обрабатывается раньше completion callbacks: прерванная атака
/// получает stale токен и не завершается повторно.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<AnimationCommand>()
            .add_event::<MontageEnded>()
            .add_event::<AttackEndCue>()
            .add_event::<HitboxWindow>()
            .add_event::<HitboxOverlap>()
            .add_event::<DamageRequest>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<HealthPercentChanged>()
            .add_event::<EquipWeaponRequest>()
            .add_event::<crate::player::AttackInput>()
            .add_event::<crate::player::HudTargetChanged>();

        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: экипировка и старт атак
                weapon::equip_weapons,
                attack::handle_attack_input,

                // Фаза 2: hitbox окна
                hitbox::handle_hitbox_windows,
                attack::fire_hitbox_timers,

                // Фаза 3: hits → damage
                hitbox::resolve_hitbox_overlaps,
                damage::apply_damage,
                damage::handle_deaths,

                // Фаза 4: завершение анимаций
                attack::handle_attack_end_cues,
                attack::handle_montage_ended,
                damage::fire_death_pose_timers,
            )
                .chain() // Последовательное выполнение
                .in_set(crate::SimulationSet::Combat),
        );
    }
}
