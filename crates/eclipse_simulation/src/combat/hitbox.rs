//! Weapon/limb hitbox controller
//!
//! Архитектура:
//! - Геометрия и overlap detection — у хоста (physics engine)
//! - ECS хранит только какие hitbox'ы включены (`Hitboxes`)
//! - Timeline cues (`HitboxWindow`) открывают/закрывают окна
//! - Хост шлёт `HitboxOverlap` → проверка swing → `DamageRequest`

use bevy::prelude::*;

use crate::ai::AIConfig;
use crate::combat::{
    Attachment, AttachedTo, CombatActor, CombatTuning, DamageRequest, EquippedWeapon, Weapon,
};
use crate::components::Health;
use crate::player::{HudTargetChanged, Player};

/// Имя hitbox'а (совпадает с именем collision компонента на стороне хоста)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitboxId(pub &'static str);

impl HitboxId {
    pub const WEAPON: HitboxId = HitboxId("weapon_blade");
    pub const KICK_LEFT: HitboxId = HitboxId("foot_l");
    pub const KICK_RIGHT: HitboxId = HitboxId("foot_r");
}

/// Группа hitbox'ов: переключаются вместе
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum HitboxGroup {
    /// Клинок экипированного оружия
    Weapon,
    /// Ноги (kick)
    #[default]
    Limb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitboxSlot {
    pub id: HitboxId,
    pub group: HitboxGroup,
    pub enabled: bool,
}

/// Именованные hitbox'ы актора (все выключены по умолчанию)
#[derive(Component, Debug, Clone, Default)]
pub struct Hitboxes {
    slots: Vec<HitboxSlot>,
}

impl Hitboxes {
    /// Левая и правая нога (kick hitboxes)
    pub fn with_kicks() -> Self {
        let mut hitboxes = Self::default();
        hitboxes.add(HitboxId::KICK_LEFT, HitboxGroup::Limb);
        hitboxes.add(HitboxId::KICK_RIGHT, HitboxGroup::Limb);
        hitboxes
    }

    /// Добавить hitbox (выключенным). Повторное добавление только меняет группу.
    pub fn add(&mut self, id: HitboxId, group: HitboxGroup) {
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.id == id) {
            slot.group = group;
            return;
        }
        self.slots.push(HitboxSlot {
            id,
            group,
            enabled: false,
        });
    }

    pub fn remove(&mut self, id: HitboxId) {
        self.slots.retain(|slot| slot.id != id);
    }

    /// Включить/выключить один hitbox. false если такого нет.
    pub fn set_enabled(&mut self, id: HitboxId, enabled: bool) -> bool {
        let Some(slot) = self.slots.iter_mut().find(|slot| slot.id == id) else {
            return false;
        };
        slot.enabled = enabled;
        true
    }

    pub fn enable_group(&mut self, group: HitboxGroup) {
        self.set_group(group, true);
    }

    pub fn disable_group(&mut self, group: HitboxGroup) {
        self.set_group(group, false);
    }

    pub fn disable_all(&mut self) {
        for slot in &mut self.slots {
            slot.enabled = false;
        }
    }

    pub fn is_enabled(&self, id: HitboxId) -> bool {
        self.slots.iter().any(|slot| slot.id == id && slot.enabled)
    }

    pub fn any_enabled(&self) -> bool {
        self.slots.iter().any(|slot| slot.enabled)
    }

    pub fn group_of(&self, id: HitboxId) -> Option<HitboxGroup> {
        self.slots.iter().find(|slot| slot.id == id).map(|slot| slot.group)
    }

    pub fn slots(&self) -> &[HitboxSlot] {
        &self.slots
    }

    fn set_group(&mut self, group: HitboxGroup, enabled: bool) {
        for slot in self.slots.iter_mut().filter(|slot| slot.group == group) {
            slot.enabled = enabled;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    Begin,
    End,
}

/// Timeline cue: окно активного hitbox'а внутри attack секции
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HitboxWindow {
    pub entity: Entity,
    pub group: HitboxGroup,
    pub phase: WindowPhase,
}

/// Хост: включённый hitbox пересёкся с другой entity
///
/// `source` — актор (limb hitbox) или его оружие (weapon hitbox).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HitboxOverlap {
    pub source: Entity,
    pub hitbox: HitboxId,
    pub other: Entity,
    pub impact_point: Vec3,
}

/// Система: hitbox окна из animation timeline
///
/// Begin → новый swing (свежий hit set) + включить группу. Только пока Attacking.
/// End → выключить группу (swing живёт до конца атаки).
pub fn handle_hitbox_windows(
    mut windows: EventReader<HitboxWindow>,
    mut actors: Query<(&mut CombatActor, &mut Hitboxes)>,
) {
    for window in windows.read() {
        let Ok((mut actor, mut hitboxes)) = actors.get_mut(window.entity) else {
            crate::logger::log_warning(&format!(
                "HitboxWindow: entity {:?} has no CombatActor/Hitboxes",
                window.entity
            ));
            continue;
        };

        match window.phase {
            WindowPhase::Begin => match actor.begin_swing_window(window.entity) {
                Ok(swing) => {
                    hitboxes.enable_group(window.group);
                    crate::logger::log(&format!(
                        "🗡️ Hitbox window begin: {:?} {:?} (swing {:?})",
                        window.entity, window.group, swing
                    ));
                }
                Err(rejected) => {
                    crate::logger::log(&format!(
                        "Hitbox window ignored for {:?}: {}",
                        window.entity, rejected
                    ));
                }
            },
            WindowPhase::End => {
                hitboxes.disable_group(window.group);
            }
        }
    }
}

/// Система: overlap → hit registry → DamageRequest
///
/// Weapon source резолвится в владельца. Overlap игнорируется, если владелец
/// не Attacking, hitbox выключен, или цель уже задета этим swing'ом.
pub fn resolve_hitbox_overlaps(
    mut overlaps: EventReader<HitboxOverlap>,
    mut actors: Query<(&mut CombatActor, &Hitboxes, Option<&EquippedWeapon>, Option<&AIConfig>, Has<Player>)>,
    weapons: Query<&Weapon>,
    attachments: Query<&AttachedTo>,
    targets: Query<(), With<Health>>,
    tuning: Res<CombatTuning>,
    mut damage_requests: EventWriter<DamageRequest>,
    mut hud_targets: EventWriter<HudTargetChanged>,
) {
    for overlap in overlaps.read() {
        let owner = weapons
            .get(overlap.source)
            .map(|weapon| weapon.owner)
            .unwrap_or(overlap.source);

        let Ok((mut actor, hitboxes, equipped, ai_config, is_player)) = actors.get_mut(owner) else {
            continue;
        };

        if !hitboxes.is_enabled(overlap.hitbox) {
            continue;
        }

        if !targets.contains(overlap.other) {
            continue;
        }

        let attachment = Attachment {
            target_attached_to: attachments.get(overlap.other).ok().map(|attached| attached.0),
            owner_attached_to: attachments.get(owner).ok().map(|attached| attached.0),
        };

        // false: не Attacking, self-hit или повторный hit этим swing'ом
        if !actor.try_register_hit(overlap.other, attachment) {
            continue;
        }

        let amount = match hitboxes.group_of(overlap.hitbox) {
            Some(HitboxGroup::Weapon) => equipped
                .and_then(|equipped| weapons.get(equipped.0).ok())
                .map(|weapon| weapon.damage)
                .or(ai_config.map(|config| config.attack_damage))
                .unwrap_or(tuning.unarmed_weapon_damage),
            Some(HitboxGroup::Limb) | None => tuning.kick_damage,
        };

        crate::logger::log(&format!(
            "💥 Hit registered: {:?} → {:?} via {} ({} dmg)",
            owner, overlap.other, overlap.hitbox.0, amount
        ));

        damage_requests.write(DamageRequest {
            target: overlap.other,
            amount,
            instigator: Some(owner),
            impact_point: Some(overlap.impact_point),
        });

        if is_player {
            hud_targets.write(HudTargetChanged {
                viewer: owner,
                target: overlap.other,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hitboxes_start_disabled() {
        let hitboxes = Hitboxes::with_kicks();
        assert_eq!(hitboxes.slots().len(), 2);
        assert!(!hitboxes.any_enabled());
    }

    #[test]
    fn test_group_toggle_only_touches_group() {
        let mut hitboxes = Hitboxes::with_kicks();
        hitboxes.add(HitboxId::WEAPON, HitboxGroup::Weapon);

        hitboxes.enable_group(HitboxGroup::Limb);
        assert!(hitboxes.is_enabled(HitboxId::KICK_LEFT));
        assert!(hitboxes.is_enabled(HitboxId::KICK_RIGHT));
        assert!(!hitboxes.is_enabled(HitboxId::WEAPON));

        hitboxes.enable_group(HitboxGroup::Weapon);
        hitboxes.disable_group(HitboxGroup::Limb);
        assert!(hitboxes.is_enabled(HitboxId::WEAPON));
        assert!(!hitboxes.is_enabled(HitboxId::KICK_LEFT));

        hitboxes.disable_all();
        assert!(!hitboxes.any_enabled());
    }

    #[test]
    fn test_individual_toggle_and_removal() {
        let mut hitboxes = Hitboxes::with_kicks();

        assert!(hitboxes.set_enabled(HitboxId::KICK_RIGHT, true));
        assert!(!hitboxes.set_enabled(HitboxId::WEAPON, true)); // Нет такого hitbox
        assert!(hitboxes.is_enabled(HitboxId::KICK_RIGHT));
        assert!(!hitboxes.is_enabled(HitboxId::KICK_LEFT));

        hitboxes.remove(HitboxId::KICK_RIGHT);
        assert_eq!(hitboxes.group_of(HitboxId::KICK_RIGHT), None);
        assert_eq!(hitboxes.group_of(HitboxId::KICK_LEFT), Some(HitboxGroup::Limb));
    }
}
