//! Экипировка оружия
//!
//! Оружие — отдельная entity (`Weapon` + `AttachedTo(owner)`).
//! Владелец держит `EquippedWeapon(weapon)` и weapon hitbox в своих `Hitboxes`.
//! Ownership эксклюзивный: новое оружие уничтожает старое, смерть уничтожает текущее.

use bevy::prelude::*;

use crate::combat::{Dead, HitboxGroup, HitboxId, Hitboxes};

/// Оружие (entity, прикреплённая к владельцу)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Weapon {
    pub owner: Entity,
    /// Урон weapon hitbox'а за один hit
    pub damage: u32,
}

/// Текущее оружие актора
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct EquippedWeapon(pub Entity);

/// Entity прикреплена к актору (оружие, attachments)
///
/// Прикреплённые entity не могут быть задеты swing'ом владельца.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AttachedTo(pub Entity);

/// Запрос: выдать актору оружие с заданным уроном
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EquipWeaponRequest {
    pub owner: Entity,
    pub damage: u32,
}

/// Система: обработка EquipWeaponRequest
///
/// Старое оружие деспавнится, новое спавнится с выключенным weapon hitbox.
/// Мёртвым оружие не выдаётся.
pub fn equip_weapons(
    mut requests: EventReader<EquipWeaponRequest>,
    mut commands: Commands,
    mut owners: Query<(Option<&EquippedWeapon>, &mut Hitboxes, Has<Dead>)>,
) {
    for request in requests.read() {
        let Ok((equipped, mut hitboxes, is_dead)) = owners.get_mut(request.owner) else {
            crate::logger::log_warning(&format!(
                "EquipWeaponRequest: {:?} is not a combat actor",
                request.owner
            ));
            continue;
        };

        if is_dead {
            crate::logger::log(&format!("EquipWeaponRequest ignored: {:?} is dead", request.owner));
            continue;
        }

        if let Some(previous) = equipped {
            if let Ok(mut previous_weapon) = commands.get_entity(previous.0) {
                previous_weapon.despawn();
            }
        }

        let weapon = commands
            .spawn((
                Weapon {
                    owner: request.owner,
                    damage: request.damage,
                },
                AttachedTo(request.owner),
            ))
            .id();

        commands.entity(request.owner).insert(EquippedWeapon(weapon));

        hitboxes.add(HitboxId::WEAPON, HitboxGroup::Weapon);
        hitboxes.set_enabled(HitboxId::WEAPON, false);

        crate::logger::log(&format!(
            "🗡️ Weapon {:?} equipped by {:?} ({} dmg)",
            weapon, request.owner, request.damage
        ));
    }
}
