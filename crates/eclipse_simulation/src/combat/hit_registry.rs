//! Hit registry: один удар по цели за swing
//!
//! Физика хоста шлёт несколько overlap событий на одну пару hitbox/target
//! за кадр (и за sweep). Без реестра один swing бил бы цель многократно.
//!
//! Check-and-insert — один `&mut self` вызов: внутри кадра overlap'ы
//! обрабатываются последовательно одной системой, перемежаться им не с чем.

use bevy::prelude::*;

/// Идентификатор swing'а (окна активного hitbox)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub struct SwingId(pub u64);

/// Кто к кому прикреплён (для исключения self-hit через оружие/attachments)
///
/// - `target_attached_to`: к кому прикреплена цель (оружие владельца → владелец)
/// - `owner_attached_to`: к кому прикреплён сам владелец swing'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attachment {
    pub target_attached_to: Option<Entity>,
    pub owner_attached_to: Option<Entity>,
}

/// Активный swing атаки
///
/// Создаётся на старте атаки и на каждом begin hitbox окна (chained combo),
/// умирает вместе с атакой. `hit_set` хранит уже задетые цели.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct AttackSwing {
    id: SwingId,
    owner: Entity,
    section: String,
    hit_set: Vec<Entity>,
}

impl AttackSwing {
    pub fn new(id: SwingId, owner: Entity, section: impl Into<String>) -> Self {
        Self {
            id,
            owner,
            section: section.into(),
            hit_set: Vec::new(),
        }
    }

    pub fn id(&self) -> SwingId {
        self.id
    }

    pub fn owner(&self) -> Entity {
        self.owner
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Разрешить ровно одно применение урона по `target` за этот swing.
    ///
    /// false если цель — сам владелец, прикреплена к нему (или он к ней),
    /// либо уже есть в hit set. Иначе цель записывается и возвращается true.
    pub fn try_register_hit(&mut self, target: Entity, attachment: Attachment) -> bool {
        if target == self.owner {
            return false;
        }
        if attachment.target_attached_to == Some(self.owner) {
            return false;
        }
        if attachment.owner_attached_to == Some(target) {
            return false;
        }
        if self.hit_set.contains(&target) {
            return false;
        }

        self.hit_set.push(target);
        true
    }

    pub fn has_hit(&self, target: Entity) -> bool {
        self.hit_set.contains(&target)
    }

    pub fn hit_count(&self) -> usize {
        self.hit_set.len()
    }
}
