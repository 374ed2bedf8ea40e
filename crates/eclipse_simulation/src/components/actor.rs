//! Базовые компоненты акторов: Actor, Health, Facing, коллизия

use bevy::prelude::*;

/// Актор (игрок, враг) — базовый компонент для живых существ
///
/// Через Required Components получает всё, что нужно боевой системе:
/// Health, CombatActor (state machine), Hitboxes, ActorTimers, Facing, коллизию.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(
    Health,
    Facing,
    CollisionRadius,
    CollisionEnabled,
    crate::combat::CombatActor,
    crate::combat::Hitboxes,
    crate::timers::ActorTimers
)]
pub struct Actor {
    /// Stable ID фракции (разные фракции = враги)
    pub faction_id: u64,
}

impl Actor {
    pub fn is_hostile_to(&self, other: &Actor) -> bool {
        self.faction_id != other.faction_id
    }
}

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max. Меняется только damage моделью (и `heal` от хоста).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Снимает HP с clamp в 0. Возвращает сколько реально снято.
    pub fn receive_damage(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_sub(amount);
        before - self.current
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.max);
    }

    /// Доля здоровья в [0, 1] (для HUD)
    pub fn percent(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        (self.current as f32 / self.max as f32).clamp(0.0, 1.0)
    }
}

/// Направление взгляда (unit vector, горизонтальная плоскость)
///
/// Пока актор атакует, ориентация управляется явно через Facing,
/// а не направлением движения (см. `OrientationMode`).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Facing(pub Vec3);

impl Default for Facing {
    fn default() -> Self {
        Self(Vec3::NEG_Z) // Bevy forward
    }
}

impl Facing {
    /// Facing от `from` к `to` без вертикальной составляющей.
    ///
    /// None если точки совпадают по горизонтали.
    pub fn towards(from: Vec3, to: Vec3) -> Option<Self> {
        let flat = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
        let direction = flat.try_normalize()?;
        Some(Self(direction))
    }
}

/// Радиус collision капсулы (world units)
///
/// Участвует в attack range: чистая center-to-center дистанция врёт для больших капсул.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CollisionRadius(pub f32);

impl Default for CollisionRadius {
    fn default() -> Self {
        Self(34.0)
    }
}

/// Коллизия актора включена (хост читает и применяет к капсуле/мешу)
///
/// Выключается при смерти.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct CollisionEnabled(pub bool);

impl Default for CollisionEnabled {
    fn default() -> Self {
        Self(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_clamps_at_zero() {
        let mut health = Health::new(100);

        assert_eq!(health.receive_damage(30), 30);
        assert_eq!(health.current, 70);
        assert!(health.is_alive());

        assert_eq!(health.receive_damage(100), 70); // Saturating sub
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_heal_clamped_to_max() {
        let mut health = Health::new(100);
        health.receive_damage(50);

        health.heal(30);
        assert_eq!(health.current, 80);

        health.heal(100);
        assert_eq!(health.current, 100);
    }

    #[test]
    fn test_health_percent_in_unit_range() {
        let mut health = Health::new(200);
        assert_eq!(health.percent(), 1.0);

        health.receive_damage(50);
        assert_eq!(health.percent(), 0.75);

        health.receive_damage(1000);
        assert_eq!(health.percent(), 0.0);

        assert_eq!(Health::new(0).percent(), 0.0);
    }

    #[test]
    fn test_facing_towards_ignores_height() {
        let facing = Facing::towards(Vec3::ZERO, Vec3::new(3.0, 50.0, 0.0)).unwrap();
        assert_eq!(facing.0, Vec3::X);

        assert!(Facing::towards(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0)).is_none());
    }

    #[test]
    fn test_hostility_by_faction() {
        let player = Actor { faction_id: 1 };
        let enemy = Actor { faction_id: 2 };
        assert!(player.is_hostile_to(&enemy));
        assert!(!player.is_hostile_to(&player.clone()));
    }
}
