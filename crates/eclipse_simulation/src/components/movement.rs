//! Movement компоненты: команды навигации и статус path follower'а

use bevy::prelude::*;

/// Команда движения для актора (выполняется pathfinding хоста)
///
/// Архитектура:
/// - ECS система пишет MovementCommand (high-level intent)
/// - Хост читает и конвертирует в запрос path follower'у
/// - Хост пишет обратно `NavigationStatus`
///
/// Отсутствие компонента = у актора нет контроллера (MoveTo → no-op + лог).
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub enum MovementCommand {
    /// Стоять на месте (не трогать path follower)
    #[default]
    Idle,
    /// Двигаться к позиции (world coordinates)
    MoveToPosition { target: Vec3, acceptance_radius: f32 },
    /// Следовать за entity до acceptance radius
    MoveToEntity { target: Entity, acceptance_radius: f32 },
    /// Остановиться немедленно (StopMovement)
    Stop,
}

impl MovementCommand {
    pub fn is_stop(&self) -> bool {
        matches!(self, MovementCommand::Stop)
    }
}

/// Статус path follower'а (пишет хост)
///
/// `destination` — куда сейчас ведёт путь. Используется чтобы не спамить
/// одинаковыми MoveTo (повторный запрос дёргает path follower).
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct NavigationStatus {
    pub moving: bool,
    pub destination: Option<Vec3>,
}

impl NavigationStatus {
    /// Уже идём к цели в пределах `tolerance`?
    pub fn is_en_route_to(&self, goal: Vec3, tolerance: f32) -> bool {
        let Some(destination) = self.destination else {
            return false;
        };
        self.moving && destination.distance_squared(goal) < tolerance * tolerance
    }
}
