//! AI movement helpers (MovementCommand для path follower'а хоста).

use bevy::prelude::*;
use crate::ai::AIConfig;
use crate::components::{MovementCommand, NavigationStatus};

/// Двигаться к цели (entity + её текущая позиция)
///
/// No-op (с логом), если нет контроллера движения или цели.
/// Повторный запрос не шлётся, если уже идём к той же цели: path follower
/// перезапускается на каждый MoveTo. Возвращает true, если команда выдана.
pub fn move_to_target(
    agent: Entity,
    movement: Option<&mut MovementCommand>,
    navigation: Option<&NavigationStatus>,
    target: Option<(Entity, Vec3)>,
    config: &AIConfig,
) -> bool {
    let Some(movement) = movement else {
        crate::log(&format!("MoveToTarget: {:?} has no movement controller", agent));
        return false;
    };

    let Some((target, goal)) = target else {
        crate::log(&format!("MoveToTarget: {:?} has no target", agent));
        return false;
    };

    let command = MovementCommand::MoveToEntity {
        target,
        acceptance_radius: config.acceptance_radius,
    };

    if *movement == command {
        return false;
    }

    if navigation.is_some_and(|status| status.is_en_route_to(goal, config.move_tolerance)) {
        return false;
    }

    *movement = command;
    crate::log(&format!("🚶 MoveToTarget: {:?} → {:?}", agent, target));
    true
}

/// Остановить path follower (повторный Stop не пишется)
pub fn stop_movement(movement: Option<&mut MovementCommand>) {
    if let Some(movement) = movement {
        if !movement.is_stop() {
            *movement = MovementCommand::Stop;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> (Entity, Vec3) {
        (Entity::from_raw(5), Vec3::new(300.0, 0.0, 0.0))
    }

    #[test]
    fn test_move_without_controller_is_noop() {
        let config = AIConfig::default();
        assert!(!move_to_target(Entity::from_raw(1), None, None, Some(target()), &config));
    }

    #[test]
    fn test_move_without_target_is_noop() {
        let config = AIConfig::default();
        let mut movement = MovementCommand::Idle;
        assert!(!move_to_target(Entity::from_raw(1), Some(&mut movement), None, None, &config));
        assert_eq!(movement, MovementCommand::Idle);
    }

    #[test]
    fn test_redundant_move_is_suppressed() {
        let config = AIConfig::default();
        let agent = Entity::from_raw(1);
        let mut movement = MovementCommand::Idle;

        assert!(move_to_target(agent, Some(&mut movement), None, Some(target()), &config));
        assert!(!move_to_target(agent, Some(&mut movement), None, Some(target()), &config));

        // Хост уже ведёт к точке рядом с целью
        let mut movement = MovementCommand::Stop;
        let status = NavigationStatus {
            moving: true,
            destination: Some(Vec3::new(250.0, 0.0, 0.0)),
        };
        assert!(!move_to_target(agent, Some(&mut movement), Some(&status), Some(target()), &config));
        assert_eq!(movement, MovementCommand::Stop);
    }

    #[test]
    fn test_stop_movement() {
        let mut movement = MovementCommand::Idle;
        stop_movement(Some(&mut movement));
        assert!(movement.is_stop());
        stop_movement(None);
    }
}
