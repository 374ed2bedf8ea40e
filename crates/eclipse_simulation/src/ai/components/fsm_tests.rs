//! Tests for patrol/chase AI components.

#[cfg(test)]
mod tests {
    use super::super::fsm::*;
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config_with_buffer() -> AIConfig {
        AIConfig {
            attack_range: 150.0,
            range_buffer: 10.0,
            ..default()
        }
    }

    #[test]
    fn test_patrol_state_default() {
        assert_eq!(PatrolState::default(), PatrolState::Patrolling);
        assert_eq!(PatrolState::Patrolling.chase_target(), None);
    }

    #[test]
    fn test_ai_config_default() {
        let config = AIConfig::default();
        assert_eq!(config.patrol_radius, 200.0);
        assert_eq!(config.attack_range, 150.0);
        assert_eq!(config.attack_damage, 20);
        assert_eq!(config.wait_min, 5.0);
        assert_eq!(config.wait_max, 10.0);
    }

    #[test]
    fn test_effective_range_includes_capsules() {
        let config = config_with_buffer();
        assert_eq!(effective_attack_range(&config, 10.0, 10.0), 180.0);

        let origin = Vec3::ZERO;
        assert!(in_attack_range(&config, origin, 10.0, Vec3::new(140.0, 0.0, 0.0), 10.0));
        assert!(in_attack_range(&config, origin, 10.0, Vec3::new(180.0, 0.0, 0.0), 10.0));
        assert!(!in_attack_range(&config, origin, 10.0, Vec3::new(200.0, 0.0, 0.0), 10.0));
    }

    #[test]
    fn test_choose_patrol_target_excludes_current() {
        let points: Vec<Entity> = (1..=4).map(Entity::from_raw).collect();
        let mut route = PatrolRoute::new(points.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..50 {
            let next = choose_patrol_target(&route, &mut rng).unwrap();
            assert_ne!(Some(next), route.current);
            assert!(points.contains(&next));
            route.current = Some(next);
        }
    }

    #[test]
    fn test_choose_patrol_target_single_point() {
        let route = PatrolRoute::new(vec![Entity::from_raw(1)]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(choose_patrol_target(&route, &mut rng), None);
        assert_eq!(choose_patrol_target(&PatrolRoute::default(), &mut rng), None);
    }

    #[test]
    fn test_patrol_wait_within_bounds() {
        let config = AIConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..100 {
            let wait = roll_patrol_wait(&config, &mut rng);
            assert!((config.wait_min..=config.wait_max).contains(&wait), "wait = {}", wait);
        }

        let fixed = AIConfig {
            wait_min: 2.0,
            wait_max: 1.0,
            ..default()
        };
        assert_eq!(roll_patrol_wait(&fixed, &mut rng), 2.0);
    }

    #[test]
    fn test_config_roundtrip_keeps_defaults_for_missing_fields() {
        // serde(default): частичный конфиг дополняется значениями по умолчанию
        let config: AIConfig = serde_json::from_str(r#"{"attack_range": 90.0}"#).unwrap();
        assert_eq!(config.attack_range, 90.0);
        assert_eq!(config.patrol_radius, 200.0);
    }
}
