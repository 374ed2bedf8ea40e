//! Tests for combat actor state machine.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::combat::{
        ActionState, Attachment, AttackSequence, CombatActor, DamageOutcome, DeathPose,
        HitDirection, ImpactGeometry, Montage, OrientationMode, TransitionRejected,
    };
    use crate::components::Health;

    fn owner() -> Entity {
        Entity::from_raw(10)
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_attack_only_from_unoccupied() {
        let mut actor = CombatActor::default();

        let first = actor.request_attack(owner(), None);
        let second = actor.request_attack(owner(), None);

        assert!(first.is_ok());
        assert_eq!(
            second,
            Err(TransitionRejected::Busy(ActionState::Attacking))
        );
        assert_eq!(actor.state(), ActionState::Attacking);
        assert_eq!(actor.orientation(), OrientationMode::ExplicitFacing);
    }

    #[test]
    fn test_combo_sections_cycle() {
        let mut actor = CombatActor::new(3);
        let mut sections = Vec::new();

        for _ in 0..4 {
            let start = actor.request_attack(owner(), None).unwrap();
            sections.push(start.section);
            actor.end_attack().unwrap();
        }

        assert_eq!(sections, vec!["Attack1", "Attack2", "Attack3", "Attack1"]);
    }

    #[test]
    fn test_explicit_variant_keeps_counter() {
        let mut actor = CombatActor::new(3);

        let start = actor.request_attack(owner(), Some(2)).unwrap();
        assert_eq!(start.section, "Attack3");
        actor.end_attack().unwrap();

        let start = actor.request_attack(owner(), None).unwrap();
        assert_eq!(start.section, "Attack1");
        actor.end_attack().unwrap();

        assert_eq!(
            actor.request_attack(owner(), Some(3)),
            Err(TransitionRejected::UnknownVariant { variant: 3, len: 3 })
        );
        assert_eq!(actor.state(), ActionState::Unoccupied);
    }

    #[test]
    fn test_sequence_wraps() {
        let mut sequence = AttackSequence::new(2);
        assert_eq!(sequence.advance(), 0);
        assert_eq!(sequence.advance(), 1);
        assert_eq!(sequence.advance(), 0);

        sequence.advance();
        sequence.reset_if_complete();
        assert_eq!(sequence.peek(), 0);

        // Нулевая длина → одна секция
        assert_eq!(AttackSequence::new(0).combo_len(), 1);
    }

    #[test]
    fn test_end_attack_restores_orientation_and_clears_swing() {
        let mut actor = CombatActor::default();
        actor.request_attack(owner(), None).unwrap();
        assert!(actor.current_swing().is_some());

        actor.end_attack().unwrap();

        assert_eq!(actor.state(), ActionState::Unoccupied);
        assert_eq!(actor.orientation(), OrientationMode::FollowMovement);
        assert!(actor.current_swing().is_none());
        assert_eq!(
            actor.end_attack(),
            Err(TransitionRejected::NotAttacking(ActionState::Unoccupied))
        );
    }

    #[test]
    fn test_new_swing_window_resets_hit_set() {
        let mut actor = CombatActor::default();
        let target = Entity::from_raw(20);

        let start = actor.request_attack(owner(), None).unwrap();
        assert!(actor.try_register_hit(target, Attachment::default()));
        assert!(!actor.try_register_hit(target, Attachment::default()));

        let next = actor.begin_swing_window(owner()).unwrap();
        assert_ne!(next, start.swing);
        assert!(actor.is_current_swing(next));
        assert!(!actor.is_current_swing(start.swing));
        assert!(actor.try_register_hit(target, Attachment::default()));
    }

    #[test]
    fn test_no_hits_outside_attack() {
        let mut actor = CombatActor::default();
        assert!(!actor.try_register_hit(Entity::from_raw(20), Attachment::default()));
        assert!(actor.begin_swing_window(owner()).is_err());
    }

    #[test]
    fn test_damage_sequence_leaves_55_hp() {
        let mut actor = CombatActor::default();
        let mut health = Health::new(100);
        let mut rng = rng();

        for _ in 0..3 {
            let outcome = actor.apply_damage(&mut health, 15, None, &mut rng).unwrap();
            assert!(matches!(outcome, DamageOutcome::HitReact { applied: 15, .. }));
            assert_eq!(actor.state(), ActionState::HitReacting);
        }

        assert_eq!(health.current, 55);
    }

    #[test]
    fn test_lethal_damage_is_terminal() {
        let mut actor = CombatActor::default();
        let mut health = Health::new(10);
        let mut rng = rng();

        let outcome = actor.apply_damage(&mut health, 15, None, &mut rng).unwrap();
        assert!(matches!(outcome, DamageOutcome::Died { applied: 10, .. }));
        assert_eq!(health.current, 0);
        assert_eq!(actor.state(), ActionState::Dead);
        assert!(actor.death_pose().is_some());

        // Мёртвый: всё no-op
        assert_eq!(
            actor.apply_damage(&mut health, 15, None, &mut rng),
            Err(TransitionRejected::Dead)
        );
        assert_eq!(actor.request_attack(owner(), None), Err(TransitionRejected::Dead));
        assert_eq!(health.current, 0);
        assert_eq!(actor.state(), ActionState::Dead);
    }

    #[test]
    fn test_damage_interrupts_attack() {
        let mut actor = CombatActor::default();
        let mut health = Health::new(100);
        let start = actor.request_attack(owner(), None).unwrap();

        actor.apply_damage(&mut health, 5, None, &mut rng()).unwrap();

        assert_eq!(actor.state(), ActionState::HitReacting);
        assert!(actor.current_swing().is_none());
        assert!(!actor.is_current_swing(start.swing));

        // Completion прерванной атаки — stale токен
        let result = actor.finish_montage(Montage::Attack, start.playback, true);
        assert!(matches!(result, Err(TransitionRejected::StalePlayback { .. })));
        assert_eq!(actor.state(), ActionState::HitReacting);
    }

    #[test]
    fn test_hit_direction_from_impact() {
        let mut actor = CombatActor::default();
        let mut health = Health::new(100);

        let impact = ImpactGeometry {
            forward: Vec3::NEG_Z,
            position: Vec3::ZERO,
            impact_point: Vec3::new(40.0, 100.0, 0.0),
        };
        let outcome = actor.apply_damage(&mut health, 1, Some(impact), &mut rng()).unwrap();

        assert!(matches!(
            outcome,
            DamageOutcome::HitReact { direction: HitDirection::Right, .. }
        ));
        assert_eq!(actor.last_reaction(), Some(HitDirection::Right));
    }

    #[test]
    fn test_montage_completion_requires_current_token() {
        let mut actor = CombatActor::default();
        let start = actor.request_attack(owner(), None).unwrap();

        // Interrupted атака не завершается
        assert_eq!(
            actor.finish_montage(Montage::Attack, start.playback, true),
            Err(TransitionRejected::Interrupted(Montage::Attack))
        );
        assert_eq!(actor.state(), ActionState::Attacking);

        assert_eq!(
            actor.finish_montage(Montage::Attack, start.playback, false),
            Ok(ActionState::Unoccupied)
        );

        // Повторный callback того же playback — уже stale
        assert!(actor.finish_montage(Montage::Attack, start.playback, false).is_err());
    }

    #[test]
    fn test_hit_react_completion() {
        let mut actor = CombatActor::default();
        let mut health = Health::new(100);

        let DamageOutcome::HitReact { playback, .. } =
            actor.apply_damage(&mut health, 10, None, &mut rng()).unwrap()
        else {
            panic!("expected hit react");
        };

        // Повторный урон перезапускает реакцию → старый токен устарел
        let DamageOutcome::HitReact { playback: second, .. } =
            actor.apply_damage(&mut health, 10, None, &mut rng()).unwrap()
        else {
            panic!("expected hit react");
        };

        assert!(actor.finish_montage(Montage::HitReact, playback, false).is_err());
        assert_eq!(
            actor.finish_montage(Montage::HitReact, second, false),
            Ok(ActionState::Unoccupied)
        );
        assert!(actor.request_attack(owner(), None).is_ok());
    }

    #[test]
    fn test_death_pose_is_deterministic_per_seed() {
        let pose_for = |seed: u64| {
            let mut actor = CombatActor::default();
            let mut health = Health::new(1);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            actor.apply_damage(&mut health, 1, None, &mut rng).unwrap();
            actor.death_pose()
        };

        for seed in 0..8 {
            assert_eq!(pose_for(seed), pose_for(seed));
        }
        assert!(DeathPose::ALL.iter().any(|pose| pose.section() == "flying_death"));
    }
}
