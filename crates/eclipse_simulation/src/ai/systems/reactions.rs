//! AI reaction systems (death, damage).

use bevy::prelude::*;
use crate::ai::{AiAgent, PatrolState};
use crate::combat::{ActionState, DamageDealt, EntityDied};
use crate::components::{Actor, Health};
use crate::timers::{ActorTimers, TaskKind};

/// System: смерть → AI в Dead state
///
/// Combat таймеры уже отменены damage моделью (там же запланирован freeze позы),
/// здесь гасим только patrol ожидание.
pub fn handle_ai_death(
    mut deaths: EventReader<EntityDied>,
    mut agents: Query<(&mut PatrolState, &mut ActorTimers), With<AiAgent>>,
) {
    for died in deaths.read() {
        let Ok((mut state, mut timers)) = agents.get_mut(died.entity) else {
            continue;
        };

        *state = PatrolState::Dead;
        timers.cancel(TaskKind::PatrolWait);
        crate::log(&format!("AI {:?} died → Dead state", died.entity));
    }
}

/// System: AI реакция на полученный урон
///
/// Ударили (враг, живой) и агент не атаковал в момент удара → преследуем обидчика.
/// Смотрим `prior_state`: к этому тику урон уже перевёл агента в HitReacting.
pub fn aggro_on_damage(
    mut damage_events: EventReader<DamageDealt>,
    mut agents: Query<(&Actor, &mut PatrolState, &mut ActorTimers), With<AiAgent>>,
    attackers: Query<(&Actor, &Health)>,
) {
    for damage in damage_events.read() {
        if damage.target_died {
            continue;
        }

        let Some(attacker) = damage.attacker else {
            continue;
        };

        let Ok((victim_actor, mut state, mut timers)) = agents.get_mut(damage.target) else {
            continue;
        };

        let Ok((attacker_actor, attacker_health)) = attackers.get(attacker) else {
            continue;
        };

        // Friendly fire и мёртвые обидчики — игнорируем
        if !victim_actor.is_hostile_to(attacker_actor) || !attacker_health.is_alive() {
            continue;
        }

        if *state == PatrolState::Dead || damage.prior_state == ActionState::Attacking {
            continue;
        }

        if state.chase_target() == Some(attacker) {
            continue;
        }

        *state = PatrolState::Chasing { target: attacker };
        timers.cancel(TaskKind::PatrolWait);
        crate::log(&format!("😠 AI {:?} aggro on {:?} (damaged)", damage.target, attacker));
    }
}
