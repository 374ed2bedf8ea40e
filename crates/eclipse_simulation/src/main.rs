//! Headless симуляция Eclipse
//!
//! Скриптованная дуэль: игрок идёт к патрулирующему врагу и бьёт ногами,
//! враг замечает игрока, преследует и атакует оружием.
//! Хост (анимации, движение, overlap'ы) — `HeadlessHostPlugin`.
//!
//! Usage: `eclipse_simulation [seed]`

use bevy::prelude::*;
use eclipse_simulation::headless::HeadlessHostPlugin;
use eclipse_simulation::*;

const TICK_RATE: f32 = 60.0;
const MAX_TICKS: usize = 60 * 60;

/// Скрипт игрока: подойти к ближайшему врагу и атаковать в радиусе
fn player_script(
    mut players: Query<(Entity, &Transform, &CombatActor, &mut Facing, &mut MovementCommand), With<Player>>,
    enemies: Query<(Entity, &Transform, &CombatActor), With<AiAgent>>,
    mut attacks: EventWriter<AttackInput>,
) {
    for (player, transform, combat, mut facing, mut movement) in players.iter_mut() {
        if combat.is_dead() {
            continue;
        }

        let nearest = enemies
            .iter()
            .filter(|(_, _, enemy)| !enemy.is_dead())
            .map(|(enemy, enemy_transform, _)| {
                (enemy, enemy_transform.translation, transform.translation.distance(enemy_transform.translation))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2));

        let Some((enemy, enemy_position, distance)) = nearest else {
            if !movement.is_stop() {
                *movement = MovementCommand::Stop;
            }
            continue;
        };

        if distance > 150.0 {
            let command = MovementCommand::MoveToEntity {
                target: enemy,
                acceptance_radius: 100.0,
            };
            if *movement != command {
                *movement = command;
            }
            continue;
        }

        if combat.state() == ActionState::Unoccupied {
            if let Some(towards) = Facing::towards(transform.translation, enemy_position) {
                *facing = towards;
            }
            attacks.write(AttackInput {
                entity: player,
                variant: None,
            });
        }
    }
}

/// HUD: печать событий для игрока
fn report_hud(
    mut health_changes: EventReader<HealthPercentChanged>,
    mut hud_targets: EventReader<HudTargetChanged>,
    mut deaths: EventReader<EntityDied>,
) {
    for change in health_changes.read() {
        log_info(&format!("HUD: {:?} health {:.0}%", change.entity, change.percent * 100.0));
    }
    for target in hud_targets.read() {
        log_info(&format!("HUD: {:?} now targets {:?}", target.viewer, target.target));
    }
    for died in deaths.read() {
        log_info(&format!("HUD: {:?} died (killer {:?})", died.entity, died.killer));
    }
}

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);

    init_logger();
    logger::set_log_level(LogLevel::Info);
    log_info(&format!("Starting Eclipse headless duel (seed: {})", seed));

    let mut app = create_headless_app(seed);
    app.add_plugins(HeadlessHostPlugin).add_systems(
        FixedUpdate,
        (
            player_script.before(SimulationSet::Ai),
            report_hud.after(SimulationSet::Combat),
        ),
    );

    let world = app.world_mut();

    let points: Vec<Entity> = [
        Vec3::new(-400.0, 0.0, -800.0),
        Vec3::new(400.0, 0.0, -800.0),
        Vec3::new(0.0, 0.0, -1200.0),
    ]
    .into_iter()
    .map(|position| world.spawn((PatrolPoint, Transform::from_translation(position))).id())
    .collect();

    let player = world
        .spawn((
            Player::bundle(1),
            Transform::from_translation(Vec3::ZERO),
            MovementCommand::Idle,
            NavigationStatus::default(),
        ))
        .id();

    let enemy = world
        .spawn((
            AiAgent::bundle(2, PatrolRoute::new(points)),
            Transform::from_translation(Vec3::new(0.0, 0.0, -900.0)),
            Health::new(60),
        ))
        .id();

    world.send_event(EquipWeaponRequest {
        owner: enemy,
        damage: 20,
    });

    let dt = 1.0 / TICK_RATE;
    for tick in 0..MAX_TICKS {
        step_simulation(&mut app, dt);

        let world = app.world();
        let player_dead = world.get::<Dead>(player).is_some();
        let enemy_dead = world.get::<Dead>(enemy).is_some();

        if tick % 60 == 0 {
            let health = |entity: Entity| world.get::<Health>(entity).map(|health| health.current).unwrap_or(0);
            log_info(&format!(
                "Tick {}: player {} HP, enemy {} HP",
                tick,
                health(player),
                health(enemy)
            ));
        }

        if player_dead || enemy_dead {
            log_info(&format!(
                "Duel finished at tick {}: {}",
                tick,
                if enemy_dead { "player wins" } else { "enemy wins" }
            ));
            break;
        }
    }

    log_info("Simulation complete!");
}
