//! End-to-end controller scenarios played out in the arena.

use swarm_arena::arena::{ActionRecord, Arena};
use swarm_arena::entity::Side;
use swarm_core::body::BodyBuilder;
use swarm_core::components::{BodyPart, EntityId};
use swarm_core::controller::Controller;
use swarm_core::data::{ControllerConfig, RoleTemplate};
use swarm_core::math::Position;
use swarm_core::roles::Role;
use swarm_core::stage::Stage;
use swarm_core::world::Action;
use swarm_test_utils::fixtures::{arena_with_spawns, carrier_body, melee_body};

fn orders_of(journal: &[ActionRecord], actor: EntityId) -> Vec<&Action> {
    journal
        .iter()
        .filter(|r| r.actor == actor)
        .map(|r| &r.action)
        .collect()
}

fn play(controller: &mut Controller, arena: &mut Arena) -> swarm_core::controller::TickReport {
    let report = controller.tick(&mut arena.view(Side::Player)).unwrap();
    arena.step();
    report
}

#[test]
fn no_enemies_and_too_few_carriers_spawns_one_carrier() {
    let (mut arena, spawn, _) = arena_with_spawns(30, 30);
    let mut controller = Controller::new(ControllerConfig::default());

    let report = play(&mut controller, &mut arena);

    assert_eq!(report.stage, Stage::SpawnWorkers);
    let orders = orders_of(arena.journal(), spawn);
    assert_eq!(orders.len(), 1);
    assert!(matches!(orders[0], Action::Spawn(body) if body.contains(&BodyPart::Carry)));
    assert!(!arena.journal().iter().any(|r| r.action.is_combat()));
}

#[test]
fn spawn_army_rallies_existing_fighters_and_spawns_in_order() {
    let (mut arena, spawn, _) = arena_with_spawns(30, 30);
    for x in 3..6 {
        arena.add_unit(Side::Player, carrier_body(), Position::new(x, 2));
    }
    let fighter = arena.add_unit(Side::Player, melee_body(), Position::new(12, 12));
    let mut controller = Controller::new(ControllerConfig::default());

    let first = play(&mut controller, &mut arena);
    assert_eq!(first.stage, Stage::SpawnArmy);
    assert!(orders_of(arena.journal(), spawn).is_empty());

    let second = play(&mut controller, &mut arena);
    assert_eq!(second.previous_stage, Stage::SpawnArmy);
    assert_eq!(second.stage, Stage::SpawnArmy);
    assert_eq!(second.spawn_complete, Some(false));

    let rally = controller.context().map(|ctx| ctx.rally_point).unwrap();
    assert_eq!(rally, Position::new(1, 10));
    assert_eq!(orders_of(arena.journal(), fighter), vec![&Action::MoveTo(rally)]);

    // Melee attackers are declared first; the busy spawn refuses the rest.
    let spawned = orders_of(arena.journal(), spawn);
    assert_eq!(spawned.len(), 1);
    assert!(matches!(
        spawned[0],
        Action::Spawn(body) if body.contains(&BodyPart::Attack) && !body.contains(&BodyPart::RangedAttack)
    ));
}

#[test]
fn defended_enemy_base_keeps_attacking_units() {
    let (mut arena, _, _) = arena_with_spawns(120, 20);
    let guard = arena.add_unit(Side::Opponent, melee_body(), Position::new(110, 15));
    let fighter = arena.add_unit(Side::Player, melee_body(), Position::new(109, 15));
    let mut controller = Controller::starting_in(ControllerConfig::default(), Stage::Attack);

    let report = play(&mut controller, &mut arena);

    assert_eq!(report.stage, Stage::Attack);
    assert_eq!(orders_of(arena.journal(), fighter), vec![&Action::Attack(guard)]);
}

#[test]
fn undefended_enemy_base_becomes_the_target() {
    let (mut arena, _, enemy_spawn) = arena_with_spawns(120, 20);
    // Carriers are not an army and do not defend their base.
    arena.add_unit(Side::Opponent, carrier_body(), Position::new(116, 16));
    let fighter = arena.add_unit(Side::Player, melee_body(), Position::new(117, 17));
    let mut controller = Controller::starting_in(ControllerConfig::default(), Stage::Attack);

    let first = play(&mut controller, &mut arena);
    assert_eq!(first.stage, Stage::AttackBase);

    let second = play(&mut controller, &mut arena);
    assert_eq!(second.stage, Stage::AttackBase);
    let attacks: Vec<_> = arena
        .journal()
        .iter()
        .filter(|r| r.actor == fighter && r.action.is_combat())
        .map(|r| (r.tick, &r.action))
        .collect();
    assert_eq!(attacks, vec![(2, &Action::Attack(enemy_spawn))]);
}

#[test]
fn threat_near_base_preempts_attack() {
    let (mut arena, _, _) = arena_with_spawns(120, 20);
    let config = ControllerConfig {
        economy: Vec::new(),
        army: Vec::new(),
        ..ControllerConfig::default()
    };
    arena.add_unit(Side::Player, melee_body(), Position::new(1, 5));
    arena.add_unit(Side::Opponent, melee_body(), Position::new(20, 10));
    let mut controller = Controller::starting_in(config, Stage::SpawnArmy);

    let report = play(&mut controller, &mut arena);

    assert_eq!(report.spawn_complete, Some(true));
    assert_eq!(report.stage, Stage::Defense);
}

#[test]
fn small_army_marches_on_the_enemy_spawn() {
    let (mut arena, _, enemy_spawn) = arena_with_spawns(30, 30);
    let config = ControllerConfig {
        economy: vec![RoleTemplate::new(Role::Carrier, carrier_body(), 1)],
        army: vec![RoleTemplate::new(Role::Attacker, BodyBuilder::new().attack(1).moves(1).build(), 1)],
        ..ControllerConfig::default()
    };
    let mut controller = Controller::new(config);

    let mut stages = Vec::new();
    for _ in 0..80 {
        stages.push(play(&mut controller, &mut arena).stage);
    }

    assert!(stages.contains(&Stage::SpawnArmy));
    assert_eq!(controller.stage(), Stage::AttackBase);
    let hits = arena.structure(enemy_spawn).map(|s| s.hits).unwrap();
    assert!(hits < 3000, "enemy spawn untouched");
}
