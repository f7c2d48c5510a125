//! Property tests for classification, spawn planning and stage transitions.

use swarm_arena::entity::Side;
use swarm_core::components::BodyPart;
use swarm_core::roles::{classify, Role};
use swarm_core::spawn::{run_spawn_requests, SpawnRequest};
use swarm_core::stage::{next_stage, Stage, StageMachine};
use swarm_core::world::WorldQuery;
use swarm_test_utils::fixtures::{arena_with_spawns, melee_body};
use swarm_test_utils::proptest::prelude::*;
use swarm_test_utils::strategies::{arb_signals, arb_stage, arb_units};

proptest! {
    #[test]
    fn hybrid_units_appear_in_both_fighter_buckets(units in arb_units(40)) {
        let roster = classify(&units);
        for unit in units.iter().filter(|u| u.my) {
            for role in Role::ALL {
                let listed = roster.my.bucket(role).iter().any(|u| u.id == unit.id);
                prop_assert_eq!(listed, unit.has_part(role.required_part()));
            }
        }
        prop_assert_eq!(roster.my.all.len() + roster.enemy.all.len(), units.len());
    }

    #[test]
    fn fighters_are_deduplicated(units in arb_units(40)) {
        let roster = classify(&units);
        let mut ids: Vec<_> = roster.my.fighters().iter().map(|u| u.id).collect();
        let len = ids.len();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), len);
    }

    #[test]
    fn spawn_planning_bumps_only_the_first_unmet_request(
        counts in proptest::collection::vec((0u32..4, 0u32..4), 1..5),
    ) {
        let (mut arena, spawn, _) = arena_with_spawns(10, 10);
        let mut requests: Vec<SpawnRequest> = counts
            .iter()
            .map(|&(current, target)| SpawnRequest {
                role: Role::Attacker,
                body: melee_body(),
                current,
                target,
            })
            .collect();
        let before = requests.clone();

        let mut view = arena.view(Side::Player);
        let structure = view.structures().into_iter().find(|s| s.id == spawn);
        let done = run_spawn_requests(&mut view, structure.as_ref(), &mut requests);

        let first_unmet = before.iter().position(|r| !r.is_satisfied());
        for (i, (old, new)) in before.iter().zip(&requests).enumerate() {
            if Some(i) == first_unmet {
                prop_assert_eq!(new.current, old.current + 1);
            } else {
                prop_assert_eq!(new.current, old.current);
            }
        }
        prop_assert_eq!(done, requests.iter().all(SpawnRequest::is_satisfied));
    }

    #[test]
    fn stage_transition_ignores_history(
        stage in arb_stage(),
        history in proptest::collection::vec(arb_signals(), 0..10),
        signals in arb_signals(),
    ) {
        let mut machine = StageMachine::new();
        for (tick, past) in history.iter().enumerate() {
            machine.advance(tick as u64 + 1, past);
        }
        let mut resumed = StageMachine::starting_in(stage);
        let mut fresh = StageMachine::starting_in(stage);
        if machine.stage() == stage {
            prop_assert_eq!(machine.advance(100, &signals), next_stage(stage, &signals));
        }
        prop_assert_eq!(resumed.advance(100, &signals), fresh.advance(7, &signals));
    }

    #[test]
    fn threat_wins_over_army_readiness(stage in arb_stage(), mut signals in arb_signals()) {
        signals.threat_near_base = true;
        let next = next_stage(stage, &signals);
        match stage {
            Stage::SpawnWorkers => prop_assert_ne!(next, Stage::Defense),
            Stage::Attack if signals.objective_undefended => prop_assert_eq!(next, Stage::AttackBase),
            _ => prop_assert_eq!(next, Stage::Defense),
        }
    }
}

#[test]
fn melee_and_ranged_hybrid_is_counted_twice() {
    let hybrid = swarm_core::components::Unit::new(
        1,
        true,
        vec![BodyPart::Move, BodyPart::Attack, BodyPart::RangedAttack],
        swarm_core::math::Position::ORIGIN,
    );
    let units = [hybrid];
    let roster = classify(&units);

    assert_eq!(roster.my.count(Role::Attacker), 1);
    assert_eq!(roster.my.count(Role::RangedAttacker), 1);
    assert_eq!(roster.my.fighters().len(), 1);
}
