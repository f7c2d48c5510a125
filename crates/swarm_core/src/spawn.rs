//! Spawn planning against a target composition.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::{BodyPart, Structure};
use crate::roles::{Role, RoleBuckets};
use crate::world::WorldActions;

/// One role's shortfall: desired body, live count and target count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRequest {
    /// Role the request fills.
    pub role: Role,
    /// Body to spawn.
    pub body: Vec<BodyPart>,
    /// Live units in the role this tick, plus spawns issued this tick.
    pub current: u32,
    /// Desired headcount.
    pub target: u32,
}

impl SpawnRequest {
    /// Build a request whose current count is read from `buckets`.
    #[must_use]
    pub fn from_buckets(role: Role, body: Vec<BodyPart>, target: u32, buckets: &RoleBuckets<'_>) -> Self {
        Self {
            role,
            body,
            current: u32::try_from(buckets.count(role)).unwrap_or(u32::MAX),
            target,
        }
    }

    /// Check whether the target headcount is reached.
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        self.current >= self.target
    }
}

/// Issue spawns for every unmet request, in order.
///
/// A successful spawn bumps that request's count before the next request
/// is looked at. The first refused spawn ends planning for this tick.
/// Returns `true` only when every request has reached its target.
pub fn run_spawn_requests<W: WorldActions>(
    world: &mut W,
    spawn: Option<&Structure>,
    requests: &mut [SpawnRequest],
) -> bool {
    let Some(spawn) = spawn else {
        let done = requests.iter().all(SpawnRequest::is_satisfied);
        if !done {
            debug!("no own spawn, spawn requests stay unsatisfied");
        }
        return done;
    };

    for request in requests.iter_mut() {
        if request.is_satisfied() {
            continue;
        }
        debug!(
            role = ?request.role,
            current = request.current,
            target = request.target,
            parts = request.body.len(),
            "spawning"
        );
        if let Err(err) = world.spawn_unit(spawn.id, &request.body) {
            debug!(role = ?request.role, %err, "spawn refused, retrying next tick");
            return false;
        }
        request.current += 1;
    }

    requests.iter().all(SpawnRequest::is_satisfied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::StructureKind;
    use crate::error::ActionError;
    use crate::math::Position;
    use crate::testing::{structure, ScriptedWorld};
    use crate::world::Action;

    fn request(role: Role, current: u32, target: u32) -> SpawnRequest {
        SpawnRequest {
            role,
            body: vec![BodyPart::Move, role.required_part()],
            current,
            target,
        }
    }

    fn my_spawn() -> Structure {
        structure(100, StructureKind::Spawn, Some(true), Position::new(5, 5))
    }

    #[test]
    fn test_each_unmet_request_gets_one_spawn_in_order() {
        let mut world = ScriptedWorld::new();
        let spawn = my_spawn();
        let mut requests = vec![
            request(Role::RangedAttacker, 0, 2),
            request(Role::Attacker, 3, 3),
            request(Role::Healer, 0, 1),
        ];

        let done = run_spawn_requests(&mut world, Some(&spawn), &mut requests);

        assert!(!done);
        assert_eq!(requests[0].current, 1);
        assert_eq!(requests[1].current, 3);
        assert_eq!(requests[2].current, 1);
        let bodies: Vec<Action> = world.actions_of(100);
        assert_eq!(
            bodies,
            vec![
                Action::Spawn(vec![BodyPart::Move, BodyPart::RangedAttack]),
                Action::Spawn(vec![BodyPart::Move, BodyPart::Heal]),
            ]
        );
    }

    #[test]
    fn test_failure_stops_planning() {
        let mut world = ScriptedWorld::new();
        world.spawn_results.push_back(Err(ActionError::NotEnoughResources));
        let spawn = my_spawn();
        let mut requests = vec![request(Role::Carrier, 0, 1), request(Role::Healer, 0, 1)];

        assert!(!run_spawn_requests(&mut world, Some(&spawn), &mut requests));
        assert_eq!(world.log.len(), 1);
        assert_eq!(requests[0].current, 0);
    }

    #[test]
    fn test_completion_is_reported_when_last_shortfall_closes() {
        let mut world = ScriptedWorld::new();
        let spawn = my_spawn();
        let mut requests = vec![request(Role::Carrier, 2, 3)];

        assert!(run_spawn_requests(&mut world, Some(&spawn), &mut requests));
        assert!(run_spawn_requests(&mut world, Some(&spawn), &mut requests));
        assert_eq!(world.log.len(), 1);
    }

    #[test]
    fn test_missing_spawn_is_unsatisfied_without_actions() {
        let mut world = ScriptedWorld::new();
        let mut requests = vec![request(Role::Carrier, 3, 3), request(Role::Attacker, 0, 1)];

        assert!(!run_spawn_requests(&mut world, None, &mut requests));
        assert!(world.log.is_empty());
        assert_eq!(requests[1].current, 0);
    }

    #[test]
    fn test_missing_spawn_with_targets_met_is_complete() {
        let mut world = ScriptedWorld::new();
        let mut requests = vec![request(Role::Carrier, 3, 3), request(Role::Healer, 4, 2)];

        assert!(run_spawn_requests(&mut world, None, &mut requests));
        assert!(world.log.is_empty());
    }
}
