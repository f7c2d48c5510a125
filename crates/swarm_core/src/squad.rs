//! Army-wide orders built from the unit façade.
//!
//! Everything here is stateless. Callers pass in the role buckets of the
//! current tick and the helpers fan out one façade call per unit. Per-unit
//! action failures are logged and otherwise left for the next tick.

use tracing::{debug, trace};

use crate::components::{ResourceKind, Unit};
use crate::error::Result;
use crate::math::Position;
use crate::unit_facade::{AttackTarget, UnitFacade};
use crate::world::{World, WorldActions};

/// Send every member to the rally point.
///
/// Returns whether all members already stand within `radius` of it. An
/// empty squad counts as converged.
pub fn collect<W: WorldActions>(world: &mut W, members: &[&Unit], rally: Position, radius: u32) -> bool {
    let mut converged = true;
    for member in members {
        if let Err(err) = world.move_to(member.id, rally) {
            trace!(unit = member.id, %err, "rally move refused");
        }
        converged &= member.position.in_range_of(rally, radius);
    }
    converged
}

/// Move all healers towards the first attacker, if there is one.
pub fn move_healers_to_front<W: WorldActions>(world: &mut W, healers: &[&Unit], attackers: &[&Unit]) {
    let Some(anchor) = attackers.first() else {
        return;
    };
    for healer in healers {
        if let Err(err) = world.move_to(healer.id, anchor.position) {
            trace!(unit = healer.id, %err, "follow move refused");
        }
    }
}

/// Every fighter attacks `target`.
pub fn attack_all<W: World>(world: &mut W, fighters: &[&Unit], target: AttackTarget<'_>, prefilter_range: u32) {
    for fighter in fighters {
        let facade = UnitFacade::new(fighter).with_prefilter_range(prefilter_range);
        if let Err(err) = facade.auto_attack(world, target) {
            trace!(unit = fighter.id, %err, "attack not landed");
        }
    }
}

/// Every fighter engages threats within `range` of itself.
pub fn defend_all<W: World>(world: &mut W, fighters: &[&Unit], threats: &[&Unit], range: u32, prefilter_range: u32) {
    for fighter in fighters {
        let facade = UnitFacade::new(fighter).with_prefilter_range(prefilter_range);
        if let Err(err) = facade.auto_defense(world, threats, range) {
            trace!(unit = fighter.id, %err, "defence not landed");
        }
    }
}

/// Every healer heals the closest wounded member of `candidates`.
pub fn heal_all<W: World>(world: &mut W, healers: &[&Unit], candidates: &[&Unit]) {
    for healer in healers {
        if let Err(err) = UnitFacade::new(healer).auto_heal(world, candidates) {
            trace!(unit = healer.id, %err, "heal not landed");
        }
    }
}

/// Run harvest-and-deliver for every carrier.
///
/// # Errors
///
/// Returns the first unsupported source or target error. Host status codes
/// are logged and do not stop the loop.
pub fn run_workers<W: World>(world: &mut W, carriers: &[&Unit], resource: ResourceKind) -> Result<()> {
    for carrier in carriers {
        if let Err(err) = UnitFacade::new(carrier).auto_harvest_and_deliver(world, resource)? {
            debug!(unit = carrier.id, %err, "harvest or delivery failed");
        }
    }
    Ok(())
}
