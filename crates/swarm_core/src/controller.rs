//! The per-tick entry point.
//!
//! [`Controller::tick`] pulls a fresh snapshot, classifies it, runs the
//! current stage's behaviour, keeps the economy going and applies the stage
//! transition. The only state carried between ticks is the stage and the
//! [`BattleContext`] resolved on the first tick.

use tracing::{debug, info, warn};

use crate::components::{EntityId, Structure, StructureKind, Unit};
use crate::data::{ControllerConfig, RoleTemplate};
use crate::error::Result;
use crate::math::Position;
use crate::roles::{classify, Roster};
use crate::spawn::{run_spawn_requests, SpawnRequest};
use crate::squad;
use crate::stage::{need_attack_base, need_defense, Stage, StageMachine, StageSignals};
use crate::unit_facade::AttackTarget;
use crate::world::World;

/// Facts fixed at initialisation.
///
/// Only ids and positions are kept. Structures are looked up again in every
/// tick's snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleContext {
    /// Our spawn's id.
    pub my_spawn: EntityId,
    /// Our spawn's tile.
    pub my_spawn_position: Position,
    /// The enemy spawn, if one was visible at initialisation.
    pub enemy_spawn: Option<EntityId>,
    /// Enemy spawn tile.
    pub enemy_spawn_position: Option<Position>,
    /// Army convergence point.
    pub rally_point: Position,
}

impl BattleContext {
    fn resolve(config: &ControllerConfig, structures: &[Structure]) -> Option<Self> {
        let my_spawn = structures
            .iter()
            .find(|s| s.kind == StructureKind::Spawn && s.is_mine())?;
        let enemy_spawn = structures
            .iter()
            .find(|s| s.kind == StructureKind::Spawn && s.is_enemy());
        Some(Self {
            my_spawn: my_spawn.id,
            my_spawn_position: my_spawn.position,
            enemy_spawn: enemy_spawn.map(|s| s.id),
            enemy_spawn_position: enemy_spawn.map(|s| s.position),
            rally_point: config.rally.resolve(my_spawn.position),
        })
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number reported by the host.
    pub tick: u64,
    /// Stage the tick started in.
    pub previous_stage: Stage,
    /// Stage the next tick starts in.
    pub stage: Stage,
    /// Result of spawn planning, if this stage spawns.
    pub spawn_complete: Option<bool>,
}

/// A battle controller for one side.
#[derive(Debug, Clone)]
pub struct Controller {
    config: ControllerConfig,
    machine: StageMachine,
    context: Option<BattleContext>,
}

impl Controller {
    /// Create a controller in [`Stage::SpawnWorkers`].
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            machine: StageMachine::new(),
            context: None,
        }
    }

    /// Create a controller that resumes in `stage`.
    #[must_use]
    pub fn starting_in(config: ControllerConfig, stage: Stage) -> Self {
        Self {
            config,
            machine: StageMachine::starting_in(stage),
            context: None,
        }
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.machine.stage()
    }

    /// Context resolved on the first tick, if any.
    #[must_use]
    pub fn context(&self) -> Option<&BattleContext> {
        self.context.as_ref()
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Run one tick against `world`.
    ///
    /// # Errors
    ///
    /// Returns an error only for configuration faults, such as a carrier
    /// pointed at an unsupported structure kind. Failed world actions are
    /// left for the next tick.
    pub fn tick<W: World>(&mut self, world: &mut W) -> Result<TickReport> {
        let tick = world.tick();
        let units = world.units();
        let structures = world.structures();

        if self.context.is_none() {
            self.context = BattleContext::resolve(&self.config, &structures);
            match &self.context {
                Some(ctx) => info!(
                    tick,
                    my_spawn = ctx.my_spawn,
                    enemy_spawn = ?ctx.enemy_spawn,
                    rally = %ctx.rally_point,
                    "controller initialised"
                ),
                None => warn!(tick, "no own spawn visible, initialisation deferred"),
            }
        }

        let roster = classify(&units);
        roster.log_summary(tick);

        let previous_stage = self.machine.stage();
        let mut signals = StageSignals::default();
        let mut spawn_complete = None;

        let threats = roster.enemies();
        let my_spawn = self.find_structure(&structures, |ctx| Some(ctx.my_spawn));
        let enemy_spawn = self.find_structure(&structures, |ctx| ctx.enemy_spawn);
        let thresholds = self.config.thresholds;

        if let Some(ctx) = &self.context {
            signals.threat_near_base = need_defense(&threats, ctx.rally_point, thresholds.defense_range);
        }
        if let Some(spawn) = enemy_spawn {
            signals.objective_undefended = need_attack_base(&threats, spawn.position, thresholds.attack_base_range);
        }

        match previous_stage {
            Stage::SpawnWorkers => {
                let done = spawn_from(world, my_spawn, &self.config.economy, &roster);
                signals.economy_ready = done;
                spawn_complete = Some(done);
            }
            Stage::SpawnArmy => {
                let army = roster.my.army();
                let rallied = match &self.context {
                    Some(ctx) => squad::collect(world, &army, ctx.rally_point, thresholds.rally_radius),
                    None => false,
                };
                let done = spawn_from(world, my_spawn, &self.config.army, &roster);
                signals.army_ready = done && rallied;
                spawn_complete = Some(done);
            }
            Stage::Defense => {
                let fighters = roster.my.fighters();
                squad::defend_all(
                    world,
                    &fighters,
                    &threats,
                    thresholds.local_defense_range,
                    thresholds.target_prefilter_range,
                );
                support_fighters(world, &roster, &fighters);
            }
            Stage::Attack => {
                let fighters = roster.my.fighters();
                squad::attack_all(
                    world,
                    &fighters,
                    AttackTarget::Units(&threats),
                    thresholds.target_prefilter_range,
                );
                support_fighters(world, &roster, &fighters);
            }
            Stage::AttackBase => {
                let fighters = roster.my.fighters();
                let target = match enemy_spawn {
                    Some(spawn) => AttackTarget::Structure(spawn),
                    None => {
                        debug!(tick, "enemy spawn gone, attacking units instead");
                        AttackTarget::Units(&threats)
                    }
                };
                squad::attack_all(world, &fighters, target, thresholds.target_prefilter_range);
                support_fighters(world, &roster, &fighters);
            }
        }

        squad::run_workers(world, &roster.my.carriers, self.config.resource)?;

        let stage = self.machine.advance(tick, &signals);
        Ok(TickReport {
            tick,
            previous_stage,
            stage,
            spawn_complete,
        })
    }

    fn find_structure<'s>(
        &self,
        structures: &'s [Structure],
        id: impl FnOnce(&BattleContext) -> Option<EntityId>,
    ) -> Option<&'s Structure> {
        let id = self.context.as_ref().and_then(id)?;
        structures.iter().find(|s| s.id == id)
    }
}

fn spawn_from<W: World>(
    world: &mut W,
    spawn: Option<&Structure>,
    templates: &[RoleTemplate],
    roster: &Roster<'_>,
) -> bool {
    let mut requests: Vec<SpawnRequest> = templates.iter().map(|t| t.request(&roster.my)).collect();
    run_spawn_requests(world, spawn, &mut requests)
}

/// Healers follow the fighters and patch up the army.
fn support_fighters<W: World>(world: &mut W, roster: &Roster<'_>, fighters: &[&Unit]) {
    let army = roster.my.army();
    squad::move_healers_to_front(world, &roster.my.healers, fighters);
    squad::heal_all(world, &roster.my.healers, &army);
}
