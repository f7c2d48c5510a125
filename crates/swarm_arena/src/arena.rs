//! The arena simulation.
//!
//! Orders are validated the moment they are issued and queued as intents.
//! [`Arena::step`] then resolves every queued intent in a fixed order:
//!
//! 1. Spawn timers
//! 2. Combat and healing (simultaneous)
//! 3. Harvest, withdraw and transfer
//! 4. Movement
//! 5. Deaths
//!
//! All iteration is over id-sorted maps so two arenas fed the same orders
//! always reach the same state.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashSet};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use swarm_core::body::body_cost;
use swarm_core::components::{BodyPart, EntityId, StructureKind, HITS_PER_PART, MAX_BODY_PARTS};
use swarm_core::error::{ActionError, ActionResult};
use swarm_core::math::Position;
use swarm_core::world::Action;
use tracing::{debug, trace};

use crate::entity::{ArenaStructure, ArenaUnit, Side};
use crate::error::{ArenaError, Result};
use crate::nav::{find_path, NavGrid};
use crate::view::SideView;

/// Melee damage per active Attack part.
pub const MELEE_DAMAGE_PER_PART: u32 = 30;
/// Ranged damage per active RangedAttack part.
pub const RANGED_DAMAGE_PER_PART: u32 = 10;
/// Hit points restored per active Heal part.
pub const HEAL_PER_PART: u32 = 12;
/// Energy harvested per active Work part.
pub const HARVEST_PER_PART: u32 = 2;
/// Spawn duration per body part.
pub const SPAWN_TICKS_PER_PART: u32 = 3;
/// Range of melee, heal and every resource action.
pub const INTERACT_RANGE: u32 = 1;
/// Range of ranged attacks.
pub const RANGED_RANGE: u32 = 3;
/// Fatigue added per heavy part per point of terrain cost.
pub const FATIGUE_PER_PART: u32 = 2;
/// Fatigue removed per active Move part each tick.
pub const FATIGUE_RECOVERY_PER_PART: u32 = 2;

/// One accepted order, as journalled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Tick the order was issued in.
    pub tick: u64,
    /// Side that issued it.
    pub side: Side,
    /// Acting unit, or spawn for spawn orders.
    pub actor: EntityId,
    /// The order.
    pub action: Action,
}

/// Result of a match so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Both spawns stand.
    Ongoing,
    /// Only this side's spawn stands.
    Winner(Side),
    /// Both spawns fell on the same tick.
    Draw,
}

/// What [`Arena::step`] resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepEvents {
    /// Units that finished spawning.
    pub spawned: Vec<EntityId>,
    /// Units and structures destroyed.
    pub deaths: Vec<EntityId>,
    /// Total damage dealt.
    pub damage_dealt: u32,
    /// Total energy moved by harvest, withdraw and transfer.
    pub energy_moved: u32,
}

/// Queued orders of one unit for the current tick.
///
/// A second order of the same kind replaces the first.
#[derive(Debug, Clone, Default)]
struct Intents {
    move_to: Option<Position>,
    attack: Option<EntityId>,
    ranged_attack: Option<EntityId>,
    heal: Option<EntityId>,
    harvest: Option<EntityId>,
    withdraw: Option<(EntityId, Option<u32>)>,
    transfer: Option<(EntityId, Option<u32>)>,
}

/// In-memory arena hosting two controllers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    tick: u64,
    grid: NavGrid,
    units: BTreeMap<EntityId, ArenaUnit>,
    structures: BTreeMap<EntityId, ArenaStructure>,
    next_id: EntityId,
    #[serde(skip)]
    intents: BTreeMap<EntityId, Intents>,
    #[serde(skip)]
    journal: Vec<ActionRecord>,
}

impl Arena {
    /// Create an empty arena on `grid`, at tick 1.
    #[must_use]
    pub fn new(grid: NavGrid) -> Self {
        Self {
            tick: 1,
            grid,
            units: BTreeMap::new(),
            structures: BTreeMap::new(),
            next_id: 1,
            intents: BTreeMap::new(),
            journal: Vec::new(),
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place a structure and return its id.
    pub fn add_structure(
        &mut self,
        kind: StructureKind,
        owner: Option<Side>,
        position: Position,
        hits: u32,
        energy: u32,
        capacity: u32,
    ) -> EntityId {
        let id = self.allocate_id();
        self.structures.insert(
            id,
            ArenaStructure {
                id,
                kind,
                owner,
                position,
                hits,
                energy,
                capacity,
                producing: None,
            },
        );
        id
    }

    /// Place a ready, full-health unit and return its id.
    pub fn add_unit(&mut self, side: Side, body: Vec<BodyPart>, position: Position) -> EntityId {
        let id = self.allocate_id();
        let hits = HITS_PER_PART * body.len() as u32;
        self.units.insert(
            id,
            ArenaUnit {
                id,
                side,
                body,
                hits,
                position,
                energy: 0,
                spawn_remaining: 0,
                fatigue: 0,
            },
        );
        id
    }

    /// Current tick.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Terrain grid.
    #[must_use]
    pub const fn grid(&self) -> &NavGrid {
        &self.grid
    }

    /// Live units, sorted by id.
    pub fn units(&self) -> impl Iterator<Item = &ArenaUnit> {
        self.units.values()
    }

    /// Structures, sorted by id.
    pub fn structures(&self) -> impl Iterator<Item = &ArenaStructure> {
        self.structures.values()
    }

    /// Look up a unit.
    #[must_use]
    pub fn unit(&self, id: EntityId) -> Option<&ArenaUnit> {
        self.units.get(&id)
    }

    /// Mutable access to a unit, for test setup.
    pub fn unit_mut(&mut self, id: EntityId) -> Option<&mut ArenaUnit> {
        self.units.get_mut(&id)
    }

    /// Look up a structure.
    #[must_use]
    pub fn structure(&self, id: EntityId) -> Option<&ArenaStructure> {
        self.structures.get(&id)
    }

    /// Mutable access to a structure, for test setup.
    pub fn structure_mut(&mut self, id: EntityId) -> Option<&mut ArenaStructure> {
        self.structures.get_mut(&id)
    }

    /// The spawn owned by `side`, if it still stands.
    #[must_use]
    pub fn spawn_of(&self, side: Side) -> Option<&ArenaStructure> {
        self.structures
            .values()
            .find(|s| s.kind == StructureKind::Spawn && s.owner == Some(side))
    }

    /// Number of live units of `side`.
    #[must_use]
    pub fn unit_count(&self, side: Side) -> usize {
        self.units.values().filter(|u| u.side == side).count()
    }

    /// Every accepted order so far.
    #[must_use]
    pub fn journal(&self) -> &[ActionRecord] {
        &self.journal
    }

    /// Drain the journal.
    pub fn take_journal(&mut self) -> Vec<ActionRecord> {
        std::mem::take(&mut self.journal)
    }

    /// World interface for one side.
    pub fn view(&mut self, side: Side) -> SideView<'_> {
        SideView::new(self, side)
    }

    /// Tiles no unit may enter.
    #[must_use]
    pub fn obstacles(&self) -> HashSet<Position> {
        self.structures
            .values()
            .filter(|s| s.blocks_movement())
            .map(|s| s.position)
            .collect()
    }

    /// Current match result.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match (self.spawn_of(Side::Player).is_some(), self.spawn_of(Side::Opponent).is_some()) {
            (true, true) => Outcome::Ongoing,
            (true, false) => Outcome::Winner(Side::Player),
            (false, true) => Outcome::Winner(Side::Opponent),
            (false, false) => Outcome::Draw,
        }
    }

    // ========================================================================
    // Order validation
    // ========================================================================

    fn position_of(&self, id: EntityId) -> Option<Position> {
        self.units
            .get(&id)
            .map(|u| u.position)
            .or_else(|| self.structures.get(&id).map(|s| s.position))
    }

    fn actor(&self, side: Side, id: EntityId, part: BodyPart) -> std::result::Result<&ArenaUnit, ActionError> {
        let unit = self.units.get(&id).ok_or(ActionError::InvalidTarget)?;
        if unit.side != side {
            return Err(ActionError::NotOwner);
        }
        if unit.is_spawning() {
            return Err(ActionError::Busy);
        }
        if unit.active_parts(part) == 0 {
            return Err(ActionError::NoBodyPart);
        }
        Ok(unit)
    }

    fn check_range(actor: &ArenaUnit, target: Position, range: u32) -> ActionResult {
        if actor.position.in_range_of(target, range) {
            Ok(())
        } else {
            Err(ActionError::NotInRange)
        }
    }

    fn accept(&mut self, side: Side, actor: EntityId, action: Action) {
        self.journal.push(ActionRecord {
            tick: self.tick,
            side,
            actor,
            action,
        });
    }

    fn intents_of(&mut self, unit: EntityId) -> &mut Intents {
        self.intents.entry(unit).or_default()
    }

    /// Check whether `side` may attack `target`.
    fn is_hostile(&self, side: Side, target: EntityId) -> bool {
        if let Some(unit) = self.units.get(&target) {
            return unit.side != side;
        }
        self.structures
            .get(&target)
            .is_some_and(|s| s.is_destructible() && s.owner != Some(side) && s.kind != StructureKind::Container)
    }

    /// Validate and queue a move.
    pub fn order_move(&mut self, side: Side, unit: EntityId, target: Position) -> ActionResult {
        let actor = self.actor(side, unit, BodyPart::Move)?;
        if actor.fatigue > 0 {
            return Err(ActionError::Busy);
        }
        if !self.grid.in_bounds(target) {
            return Err(ActionError::InvalidArgs);
        }
        self.intents_of(unit).move_to = Some(target);
        self.accept(side, unit, Action::MoveTo(target));
        Ok(())
    }

    /// Validate and queue a melee or ranged attack.
    fn order_attack(&mut self, side: Side, unit: EntityId, target: EntityId, ranged: bool) -> ActionResult {
        let (part, range) = if ranged {
            (BodyPart::RangedAttack, RANGED_RANGE)
        } else {
            (BodyPart::Attack, INTERACT_RANGE)
        };
        let actor = self.actor(side, unit, part)?;
        if !self.is_hostile(side, target) {
            return Err(ActionError::InvalidTarget);
        }
        let target_pos = self.position_of(target).ok_or(ActionError::InvalidTarget)?;
        Self::check_range(actor, target_pos, range)?;

        let intents = self.intents_of(unit);
        if ranged {
            intents.ranged_attack = Some(target);
            self.accept(side, unit, Action::RangedAttack(target));
        } else {
            intents.attack = Some(target);
            self.accept(side, unit, Action::Attack(target));
        }
        Ok(())
    }

    /// Validate and queue a melee attack.
    pub fn order_melee(&mut self, side: Side, unit: EntityId, target: EntityId) -> ActionResult {
        self.order_attack(side, unit, target, false)
    }

    /// Validate and queue a ranged attack.
    pub fn order_ranged(&mut self, side: Side, unit: EntityId, target: EntityId) -> ActionResult {
        self.order_attack(side, unit, target, true)
    }

    /// Validate and queue a heal.
    pub fn order_heal(&mut self, side: Side, unit: EntityId, target: EntityId) -> ActionResult {
        let actor = self.actor(side, unit, BodyPart::Heal)?;
        let patient = self.units.get(&target).ok_or(ActionError::InvalidTarget)?;
        if patient.side != side {
            return Err(ActionError::InvalidTarget);
        }
        Self::check_range(actor, patient.position, INTERACT_RANGE)?;
        self.intents_of(unit).heal = Some(target);
        self.accept(side, unit, Action::Heal(target));
        Ok(())
    }

    /// Validate and queue a harvest.
    pub fn order_harvest(&mut self, side: Side, unit: EntityId, source: EntityId) -> ActionResult {
        let actor = self.actor(side, unit, BodyPart::Work)?;
        let deposit = self
            .structures
            .get(&source)
            .filter(|s| s.kind == StructureKind::Source)
            .ok_or(ActionError::InvalidTarget)?;
        Self::check_range(actor, deposit.position, INTERACT_RANGE)?;
        if deposit.energy == 0 {
            return Err(ActionError::NotEnoughResources);
        }
        if actor.free_capacity() == 0 {
            return Err(ActionError::Full);
        }
        self.intents_of(unit).harvest = Some(source);
        self.accept(side, unit, Action::Harvest(source));
        Ok(())
    }

    /// Validate and queue a withdrawal from a container.
    pub fn order_withdraw(&mut self, side: Side, unit: EntityId, target: EntityId, amount: Option<u32>) -> ActionResult {
        let actor = self.actor(side, unit, BodyPart::Carry)?;
        if amount == Some(0) {
            return Err(ActionError::InvalidArgs);
        }
        let store = self
            .structures
            .get(&target)
            .filter(|s| s.kind == StructureKind::Container)
            .ok_or(ActionError::InvalidTarget)?;
        Self::check_range(actor, store.position, INTERACT_RANGE)?;
        if store.energy == 0 || amount.is_some_and(|a| a > store.energy) {
            return Err(ActionError::NotEnoughResources);
        }
        if actor.free_capacity() == 0 {
            return Err(ActionError::Full);
        }
        self.intents_of(unit).withdraw = Some((target, amount));
        self.accept(
            side,
            unit,
            Action::Withdraw {
                target,
                resource: swarm_core::components::ResourceKind::Energy,
                amount,
            },
        );
        Ok(())
    }

    /// Validate and queue a transfer into an own spawn or a container.
    pub fn order_transfer(&mut self, side: Side, unit: EntityId, target: EntityId, amount: Option<u32>) -> ActionResult {
        let actor = self.actor(side, unit, BodyPart::Carry)?;
        if amount == Some(0) {
            return Err(ActionError::InvalidArgs);
        }
        let store = self
            .structures
            .get(&target)
            .filter(|s| match s.kind {
                StructureKind::Spawn => s.owner == Some(side),
                StructureKind::Container => true,
                _ => false,
            })
            .ok_or(ActionError::InvalidTarget)?;
        Self::check_range(actor, store.position, INTERACT_RANGE)?;
        if actor.energy == 0 || amount.is_some_and(|a| a > actor.energy) {
            return Err(ActionError::NotEnoughResources);
        }
        if store.free_capacity() == 0 {
            return Err(ActionError::Full);
        }
        self.intents_of(unit).transfer = Some((target, amount));
        self.accept(
            side,
            unit,
            Action::Transfer {
                target,
                resource: swarm_core::components::ResourceKind::Energy,
                amount,
            },
        );
        Ok(())
    }

    /// Validate a spawn order and start production immediately.
    ///
    /// The new unit exists from this call on with its spawn timer running,
    /// so it already counts towards live role totals.
    pub fn order_spawn(&mut self, side: Side, spawn: EntityId, body: &[BodyPart]) -> ActionResult {
        let structure = self
            .structures
            .get(&spawn)
            .filter(|s| s.kind == StructureKind::Spawn)
            .ok_or(ActionError::InvalidTarget)?;
        if structure.owner != Some(side) {
            return Err(ActionError::NotOwner);
        }
        if structure.producing.is_some() {
            return Err(ActionError::Busy);
        }
        if body.is_empty() || body.len() > MAX_BODY_PARTS {
            return Err(ActionError::InvalidArgs);
        }
        let cost = body_cost(body);
        if cost > structure.energy {
            return Err(ActionError::NotEnoughResources);
        }
        let position = structure.position;

        let id = self.add_unit(side, body.to_vec(), position);
        if let Some(unit) = self.units.get_mut(&id) {
            unit.spawn_remaining = SPAWN_TICKS_PER_PART * body.len() as u32;
        }
        if let Some(structure) = self.structures.get_mut(&spawn) {
            structure.energy -= cost;
            structure.producing = Some(id);
        }
        debug!(tick = self.tick, ?side, unit = id, parts = body.len(), cost, "spawn started");
        self.accept(side, spawn, Action::Spawn(body.to_vec()));
        Ok(())
    }

    /// Re-issue a journalled order.
    pub fn apply(&mut self, record: &ActionRecord) -> ActionResult {
        let (side, actor) = (record.side, record.actor);
        match &record.action {
            Action::MoveTo(target) => self.order_move(side, actor, *target),
            Action::Attack(target) => self.order_melee(side, actor, *target),
            Action::RangedAttack(target) => self.order_ranged(side, actor, *target),
            Action::Heal(target) => self.order_heal(side, actor, *target),
            Action::Harvest(source) => self.order_harvest(side, actor, *source),
            Action::Withdraw { target, amount, .. } => self.order_withdraw(side, actor, *target, *amount),
            Action::Transfer { target, amount, .. } => self.order_transfer(side, actor, *target, *amount),
            Action::Spawn(body) => self.order_spawn(side, actor, body),
        }
    }

    /// Re-run a journal on this arena until `final_tick` is reached.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::ReplayDiverged`] if a journalled order is
    /// rejected, which means the starting state did not match.
    pub fn replay(&mut self, records: &[ActionRecord], final_tick: u64) -> Result<()> {
        let mut pending = records.iter().peekable();
        while self.tick < final_tick {
            while let Some(record) = pending.next_if(|r| r.tick == self.tick) {
                self.apply(record).map_err(|err| ArenaError::ReplayDiverged {
                    tick: record.tick,
                    message: format!("{:?} by {} rejected: {err}", record.action, record.actor),
                })?;
            }
            if let Some(record) = pending.peek() {
                if record.tick < self.tick {
                    return Err(ArenaError::ReplayDiverged {
                        tick: record.tick,
                        message: "journal is not in tick order".to_string(),
                    });
                }
            }
            self.step();
        }
        Ok(())
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve all queued orders and advance to the next tick.
    pub fn step(&mut self) -> StepEvents {
        let intents = std::mem::take(&mut self.intents);
        let mut events = StepEvents::default();

        self.resolve_spawning(&mut events);
        self.resolve_combat(&intents, &mut events);
        self.resolve_resources(&intents, &mut events);
        self.resolve_movement(&intents);
        self.resolve_deaths(&mut events);

        for unit in self.units.values_mut() {
            let recovery = FATIGUE_RECOVERY_PER_PART * unit.active_parts(BodyPart::Move);
            unit.fatigue = unit.fatigue.saturating_sub(recovery);
        }

        if !events.deaths.is_empty() {
            debug!(tick = self.tick, deaths = ?events.deaths, "entities destroyed");
        }
        self.tick += 1;
        events
    }

    fn resolve_spawning(&mut self, events: &mut StepEvents) {
        for unit in self.units.values_mut() {
            if unit.spawn_remaining > 0 {
                unit.spawn_remaining -= 1;
                if unit.spawn_remaining == 0 {
                    events.spawned.push(unit.id);
                }
            }
        }
        let units = &self.units;
        for structure in self.structures.values_mut() {
            if let Some(id) = structure.producing {
                if !units.get(&id).is_some_and(ArenaUnit::is_spawning) {
                    structure.producing = None;
                }
            }
        }
    }

    fn resolve_combat(&mut self, intents: &BTreeMap<EntityId, Intents>, events: &mut StepEvents) {
        let mut damage: BTreeMap<EntityId, u32> = BTreeMap::new();
        let mut healing: BTreeMap<EntityId, u32> = BTreeMap::new();

        for (id, intent) in intents {
            let Some(unit) = self.units.get(id) else {
                continue;
            };
            if let Some(target) = intent.attack {
                *damage.entry(target).or_default() += MELEE_DAMAGE_PER_PART * unit.active_parts(BodyPart::Attack);
            }
            if let Some(target) = intent.ranged_attack {
                *damage.entry(target).or_default() +=
                    RANGED_DAMAGE_PER_PART * unit.active_parts(BodyPart::RangedAttack);
            }
            if let Some(target) = intent.heal {
                *healing.entry(target).or_default() += HEAL_PER_PART * unit.active_parts(BodyPart::Heal);
            }
        }

        for (id, unit) in &mut self.units {
            let hit = damage.remove(id).unwrap_or(0);
            let heal = healing.get(id).copied().unwrap_or(0);
            if hit == 0 && heal == 0 {
                continue;
            }
            events.damage_dealt += hit;
            let net = i64::from(unit.hits) + i64::from(heal) - i64::from(hit);
            unit.hits = net.clamp(0, i64::from(unit.hits_max())) as u32;
            trace!(unit = id, hit, heal, hits = unit.hits, "combat resolved");
        }
        for (id, hit) in damage {
            if let Some(structure) = self.structures.get_mut(&id) {
                events.damage_dealt += hit;
                structure.hits = structure.hits.saturating_sub(hit);
            }
        }
    }

    fn resolve_resources(&mut self, intents: &BTreeMap<EntityId, Intents>, events: &mut StepEvents) {
        for (id, intent) in intents {
            let Some(unit) = self.units.get_mut(id) else {
                continue;
            };
            if let Some(source) = intent.harvest {
                if let Some(deposit) = self.structures.get_mut(&source) {
                    let amount = (HARVEST_PER_PART * unit.active_parts(BodyPart::Work))
                        .min(deposit.energy)
                        .min(unit.free_capacity());
                    deposit.energy -= amount;
                    unit.energy += amount;
                    events.energy_moved += amount;
                }
            }
            if let Some((target, requested)) = intent.withdraw {
                if let Some(store) = self.structures.get_mut(&target) {
                    let amount = requested
                        .unwrap_or(u32::MAX)
                        .min(store.energy)
                        .min(unit.free_capacity());
                    store.energy -= amount;
                    unit.energy += amount;
                    events.energy_moved += amount;
                }
            }
            if let Some((target, requested)) = intent.transfer {
                if let Some(store) = self.structures.get_mut(&target) {
                    let amount = requested
                        .unwrap_or(u32::MAX)
                        .min(unit.energy)
                        .min(store.free_capacity());
                    unit.energy -= amount;
                    store.energy += amount;
                    events.energy_moved += amount;
                }
            }
        }
    }

    fn resolve_movement(&mut self, intents: &BTreeMap<EntityId, Intents>) {
        let obstacles = self.obstacles();
        for (id, intent) in intents {
            let Some(target) = intent.move_to else {
                continue;
            };
            let Some(unit) = self.units.get_mut(id) else {
                continue;
            };
            if unit.hits == 0 || unit.position == target {
                continue;
            }
            let Some(next) = find_path(&self.grid, unit.position, target, |p| obstacles.contains(&p))
                .and_then(|path| path.next_step())
            else {
                trace!(unit = id, %target, "no path");
                continue;
            };
            if obstacles.contains(&next) {
                continue;
            }
            let Some(cost) = self.grid.movement_cost(next) else {
                continue;
            };
            unit.position = next;
            unit.fatigue += cost * FATIGUE_PER_PART * unit.heavy_parts();
        }
    }

    fn resolve_deaths(&mut self, events: &mut StepEvents) {
        let dead_units: Vec<EntityId> = self.units.values().filter(|u| u.hits == 0).map(|u| u.id).collect();
        for id in dead_units {
            self.units.remove(&id);
            events.deaths.push(id);
        }
        let dead_structures: Vec<EntityId> = self
            .structures
            .values()
            .filter(|s| s.is_destructible() && s.hits == 0)
            .map(|s| s.id)
            .collect();
        for id in dead_structures {
            self.structures.remove(&id);
            events.deaths.push(id);
        }
        let units = &self.units;
        for structure in self.structures.values_mut() {
            if structure.producing.is_some_and(|id| !units.contains_key(&id)) {
                structure.producing = None;
            }
        }
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Hash of the full arena state.
    ///
    /// Two arenas with identical state produce identical hashes. Queued
    /// intents and the journal are not part of the state.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tick.hash(&mut hasher);
        self.next_id.hash(&mut hasher);
        self.units.len().hash(&mut hasher);
        for unit in self.units.values() {
            unit.hash(&mut hasher);
        }
        self.structures.len().hash(&mut hasher);
        for structure in self.structures.values() {
            structure.hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Encode the arena state.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| ArenaError::Serialization(format!("Failed to serialize arena: {e}")))
    }

    /// Decode an arena state.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data).map_err(|e| ArenaError::Serialization(format!("Failed to deserialize arena: {e}")))
    }
}
