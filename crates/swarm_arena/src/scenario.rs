//! Scenario definitions.
//!
//! A scenario describes the starting arena: terrain, both spawns,
//! resource containers and sources, and any pre-placed units.

use serde::{Deserialize, Serialize};
use swarm_core::components::{BodyPart, StructureKind, MAX_BODY_PARTS};
use swarm_core::math::Position;

use crate::arena::Arena;
use crate::entity::Side;
use crate::error::{ArenaError, Result};
use crate::nav::{NavGrid, Terrain};

/// Axis-aligned block of tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Left column.
    pub x: i32,
    /// Top row.
    pub y: i32,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// A resource object placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePlacement {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Starting energy.
    pub energy: u32,
}

impl ResourcePlacement {
    /// Create a placement.
    #[must_use]
    pub const fn new(x: i32, y: i32, energy: u32) -> Self {
        Self { x, y, energy }
    }
}

/// A pre-placed unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPlacement {
    /// Body, front to back.
    pub body: Vec<BodyPart>,
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

/// Starting setup of one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSetup {
    /// Spawn tile.
    pub spawn: (i32, i32),
    /// Energy stored in the spawn at tick 1.
    pub energy: u32,
    /// Units present at tick 1.
    #[serde(default)]
    pub units: Vec<UnitPlacement>,
}

/// A complete scenario configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Grid width in tiles.
    pub width: u32,
    /// Grid height in tiles.
    pub height: u32,
    /// Swamp blocks.
    #[serde(default)]
    pub swamps: Vec<Rect>,
    /// Wall blocks, applied after swamps.
    #[serde(default)]
    pub walls: Vec<Rect>,
    /// First side.
    pub player: SideSetup,
    /// Second side.
    pub opponent: SideSetup,
    /// Energy containers.
    #[serde(default)]
    pub containers: Vec<ResourcePlacement>,
    /// Harvestable sources.
    #[serde(default)]
    pub sources: Vec<ResourcePlacement>,
    /// Spawn hit points.
    #[serde(default = "default_spawn_hits")]
    pub spawn_hits: u32,
    /// Spawn energy capacity.
    #[serde(default = "default_spawn_capacity")]
    pub spawn_capacity: u32,
    /// Container energy capacity.
    #[serde(default = "default_container_capacity")]
    pub container_capacity: u32,
    /// Ticks after which the match is a draw.
    #[serde(default = "default_tick_limit")]
    pub tick_limit: u64,
}

const fn default_spawn_hits() -> u32 {
    3000
}

const fn default_spawn_capacity() -> u32 {
    1000
}

const fn default_container_capacity() -> u32 {
    2000
}

const fn default_tick_limit() -> u64 {
    3000
}

impl Default for Scenario {
    fn default() -> Self {
        Self::spawn_and_swamp()
    }
}

impl Scenario {
    /// Load from a RON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the RON is malformed.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let scenario: Self = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// The built-in 100x100 two-spawn map with a swampy middle.
    #[must_use]
    pub fn spawn_and_swamp() -> Self {
        let near_player = [(8, 41), (8, 45), (8, 49), (3, 38), (3, 52), (11, 45)];
        let near_opponent = near_player.map(|(x, y)| (99 - x, 99 - y));
        let containers = near_player
            .iter()
            .chain(near_opponent.iter())
            .map(|&(x, y)| ResourcePlacement::new(x, y, 2000))
            .chain([
                ResourcePlacement::new(50, 50, 2000),
                ResourcePlacement::new(30, 70, 1000),
                ResourcePlacement::new(69, 29, 1000),
            ])
            .collect();

        Self {
            name: "Spawn and Swamp".to_string(),
            description: "Mirrored spawns across a swamp with walls in the middle".to_string(),
            width: 100,
            height: 100,
            swamps: vec![
                Rect::new(20, 15, 60, 70),
                Rect::new(15, 0, 10, 12),
                Rect::new(75, 88, 10, 12),
            ],
            walls: vec![
                Rect::new(40, 28, 3, 14),
                Rect::new(57, 58, 3, 14),
                Rect::new(46, 10, 8, 2),
                Rect::new(46, 88, 8, 2),
            ],
            player: SideSetup {
                spawn: (5, 45),
                energy: 1500,
                units: Vec::new(),
            },
            opponent: SideSetup {
                spawn: (94, 54),
                energy: 1500,
                units: Vec::new(),
            },
            containers,
            sources: Vec::new(),
            spawn_hits: default_spawn_hits(),
            spawn_capacity: default_spawn_capacity(),
            container_capacity: default_container_capacity(),
            tick_limit: default_tick_limit(),
        }
    }

    /// Check the scenario describes a playable arena.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::InvalidScenario`] for the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ArenaError::InvalidScenario("grid must not be empty".into()));
        }
        let grid = self.grid();
        let on_floor = |(x, y): (i32, i32), what: &str| -> Result<()> {
            match grid.terrain(Position::new(x, y)) {
                None => Err(ArenaError::InvalidScenario(format!("{what} at ({x}, {y}) is off the grid"))),
                Some(Terrain::Wall) => Err(ArenaError::InvalidScenario(format!("{what} at ({x}, {y}) is inside a wall"))),
                Some(_) => Ok(()),
            }
        };

        on_floor(self.player.spawn, "player spawn")?;
        on_floor(self.opponent.spawn, "opponent spawn")?;
        if self.player.spawn == self.opponent.spawn {
            return Err(ArenaError::InvalidScenario("spawns share a tile".into()));
        }
        for c in &self.containers {
            on_floor((c.x, c.y), "container")?;
        }
        for s in &self.sources {
            on_floor((s.x, s.y), "source")?;
        }
        for setup in [&self.player, &self.opponent] {
            for unit in &setup.units {
                on_floor((unit.x, unit.y), "unit")?;
                if unit.body.is_empty() || unit.body.len() > MAX_BODY_PARTS {
                    return Err(ArenaError::InvalidScenario(format!(
                        "unit at ({}, {}) has {} parts",
                        unit.x,
                        unit.y,
                        unit.body.len()
                    )));
                }
            }
        }
        Ok(())
    }

    fn grid(&self) -> NavGrid {
        let mut grid = NavGrid::new(self.width.max(1), self.height.max(1));
        for r in &self.swamps {
            grid.fill(Position::new(r.x, r.y), r.width, r.height, Terrain::Swamp);
        }
        for r in &self.walls {
            grid.fill(Position::new(r.x, r.y), r.width, r.height, Terrain::Wall);
        }
        grid
    }

    /// Build the starting arena.
    ///
    /// The player spawn gets id 1 and the opponent spawn id 2.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Scenario::validate`] fails.
    pub fn build(&self) -> Result<Arena> {
        self.validate()?;
        let mut arena = Arena::new(self.grid());

        for (side, setup) in [(Side::Player, &self.player), (Side::Opponent, &self.opponent)] {
            let (x, y) = setup.spawn;
            arena.add_structure(
                StructureKind::Spawn,
                Some(side),
                Position::new(x, y),
                self.spawn_hits,
                setup.energy.min(self.spawn_capacity),
                self.spawn_capacity,
            );
        }
        for c in &self.containers {
            arena.add_structure(
                StructureKind::Container,
                None,
                Position::new(c.x, c.y),
                1000,
                c.energy.min(self.container_capacity),
                self.container_capacity,
            );
        }
        for s in &self.sources {
            arena.add_structure(StructureKind::Source, None, Position::new(s.x, s.y), 0, s.energy, s.energy);
        }
        for (side, setup) in [(Side::Player, &self.player), (Side::Opponent, &self.opponent)] {
            for unit in &setup.units {
                arena.add_unit(side, unit.body.clone(), Position::new(unit.x, unit.y));
            }
        }
        Ok(arena)
    }
}
