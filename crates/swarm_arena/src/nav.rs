//! Terrain grid and path search.
//!
//! Movement is 8-directional and every step costs the terrain cost of the
//! tile entered, so Chebyshev distance is an admissible heuristic. Searches
//! are deterministic: equal-cost frontier nodes are expanded in row-major
//! order.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};
use swarm_core::math::Position;

/// Terrain of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Terrain {
    /// Open ground (cost: 1).
    #[default]
    Plain,
    /// Swamp (cost: 5).
    Swamp,
    /// Natural wall, impassable.
    Wall,
}

impl Terrain {
    /// Cost of entering a tile of this terrain, `None` if impassable.
    #[must_use]
    pub const fn movement_cost(self) -> Option<u32> {
        match self {
            Self::Plain => Some(1),
            Self::Swamp => Some(5),
            Self::Wall => None,
        }
    }
}

/// Direction offsets for 8-directional movement.
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Rectangular terrain grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavGrid {
    width: u32,
    height: u32,
    /// Row-major terrain.
    cells: Vec<Terrain>,
}

impl NavGrid {
    /// Create an all-plain grid.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0, "NavGrid width must be positive");
        assert!(height > 0, "NavGrid height must be positive");
        Self {
            width,
            height,
            cells: vec![Terrain::Plain; (width as usize) * (height as usize)],
        }
    }

    /// Grid width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let x = u32::try_from(pos.x).ok()?;
        let y = u32::try_from(pos.y).ok()?;
        (x < self.width && y < self.height).then(|| (y as usize) * (self.width as usize) + (x as usize))
    }

    /// Check whether `pos` lies on the grid.
    #[must_use]
    pub fn in_bounds(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// Terrain at `pos`, `None` off the grid.
    #[must_use]
    pub fn terrain(&self, pos: Position) -> Option<Terrain> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Set terrain at `pos`. Returns `false` off the grid.
    pub fn set_terrain(&mut self, pos: Position, terrain: Terrain) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = terrain;
                true
            }
            None => false,
        }
    }

    /// Fill a rectangle with `terrain`, clipped to the grid.
    pub fn fill(&mut self, origin: Position, width: u32, height: u32, terrain: Terrain) {
        for dy in 0..height {
            for dx in 0..width {
                let pos = origin.offset(dx as i32, dy as i32);
                self.set_terrain(pos, terrain);
            }
        }
    }

    /// Cost of entering `pos`, `None` if blocked or off the grid.
    #[must_use]
    pub fn movement_cost(&self, pos: Position) -> Option<u32> {
        self.terrain(pos).and_then(Terrain::movement_cost)
    }

    fn neighbours(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        DIRECTIONS
            .iter()
            .map(move |&(dx, dy)| pos.offset(dx, dy))
            .filter(|p| self.in_bounds(*p))
    }
}

/// One open-set entry. Ordered so the max-heap pops the cheapest node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    pos: Position,
    f_score: u32,
    g_score: u32,
}

impl Node {
    /// Row-major rank, lower first on equal cost.
    fn tie_breaker(&self) -> (i32, i32) {
        (self.pos.y, self.pos.x)
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.tie_breaker().cmp(&self.tie_breaker()))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A found path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    /// Tiles from start to goal, both included.
    pub steps: Vec<Position>,
    /// Sum of the terrain costs of every entered tile.
    pub cost: u32,
}

impl Path {
    /// The first tile after the start, if any.
    #[must_use]
    pub fn next_step(&self) -> Option<Position> {
        self.steps.get(1).copied()
    }
}

/// Find the cheapest path from `start` to `goal`.
///
/// Tiles for which `is_obstacle` holds cannot be passed through, but the
/// goal itself may be one: the path then ends by stepping onto it, which
/// callers treat as arriving next to it.
pub fn find_path(
    grid: &NavGrid,
    start: Position,
    goal: Position,
    is_obstacle: impl Fn(Position) -> bool,
) -> Option<Path> {
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return None;
    }
    if start == goal {
        return Some(Path {
            steps: vec![start],
            cost: 0,
        });
    }

    let mut open: BinaryHeap<Node> = BinaryHeap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut g_score: HashMap<Position, u32> = HashMap::new();

    g_score.insert(start, 0);
    open.push(Node {
        pos: start,
        f_score: start.range_to(goal),
        g_score: 0,
    });

    while let Some(current) = open.pop() {
        if current.pos == goal {
            return Some(Path {
                steps: reconstruct(&came_from, goal),
                cost: current.g_score,
            });
        }
        if g_score.get(&current.pos).is_some_and(|g| *g < current.g_score) {
            continue;
        }

        for next in grid.neighbours(current.pos) {
            let Some(cost) = grid.movement_cost(next) else {
                continue;
            };
            if next != goal && is_obstacle(next) {
                continue;
            }
            let tentative = current.g_score + cost;
            if g_score.get(&next).map_or(true, |g| tentative < *g) {
                came_from.insert(next, current.pos);
                g_score.insert(next, tentative);
                open.push(Node {
                    pos: next,
                    f_score: tentative + next.range_to(goal),
                    g_score: tentative,
                });
            }
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<Position, Position>, goal: Position) -> Vec<Position> {
    let mut steps = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        steps.push(prev);
        current = prev;
    }
    steps.reverse();
    steps
}

/// Path costs from one origin to every tile.
///
/// Obstacle tiles get the cost of stepping onto them but are never
/// expanded, matching how [`find_path`] treats its goal.
#[derive(Debug, Clone)]
pub struct CostField {
    width: u32,
    costs: Vec<Option<u32>>,
}

impl CostField {
    /// Flood the grid from `origin`.
    pub fn compute(grid: &NavGrid, origin: Position, is_obstacle: impl Fn(Position) -> bool) -> Self {
        let mut field = Self {
            width: grid.width,
            costs: vec![None; grid.cells.len()],
        };
        let Some(start) = grid.index(origin) else {
            return field;
        };
        field.costs[start] = Some(0);

        let mut open = BinaryHeap::new();
        open.push(Node {
            pos: origin,
            f_score: 0,
            g_score: 0,
        });
        while let Some(current) = open.pop() {
            if current.pos != origin && is_obstacle(current.pos) {
                continue;
            }
            if field.get(current.pos).is_some_and(|g| g < current.g_score) {
                continue;
            }
            for next in grid.neighbours(current.pos) {
                let (Some(cost), Some(i)) = (grid.movement_cost(next), grid.index(next)) else {
                    continue;
                };
                let tentative = current.g_score + cost;
                if field.costs[i].map_or(true, |g| tentative < g) {
                    field.costs[i] = Some(tentative);
                    open.push(Node {
                        pos: next,
                        f_score: tentative,
                        g_score: tentative,
                    });
                }
            }
        }
        field
    }

    /// Cost to reach `pos`, `None` if unreachable or off the grid.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<u32> {
        let x = u32::try_from(pos.x).ok()?;
        let y = u32::try_from(pos.y).ok()?;
        if x >= self.width {
            return None;
        }
        self.costs
            .get((y as usize) * (self.width as usize) + (x as usize))
            .copied()
            .flatten()
    }
}
