//! Tile-grid math used by every controller decision.
//!
//! The arena is a square grid of tiles and units move in eight
//! directions, so all distances are integer Chebyshev ranges. No
//! floating-point values ever enter a decision, which keeps the
//! controller deterministic across hosts.

use serde::{Deserialize, Serialize};

/// A tile coordinate on the arena grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Create a new tile coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The origin tile.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Range to another tile (Chebyshev distance).
    ///
    /// This is the number of single-tile steps needed on an open grid
    /// with diagonal movement.
    #[must_use]
    pub fn range_to(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }

    /// Check whether `other` lies within `radius` tiles (inclusive).
    #[must_use]
    pub fn in_range_of(self, other: Self, radius: u32) -> bool {
        self.range_to(other) <= radius
    }

    /// Offset this tile by `(dx, dy)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Single-step direction towards `other`, each component in `-1..=1`.
    #[must_use]
    pub fn step_towards(self, other: Self) -> (i32, i32) {
        ((other.x - self.x).signum(), (other.y - self.y).signum())
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Anything that occupies a tile.
pub trait Located {
    /// Current tile of the object.
    fn position(&self) -> Position;
}

impl Located for Position {
    fn position(&self) -> Position {
        *self
    }
}

impl<T: Located + ?Sized> Located for &T {
    fn position(&self) -> Position {
        (**self).position()
    }
}

/// Filter `items` down to those within `radius` of `origin`.
///
/// Input order is preserved.
pub fn find_in_range<'a, T: Located>(
    origin: Position,
    items: impl IntoIterator<Item = &'a T>,
    radius: u32,
) -> Vec<&'a T>
where
    T: 'a,
{
    items
        .into_iter()
        .filter(|item| origin.in_range_of(item.position(), radius))
        .collect()
}

/// Pick the item with the smallest straight-line range from `origin`.
///
/// Ties go to the earliest item so the choice is stable.
pub fn find_closest_by_range<'a, T: Located>(
    origin: Position,
    items: impl IntoIterator<Item = &'a T>,
) -> Option<&'a T>
where
    T: 'a,
{
    let mut best: Option<(&'a T, u32)> = None;
    for item in items {
        let range = origin.range_to(item.position());
        match best {
            Some((_, best_range)) if best_range <= range => {}
            _ => best = Some((item, range)),
        }
    }
    best.map(|(item, _)| item)
}
