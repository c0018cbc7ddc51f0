use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Position of a fine node in the fine grid.
///
/// Coordinates are non-negative for every node the grid builder produces,
/// but the type is signed so that neighbour probing (`coord + delta`) can
/// step off the grid without wrapping.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize, PartialOrd, Ord)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The coordinate one step away in `direction`. May lie outside the grid.
    #[inline]
    pub fn step(self, direction: Direction) -> Self {
        let delta = direction.delta();
        Self::new(self.x + delta.x, self.y + delta.y)
    }

    /// Owning cluster for a given cluster edge length.
    ///
    /// Floor division, so a coordinate scheme with negative values would still
    /// land in a consistent cluster.
    #[inline]
    pub fn cluster(self, cluster_size: i32) -> ClusterCoord {
        ClusterCoord::new(self.x.div_euclid(cluster_size), self.y.div_euclid(cluster_size))
    }
}

impl From<IVec2> for GridCoord {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<GridCoord> for IVec2 {
    fn from(c: GridCoord) -> Self {
        IVec2::new(c.x, c.y)
    }
}

/// Position of a cluster in the coarse cluster grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ClusterCoord {
    pub x: i32,
    pub y: i32,
}

impl ClusterCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a grid, counted in cells.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct GridDimensions {
    pub width: i32,
    pub height: i32,
}

impl GridDimensions {
    pub const ZERO: Self = Self { width: 0, height: 0 };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Number of cells, `width * height`.
    pub fn cell_count(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// True if `coord` lies in `[0, width) x [0, height)`.
    #[inline]
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width && coord.y < self.height
    }
}

/// The eight compass directions used for node (and reserved cluster) adjacency.
///
/// North is +y, East is +x. The repr(u8) keeps conversion to a table index free.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
    NorthEast = 4,
    NorthWest = 5,
    SouthEast = 6,
    SouthWest = 7,
}

impl Direction {
    /// All eight directions (cardinal first, then diagonal)
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    #[inline]
    pub fn as_index(self) -> usize {
        self as usize
    }

    /// Grid step taken when moving one cell in this direction.
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::North => IVec2::new(0, 1),
            Direction::East => IVec2::new(1, 0),
            Direction::South => IVec2::new(0, -1),
            Direction::West => IVec2::new(-1, 0),
            Direction::NorthEast => IVec2::new(1, 1),
            Direction::NorthWest => IVec2::new(-1, 1),
            Direction::SouthEast => IVec2::new(1, -1),
            Direction::SouthWest => IVec2::new(-1, -1),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
            Direction::NorthEast => "NorthEast",
            Direction::NorthWest => "NorthWest",
            Direction::SouthEast => "SouthEast",
            Direction::SouthWest => "SouthWest",
        }
    }
}

/// Fixed-size table keyed by [`Direction`]. Missing directions are `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionMap<T> {
    entries: [Option<T>; 8],
}

impl<T> Default for DirectionMap<T> {
    fn default() -> Self {
        Self { entries: [None, None, None, None, None, None, None, None] }
    }
}

impl<T: Copy> DirectionMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, direction: Direction) -> Option<T> {
        self.entries[direction.as_index()]
    }

    #[inline]
    pub fn insert(&mut self, direction: Direction, value: T) {
        self.entries[direction.as_index()] = Some(value);
    }

    pub fn contains(&self, direction: Direction) -> bool {
        self.entries[direction.as_index()].is_some()
    }

    /// Present entries only, in [`Direction::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, T)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.entries[d.as_index()].map(|v| (d, v)))
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.entries = [None; 8];
    }
}
