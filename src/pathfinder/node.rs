use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use super::types::{ClusterCoord, Direction, DirectionMap, GridCoord, GridDimensions};

/// One fine cell of the navigation grid.
///
/// Created identity-only when the grid is populated; `cluster`, `neighbors`,
/// `offset` and `extent` are filled in by node data generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavNode {
    pub coord: GridCoord,
    pub cluster: Option<ClusterCoord>,
    /// Neighbours that exist in the grid, keyed by direction.
    pub neighbors: DirectionMap<GridCoord>,
    /// Centre relative to the volume centre, before the volume transform.
    pub offset: Vec2,
    /// Half of the node size.
    pub extent: f32,
}

impl NavNode {
    pub fn new(coord: GridCoord) -> Self {
        Self {
            coord,
            cluster: None,
            neighbors: DirectionMap::new(),
            offset: Vec2::ZERO,
            extent: 0.0,
        }
    }

    pub fn is_populated(&self) -> bool {
        self.cluster.is_some()
    }
}

/// 8-connected neighbours of `coord` that lie inside `dimensions`.
pub fn neighbors_of(coord: GridCoord, dimensions: GridDimensions) -> DirectionMap<GridCoord> {
    let mut neighbors = DirectionMap::new();
    for direction in Direction::ALL {
        let candidate = coord.step(direction);
        if dimensions.contains(candidate) {
            neighbors.insert(direction, candidate);
        }
    }
    neighbors
}
