use bevy::prelude::*;
use std::collections::BTreeMap;
use super::error::PathfinderError;
use super::node::NavNode;
use super::types::{GridCoord, GridDimensions};

/// Fine grid layout derived from a volume's extent.
///
/// Node counts are `2 * floor(extent / node_size)` per axis, so the grid is
/// always even-sized and symmetric about the volume centre. The corner offset
/// is the local position of the grid's (0, 0) corner.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct GridLayout {
    pub dimensions: GridDimensions,
    pub corner_offset: Vec2,
    pub node_size: f32,
}

impl GridLayout {
    /// `extent` is the volume's half-size on the grid plane. A node size larger
    /// than the extent on an axis gives an empty grid, which is valid. An axis
    /// whose node count does not fit in an `i32` is rejected.
    pub fn from_extent(extent: Vec2, node_size: f32) -> Result<Self, PathfinderError> {
        let width = nodes_along_axis(extent.x, node_size)?;
        let height = nodes_along_axis(extent.y, node_size)?;

        Ok(Self {
            dimensions: GridDimensions::new(width, height),
            corner_offset: Vec2::new(
                -((width / 2) as f32 * node_size),
                -((height / 2) as f32 * node_size),
            ),
            node_size,
        })
    }
}

fn nodes_along_axis(half_extent: f32, node_size: f32) -> Result<i32, PathfinderError> {
    let half_count = (half_extent.max(0.0) / node_size).floor();
    // `as` saturates, so anything past i32::MAX / 2 fails the doubling below.
    (half_count as i32)
        .checked_mul(2)
        .ok_or(PathfinderError::GridTooLarge { extent: half_extent, node_size })
}

/// Allocate one identity-only node per cell of `dimensions`.
pub fn populate_nodes(dimensions: GridDimensions) -> BTreeMap<GridCoord, NavNode> {
    let mut nodes = BTreeMap::new();
    for x in 0..dimensions.width {
        for y in 0..dimensions.height {
            let coord = GridCoord::new(x, y);
            nodes.insert(coord, NavNode::new(coord));
        }
    }
    nodes
}
