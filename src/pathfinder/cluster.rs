use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use super::error::PathfinderError;
use super::types::{ClusterCoord, DirectionMap, GridCoord, GridDimensions};

/// A coarse cell grouping up to `cluster_size x cluster_size` fine nodes.
///
/// Children are appended during node data generation, in node iteration
/// order. Clusters on the trailing edge of the grid may own fewer nodes.
///
/// `neighbors` is reserved for inter-cluster adjacency and is never filled in
/// by the generation pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NavCluster {
    pub coord: ClusterCoord,
    pub children: Vec<GridCoord>,
    pub neighbors: DirectionMap<ClusterCoord>,
}

impl NavCluster {
    pub fn new(coord: ClusterCoord) -> Self {
        Self { coord, ..default() }
    }

    pub fn add_child(&mut self, node: GridCoord) {
        self.children.push(node);
    }
}

/// Cluster grid size: ceiling division so a partial trailing cluster still
/// exists to own the remainder nodes.
pub fn cluster_grid_dimensions(grid: GridDimensions, cluster_size: i32) -> GridDimensions {
    GridDimensions::new(
        ceil_div(grid.width, cluster_size),
        ceil_div(grid.height, cluster_size),
    )
}

#[inline]
fn ceil_div(value: i32, divisor: i32) -> i32 {
    if value <= 0 {
        0
    } else {
        (value - 1) / divisor + 1
    }
}

/// Allocate one empty cluster per cell of the cluster grid.
pub fn build_clusters(cluster_grid: GridDimensions) -> BTreeMap<ClusterCoord, NavCluster> {
    let mut clusters = BTreeMap::new();
    for cy in 0..cluster_grid.height {
        for cx in 0..cluster_grid.width {
            let coord = ClusterCoord::new(cx, cy);
            clusters.insert(coord, NavCluster::new(coord));
        }
    }
    clusters
}

/// Append `node` to the child list of `cluster`.
///
/// A missing cluster means the dimension arithmetic is wrong, so this fails
/// instead of dropping the node.
pub(super) fn register_child(
    clusters: &mut BTreeMap<ClusterCoord, NavCluster>,
    cluster: ClusterCoord,
    node: GridCoord,
) -> Result<(), PathfinderError> {
    let Some(entry) = clusters.get_mut(&cluster) else {
        error!("[PATHFINDER] Node {:?} maps to unallocated cluster {:?}", node, cluster);
        return Err(PathfinderError::MissingCluster { node, cluster });
    };
    entry.add_child(node);
    Ok(())
}
