use std::collections::BTreeMap;
use super::cluster::{register_child, NavCluster};
use super::error::PathfinderError;
use super::geometry::node_offset;
use super::grid::GridLayout;
use super::node::{neighbors_of, NavNode};
use super::types::{ClusterCoord, GridCoord};

/// Fill in cluster id, neighbours, offset and extent for every node, and
/// register each node as a child of its cluster.
///
/// Must run after the clusters have been allocated. Stops at the first node
/// whose cluster does not exist.
pub fn generate_node_data(
    nodes: &mut BTreeMap<GridCoord, NavNode>,
    clusters: &mut BTreeMap<ClusterCoord, NavCluster>,
    layout: &GridLayout,
    cluster_size: i32,
) -> Result<(), PathfinderError> {
    let extent = layout.node_size / 2.0;

    for (&coord, node) in nodes.iter_mut() {
        let cluster = coord.cluster(cluster_size);

        node.neighbors = neighbors_of(coord, layout.dimensions);
        node.offset = node_offset(coord, layout.node_size, layout.corner_offset);
        node.extent = extent;
        node.cluster = Some(cluster);

        register_child(clusters, cluster, coord)?;
    }

    Ok(())
}
