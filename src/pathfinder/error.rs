use super::types::{ClusterCoord, GridCoord};

/// Failures surfaced by volume generation and queries.
///
/// Out-of-sequence state requests are not errors; they are ignored by the
/// state machine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathfinderError {
    #[error("node size must be greater than zero, got {0}")]
    InvalidNodeSize(f32),

    #[error("cluster size must be at least 1, got {0}")]
    InvalidClusterSize(i32),

    #[error("extent {extent} at node size {node_size} needs more nodes per axis than the grid can index")]
    GridTooLarge { extent: f32, node_size: f32 },

    #[error("node {0:?} is not part of the current grid")]
    NodeNotFound(GridCoord),

    #[error("cluster {0:?} is not part of the current cluster grid")]
    ClusterNotFound(ClusterCoord),

    #[error("node {0:?} exists but its data has not been generated yet")]
    NodeNotPopulated(GridCoord),

    /// A node mapped to a cluster that was never allocated. Indicates a bug in
    /// the cluster grid dimension arithmetic.
    #[error("node {node:?} maps to cluster {cluster:?}, which does not exist")]
    MissingCluster { node: GridCoord, cluster: ClusterCoord },

    #[error("grid population produced {actual} nodes, expected {expected}")]
    NodeCountMismatch { expected: usize, actual: usize },

    #[error("volume host was not sampled before grid generation")]
    HostUnavailable,
}
