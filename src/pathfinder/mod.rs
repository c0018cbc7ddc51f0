mod types;
mod error;
mod geometry;
mod grid;
mod node;
mod cluster;
mod node_data;
mod state;
mod host;
mod volume;
mod debug;
mod systems;
pub mod config;

#[cfg(test)]
mod tests;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use types::{GridCoord, ClusterCoord, GridDimensions, Direction, DirectionMap};
pub use error::PathfinderError;
pub use geometry::{node_offset, rotate_around_pivot, offset_to_world};
pub use grid::{GridLayout, populate_nodes};
pub use node::{NavNode, neighbors_of};
pub use cluster::{NavCluster, cluster_grid_dimensions, build_clusters};
pub use node_data::generate_node_data;
pub use state::{GenerationState, TransitionPlan, plan_transition};
pub use host::{VolumeHost, VolumeTransform, VolumeShape};
pub use volume::PathfinderVolume;
pub use debug::{DebugDraw, DebugBox, DebugBoxes, DebugLayer, NoDebugDraw, NodeGizmos, ClusterGizmos, draw_volume};
pub use systems::{VolumeCommand, VolumeAction};
pub use config::{VolumeConfig, InitialConfig, PathfinderConfig, PathfinderConfigPlugin};

use bevy::prelude::*;

/// Volume generation, editor triggers and debug drawing.
pub struct PathfinderPlugin;

impl Plugin for PathfinderPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<VolumeCommand>();
        app.init_resource::<DebugBoxes>();
        app.init_gizmo_group::<NodeGizmos>();
        app.init_gizmo_group::<ClusterGizmos>();
        app.add_systems(
            Update,
            (
                systems::editor_hotkeys.run_if(resource_exists::<ButtonInput<KeyCode>>),
                systems::handle_volume_requests,
                debug::sync_gizmo_line_widths,
                debug::draw_debug_boxes,
            )
                .chain(),
        );
    }
}

/// Everything a host app needs: configuration loading plus [`PathfinderPlugin`].
pub struct HierarchicalPathfinderPlugin;

impl Plugin for HierarchicalPathfinderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((PathfinderConfigPlugin, PathfinderPlugin));
    }
}
