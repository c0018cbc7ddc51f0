use bevy::prelude::*;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use super::cluster::{build_clusters, cluster_grid_dimensions, NavCluster};
use super::config::{PathfinderConfig, VolumeConfig};
use super::debug::{draw_volume, DebugDraw, NoDebugDraw};
use super::error::PathfinderError;
use super::geometry::offset_to_world;
use super::grid::{populate_nodes, GridLayout};
use super::host::{VolumeHost, VolumeTransform};
use super::node::NavNode;
use super::node_data::generate_node_data;
use super::state::{plan_transition, GenerationState, TransitionPlan};
use super::types::{ClusterCoord, DirectionMap, GridCoord, GridDimensions};

/// Two-level navigation grid over one volume.
///
/// # Pipeline
///
/// `generate` clears everything and then walks [`GenerationState::PIPELINE`]:
///
/// 1. **Initialised:** validate config, sample the host transform
/// 2. **GridGenerationDataReady:** grid dimensions and corner offset from the extent
/// 3. **GridReady:** one identity-only node per cell
/// 4. **ClustersReady:** one empty cluster per cluster-grid cell
/// 5. **NodeDataReady:** neighbours, offsets, extents, cluster membership
/// 6. **PathfinderVolumeReady:** terminal; debug pass runs here
///
/// All node and cluster data is owned here. Anything read out of a previous
/// generation is stale once `clear` or `generate` runs again.
#[derive(Component, Clone, Debug, Default)]
pub struct PathfinderVolume {
    config: VolumeConfig,
    state: GenerationState,
    transform: Option<VolumeTransform>,
    layout: GridLayout,
    cluster_grid: GridDimensions,
    nodes: BTreeMap<GridCoord, NavNode>,
    clusters: BTreeMap<ClusterCoord, NavCluster>,
}

impl PathfinderVolume {
    pub fn new(config: VolumeConfig) -> Self {
        Self { config, ..default() }
    }

    pub fn config(&self) -> &VolumeConfig {
        &self.config
    }

    /// Replace the settings. Existing data is left alone until the next
    /// `generate`.
    pub fn set_config(&mut self, config: VolumeConfig) {
        self.config = config;
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_terminal()
    }

    /// Host transform sampled by the current generation.
    pub fn transform(&self) -> Option<VolumeTransform> {
        self.transform
    }

    pub fn grid_dimensions(&self) -> GridDimensions {
        self.layout.dimensions
    }

    pub fn cluster_grid_dimensions(&self) -> GridDimensions {
        self.cluster_grid
    }

    pub fn corner_offset(&self) -> Vec2 {
        self.layout.corner_offset
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn node(&self, coord: GridCoord) -> Option<&NavNode> {
        self.nodes.get(&coord)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NavNode> {
        self.nodes.values()
    }

    pub fn cluster(&self, coord: ClusterCoord) -> Option<&NavCluster> {
        self.clusters.get(&coord)
    }

    pub fn clusters(&self) -> impl Iterator<Item = &NavCluster> {
        self.clusters.values()
    }

    // ------------------------------------------------------------------------
    // Generation
    // ------------------------------------------------------------------------

    /// Drop all generated data and return to `NotInitialised`.
    ///
    /// Always succeeds; the return value mirrors the host-facing Clear trigger.
    pub fn clear(&mut self) -> bool {
        self.nodes.clear();
        self.clusters.clear();
        self.layout = GridLayout::default();
        self.cluster_grid = GridDimensions::ZERO;
        self.transform = None;
        self.state = GenerationState::NotInitialised;
        true
    }

    /// Rebuild the whole volume from scratch without any debug drawing.
    pub fn generate(&mut self, host: &impl VolumeHost) -> Result<(), PathfinderError> {
        self.generate_and_draw(host, &mut NoDebugDraw, &PathfinderConfig::default())
    }

    /// Rebuild the whole volume from scratch. On reaching the terminal state the
    /// debug pass sends boxes to `sink` if the volume's debug flags ask for it.
    ///
    /// A failing phase aborts the run and clears whatever was built so far.
    pub fn generate_and_draw(
        &mut self,
        host: &impl VolumeHost,
        sink: &mut impl DebugDraw,
        draw_config: &PathfinderConfig,
    ) -> Result<(), PathfinderError> {
        self.clear();

        let mut timer = GenerationTimer::start();
        for state in GenerationState::PIPELINE {
            if let Err(e) = self.request_state_and_draw(state, host, sink, draw_config) {
                error!("[PATHFINDER] {} failed: {}", state.phase_name(), e);
                self.clear();
                return Err(e);
            }
            if self.config.debug_enabled {
                timer.lap(state);
            }
        }
        Ok(())
    }

    /// Ask for one state transition, with no debug drawing.
    ///
    /// Returns `Ok(true)` if the state changed, `Ok(false)` if the request was
    /// out of sequence and ignored, and `Err` if the phase failed (state is left
    /// unchanged).
    pub fn request_state(
        &mut self,
        desired: GenerationState,
        host: &impl VolumeHost,
    ) -> Result<bool, PathfinderError> {
        self.request_state_and_draw(desired, host, &mut NoDebugDraw, &PathfinderConfig::default())
    }

    /// [`request_state`](Self::request_state) with a debug sink. Entering
    /// `PathfinderVolumeReady` runs the debug pass into `sink`.
    pub fn request_state_and_draw(
        &mut self,
        desired: GenerationState,
        host: &impl VolumeHost,
        sink: &mut impl DebugDraw,
        draw_config: &PathfinderConfig,
    ) -> Result<bool, PathfinderError> {
        match plan_transition(self.state, desired) {
            TransitionPlan::Reset => Ok(self.clear()),
            TransitionPlan::Ignore => {
                debug!("[PATHFINDER] Ignoring request for {:?} while in {:?}", desired, self.state);
                Ok(false)
            }
            TransitionPlan::Advance => {
                self.run_phase(desired, host)?;
                self.state = desired;
                if desired.is_terminal() {
                    self.finish(sink, draw_config);
                }
                Ok(true)
            }
        }
    }

    fn run_phase(&mut self, entering: GenerationState, host: &impl VolumeHost) -> Result<(), PathfinderError> {
        match entering {
            GenerationState::NotInitialised | GenerationState::PathfinderVolumeReady => Ok(()),
            GenerationState::Initialised => {
                self.config.validate()?;
                self.transform = Some(VolumeTransform::sample(host));
                Ok(())
            }
            GenerationState::GridGenerationDataReady => self.generate_grid_data(),
            GenerationState::GridReady => self.populate_grid(),
            GenerationState::ClustersReady => {
                self.cluster_grid = cluster_grid_dimensions(self.layout.dimensions, self.config.cluster_size);
                self.clusters = build_clusters(self.cluster_grid);
                Ok(())
            }
            GenerationState::NodeDataReady => generate_node_data(
                &mut self.nodes,
                &mut self.clusters,
                &self.layout,
                self.config.cluster_size,
            ),
        }
    }

    fn finish(&self, sink: &mut impl DebugDraw, draw_config: &PathfinderConfig) {
        debug!(
            "[PATHFINDER] Volume ready: {} nodes ({}x{}), {} clusters ({}x{})",
            self.nodes.len(),
            self.layout.dimensions.width,
            self.layout.dimensions.height,
            self.clusters.len(),
            self.cluster_grid.width,
            self.cluster_grid.height,
        );
        self.debug_volume(sink, draw_config);
    }

    fn generate_grid_data(&mut self) -> Result<(), PathfinderError> {
        let transform = self.transform.ok_or(PathfinderError::HostUnavailable)?;
        self.layout = GridLayout::from_extent(transform.extent.truncate(), self.config.node_size)?;
        Ok(())
    }

    fn populate_grid(&mut self) -> Result<(), PathfinderError> {
        self.nodes = populate_nodes(self.layout.dimensions);

        let expected = self.layout.dimensions.cell_count();
        if self.nodes.len() != expected {
            return Err(PathfinderError::NodeCountMismatch { expected, actual: self.nodes.len() });
        }
        Ok(())
    }

    fn debug_volume(&self, sink: &mut impl DebugDraw, draw_config: &PathfinderConfig) {
        if !self.config.debug_enabled {
            return;
        }
        let boxes = draw_volume(self, draw_config, sink);
        info!(
            "[PATHFINDER] [ {} ] nodes generated in [ {} ] clusters ({} debug boxes).",
            self.nodes.len(),
            self.clusters.len(),
            boxes
        );
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    fn populated_node(&self, coord: GridCoord) -> Result<&NavNode, PathfinderError> {
        let node = self.nodes.get(&coord).ok_or(PathfinderError::NodeNotFound(coord))?;
        if !node.is_populated() {
            return Err(PathfinderError::NodeNotPopulated(coord));
        }
        Ok(node)
    }

    pub fn get_node_neighbors(&self, coord: GridCoord) -> Result<DirectionMap<GridCoord>, PathfinderError> {
        Ok(self.populated_node(coord)?.neighbors)
    }

    pub fn get_node_offset(&self, coord: GridCoord) -> Result<Vec2, PathfinderError> {
        Ok(self.populated_node(coord)?.offset)
    }

    pub fn get_node_cluster_id(&self, coord: GridCoord) -> Result<ClusterCoord, PathfinderError> {
        self.populated_node(coord)?
            .cluster
            .ok_or(PathfinderError::NodeNotPopulated(coord))
    }

    /// Node centre in world space, using the transform the grid was built with.
    pub fn get_node_world_location(&self, coord: GridCoord) -> Result<Vec3, PathfinderError> {
        let offset = self.populated_node(coord)?.offset;
        let transform = self.transform.ok_or(PathfinderError::HostUnavailable)?;
        Ok(offset_to_world(offset, transform.position, transform.rotation))
    }

    pub fn get_cluster_children(&self, coord: ClusterCoord) -> Result<&[GridCoord], PathfinderError> {
        self.clusters
            .get(&coord)
            .map(|c| c.children.as_slice())
            .ok_or(PathfinderError::ClusterNotFound(coord))
    }
}

/// Wall-clock timing for the phases of one `generate` call.
struct GenerationTimer {
    start: Instant,
    previous: Duration,
}

impl GenerationTimer {
    fn start() -> Self {
        Self { start: Instant::now(), previous: Duration::ZERO }
    }

    fn lap(&mut self, completed: GenerationState) {
        let elapsed = self.start.elapsed();
        if completed.is_terminal() {
            info!(
                "[PATHFINDER] {} completed at [ {:.6} ] seconds.",
                completed.phase_name(),
                elapsed.as_secs_f64()
            );
        } else {
            info!(
                "[PATHFINDER] {} completed at [ {:.6} ] seconds. ExecutionTime = [ {:.6} ] seconds.",
                completed.phase_name(),
                elapsed.as_secs_f64(),
                (elapsed - self.previous).as_secs_f64()
            );
        }
        self.previous = elapsed;
    }
}
