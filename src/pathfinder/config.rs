use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::{Deserialize, Serialize};
use super::error::PathfinderError;

/// Per-volume generation settings. Changes take effect on the next Generate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Edge length of one fine node, in world units.
    pub node_size: f32,
    /// Fine nodes per cluster edge; 8 gives clusters of 8x8 nodes.
    pub cluster_size: i32,

    // Debug output only, never affects generated data
    pub debug_enabled: bool,
    pub draw_nodes: bool,
    pub draw_clusters: bool,
    pub draw_cluster_nodes: bool,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            node_size: 50.0,
            cluster_size: 8,
            debug_enabled: false,
            draw_nodes: false,
            draw_clusters: false,
            draw_cluster_nodes: true,
        }
    }
}

impl VolumeConfig {
    pub fn validate(&self) -> Result<(), PathfinderError> {
        if !self.node_size.is_finite() || self.node_size <= 0.0 {
            return Err(PathfinderError::InvalidNodeSize(self.node_size));
        }
        if self.cluster_size < 1 {
            return Err(PathfinderError::InvalidClusterSize(self.cluster_size));
        }
        Ok(())
    }
}

/// Static configuration loaded once at startup from `assets/initial_config.ron`.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, Default)]
#[serde(default)]
pub struct InitialConfig {
    /// Settings given to volumes spawned without explicit configuration.
    pub default_volume: VolumeConfig,
}

/// Runtime configuration that can be hot-reloaded. Nothing in here changes the
/// generated grid.
#[derive(Deserialize, Serialize, Asset, TypePath, Clone, Debug)]
#[serde(default)]
pub struct PathfinderConfig {
    // Editor triggers
    pub key_generate: KeyCode,
    pub key_clear: KeyCode,

    // Debug drawing
    pub node_draw_time: f32,
    pub node_line_thickness: f32,
    pub cluster_draw_time: f32,
    pub cluster_line_thickness: f32,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            key_generate: KeyCode::KeyG,
            key_clear: KeyCode::KeyC,
            node_draw_time: 5.0,
            node_line_thickness: 2.0,
            cluster_draw_time: 5.0,
            cluster_line_thickness: 2.0,
        }
    }
}

#[derive(Resource)]
pub struct PathfinderConfigHandle(pub Handle<PathfinderConfig>);

/// Current runtime config, or defaults while the asset is still loading.
pub fn runtime_config(
    handle: Option<&PathfinderConfigHandle>,
    configs: Option<&Assets<PathfinderConfig>>,
) -> PathfinderConfig {
    handle
        .zip(configs)
        .and_then(|(handle, configs)| configs.get(&handle.0))
        .cloned()
        .unwrap_or_default()
}

pub struct PathfinderConfigPlugin;

impl Plugin for PathfinderConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<PathfinderConfig>::new(&["pathfinder.config.ron"]))
           .add_systems(Startup, (load_initial_config, setup_runtime_config).chain());
    }
}

const INITIAL_CONFIG_PATH: &str = "assets/initial_config.ron";

/// Load static configuration synchronously so volumes spawned at startup can
/// use it.
fn load_initial_config(mut commands: Commands) {
    let config = match std::fs::read_to_string(INITIAL_CONFIG_PATH) {
        Ok(contents) => match parse_initial_config(&contents) {
            Ok(config) => {
                info!("Loaded initial config from {}", INITIAL_CONFIG_PATH);
                config
            }
            Err(e) => {
                error!("Failed to parse initial config: {}", e);
                error!("Using default InitialConfig");
                InitialConfig::default()
            }
        },
        Err(e) => {
            error!("Failed to read {}: {}", INITIAL_CONFIG_PATH, e);
            error!("Using default InitialConfig");
            InitialConfig::default()
        }
    };

    if let Err(e) = config.default_volume.validate() {
        warn!("Default volume config is invalid ({}); volumes using it will fail to generate", e);
    }
    commands.insert_resource(config);
}

fn parse_initial_config(contents: &str) -> Result<InitialConfig, ron::error::SpannedError> {
    ron::from_str::<InitialConfig>(contents)
}

/// Load runtime configuration asynchronously (can be hot-reloaded).
fn setup_runtime_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load("pathfinder.config.ron");
    commands.insert_resource(PathfinderConfigHandle(handle));
}
