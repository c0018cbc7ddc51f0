use bevy::prelude::*;
use super::config::{runtime_config, PathfinderConfig, PathfinderConfigHandle};
use super::debug::DebugBoxes;
use super::host::{VolumeShape, VolumeTransform};
use super::volume::PathfinderVolume;

/// What a [`VolumeCommand`] does to its volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeAction {
    /// Rebuild the volume from scratch.
    Generate,
    /// Discard all generated data.
    Clear,
}

/// Editor trigger for one volume entity.
///
/// Generate and Clear share one message stream, so commands written in the
/// same frame are applied in the order they were sent.
#[derive(Event, Message, Debug, Clone, Copy)]
pub struct VolumeCommand {
    pub entity: Entity,
    pub action: VolumeAction,
}

impl VolumeCommand {
    pub fn generate(entity: Entity) -> Self {
        Self { entity, action: VolumeAction::Generate }
    }

    pub fn clear(entity: Entity) -> Self {
        Self { entity, action: VolumeAction::Clear }
    }
}

/// Apply this frame's volume commands in arrival order.
pub(super) fn handle_volume_requests(
    mut requests: MessageReader<VolumeCommand>,
    mut volumes: Query<(&mut PathfinderVolume, &GlobalTransform, &VolumeShape)>,
    mut debug_boxes: ResMut<DebugBoxes>,
    config_handle: Option<Res<PathfinderConfigHandle>>,
    configs: Option<Res<Assets<PathfinderConfig>>>,
) {
    if requests.is_empty() {
        return;
    }
    let config = runtime_config(config_handle.as_deref(), configs.as_deref());

    for command in requests.read() {
        let entity = command.entity;
        let Ok((mut volume, transform, shape)) = volumes.get_mut(entity) else {
            warn!("[PATHFINDER] {:?} requested for {:?}, which is not a pathfinder volume", command.action, entity);
            continue;
        };

        match command.action {
            VolumeAction::Clear => {
                volume.clear();
                info!("[PATHFINDER] Cleared volume {:?}", entity);
            }
            VolumeAction::Generate => {
                let host = VolumeTransform::from_global(transform, shape);
                let start = std::time::Instant::now();
                match volume.generate_and_draw(&host, &mut *debug_boxes, &config) {
                    Ok(()) => info!(
                        "[PATHFINDER] Generated volume {:?}: {} nodes, {} clusters in {:?}",
                        entity,
                        volume.node_count(),
                        volume.cluster_count(),
                        start.elapsed()
                    ),
                    Err(e) => error!("[PATHFINDER] Failed to generate volume {:?}: {}", entity, e),
                }
            }
        }
    }
}

/// Hotkeys that trigger Generate / Clear on every volume.
pub(super) fn editor_hotkeys(
    keys: Res<ButtonInput<KeyCode>>,
    config_handle: Option<Res<PathfinderConfigHandle>>,
    configs: Option<Res<Assets<PathfinderConfig>>>,
    volumes: Query<Entity, With<PathfinderVolume>>,
    mut volume_commands: MessageWriter<VolumeCommand>,
) {
    let config = runtime_config(config_handle.as_deref(), configs.as_deref());

    if keys.just_pressed(config.key_generate) {
        volume_commands.write_batch(volumes.iter().map(VolumeCommand::generate));
    }
    if keys.just_pressed(config.key_clear) {
        volume_commands.write_batch(volumes.iter().map(VolumeCommand::clear));
    }
}
