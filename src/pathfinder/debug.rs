use bevy::prelude::*;
use rand::Rng;
use super::config::{runtime_config, PathfinderConfig, PathfinderConfigHandle};
use super::geometry::offset_to_world;
use super::volume::PathfinderVolume;

/// Which gizmo group a debug box is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugLayer {
    Node,
    Cluster,
}

/// One box request for the host's debug-draw facility.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugBox {
    pub center: Vec3,
    pub half_extent: Vec3,
    pub rotation: Quat,
    pub color: Color,
    /// Seconds the box stays visible.
    pub duration: f32,
    pub layer: DebugLayer,
}

/// Sink for debug geometry.
pub trait DebugDraw {
    fn draw_box(&mut self, debug_box: DebugBox);
}

/// Discards everything.
pub struct NoDebugDraw;

impl DebugDraw for NoDebugDraw {
    fn draw_box(&mut self, _debug_box: DebugBox) {}
}

impl DebugDraw for Vec<DebugBox> {
    fn draw_box(&mut self, debug_box: DebugBox) {
        self.push(debug_box);
    }
}

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct NodeGizmos;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct ClusterGizmos;

/// Boxes requested by volume generation, kept alive until their duration runs out.
#[derive(Resource, Default)]
pub struct DebugBoxes {
    active: Vec<(DebugBox, f32)>,
}

impl DebugBoxes {
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &DebugBox> {
        self.active.iter().map(|(debug_box, _)| debug_box)
    }

    /// Age every box by `dt` seconds and drop the expired ones.
    pub fn tick(&mut self, dt: f32) {
        self.active.retain_mut(|(_, remaining)| {
            *remaining -= dt;
            *remaining > 0.0
        });
    }
}

impl DebugDraw for DebugBoxes {
    fn draw_box(&mut self, debug_box: DebugBox) {
        self.active.push((debug_box, debug_box.duration));
    }
}

/// Issue the debug pass for a freshly generated volume. Returns how many boxes
/// were requested.
pub fn draw_volume(volume: &PathfinderVolume, config: &PathfinderConfig, sink: &mut impl DebugDraw) -> usize {
    let settings = volume.config();
    if !settings.debug_enabled {
        return 0;
    }
    let Some(transform) = volume.transform() else {
        return 0;
    };

    let mut rng = rand::rng();
    let mut issued = 0;

    if settings.draw_nodes {
        for node in volume.nodes() {
            let color = random_color(&mut rng);
            issued += draw_node(volume, node.coord, color, config, sink);
        }
    }

    if settings.draw_clusters {
        for cluster in volume.clusters() {
            if cluster.children.is_empty() {
                continue;
            }
            let color = random_color(&mut rng);

            let mut min = Vec2::splat(f32::MAX);
            let mut max = Vec2::splat(f32::MIN);
            let mut extent = 0.0f32;
            for child in &cluster.children {
                if let Some(node) = volume.node(*child) {
                    min = min.min(node.offset);
                    max = max.max(node.offset);
                    extent = extent.max(node.extent);
                }
            }

            let half = (max - min) / 2.0 + Vec2::splat(extent);
            let inset = (half - Vec2::splat(config.cluster_line_thickness)).max(Vec2::ZERO);
            sink.draw_box(DebugBox {
                center: offset_to_world((min + max) / 2.0, transform.position, transform.rotation),
                half_extent: inset.extend(extent),
                rotation: transform.rotation,
                color,
                duration: config.cluster_draw_time,
                layer: DebugLayer::Cluster,
            });
            issued += 1;

            if settings.draw_cluster_nodes {
                for child in &cluster.children {
                    issued += draw_node(volume, *child, color, config, sink);
                }
            }
        }
    }

    issued
}

fn draw_node(
    volume: &PathfinderVolume,
    coord: super::types::GridCoord,
    color: Color,
    config: &PathfinderConfig,
    sink: &mut impl DebugDraw,
) -> usize {
    let (Ok(center), Some(node), Some(transform)) =
        (volume.get_node_world_location(coord), volume.node(coord), volume.transform())
    else {
        return 0;
    };

    let extent = (node.extent - config.node_line_thickness).max(0.0);
    sink.draw_box(DebugBox {
        center,
        half_extent: Vec3::splat(extent),
        rotation: transform.rotation,
        color,
        duration: config.node_draw_time,
        layer: DebugLayer::Node,
    });
    1
}

fn random_color(rng: &mut impl Rng) -> Color {
    Color::srgb(rng.random(), rng.random(), rng.random())
}

pub(super) fn draw_debug_boxes(
    time: Res<Time>,
    mut boxes: ResMut<DebugBoxes>,
    mut node_gizmos: Gizmos<NodeGizmos>,
    mut cluster_gizmos: Gizmos<ClusterGizmos>,
) {
    if boxes.active.is_empty() {
        return;
    }

    for debug_box in boxes.iter() {
        let transform = Transform::from_translation(debug_box.center)
            .with_rotation(debug_box.rotation)
            .with_scale(debug_box.half_extent * 2.0);
        match debug_box.layer {
            DebugLayer::Node => node_gizmos.cuboid(transform, debug_box.color),
            DebugLayer::Cluster => cluster_gizmos.cuboid(transform, debug_box.color),
        }
    }

    boxes.tick(time.delta_secs());
}

pub(super) fn sync_gizmo_line_widths(
    config_handle: Option<Res<PathfinderConfigHandle>>,
    configs: Option<Res<Assets<PathfinderConfig>>>,
    mut store: ResMut<GizmoConfigStore>,
) {
    let config = runtime_config(config_handle.as_deref(), configs.as_deref());
    store.config_mut::<NodeGizmos>().0.line.width = config.node_line_thickness;
    store.config_mut::<ClusterGizmos>().0.line.width = config.cluster_line_thickness;
}
