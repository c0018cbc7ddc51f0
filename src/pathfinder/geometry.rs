//! Conversions between grid-local offsets and world space.

use bevy::prelude::*;
use super::types::GridCoord;

/// Local offset of a node's centre relative to the volume's centre, before the
/// volume transform is applied.
#[inline]
pub fn node_offset(coord: GridCoord, node_size: f32, corner_offset: Vec2) -> Vec2 {
    Vec2::new(
        node_size / 2.0 + corner_offset.x + coord.x as f32 * node_size,
        node_size / 2.0 + corner_offset.y + coord.y as f32 * node_size,
    )
}

/// Rotate `point` about `pivot`.
#[inline]
pub fn rotate_around_pivot(point: Vec3, rotation: Quat, pivot: Vec3) -> Vec3 {
    rotation * (point - pivot) + pivot
}

/// World position of a local node offset for a volume at `position` with
/// `rotation`. The grid lies in the volume's local XY plane (z = 0).
pub fn offset_to_world(offset: Vec2, position: Vec3, rotation: Quat) -> Vec3 {
    rotate_around_pivot(offset.extend(0.0) + position, rotation, position)
}
