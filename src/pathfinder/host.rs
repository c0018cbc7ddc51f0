use bevy::prelude::*;

/// Transform and bounds queries the volume needs from whatever owns it.
pub trait VolumeHost {
    /// Half-size of the volume. The grid uses the x and y components.
    fn extent(&self) -> Vec3;
    fn world_position(&self) -> Vec3;
    fn world_rotation(&self) -> Quat;
}

/// A sampled host transform, kept by the volume for the lifetime of one
/// generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VolumeTransform {
    pub extent: Vec3,
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for VolumeTransform {
    fn default() -> Self {
        Self {
            extent: Vec3::ZERO,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl VolumeTransform {
    pub fn new(extent: Vec3, position: Vec3, rotation: Quat) -> Self {
        Self { extent, position, rotation }
    }

    /// Axis-aligned volume of half-size `extent` centred on the origin.
    pub fn from_extent(extent: Vec3) -> Self {
        Self { extent, ..default() }
    }

    pub fn sample(host: &impl VolumeHost) -> Self {
        Self {
            extent: host.extent(),
            position: host.world_position(),
            rotation: host.world_rotation(),
        }
    }

    /// Host sample for a volume entity. Scale stretches the shape, rotation is
    /// applied separately when mapping nodes to world space.
    pub fn from_global(transform: &GlobalTransform, shape: &VolumeShape) -> Self {
        let (scale, rotation, translation) = transform.to_scale_rotation_translation();
        Self {
            extent: shape.half_size * scale.abs(),
            position: translation,
            rotation,
        }
    }
}

impl VolumeHost for VolumeTransform {
    fn extent(&self) -> Vec3 {
        self.extent
    }

    fn world_position(&self) -> Vec3 {
        self.position
    }

    fn world_rotation(&self) -> Quat {
        self.rotation
    }
}

/// Local half-size of a volume entity.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct VolumeShape {
    pub half_size: Vec3,
}

impl VolumeShape {
    pub fn new(half_size: Vec3) -> Self {
        Self { half_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_global_applies_scale_to_extent() {
        let transform = GlobalTransform::from(
            Transform::from_xyz(5.0, 0.0, -3.0)
                .with_rotation(Quat::from_rotation_z(0.5))
                .with_scale(Vec3::new(2.0, 1.0, 1.0)),
        );
        let sample = VolumeTransform::from_global(&transform, &VolumeShape::new(Vec3::new(100.0, 50.0, 10.0)));

        assert!((sample.extent - Vec3::new(200.0, 50.0, 10.0)).length() < 1e-3, "{:?}", sample.extent);
        assert!((sample.position - Vec3::new(5.0, 0.0, -3.0)).length() < 1e-4);
        assert!(sample.rotation.angle_between(Quat::from_rotation_z(0.5)) < 1e-4);
    }
}
