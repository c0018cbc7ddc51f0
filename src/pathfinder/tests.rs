/// Tests for volume generation
///
/// These exercise the full pipeline through `PathfinderVolume` and check the
/// structural guarantees a pathfinder relies on: node count, cluster
/// partition, neighbour symmetry with the grid bounds, and world placement.

use super::*;
use std::collections::BTreeSet;
use std::f32::consts::FRAC_PI_2;

fn volume(node_size: f32, cluster_size: i32) -> PathfinderVolume {
    PathfinderVolume::new(VolumeConfig { node_size, cluster_size, ..VolumeConfig::default() })
}

fn square_host(half: f32) -> VolumeTransform {
    VolumeTransform::from_extent(Vec3::new(half, half, 10.0))
}

/// Check every structural invariant of a generated volume.
fn assert_invariants(volume: &PathfinderVolume) {
    let dims = volume.grid_dimensions();
    let cluster_size = volume.config().cluster_size;

    assert_eq!(volume.node_count(), dims.cell_count(), "node count must equal width * height");
    assert_eq!(dims.width % 2, 0, "grid width must be even");
    assert_eq!(dims.height % 2, 0, "grid height must be even");

    let mut seen = BTreeSet::new();
    for cluster in volume.clusters() {
        for child in &cluster.children {
            assert!(seen.insert(*child), "node {:?} owned by more than one cluster", child);
        }
    }
    let all: BTreeSet<_> = volume.nodes().map(|n| n.coord).collect();
    assert_eq!(seen, all, "cluster children must partition the node set");

    for node in volume.nodes() {
        assert!(dims.contains(node.coord));
        assert_eq!(
            volume.get_node_cluster_id(node.coord).unwrap(),
            ClusterCoord::new(node.coord.x.div_euclid(cluster_size), node.coord.y.div_euclid(cluster_size))
        );
        for direction in Direction::ALL {
            let target = node.coord.step(direction);
            assert_eq!(
                node.neighbors.get(direction),
                dims.contains(target).then_some(target),
                "neighbor {} of {:?}",
                direction.name(),
                node.coord
            );
        }
    }
}

#[test]
fn test_reference_scenario() {
    let mut v = volume(50.0, 2);
    v.generate(&square_host(100.0)).unwrap();

    assert_eq!(v.state(), GenerationState::PathfinderVolumeReady);
    assert_eq!(v.grid_dimensions(), GridDimensions::new(4, 4));
    assert_eq!(v.corner_offset(), Vec2::new(-100.0, -100.0));
    assert_eq!(v.node_count(), 16);
    assert_eq!(v.cluster_grid_dimensions(), GridDimensions::new(2, 2));
    assert_eq!(v.cluster_count(), 4);
    for cluster in v.clusters() {
        assert_eq!(cluster.children.len(), 4, "cluster {:?}", cluster.coord);
    }
    assert_invariants(&v);
}

#[test]
fn test_volume_smaller_than_node_is_empty_but_ready() {
    let mut v = volume(50.0, 8);
    v.generate(&square_host(10.0)).unwrap();

    assert_eq!(v.state(), GenerationState::PathfinderVolumeReady);
    assert_eq!(v.grid_dimensions(), GridDimensions::ZERO);
    assert_eq!(v.node_count(), 0);
    assert_eq!(v.cluster_count(), 0);
}

#[test]
fn test_corner_node_neighbors() {
    let mut v = volume(50.0, 2);
    v.generate(&square_host(100.0)).unwrap();

    let neighbors = v.get_node_neighbors(GridCoord::new(0, 0)).unwrap();
    let directions: BTreeSet<_> = neighbors.iter().map(|(d, _)| d).collect();
    assert_eq!(
        directions,
        BTreeSet::from([Direction::East, Direction::North, Direction::NorthEast])
    );
}

#[test]
fn test_world_location_without_transform_is_local_offset() {
    let mut v = volume(50.0, 2);
    v.generate(&square_host(100.0)).unwrap();

    for node in v.nodes() {
        let expected = Vec3::new(
            -100.0 + 25.0 + node.coord.x as f32 * 50.0,
            -100.0 + 25.0 + node.coord.y as f32 * 50.0,
            0.0,
        );
        assert_eq!(v.get_node_world_location(node.coord).unwrap(), expected);
        assert_eq!(v.get_node_offset(node.coord).unwrap(), expected.truncate());
    }
}

#[test]
fn test_world_location_follows_volume_rotation() {
    let host = VolumeTransform::new(
        Vec3::new(100.0, 100.0, 10.0),
        Vec3::new(1000.0, 0.0, 0.0),
        Quat::from_rotation_z(FRAC_PI_2),
    );
    let mut v = volume(50.0, 2);
    v.generate(&host).unwrap();

    // Local (-75, -75) rotated a quarter turn about Z is (75, -75).
    let world = v.get_node_world_location(GridCoord::new(0, 0)).unwrap();
    assert!((world - Vec3::new(1075.0, -75.0, 0.0)).length() < 1e-3, "got {world:?}");
}

#[test]
fn test_generate_twice_is_idempotent() {
    let host = square_host(330.0);
    let mut v = volume(40.0, 3);
    v.generate(&host).unwrap();
    let first_nodes: Vec<_> = v.nodes().cloned().collect();
    let first_clusters: Vec<_> = v.clusters().cloned().collect();

    v.generate(&host).unwrap();
    let second_nodes: Vec<_> = v.nodes().cloned().collect();
    let second_clusters: Vec<_> = v.clusters().cloned().collect();

    assert_eq!(first_nodes, second_nodes);
    assert_eq!(first_clusters, second_clusters);
    assert_invariants(&v);
}

#[test]
fn test_randomized_invariants() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..50 {
        let extent = Vec3::new(rng.f32() * 300.0, rng.f32() * 300.0, 10.0);
        let node_size = 5.0 + rng.f32() * 95.0;
        let cluster_size = rng.i32(1..=10);

        let mut v = volume(node_size, cluster_size);
        v.generate(&VolumeTransform::from_extent(extent)).unwrap();
        assert!(v.is_ready());
        assert_eq!(
            v.cluster_grid_dimensions(),
            cluster_grid_dimensions(v.grid_dimensions(), cluster_size)
        );
        assert_invariants(&v);
    }
}

#[test]
fn test_invalid_config_is_rejected_before_generation() {
    let mut v = volume(0.0, 2);
    let err = v.generate(&square_host(100.0)).unwrap_err();
    assert_eq!(err, PathfinderError::InvalidNodeSize(0.0));
    assert_eq!(v.state(), GenerationState::NotInitialised);
    assert_eq!(v.node_count(), 0);

    let mut v = volume(50.0, 0);
    let err = v.generate(&square_host(100.0)).unwrap_err();
    assert_eq!(err, PathfinderError::InvalidClusterSize(0));
    assert_eq!(v.state(), GenerationState::NotInitialised);
}

#[test]
fn test_queries_outside_grid_are_not_found() {
    let mut v = volume(50.0, 2);
    v.generate(&square_host(100.0)).unwrap();

    let outside = GridCoord::new(4, 0);
    assert_eq!(v.get_node_neighbors(outside), Err(PathfinderError::NodeNotFound(outside)));
    assert_eq!(v.get_node_offset(outside), Err(PathfinderError::NodeNotFound(outside)));
    assert_eq!(v.get_node_cluster_id(outside), Err(PathfinderError::NodeNotFound(outside)));
    assert_eq!(v.get_node_world_location(outside), Err(PathfinderError::NodeNotFound(outside)));
    assert_eq!(
        v.get_cluster_children(ClusterCoord::new(2, 0)),
        Err(PathfinderError::ClusterNotFound(ClusterCoord::new(2, 0)))
    );
}

#[test]
fn test_clear_discards_everything() {
    let mut v = volume(50.0, 2);
    v.generate(&square_host(100.0)).unwrap();
    assert!(v.clear());

    assert_eq!(v.state(), GenerationState::NotInitialised);
    assert_eq!(v.node_count(), 0);
    assert_eq!(v.cluster_count(), 0);
    assert!(v.transform().is_none());
    assert_eq!(
        v.get_node_offset(GridCoord::new(0, 0)),
        Err(PathfinderError::NodeNotFound(GridCoord::new(0, 0)))
    );
}

#[test]
fn test_manual_stepping_matches_generate() {
    let host = square_host(100.0);
    let mut stepped = volume(50.0, 2);
    for state in GenerationState::PIPELINE {
        assert_eq!(stepped.request_state(state, &host), Ok(true), "entering {:?}", state);
        assert_eq!(stepped.state(), state);
    }

    let mut generated = volume(50.0, 2);
    generated.generate(&host).unwrap();
    assert_eq!(
        stepped.nodes().cloned().collect::<Vec<_>>(),
        generated.nodes().cloned().collect::<Vec<_>>()
    );
}

#[test]
fn test_out_of_sequence_requests_are_ignored() {
    let host = square_host(100.0);
    let mut v = volume(50.0, 2);

    assert_eq!(v.request_state(GenerationState::GridReady, &host), Ok(false));
    assert_eq!(v.state(), GenerationState::NotInitialised);

    v.request_state(GenerationState::Initialised, &host).unwrap();
    v.request_state(GenerationState::GridGenerationDataReady, &host).unwrap();
    v.request_state(GenerationState::GridReady, &host).unwrap();

    // Node data before clusters exist would orphan every node; the guard
    // refuses it.
    assert_eq!(v.request_state(GenerationState::NodeDataReady, &host), Ok(false));
    assert_eq!(v.state(), GenerationState::GridReady);
    assert_eq!(v.cluster_count(), 0);

    // Repeating the current state does not rerun the phase.
    assert_eq!(v.request_state(GenerationState::GridReady, &host), Ok(false));
    assert_eq!(v.node_count(), 16);
}

#[test]
fn test_nodes_are_identity_only_until_node_data() {
    let host = square_host(100.0);
    let mut v = volume(50.0, 2);
    for state in &GenerationState::PIPELINE[..4] {
        v.request_state(*state, &host).unwrap();
    }
    assert_eq!(v.state(), GenerationState::ClustersReady);
    assert!(v.clusters().all(|c| c.children.is_empty()));
    assert_eq!(
        v.get_node_cluster_id(GridCoord::new(1, 1)),
        Err(PathfinderError::NodeNotPopulated(GridCoord::new(1, 1)))
    );
}

#[test]
fn test_config_change_applies_on_next_generate() {
    let host = square_host(100.0);
    let mut v = volume(50.0, 2);
    v.generate(&host).unwrap();

    v.set_config(VolumeConfig { node_size: 25.0, cluster_size: 4, ..VolumeConfig::default() });
    assert_eq!(v.node_count(), 16, "existing data is untouched until regenerated");

    v.generate(&host).unwrap();
    assert_eq!(v.grid_dimensions(), GridDimensions::new(8, 8));
    assert_eq!(v.cluster_count(), 4);
    assert_invariants(&v);
}

#[test]
fn test_cluster_neighbors_stay_unpopulated() {
    let mut v = volume(50.0, 2);
    v.generate(&square_host(200.0)).unwrap();
    assert!(v.clusters().all(|c| c.neighbors.is_empty()));
}

#[test]
fn test_debug_pass_runs_on_terminal_state() {
    let mut v = PathfinderVolume::new(VolumeConfig {
        node_size: 50.0,
        cluster_size: 2,
        debug_enabled: true,
        draw_nodes: true,
        ..VolumeConfig::default()
    });
    let mut boxes: Vec<DebugBox> = Vec::new();
    v.generate_and_draw(&square_host(100.0), &mut boxes, &PathfinderConfig::default()).unwrap();
    assert_eq!(boxes.len(), 16);

    // Debug flags never change the generated data.
    let mut plain = volume(50.0, 2);
    plain.generate(&square_host(100.0)).unwrap();
    assert_eq!(
        v.nodes().cloned().collect::<Vec<_>>(),
        plain.nodes().cloned().collect::<Vec<_>>()
    );
}

#[test]
fn test_cluster_size_larger_than_grid_gives_one_cluster() {
    let mut v = volume(50.0, i32::MAX);
    v.generate(&square_host(100.0)).unwrap();

    assert_eq!(v.cluster_grid_dimensions(), GridDimensions::new(1, 1));
    assert_eq!(v.get_cluster_children(ClusterCoord::new(0, 0)).unwrap().len(), 16);
    assert_invariants(&v);
}

#[test]
fn test_tiny_node_size_is_rejected_not_wrapped() {
    let mut v = volume(1e-30, 8);
    let err = v.generate(&square_host(100.0)).unwrap_err();

    assert!(matches!(err, PathfinderError::GridTooLarge { .. }), "got {err:?}");
    assert_eq!(v.state(), GenerationState::NotInitialised);
    assert_eq!(v.node_count(), 0);
    assert_eq!(v.grid_dimensions(), GridDimensions::ZERO);
}

#[test]
fn test_manual_stepping_runs_debug_pass_on_terminal_state() {
    let host = square_host(100.0);
    let mut v = PathfinderVolume::new(VolumeConfig {
        node_size: 50.0,
        cluster_size: 2,
        debug_enabled: true,
        draw_nodes: true,
        ..VolumeConfig::default()
    });
    let config = PathfinderConfig::default();
    let mut boxes: Vec<DebugBox> = Vec::new();

    for state in &GenerationState::PIPELINE[..5] {
        v.request_state_and_draw(*state, &host, &mut boxes, &config).unwrap();
    }
    assert!(boxes.is_empty(), "nothing is drawn before the terminal state");

    let entered = v
        .request_state_and_draw(GenerationState::PathfinderVolumeReady, &host, &mut boxes, &config)
        .unwrap();
    assert!(entered);
    assert_eq!(boxes.len(), 16);

    // Repeating the terminal request is ignored and draws nothing more.
    assert_eq!(
        v.request_state_and_draw(GenerationState::PathfinderVolumeReady, &host, &mut boxes, &config),
        Ok(false)
    );
    assert_eq!(boxes.len(), 16);
}
