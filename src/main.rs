use bevy::prelude::*;

use bevy::window::WindowResolution;

use hierarchical_pathfinder::pathfinder::{
    HierarchicalPathfinderPlugin, InitialConfig, PathfinderVolume, VolumeCommand, VolumeShape,
};

use bevy::log::LogPlugin;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::f32::consts::FRAC_PI_2;
use std::fs;
use std::path::{Path, PathBuf};

const LOG_PREFIX: &str = "hierarchical_pathfinder";

fn setup_file_logging() -> String {
    let log_dir = PathBuf::from("logs");
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {e}");
        }
    }

    cleanup_old_logs(&log_dir, 25);

    let now = chrono::Local::now();
    let log_filename = format!("{}_{}.log", LOG_PREFIX, now.format("%Y%m%d_%H%M%S"));
    let log_path_str = log_dir.join(&log_filename).to_string_lossy().to_string();

    let file_appender = RollingFileAppender::new(
        Rotation::NEVER, // Don't rotate during a single run
        &log_dir,
        &log_filename
    );

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            EnvFilter::new("wgpu=error,bevy_render=info,bevy_ecs=info,hierarchical_pathfinder=info")
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    log_path_str
}

fn cleanup_old_logs(log_dir: &Path, keep_count: usize) {
    let Ok(entries) = fs::read_dir(log_dir) else { return };

    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .file_name()
                .and_then(|n| n.to_str())
                .map(|s| s.starts_with(LOG_PREFIX) && s.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect();

    // Oldest first
    log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

    if log_files.len() > keep_count {
        for file in log_files.iter().take(log_files.len() - keep_count) {
            let _ = fs::remove_file(file.path());
        }
    }
}

/// Two demo volumes lying on the ground plane; the second one is yawed to show
/// the grid following the volume's rotation.
fn spawn_demo_scene(
    mut commands: Commands,
    initial_config: Res<InitialConfig>,
    mut volume_commands: MessageWriter<VolumeCommand>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 1400.0, 1100.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Volumes build their grid in local XY; tip them over so it lands on XZ.
    let lay_flat = Quat::from_rotation_x(-FRAC_PI_2);
    let placements = [
        (Vec3::new(-550.0, 0.0, 0.0), lay_flat, Vec3::new(400.0, 300.0, 50.0)),
        (Vec3::new(550.0, 0.0, 0.0), Quat::from_rotation_y(0.5) * lay_flat, Vec3::new(300.0, 300.0, 50.0)),
    ];

    for (position, rotation, half_size) in placements {
        let transform = Transform::from_translation(position).with_rotation(rotation);
        let entity = commands
            .spawn((
                PathfinderVolume::new(initial_config.default_volume),
                VolumeShape::new(half_size),
                transform,
                // Set up front so the first Generate sees the real placement.
                GlobalTransform::from(transform),
            ))
            .id();
        volume_commands.write(VolumeCommand::generate(entity));
    }

    info!("Demo scene ready: press G to regenerate, C to clear");
}

fn main() {
    let log_file = setup_file_logging();

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║  Hierarchical Pathfinder - Logging to file               ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("║  Log file: {:<45} ║", log_file);
    println!("╚══════════════════════════════════════════════════════════╝");

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Hierarchical Pathfinder".into(),
                resolution: WindowResolution::new(1280, 720),
                resizable: true,
                ..default()
            }),
            ..default()
        }).build().disable::<LogPlugin>()) // Disable Bevy's default logging since we set up our own
        .add_plugins(HierarchicalPathfinderPlugin)
        .add_systems(PostStartup, spawn_demo_scene)
        .run();
}
