//! Example trajectory editor application.
//!
//! Run with: `cargo run`

use bevy::prelude::*;
use bevy_trajectory_3d::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(TrajectoryPlugin)
        .add_plugins(TrajectoryEditorPlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, show_help)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(5.0, 5.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn(AmbientLight {
        color: Color::WHITE,
        brightness: 500.0,
        affects_lightmapped_meshes: true,
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Example linear trajectory
    commands.spawn(
        Trajectory::new(vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
        ])
        .with_anchor(Vec3::ZERO),
    );

    // Example Hermite trajectory
    commands.spawn(
        Trajectory::new(vec![
            Vec3::new(-4.0, 0.0, 3.0),
            Vec3::new(-2.0, 2.0, 3.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(2.0, 1.5, 3.0),
            Vec3::new(4.0, 0.0, 3.0),
        ])
        .with_interpolation(Interpolation::Hermite),
    );
}

fn show_help(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut shown: Local<bool>,
    editor_settings: Res<EditorSettings>,
) {
    if keyboard.just_pressed(KeyCode::KeyH) {
        *shown = !*shown;

        if *shown {
            println!("\n=== Trajectory Editor Help ===");
            println!(
                "Editor: {}",
                if editor_settings.enabled {
                    "Enabled"
                } else {
                    "Disabled"
                }
            );
            println!();
            println!("Controls:");
            println!("  H          - Toggle this help");
            println!("  A          - Add waypoint");
            println!("  X          - Delete selected waypoint");
            println!("  Tab        - Cycle interpolation (Linear/Hermite)");
            println!("  Escape     - Deselect all");
            println!("  LMB        - Select waypoint");
            println!("  LMB + drag - Move waypoint");
            println!("==============================\n");
        }
    }
}
