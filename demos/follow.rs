//! Trajectory following demo.
//!
//! A kinematic sphere follows a Hermite trajectory toward a goal region while
//! a second, transform-driven cube follows the same path in reverse. Space
//! toggles the sphere, R reverses its speed.
//!
//! Run with: `cargo run --example follow`

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_trajectory_3d::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(PhysicsPlugins::default())
        .add_plugins(TrajectoryPlugin)
        .add_plugins(TrajectoryFollowPlugin)
        .add_plugins(GoalCheckPlugin)
        .add_plugins(TrajectoryEditorPlugin)
        .add_systems(Startup, setup)
        .add_systems(Update, (reverse_on_key, log_events))
        .run();
}

#[derive(Component)]
struct Reversible;

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 8.0, 14.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
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

    // Goal region: a sensor box the follower has to settle in
    let goal = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(1.5, 1.5, 1.5))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgba(0.2, 1.0, 0.4, 0.3),
                alpha_mode: AlphaMode::Blend,
                ..default()
            })),
            Transform::from_xyz(6.0, 0.5, 0.0),
            Collider::cuboid(1.5, 1.5, 1.5),
            Sensor,
        ))
        .id();

    // The trajectory tracks the goal entity, so dragging the goal in the
    // editor re-routes the path
    let trajectory = commands
        .spawn((
            Trajectory::new(vec![
                Vec3::new(-4.0, 2.0, 2.0),
                Vec3::new(-2.0, 0.5, -2.0),
                Vec3::new(1.0, 2.5, 1.0),
                Vec3::new(4.0, 0.5, -1.0),
            ])
            .with_anchor(Vec3::new(-6.0, 0.5, 0.0))
            .with_interpolation(Interpolation::Hermite)
            .with_speed_modifiers(vec![1.0, 1.0, 2.0]),
            TrajectoryGoal { target: goal },
        ))
        .id();

    // Physics-integrated follower: gravity is suspended while it runs
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(0.4))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.9, 0.2, 0.2),
            ..default()
        })),
        Transform::from_xyz(-6.0, 0.5, 0.0),
        RigidBody::Kinematic,
        Collider::sphere(0.4),
        TrajectoryFollower::new(trajectory)
            .with_speed(2.0)
            .with_start_delay(1.0),
        FollowerControls::default(),
        GoalCheck::new(goal).with_dwell_seconds(1.0),
        Reversible,
    ));

    // Transform-driven follower without physics
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(0.5, 0.5, 0.5))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.2, 0.2, 0.9),
            ..default()
        })),
        Transform::from_xyz(6.0, 0.5, 0.0),
        TrajectoryFollower::new(trajectory)
            .with_speed(-1.0)
            .with_ignore_physics(true)
            .with_start_policy(StartPolicy::Resume)
            .with_start_offset(5.0),
    ));
}

fn reverse_on_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut followers: Query<&mut TrajectoryFollower, With<Reversible>>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        for mut follower in &mut followers {
            follower.speed = -follower.speed;
        }
    }
}

fn log_events(
    mut follower_events: MessageReader<FollowerEvent>,
    mut goal_events: MessageReader<GoalReached>,
) {
    for event in follower_events.read() {
        info!("follower {} {:?}", event.entity, event.kind);
    }
    for event in goal_events.read() {
        info!("goal reached by {}", event.entity);
    }
}
