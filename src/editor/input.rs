use bevy::prelude::*;

use crate::trajectory::{SelectedTrajectory, SelectedTrajectoryPoint, Trajectory, TrajectoryPointMarker};

use super::EditorSettings;

/// System to handle keyboard shortcuts for trajectory editing.
pub fn handle_hotkeys(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<EditorSettings>,
    mut trajectories: Query<(Entity, &mut Trajectory), With<SelectedTrajectory>>,
    selected_points: Query<(Entity, &TrajectoryPointMarker), With<SelectedTrajectoryPoint>>,
) {
    if !settings.enabled {
        return;
    }

    // A - Add waypoint after selection
    if keyboard.just_pressed(KeyCode::KeyA) {
        handle_add_waypoint(&mut trajectories, &selected_points);
    }

    // X - Delete selected waypoints
    if keyboard.just_pressed(KeyCode::KeyX) {
        handle_delete_waypoints(&mut commands, &mut trajectories, &selected_points);
    }

    // Tab - Cycle interpolation method
    if keyboard.just_pressed(KeyCode::Tab) {
        for (_, mut trajectory) in &mut trajectories {
            trajectory.cycle_interpolation();
        }
    }

    // Escape - Deselect all
    if keyboard.just_pressed(KeyCode::Escape) {
        for (entity, _) in &trajectories {
            commands.entity(entity).remove::<SelectedTrajectory>();
        }
        for (entity, _) in &selected_points {
            commands.entity(entity).remove::<SelectedTrajectoryPoint>();
        }
    }
}

fn handle_add_waypoint(
    trajectories: &mut Query<(Entity, &mut Trajectory), With<SelectedTrajectory>>,
    selected_points: &Query<(Entity, &TrajectoryPointMarker), With<SelectedTrajectoryPoint>>,
) {
    // Find the highest selected index per trajectory
    let mut insert_after: std::collections::HashMap<Entity, usize> =
        std::collections::HashMap::new();

    for (_, marker) in selected_points.iter() {
        let entry = insert_after.entry(marker.trajectory).or_insert(0);
        *entry = (*entry).max(marker.index);
    }

    for (entity, mut trajectory) in trajectories.iter_mut() {
        let insert_index = insert_after
            .get(&entity)
            .copied()
            .unwrap_or(trajectory.waypoints.len().saturating_sub(1));

        // Calculate new waypoint position
        let new_pos = if trajectory.waypoints.is_empty() {
            Vec3::ZERO
        } else if insert_index + 1 < trajectory.waypoints.len() {
            // Midpoint between current and next
            (trajectory.waypoints[insert_index] + trajectory.waypoints[insert_index + 1]) / 2.0
        } else {
            // Extend in the direction of the path
            let last = trajectory.waypoints[insert_index];
            if insert_index > 0 {
                let prev = trajectory.waypoints[insert_index - 1];
                last + (last - prev).normalize_or_zero() * 1.0
            } else {
                last + Vec3::X
            }
        };

        trajectory.insert_waypoint(insert_index + 1, new_pos);
    }
}

fn handle_delete_waypoints(
    commands: &mut Commands,
    trajectories: &mut Query<(Entity, &mut Trajectory), With<SelectedTrajectory>>,
    selected_points: &Query<(Entity, &TrajectoryPointMarker), With<SelectedTrajectoryPoint>>,
) {
    // Group selected indices by trajectory, deleted highest-first so the
    // remaining indices stay valid
    let mut to_delete: std::collections::HashMap<Entity, Vec<usize>> =
        std::collections::HashMap::new();

    for (_, marker) in selected_points.iter() {
        to_delete
            .entry(marker.trajectory)
            .or_default()
            .push(marker.index);
    }

    for (entity, mut trajectory) in trajectories.iter_mut() {
        if let Some(indices) = to_delete.get(&entity) {
            let mut sorted_indices = indices.clone();
            sorted_indices.sort_unstable();
            sorted_indices.reverse();

            for index in sorted_indices {
                // Keep at least a two-point path
                if trajectory.waypoints.len() > 2 {
                    trajectory.remove_waypoint(index);
                }
            }
        }
    }

    // Clear selection on deleted points
    for (marker_entity, _) in selected_points.iter() {
        commands
            .entity(marker_entity)
            .remove::<SelectedTrajectoryPoint>();
    }
}
