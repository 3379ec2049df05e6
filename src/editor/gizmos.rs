//! Trajectory gizmo rendering and waypoint handle scaffolding.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

use crate::trajectory::{
    SelectedTrajectory, SelectedTrajectoryPoint, Trajectory, TrajectoryPointMarker,
};

use super::EditorSettings;

/// System that draws each trajectory's path as a polyline gizmo.
pub fn render_trajectory_curves(
    mut gizmos: Gizmos,
    settings: Res<EditorSettings>,
    trajectories: Query<(&Trajectory, Has<SelectedTrajectory>)>,
) {
    if !settings.show_gizmos {
        return;
    }

    for (trajectory, selected) in &trajectories {
        if trajectory.point_count() < 2 {
            continue;
        }
        let color = if selected {
            settings.selected_path_color
        } else {
            settings.path_color
        };
        gizmos.linestrip(trajectory.polyline(settings.sample_step), color);
    }
}

/// System that draws waypoint handles and the goal marker as spheres.
pub fn render_trajectory_points(
    mut gizmos: Gizmos,
    settings: Res<EditorSettings>,
    trajectories: Query<(Entity, &Trajectory)>,
    selected_markers: Query<&TrajectoryPointMarker, With<SelectedTrajectoryPoint>>,
) {
    if !settings.show_gizmos {
        return;
    }

    let selected: HashSet<(Entity, usize)> = selected_markers
        .iter()
        .map(|marker| (marker.trajectory, marker.index))
        .collect();

    for (entity, trajectory) in &trajectories {
        for (index, &point) in trajectory.waypoints.iter().enumerate() {
            let color = if selected.contains(&(entity, index)) {
                settings.selected_point_color
            } else {
                settings.point_color
            };
            gizmos.sphere(point, settings.point_radius, color);
        }

        if let Some(goal) = trajectory.goal {
            gizmos.sphere(goal, settings.point_radius * 1.5, settings.goal_color);
        }
    }
}

/// System that keeps one handle entity per waypoint.
///
/// Handles carry a [`TrajectoryPointMarker`] and a [`Transform`] at the
/// waypoint position, so selection state can live on them and other tooling
/// can target them.
pub fn sync_point_markers(
    mut commands: Commands,
    trajectories: Query<(Entity, &Trajectory)>,
    mut markers: Query<(Entity, &TrajectoryPointMarker, &mut Transform)>,
) {
    let mut existing: HashMap<(Entity, usize), Entity> = HashMap::new();
    for (marker_entity, marker, _) in &markers {
        existing.insert((marker.trajectory, marker.index), marker_entity);
    }

    for (trajectory_entity, trajectory) in &trajectories {
        for (index, &waypoint) in trajectory.waypoints.iter().enumerate() {
            match existing.get(&(trajectory_entity, index)) {
                Some(&marker_entity) => {
                    if let Ok((_, _, mut transform)) = markers.get_mut(marker_entity) {
                        transform.translation = waypoint;
                    }
                }
                None => {
                    commands.spawn((
                        TrajectoryPointMarker {
                            trajectory: trajectory_entity,
                            index,
                        },
                        Transform::from_translation(waypoint),
                    ));
                }
            }
        }
    }
}

/// System that despawns handles whose waypoint or trajectory no longer exists.
pub fn cleanup_orphaned_markers(
    mut commands: Commands,
    trajectories: Query<&Trajectory>,
    markers: Query<(Entity, &TrajectoryPointMarker)>,
) {
    for (marker_entity, marker) in &markers {
        let stale = match trajectories.get(marker.trajectory) {
            Ok(trajectory) => marker.index >= trajectory.waypoints.len(),
            Err(_) => true,
        };
        if stale {
            commands.entity(marker_entity).despawn();
        }
    }
}
