use bevy::{math::primitives::InfinitePlane3d, prelude::*, window::PrimaryWindow};

use crate::trajectory::{
    SelectedTrajectory, SelectedTrajectoryPoint, Trajectory, TrajectoryPointMarker,
};

use super::EditorSettings;

/// Resource tracking the current selection state.
#[derive(Resource, Default, Debug, Clone)]
pub struct SelectionState {
    /// Currently hovered waypoint, if any: (trajectory entity, index).
    pub hovered_point: Option<(Entity, usize)>,
    /// Whether a waypoint is currently being dragged.
    pub dragging: bool,
    /// The waypoint being dragged: (trajectory entity, index).
    pub dragged_point: Option<(Entity, usize)>,
    /// The plane normal for drag operations (perpendicular to camera).
    pub drag_plane_normal: Vec3,
    /// The initial drag plane point (for a consistent plane during drag).
    pub drag_plane_point: Vec3,
}

/// System to handle mouse picking of waypoints.
pub fn pick_trajectory_points(
    settings: Res<EditorSettings>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    trajectories: Query<(Entity, &Trajectory)>,
    mut selection_state: ResMut<SelectionState>,
) {
    if !settings.enabled {
        return;
    }

    // Don't update hover state while dragging
    if selection_state.dragging {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };

    let Some(cursor_pos) = window.cursor_position() else {
        selection_state.hovered_point = None;
        return;
    };

    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_pos) else {
        return;
    };

    let mut closest: Option<(Entity, usize, f32)> = None;

    for (entity, trajectory) in &trajectories {
        for (index, &point) in trajectory.waypoints.iter().enumerate() {
            let pick_radius = settings.point_radius * 2.0;
            if let Some(dist) = ray_sphere_intersect(ray.origin, ray.direction, point, pick_radius)
            {
                if closest.is_none() || dist < closest.unwrap().2 {
                    closest = Some((entity, index, dist));
                }
            }
        }
    }

    selection_state.hovered_point = closest.map(|(entity, index, _)| (entity, index));
}

fn ray_sphere_intersect(origin: Vec3, direction: Dir3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let a = direction.dot(*direction);
    let b = 2.0 * oc.dot(*direction);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        None
    } else {
        let t = (-b - discriminant.sqrt()) / (2.0 * a);
        if t > 0.0 {
            Some(t)
        } else {
            None
        }
    }
}

/// System to handle selection on mouse click.
pub fn handle_selection_click(
    mut commands: Commands,
    mouse: Res<ButtonInput<MouseButton>>,
    settings: Res<EditorSettings>,
    selection_state: Res<SelectionState>,
    keyboard: Res<ButtonInput<KeyCode>>,
    selected_trajectories: Query<Entity, With<SelectedTrajectory>>,
    markers: Query<(Entity, &TrajectoryPointMarker)>,
    selected_points: Query<Entity, With<SelectedTrajectoryPoint>>,
) {
    if !settings.enabled {
        return;
    }

    // Don't process clicks while dragging
    if selection_state.dragging {
        return;
    }

    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }

    let shift_held = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    if let Some((trajectory_entity, point_index)) = selection_state.hovered_point {
        if !shift_held {
            // Clear other selections
            for entity in &selected_trajectories {
                commands.entity(entity).remove::<SelectedTrajectory>();
            }
            for entity in &selected_points {
                commands.entity(entity).remove::<SelectedTrajectoryPoint>();
            }
        }

        commands.entity(trajectory_entity).insert(SelectedTrajectory);

        // Find and select the waypoint handle
        for (marker_entity, marker) in &markers {
            if marker.trajectory == trajectory_entity && marker.index == point_index {
                commands
                    .entity(marker_entity)
                    .insert(SelectedTrajectoryPoint);
            }
        }
    } else if !shift_held {
        // Clicked on nothing, clear selection
        for entity in &selected_trajectories {
            commands.entity(entity).remove::<SelectedTrajectory>();
        }
        for entity in &selected_points {
            commands.entity(entity).remove::<SelectedTrajectoryPoint>();
        }
    }
}

/// System to handle dragging waypoints on a camera-facing plane.
pub fn handle_point_drag(
    mouse: Res<ButtonInput<MouseButton>>,
    settings: Res<EditorSettings>,
    mut selection_state: ResMut<SelectionState>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut trajectories: Query<&mut Trajectory>,
) {
    if !settings.enabled {
        return;
    }

    // Start drag - capture the hovered point directly
    if mouse.just_pressed(MouseButton::Left) {
        if let Some((trajectory_entity, point_index)) = selection_state.hovered_point {
            selection_state.dragging = true;
            selection_state.dragged_point = Some((trajectory_entity, point_index));

            if let Ok((_, camera_transform)) = cameras.single() {
                selection_state.drag_plane_normal = camera_transform.forward().as_vec3();

                if let Ok(trajectory) = trajectories.get(trajectory_entity) {
                    if let Some(&point) = trajectory.waypoints.get(point_index) {
                        selection_state.drag_plane_point = point;
                    }
                }
            }
        }
    }

    // End drag
    if mouse.just_released(MouseButton::Left) {
        selection_state.dragging = false;
        selection_state.dragged_point = None;
    }

    // Continue drag
    if selection_state.dragging {
        let Some((trajectory_entity, point_index)) = selection_state.dragged_point else {
            return;
        };
        let Ok(window) = windows.single() else {
            return;
        };
        let Some(cursor_pos) = window.cursor_position() else {
            return;
        };
        let Ok((camera, camera_transform)) = cameras.single() else {
            return;
        };
        let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_pos) else {
            return;
        };

        let plane = InfinitePlane3d::new(selection_state.drag_plane_normal);
        let Some(distance) = ray.intersect_plane(selection_state.drag_plane_point, plane) else {
            return;
        };
        let hit = ray.get_point(distance);

        if let Ok(mut trajectory) = trajectories.get_mut(trajectory_entity) {
            trajectory.set_waypoint(point_index, hit);
        }
    }
}
