use bevy::prelude::*;

use super::{Trajectory, TrajectoryGoal};

/// System that keeps trajectories with a [`TrajectoryGoal`] pointing at the
/// goal entity's current position.
///
/// Only writes the trajectory when the goal actually moved, so change
/// detection stays meaningful for downstream consumers.
pub fn sync_goal_positions(
    mut trajectories: Query<(&mut Trajectory, &TrajectoryGoal)>,
    targets: Query<&GlobalTransform>,
) {
    for (mut trajectory, goal) in &mut trajectories {
        let Ok(target) = targets.get(goal.target) else {
            continue;
        };
        let position = target.translation();
        if trajectory.goal != Some(position) {
            trajectory.goal = Some(position);
            trajectory.rebuild();
        }
    }
}

/// System that rebuilds the derived point sequence of changed trajectories.
///
/// Covers mutations that bypass the editing helpers, such as scene
/// deserialization or direct field writes. Uses `bypass_change_detection` so
/// the rebuild itself does not re-trigger the `Changed` filter next frame.
pub fn rebuild_changed_trajectories(
    mut changed: Query<&mut Trajectory, Changed<Trajectory>>,
) {
    for mut trajectory in &mut changed {
        trajectory.bypass_change_detection().rebuild();
    }
}
