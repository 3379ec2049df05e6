mod components;
mod systems;
mod types;

pub use components::*;
pub use systems::{rebuild_changed_trajectories, sync_goal_positions};
pub use types::*;

use bevy::prelude::*;

/// Plugin providing the [`Trajectory`] component: type registration and the
/// maintenance systems that keep the derived point sequence current.
/// This plugin does NOT include authoring tooling - use `TrajectoryEditorPlugin` for that.
pub struct TrajectoryPlugin;

impl Plugin for TrajectoryPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Interpolation>()
            .register_type::<Trajectory>()
            .register_type::<TrajectoryGoal>()
            .register_type::<TrajectoryPointMarker>()
            .register_type::<SelectedTrajectory>()
            .register_type::<SelectedTrajectoryPoint>()
            .add_systems(
                Update,
                (systems::sync_goal_positions, systems::rebuild_changed_trajectories).chain(),
            );
    }
}
