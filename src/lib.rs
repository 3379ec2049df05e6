//! # bevy_trajectory_3d
//!
//! A Bevy plugin for defining 3D trajectories from waypoints and moving
//! entities along them at controlled speed.
//!
//! ## Features
//!
//! - Linear or cubic Hermite interpolation between waypoints
//! - Offset-addressed sampling: integer part selects the segment, fraction
//!   the position within it
//! - A fixed-tick follower with lookahead targeting, direction reversal and
//!   boundary handling
//! - Optional physics integration via avian3d (rigid body positioning,
//!   gravity suspended while following)
//! - Collider-occupancy goal detection
//! - Interactive authoring gizmos behind the `editor` feature
//!
//! ## Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_trajectory_3d::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(TrajectoryPlugin)
//!         .add_plugins(TrajectoryFollowPlugin)
//!         .add_plugins(TrajectoryEditorPlugin) // Optional: authoring gizmos
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     let trajectory = commands
//!         .spawn(
//!             Trajectory::new(vec![
//!                 Vec3::new(1.0, 0.0, 0.0),
//!                 Vec3::new(2.0, 0.0, 0.0),
//!                 Vec3::new(3.0, 0.0, 0.0),
//!                 Vec3::new(4.0, 0.0, 0.0),
//!             ])
//!             .with_anchor(Vec3::ZERO)
//!             .with_interpolation(Interpolation::Hermite),
//!         )
//!         .id();
//!
//!     commands.spawn((
//!         Transform::default(),
//!         TrajectoryFollower::new(trajectory).with_speed(1.5),
//!         FollowerControls::default(),
//!     ));
//! }
//! ```
//!
//! ## Plugins
//!
//! - [`TrajectoryPlugin`]: Core trajectory component and type registration (required)
//! - [`TrajectoryFollowPlugin`]: Move entities along trajectories (optional)
//! - [`GoalCheckPlugin`]: Collider-occupancy goal detection (optional)
//! - [`TrajectoryEditorPlugin`]: Interactive authoring with gizmos (optional)
//!
//! ## Disabling the Editor
//!
//! The editor can be toggled at runtime:
//!
//! ```ignore
//! fn toggle_editor(mut settings: ResMut<EditorSettings>) {
//!     settings.enabled = false;     // Disable input handling
//!     settings.show_gizmos = false; // Hide visual gizmos
//! }
//! ```

pub mod follow;
pub mod goal;
pub mod trajectory;

#[cfg(feature = "editor")]
pub mod editor;

pub use follow::TrajectoryFollowPlugin;
pub use goal::GoalCheckPlugin;
pub use trajectory::TrajectoryPlugin;

#[cfg(feature = "editor")]
pub use editor::TrajectoryEditorPlugin;

/// Convenient re-exports of commonly used types.
pub mod prelude {
    pub use crate::follow::{
        FollowerAction, FollowerControls, FollowerEvent, FollowerEventKind, FollowerState,
        PendingStart, StartPolicy, StepResult, TrajectoryFollowPlugin, TrajectoryFollower,
    };
    pub use crate::goal::{GoalCheck, GoalCheckPlugin, GoalProgress, GoalReached};
    pub use crate::trajectory::{
        Interpolation, SelectedTrajectory, SelectedTrajectoryPoint, Trajectory, TrajectoryGoal,
        TrajectoryPlugin, TrajectoryPointMarker,
    };

    #[cfg(feature = "editor")]
    pub use crate::editor::{EditorSettings, SelectionState, TrajectoryEditorPlugin};
}
