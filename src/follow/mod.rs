//! Trajectory following: moving entities along a [`Trajectory`] at a target
//! speed.
//!
//! The follower advances once per fixed simulation tick. Each tick it walks a
//! chain of lookahead targets sampled from the trajectory until the tick's
//! travel budget is spent, then displaces the entity toward the current
//! target. Motion finishes autonomously at the path boundary in the direction
//! of travel.
//!
//! # Example
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use bevy_trajectory_3d::prelude::*;
//!
//! fn setup(mut commands: Commands) {
//!     let trajectory = commands
//!         .spawn(Trajectory::new(vec![
//!             Vec3::new(1.0, 0.0, 0.0),
//!             Vec3::new(2.0, 0.0, 0.0),
//!             Vec3::new(3.0, 0.0, 0.0),
//!         ]))
//!         .id();
//!
//!     commands.spawn((
//!         Transform::default(),
//!         TrajectoryFollower::new(trajectory).with_speed(2.0),
//!         FollowerControls::default(),
//!     ));
//! }
//! ```
//!
//! [`Trajectory`]: crate::trajectory::Trajectory

mod components;
mod systems;

pub use components::*;
pub use systems::{
    apply_follower_controls, autostart_followers, step_followers, tick_pending_starts,
};

use bevy::prelude::*;

/// Plugin that enables entities to move along trajectories.
///
/// Add this plugin to your app, then add [`TrajectoryFollower`] components to
/// entities you want to move. Stepping runs in `FixedUpdate`; input triggers
/// and deferred starts run in `Update`.
pub struct TrajectoryFollowPlugin;

impl Plugin for TrajectoryFollowPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<TrajectoryFollower>()
            .register_type::<StartPolicy>()
            .register_type::<FollowerState>()
            .register_type::<FollowerControls>()
            .register_type::<PendingStart>()
            .add_message::<FollowerEvent>()
            .add_systems(FixedUpdate, systems::step_followers)
            .add_systems(
                Update,
                (
                    systems::autostart_followers,
                    systems::tick_pending_starts,
                    systems::apply_follower_controls,
                ),
            );
    }
}
