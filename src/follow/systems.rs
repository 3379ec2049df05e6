use avian3d::prelude::{GravityScale, Position};
use bevy::prelude::*;

use crate::trajectory::Trajectory;

use super::{
    FollowerAction, FollowerControls, FollowerEvent, FollowerEventKind, PendingStart,
    TrajectoryFollower,
};

/// System that advances all running followers by one fixed simulation tick.
///
/// The new position goes to the avian3d rigid body when physics integration
/// is active, otherwise to the [`Transform`]. A follower whose trajectory
/// entity disappeared is warned about once and stopped.
pub fn step_followers(
    time: Res<Time>,
    trajectories: Query<&Trajectory>,
    mut followers: Query<(
        Entity,
        &mut TrajectoryFollower,
        &mut Transform,
        Option<&mut Position>,
        Option<&mut GravityScale>,
    )>,
    mut events: MessageWriter<FollowerEvent>,
) {
    let dt = time.delta_secs();

    for (entity, mut follower, mut transform, mut body_position, gravity) in &mut followers {
        if !follower.is_running() {
            continue;
        }

        let Ok(trajectory) = trajectories.get(follower.trajectory) else {
            if !follower.warned_missing_trajectory {
                warn!("trajectory follower {entity} lost its trajectory, stopping");
                follower.warned_missing_trajectory = true;
            }
            follower.stop();
            continue;
        };

        let use_physics = !follower.ignore_physics && body_position.is_some();
        let current = match (&body_position, use_physics) {
            (Some(position), true) => position.0,
            _ => transform.translation,
        };

        let result = follower.step(dt, current, trajectory);

        if use_physics {
            if let Some(position) = body_position.as_mut() {
                position.0 = result.position;
            }
        } else {
            if !follower.ignore_physics && !follower.warned_missing_body {
                warn!(
                    "trajectory follower {entity} requested physics integration but has no \
                     rigid body, writing to the transform instead"
                );
                follower.warned_missing_body = true;
            }
            transform.translation = result.position;
        }

        if follower.is_finished() {
            restore_gravity(&mut follower, gravity);
            events.write(FollowerEvent {
                entity,
                kind: FollowerEventKind::Finished,
            });
        }
    }
}

/// System that starts freshly spawned followers with `autostart` set, either
/// immediately or via a cancellable [`PendingStart`] when a delay is
/// configured.
pub fn autostart_followers(
    mut commands: Commands,
    trajectories: Query<&Trajectory>,
    mut followers: Query<
        (Entity, &mut TrajectoryFollower, Option<&mut GravityScale>),
        Added<TrajectoryFollower>,
    >,
    mut events: MessageWriter<FollowerEvent>,
) {
    for (entity, mut follower, gravity) in &mut followers {
        if !follower.autostart {
            continue;
        }
        if follower.start_delay > 0.0 {
            commands
                .entity(entity)
                .insert(PendingStart::after(follower.start_delay));
        } else {
            begin_following(entity, &mut follower, &trajectories, gravity, &mut events);
        }
    }
}

/// System that fires deferred starts whose delay has elapsed.
///
/// Cancellation happens by removing the [`PendingStart`] component before the
/// timer finishes; a cancelled start never takes effect.
pub fn tick_pending_starts(
    mut commands: Commands,
    time: Res<Time>,
    trajectories: Query<&Trajectory>,
    mut pending: Query<(
        Entity,
        &mut TrajectoryFollower,
        &mut PendingStart,
        Option<&mut GravityScale>,
    )>,
    mut events: MessageWriter<FollowerEvent>,
) {
    for (entity, mut follower, mut pending_start, gravity) in &mut pending {
        if pending_start.0.tick(time.delta()).just_finished() {
            commands.entity(entity).remove::<PendingStart>();
            begin_following(entity, &mut follower, &trajectories, gravity, &mut events);
        }
    }
}

/// System that applies the configurable key bindings of [`FollowerControls`].
pub fn apply_follower_controls(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    trajectories: Query<&Trajectory>,
    mut followers: Query<(
        Entity,
        &mut TrajectoryFollower,
        &FollowerControls,
        Option<&mut GravityScale>,
    )>,
    mut events: MessageWriter<FollowerEvent>,
) {
    for (entity, mut follower, controls, mut gravity) in &mut followers {
        for &(key, action) in &controls.bindings {
            if !keyboard.just_pressed(key) {
                continue;
            }

            let start = match action {
                FollowerAction::Start => true,
                FollowerAction::Stop => false,
                FollowerAction::Toggle => !follower.is_running(),
            };

            if start {
                begin_following(
                    entity,
                    &mut follower,
                    &trajectories,
                    gravity.as_mut().map(|g| g.reborrow()),
                    &mut events,
                );
            } else {
                // Stopping also cancels a still-pending delayed start.
                commands.entity(entity).remove::<PendingStart>();
                stop_following(
                    entity,
                    &mut follower,
                    gravity.as_mut().map(|g| g.reborrow()),
                    &mut events,
                );
            }
        }
    }
}

/// Start a follower, zeroing gravity on its body while it runs.
///
/// A missing trajectory is a configuration error: warned once, and the
/// follower stays idle.
fn begin_following(
    entity: Entity,
    follower: &mut TrajectoryFollower,
    trajectories: &Query<&Trajectory>,
    gravity: Option<Mut<GravityScale>>,
    events: &mut MessageWriter<FollowerEvent>,
) {
    let Ok(trajectory) = trajectories.get(follower.trajectory) else {
        if !follower.warned_missing_trajectory {
            warn!("trajectory follower {entity} has no trajectory to follow, staying idle");
            follower.warned_missing_trajectory = true;
        }
        return;
    };

    if follower.is_running() {
        return;
    }

    if let Some(mut gravity) = gravity {
        if follower.gravity_cache.is_none() {
            follower.gravity_cache = Some(gravity.0);
        }
        gravity.0 = 0.0;
    }

    follower.start(trajectory);
    debug!("trajectory follower {entity} started, gravity disabled while following");
    events.write(FollowerEvent {
        entity,
        kind: FollowerEventKind::Started,
    });
}

/// Stop a follower and restore its cached gravity scale.
fn stop_following(
    entity: Entity,
    follower: &mut TrajectoryFollower,
    gravity: Option<Mut<GravityScale>>,
    events: &mut MessageWriter<FollowerEvent>,
) {
    if !follower.is_running() {
        return;
    }
    restore_gravity(follower, gravity);
    follower.stop();
    debug!("trajectory follower {entity} stopped, gravity restored");
    events.write(FollowerEvent {
        entity,
        kind: FollowerEventKind::Stopped,
    });
}

fn restore_gravity(follower: &mut TrajectoryFollower, gravity: Option<Mut<GravityScale>>) {
    if let (Some(mut gravity), Some(cached)) = (gravity, follower.gravity_cache.take()) {
        gravity.0 = cached;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::follow::{FollowerState, TrajectoryFollowPlugin};

    fn test_app() -> App {
        let mut app = App::new();
        app.insert_resource(Time::<()>::default());
        app.init_resource::<ButtonInput<KeyCode>>();
        app.add_plugins(TrajectoryFollowPlugin);
        app
    }

    fn advance(app: &mut App, seconds: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(seconds));
        app.update();
    }

    fn spawn_delayed_follower(app: &mut App) -> Entity {
        let trajectory = app
            .world_mut()
            .spawn(Trajectory::new(vec![
                Vec3::ZERO,
                Vec3::X,
                Vec3::new(2.0, 0.0, 0.0),
            ]))
            .id();
        app.world_mut()
            .spawn((
                Transform::default(),
                TrajectoryFollower::new(trajectory)
                    .with_start_delay(1.0)
                    .with_ignore_physics(true),
            ))
            .id()
    }

    fn follower_state(app: &App, entity: Entity) -> FollowerState {
        app.world()
            .entity(entity)
            .get::<TrajectoryFollower>()
            .unwrap()
            .state
    }

    #[test]
    fn test_delayed_start_fires_after_the_delay() {
        let mut app = test_app();
        let follower = spawn_delayed_follower(&mut app);

        // Autostart arms the deferral instead of starting immediately.
        app.update();
        assert!(app.world().entity(follower).contains::<PendingStart>());
        assert_eq!(follower_state(&app, follower), FollowerState::Idle);

        advance(&mut app, 0.5);
        assert_eq!(follower_state(&app, follower), FollowerState::Idle);

        advance(&mut app, 0.6);
        assert_eq!(follower_state(&app, follower), FollowerState::Running);
        assert!(!app.world().entity(follower).contains::<PendingStart>());
    }

    #[test]
    fn test_cancelled_pending_start_never_takes_effect() {
        let mut app = test_app();
        let follower = spawn_delayed_follower(&mut app);

        app.update();
        assert!(app.world().entity(follower).contains::<PendingStart>());

        // Cancel before the delay elapses.
        app.world_mut().entity_mut(follower).remove::<PendingStart>();

        advance(&mut app, 2.0);
        advance(&mut app, 2.0);
        assert_eq!(follower_state(&app, follower), FollowerState::Idle);
        assert!(!app.world().entity(follower).contains::<PendingStart>());
    }
}
