//! Goal-reached detection for trajectory followers.
//!
//! A [`GoalCheck`] watches how many of a goal entity's colliders the checked
//! entity currently overlaps. Once the occupied ratio exceeds the configured
//! threshold and stays there for a dwell time, the goal counts as reached and
//! a [`GoalReached`] message is emitted once.

use std::collections::HashSet;

use avian3d::prelude::{Collider, CollidingEntities};
use bevy::prelude::*;

/// Progress of a goal check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Default)]
pub enum GoalProgress {
    /// Not enough of the goal's colliders are overlapped.
    #[default]
    Approaching,
    /// The occupancy threshold is met; waiting out the dwell time.
    AtGoal {
        /// Seconds spent continuously at the goal.
        time_in_goal: f32,
    },
    /// The goal was reached; terminal.
    Reached,
}

/// Component checking whether its entity has settled inside a goal region.
///
/// The goal region is the set of colliders on the goal entity and its
/// descendants, cached on first evaluation. Requires [`CollidingEntities`],
/// inserted automatically, since avian3d only tracks contact state for
/// entities that carry it.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(CollidingEntities)]
pub struct GoalCheck {
    /// The entity whose colliders define the goal region.
    pub goal: Entity,
    /// Fraction of the goal's colliders that must be overlapped, in [0, 1].
    pub required_ratio: f32,
    /// Seconds the occupancy must hold before the goal counts as reached.
    pub dwell_seconds: f32,
    /// Current progress.
    pub progress: GoalProgress,
    /// Cached goal collider set.
    #[reflect(ignore)]
    pub(crate) goal_colliders: HashSet<Entity>,
}

impl GoalCheck {
    /// Create a check against the given goal entity with the default
    /// threshold (half the colliders, one second dwell).
    pub fn new(goal: Entity) -> Self {
        Self {
            goal,
            required_ratio: 0.5,
            dwell_seconds: 1.0,
            progress: GoalProgress::Approaching,
            goal_colliders: HashSet::new(),
        }
    }

    /// Set the required occupancy ratio.
    pub fn with_required_ratio(mut self, ratio: f32) -> Self {
        self.required_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Set the dwell time in seconds.
    pub fn with_dwell_seconds(mut self, seconds: f32) -> Self {
        self.dwell_seconds = seconds;
        self
    }

    /// Whether the goal has been reached.
    pub fn is_reached(&self) -> bool {
        self.progress == GoalProgress::Reached
    }

    /// Advance the state machine by one tick.
    ///
    /// `in_goal` is whether the occupancy threshold is currently met. Returns
    /// true exactly once, on the tick the goal becomes reached.
    pub fn advance(&mut self, dt: f32, in_goal: bool) -> bool {
        match self.progress {
            GoalProgress::Approaching => {
                if in_goal {
                    self.progress = GoalProgress::AtGoal { time_in_goal: 0.0 };
                }
                false
            }
            GoalProgress::AtGoal { time_in_goal } => {
                if !in_goal {
                    self.progress = GoalProgress::Approaching;
                    return false;
                }
                let time_in_goal = time_in_goal + dt;
                if time_in_goal > self.dwell_seconds {
                    self.progress = GoalProgress::Reached;
                    true
                } else {
                    self.progress = GoalProgress::AtGoal { time_in_goal };
                    false
                }
            }
            GoalProgress::Reached => false,
        }
    }
}

/// Message emitted once when a [`GoalCheck`] reaches its goal.
#[derive(Message, Debug, Clone)]
pub struct GoalReached {
    /// The entity with the [`GoalCheck`] component.
    pub entity: Entity,
}

/// System that fills the cached goal collider set of fresh goal checks by
/// walking the goal entity and its descendants.
pub fn cache_goal_colliders(
    mut checks: Query<&mut GoalCheck>,
    children: Query<&Children>,
    colliders: Query<(), With<Collider>>,
) {
    for mut check in &mut checks {
        if !check.goal_colliders.is_empty() {
            continue;
        }

        let mut found = HashSet::new();
        let mut stack = vec![check.goal];
        while let Some(entity) = stack.pop() {
            if colliders.get(entity).is_ok() {
                found.insert(entity);
            }
            if let Ok(kids) = children.get(entity) {
                stack.extend_from_slice(kids);
            }
        }

        if !found.is_empty() {
            check.goal_colliders = found;
        }
    }
}

/// System that evaluates goal occupancy from avian3d collision state and
/// advances each check's state machine.
pub fn update_goal_checks(
    time: Res<Time>,
    mut checks: Query<(Entity, &mut GoalCheck, &CollidingEntities)>,
    mut events: MessageWriter<GoalReached>,
) {
    for (entity, mut check, colliding) in &mut checks {
        if check.goal_colliders.is_empty() {
            continue;
        }

        let occupancy = colliding
            .iter()
            .filter(|colliding_entity| check.goal_colliders.contains(*colliding_entity))
            .count();
        let in_goal =
            occupancy as f32 > check.goal_colliders.len() as f32 * check.required_ratio;

        if check.advance(time.delta_secs(), in_goal) {
            info!("goal reached by {entity}");
            events.write(GoalReached { entity });
        }
    }
}

/// Plugin that evaluates [`GoalCheck`] components against avian3d collision
/// state.
pub struct GoalCheckPlugin;

impl Plugin for GoalCheckPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<GoalCheck>()
            .register_type::<GoalProgress>()
            .add_message::<GoalReached>()
            .add_systems(Update, (cache_goal_colliders, update_goal_checks).chain());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_requires_dwell_time() {
        let mut check = GoalCheck::new(Entity::PLACEHOLDER).with_dwell_seconds(1.0);

        assert!(!check.advance(0.1, true));
        assert_eq!(check.progress, GoalProgress::AtGoal { time_in_goal: 0.0 });

        // Nine further ticks accumulate 0.9s, still short of the dwell time.
        for _ in 0..9 {
            assert!(!check.advance(0.1, true));
        }

        assert!(check.advance(0.2, true));
        assert!(check.is_reached());
    }

    #[test]
    fn test_leaving_the_goal_resets_the_timer() {
        let mut check = GoalCheck::new(Entity::PLACEHOLDER).with_dwell_seconds(0.5);

        check.advance(0.1, true);
        check.advance(0.4, true);
        check.advance(0.1, false);
        assert_eq!(check.progress, GoalProgress::Approaching);

        // The dwell has to start over.
        check.advance(0.1, true);
        assert!(!check.advance(0.4, true));
    }

    #[test]
    fn test_goal_check_brings_colliding_entities() {
        // Contact tracking is opt-in per entity; the check is useless
        // without it, so spawning a GoalCheck must pull it in.
        let mut world = World::new();
        let entity = world.spawn(GoalCheck::new(Entity::PLACEHOLDER)).id();
        assert!(world.entity(entity).contains::<CollidingEntities>());
    }

    #[test]
    fn test_reached_fires_once() {
        let mut check = GoalCheck::new(Entity::PLACEHOLDER).with_dwell_seconds(0.0);

        check.advance(0.1, true);
        assert!(check.advance(0.1, true));
        assert!(!check.advance(0.1, true));
        assert!(check.is_reached());
    }
}
