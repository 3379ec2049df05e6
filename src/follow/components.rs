use bevy::prelude::*;

use crate::trajectory::Trajectory;

/// What `start()` does with the follower's path offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Default)]
pub enum StartPolicy {
    /// Reset to one lookahead step past the path start.
    #[default]
    Restart,
    /// Resume from the last-known offset.
    Resume,
}

/// Current state of a trajectory follower.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Default)]
pub enum FollowerState {
    /// Not moving; the initial state, also entered by `stop()`.
    #[default]
    Idle,
    /// Actively stepping along the trajectory.
    Running,
    /// Reached a path boundary in the direction of travel.
    Finished,
}

/// Result of advancing a follower by one simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// The follower's new world position.
    pub position: Vec3,
    /// Whether the follower is still running after this step.
    pub running: bool,
}

/// Component that moves an entity along a [`Trajectory`] at a target speed.
///
/// Each fixed simulation tick the follower samples a lookahead target on the
/// trajectory, walks the lookahead chain until the tick's travel budget is
/// exhausted, and displaces the entity toward the current target. Reaching a
/// path boundary in the direction of travel finishes the motion.
///
/// The new position is written to the avian3d rigid body when one is present,
/// or directly to the [`Transform`] when `ignore_physics` is set (or no body
/// exists).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component, Default)]
pub struct TrajectoryFollower {
    /// The trajectory entity to follow.
    pub trajectory: Entity,

    /// Movement speed in world units per second. Negative values travel
    /// toward the path start.
    pub speed: f32,

    /// Offset increment used to pick the next intermediate target. Smaller
    /// values track curvature more faithfully at higher per-step cost.
    pub lookahead: f32,

    /// Start moving as soon as the follower is spawned.
    pub autostart: bool,

    /// Delay in seconds before an autostart takes effect.
    pub start_delay: f32,

    /// Write positions to the [`Transform`] even when a rigid body exists.
    pub ignore_physics: bool,

    /// Whether `start()` resets the offset or resumes from the last one.
    pub start_policy: StartPolicy,

    /// Current playback state.
    pub state: FollowerState,

    /// Current path offset: integer part is the segment, fraction the
    /// position within it.
    pub current_offset: f32,

    /// Direction of travel: -1.0, 0.0 or 1.0.
    pub direction: f32,

    /// The lookahead target currently steered toward.
    pub movement_target: Vec3,

    /// Gravity scale cached while following, restored on stop/finish.
    #[reflect(ignore)]
    pub(crate) gravity_cache: Option<f32>,

    /// One-shot warning flags for configuration errors.
    #[reflect(ignore)]
    pub(crate) warned_missing_trajectory: bool,
    #[reflect(ignore)]
    pub(crate) warned_missing_body: bool,
}

impl Default for TrajectoryFollower {
    fn default() -> Self {
        Self {
            trajectory: Entity::PLACEHOLDER,
            speed: 1.0,
            lookahead: 0.1,
            autostart: true,
            start_delay: 0.0,
            ignore_physics: false,
            start_policy: StartPolicy::Restart,
            state: FollowerState::Idle,
            current_offset: 0.0,
            direction: 0.0,
            movement_target: Vec3::ZERO,
            gravity_cache: None,
            warned_missing_trajectory: false,
            warned_missing_body: false,
        }
    }
}

impl TrajectoryFollower {
    /// Create a follower for the given trajectory entity.
    pub fn new(trajectory: Entity) -> Self {
        Self {
            trajectory,
            ..default()
        }
    }

    /// Set the movement speed in units per second.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the lookahead step size.
    pub fn with_lookahead(mut self, lookahead: f32) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Enable or disable autostart.
    pub fn with_autostart(mut self, autostart: bool) -> Self {
        self.autostart = autostart;
        self
    }

    /// Delay an autostart by the given number of seconds.
    pub fn with_start_delay(mut self, delay: f32) -> Self {
        self.start_delay = delay;
        self
    }

    /// Bypass the physics body and write positions to the transform.
    pub fn with_ignore_physics(mut self, ignore: bool) -> Self {
        self.ignore_physics = ignore;
        self
    }

    /// Set the start policy.
    pub fn with_start_policy(mut self, policy: StartPolicy) -> Self {
        self.start_policy = policy;
        self
    }

    /// Set the initial path offset. Only meaningful together with
    /// [`StartPolicy::Resume`]; a restart overwrites it.
    pub fn with_start_offset(mut self, offset: f32) -> Self {
        self.current_offset = offset;
        self
    }

    /// Whether the follower is currently running.
    pub fn is_running(&self) -> bool {
        self.state == FollowerState::Running
    }

    /// Whether the follower has reached a path boundary.
    pub fn is_finished(&self) -> bool {
        self.state == FollowerState::Finished
    }

    /// Begin (or resume) moving along the trajectory.
    ///
    /// Under [`StartPolicy::Restart`] the offset resets to one lookahead step
    /// past the path start; under [`StartPolicy::Resume`] it is kept.
    pub fn start(&mut self, trajectory: &Trajectory) {
        if self.state == FollowerState::Running {
            return;
        }
        if self.start_policy == StartPolicy::Restart {
            self.current_offset = self.lookahead;
        }
        self.direction = travel_direction(self.speed);
        self.movement_target = trajectory.sample_at(self.current_offset);
        self.state = FollowerState::Running;
    }

    /// Stop moving. The offset is kept for a later resume.
    pub fn stop(&mut self) {
        self.state = FollowerState::Idle;
    }

    /// Proportion of the trajectory traveled so far, clamped to [0, 1].
    pub fn traveled_proportion(&self, trajectory: &Trajectory) -> f32 {
        (self.current_offset / (trajectory.point_count() as f32 + 1.0)).clamp(0.0, 1.0)
    }

    /// Advance the follower by one simulation step.
    ///
    /// `dt` is the elapsed time of the fixed tick and `position` the
    /// follower's current world position. Pure over the trajectory: only the
    /// follower's own state mutates. Not running is a no-op.
    pub fn step(&mut self, dt: f32, position: Vec3, trajectory: &Trajectory) -> StepResult {
        if self.state != FollowerState::Running {
            return StepResult {
                position,
                running: false,
            };
        }

        let dir = travel_direction(self.speed);
        if dir == 0.0 {
            // Zero speed never consumes the travel budget; hold in place.
            return StepResult {
                position,
                running: true,
            };
        }

        if dir != self.direction {
            // Re-anchor the lookahead target immediately on reversal so the
            // follower does not keep steering toward a stale target.
            self.direction = dir;
            self.current_offset += self.lookahead * dir;
            self.movement_target = trajectory.sample_at(self.current_offset);
        }

        let travel = dt * self.speed.abs() * trajectory.speed_modifier_at(self.current_offset);
        let mut distance = position.distance(self.movement_target);

        // Walk the lookahead chain until this tick's travel budget no longer
        // covers the gap to the current target.
        while travel >= distance {
            self.current_offset += self.lookahead * dir;
            self.movement_target = trajectory.sample_at(self.current_offset);
            distance = position.distance(self.movement_target);

            if trajectory.is_past_end(self.current_offset) {
                self.current_offset = trajectory.last_index() as f32;
                self.movement_target = trajectory.end_position();
                distance = position.distance(self.movement_target);
                break;
            }
            if trajectory.is_before_start(self.current_offset) {
                self.current_offset = 0.0;
                self.movement_target = trajectory.start_position();
                distance = position.distance(self.movement_target);
                break;
            }
        }

        // Arrival: at a boundary in the direction of travel, with the
        // remaining gap coverable this tick, land exactly on the boundary.
        let at_boundary = (dir > 0.0 && self.current_offset >= trajectory.last_index() as f32)
            || (dir < 0.0 && self.current_offset <= 0.0);
        if at_boundary && distance <= travel + self.lookahead * 0.25 {
            self.state = FollowerState::Finished;
            return StepResult {
                position: self.movement_target,
                running: false,
            };
        }

        let to_target = self.movement_target - position;
        let new_position = if to_target.length_squared() > 0.0 {
            position + to_target.normalize() * travel
        } else {
            // Target coincides with the current position; skip the
            // displacement rather than normalize a zero-length vector.
            position
        };

        StepResult {
            position: new_position,
            running: true,
        }
    }
}

fn travel_direction(speed: f32) -> f32 {
    if speed > 0.0 {
        1.0
    } else if speed < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Deferred start for a follower with a start delay.
///
/// Removing this component before the timer fires cancels the pending start.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PendingStart(pub Timer);

impl PendingStart {
    /// Schedule a start after the given delay in seconds.
    pub fn after(delay: f32) -> Self {
        Self(Timer::from_seconds(delay, TimerMode::Once))
    }
}

/// What an input binding does to a follower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum FollowerAction {
    /// Start moving (also cancels a pending delayed start and re-arms it).
    Start,
    /// Stop moving and cancel any pending start.
    Stop,
    /// Start when idle or finished, stop when running.
    Toggle,
}

/// Configurable input triggers toggling a follower.
///
/// Each binding maps a key to a [`FollowerAction`]. The default binds Space
/// to toggle.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct FollowerControls {
    /// Key-to-action bindings, checked in order every frame.
    pub bindings: Vec<(KeyCode, FollowerAction)>,
}

impl Default for FollowerControls {
    fn default() -> Self {
        Self {
            bindings: vec![(KeyCode::Space, FollowerAction::Toggle)],
        }
    }
}

/// Message emitted when a follower changes playback state.
#[derive(Message, Debug, Clone)]
pub struct FollowerEvent {
    /// The entity with the [`TrajectoryFollower`] component.
    pub entity: Entity,
    /// The kind of state change.
    pub kind: FollowerEventKind,
}

/// Kinds of follower state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowerEventKind {
    /// The follower started or resumed moving.
    Started,
    /// The follower was stopped.
    Stopped,
    /// The follower reached a path boundary.
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Trajectory {
        Trajectory::new((0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect())
    }

    fn follower() -> TrajectoryFollower {
        TrajectoryFollower::default().with_ignore_physics(true)
    }

    #[test]
    fn test_reaches_end_in_expected_steps() {
        // 4 collinear points 1 unit apart, 1 unit/sec, 0.1 sec ticks: the
        // 3-unit path is covered in 3 simulated seconds.
        let trajectory = line(4);
        let mut follower = follower().with_speed(1.0);
        follower.start(&trajectory);

        let mut position = Vec3::ZERO;
        let mut running = true;
        for _ in 0..30 {
            let result = follower.step(0.1, position, &trajectory);
            position = result.position;
            running = result.running;
        }

        assert!((position - trajectory.end_position()).length() < 1e-4);
        assert!(!running);
        assert!(follower.is_finished());
    }

    #[test]
    fn test_zero_dt_is_a_no_op() {
        let trajectory = line(4);
        let mut follower = follower().with_speed(1.0);
        follower.start(&trajectory);
        let offset_before = follower.current_offset;

        let result = follower.step(0.0, Vec3::ZERO, &trajectory);

        assert_eq!(result.position, Vec3::ZERO);
        assert!(result.running);
        assert_eq!(follower.current_offset, offset_before);
    }

    #[test]
    fn test_zero_speed_holds_in_place() {
        let trajectory = line(4);
        let mut follower = follower().with_speed(1.0);
        follower.start(&trajectory);
        follower.speed = 0.0;

        let result = follower.step(0.1, Vec3::ZERO, &trajectory);

        assert_eq!(result.position, Vec3::ZERO);
        assert!(result.running);
    }

    #[test]
    fn test_reversal_reanchors_lookahead() {
        let trajectory = line(4);
        let mut follower = follower().with_speed(1.0);
        follower.start(&trajectory);
        let offset_before = follower.current_offset;

        // Reverse before the next step; with dt = 0 the chain walk does not
        // run, so only the re-anchoring is observed.
        follower.speed = -1.0;
        follower.step(0.0, Vec3::new(0.1, 0.0, 0.0), &trajectory);

        assert_eq!(follower.direction, -1.0);
        assert!((follower.current_offset - (offset_before - follower.lookahead)).abs() < 1e-6);
    }

    #[test]
    fn test_backward_travel_finishes_at_start() {
        let trajectory = line(4);
        let mut follower = follower()
            .with_speed(-1.0)
            .with_start_policy(StartPolicy::Resume);
        follower.current_offset = 2.0;
        follower.start(&trajectory);

        let mut position = Vec3::new(2.0, 0.0, 0.0);
        let mut running = true;
        for _ in 0..25 {
            let result = follower.step(0.1, position, &trajectory);
            position = result.position;
            running = result.running;
        }

        assert!((position - trajectory.start_position()).length() < 1e-4);
        assert!(!running);
    }

    #[test]
    fn test_not_running_is_a_no_op() {
        let trajectory = line(4);
        let mut follower = follower();
        let result = follower.step(0.1, Vec3::ONE, &trajectory);
        assert_eq!(result.position, Vec3::ONE);
        assert!(!result.running);
    }

    #[test]
    fn test_start_policies() {
        let trajectory = line(4);

        let mut restart = follower().with_speed(1.0);
        restart.current_offset = 1.7;
        restart.start(&trajectory);
        assert!((restart.current_offset - restart.lookahead).abs() < 1e-6);

        let mut resume = follower()
            .with_speed(1.0)
            .with_start_policy(StartPolicy::Resume);
        resume.current_offset = 1.7;
        resume.start(&trajectory);
        assert!((resume.current_offset - 1.7).abs() < 1e-6);
    }

    #[test]
    fn test_speed_modifier_scales_travel() {
        let trajectory = line(4).with_speed_modifiers(vec![2.0]);
        let mut follower = follower().with_speed(1.0);
        follower.start(&trajectory);

        let result = follower.step(0.01, Vec3::ZERO, &trajectory);

        // Travel distance doubled by the first segment's modifier.
        assert!((result.position.x - 0.02).abs() < 1e-5);
    }

    #[test]
    fn test_traveled_proportion_is_clamped() {
        let trajectory = line(4);
        let mut follower = follower();
        assert_eq!(follower.traveled_proportion(&trajectory), 0.0);

        follower.current_offset = -1.0;
        assert_eq!(follower.traveled_proportion(&trajectory), 0.0);

        follower.current_offset = 2.5;
        let proportion = follower.traveled_proportion(&trajectory);
        assert!(proportion > 0.0 && proportion <= 1.0);

        follower.current_offset = 100.0;
        assert_eq!(follower.traveled_proportion(&trajectory), 1.0);
    }

    #[test]
    fn test_high_speed_does_not_overshoot_the_end() {
        let trajectory = line(4);
        let mut follower = follower().with_speed(100.0);
        follower.start(&trajectory);

        let result = follower.step(0.1, Vec3::ZERO, &trajectory);

        // One tick's travel budget exceeds the whole path; the chain walk
        // must stop at the end boundary instead of jumping past it.
        assert_eq!(result.position, trajectory.end_position());
        assert!(!result.running);
    }
}
