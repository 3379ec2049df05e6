use bevy::prelude::*;

use super::types::{split_offset, Interpolation};

/// A 3D trajectory component describing a path through an ordered sequence of
/// waypoints, with an optional anchor prepended and an optional goal appended.
///
/// Positions along the path are addressed by a scalar offset: the integer part
/// selects a segment, the fractional part the position within it. Offsets
/// outside the path clamp to the start or end point.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Trajectory {
    /// Start anchor, typically the owning entity's position at build time.
    pub anchor: Option<Vec3>,
    /// Interior waypoints, in travel order.
    pub waypoints: Vec<Vec3>,
    /// Explicit goal position. If absent, the last waypoint is the goal.
    pub goal: Option<Vec3>,
    /// How positions between points are interpolated.
    pub interpolation: Interpolation,
    /// Per-segment speed multipliers. Segments without an entry use 1.0.
    pub speed_modifiers: Vec<f32>,
    /// The assembled point sequence. Derived from the fields above by
    /// [`Trajectory::rebuild`]; never written directly.
    #[reflect(ignore)]
    points: Vec<Vec3>,
}

impl Trajectory {
    /// Create a trajectory from waypoints.
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        let mut trajectory = Self {
            waypoints,
            ..default()
        };
        trajectory.rebuild();
        trajectory
    }

    /// Set the start anchor.
    pub fn with_anchor(mut self, anchor: Vec3) -> Self {
        self.anchor = Some(anchor);
        self.rebuild();
        self
    }

    /// Set an explicit goal position.
    pub fn with_goal(mut self, goal: Vec3) -> Self {
        self.goal = Some(goal);
        self.rebuild();
        self
    }

    /// Set the interpolation method.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Set per-segment speed multipliers.
    pub fn with_speed_modifiers(mut self, modifiers: Vec<f32>) -> Self {
        self.speed_modifiers = modifiers;
        self
    }

    /// Reassemble the point sequence from anchor, waypoints and goal.
    ///
    /// Idempotent for unchanged inputs, callable at any time. An empty result
    /// is valid; sampling then returns the origin.
    pub fn rebuild(&mut self) {
        self.points.clear();
        if let Some(anchor) = self.anchor {
            self.points.push(anchor);
        }
        self.points.extend_from_slice(&self.waypoints);
        if let Some(goal) = self.goal {
            self.points.push(goal);
        }
    }

    /// The assembled point sequence.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Number of points in the assembled sequence.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Offset of the last point (0 for empty or single-point paths).
    pub fn last_index(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Sample the position at a path offset.
    ///
    /// Offsets before the start return the first point, offsets past the end
    /// the last point. With fewer than two points the single available point
    /// (or the origin) is returned.
    pub fn sample_at(&self, offset: f32) -> Vec3 {
        let len = self.points.len();
        if len == 0 {
            return Vec3::ZERO;
        }
        if len == 1 {
            return self.points[0];
        }

        let (segment, frac) = split_offset(offset);
        if segment < 0 {
            self.points[0]
        } else if segment > len as i64 - 2 {
            self.points[len - 1]
        } else {
            self.interpolation
                .sample_segment(&self.points, segment as usize, frac)
        }
    }

    /// Whether the offset lies before the path start.
    pub fn is_before_start(&self, offset: f32) -> bool {
        offset < 0.0
    }

    /// Whether the offset lies past the path end.
    pub fn is_past_end(&self, offset: f32) -> bool {
        let (segment, _) = split_offset(offset);
        segment > self.last_index() as i64 - 1
    }

    /// Position of the path start.
    pub fn start_position(&self) -> Vec3 {
        self.sample_at(0.0)
    }

    /// Position of the path end.
    pub fn end_position(&self) -> Vec3 {
        self.sample_at(self.last_index() as f32)
    }

    /// Speed multiplier for the segment containing the offset (1.0 when the
    /// segment has no entry).
    pub fn speed_modifier_at(&self, offset: f32) -> f32 {
        let (segment, _) = split_offset(offset);
        let clamped = segment.clamp(0, self.last_index().saturating_sub(1) as i64) as usize;
        self.speed_modifiers.get(clamped).copied().unwrap_or(1.0)
    }

    /// Lazily sample the path at a fixed offset step, for visualization.
    ///
    /// The sequence is finite, always includes the end point, and does not
    /// mutate the trajectory.
    pub fn polyline(&self, step: f32) -> impl Iterator<Item = Vec3> + '_ {
        let step = step.max(1e-3);
        let end = self.last_index() as f32;
        let interior = if self.points.len() < 2 {
            0
        } else {
            (end / step).ceil() as usize
        };
        // Interior samples stay strictly before the end offset, the end point
        // is appended exactly once. Rounding in `i * step` can otherwise land
        // the last interior sample on the end point as well.
        let tail = if self.points.is_empty() {
            None
        } else {
            Some(self.end_position())
        };
        (0..interior)
            .map(move |i| i as f32 * step)
            .take_while(move |offset| *offset < end)
            .map(move |offset| self.sample_at(offset))
            .chain(tail)
    }

    /// Append a waypoint.
    pub fn add_waypoint(&mut self, position: Vec3) {
        self.waypoints.push(position);
        self.rebuild();
    }

    /// Insert a waypoint at the given index.
    pub fn insert_waypoint(&mut self, index: usize, position: Vec3) {
        if index <= self.waypoints.len() {
            self.waypoints.insert(index, position);
            self.rebuild();
        }
    }

    /// Remove the waypoint at the given index.
    pub fn remove_waypoint(&mut self, index: usize) -> Option<Vec3> {
        if index < self.waypoints.len() {
            let removed = self.waypoints.remove(index);
            self.rebuild();
            Some(removed)
        } else {
            None
        }
    }

    /// Move the waypoint at the given index.
    pub fn set_waypoint(&mut self, index: usize, position: Vec3) {
        if index < self.waypoints.len() {
            self.waypoints[index] = position;
            self.rebuild();
        }
    }

    /// Cycle to the next interpolation method.
    pub fn cycle_interpolation(&mut self) {
        self.interpolation = self.interpolation.next();
    }
}

/// Tracks another entity as the trajectory's goal.
///
/// A system copies the target's translation into [`Trajectory::goal`] every
/// frame, so a moving goal keeps the path current.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct TrajectoryGoal {
    /// The entity whose translation is the goal position.
    pub target: Entity,
}

/// Marker component identifying a waypoint handle entity.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct TrajectoryPointMarker {
    /// The entity that owns the trajectory.
    pub trajectory: Entity,
    /// The waypoint index this marker represents.
    pub index: usize,
}

/// Marker component for the currently selected trajectory.
#[derive(Component, Debug, Clone, Copy, Reflect, Default)]
#[reflect(Component)]
pub struct SelectedTrajectory;

/// Marker component for selected waypoint handles.
#[derive(Component, Debug, Clone, Copy, Reflect, Default)]
#[reflect(Component)]
pub struct SelectedTrajectoryPoint;

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Trajectory {
        Trajectory::new((0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect())
    }

    #[test]
    fn test_sample_clamps_before_start() {
        let trajectory = line(4);
        for offset in [-0.1, -1.0, -100.0] {
            assert_eq!(trajectory.sample_at(offset), trajectory.start_position());
            assert!(trajectory.is_before_start(offset));
        }
        assert!(!trajectory.is_before_start(0.0));
    }

    #[test]
    fn test_sample_clamps_past_end() {
        let trajectory = line(4);
        for offset in [3.0, 3.5, 42.0] {
            assert_eq!(trajectory.sample_at(offset), trajectory.end_position());
            assert!(trajectory.is_past_end(offset));
        }
        assert!(!trajectory.is_past_end(2.5));
    }

    #[test]
    fn test_linear_sample_midpoint() {
        let trajectory = Trajectory::new(vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)]);
        let mid = trajectory.sample_at(0.5);
        assert!((mid - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_degenerate_paths() {
        let empty = Trajectory::new(Vec::new());
        assert_eq!(empty.sample_at(0.5), Vec3::ZERO);
        assert_eq!(empty.polyline(0.1).count(), 0);

        let single = Trajectory::new(vec![Vec3::new(1.0, 2.0, 3.0)]);
        assert_eq!(single.sample_at(-1.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(single.sample_at(7.0), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_anchor_and_goal_ordering() {
        let trajectory = Trajectory::new(vec![Vec3::X, Vec3::new(2.0, 0.0, 0.0)])
            .with_anchor(Vec3::ZERO)
            .with_goal(Vec3::new(3.0, 0.0, 0.0));

        assert_eq!(trajectory.point_count(), 4);
        assert_eq!(trajectory.start_position(), Vec3::ZERO);
        assert_eq!(trajectory.end_position(), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let mut trajectory = line(4).with_anchor(Vec3::new(-1.0, 0.0, 0.0));
        let first = trajectory.points().to_vec();
        trajectory.rebuild();
        trajectory.rebuild();
        assert_eq!(trajectory.points(), first.as_slice());
    }

    #[test]
    fn test_polyline_is_finite_and_restartable() {
        let trajectory = line(4);
        let first: Vec<Vec3> = trajectory.polyline(0.5).collect();
        let second: Vec<Vec3> = trajectory.polyline(0.5).collect();

        assert_eq!(first, second);
        assert_eq!(first.first().copied(), Some(trajectory.start_position()));
        assert_eq!(first.last().copied(), Some(trajectory.end_position()));
        assert_eq!(first.len(), 7);
    }

    #[test]
    fn test_polyline_terminal_point_is_not_duplicated() {
        let trajectory = line(4);
        // 3.0 / 0.3 rounds just above 10 in f32, which used to emit the end
        // point twice: once from the clamped last interior sample, once from
        // the terminal sample.
        let points: Vec<Vec3> = trajectory.polyline(0.3).collect();
        assert_eq!(points.last().copied(), Some(trajectory.end_position()));
        assert_ne!(points[points.len() - 2], points[points.len() - 1]);
    }

    #[test]
    fn test_speed_modifier_lookup() {
        let trajectory = line(4).with_speed_modifiers(vec![1.0, 2.0]);
        assert_eq!(trajectory.speed_modifier_at(0.5), 1.0);
        assert_eq!(trajectory.speed_modifier_at(1.5), 2.0);
        // Segments without an entry fall back to 1.0.
        assert_eq!(trajectory.speed_modifier_at(2.5), 1.0);
    }
}
