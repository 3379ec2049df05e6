use bevy::prelude::*;

/// How positions between trajectory points are interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Default)]
pub enum Interpolation {
    /// Straight line segments between points (C⁰ continuity).
    #[default]
    Linear,
    /// Cubic Hermite spline through all points with central-difference
    /// tangents (C¹ continuity).
    Hermite,
}

impl Interpolation {
    /// Cycle to the next interpolation method.
    pub fn next(self) -> Self {
        match self {
            Self::Linear => Self::Hermite,
            Self::Hermite => Self::Linear,
        }
    }

    /// Get the display name for this interpolation method.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::Hermite => "Hermite",
        }
    }

    /// Interpolate within segment `segment` of `points` at fraction `t` in [0, 1).
    ///
    /// The caller guarantees `segment + 1 < points.len()`.
    pub fn sample_segment(&self, points: &[Vec3], segment: usize, t: f32) -> Vec3 {
        match self {
            Self::Linear => points[segment].lerp(points[segment + 1], t),
            Self::Hermite => hermite_segment(points, segment, t),
        }
    }
}

/// Split a path offset into its segment index and in-segment fraction.
///
/// The segment index is the floor of the offset and may be negative or past
/// the last segment; callers clamp as needed.
pub fn split_offset(offset: f32) -> (i64, f32) {
    let segment = offset.floor();
    (segment as i64, offset - segment)
}

/// Cubic Hermite interpolation within one segment.
///
/// Tangents are estimated by central differences over the neighboring points,
/// with neighbor indices clamped to the sequence bounds so the end segments
/// fall back to one-sided differences.
fn hermite_segment(points: &[Vec3], segment: usize, t: f32) -> Vec3 {
    let p0 = points[segment];
    let p1 = points[segment + 1];
    let prev = points[segment.saturating_sub(1)];
    let next = points[(segment + 2).min(points.len() - 1)];

    let m0 = (p1 - prev) * 0.5;
    let m1 = (next - p0) * 0.5;

    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    p0 * h00 + m0 * h10 + p1 * h01 + m1 * h11
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_offset() {
        assert_eq!(split_offset(0.0), (0, 0.0));
        assert_eq!(split_offset(2.25), (2, 0.25));

        let (segment, frac) = split_offset(-0.5);
        assert_eq!(segment, -1);
        assert!((frac - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_linear_midpoint() {
        let points = [Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0)];
        let mid = Interpolation::Linear.sample_segment(&points, 0, 0.5);
        assert!((mid - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn test_hermite_endpoint_interpolation() {
        let points = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(2.0, -1.0, 1.0),
            Vec3::new(3.0, 0.0, 0.0),
        ];

        // The curve passes through the segment endpoints exactly.
        for segment in 0..3 {
            let start = Interpolation::Hermite.sample_segment(&points, segment, 0.0);
            assert!((start - points[segment]).length() < 1e-5);

            let near_end = Interpolation::Hermite.sample_segment(&points, segment, 0.9999);
            assert!((near_end - points[segment + 1]).length() < 1e-2);
        }
    }

    #[test]
    fn test_hermite_matches_linear_on_collinear_points() {
        let points: Vec<Vec3> = (0..4).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();

        // Equally spaced collinear points have tangents equal to the segment
        // direction, which degenerates Hermite to the straight line.
        for t in [0.25, 0.5, 0.75] {
            let hermite = Interpolation::Hermite.sample_segment(&points, 1, t);
            let linear = Interpolation::Linear.sample_segment(&points, 1, t);
            assert!((hermite - linear).length() < 1e-5);
        }
    }
}
