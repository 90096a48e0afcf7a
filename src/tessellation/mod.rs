mod tessellate_curve;
mod tessellate_spline;

pub use tessellate_curve::{
    arc_to_polyline, ellipse_arc_to_polyline, get_bezier_curve_points, get_geometry_line_points,
    get_geometry_lines_points, get_hyperbola_points, get_nurbs_points, get_quadratic_curve_points,
};
pub use tessellate_spline::{get_bezier_spline_curves, get_bezier_spline_points};

/// Parameters controlling tessellation quality.
#[derive(Debug, Clone, Copy)]
pub struct TessellationParams {
    /// Maximum allowed distance between a chord and the curve it replaces.
    pub tolerance: f64,
    /// Minimum number of segments per curve.
    pub min_segments: usize,
    /// Maximum number of segments per curve.
    pub max_segments: usize,
    /// Largest angle in degrees a single chord of an arc or ellipse arc may span.
    pub angle_delta: f64,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            min_segments: 4,
            max_segments: 256,
            angle_delta: 5.0,
        }
    }
}

impl TessellationParams {
    /// Clamps a raw segment estimate to `[min_segments, max_segments]`.
    ///
    /// Non-finite estimates saturate at `max_segments`.
    #[must_use]
    pub fn segment_count(&self, raw: f64) -> usize {
        let max = self.max_segments.max(1);
        let min = self.min_segments.clamp(1, max);
        if !raw.is_finite() {
            return max;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_precision_loss,
            clippy::cast_sign_loss
        )]
        let count = raw.max(0.0).ceil().min(max as f64) as usize;
        count.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_count_clamps() {
        let params = TessellationParams::default();
        assert_eq!(params.segment_count(0.2), 4);
        assert_eq!(params.segment_count(10.1), 11);
        assert_eq!(params.segment_count(1e9), 256);
        assert_eq!(params.segment_count(f64::INFINITY), 256);
        assert_eq!(params.segment_count(f64::NAN), 256);
    }

    #[test]
    fn inverted_bounds_do_not_panic() {
        let params = TessellationParams {
            min_segments: 10,
            max_segments: 3,
            ..TessellationParams::default()
        };
        assert_eq!(params.segment_count(1.0), 3);
    }
}
