use crate::math::{is_same_number, less_or_equal_with, DELTA2};

/// A range of angles in degrees.
///
/// With `counterclockwise == false` the angle grows from `start_angle` to
/// `end_angle`; otherwise it shrinks. In y-down screen space, growing angles
/// appear clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRange {
    pub start_angle: f64,
    pub end_angle: f64,
    pub counterclockwise: bool,
}

impl AngleRange {
    #[must_use]
    pub fn new(start_angle: f64, end_angle: f64, counterclockwise: bool) -> Self {
        Self {
            start_angle,
            end_angle,
            counterclockwise,
        }
    }

    /// The whole circle, starting at 0°.
    #[must_use]
    pub fn full() -> Self {
        Self::new(0.0, 360.0, false)
    }

    /// `1.0` when the angle grows along the range, `-1.0` otherwise.
    #[must_use]
    pub fn direction(&self) -> f64 {
        if self.counterclockwise {
            -1.0
        } else {
            1.0
        }
    }

    /// Swept angle in `(0, 360]`, or `0` for a degenerate range.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        if is_same_number(self.start_angle, self.end_angle) {
            return 0.0;
        }
        let raw = (self.end_angle - self.start_angle) * self.direction();
        let sweep = raw.rem_euclid(360.0);
        if is_same_number(sweep, 0.0) || is_same_number(sweep, 360.0) {
            360.0
        } else {
            sweep
        }
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.sweep() == 0.0
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        is_same_number(self.sweep(), 360.0)
    }

    /// End angle rewritten so that `end - start` carries the signed sweep.
    #[must_use]
    pub fn formatted_end_angle(&self) -> f64 {
        self.start_angle + self.direction() * self.sweep()
    }

    /// Angle reached at fraction `param` of the sweep. Params outside `[0, 1]`
    /// extend the range.
    #[must_use]
    pub fn angle_at_param(&self, param: f64) -> f64 {
        self.start_angle + self.direction() * self.sweep() * param
    }

    /// Fraction of the sweep at which `angle` is reached.
    ///
    /// Angles outside the range map below 0 or above 1, whichever side is
    /// closer. A degenerate range maps everything to 0.
    #[must_use]
    pub fn param_at_angle(&self, angle: f64) -> f64 {
        let sweep = self.sweep();
        if sweep == 0.0 {
            return 0.0;
        }
        let relative = ((angle - self.start_angle) * self.direction()).rem_euclid(360.0);
        if less_or_equal_with(relative, sweep, 1e-10) {
            return relative / sweep;
        }
        if is_same_number(relative, 360.0) {
            return 0.0;
        }
        let after = relative / sweep;
        let before = (relative - 360.0) / sweep;
        if after - 1.0 <= -before {
            after
        } else {
            before
        }
    }

    /// The same range traversed the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end_angle, self.start_angle, !self.counterclockwise)
    }
}

/// Normalizes an angle into `[0, 360)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if is_same_number(a, 360.0) {
        0.0
    } else {
        a
    }
}

/// Rewrites `angle` (mod 360) so that it is measured from the start of `range`
/// along its direction, i.e. `start + direction * k` with `k` in `[0, 360)`.
#[must_use]
pub fn get_angle_in_range(angle: f64, range: &AngleRange) -> f64 {
    let relative = ((angle - range.start_angle) * range.direction()).rem_euclid(360.0);
    range.start_angle + range.direction() * relative
}

/// Whether `angle` lies inside `range`, endpoints included within [`DELTA2`].
#[must_use]
pub fn angle_in_range(angle: f64, range: &AngleRange) -> bool {
    angle_in_range_with(angle, range, DELTA2)
}

/// Whether `angle` lies inside `range`, endpoints included within `delta` degrees.
#[must_use]
pub fn angle_in_range_with(angle: f64, range: &AngleRange, delta: f64) -> bool {
    if angle.is_nan() {
        return false;
    }
    let sweep = range.sweep();
    let relative = ((angle - range.start_angle) * range.direction()).rem_euclid(360.0);
    relative <= sweep + delta || relative >= 360.0 - delta
}

/// Joins two ranges running the same way when one ends where the other starts.
///
/// The joined sweep is capped at a full turn.
#[must_use]
pub fn merge_angle_ranges(a: &AngleRange, b: &AngleRange) -> Option<AngleRange> {
    if a.counterclockwise != b.counterclockwise || a.is_degenerate() || b.is_degenerate() {
        return None;
    }
    let (first, second) = if angles_coincide(a.end_angle, b.start_angle) {
        (a, b)
    } else if angles_coincide(b.end_angle, a.start_angle) {
        (b, a)
    } else {
        return None;
    };
    let sweep = (first.sweep() + second.sweep()).min(360.0);
    Some(AngleRange::new(
        first.start_angle,
        first.start_angle + first.direction() * sweep,
        first.counterclockwise,
    ))
}

/// Two angles denote the same direction.
#[must_use]
pub fn angles_coincide(a: f64, b: f64) -> bool {
    let d = (a - b).rem_euclid(360.0);
    is_same_number(d, 0.0) || is_same_number(d, 360.0)
}

/// Whether the range spans more than half a turn (SVG large-arc flag).
#[must_use]
pub fn is_large_angle_range(range: &AngleRange) -> bool {
    range.sweep() > 180.0
}
