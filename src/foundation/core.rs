pub use kurbo::Point;

/// Lower bound of the timeline percent scale.
pub const PERCENT_MIN: f64 = 0.0;
/// Upper bound of the timeline percent scale.
pub const PERCENT_MAX: f64 = 100.0;
/// Two keyframe times closer than this are the same time.
pub const KEY_EPSILON: f64 = 1e-9;

/// Interpolation contract for timeline value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(
            <f64 as Lerp>::lerp(&a.x, &b.x, t),
            <f64 as Lerp>::lerp(&a.y, &b.y, t),
        )
    }
}

/// Clamp `v` onto `[PERCENT_MIN, PERCENT_MAX]`.
pub fn clamp_percent(v: f64) -> f64 {
    v.clamp(PERCENT_MIN, PERCENT_MAX)
}

pub(crate) fn same_time(a: f64, b: f64) -> bool {
    (a - b).abs() < KEY_EPSILON
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
