use std::f32::consts::PI;

use glam::Vec2;

/// Distances at or below this are treated as coincident agents.
pub const COINCIDENT_EPSILON: f32 = 1e-6;

#[inline]
pub fn lerp(source: f32, target: f32, amount: f32) -> f32 {
    source + (target - source) * amount
}

/// Frame rate independent lerp.
///
/// `smoothing` is the fraction of the distance to `target` still left after
/// one unit of time, so the result converges at the same rate whatever the
/// frame rate is. ref: https://www.rorydriscoll.com/2016/03/07/frame-rate-independent-damping-using-lerp/
#[inline]
pub fn damp(source: f32, target: f32, smoothing: f32, delta: f32) -> f32 {
    lerp(source, target, 1. - smoothing.powf(delta))
}

/// [`damp`] applied per axis.
#[inline]
pub fn damp_vec(source: Vec2, target: Vec2, smoothing: f32, delta: f32) -> Vec2 {
    Vec2::new(
        damp(source.x, target.x, smoothing, delta),
        damp(source.y, target.y, smoothing, delta),
    )
}

/// Wraps `value` into `[min, max)`, keeping the overshoot.
///
/// Values already inside the range are returned untouched.
pub fn wrap(value: f32, min: f32, max: f32) -> f32 {
    let range = max - min;
    if (min..max).contains(&value) || range <= 0. {
        return value;
    }

    let wrapped = value - range * ((value - min) / range).floor();

    // rounding can land exactly on the excluded upper bound
    if wrapped >= max || wrapped < min {
        min
    } else {
        wrapped
    }
}

/// Unit vector in the direction of `v`, `None` for a zero (or non-finite) vector.
#[inline]
pub fn normalize_or_none(v: Vec2) -> Option<Vec2> {
    let length = v.length();
    if length > 0. && length.is_finite() {
        let unit = v / length;
        if unit.is_finite() {
            return Some(unit);
        }
    }
    None
}

/// Places a hue (degrees) on the unit circle.
#[inline]
pub fn hue_to_unit(hue: f32) -> Vec2 {
    let angle = hue / 180. * PI;
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of `v` as a hue in degrees `[0, 360)`, `None` when `v` has no direction.
pub fn unit_to_hue(v: Vec2) -> Option<f32> {
    if v.length_squared() <= 0. || !v.is_finite() {
        return None;
    }

    let hue = (v.y.atan2(v.x) * 180. / PI).rem_euclid(360.);
    if hue >= 360. {
        Some(0.)
    } else {
        Some(hue)
    }
}

// because of the glam version pin there is no rotate by angle on Vec2
pub(crate) trait Rotate2 {
    fn rotated(&self, angle: f32) -> Self;
}

impl Rotate2 for Vec2 {
    #[inline]
    fn rotated(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.y * cos + self.x * sin)
    }
}
