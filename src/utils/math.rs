use nalgebra::Vector3;
use std::f64::consts::PI;

/// Convert radians to degrees
#[inline]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Linear interpolation between two values, with the factor clamped to [0, 1]
#[inline]
pub fn lerp(start: f64, end: f64, factor: f64) -> f64 {
    start + (end - start) * factor.clamp(0.0, 1.0)
}

#[inline]
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Wraps an angle once around `wrap_point` (degrees) and clamps it to `[min, max]`.
pub fn clamp_angle(mut angle: f64, min: f64, max: f64, wrap_point: f64) -> f64 {
    if angle < -wrap_point {
        angle += 360.0;
    }
    if angle > wrap_point {
        angle -= 360.0;
    }
    angle.clamp(min, max)
}

/// Signed angle in degrees from `v1` to `v2`, measured around `axis`.
///
/// The inputs are not normalised: the sign comes from the axis component of
/// `v1 x v2`, the magnitude from `atan2` against `v1 . v2`. Parallel inputs
/// (or a zero vector) give 0.
pub fn angle_around_axis(v1: &Vector3<f64>, v2: &Vector3<f64>, axis: &Vector3<f64>) -> f64 {
    rad_to_deg(axis.dot(&v1.cross(v2)).atan2(v1.dot(v2)))
}

/// Projection of `vector` onto the direction of `onto`. Zero if `onto` is degenerate.
pub fn project(vector: &Vector3<f64>, onto: &Vector3<f64>) -> Vector3<f64> {
    let sqr_len = onto.norm_squared();
    if sqr_len < f64::EPSILON {
        return Vector3::zeros();
    }
    onto * (vector.dot(onto) / sqr_len)
}

/// Unit vector in the direction of `vector`, or zero for (near) zero input.
pub fn normalize_or_zero(vector: &Vector3<f64>) -> Vector3<f64> {
    vector.try_normalize(1e-9).unwrap_or_else(Vector3::zeros)
}
