use serde::{Deserialize, Serialize};

use crate::utils::GliderError;

/// A single `(x, y)` control point of a [`Curve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub x: f64,
    pub y: f64,
}

/// Piecewise-linear lookup table used for aerodynamic coefficients.
///
/// Keys are kept sorted by `x`. Evaluation outside the keyed range clamps to
/// the first/last value; an empty curve evaluates to 0 and NaN maps to NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f64, f64)>", into = "Vec<(f64, f64)>")]
pub struct Curve {
    keys: Vec<Keyframe>,
}

impl Curve {
    pub fn new(points: &[(f64, f64)]) -> Result<Self, GliderError> {
        if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(GliderError::InvalidConfig(
                "curve keys must be finite".to_string(),
            ));
        }

        let mut keys: Vec<Keyframe> = points.iter().map(|&(x, y)| Keyframe { x, y }).collect();
        keys.sort_by(|a, b| a.x.total_cmp(&b.x));
        keys.dedup_by(|b, a| a.x == b.x);

        Ok(Self { keys })
    }

    pub fn constant(value: f64) -> Self {
        Self {
            keys: vec![Keyframe { x: 0.0, y: value }],
        }
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if x.is_nan() {
            return f64::NAN;
        }

        if x <= first.x {
            return first.y;
        }
        if x >= last.x {
            return last.y;
        }

        // First key strictly right of x; guaranteed to be in 1..len here.
        let upper = self.keys.partition_point(|k| k.x <= x);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];
        let t = (x - a.x) / (b.x - a.x);

        a.y + (b.y - a.y) * t
    }

    /// Lift coefficient curve of the stock glider wing (degrees -> C_L).
    pub fn glider_lift() -> Self {
        Self::from_static(&[
            (-90.0, 0.0),
            (-30.0, -0.6),
            (-15.0, -0.9),
            (0.0, 0.25),
            (8.0, 1.0),
            (15.0, 1.35),
            (20.0, 1.1),
            (35.0, 0.7),
            (90.0, 0.0),
        ])
    }

    /// Profile drag coefficient curve of the stock glider wing (degrees -> C_D).
    pub fn glider_drag() -> Self {
        Self::from_static(&[
            (-90.0, 1.2),
            (-20.0, 0.25),
            (0.0, 0.02),
            (10.0, 0.06),
            (20.0, 0.22),
            (45.0, 0.8),
            (90.0, 1.2),
        ])
    }

    fn from_static(points: &[(f64, f64)]) -> Self {
        Self {
            keys: points.iter().map(|&(x, y)| Keyframe { x, y }).collect(),
        }
    }
}

impl TryFrom<Vec<(f64, f64)>> for Curve {
    type Error = GliderError;

    fn try_from(points: Vec<(f64, f64)>) -> Result<Self, Self::Error> {
        Curve::new(&points)
    }
}

impl From<Curve> for Vec<(f64, f64)> {
    fn from(curve: Curve) -> Self {
        curve.keys.into_iter().map(|k| (k.x, k.y)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_interpolation_and_clamping() {
        let curve = Curve::new(&[(10.0, 1.0), (0.0, 0.0), (20.0, 0.0)]).unwrap();

        assert_relative_eq!(curve.evaluate(5.0), 0.5);
        assert_relative_eq!(curve.evaluate(15.0), 0.5);
        assert_relative_eq!(curve.evaluate(10.0), 1.0);
        assert_relative_eq!(curve.evaluate(-100.0), 0.0);
        assert_relative_eq!(curve.evaluate(100.0), 0.0);
    }

    #[test]
    fn test_constant_and_empty() {
        assert_relative_eq!(Curve::constant(0.8).evaluate(-45.0), 0.8);
        assert_relative_eq!(Curve::constant(0.8).evaluate(45.0), 0.8);
        assert_relative_eq!(Curve::new(&[]).unwrap().evaluate(3.0), 0.0);
    }

    #[test]
    fn test_nan_input_propagates() {
        assert!(Curve::glider_lift().evaluate(f64::NAN).is_nan());
        assert!(Curve::glider_drag().evaluate(f64::NAN).is_nan());
        assert_relative_eq!(Curve::new(&[]).unwrap().evaluate(f64::NAN), 0.0);
    }

    #[test]
    fn test_rejects_non_finite_keys() {
        assert!(Curve::new(&[(0.0, f64::NAN)]).is_err());
    }

    #[test]
    fn test_yaml_shape() {
        let curve: Curve = serde_yaml::from_str("[[0.0, 0.0], [10.0, 1.0]]").unwrap();
        assert_relative_eq!(curve.evaluate(2.5), 0.25);

        let text = serde_yaml::to_string(&curve).unwrap();
        let back: Curve = serde_yaml::from_str(&text).unwrap();
        assert_eq!(curve, back);
    }

    #[test]
    fn test_stock_lift_curve_peaks_at_fifteen_degrees() {
        let curve = Curve::glider_lift();
        assert!(curve.evaluate(15.0) > curve.evaluate(14.0));
        assert!(curve.evaluate(15.0) > curve.evaluate(16.0));
    }
}
