use serde::{
    Deserialize,
    Serialize
};

use crate::error::RiskError;
use crate::math::curve::curve::Curve;
use crate::math::curve::nonparametriccurve::nonparametriccurve::{
    NonparametricCurve,
    Point2D
};
use crate::math::curve::nonparametriccurve::piecewisepolynomial::{
    PiecewisePolynomial,
    PolynomialType
};

/// Coordinates in which the table is interpolated.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationSpace {
    #[default]
    Linear,
    /// ln y interpolated over ln x; hazard curves are close to straight lines
    /// in these coordinates.
    LogLog,
}

/// Table-driven curve: a piecewise polynomial in linear or log-log space.
pub struct InterpolatedCurve {
    polynomial: PiecewisePolynomial,
    space: InterpolationSpace,
}

impl InterpolatedCurve {
    pub fn new(
        xs: &[f64],
        ys: &[f64],
        polynomial_type: PolynomialType,
        space: InterpolationSpace,
    ) -> Result<InterpolatedCurve, RiskError> {
        if xs.len() != ys.len() {
            return Err(RiskError::ShapeMismatch {
                expected: xs.len(),
                found: ys.len(),
            });
        }
        let points: Vec<Point2D> = match space {
            InterpolationSpace::Linear => xs
                .iter()
                .zip(ys)
                .map(|(&x, &y)| Point2D::new(x, y))
                .collect(),
            InterpolationSpace::LogLog => {
                if xs.iter().chain(ys).any(|&v| !(v > 0.0)) {
                    return Err(RiskError::InvalidParameter(
                        "log-log interpolation needs positive intensities and values".to_owned(),
                    ));
                }
                xs.iter()
                    .zip(ys)
                    .map(|(&x, &y)| Point2D::new(x.ln(), y.ln()))
                    .collect()
            }
        };
        let polynomial = PiecewisePolynomial::new(polynomial_type, points).ok_or_else(|| {
            RiskError::InvalidParameter(
                "interpolation table needs at least two rows with strictly increasing, finite intensities"
                    .to_owned(),
            )
        })?;
        Ok(InterpolatedCurve { polynomial, space })
    }

    pub fn space(&self) -> InterpolationSpace {
        self.space
    }

    pub fn polynomial_type(&self) -> PolynomialType {
        self.polynomial.polynomial_type()
    }

    pub fn min_x(&self) -> f64 {
        match self.space {
            InterpolationSpace::Linear => self.polynomial.min_x(),
            InterpolationSpace::LogLog => self.polynomial.min_x().exp(),
        }
    }

    pub fn max_x(&self) -> f64 {
        match self.space {
            InterpolationSpace::Linear => self.polynomial.max_x(),
            InterpolationSpace::LogLog => self.polynomial.max_x().exp(),
        }
    }
}

impl Curve for InterpolatedCurve {
    fn value(&self, x: f64) -> f64 {
        match self.space {
            InterpolationSpace::Linear => self.polynomial.value(x),
            InterpolationSpace::LogLog => {
                let ln_x = if x > 0.0 { x.ln() } else { self.polynomial.min_x() };
                self.polynomial.value(ln_x).exp()
            }
        }
    }

    fn derivative(&self, x: f64) -> f64 {
        match self.space {
            InterpolationSpace::Linear => self.polynomial.derivative(x),
            InterpolationSpace::LogLog => {
                if !(x > 0.0) {
                    return 0.0;
                }
                // y = exp(g(ln x))  =>  dy/dx = y·g'(ln x)/x
                let ln_x = x.ln();
                self.polynomial.value(ln_x).exp() * self.polynomial.derivative(ln_x) / x
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn log_log_reproduces_power_law() {
        // y = 2·x^-3 is a straight line in log-log coordinates
        let xs = [0.1, 0.2, 0.5, 1.0];
        let ys: Vec<f64> = xs.iter().map(|x: &f64| 2.0 * x.powi(-3)).collect();
        let curve = InterpolatedCurve::new(&xs, &ys, PolynomialType::Linear, InterpolationSpace::LogLog).unwrap();
        assert_relative_eq!(curve.value(0.3), 2.0 * 0.3_f64.powi(-3), max_relative = 1e-12);
        assert_relative_eq!(curve.derivative(0.3), -6.0 * 0.3_f64.powi(-4), max_relative = 1e-12);
        assert_relative_eq!(curve.min_x(), 0.1, max_relative = 1e-15);
    }

    #[test]
    fn log_log_rejects_non_positive_rows() {
        let result = InterpolatedCurve::new(&[0.0, 1.0], &[1.0, 0.5], PolynomialType::Linear, InterpolationSpace::LogLog);
        assert!(matches!(result, Err(RiskError::InvalidParameter(_))));
    }

    #[test]
    fn unequal_columns_are_a_shape_mismatch() {
        let result = InterpolatedCurve::new(&[0.0, 1.0], &[1.0], PolynomialType::Linear, InterpolationSpace::Linear);
        assert!(matches!(result, Err(RiskError::ShapeMismatch { expected: 2, found: 1 })));
    }
}
