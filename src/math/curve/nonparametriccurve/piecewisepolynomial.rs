use nalgebra::{
    DMatrix,
    DVector
};
use serde::{
    Deserialize,
    Serialize
};

use crate::math::curve::curve::Curve;
use crate::math::curve::nonparametriccurve::nonparametriccurve::{
    NonparametricCurve,
    Point2D
};

// ─────────────────────────────────────────────
// Subpolynomial
// ─────────────────────────────────────────────

struct Subpolynomial {
    coefs: Vec<f64>,
    deriv_coefs: Vec<f64>,
    lhs_x: f64,
}

impl Subpolynomial {
    pub fn new(coefs: Vec<f64>, lhs_x: f64) -> Subpolynomial {
        let deriv_coefs = Self::compute_deriv_coefs(&coefs);
        Subpolynomial { coefs, deriv_coefs, lhs_x }
    }

    fn compute_deriv_coefs(coefs: &[f64]) -> Vec<f64> {
        let order = coefs.len() - 1;
        if order == 0 {
            vec![0.0]
        } else {
            (0..order)
                .map(|i| (order - i) as f64 * coefs[i])
                .collect()
        }
    }

    pub fn value(&self, x: f64) -> f64 {
        self.evaluate(&self.coefs, x)
    }

    pub fn derivative(&self, x: f64) -> f64 {
        self.evaluate(&self.deriv_coefs, x)
    }

    // Horner form: coefs[0] is the highest power of (x - lhs_x)
    fn evaluate(&self, coefs: &[f64], x: f64) -> f64 {
        let x_diff = x - self.lhs_x;
        let mut result = coefs[0];
        for &beta in &coefs[1..] {
            result = f64::mul_add(result, x_diff, beta);
        }
        result
    }
}

// ─────────────────────────────────────────────
// Linear
// ─────────────────────────────────────────────

fn generate_linear_coef_list(points: &[Point2D]) -> Vec<Vec<f64>> {
    (0..(points.len() - 1))
        .map(|i| vec![
            Point2D::slope(&points[i], &points[i + 1]),
            points[i].y(),
        ])
        .collect()
}

// ─────────────────────────────────────────────
// Natural cubic spline
// ─────────────────────────────────────────────
//
// Solve the (n+1)×(n+1) system for the knot second derivatives m[0..=n].
// Interior rows come from C² continuity:
//   h[i-1]*m[i-1] + 2*(h[i-1]+h[i])*m[i] + h[i]*m[i+1]
//     = 6*( (y[i+1]-y[i])/h[i] - (y[i]-y[i-1])/h[i-1] )
// and the natural ends fix m[0] = m[n] = 0. With two knots this reduces to
// the linear interpolant.

/// Cubic coefficients [d, c, b, a] per interval from the knot moments:
///   S_i(x) = a + b*(x-x_i) + c*(x-x_i)^2 + d*(x-x_i)^3
fn cubic_coefs_from_moments(points: &[Point2D], h: &[f64], m: &[f64]) -> Vec<Vec<f64>> {
    (0..h.len())
        .map(|i| {
            let d = (m[i + 1] - m[i]) / (6.0 * h[i]);
            let c = m[i] / 2.0;
            let b = (points[i + 1].y() - points[i].y()) / h[i]
                  - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0;
            let a = points[i].y();
            vec![d, c, b, a]
        })
        .collect()
}

fn generate_natural_cubic_coef_list(points: &[Point2D]) -> Option<Vec<Vec<f64>>> {
    let n = points.len() - 1;
    let h: Vec<f64> = (0..n).map(|i| points[i + 1].x() - points[i].x()).collect();

    let mut mat = DMatrix::<f64>::zeros(n + 1, n + 1);
    let mut rhs = DVector::<f64>::zeros(n + 1);
    for i in 1..n {
        mat[(i, i - 1)] = h[i - 1];
        mat[(i, i)]     = 2.0 * (h[i - 1] + h[i]);
        mat[(i, i + 1)] = h[i];
        rhs[i] = 6.0 * (
            (points[i + 1].y() - points[i].y()) / h[i]
          - (points[i].y()     - points[i - 1].y()) / h[i - 1]
        );
    }
    mat[(0, 0)] = 1.0;
    mat[(n, n)] = 1.0;

    let m = mat.lu().solve(&rhs)?;
    Some(cubic_coefs_from_moments(points, &h, m.as_slice()))
}

// ─────────────────────────────────────────────
// PolynomialType
// ─────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolynomialType {
    /// Clamped to the end values outside the table.
    #[default]
    Linear,
    /// End polynomials are extended outside the table.
    NaturalCubic,
}

// ─────────────────────────────────────────────
// PiecewisePolynomial
// ─────────────────────────────────────────────

pub struct PiecewisePolynomial {
    max_x: f64,
    polynomial_type: PolynomialType,
    subpolynomial_list: Vec<Subpolynomial>,
}

impl PiecewisePolynomial {
    /// Needs at least two knots with strictly increasing, finite x.
    pub fn new(
        polynomial_type: PolynomialType,
        points: Vec<Point2D>,
    ) -> Option<PiecewisePolynomial> {
        if points.len() < 2 {
            return None;
        }
        let well_formed = points.iter().all(|pt| pt.x().is_finite() && pt.y().is_finite())
            && points.windows(2).all(|pair| pair[0].x() < pair[1].x());
        if !well_formed {
            return None;
        }

        let coef_list = match polynomial_type {
            PolynomialType::Linear       => generate_linear_coef_list(&points),
            PolynomialType::NaturalCubic => generate_natural_cubic_coef_list(&points)?,
        };

        let subpolynomial_list = coef_list
            .into_iter()
            .zip(points.iter())
            .map(|(coefs, pt)| Subpolynomial::new(coefs, pt.x()))
            .collect();

        Some(PiecewisePolynomial {
            subpolynomial_list,
            max_x: points[points.len() - 1].x(),
            polynomial_type,
        })
    }

    pub fn polynomial_type(&self) -> PolynomialType {
        self.polynomial_type
    }

    fn find_segment(&self, x: f64) -> usize {
        if x <= self.min_x() {
            0
        } else if x >= self.max_x {
            self.subpolynomial_list.len() - 1
        } else {
            self.subpolynomial_list
                .partition_point(|s| s.lhs_x <= x) - 1
        }
    }

    fn is_outside(&self, x: f64) -> bool {
        x < self.min_x() || x > self.max_x
    }
}

impl NonparametricCurve for PiecewisePolynomial {
    fn min_x(&self) -> f64 {
        self.subpolynomial_list[0].lhs_x
    }

    fn max_x(&self) -> f64 {
        self.max_x
    }
}

impl Curve for PiecewisePolynomial {
    fn value(&self, x: f64) -> f64 {
        let x = match self.polynomial_type {
            PolynomialType::Linear => x.clamp(self.min_x(), self.max_x),
            PolynomialType::NaturalCubic => x,
        };
        let i = self.find_segment(x);
        self.subpolynomial_list[i].value(x)
    }

    fn derivative(&self, x: f64) -> f64 {
        if self.polynomial_type == PolynomialType::Linear && self.is_outside(x) {
            return 0.0;
        }
        let i = self.find_segment(x);
        self.subpolynomial_list[i].derivative(x)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn knots(xs: &[f64], ys: &[f64]) -> Vec<Point2D> {
        xs.iter().zip(ys).map(|(&x, &y)| Point2D::new(x, y)).collect()
    }

    #[test]
    fn linear_interpolates_and_holds_end_values() {
        let curve = PiecewisePolynomial::new(
            PolynomialType::Linear,
            knots(&[0.0, 1.0, 3.0], &[0.0, 2.0, 3.0]),
        )
        .unwrap();
        assert_relative_eq!(curve.value(0.5), 1.0, epsilon = 1e-15);
        assert_relative_eq!(curve.value(2.0), 2.5, epsilon = 1e-15);
        assert_eq!(curve.value(-1.0), 0.0);
        assert_eq!(curve.value(5.0), 3.0);
        assert_relative_eq!(curve.derivative(0.5), 2.0, epsilon = 1e-15);
        assert_relative_eq!(curve.derivative(2.0), 0.5, epsilon = 1e-15);
        assert_eq!(curve.derivative(4.0), 0.0);
    }

    #[test]
    fn natural_cubic_interpolates_knots_with_zero_end_curvature() {
        let points = knots(&[0.0, 1.0, 2.0, 4.0], &[1.0, 3.0, 2.0, 5.0]);
        let curve = PiecewisePolynomial::new(PolynomialType::NaturalCubic, points.clone()).unwrap();
        for pt in &points {
            assert_relative_eq!(curve.value(pt.x()), pt.y(), epsilon = 1e-12);
        }
        // S'' at the ends is 2c of the end segments
        let first = &curve.subpolynomial_list[0];
        assert_relative_eq!(first.coefs[1], 0.0, epsilon = 1e-12);
        let last = &curve.subpolynomial_list[2];
        let h = 2.0;
        let second_derivative_at_end = 6.0 * last.coefs[0] * h + 2.0 * last.coefs[1];
        assert_relative_eq!(second_derivative_at_end, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn natural_cubic_reproduces_a_line() {
        let curve = PiecewisePolynomial::new(
            PolynomialType::NaturalCubic,
            knots(&[0.0, 0.5, 1.5, 2.0], &[1.0, 2.0, 4.0, 5.0]),
        )
        .unwrap();
        assert_relative_eq!(curve.value(1.0), 3.0, epsilon = 1e-12);
        assert_relative_eq!(curve.derivative(1.7), 2.0, epsilon = 1e-12);
        assert_relative_eq!(curve.value(3.0), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn segment_lookup_uses_the_containing_interval() {
        let curve = PiecewisePolynomial::new(
            PolynomialType::Linear,
            knots(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]),
        )
        .unwrap();
        assert_relative_eq!(curve.value(0.25), 0.25, epsilon = 1e-15);
        assert_relative_eq!(curve.value(1.75), 0.25, epsilon = 1e-15);
    }

    #[test]
    fn malformed_tables_are_rejected() {
        assert!(PiecewisePolynomial::new(PolynomialType::Linear, knots(&[0.0], &[1.0])).is_none());
        assert!(PiecewisePolynomial::new(PolynomialType::Linear, knots(&[0.0, 0.0], &[1.0, 2.0])).is_none());
        assert!(PiecewisePolynomial::new(PolynomialType::NaturalCubic, knots(&[1.0, 0.0, 2.0], &[1.0, 2.0, 3.0])).is_none());
    }
}
