use crate::error::RiskError;
use crate::fragility::fragilitycurve::FragilityCurve;
use crate::math::curve::curve::Curve;
use crate::math::curve::interpolatedcurve::{
    InterpolatedCurve,
    InterpolationSpace
};
use crate::math::curve::nonparametriccurve::piecewisepolynomial::PolynomialType;

/// Fragility curve interpolated from an (IM, probability) table, clamped to [0, 1].
pub struct TabulatedFragility {
    curve: InterpolatedCurve,
}

impl TabulatedFragility {
    pub fn new(
        intensities: &[f64],
        probabilities: &[f64],
        polynomial_type: PolynomialType,
    ) -> Result<TabulatedFragility, RiskError> {
        if probabilities.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return Err(RiskError::InvalidParameter(
                "fragility table probabilities must lie in [0, 1]".to_owned(),
            ));
        }
        let curve = InterpolatedCurve::new(intensities, probabilities, polynomial_type, InterpolationSpace::Linear)?;
        Ok(TabulatedFragility { curve })
    }

    /// Piecewise linear, holding the end values beyond the table.
    pub fn linear(intensities: &[f64], probabilities: &[f64]) -> Result<TabulatedFragility, RiskError> {
        Self::new(intensities, probabilities, PolynomialType::Linear)
    }
}

impl FragilityCurve for TabulatedFragility {
    fn probability(&self, im: f64) -> f64 {
        self.curve.value(im).clamp(0.0, 1.0)
    }
}
