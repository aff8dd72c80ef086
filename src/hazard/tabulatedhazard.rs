use serde::{
    Deserialize,
    Serialize
};

use crate::adapter::intensityfunction::IntensityFunction;
use crate::error::RiskError;
use crate::hazard::hazardcurve::HazardCurve;
use crate::math::curve::curve::Curve;
use crate::math::curve::interpolatedcurve::{
    InterpolatedCurve,
    InterpolationSpace
};
use crate::math::curve::nonparametriccurve::piecewisepolynomial::PolynomialType;

/// What the value column of a hazard table holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardTableKind {
    /// annual rate of exceedance λ(IM), e.g. a USGS hazard curve
    Exceedance,
    /// hazard likelihood (density) directly
    Likelihood,
}

// ─────────────────────────────────────────────────────────────────────────────
// TabulatedHazardCurve
// ─────────────────────────────────────────────────────────────────────────────

/// Hazard curve interpolated from (IM, λ) rows. The likelihood is the negative
/// slope of the interpolant, floored at zero.
pub struct TabulatedHazardCurve {
    curve: InterpolatedCurve,
}

impl TabulatedHazardCurve {
    pub fn new(
        intensities: &[f64],
        exceedance_rates: &[f64],
        polynomial_type: PolynomialType,
        space: InterpolationSpace,
    ) -> Result<TabulatedHazardCurve, RiskError> {
        if exceedance_rates.iter().any(|rate| !(*rate >= 0.0)) {
            return Err(RiskError::InvalidParameter(
                "exceedance rates must be non-negative".to_owned(),
            ));
        }
        let curve = InterpolatedCurve::new(intensities, exceedance_rates, polynomial_type, space)?;
        Ok(TabulatedHazardCurve { curve })
    }

    pub fn min_intensity(&self) -> f64 {
        self.curve.min_x()
    }

    pub fn max_intensity(&self) -> f64 {
        self.curve.max_x()
    }

    pub fn likelihood(&self, im: f64) -> f64 {
        (-self.curve.derivative(im)).max(0.0)
    }
}

impl HazardCurve for TabulatedHazardCurve {
    fn exceedance_rate(&self, im: f64) -> f64 {
        self.curve.value(im).max(0.0)
    }
}

impl IntensityFunction for TabulatedHazardCurve {
    fn evaluate(&self, im: f64) -> f64 {
        self.likelihood(im)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TabulatedLikelihood
// ─────────────────────────────────────────────────────────────────────────────

/// Hazard likelihood interpolated directly from (IM, likelihood) rows.
pub struct TabulatedLikelihood {
    curve: InterpolatedCurve,
}

impl TabulatedLikelihood {
    pub fn new(
        intensities: &[f64],
        likelihoods: &[f64],
        polynomial_type: PolynomialType,
        space: InterpolationSpace,
    ) -> Result<TabulatedLikelihood, RiskError> {
        if likelihoods.iter().any(|value| !(*value >= 0.0)) {
            return Err(RiskError::InvalidParameter(
                "hazard likelihoods must be non-negative".to_owned(),
            ));
        }
        let curve = InterpolatedCurve::new(intensities, likelihoods, polynomial_type, space)?;
        Ok(TabulatedLikelihood { curve })
    }

    /// Piecewise linear, holding the end values beyond the table.
    pub fn linear(intensities: &[f64], likelihoods: &[f64]) -> Result<TabulatedLikelihood, RiskError> {
        Self::new(intensities, likelihoods, PolynomialType::Linear, InterpolationSpace::Linear)
    }

    pub fn min_intensity(&self) -> f64 {
        self.curve.min_x()
    }

    pub fn max_intensity(&self) -> f64 {
        self.curve.max_x()
    }
}

impl IntensityFunction for TabulatedLikelihood {
    fn evaluate(&self, im: f64) -> f64 {
        self.curve.value(im).max(0.0)
    }
}
