use nalgebra::DVector;
use serde::{
    Deserialize,
    Serialize
};
use statrs::distribution::{
    ContinuousCDF,
    LogNormal
};

use crate::error::RiskError;
use crate::fragility::fragilitycurve::FragilityCurve;

/// Median and dispersion of a lognormal fragility curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LognormalFragilityParameters {
    pub median: f64,
    pub dispersion: f64,
}

/// Φ(ln(im / median) / β); zero for im ≤ 0.
#[derive(Debug, Clone)]
pub struct LognormalFragility {
    parameters: LognormalFragilityParameters,
    distribution: LogNormal,
}

impl LognormalFragility {
    pub fn new(median: f64, dispersion: f64) -> Result<LognormalFragility, RiskError> {
        if !(median > 0.0 && median.is_finite()) {
            return Err(RiskError::InvalidParameter(format!(
                "fragility median must be positive, got {}",
                median
            )));
        }
        let distribution = LogNormal::new(median.ln(), dispersion)
            .map_err(|error| RiskError::InvalidParameter(format!("fragility dispersion {}: {}", dispersion, error)))?;
        Ok(LognormalFragility {
            parameters: LognormalFragilityParameters { median, dispersion },
            distribution,
        })
    }

    pub fn from_parameters(parameters: LognormalFragilityParameters) -> Result<LognormalFragility, RiskError> {
        Self::new(parameters.median, parameters.dispersion)
    }

    /// Same curve with the median multiplied by `scale`, e.g. a deteriorated
    /// asset with `scale < 1`.
    pub fn scaled(&self, scale: f64) -> Result<LognormalFragility, RiskError> {
        Self::new(scale * self.parameters.median, self.parameters.dispersion)
    }

    pub fn median(&self) -> f64 {
        self.parameters.median
    }

    pub fn dispersion(&self) -> f64 {
        self.parameters.dispersion
    }
}

impl FragilityCurve for LognormalFragility {
    fn probability(&self, im: f64) -> f64 {
        if im <= 0.0 {
            0.0
        } else {
            self.distribution.cdf(im)
        }
    }

    fn probabilities(&self, ims: &DVector<f64>) -> DVector<f64> {
        ims.map(|im| self.probability(im))
    }
}
