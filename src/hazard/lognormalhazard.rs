use nalgebra::DVector;
use serde::{
    Deserialize,
    Serialize
};
use statrs::distribution::{
    Continuous,
    ContinuousCDF,
    LogNormal
};

use crate::adapter::intensityfunction::IntensityFunction;
use crate::error::RiskError;
use crate::hazard::hazardcurve::HazardCurve;

/// Scenario parameters of the closed-form hazard curve of Baker (2013),
/// section 2.3: one source with activity `rate`, magnitude `magnitude` at
/// `distance_km`, and lognormal ground-motion dispersion `sigma`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LognormalHazardParameters {
    pub rate: f64,
    pub magnitude: f64,
    pub distance_km: f64,
    pub sigma: f64,
}

impl Default for LognormalHazardParameters {
    fn default() -> Self {
        LognormalHazardParameters {
            rate: 0.01,
            magnitude: 6.5,
            distance_km: 10.0,
            sigma: 0.57,
        }
    }
}

impl LognormalHazardParameters {
    /// ln of the median PGA (g) from the example attenuation relation.
    pub fn ln_median(&self) -> f64 {
        -0.152 + 0.859 * self.magnitude - 1.803 * (self.distance_km + 25.0).ln()
    }
}

/// λ(im) = rate·(1 - F(im)) with F lognormal; the likelihood is rate·f(im).
#[derive(Debug, Clone)]
pub struct LognormalHazard {
    parameters: LognormalHazardParameters,
    distribution: LogNormal,
}

impl LognormalHazard {
    pub fn new(parameters: LognormalHazardParameters) -> Result<LognormalHazard, RiskError> {
        if !(parameters.rate > 0.0 && parameters.rate.is_finite()) {
            return Err(RiskError::InvalidParameter(format!(
                "hazard rate must be positive, got {}",
                parameters.rate
            )));
        }
        let distribution = LogNormal::new(parameters.ln_median(), parameters.sigma)
            .map_err(|error| RiskError::InvalidParameter(format!("hazard dispersion {}: {}", parameters.sigma, error)))?;
        Ok(LognormalHazard { parameters, distribution })
    }

    pub fn parameters(&self) -> &LognormalHazardParameters {
        &self.parameters
    }

    pub fn median(&self) -> f64 {
        self.parameters.ln_median().exp()
    }

    pub fn likelihood(&self, im: f64) -> f64 {
        if im <= 0.0 {
            0.0
        } else {
            self.parameters.rate * self.distribution.pdf(im)
        }
    }

    /// Inverse hazard curve: the IM exceeded at annual rate `rate`.
    pub fn intensity_at_rate(&self, rate: f64) -> Result<f64, RiskError> {
        if !(rate > 0.0 && rate < self.parameters.rate) {
            return Err(RiskError::InvalidParameter(format!(
                "exceedance rate {} outside (0, {})",
                rate, self.parameters.rate
            )));
        }
        Ok(self.distribution.inverse_cdf(1.0 - rate / self.parameters.rate))
    }
}

impl HazardCurve for LognormalHazard {
    fn exceedance_rate(&self, im: f64) -> f64 {
        if im <= 0.0 {
            self.parameters.rate
        } else {
            self.parameters.rate * self.distribution.sf(im)
        }
    }
}

impl IntensityFunction for LognormalHazard {
    fn evaluate(&self, im: f64) -> f64 {
        self.likelihood(im)
    }

    fn evaluate_batch(&self, ims: &DVector<f64>) -> DVector<f64> {
        ims.map(|im| self.likelihood(im))
    }
}
