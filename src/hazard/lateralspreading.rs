use serde::{
    Deserialize,
    Serialize
};
use statrs::distribution::{
    Continuous,
    LogNormal
};

use crate::adapter::intensityfunction::JointIntensityFunction;
use crate::error::RiskError;
use crate::hazard::lognormalhazard::LognormalHazard;

// ─────────────────────────────────────────────────────────────────────────────
// Liquefaction susceptibility (HAZUS v4.2, 4.2.2.1.2)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SusceptibilityClass {
    None,
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl SusceptibilityClass {
    /// HAZUS numbering, 0 (None) to 5 (Very high).
    pub fn from_class(class: u8) -> Option<SusceptibilityClass> {
        match class {
            0 => Some(SusceptibilityClass::None),
            1 => Some(SusceptibilityClass::VeryLow),
            2 => Some(SusceptibilityClass::Low),
            3 => Some(SusceptibilityClass::Moderate),
            4 => Some(SusceptibilityClass::High),
            5 => Some(SusceptibilityClass::VeryHigh),
            _ => None,
        }
    }

    /// P(liquefaction | PGA) before the magnitude and groundwater corrections.
    fn conditional_probability(&self, pga: f64) -> f64 {
        let p = match self {
            SusceptibilityClass::VeryHigh => 9.09 * pga - 0.82,
            SusceptibilityClass::High => 7.67 * pga - 0.92,
            SusceptibilityClass::Moderate => 6.67 * pga - 1.00,
            SusceptibilityClass::Low => 5.57 * pga - 1.18,
            SusceptibilityClass::VeryLow => 4.16 * pga - 1.08,
            SusceptibilityClass::None => 0.0,
        };
        p.clamp(0.0, 1.0)
    }

    /// Proportion of map unit susceptible to liquefaction.
    fn map_unit_proportion(&self) -> f64 {
        match self {
            SusceptibilityClass::VeryHigh => 0.25,
            SusceptibilityClass::High => 0.20,
            SusceptibilityClass::Moderate => 0.10,
            SusceptibilityClass::Low => 0.05,
            SusceptibilityClass::VeryLow => 0.02,
            SusceptibilityClass::None => 0.0,
        }
    }

    /// Threshold PGA (g) for lateral spreading.
    fn trigger_pga(&self) -> f64 {
        match self {
            SusceptibilityClass::VeryHigh => 0.09,
            SusceptibilityClass::High => 0.12,
            SusceptibilityClass::Moderate => 0.15,
            SusceptibilityClass::Low => 0.21,
            SusceptibilityClass::VeryLow => 0.26,
            SusceptibilityClass::None => f64::INFINITY,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LateralSpreadingHazard
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LateralSpreadingParameters {
    pub susceptibility: SusceptibilityClass,
    pub magnitude: f64,
    /// depth to groundwater, feet
    pub water_depth_ft: f64,
    /// dispersion of PGD around its median
    pub sigma: f64,
}

impl Default for LateralSpreadingParameters {
    fn default() -> Self {
        LateralSpreadingParameters {
            susceptibility: SusceptibilityClass::VeryHigh,
            magnitude: 6.5,
            water_depth_ft: 0.0,
            sigma: 0.2,
        }
    }
}

/// Joint likelihood of (PGA, PGD) for liquefaction-induced lateral spreading:
///
///   L(pga, pgd) = L_pga(pga) · P(liq | pga) · f(pgd | pga)
///
/// with f lognormal around the HAZUS expected displacement, treated as the
/// median. The normalized-PGA cap of the HAZUS tables is not applied.
#[derive(Debug, Clone)]
pub struct LateralSpreadingHazard {
    primary: LognormalHazard,
    parameters: LateralSpreadingParameters,
}

impl LateralSpreadingHazard {
    pub fn new(
        primary: LognormalHazard,
        parameters: LateralSpreadingParameters,
    ) -> Result<LateralSpreadingHazard, RiskError> {
        if !(parameters.sigma > 0.0) {
            return Err(RiskError::InvalidParameter(format!(
                "displacement dispersion must be positive, got {}",
                parameters.sigma
            )));
        }
        if !(parameters.water_depth_ft >= 0.0) {
            return Err(RiskError::InvalidParameter(format!(
                "groundwater depth must be non-negative, got {}",
                parameters.water_depth_ft
            )));
        }
        Ok(LateralSpreadingHazard { primary, parameters })
    }

    pub fn parameters(&self) -> &LateralSpreadingParameters {
        &self.parameters
    }

    pub fn primary(&self) -> &LognormalHazard {
        &self.primary
    }

    fn magnitude_correction(&self) -> f64 {
        let m = self.parameters.magnitude;
        0.0027 * m.powi(3) - 0.0267 * m.powi(2) - 0.2055 * m + 2.9188
    }

    fn groundwater_correction(&self) -> f64 {
        0.022 * self.parameters.water_depth_ft + 0.93
    }

    fn displacement_correction(&self) -> f64 {
        let m = self.parameters.magnitude;
        0.0086 * m.powi(3) - 0.0914 * m.powi(2) + 0.4698 * m - 0.9835
    }

    pub fn liquefaction_probability(&self, pga: f64) -> f64 {
        let susceptibility = self.parameters.susceptibility;
        let p = susceptibility.conditional_probability(pga)
            / (self.magnitude_correction() * self.groundwater_correction())
            * susceptibility.map_unit_proportion();
        p.clamp(0.0, 1.0)
    }

    /// Median permanent ground displacement (inches) given PGA (g).
    pub fn median_displacement(&self, pga: f64) -> f64 {
        let x = pga / self.parameters.susceptibility.trigger_pga();
        let standard = if x < 1.0 {
            0.0
        } else if x < 2.0 {
            12.0 * x - 12.0
        } else if x < 3.0 {
            18.0 * x - 24.0
        } else {
            70.0 * x - 180.0
        };
        self.displacement_correction() * standard
    }

    /// f(pgd | pga); zero when no displacement is expected.
    pub fn displacement_density(&self, pga: f64, pgd: f64) -> f64 {
        let median = self.median_displacement(pga);
        if !(median > 0.0) || !(pgd > 0.0) {
            return 0.0;
        }
        LogNormal::new(median.ln(), self.parameters.sigma)
            .map(|distribution| distribution.pdf(pgd))
            .unwrap_or(0.0)
    }
}

impl JointIntensityFunction for LateralSpreadingHazard {
    fn evaluate(&self, primary: f64, secondary: f64) -> f64 {
        let density = self.displacement_density(primary, secondary);
        if density == 0.0 {
            return 0.0;
        }
        self.primary.likelihood(primary) * self.liquefaction_probability(primary) * density
    }
}
