use std::sync::Arc;

use crate::consequence::expectedconsequence::ExpectedConsequence;
use crate::error::RiskError;
use crate::fragility::fragilitycurve::{
    DamageState,
    FragilityCurve
};
use crate::fragility::lognormalfragility::LognormalFragility;

// ─────────────────────────────────────────────────────────────────────────────
// HAZUS reference sets
// ─────────────────────────────────────────────────────────────────────────────
//
// Ground shaking: Basoz and Mander (1999), Example 1 (Table 11), IM = PGA in g.
// Damage ratios: Table 22 of the same report.
// Lateral spreading: HAZUS v4.2 Table 7-6, IM = PGD in inches; only the
// Extensive and Complete states are distinct.

pub const PGA_MEDIANS: [f64; 4] = [0.30, 0.36, 0.49, 0.71];
pub const PGA_DISPERSION: f64 = 0.6;

pub const PGD_MEDIANS: [f64; 4] = [3.9, 3.9, 3.9, 13.8];
pub const PGD_DISPERSION: f64 = 0.2;

pub const DAMAGE_RATIOS: [f64; 4] = [0.12, 0.19, 0.48, 1.00];

/// Bridge fragility under ground shaking.
pub struct HazusBridgeFragility {
    curves: Vec<LognormalFragility>,
}

impl HazusBridgeFragility {
    pub fn new() -> Result<HazusBridgeFragility, RiskError> {
        Self::with_scale(1.0)
    }

    /// `scale` multiplies every median, modelling deterioration.
    pub fn with_scale(scale: f64) -> Result<HazusBridgeFragility, RiskError> {
        let curves = lognormal_set(&PGA_MEDIANS, PGA_DISPERSION, scale)?;
        Ok(HazusBridgeFragility { curves })
    }

    pub fn curve(&self, damage_state: DamageState) -> &LognormalFragility {
        &self.curves[damage_state.index()]
    }

    /// Expected loss for an asset whose complete-damage consequence is
    /// `replacement_cost` (e.g. the deck area).
    pub fn expected_consequence(&self, replacement_cost: f64) -> Result<ExpectedConsequence, RiskError> {
        ExpectedConsequence::new(shared_curves(&self.curves), scaled_ratios(replacement_cost))
    }
}

/// Bridge fragility under liquefaction-induced lateral spreading.
pub struct HazusLiquefactionFragility {
    curves: Vec<LognormalFragility>,
}

impl HazusLiquefactionFragility {
    pub fn new() -> Result<HazusLiquefactionFragility, RiskError> {
        let curves = lognormal_set(&PGD_MEDIANS, PGD_DISPERSION, 1.0)?;
        Ok(HazusLiquefactionFragility { curves })
    }

    pub fn curve(&self, damage_state: DamageState) -> &LognormalFragility {
        &self.curves[damage_state.index()]
    }

    pub fn expected_consequence(&self, replacement_cost: f64) -> Result<ExpectedConsequence, RiskError> {
        ExpectedConsequence::new(shared_curves(&self.curves), scaled_ratios(replacement_cost))
    }
}

fn lognormal_set(medians: &[f64; 4], dispersion: f64, scale: f64) -> Result<Vec<LognormalFragility>, RiskError> {
    medians
        .iter()
        .map(|median| LognormalFragility::new(scale * median, dispersion))
        .collect()
}

fn shared_curves(curves: &[LognormalFragility]) -> Vec<Arc<dyn FragilityCurve>> {
    curves
        .iter()
        .map(|curve| Arc::new(curve.clone()) as Arc<dyn FragilityCurve>)
        .collect()
}

fn scaled_ratios(replacement_cost: f64) -> Vec<f64> {
    DAMAGE_RATIOS.iter().map(|ratio| ratio * replacement_cost).collect()
}
