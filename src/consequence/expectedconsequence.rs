use std::sync::Arc;

use nalgebra::{
    DMatrix,
    DVector
};

use crate::adapter::intensityfunction::{
    ensure_batch_len,
    IntensityFunction,
    JointIntensityFunction
};
use crate::error::RiskError;
use crate::fragility::fragilitycurve::FragilityCurve;

// ─────────────────────────────────────────────────────────────────────────────
// Damage-state decomposition
// ─────────────────────────────────────────────────────────────────────────────
//
// With CDF[k] = P(DS ≥ k | IM) ordered from least to most severe:
//
//   P(DS = k | IM) = CDF[k] - CDF[k+1],   CDF[K] = 0
//
// The probabilities are mutually exclusive; whatever is left below the least
// severe state is "no damage" and carries no consequence.

fn check_lengths(fragility_curves: usize, consequences: usize) -> Result<(), RiskError> {
    if fragility_curves == 0 {
        return Err(RiskError::MissingArgument("fragility_curves"));
    }
    if consequences == 0 {
        return Err(RiskError::MissingArgument("consequence_array"));
    }
    if fragility_curves != consequences {
        return Err(RiskError::LengthMismatch {
            fragility_curves,
            consequences,
        });
    }
    Ok(())
}

/// Samples × damage-states matrix of P(DS = k | IM).
///
/// A curve whose batch length differs from `ims` is a `ShapeMismatch`.
pub fn damage_state_probabilities<C>(
    ims: &DVector<f64>,
    fragility_curves: &[C],
) -> Result<DMatrix<f64>, RiskError>
where
    C: AsRef<dyn FragilityCurve>,
{
    let n_states = fragility_curves.len();
    let mut cdf = DMatrix::<f64>::zeros(ims.len(), n_states);
    for (k, curve) in fragility_curves.iter().enumerate() {
        let column = ensure_batch_len(curve.as_ref().probabilities(ims), ims.len())?;
        cdf.set_column(k, &column);
    }

    let mut probabilities = cdf.clone();
    for k in 0..n_states.saturating_sub(1) {
        let next = cdf.column(k + 1).into_owned();
        let mut column = probabilities.column_mut(k);
        column -= next;
    }
    Ok(probabilities)
}

/// Σ_k P(DS = k | IM)·C_k for every IM sample.
pub fn expected_consequence<C>(
    ims: &DVector<f64>,
    fragility_curves: &[C],
    consequences: &[f64],
) -> Result<DVector<f64>, RiskError>
where
    C: AsRef<dyn FragilityCurve>,
{
    check_lengths(fragility_curves.len(), consequences.len())?;
    let probabilities = damage_state_probabilities(ims, fragility_curves)?;
    Ok(probabilities * DVector::from_column_slice(consequences))
}

// ─────────────────────────────────────────────────────────────────────────────
// ExpectedConsequence
// ─────────────────────────────────────────────────────────────────────────────

/// Fragility set plus per-state consequences, usable directly as the
/// consequence function of either engine.
#[derive(Clone)]
pub struct ExpectedConsequence {
    fragility_curves: Vec<Arc<dyn FragilityCurve>>,
    consequences: DVector<f64>,
}

impl ExpectedConsequence {
    pub fn new(
        fragility_curves: Vec<Arc<dyn FragilityCurve>>,
        consequences: Vec<f64>,
    ) -> Result<ExpectedConsequence, RiskError> {
        check_lengths(fragility_curves.len(), consequences.len())?;
        Ok(ExpectedConsequence {
            fragility_curves,
            consequences: DVector::from_vec(consequences),
        })
    }

    pub fn n_damage_states(&self) -> usize {
        self.fragility_curves.len()
    }

    pub fn consequences(&self) -> &DVector<f64> {
        &self.consequences
    }

    pub fn damage_state_probabilities(&self, ims: &DVector<f64>) -> Result<DMatrix<f64>, RiskError> {
        damage_state_probabilities(ims, &self.fragility_curves)
    }

    /// Same fragility set with every consequence multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> ExpectedConsequence {
        ExpectedConsequence {
            fragility_curves: self.fragility_curves.clone(),
            consequences: &self.consequences * factor,
        }
    }
}

impl IntensityFunction for ExpectedConsequence {
    fn evaluate(&self, im: f64) -> f64 {
        self.evaluate_batch(&DVector::from_element(1, im))
            .get(0)
            .copied()
            .unwrap_or(f64::NAN)
    }

    // An empty batch lets the engines report the curve's ShapeMismatch.
    fn evaluate_batch(&self, ims: &DVector<f64>) -> DVector<f64> {
        match self.damage_state_probabilities(ims) {
            Ok(probabilities) => probabilities * &self.consequences,
            Err(_) => DVector::zeros(0),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Risk integrands
// ─────────────────────────────────────────────────────────────────────────────

/// L(im)·E[C | im] pointwise.
pub fn risk_integrand(
    ims: &DVector<f64>,
    likelihood: &dyn IntensityFunction,
    consequence: &dyn IntensityFunction,
) -> Result<DVector<f64>, RiskError> {
    let likelihoods = ensure_batch_len(likelihood.evaluate_batch(ims), ims.len())?;
    let consequences = ensure_batch_len(consequence.evaluate_batch(ims), ims.len())?;
    Ok(likelihoods.component_mul(&consequences))
}

/// L(im₁, im₂)·E[C | im₂] pointwise for a cascading hazard.
pub fn secondary_risk_integrand(
    primaries: &DVector<f64>,
    secondaries: &DVector<f64>,
    likelihood: &dyn JointIntensityFunction,
    consequence: &dyn IntensityFunction,
) -> Result<DVector<f64>, RiskError> {
    let likelihoods = ensure_batch_len(likelihood.evaluate_batch(primaries, secondaries)?, secondaries.len())?;
    let consequences = ensure_batch_len(consequence.evaluate_batch(secondaries), secondaries.len())?;
    Ok(likelihoods.component_mul(&consequences))
}
