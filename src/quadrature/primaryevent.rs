use nalgebra::DVector;
use serde::Serialize;

use crate::adapter::intensityfunction::{
    ensure_batch_len,
    IntensityFunction
};
use crate::error::RiskError;
use crate::hazard::hazardcurve::HazardCurve;
use crate::quadrature::convergence::{
    ConvergenceOutcome,
    ConvergenceTracker,
    QuadratureSettings
};
use crate::quadrature::gausslegendre::GaussLegendreRule;

// ─────────────────────────────────────────────────────────────────────────────
// PrimaryScenario
// ─────────────────────────────────────────────────────────────────────────────

/// Discretization of a single-hazard risk integral at the accepted order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimaryScenario {
    intensities: DVector<f64>,
    weights: DVector<f64>,
    likelihoods: DVector<f64>,
    consequences: DVector<f64>,
}

impl PrimaryScenario {
    pub fn intensities(&self) -> &DVector<f64> {
        &self.intensities
    }

    pub fn weights(&self) -> &DVector<f64> {
        &self.weights
    }

    pub fn likelihoods(&self) -> &DVector<f64> {
        &self.likelihoods
    }

    pub fn consequences(&self) -> &DVector<f64> {
        &self.consequences
    }

    pub fn len(&self) -> usize {
        self.intensities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intensities.is_empty()
    }

    /// Σ w·L·C over the stored samples.
    pub fn risk(&self) -> f64 {
        weighted_sum(&self.weights, &self.likelihoods, &self.consequences)
    }

    /// Re-prices the stored scenarios with other per-scenario consequences,
    /// e.g. after a change of the asset's replacement cost.
    pub fn risk_with_consequences(&self, consequences: &DVector<f64>) -> Result<f64, RiskError> {
        if consequences.len() != self.len() {
            return Err(RiskError::ShapeMismatch {
                expected: self.len(),
                found: consequences.len(),
            });
        }
        Ok(weighted_sum(&self.weights, &self.likelihoods, consequences))
    }

    /// 1/λ(IM) at every sample.
    pub fn return_periods(&self, hazard_curve: &dyn HazardCurve) -> DVector<f64> {
        self.intensities.map(|im| 1.0 / hazard_curve.exceedance_rate(im))
    }
}

pub(crate) fn weighted_sum(weights: &DVector<f64>, likelihoods: &DVector<f64>, consequences: &DVector<f64>) -> f64 {
    weights
        .iter()
        .zip(likelihoods.iter())
        .zip(consequences.iter())
        .map(|((w, l), c)| w * l * c)
        .sum()
}

/// Engine output: the accepted discretization and how the loop ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimaryEvent {
    scenario: PrimaryScenario,
    outcome: ConvergenceOutcome,
}

impl PrimaryEvent {
    pub fn scenario(&self) -> &PrimaryScenario {
        &self.scenario
    }

    pub fn outcome(&self) -> ConvergenceOutcome {
        self.outcome
    }

    pub fn value(&self) -> f64 {
        self.outcome.value()
    }

    pub fn error(&self) -> f64 {
        self.outcome.error()
    }

    pub fn into_parts(self) -> (PrimaryScenario, ConvergenceOutcome) {
        (self.scenario, self.outcome)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PrimaryEventGenerator
// ─────────────────────────────────────────────────────────────────────────────

/// Adaptive Gauss–Legendre integration of L(im)·E[C | im] over [a, b].
///
/// ```
/// use riskquad::adapter::intensityfunction::ScalarFunction;
/// use riskquad::quadrature::primaryevent::PrimaryEventGenerator;
///
/// let likelihood = ScalarFunction::new(|_im: f64| 1.0);
/// let consequence = ScalarFunction::new(|im: f64| im);
/// let event = PrimaryEventGenerator::new(0.0, 1.0)
///     .likelihood(&likelihood)
///     .consequence(&consequence)
///     .generate()
///     .unwrap();
/// assert!((event.value() - 0.5).abs() < 1e-12);
/// ```
pub struct PrimaryEventGenerator<'a> {
    lower: f64,
    upper: f64,
    likelihood: Option<&'a dyn IntensityFunction>,
    consequence: Option<&'a dyn IntensityFunction>,
    settings: QuadratureSettings,
}

impl<'a> PrimaryEventGenerator<'a> {
    pub fn new(lower: f64, upper: f64) -> PrimaryEventGenerator<'a> {
        PrimaryEventGenerator {
            lower,
            upper,
            likelihood: None,
            consequence: None,
            settings: QuadratureSettings::default(),
        }
    }

    pub fn likelihood(mut self, likelihood: &'a dyn IntensityFunction) -> PrimaryEventGenerator<'a> {
        self.likelihood = Some(likelihood);
        self
    }

    pub fn consequence(mut self, consequence: &'a dyn IntensityFunction) -> PrimaryEventGenerator<'a> {
        self.consequence = Some(consequence);
        self
    }

    pub fn settings(mut self, settings: QuadratureSettings) -> PrimaryEventGenerator<'a> {
        self.settings = settings;
        self
    }

    pub fn generate(&self) -> Result<PrimaryEvent, RiskError> {
        let likelihood = self.likelihood.ok_or(RiskError::MissingArgument("likelihood_func"))?;
        let consequence = self.consequence.ok_or(RiskError::MissingArgument("consequence_func"))?;
        validate_domain(self.lower, self.upper)?;
        self.settings.validate()?;

        let mut tracker = ConvergenceTracker::new(self.settings);
        let mut last_scenario = None;
        for order in self.settings.min_order..=self.settings.max_order {
            let rule = GaussLegendreRule::new(order).ok_or(RiskError::InvalidOrder {
                min_order: self.settings.min_order,
                max_order: self.settings.max_order,
            })?;
            let (intensities, weights) = rule.rescale(self.lower, self.upper);
            let likelihoods = ensure_batch_len(likelihood.evaluate_batch(&intensities), order)?;
            let consequences = ensure_batch_len(consequence.evaluate_batch(&intensities), order)?;

            let converged = tracker.update(weighted_sum(&weights, &likelihoods, &consequences));
            tracing::debug!(order, value = tracker.value(), error = tracker.error(), "primary event order evaluated");

            let scenario = PrimaryScenario {
                intensities,
                weights,
                likelihoods,
                consequences,
            };
            if converged {
                return Ok(PrimaryEvent {
                    scenario,
                    outcome: tracker.converged(order),
                });
            }
            last_scenario = Some(scenario);
        }

        match last_scenario {
            Some(scenario) => Ok(PrimaryEvent {
                scenario,
                outcome: tracker.exhausted(self.settings.max_order),
            }),
            None => Err(RiskError::InvalidOrder {
                min_order: self.settings.min_order,
                max_order: self.settings.max_order,
            }),
        }
    }
}

pub(crate) fn validate_domain(lower: f64, upper: f64) -> Result<(), RiskError> {
    if !(lower.is_finite() && upper.is_finite() && lower < upper) {
        return Err(RiskError::InvalidDomain { lower, upper });
    }
    Ok(())
}

/// Function form of [`PrimaryEventGenerator`].
pub fn generate_primary_event(
    lower: f64,
    upper: f64,
    likelihood: &dyn IntensityFunction,
    consequence: &dyn IntensityFunction,
    settings: QuadratureSettings,
) -> Result<PrimaryEvent, RiskError> {
    PrimaryEventGenerator::new(lower, upper)
        .likelihood(likelihood)
        .consequence(consequence)
        .settings(settings)
        .generate()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::adapter::intensityfunction::{
        BatchFunction,
        ScalarFunction
    };

    #[test]
    fn missing_functions_fail_before_integration() {
        let consequence = ScalarFunction::new(|im: f64| im);
        let result = PrimaryEventGenerator::new(0.0, 1.0).consequence(&consequence).generate();
        assert_eq!(result, Err(RiskError::MissingArgument("likelihood_func")));

        let likelihood = ScalarFunction::new(|_: f64| 1.0);
        let result = PrimaryEventGenerator::new(0.0, 1.0).likelihood(&likelihood).generate();
        assert_eq!(result, Err(RiskError::MissingArgument("consequence_func")));
    }

    #[test]
    fn reversed_domain_is_rejected() {
        let f = ScalarFunction::new(|_: f64| 1.0);
        let result = generate_primary_event(1.0, 0.0, &f, &f, QuadratureSettings::default());
        assert_eq!(result, Err(RiskError::InvalidDomain { lower: 1.0, upper: 0.0 }));
    }

    #[test]
    fn mis_sized_batch_output_is_a_shape_mismatch() {
        let likelihood = BatchFunction::new(|_ims: &DVector<f64>| DVector::from_element(1, 1.0));
        let consequence = ScalarFunction::new(|im: f64| im);
        let result = generate_primary_event(
            0.0,
            1.0,
            &likelihood,
            &consequence,
            QuadratureSettings::fixed_order(3),
        );
        assert_eq!(result, Err(RiskError::ShapeMismatch { expected: 3, found: 1 }));
    }

    #[test]
    fn fixed_order_reports_infinite_error() {
        let f = ScalarFunction::new(|im: f64| im * im);
        let event = generate_primary_event(0.0, 3.0, &f, &ScalarFunction::new(|_: f64| 1.0), QuadratureSettings::fixed_order(2))
            .unwrap();
        assert!(!event.outcome().is_converged());
        assert!(event.error().is_infinite());
        assert_relative_eq!(event.value(), 9.0, epsilon = 1e-12);
        assert_eq!(event.scenario().len(), 2);
    }

    #[test]
    fn scenario_can_be_repriced() {
        let likelihood = ScalarFunction::new(|_: f64| 2.0);
        let consequence = ScalarFunction::new(|_: f64| 1.0);
        let event = generate_primary_event(0.0, 1.0, &likelihood, &consequence, QuadratureSettings::fixed_order(4))
            .unwrap();
        let scenario = event.scenario();
        assert_relative_eq!(scenario.risk(), event.value(), epsilon = 1e-15);

        let tripled = scenario.consequences() * 3.0;
        assert_relative_eq!(scenario.risk_with_consequences(&tripled).unwrap(), 6.0, epsilon = 1e-12);
        assert_eq!(
            scenario.risk_with_consequences(&DVector::zeros(2)),
            Err(RiskError::ShapeMismatch { expected: 4, found: 2 })
        );
    }

    #[test]
    fn return_periods_follow_the_hazard_curve() {
        use crate::hazard::lognormalhazard::{
            LognormalHazard,
            LognormalHazardParameters
        };

        let hazard = LognormalHazard::new(LognormalHazardParameters::default()).unwrap();
        let consequence = ScalarFunction::new(|_: f64| 1.0);
        let event = generate_primary_event(0.1, 1.0, &hazard, &consequence, QuadratureSettings::fixed_order(5))
            .unwrap();
        let periods = event.scenario().return_periods(&hazard);
        for (im, period) in event.scenario().intensities().iter().zip(periods.iter()) {
            assert_relative_eq!(*period, hazard.return_period(*im), max_relative = 1e-15);
        }
        // rarer shaking, longer return period
        assert!(periods.as_slice().windows(2).all(|pair| pair[0] < pair[1]));
    }
}
