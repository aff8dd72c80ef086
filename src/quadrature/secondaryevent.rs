use nalgebra::{
    DMatrix,
    DVector
};
use serde::Serialize;

use crate::adapter::intensityfunction::{
    ensure_batch_len,
    IntensityFunction,
    JointIntensityFunction
};
use crate::error::RiskError;
use crate::quadrature::convergence::{
    ConvergenceOutcome,
    ConvergenceTracker,
    QuadratureSettings
};
use crate::quadrature::gausslegendre::GaussLegendreRule;
use crate::quadrature::primaryevent::validate_domain;

// ─────────────────────────────────────────────────────────────────────────────
// SecondaryScenario
// ─────────────────────────────────────────────────────────────────────────────

/// Tensor-product discretization of a cascading-hazard risk integral.
///
/// Row k of `intensities` is (primary IM, secondary IM); row k of `weights` is
/// the matching pair of rescaled 1-D weights, whose product is the weight of
/// scenario k.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondaryScenario {
    intensities: DMatrix<f64>,
    weights: DMatrix<f64>,
    likelihoods: DVector<f64>,
    consequences: DVector<f64>,
}

impl SecondaryScenario {
    pub fn intensities(&self) -> &DMatrix<f64> {
        &self.intensities
    }

    pub fn weights(&self) -> &DMatrix<f64> {
        &self.weights
    }

    pub fn likelihoods(&self) -> &DVector<f64> {
        &self.likelihoods
    }

    pub fn consequences(&self) -> &DVector<f64> {
        &self.consequences
    }

    pub fn len(&self) -> usize {
        self.likelihoods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.likelihoods.is_empty()
    }

    pub fn primary_intensities(&self) -> DVector<f64> {
        self.intensities.column(0).into_owned()
    }

    pub fn secondary_intensities(&self) -> DVector<f64> {
        self.intensities.column(1).into_owned()
    }

    /// w₁·w₂ per scenario.
    pub fn scenario_weights(&self) -> DVector<f64> {
        self.weights.column(0).component_mul(&self.weights.column(1))
    }

    pub fn risk(&self) -> f64 {
        self.scenario_weights()
            .iter()
            .zip(self.likelihoods.iter())
            .zip(self.consequences.iter())
            .map(|((w, l), c)| w * l * c)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondaryEvent {
    scenario: SecondaryScenario,
    outcome: ConvergenceOutcome,
}

impl SecondaryEvent {
    pub fn scenario(&self) -> &SecondaryScenario {
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

    pub fn into_parts(self) -> (SecondaryScenario, ConvergenceOutcome) {
        (self.scenario, self.outcome)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SecondaryEventGenerator
// ─────────────────────────────────────────────────────────────────────────────
//
// Both axes use the same order n per iteration, so each order costs n²
// evaluations of the joint likelihood. Independent per-axis orders are not
// supported. Grid pair k = i·n + j is (primary_j, secondary_i).

/// Adaptive tensor-product Gauss–Legendre integration of
/// L(im₁, im₂)·E[C | im₂] over [a, b] × [c, d].
pub struct SecondaryEventGenerator<'a> {
    primary_lower: f64,
    primary_upper: f64,
    secondary_lower: f64,
    secondary_upper: f64,
    likelihood: Option<&'a dyn JointIntensityFunction>,
    consequence: Option<&'a dyn IntensityFunction>,
    settings: QuadratureSettings,
}

impl<'a> SecondaryEventGenerator<'a> {
    pub fn new(
        primary_lower: f64,
        primary_upper: f64,
        secondary_lower: f64,
        secondary_upper: f64,
    ) -> SecondaryEventGenerator<'a> {
        SecondaryEventGenerator {
            primary_lower,
            primary_upper,
            secondary_lower,
            secondary_upper,
            likelihood: None,
            consequence: None,
            settings: QuadratureSettings::default(),
        }
    }

    pub fn likelihood(mut self, likelihood: &'a dyn JointIntensityFunction) -> SecondaryEventGenerator<'a> {
        self.likelihood = Some(likelihood);
        self
    }

    pub fn consequence(mut self, consequence: &'a dyn IntensityFunction) -> SecondaryEventGenerator<'a> {
        self.consequence = Some(consequence);
        self
    }

    pub fn settings(mut self, settings: QuadratureSettings) -> SecondaryEventGenerator<'a> {
        self.settings = settings;
        self
    }

    pub fn generate(&self) -> Result<SecondaryEvent, RiskError> {
        let likelihood = self.likelihood.ok_or(RiskError::MissingArgument("likelihood_func"))?;
        let consequence = self.consequence.ok_or(RiskError::MissingArgument("consequence_func"))?;
        validate_domain(self.primary_lower, self.primary_upper)?;
        validate_domain(self.secondary_lower, self.secondary_upper)?;
        self.settings.validate()?;

        let mut tracker = ConvergenceTracker::new(self.settings);
        let mut last_scenario = None;
        for order in self.settings.min_order..=self.settings.max_order {
            let rule = GaussLegendreRule::new(order).ok_or(RiskError::InvalidOrder {
                min_order: self.settings.min_order,
                max_order: self.settings.max_order,
            })?;
            let (primary_points, primary_weights) = rule.rescale(self.primary_lower, self.primary_upper);
            let (secondary_points, secondary_weights) = rule.rescale(self.secondary_lower, self.secondary_upper);

            let intensities = tensor_grid(&primary_points, &secondary_points);
            let weights = tensor_grid(&primary_weights, &secondary_weights);
            let primaries = intensities.column(0).into_owned();
            let secondaries = intensities.column(1).into_owned();

            let grid_size = order * order;
            let consequences = ensure_batch_len(consequence.evaluate_batch(&secondaries), grid_size)?;
            let likelihoods = ensure_batch_len(likelihood.evaluate_batch(&primaries, &secondaries)?, grid_size)?;

            let scenario = SecondaryScenario {
                intensities,
                weights,
                likelihoods,
                consequences,
            };
            let converged = tracker.update(scenario.risk());
            tracing::debug!(order, value = tracker.value(), error = tracker.error(), "secondary event order evaluated");

            if converged {
                return Ok(SecondaryEvent {
                    scenario,
                    outcome: tracker.converged(order),
                });
            }
            last_scenario = Some(scenario);
        }

        match last_scenario {
            Some(scenario) => Ok(SecondaryEvent {
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

/// Flattened outer combination of two axes: row i·n + j is (first_j, second_i).
fn tensor_grid(first: &DVector<f64>, second: &DVector<f64>) -> DMatrix<f64> {
    let n_first = first.len();
    let n_second = second.len();
    DMatrix::from_fn(n_first * n_second, 2, |k, column| {
        if column == 0 {
            first[k % n_first]
        } else {
            second[k / n_first]
        }
    })
}

/// Function form of [`SecondaryEventGenerator`].
pub fn generate_secondary_event(
    primary_lower: f64,
    primary_upper: f64,
    secondary_lower: f64,
    secondary_upper: f64,
    likelihood: &dyn JointIntensityFunction,
    consequence: &dyn IntensityFunction,
    settings: QuadratureSettings,
) -> Result<SecondaryEvent, RiskError> {
    SecondaryEventGenerator::new(primary_lower, primary_upper, secondary_lower, secondary_upper)
        .likelihood(likelihood)
        .consequence(consequence)
        .settings(settings)
        .generate()
}
