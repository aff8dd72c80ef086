use nalgebra::DVector;

use crate::adapter::intensityfunction::IntensityFunction;
use crate::hazard::hazardcurve::HazardCurve;
use crate::hazard::lognormalhazard::LognormalHazard;
use crate::hazard::tabulatedhazard::{
    TabulatedHazardCurve,
    TabulatedLikelihood
};

/// Any univariate hazard the configuration can build.
pub enum HazardModel {
    Lognormal(LognormalHazard),
    Exceedance(TabulatedHazardCurve),
    Likelihood(TabulatedLikelihood),
}

impl HazardModel {
    /// The exceedance curve behind the likelihood, if the model has one.
    pub fn hazard_curve(&self) -> Option<&dyn HazardCurve> {
        match self {
            HazardModel::Lognormal(hazard) => Some(hazard),
            HazardModel::Exceedance(curve) => Some(curve),
            HazardModel::Likelihood(_) => None,
        }
    }

    fn as_intensity_function(&self) -> &dyn IntensityFunction {
        match self {
            HazardModel::Lognormal(hazard) => hazard,
            HazardModel::Exceedance(curve) => curve,
            HazardModel::Likelihood(table) => table,
        }
    }
}

impl IntensityFunction for HazardModel {
    fn evaluate(&self, im: f64) -> f64 {
        self.as_intensity_function().evaluate(im)
    }

    fn evaluate_batch(&self, ims: &DVector<f64>) -> DVector<f64> {
        self.as_intensity_function().evaluate_batch(ims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hazard::lognormalhazard::LognormalHazardParameters;

    #[test]
    fn dispatches_to_the_wrapped_hazard() {
        let hazard = LognormalHazard::new(LognormalHazardParameters::default()).unwrap();
        let expected = hazard.likelihood(0.3);
        let model = HazardModel::Lognormal(hazard);
        assert_eq!(model.evaluate(0.3), expected);
        assert!(model.hazard_curve().is_some());

        let table = TabulatedLikelihood::linear(&[0.1, 0.2], &[1.0, 3.0]).unwrap();
        let model = HazardModel::Likelihood(table);
        assert_eq!(model.evaluate(0.2), 3.0);
        assert!(model.hazard_curve().is_none());
    }
}
