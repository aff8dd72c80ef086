use nalgebra::DVector;

use crate::error::RiskError;

// ─────────────────────────────────────────────────────────────────────────────
// IntensityFunction
// ─────────────────────────────────────────────────────────────────────────────
//
// The engines only ever call `evaluate_batch`. The provided implementation
// applies `evaluate` to each sample independently, which is the scalar-only
// path. Types that support batch evaluation natively override it; the choice
// is fixed by the type at construction time.

/// A function of one intensity measure: hazard likelihoods and expected
/// consequences both come through this trait.
pub trait IntensityFunction {
    fn evaluate(&self, im: f64) -> f64;

    fn evaluate_batch(&self, ims: &DVector<f64>) -> DVector<f64> {
        ims.map(|im| self.evaluate(im))
    }
}

/// A function of a (primary, secondary) intensity pair, used as the joint
/// likelihood of a cascading hazard.
pub trait JointIntensityFunction {
    fn evaluate(&self, primary: f64, secondary: f64) -> f64;

    fn evaluate_pairs(&self, primaries: &DVector<f64>, secondaries: &DVector<f64>) -> DVector<f64> {
        primaries.zip_map(secondaries, |p, s| self.evaluate(p, s))
    }

    /// Checked entry point: paired samples must have the same length.
    fn evaluate_batch(
        &self,
        primaries: &DVector<f64>,
        secondaries: &DVector<f64>,
    ) -> Result<DVector<f64>, RiskError> {
        if primaries.len() != secondaries.len() {
            return Err(RiskError::ShapeMismatch {
                expected: primaries.len(),
                found: secondaries.len(),
            });
        }
        Ok(self.evaluate_pairs(primaries, secondaries))
    }
}

impl<T: IntensityFunction + ?Sized> IntensityFunction for &T {
    fn evaluate(&self, im: f64) -> f64 {
        (**self).evaluate(im)
    }

    fn evaluate_batch(&self, ims: &DVector<f64>) -> DVector<f64> {
        (**self).evaluate_batch(ims)
    }
}

impl<T: JointIntensityFunction + ?Sized> JointIntensityFunction for &T {
    fn evaluate(&self, primary: f64, secondary: f64) -> f64 {
        (**self).evaluate(primary, secondary)
    }

    fn evaluate_pairs(&self, primaries: &DVector<f64>, secondaries: &DVector<f64>) -> DVector<f64> {
        (**self).evaluate_pairs(primaries, secondaries)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Closure adapters
// ─────────────────────────────────────────────────────────────────────────────

/// Scalar-only closure, applied to every sample independently.
pub struct ScalarFunction<F>
where
    F: Fn(f64) -> f64,
{
    func: F,
}

impl<F> ScalarFunction<F>
where
    F: Fn(f64) -> f64,
{
    pub fn new(func: F) -> ScalarFunction<F> {
        ScalarFunction { func }
    }
}

impl<F> IntensityFunction for ScalarFunction<F>
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, im: f64) -> f64 {
        (self.func)(im)
    }
}

/// Closure that already maps a vector of intensities to a vector of results.
pub struct BatchFunction<F>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    func: F,
}

impl<F> BatchFunction<F>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    pub fn new(func: F) -> BatchFunction<F> {
        BatchFunction { func }
    }
}

impl<F> IntensityFunction for BatchFunction<F>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    fn evaluate(&self, im: f64) -> f64 {
        let values = (self.func)(&DVector::from_element(1, im));
        values.get(0).copied().unwrap_or(f64::NAN)
    }

    fn evaluate_batch(&self, ims: &DVector<f64>) -> DVector<f64> {
        (self.func)(ims)
    }
}

pub struct ScalarJointFunction<F>
where
    F: Fn(f64, f64) -> f64,
{
    func: F,
}

impl<F> ScalarJointFunction<F>
where
    F: Fn(f64, f64) -> f64,
{
    pub fn new(func: F) -> ScalarJointFunction<F> {
        ScalarJointFunction { func }
    }
}

impl<F> JointIntensityFunction for ScalarJointFunction<F>
where
    F: Fn(f64, f64) -> f64,
{
    fn evaluate(&self, primary: f64, secondary: f64) -> f64 {
        (self.func)(primary, secondary)
    }
}

pub struct BatchJointFunction<F>
where
    F: Fn(&DVector<f64>, &DVector<f64>) -> DVector<f64>,
{
    func: F,
}

impl<F> BatchJointFunction<F>
where
    F: Fn(&DVector<f64>, &DVector<f64>) -> DVector<f64>,
{
    pub fn new(func: F) -> BatchJointFunction<F> {
        BatchJointFunction { func }
    }
}

impl<F> JointIntensityFunction for BatchJointFunction<F>
where
    F: Fn(&DVector<f64>, &DVector<f64>) -> DVector<f64>,
{
    fn evaluate(&self, primary: f64, secondary: f64) -> f64 {
        let values = (self.func)(
            &DVector::from_element(1, primary),
            &DVector::from_element(1, secondary),
        );
        values.get(0).copied().unwrap_or(f64::NAN)
    }

    fn evaluate_pairs(&self, primaries: &DVector<f64>, secondaries: &DVector<f64>) -> DVector<f64> {
        (self.func)(primaries, secondaries)
    }
}

/// Checks that a batch evaluation returned one value per sample.
pub(crate) fn ensure_batch_len(values: DVector<f64>, expected: usize) -> Result<DVector<f64>, RiskError> {
    if values.len() != expected {
        return Err(RiskError::ShapeMismatch {
            expected,
            found: values.len(),
        });
    }
    Ok(values)
}
