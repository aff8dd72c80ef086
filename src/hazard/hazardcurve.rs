/// Annual rate λ(IM) of exceeding a given intensity.
///
/// The hazard likelihood used in the risk integral is -dλ/dIM.
pub trait HazardCurve: Send + Sync {
    fn exceedance_rate(&self, im: f64) -> f64;

    fn return_period(&self, im: f64) -> f64 {
        1.0 / self.exceedance_rate(im)
    }
}
