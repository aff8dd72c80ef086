use std::fmt::Display;
use std::str::FromStr;

use nalgebra::DVector;
use serde::{
    Deserialize,
    Serialize
};

use crate::error::RiskError;

/// P(DS ≥ k | IM) for one damage state k.
///
/// A set of curves for one asset is ordered from the least to the most severe
/// damage state. Curves are expected to be non-decreasing in IM.
pub trait FragilityCurve: Send + Sync {
    fn probability(&self, im: f64) -> f64;

    fn probabilities(&self, ims: &DVector<f64>) -> DVector<f64> {
        ims.map(|im| self.probability(im))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DamageState
// ─────────────────────────────────────────────────────────────────────────────

/// HAZUS damage states, in increasing severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DamageState {
    Slight,
    Moderate,
    Extensive,
    Complete,
}

impl DamageState {
    pub const ALL: [DamageState; 4] = [
        DamageState::Slight,
        DamageState::Moderate,
        DamageState::Extensive,
        DamageState::Complete,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl FromStr for DamageState {
    type Err = RiskError;

    /// Accepts full names and initials, case-insensitive; "collapse" is an
    /// alias of `Complete`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s" | "slight" => Ok(DamageState::Slight),
            "m" | "moderate" => Ok(DamageState::Moderate),
            "e" | "extensive" => Ok(DamageState::Extensive),
            "c" | "complete" | "collapse" => Ok(DamageState::Complete),
            other => Err(RiskError::InvalidParameter(format!("unknown damage state '{}'", other))),
        }
    }
}

impl Display for DamageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DamageState::Slight => "Slight",
            DamageState::Moderate => "Moderate",
            DamageState::Extensive => "Extensive",
            DamageState::Complete => "Complete",
        };
        write!(f, "{}", name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UserFragility
// ─────────────────────────────────────────────────────────────────────────────

/// Fragility curve given as a closure.
pub struct UserFragility<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    func: F,
}

impl<F> UserFragility<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    pub fn new(func: F) -> UserFragility<F> {
        UserFragility { func }
    }
}

impl<F> FragilityCurve for UserFragility<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn probability(&self, im: f64) -> f64 {
        (self.func)(im)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_states_parse_from_names_and_initials() {
        assert_eq!("s".parse::<DamageState>(), Ok(DamageState::Slight));
        assert_eq!("Moderate".parse::<DamageState>(), Ok(DamageState::Moderate));
        assert_eq!("EXTENSIVE".parse::<DamageState>(), Ok(DamageState::Extensive));
        assert_eq!("collapse".parse::<DamageState>(), Ok(DamageState::Complete));
        assert!("none".parse::<DamageState>().is_err());
    }

    #[test]
    fn damage_states_are_ordered_by_severity() {
        assert!(DamageState::Slight < DamageState::Complete);
        assert_eq!(DamageState::Extensive.index(), 2);
        assert_eq!(DamageState::Complete.to_string(), "Complete");
    }

    #[test]
    fn user_fragility_batches_pointwise() {
        let step = UserFragility::new(|im: f64| if im >= 1.0 { 1.0 } else { 0.0 });
        let probabilities = step.probabilities(&DVector::from_vec(vec![0.5, 1.0, 2.0]));
        assert_eq!(probabilities, DVector::from_vec(vec![0.0, 1.0, 1.0]));
    }
}
