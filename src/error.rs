use thiserror::Error;

/// Errors raised by the risk engine and the models feeding it.
///
/// Non-convergence is not part of the normal error path: the engines report it
/// through `ConvergenceOutcome::MaxOrderReached` and only
/// `ConvergenceOutcome::into_result` turns it into `NotConverged`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("fragility curves ({fragility_curves}) and consequences ({consequences}) must have the same length")]
    LengthMismatch {
        fragility_curves: usize,
        consequences: usize,
    },

    #[error("shape mismatch: expected {expected} values, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("invalid integration domain [{lower}, {upper}]")]
    InvalidDomain { lower: f64, upper: f64 },

    #[error("invalid quadrature orders: min_order = {min_order}, max_order = {max_order}")]
    InvalidOrder { min_order: usize, max_order: usize },

    #[error("invalid tolerance: tol = {tol}, rtol = {rtol}")]
    InvalidTolerance { tol: f64, rtol: f64 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("max order ({order}) reached. Latest difference = {error:e}")]
    NotConverged { order: usize, error: f64 },
}
