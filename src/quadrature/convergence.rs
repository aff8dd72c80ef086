use serde::{
    Deserialize,
    Serialize
};

use crate::error::RiskError;

// ─────────────────────────────────────────────────────────────────────────────
// QuadratureSettings
// ─────────────────────────────────────────────────────────────────────────────

/// Stopping controls shared by the 1-D and 2-D engines.
///
/// Missing fields in JSON fall back to the defaults
/// (`tol = rtol = 1e-8`, orders `1..=50`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadratureSettings {
    /// absolute tolerance on the difference between consecutive orders
    pub tol: f64,
    /// relative tolerance on the same difference
    pub rtol: f64,
    /// first Gauss–Legendre order tried (inclusive)
    pub min_order: usize,
    /// last Gauss–Legendre order tried (inclusive)
    pub max_order: usize,
}

impl Default for QuadratureSettings {
    fn default() -> Self {
        QuadratureSettings {
            tol: 1e-8,
            rtol: 1e-8,
            min_order: 1,
            max_order: 50,
        }
    }
}

impl QuadratureSettings {
    pub fn new(tol: f64, rtol: f64, min_order: usize, max_order: usize) -> QuadratureSettings {
        QuadratureSettings { tol, rtol, min_order, max_order }
    }

    /// Runs exactly one order.
    pub fn fixed_order(order: usize) -> QuadratureSettings {
        QuadratureSettings {
            min_order: order,
            max_order: order,
            ..QuadratureSettings::default()
        }
    }

    pub fn with_tolerances(mut self, tol: f64, rtol: f64) -> QuadratureSettings {
        self.tol = tol;
        self.rtol = rtol;
        self
    }

    pub fn with_orders(mut self, min_order: usize, max_order: usize) -> QuadratureSettings {
        self.min_order = min_order;
        self.max_order = max_order;
        self
    }

    pub fn validate(&self) -> Result<(), RiskError> {
        if self.min_order < 1 || self.min_order > self.max_order {
            return Err(RiskError::InvalidOrder {
                min_order: self.min_order,
                max_order: self.max_order,
            });
        }
        if !(self.tol >= 0.0) || !(self.rtol >= 0.0) {
            return Err(RiskError::InvalidTolerance {
                tol: self.tol,
                rtol: self.rtol,
            });
        }
        Ok(())
    }

    /// Absolute or relative stopping rule on the latest difference.
    pub fn is_converged(&self, value: f64, error: f64) -> bool {
        error < self.tol || error < self.rtol * value.abs()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ConvergenceOutcome
// ─────────────────────────────────────────────────────────────────────────────

/// How the order-escalation loop ended.
///
/// `error` is the absolute difference between the last two orders; it is
/// `+∞` when only one order was evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ConvergenceOutcome {
    Converged { order: usize, value: f64, error: f64 },
    MaxOrderReached { order: usize, value: f64, error: f64 },
}

impl ConvergenceOutcome {
    pub fn order(&self) -> usize {
        match self {
            ConvergenceOutcome::Converged { order, .. } => *order,
            ConvergenceOutcome::MaxOrderReached { order, .. } => *order,
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            ConvergenceOutcome::Converged { value, .. } => *value,
            ConvergenceOutcome::MaxOrderReached { value, .. } => *value,
        }
    }

    pub fn error(&self) -> f64 {
        match self {
            ConvergenceOutcome::Converged { error, .. } => *error,
            ConvergenceOutcome::MaxOrderReached { error, .. } => *error,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, ConvergenceOutcome::Converged { .. })
    }

    /// For callers that treat a best-effort estimate as fatal.
    pub fn into_result(self) -> Result<f64, RiskError> {
        match self {
            ConvergenceOutcome::Converged { value, .. } => Ok(value),
            ConvergenceOutcome::MaxOrderReached { order, error, .. } => {
                Err(RiskError::NotConverged { order, error })
            }
        }
    }
}

/// Running state of the escalation loop shared by both engines.
pub(crate) struct ConvergenceTracker {
    settings: QuadratureSettings,
    value: f64,
    error: f64,
}

impl ConvergenceTracker {
    pub(crate) fn new(settings: QuadratureSettings) -> ConvergenceTracker {
        ConvergenceTracker {
            settings,
            value: f64::INFINITY,
            error: f64::INFINITY,
        }
    }

    /// Records the estimate of one order and reports whether it is accepted.
    pub(crate) fn update(&mut self, candidate: f64) -> bool {
        self.error = (candidate - self.value).abs();
        self.value = candidate;
        self.settings.is_converged(self.value, self.error)
    }

    pub(crate) fn value(&self) -> f64 {
        self.value
    }

    pub(crate) fn error(&self) -> f64 {
        self.error
    }

    pub(crate) fn converged(&self, order: usize) -> ConvergenceOutcome {
        ConvergenceOutcome::Converged {
            order,
            value: self.value,
            error: self.error,
        }
    }

    /// Exhausted outcome; only warns when the loop had room to escalate.
    pub(crate) fn exhausted(&self, order: usize) -> ConvergenceOutcome {
        if self.settings.max_order > self.settings.min_order {
            tracing::warn!(
                max_order = self.settings.max_order,
                error = self.error,
                "max order ({}) reached. Latest difference = {:e}",
                self.settings.max_order,
                self.error
            );
        }
        ConvergenceOutcome::MaxOrderReached {
            order,
            value: self.value,
            error: self.error,
        }
    }
}
