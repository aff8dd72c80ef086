use std::f64::consts::PI;

use nalgebra::DVector;

const MAX_NEWTON_ITERATIONS: usize = 100;

// ─────────────────────────────────────────────────────────────────────────────
// GaussLegendreRule
// ─────────────────────────────────────────────────────────────────────────────
//
// Nodes are the roots of P_n, found by Newton iteration from the Tricomi
// initial guess cos(π(i + 3/4)/(n + 1/2)). P_n and P_n' come from the
// three-term recurrence
//
//   j·P_j(x) = (2j - 1)·x·P_{j-1}(x) - (j - 1)·P_{j-2}(x)
//   P_n'(x)  = n·(x·P_n(x) - P_{n-1}(x)) / (x² - 1)
//
// and the weights are w_i = 2 / ((1 - x_i²)·P_n'(x_i)²).
// Only the non-negative half is solved; the rule is symmetric about 0.

/// n-point Gauss–Legendre rule on [-1, 1], nodes in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussLegendreRule {
    nodes: DVector<f64>,
    weights: DVector<f64>,
}

impl GaussLegendreRule {
    /// Returns `None` for `order == 0`.
    pub fn new(order: usize) -> Option<GaussLegendreRule> {
        if order == 0 {
            return None;
        }

        let n = order as f64;
        let mut nodes = DVector::<f64>::zeros(order);
        let mut weights = DVector::<f64>::zeros(order);

        for i in 0..(order + 1) / 2 {
            let mut z = (PI * (i as f64 + 0.75) / (n + 0.5)).cos();
            let mut dp = legendre_with_derivative(order, z).1;
            for _ in 0..MAX_NEWTON_ITERATIONS {
                let (p, d) = legendre_with_derivative(order, z);
                dp = d;
                let step = p / d;
                z -= step;
                if step.abs() <= f64::EPSILON * z.abs().max(1.0) {
                    dp = legendre_with_derivative(order, z).1;
                    break;
                }
            }
            let w = 2.0 / ((1.0 - z * z) * dp * dp);
            nodes[i] = -z;
            nodes[order - 1 - i] = z;
            weights[i] = w;
            weights[order - 1 - i] = w;
        }

        // the middle node of an odd rule is exactly zero
        if order % 2 == 1 {
            nodes[order / 2] = 0.0;
        }

        Some(GaussLegendreRule { nodes, weights })
    }

    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &DVector<f64> {
        &self.nodes
    }

    pub fn weights(&self) -> &DVector<f64> {
        &self.weights
    }

    /// Affine map of the rule onto [a, b]: x ↦ (b - a)(x + 1)/2 + a, with the
    /// weights multiplied by the Jacobian (b - a)/2.
    pub fn rescale(&self, a: f64, b: f64) -> (DVector<f64>, DVector<f64>) {
        let half_width = (b - a) / 2.0;
        let points = self.nodes.map(|x| half_width * (x + 1.0) + a);
        let weights = self.weights.map(|w| half_width * w);
        (points, weights)
    }
}

/// Evaluates (P_n(x), P_n'(x)).
fn legendre_with_derivative(order: usize, x: f64) -> (f64, f64) {
    let mut p_curr = 1.0;
    let mut p_prev = 0.0;
    for j in 1..=order {
        let jf = j as f64;
        let p_next = ((2.0 * jf - 1.0) * x * p_curr - (jf - 1.0) * p_prev) / jf;
        p_prev = p_curr;
        p_curr = p_next;
    }
    let derivative = order as f64 * (x * p_curr - p_prev) / (x * x - 1.0);
    (p_curr, derivative)
}
