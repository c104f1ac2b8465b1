//! Logistic Regression

use crate::ClassifierError;
use ndarray::{Array1, ArrayView1, ArrayView2, Zip};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Probability above which a row is labelled positive
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Optimizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticConfig {
    /// Iteration cap for gradient descent
    pub max_iter: usize,
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Stop once the largest gradient component falls below this
    pub tolerance: f64,
    /// Inverse L2 regularization strength (larger = weaker penalty)
    pub regularization: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            learning_rate: 0.5,
            tolerance: 1e-4,
            regularization: 1.0,
        }
    }
}

/// Unfitted logistic regression estimator
#[derive(Debug, Clone, Default)]
pub struct LogisticRegression {
    config: LogisticConfig,
}

impl LogisticRegression {
    /// Create an estimator with the given optimizer settings
    pub fn new(config: LogisticConfig) -> Self {
        Self { config }
    }

    /// Fit weights and intercept on `x` (rows = samples) and binary labels `y`.
    ///
    /// Runs at most `max_iter` full-batch steps. Hitting the cap is not an
    /// error; the last iterate is returned with `converged == false`.
    ///
    /// The step size is capped at `1 / L`, where `L` bounds the Lipschitz
    /// constant of the penalized gradient, so the iterates cannot diverge.
    pub fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, u8>,
    ) -> Result<LogisticModel, ClassifierError> {
        let (n, d) = x.dim();
        if n == 0 {
            return Err(ClassifierError::EmptyInput);
        }
        if y.len() != n {
            return Err(ClassifierError::ShapeMismatch {
                expected: format!("{} labels", n),
                actual: format!("{} labels", y.len()),
            });
        }
        if let Some(&bad) = y.iter().find(|&&label| label > 1) {
            return Err(ClassifierError::InvalidLabel(bad));
        }
        let positives = y.iter().filter(|&&label| label == 1).count();
        if positives == 0 || positives == n {
            return Err(ClassifierError::SingleClass(y[0]));
        }

        if x.iter().any(|v| !v.is_finite()) {
            return Err(ClassifierError::NonFinite("input"));
        }

        let targets = y.mapv(f64::from);
        let n_f = n as f64;
        let penalty = 1.0 / (self.config.regularization * n_f);

        // Intercept is an implicit column of ones
        let frobenius_sq = x.iter().map(|v| v * v).sum::<f64>() + n_f;
        let lipschitz = 0.25 * frobenius_sq / n_f + penalty;
        let lr = self.config.learning_rate.min(1.0 / lipschitz);
        if lr < self.config.learning_rate {
            debug!(
                "Learning rate capped from {} to {:.6} (Lipschitz bound {:.4})",
                self.config.learning_rate, lr, lipschitz
            );
        }

        let mut weights = Array1::<f64>::zeros(d);
        let mut intercept = 0.0;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iter {
            let mut residual = x.dot(&weights);
            residual.mapv_inplace(|z| sigmoid(z + intercept));
            residual -= &targets;

            let grad_w = x.t().dot(&residual) / n_f + &weights * penalty;
            let grad_b = residual.sum() / n_f;

            let grad_norm = grad_w
                .iter()
                .fold(grad_b.abs(), |acc, g| acc.max(g.abs()));
            if grad_norm < self.config.tolerance {
                converged = true;
                break;
            }

            weights.scaled_add(-lr, &grad_w);
            intercept -= lr * grad_b;
            iterations += 1;
        }

        if !intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(ClassifierError::NonFinite("weights"));
        }

        let model = LogisticModel {
            weights: weights.to_vec(),
            intercept,
            iterations,
            converged,
        };

        if converged {
            info!("Logistic regression converged after {} iterations", iterations);
        } else {
            warn!(
                "Logistic regression did not converge within {} iterations; using last iterate",
                self.config.max_iter
            );
        }
        debug!("Training log-loss: {:.6}", model.log_loss(x, y)?);

        Ok(model)
    }
}

/// Fitted logistic regression weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    weights: Vec<f64>,
    intercept: f64,
    iterations: usize,
    converged: bool,
}

impl LogisticModel {
    /// Build a model from known parameters
    pub fn from_parameters(weights: Vec<f64>, intercept: f64) -> Self {
        Self {
            weights,
            intercept,
            iterations: 0,
            converged: true,
        }
    }

    /// Linear score `x·w + b` per row
    pub fn decision_function(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, ClassifierError> {
        if x.ncols() != self.weights.len() {
            return Err(ClassifierError::ShapeMismatch {
                expected: format!("{} features", self.weights.len()),
                actual: format!("{} features", x.ncols()),
            });
        }
        let weights = ArrayView1::from(&self.weights[..]);
        Ok(x.dot(&weights) + self.intercept)
    }

    /// Positive-class probability per row
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, ClassifierError> {
        Ok(self.decision_function(x)?.mapv(sigmoid))
    }

    /// Binary label per row
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<u8>, ClassifierError> {
        Ok(self
            .predict_proba(x)?
            .mapv(|p| u8::from(p > DECISION_THRESHOLD)))
    }

    /// Mean binary cross-entropy of the model on labelled data
    pub fn log_loss(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, u8>) -> Result<f64, ClassifierError> {
        let proba = self.predict_proba(x)?;
        if proba.len() != y.len() {
            return Err(ClassifierError::ShapeMismatch {
                expected: format!("{} labels", proba.len()),
                actual: format!("{} labels", y.len()),
            });
        }
        let eps = 1e-15;
        let mut total = 0.0;
        Zip::from(&proba).and(&y).for_each(|&p, &label| {
            let p = p.clamp(eps, 1.0 - eps);
            total -= if label == 1 { p.ln() } else { (1.0 - p).ln() };
        });
        Ok(total / proba.len().max(1) as f64)
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Gradient steps taken during fit
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Whether the gradient tolerance was reached before the cap
    pub fn converged(&self) -> bool {
        self.converged
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
