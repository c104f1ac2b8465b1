//! Evaluation Metrics

use crate::ClassifierError;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of predictions equal to the true label
pub fn accuracy_score(
    y_true: ArrayView1<'_, u8>,
    y_pred: ArrayView1<'_, u8>,
) -> Result<f64, ClassifierError> {
    check_lengths(y_true, y_pred)?;
    if y_true.is_empty() {
        return Ok(0.0);
    }
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Precision, recall and F1 for one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: u8,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Averaged metrics across classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Per-class and averaged scores for a binary classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Metrics for label 0 then label 1
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
    pub total_support: usize,
}

impl ClassificationReport {
    /// Score predictions against true labels.
    ///
    /// Scores whose denominator is zero are reported as 0.0.
    pub fn compute(
        y_true: ArrayView1<'_, u8>,
        y_pred: ArrayView1<'_, u8>,
    ) -> Result<Self, ClassifierError> {
        let accuracy = accuracy_score(y_true, y_pred)?;

        let classes: Vec<ClassMetrics> = [0u8, 1]
            .into_iter()
            .map(|label| class_metrics(label, y_true, y_pred))
            .collect();

        let total_support: usize = classes.iter().map(|c| c.support).sum();
        let n_classes = classes.len() as f64;

        let macro_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n_classes,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / n_classes,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / n_classes,
        };

        let weight = |c: &ClassMetrics| c.support as f64 / total_support.max(1) as f64;
        let weighted_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision * weight(c)).sum(),
            recall: classes.iter().map(|c| c.recall * weight(c)).sum(),
            f1: classes.iter().map(|c| c.f1 * weight(c)).sum(),
        };

        Ok(Self {
            classes,
            accuracy,
            macro_avg,
            weighted_avg,
            total_support,
        })
    }

    /// Metrics for a single label
    pub fn class(&self, label: u8) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.label == label)
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12} {:>9} {:>9} {:>9} {:>9}", "", "precision", "recall", "f1-score", "support")?;
        writeln!(f)?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.total_support
        )?;
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1, self.total_support
            )?;
        }
        Ok(())
    }
}

fn class_metrics(label: u8, y_true: ArrayView1<'_, u8>, y_pred: ArrayView1<'_, u8>) -> ClassMetrics {
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut fn_ = 0usize;
    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        match (t == label, p == label) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (false, false) => {}
        }
    }

    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    ClassMetrics {
        label,
        precision,
        recall,
        f1,
        support: tp + fn_,
    }
}

fn check_lengths(y_true: ArrayView1<'_, u8>, y_pred: ArrayView1<'_, u8>) -> Result<(), ClassifierError> {
    if y_true.len() != y_pred.len() {
        return Err(ClassifierError::ShapeMismatch {
            expected: format!("{} predictions", y_true.len()),
            actual: format!("{} predictions", y_pred.len()),
        });
    }
    Ok(())
}
