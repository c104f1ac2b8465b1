//! Standard Scaling

use crate::PreprocessError;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Zero-mean, unit-variance scaling per column.
///
/// Uses the population standard deviation. Columns with zero variance keep a
/// scale of 1.0 so they transform to zero instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    columns: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
    /// Observed training range, used to report extrapolation
    min: Vec<f64>,
    max: Vec<f64>,
}

impl StandardScaler {
    /// Learn per-column mean and scale
    pub fn fit(columns: &[&str], data: ArrayView2<'_, f64>) -> Result<Self, PreprocessError> {
        if data.nrows() == 0 {
            return Err(PreprocessError::EmptyInput);
        }
        if data.ncols() != columns.len() {
            return Err(PreprocessError::WidthMismatch {
                what: "numeric",
                expected: columns.len(),
                actual: data.ncols(),
            });
        }
        check_finite(columns, data)?;

        let mean = data.mean_axis(Axis(0)).ok_or(PreprocessError::EmptyInput)?;
        let scale = data
            .var_axis(Axis(0), 0.0)
            .mapv(|variance| if variance > 0.0 { variance.sqrt() } else { 1.0 });
        let min = data.fold_axis(Axis(0), f64::INFINITY, |&acc, &v| acc.min(v));
        let max = data.fold_axis(Axis(0), f64::NEG_INFINITY, |&acc, &v| acc.max(v));

        debug!("Fitted standard scaler on {} rows x {} columns", data.nrows(), data.ncols());

        Ok(Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            mean: mean.to_vec(),
            scale: scale.to_vec(),
            min: min.to_vec(),
            max: max.to_vec(),
        })
    }

    /// Apply the learned scaling.
    ///
    /// Values outside the training range are extrapolated, not clipped.
    pub fn transform(&self, data: ArrayView2<'_, f64>) -> Result<Array2<f64>, PreprocessError> {
        if data.ncols() != self.columns.len() {
            return Err(PreprocessError::WidthMismatch {
                what: "numeric",
                expected: self.columns.len(),
                actual: data.ncols(),
            });
        }
        let names: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        check_finite(&names, data)?;

        for (idx, column) in self.columns.iter().enumerate() {
            let outside = data
                .column(idx)
                .iter()
                .filter(|&&v| v < self.min[idx] || v > self.max[idx])
                .count();
            if outside > 0 {
                debug!(
                    "{} value(s) of {} outside training range [{}, {}]",
                    outside, column, self.min[idx], self.max[idx]
                );
            }
        }

        let mean = Array1::from(self.mean.clone());
        let scale = Array1::from(self.scale.clone());
        Ok((&data - &mean) / &scale)
    }

    /// Column names in fit order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Learned means
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Learned scales (standard deviations)
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Training range of a column
    pub fn range(&self, idx: usize) -> Option<(f64, f64)> {
        Some((*self.min.get(idx)?, *self.max.get(idx)?))
    }
}

fn check_finite(columns: &[&str], data: ArrayView2<'_, f64>) -> Result<(), PreprocessError> {
    for ((_, col), &value) in data.indexed_iter() {
        if !value.is_finite() {
            return Err(PreprocessError::NonFinite {
                column: columns.get(col).unwrap_or(&"?").to_string(),
                value,
            });
        }
    }
    Ok(())
}
