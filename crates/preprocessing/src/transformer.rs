//! Column Transformer
//!
//! Combines the numeric scaler, the machine type indicators and the quality
//! encoder into one transform over feature rows.

use crate::{OneHotEncoder, PreprocessError, StandardScaler};
use feature_engine::{FeatureRow, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS, NUMERIC_DIMENSION};
use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Unfitted preprocessing configuration.
///
/// Fitting consumes it and yields a [`FittedPreprocessor`]; only the fitted
/// form can transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    /// Pass machine type indicators through to the output matrix
    pub passthrough_indicators: bool,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            passthrough_indicators: true,
        }
    }
}

impl Preprocessor {
    /// Create a preprocessor with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn scaling parameters and the quality vocabulary
    pub fn fit(self, rows: &[FeatureRow]) -> Result<FittedPreprocessor, PreprocessError> {
        let first = rows.first().ok_or(PreprocessError::EmptyInput)?;

        let type_categories: Vec<String> = if self.passthrough_indicators {
            first.type_indicators.iter().map(|(name, _)| name.clone()).collect()
        } else {
            Vec::new()
        };

        let numeric = numeric_matrix(rows);
        let scaler = StandardScaler::fit(&NUMERIC_COLUMNS, numeric.view())?;
        let quality = OneHotEncoder::fit(
            CATEGORICAL_COLUMNS[0],
            rows.iter().map(|r| r.product_quality.as_str()),
        )?;

        let fitted = FittedPreprocessor {
            scaler,
            type_categories,
            quality,
        };
        info!(
            "Fitted preprocessor on {} rows, {} output features",
            rows.len(),
            fitted.output_dimension()
        );
        Ok(fitted)
    }

    /// Fit and transform the same rows
    pub fn fit_transform(
        self,
        rows: &[FeatureRow],
    ) -> Result<(FittedPreprocessor, Array2<f64>), PreprocessError> {
        let fitted = self.fit(rows)?;
        let matrix = fitted.transform(rows)?;
        Ok((fitted, matrix))
    }
}

/// Preprocessing with learned parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPreprocessor {
    scaler: StandardScaler,
    type_categories: Vec<String>,
    quality: OneHotEncoder,
}

impl FittedPreprocessor {
    /// Transform feature rows into the classifier input matrix.
    ///
    /// Column layout: scaled numeric, type indicators, quality one-hot.
    pub fn transform(&self, rows: &[FeatureRow]) -> Result<Array2<f64>, PreprocessError> {
        let n_numeric = NUMERIC_DIMENSION;
        let n_types = self.type_categories.len();
        let n_quality = self.quality.categories().len();

        let scaled = self.scaler.transform(numeric_matrix(rows).view())?;
        let quality = self
            .quality
            .transform(rows.iter().map(|r| r.product_quality.as_str()));

        let mut out = Array2::zeros((rows.len(), self.output_dimension()));
        out.slice_mut(s![.., ..n_numeric]).assign(&scaled);

        if n_types > 0 {
            for (i, row) in rows.iter().enumerate() {
                if row.type_indicators.len() != n_types {
                    return Err(PreprocessError::WidthMismatch {
                        what: "type indicator",
                        expected: n_types,
                        actual: row.type_indicators.len(),
                    });
                }
                let names_match = row
                    .type_indicators
                    .iter()
                    .zip(&self.type_categories)
                    .all(|((name, _), fitted)| name == fitted);
                if !names_match {
                    return Err(PreprocessError::CategoryMismatch {
                        expected: self.type_categories.clone(),
                        actual: row.type_indicators.iter().map(|(name, _)| name.clone()).collect(),
                    });
                }
                for (j, (_, value)) in row.type_indicators.iter().enumerate() {
                    out[[i, n_numeric + j]] = *value;
                }
            }
        }

        out.slice_mut(s![.., n_numeric + n_types..n_numeric + n_types + n_quality])
            .assign(&quality);
        Ok(out)
    }

    /// Number of output columns
    pub fn output_dimension(&self) -> usize {
        NUMERIC_DIMENSION + self.type_categories.len() + self.quality.categories().len()
    }

    /// Output column names in matrix order
    pub fn feature_names(&self) -> Vec<String> {
        NUMERIC_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.type_categories.iter().cloned())
            .chain(self.quality.feature_names())
            .collect()
    }

    /// Fitted numeric scaler
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Fitted quality encoder
    pub fn quality_encoder(&self) -> &OneHotEncoder {
        &self.quality
    }
}

fn numeric_matrix(rows: &[FeatureRow]) -> Array2<f64> {
    let mut matrix = Array2::zeros((rows.len(), NUMERIC_DIMENSION));
    for (i, row) in rows.iter().enumerate() {
        for (j, value) in row.numeric_values().into_iter().enumerate() {
            matrix[[i, j]] = value;
        }
    }
    matrix
}
