//! One-Hot Encoding

use crate::PreprocessError;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// One-hot encoder for a single categorical column.
///
/// Categories unseen at fit time encode as an all-zero row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    column: String,
    categories: Vec<String>,
}

impl OneHotEncoder {
    /// Learn the sorted category vocabulary
    pub fn fit<'a, I>(column: &str, values: I) -> Result<Self, PreprocessError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let categories: BTreeSet<&str> = values.into_iter().collect();
        if categories.is_empty() {
            return Err(PreprocessError::EmptyInput);
        }
        debug!("Fitted one-hot encoder for {} with {:?}", column, categories);
        Ok(Self {
            column: column.to_string(),
            categories: categories.into_iter().map(str::to_string).collect(),
        })
    }

    /// Encode a single value
    pub fn encode(&self, value: &str) -> Vec<f64> {
        self.categories
            .iter()
            .map(|c| if c == value { 1.0 } else { 0.0 })
            .collect()
    }

    /// Encode a batch of values into a `(n, categories)` matrix
    pub fn transform<'a, I>(&self, values: I) -> Array2<f64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let values: Vec<&str> = values.into_iter().collect();
        let mut out = Array2::zeros((values.len(), self.categories.len()));
        let mut unknown = 0usize;
        for (row, value) in values.iter().enumerate() {
            match self.categories.iter().position(|c| c == value) {
                Some(col) => out[[row, col]] = 1.0,
                None => unknown += 1,
            }
        }
        if unknown > 0 {
            debug!("{} unknown {} value(s) encoded as zeros", unknown, self.column);
        }
        out
    }

    /// Learned categories
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Output column names, `<column>_<category>`
    pub fn feature_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|c| format!("{}_{}", self.column, c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fit_sorted_unique() {
        let enc = OneHotEncoder::fit("q", ["M", "L", "M", "H"]).unwrap();
        assert_eq!(enc.categories(), &["H", "L", "M"]);
        assert_eq!(enc.feature_names(), vec!["q_H", "q_L", "q_M"]);
    }

    #[test]
    fn test_encode_known_and_unknown() {
        let enc = OneHotEncoder::fit("q", ["L", "M", "H"]).unwrap();
        assert_eq!(enc.encode("L"), vec![0.0, 1.0, 0.0]);
        assert_eq!(enc.encode("Z"), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_transform_batch() {
        let enc = OneHotEncoder::fit("q", ["L", "H"]).unwrap();
        let out = enc.transform(["H", "Q", "L"]);
        assert_eq!(out.shape(), &[3, 2]);
        assert_eq!(out.row(0).to_vec(), vec![1.0, 0.0]);
        assert_eq!(out.row(1).to_vec(), vec![0.0, 0.0]);
        assert_eq!(out.row(2).to_vec(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_empty_fit_rejected() {
        let values: [&str; 0] = [];
        assert_eq!(OneHotEncoder::fit("q", values), Err(PreprocessError::EmptyInput));
    }

    proptest! {
        #[test]
        fn prop_rows_are_one_hot_or_zero(
            fitted in prop::collection::vec("[A-E]", 1..8),
            queried in prop::collection::vec("[A-H]", 0..16),
        ) {
            let enc = OneHotEncoder::fit("q", fitted.iter().map(String::as_str)).unwrap();
            let out = enc.transform(queried.iter().map(String::as_str));

            prop_assert_eq!(out.nrows(), queried.len());
            for (row, value) in out.rows().into_iter().zip(&queried) {
                let sum = row.sum();
                prop_assert!(row.iter().all(|&v| v == 0.0 || v == 1.0));
                prop_assert_eq!(sum, if fitted.contains(value) { 1.0 } else { 0.0 });
            }
        }
    }
}
