//! Feature Row Assembly

use crate::product::ProductCode;
use crate::record::{FailureModes, MachineRecord};
use crate::FeatureError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Number of numeric columns in a feature row
pub const NUMERIC_DIMENSION: usize = 11;

/// Numeric columns, in the order returned by [`FeatureRow::numeric_values`]
pub const NUMERIC_COLUMNS: [&str; NUMERIC_DIMENSION] = [
    "Air temperature [K]",
    "Process temperature [K]",
    "Rotational speed [rpm]",
    "Torque [Nm]",
    "Tool wear [min]",
    "TWF",
    "HDF",
    "PWF",
    "OSF",
    "RNF",
    "product_serial",
];

/// Categorical columns that still need encoding downstream
pub const CATEGORICAL_COLUMNS: [&str; 1] = ["product_quality"];

/// One record after feature construction.
///
/// The identifier, the label and the composite product code are gone; the
/// machine type is one-hot expanded against the builder's vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Machine type indicators, one per known category, in vocabulary order
    pub type_indicators: Vec<(String, f64)>,
    /// Quality letter from the product code
    pub product_quality: String,
    /// Serial number from the product code
    pub product_serial: u64,
    pub air_temperature: f64,
    pub process_temperature: f64,
    pub rotational_speed: f64,
    pub torque: f64,
    pub tool_wear: f64,
    pub failure_modes: FailureModes,
}

impl FeatureRow {
    /// Numeric columns in [`NUMERIC_COLUMNS`] order
    pub fn numeric_values(&self) -> [f64; NUMERIC_DIMENSION] {
        let [twf, hdf, pwf, osf, rnf] = self.failure_modes.as_array();
        [
            self.air_temperature,
            self.process_temperature,
            self.rotational_speed,
            self.torque,
            self.tool_wear,
            f64::from(twf),
            f64::from(hdf),
            f64::from(pwf),
            f64::from(osf),
            f64::from(rnf),
            self.product_serial as f64,
        ]
    }

    /// Value of a numeric column by name
    pub fn numeric(&self, column: &str) -> Option<f64> {
        NUMERIC_COLUMNS
            .iter()
            .position(|&name| name == column)
            .map(|idx| self.numeric_values()[idx])
    }

    /// Value of a type indicator column by category name
    pub fn indicator(&self, category: &str) -> Option<f64> {
        self.type_indicators
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, value)| *value)
    }

    /// Type indicator values in vocabulary order
    pub fn indicator_values(&self) -> Vec<f64> {
        self.type_indicators.iter().map(|(_, value)| *value).collect()
    }
}

/// Builds feature rows from raw records.
///
/// Holds the machine type vocabulary learned at fit time so that training and
/// serving produce the same indicator columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureBuilder {
    type_categories: Vec<String>,
}

impl FeatureBuilder {
    /// Learn the machine type vocabulary from training records
    pub fn fit(records: &[MachineRecord]) -> Self {
        let categories: BTreeSet<&str> = records
            .iter()
            .map(|r| r.machine_type.as_str())
            .collect();
        let builder = Self::with_categories(categories);
        debug!("Fitted feature builder with type categories {:?}", builder.type_categories);
        builder
    }

    /// Create a builder with an explicit type vocabulary (sorted, de-duplicated)
    pub fn with_categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = categories.into_iter().map(Into::into).collect();
        Self {
            type_categories: set.into_iter().collect(),
        }
    }

    /// Known machine type categories, in indicator column order
    pub fn type_categories(&self) -> &[String] {
        &self.type_categories
    }

    /// Build the feature row for a single record
    pub fn build(&self, record: &MachineRecord) -> Result<FeatureRow, FeatureError> {
        ensure_finite("Air temperature [K]", record.air_temperature)?;
        ensure_finite("Process temperature [K]", record.process_temperature)?;
        ensure_finite("Rotational speed [rpm]", record.rotational_speed)?;
        ensure_finite("Torque [Nm]", record.torque)?;
        ensure_finite("Tool wear [min]", record.tool_wear)?;

        let product_id = record
            .product_id
            .as_deref()
            .ok_or(FeatureError::MissingField("Product ID"))?;
        let product = ProductCode::parse(product_id)?;

        let type_indicators: Vec<(String, f64)> = self
            .type_categories
            .iter()
            .map(|category| {
                let hit = if *category == record.machine_type { 1.0 } else { 0.0 };
                (category.clone(), hit)
            })
            .collect();

        if !self.type_categories.contains(&record.machine_type) {
            debug!(
                "Unseen machine type {:?}, encoding as all-zero indicators",
                record.machine_type
            );
        }

        Ok(FeatureRow {
            type_indicators,
            product_quality: product.quality_label(),
            product_serial: product.serial,
            air_temperature: record.air_temperature,
            process_temperature: record.process_temperature,
            rotational_speed: record.rotational_speed,
            torque: record.torque,
            tool_wear: record.tool_wear,
            failure_modes: record.failure_modes(),
        })
    }

    /// Build feature rows for a batch, failing on the first bad record
    pub fn build_batch(&self, records: &[MachineRecord]) -> Result<Vec<FeatureRow>, FeatureError> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                self.build(record).map_err(|source| FeatureError::Row {
                    index,
                    source: Box::new(source),
                })
            })
            .collect()
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), FeatureError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FeatureError::NonFiniteValue { field, value })
    }
}
