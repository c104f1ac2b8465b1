//! Dataset Loading and Holdout Split

use crate::TrainingError;
use feature_engine::MachineRecord;
use ndarray::{Array1, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use tracing::{debug, info};

/// Read every record from a CSV file with a header row
pub fn load_records(path: &Path) -> Result<Vec<MachineRecord>, TrainingError> {
    let dataset_err = |source| TrainingError::Dataset {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(dataset_err)?;
    let records: Vec<MachineRecord> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .map_err(dataset_err)?;

    if records.is_empty() {
        return Err(TrainingError::EmptyDataset(path.to_path_buf()));
    }
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// `Machine failure` labels for every record
pub fn extract_labels(records: &[MachineRecord]) -> Result<Array1<u8>, TrainingError> {
    records
        .iter()
        .enumerate()
        .map(|(row, record)| {
            record
                .machine_failure
                .ok_or(TrainingError::MissingLabel { row })
        })
        .collect()
}

/// Disjoint train/test index sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldoutSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl HoldoutSplit {
    /// Records at the given indices
    pub fn select_records(records: &[MachineRecord], indices: &[usize]) -> Vec<MachineRecord> {
        indices.iter().map(|&i| records[i].clone()).collect()
    }

    /// Labels at the given indices
    pub fn select_labels(labels: &Array1<u8>, indices: &[usize]) -> Array1<u8> {
        labels.select(Axis(0), indices)
    }
}

/// Shuffle `0..n` with a seeded RNG; the first `ceil(test_size * n)` indices
/// form the test set.
pub fn holdout_split(n: usize, test_size: f64, seed: u64) -> Result<HoldoutSplit, TrainingError> {
    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(TrainingError::InvalidConfig(format!(
            "test_size {} leaves an empty partition for {} records",
            test_size, n
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    debug!("Holdout split: {} train / {} test (seed {})", train.len(), indices.len(), seed);
    Ok(HoldoutSplit {
        train,
        test: indices,
    })
}
