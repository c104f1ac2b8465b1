//! Training Run

use crate::dataset::{extract_labels, holdout_split, load_records, HoldoutSplit};
use crate::{TrainingConfig, TrainingError};
use classifier::ClassificationReport;
use feature_engine::{FeatureBuilder, MachineRecord};
use inference_engine::{save_pipeline, FittedPipeline};
use reporting::{bar_chart, barh_chart, pie_chart, render_svg, ChartStyle, TabularSummary, PIE_PALETTE};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of a completed training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub total_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub accuracy: f64,
    pub classification: ClassificationReport,
    pub iterations: usize,
    pub converged: bool,
    pub model_path: PathBuf,
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Trained on {} rows, evaluated on {} ({} total)",
            self.train_rows, self.test_rows, self.total_rows
        )?;
        writeln!(f, "Accuracy: {}", self.accuracy)?;
        writeln!(f, "{}", self.classification)?;
        write!(f, "Model saved as {}", self.model_path.display())
    }
}

/// Execute load -> features -> split -> fit -> evaluate -> persist
pub fn run(config: &TrainingConfig) -> Result<TrainingReport, TrainingError> {
    config.validate()?;

    let records = load_records(&config.data_path)?;
    let labels = extract_labels(&records)?;

    // Reject malformed rows before any fitting work
    FeatureBuilder::fit(&records).build_batch(&records)?;

    if let Some(dir) = &config.report_dir {
        render_reports(&records, dir)?;
    }

    let split = holdout_split(records.len(), config.test_size, config.seed)?;
    let train_records = HoldoutSplit::select_records(&records, &split.train);
    let train_labels = HoldoutSplit::select_labels(&labels, &split.train);
    let test_records = HoldoutSplit::select_records(&records, &split.test);
    let test_labels = HoldoutSplit::select_labels(&labels, &split.test);

    let pipeline = FittedPipeline::fit(&train_records, train_labels.view(), config.pipeline_config())?;
    let classification = pipeline.evaluate(&test_records, test_labels.view())?;
    info!("Holdout accuracy: {:.4}", classification.accuracy);

    let iterations = pipeline.model().iterations();
    let converged = pipeline.model().converged();
    let pipeline = pipeline.with_evaluation(classification.clone());
    save_pipeline(&pipeline, &config.model_path)?;

    Ok(TrainingReport {
        total_rows: records.len(),
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        accuracy: classification.accuracy,
        classification,
        iterations,
        converged,
        model_path: config.model_path.clone(),
    })
}

/// Render the dataset summary charts as SVG files into `dir`
pub fn render_reports(records: &[MachineRecord], dir: &Path) -> Result<Vec<PathBuf>, TrainingError> {
    fs::create_dir_all(dir)?;

    let types = dir.join("type_distribution.svg");
    render_svg(&types, (640, 480), |area| {
        pie_chart(&TabularSummary::count_by_type(records), "Machine type distribution", area)
    })?;

    let failures = dir.join("failures_by_type.svg");
    let failure_style = ChartStyle::new("Type", "Failures", "Machine failures by type", PIE_PALETTE[0]);
    render_svg(&failures, (640, 480), |area| {
        bar_chart(&TabularSummary::failures_by_type(records), &failure_style, area)
    })?;

    let modes = dir.join("failure_modes.svg");
    let mode_style = ChartStyle::new("Count", "Failure mode", "Failure mode occurrences", PIE_PALETTE[1]);
    render_svg(&modes, (640, 480), |area| {
        barh_chart(&TabularSummary::failure_mode_counts(records), &mode_style, area)
    })?;

    info!("Rendered dataset reports into {}", dir.display());
    Ok(vec![types, failures, modes])
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "UDI,Product ID,Type,Air temperature [K],Process temperature [K],Rotational speed [rpm],Torque [Nm],Tool wear [min],Machine failure,TWF,HDF,PWF,OSF,RNF";

    fn workspace(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("trainer-run-{}-{}", std::process::id(), name));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_dataset(dir: &Path, rows: usize) -> PathBuf {
        let mut csv = String::from(HEADER);
        csv.push('\n');
        for i in 0..rows {
            let machine_type = ["L", "M", "H"][i % 3];
            let torque = 20.0 + (i % 50) as f64;
            let failed = u8::from(torque >= 62.0);
            csv.push_str(&format!(
                "{},{}{},{},{:.1},{:.1},{},{:.1},{},{},0,{},0,{},0\n",
                i + 1,
                machine_type,
                14_800 + i,
                machine_type,
                298.0 + (i % 7) as f64 * 0.3,
                308.0 + (i % 5) as f64 * 0.4,
                1400 + (i % 11) * 25,
                torque,
                i % 200,
                failed,
                u8::from(i % 97 == 0),
                failed,
            ));
        }
        let path = dir.join("raw_data.csv");
        fs::write(&path, csv).unwrap();
        path
    }

    fn config(dir: &Path, data: PathBuf, model: &str) -> TrainingConfig {
        TrainingConfig {
            data_path: data,
            model_path: dir.join("model").join(model),
            ..Default::default()
        }
    }

    #[test]
    fn test_run_persists_loadable_artifact() {
        let dir = workspace("persist");
        let data = write_dataset(&dir, 400);
        let report = run(&config(&dir, data, "pipeline.bin")).unwrap();

        assert_eq!(report.total_rows, 400);
        assert_eq!(report.test_rows, 80);
        assert_eq!(report.train_rows, 320);
        assert!(report.accuracy > 0.9, "accuracy {}", report.accuracy);

        let loaded = inference_engine::load_pipeline(&report.model_path).unwrap();
        assert_eq!(loaded.metadata().training_rows, 320);
        assert_eq!(loaded.metadata().evaluation.as_ref(), Some(&report.classification));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_same_seed_reproduces_metrics() {
        let dir = workspace("determinism");
        let data = write_dataset(&dir, 300);
        let first = run(&config(&dir, data.clone(), "a.bin")).unwrap();
        let second = run(&config(&dir, data, "b.bin")).unwrap();

        assert_eq!(first.accuracy.to_bits(), second.accuracy.to_bits());
        assert_eq!(first.classification, second.classification);
        for (a, b) in first.classification.classes.iter().zip(&second.classification.classes) {
            assert_eq!(a.precision.to_bits(), b.precision.to_bits());
            assert_eq!(a.recall.to_bits(), b.recall.to_bits());
        }

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_strong_regularization_persists_finite_model() {
        let dir = workspace("strong-l2");
        let data = write_dataset(&dir, 200);
        let cfg = TrainingConfig {
            regularization: 0.01,
            ..config(&dir, data, "strong.bin")
        };
        let report = run(&cfg).unwrap();

        let loaded = inference_engine::load_pipeline(&report.model_path).unwrap();
        assert!(loaded.model().intercept().is_finite());
        assert!(loaded.model().weights().iter().all(|w| w.is_finite()));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_bad_product_code_aborts_before_persist() {
        let dir = workspace("badcode");
        let data = dir.join("raw_data.csv");
        fs::write(
            &data,
            format!(
                "{}\n1,M14860,M,298.1,308.6,1551,42.8,0,0,0,0,0,0,0\n2,??,L,298.2,308.7,1408,46.3,3,1,0,0,0,1,0\n",
                HEADER
            ),
        )
        .unwrap();
        let cfg = config(&dir, data, "never.bin");

        let err = run(&cfg).unwrap_err();
        assert!(matches!(err, TrainingError::Feature(_)));
        assert!(!cfg.model_path.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_input_aborts() {
        let dir = workspace("missing");
        let cfg = config(&dir, dir.join("absent.csv"), "never.bin");
        assert!(matches!(run(&cfg), Err(TrainingError::Dataset { .. })));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_render_reports_writes_charts() {
        let dir = workspace("reports");
        let data = write_dataset(&dir, 60);
        let records = load_records(&data).unwrap();
        let files = render_reports(&records, &dir.join("reports")).unwrap();

        assert_eq!(files.len(), 3);
        for file in files {
            let svg = fs::read_to_string(&file).unwrap();
            assert!(svg.contains("<svg"));
        }

        let _ = fs::remove_dir_all(&dir);
    }
}
