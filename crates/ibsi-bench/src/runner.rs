//! Benchmark execution with per-case isolation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use ibsi_core::{align_mask_to_image, resample_to_spacing, Image, Mask, PixelType};
use ibsi_io::{read_nifti, read_nifti_mask, write_nifti};
use tracing::{error, info};

use crate::cases::CasePlan;
use crate::extractor::FeatureExtractor;
use crate::mapping::{join_results, read_mapping};
use crate::report::write_report;

/// Where the benchmark finds its inputs and puts its outputs.
///
/// Expected layout under `data_dir`:
/// - `phantom/Phantom.nii` and `phantom/Phantom-label.nii`
/// - `patient/PAT1.nii` and `patient/GTV.nii`
/// - `benchmark/mapping_<case>.csv`
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    pub data_dir: PathBuf,
    pub results_dir: PathBuf,
    /// Dump resampled volumes next to the reports for inspection.
    pub save_resampled: bool,
}

impl BenchmarkConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P, results_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            results_dir: results_dir.as_ref().to_path_buf(),
            save_resampled: false,
        }
    }

    fn mapping_path(&self, plan: &CasePlan) -> PathBuf {
        self.data_dir
            .join("benchmark")
            .join(format!("mapping_{}.csv", plan.id))
    }
}

/// Which cases completed and which failed.
#[derive(Debug, Default)]
pub struct BenchmarkSummary {
    pub completed: Vec<String>,
    pub failed: Vec<String>,
}

fn load_pair<B: Backend>(
    dir: &Path,
    image_name: &str,
    mask_name: &str,
    device: &B::Device,
) -> Result<(Image<B>, Mask<B>)> {
    let image = read_nifti::<B, _>(dir.join(image_name), device)?;
    let mask = read_nifti_mask::<B, _>(dir.join(mask_name), device)?;
    // Headers of shipped masks can disagree with the image by round-off.
    let mask = align_mask_to_image(&mask, &image)?;
    Ok((image, mask))
}

fn run_case<B: Backend, E: FeatureExtractor<B>>(
    config: &BenchmarkConfig,
    plan: &CasePlan,
    image: &Image<B>,
    mask: &Mask<B>,
    extractor: &mut E,
) -> Result<usize> {
    info!(case = %plan.id, "running case");

    let (case_image, case_mask) = match &plan.resampling {
        Some(settings) => resample_to_spacing(image, mask, settings)?,
        None => (image.clone(), mask.clone()),
    };

    if config.save_resampled && plan.resampling.is_some() {
        let image_path = config.results_dir.join(format!("{}_resampled.nii", plan.id));
        write_nifti(&image_path, &case_image)?;
        let mask_image = Image::new(
            case_mask.data().clone(),
            case_mask.grid().clone(),
            PixelType::Float32,
        )?;
        let mask_path = config
            .results_dir
            .join(format!("{}_resampled_mask.nii", plan.id));
        write_nifti(&mask_path, &mask_image)?;
    }

    let mut features = std::collections::BTreeMap::new();
    for profile in &plan.profiles {
        let Some(extracted) = extractor.extract(&case_image, &case_mask, &plan.id, profile)?
        else {
            continue;
        };
        for (name, value) in extracted {
            features.insert(format!("{}{}", profile.prefix, name), value);
        }
    }

    let mapping = read_mapping(config.mapping_path(plan))?;
    let rows = join_results(&mapping, &features);
    write_report(&config.results_dir, &plan.id, &rows)?;

    Ok(rows.len())
}

/// Run the given case plans.
///
/// A failing case is logged and recorded in the summary; its siblings still
/// run. Fails outright only when the shared inputs cannot be loaded.
pub fn run_benchmark<B: Backend, E: FeatureExtractor<B>>(
    config: &BenchmarkConfig,
    plans: &[CasePlan],
    extractor: &mut E,
    device: &B::Device,
) -> Result<BenchmarkSummary> {
    std::fs::create_dir_all(&config.results_dir).with_context(|| {
        format!(
            "failed to create results directory {}",
            config.results_dir.display()
        )
    })?;

    let phantom_pair = if plans.iter().any(|p| p.is_phantom()) {
        Some(
            load_pair::<B>(
                &config.data_dir.join("phantom"),
                "Phantom.nii",
                "Phantom-label.nii",
                device,
            )
            .context("failed to load phantom pair")?,
        )
    } else {
        None
    };

    let patient_pair = if plans.iter().any(|p| !p.is_phantom()) {
        Some(
            load_pair::<B>(
                &config.data_dir.join("patient"),
                "PAT1.nii",
                "GTV.nii",
                device,
            )
            .context("failed to load patient pair")?,
        )
    } else {
        None
    };

    let mut summary = BenchmarkSummary::default();
    for plan in plans {
        let (image, mask) = if plan.is_phantom() {
            phantom_pair.as_ref().expect("phantom pair loaded above")
        } else {
            patient_pair.as_ref().expect("patient pair loaded above")
        };

        match run_case(config, plan, image, mask, extractor) {
            Ok(rows) => {
                info!(case = %plan.id, rows, "case completed");
                summary.completed.push(plan.id.to_string());
            }
            Err(e) => {
                error!(case = %plan.id, error = %format!("{e:#}"), "case failed, continuing");
                summary.failed.push(plan.id.to_string());
            }
        }
    }

    Ok(summary)
}
