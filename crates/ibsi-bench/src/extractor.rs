//! Feature-extraction seam.
//!
//! The benchmark treats the extraction engine as an opaque oracle behind
//! [`FeatureExtractor`]. The shipped implementation reads the engine's
//! per-profile CSV output from disk; a live engine binding would implement
//! the same trait.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use ibsi_core::{Image, Mask};
use tracing::{debug, info};

use crate::cases::{CaseId, ExtractionProfile};

/// A single extracted feature value.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Scalar(f64),
    List(Vec<f64>),
}

impl FeatureValue {
    /// The scalar value, if this is one.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            FeatureValue::Scalar(v) => Some(*v),
            FeatureValue::List(_) => None,
        }
    }
}

/// Parse an engine value string: either a plain number or a bracketed list
/// like `[1.0, 2.0, 3.0]` (comma- or whitespace-separated).
///
/// Returns `None` for anything else, such as provenance strings.
pub fn parse_feature_value(raw: &str) -> Option<FeatureValue> {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<f64>() {
        return Some(FeatureValue::Scalar(v));
    }
    let inner = raw.strip_prefix('[')?.strip_suffix(']')?;
    let mut values = Vec::new();
    for token in inner.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        values.push(token.parse::<f64>().ok()?);
    }
    Some(FeatureValue::List(values))
}

/// Extracts features from a (possibly resampled) image/mask pair.
///
/// `Ok(None)` means the profile produced no output for this case and is
/// skipped, mirroring how absent engine configurations are treated.
pub trait FeatureExtractor<B: Backend> {
    fn extract(
        &mut self,
        image: &Image<B>,
        mask: &Mask<B>,
        case: &CaseId,
        profile: &ExtractionProfile,
    ) -> Result<Option<BTreeMap<String, FeatureValue>>>;
}

/// Extractor that reads precomputed engine output.
///
/// Expects one CSV per case and profile at
/// `<engine_dir>/<case>_<prefix>.csv` (trailing underscore dropped, e.g.
/// `phantom_2D_Combined.csv`) with `feature,value` columns. Values that are
/// neither numbers nor bracketed number lists are skipped.
pub struct PrecomputedExtractor {
    engine_dir: PathBuf,
}

impl PrecomputedExtractor {
    pub fn new<P: AsRef<Path>>(engine_dir: P) -> Self {
        Self {
            engine_dir: engine_dir.as_ref().to_path_buf(),
        }
    }

    fn output_path(&self, case: &CaseId, profile: &ExtractionProfile) -> PathBuf {
        let prefix = profile.prefix.trim_end_matches('_');
        self.engine_dir.join(format!("{case}_{prefix}.csv"))
    }
}

impl<B: Backend> FeatureExtractor<B> for PrecomputedExtractor {
    fn extract(
        &mut self,
        _image: &Image<B>,
        _mask: &Mask<B>,
        case: &CaseId,
        profile: &ExtractionProfile,
    ) -> Result<Option<BTreeMap<String, FeatureValue>>> {
        let path = self.output_path(case, profile);
        if !path.exists() {
            info!(case = %case, profile = %profile.params_file, "no engine output, skipping profile");
            return Ok(None);
        }

        let mut reader = csv::Reader::from_path(&path)
            .with_context(|| format!("failed to open engine output {}", path.display()))?;

        let mut features = BTreeMap::new();
        for record in reader.records() {
            let record = record
                .with_context(|| format!("malformed engine output {}", path.display()))?;
            let name = record.get(0).unwrap_or_default();
            let raw = record.get(1).unwrap_or_default();
            match parse_feature_value(raw) {
                Some(value) => {
                    features.insert(name.to_string(), value);
                }
                None => {
                    debug!(feature = name, "skipping non-numeric engine value");
                }
            }
        }

        Ok(Some(features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_scalar() {
        assert_eq!(parse_feature_value("3.25"), Some(FeatureValue::Scalar(3.25)));
        assert_eq!(parse_feature_value(" -7 "), Some(FeatureValue::Scalar(-7.0)));
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_feature_value("[1.0, 2.5, -3.0]"),
            Some(FeatureValue::List(vec![1.0, 2.5, -3.0]))
        );
        // numpy-style whitespace separation
        assert_eq!(
            parse_feature_value("[1. 2. 3.]"),
            Some(FeatureValue::List(vec![1.0, 2.0, 3.0]))
        );
        assert_eq!(parse_feature_value("[]"), Some(FeatureValue::List(vec![])));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(parse_feature_value("v3.0.1"), None);
        assert_eq!(parse_feature_value("[1.0, oops]"), None);
        assert_eq!(parse_feature_value("{'a': 1}"), None);
    }

    fn unit_pair() -> (
        Image<burn_ndarray::NdArray<f32>>,
        Mask<burn_ndarray::NdArray<f32>>,
    ) {
        use burn::tensor::Tensor;
        use ibsi_core::{Direction3, Grid, PixelType, Point3, Spacing3};

        let device = Default::default();
        let grid = Grid::new(
            [2, 2, 2],
            Point3::origin(),
            Spacing3::uniform(1.0),
            Direction3::identity(),
        )
        .unwrap();
        let data = Tensor::ones([2, 2, 2], &device);
        let mask = Tensor::ones([2, 2, 2], &device);
        (
            Image::new(data, grid.clone(), PixelType::Float32).unwrap(),
            Mask::new(mask, grid).unwrap(),
        )
    }

    #[test]
    fn test_precomputed_extractor_reads_csv() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("case2_3D.csv");
        let mut file = std::fs::File::create(&path)?;
        writeln!(file, "feature,value")?;
        writeln!(file, "firstorder_Mean,42.5")?;
        writeln!(file, "diagnostics_Version,v3.0.1")?;
        writeln!(file, "glcm_SumEntropy,\"[1.0, 2.0]\"")?;

        let mut extractor = PrecomputedExtractor::new(dir.path());
        let profile = ExtractionProfile {
            params_file: "case2.yml".to_string(),
            prefix: "3D_".to_string(),
            force_2d: false,
        };
        let (image, mask) = unit_pair();

        let features = extractor
            .extract(&image, &mask, &CaseId::Patient(2), &profile)?
            .expect("engine output exists");

        assert_eq!(features.len(), 2);
        assert_eq!(
            features.get("firstorder_Mean"),
            Some(&FeatureValue::Scalar(42.5))
        );
        assert_eq!(
            features.get("glcm_SumEntropy"),
            Some(&FeatureValue::List(vec![1.0, 2.0]))
        );
        assert!(!features.contains_key("diagnostics_Version"));

        Ok(())
    }

    #[test]
    fn test_missing_profile_is_skipped() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut extractor = PrecomputedExtractor::new(dir.path());
        let profile = ExtractionProfile {
            params_file: "case1.yml".to_string(),
            prefix: "3D_".to_string(),
            force_2d: false,
        };
        let (image, mask) = unit_pair();

        let result = extractor.extract(&image, &mask, &CaseId::Patient(1), &profile)?;
        assert!(result.is_none());
        Ok(())
    }

    #[test]
    fn test_missing_profile_output_path() {
        let extractor = PrecomputedExtractor::new("/nonexistent");
        let profile = ExtractionProfile {
            params_file: "Phantom_Combined.yml".to_string(),
            prefix: "2D_Combined_".to_string(),
            force_2d: true,
        };
        let path = extractor.output_path(&CaseId::Phantom, &profile);
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "phantom_2D_Combined.csv"
        );
    }
}
