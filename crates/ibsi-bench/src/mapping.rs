//! Benchmark mapping files and the result join.
//!
//! A mapping file pairs each published benchmark feature with the engine
//! feature that computes it, the reference value, and optionally an index
//! into a list-valued feature. Joining a mapping against extracted features
//! produces one report row per mapping entry; rows whose lookup fails carry
//! an explicit status instead of being dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::extractor::FeatureValue;

/// One row of a `mapping_<case>.csv` file.
#[derive(Debug, Clone, Deserialize)]
pub struct MappingRow {
    /// Published benchmark feature identifier.
    pub benchmark_feature: String,
    /// Engine feature name (with profile prefix) computing it.
    pub pyradiomics_feature: String,
    /// Published reference value, when one exists.
    pub benchmark_value: Option<f64>,
    /// Index into a list-valued engine feature.
    pub idx: Option<usize>,
}

/// Outcome of joining one mapping row against the extracted features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// Lookup succeeded and yielded a scalar.
    Ok,
    /// The engine produced no feature under the mapped name.
    MissingFeature,
    /// The row's `idx` does not address an element of the feature value.
    IndexOutOfRange,
    /// The feature is list-valued but the row carries no index.
    NotScalar,
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RowStatus::Ok => "ok",
            RowStatus::MissingFeature => "missing_feature",
            RowStatus::IndexOutOfRange => "index_out_of_range",
            RowStatus::NotScalar => "not_scalar",
        };
        f.write_str(s)
    }
}

/// One row of a `results_<case>.csv` report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub benchmark_feature: String,
    pub pyradiomics_feature: String,
    pub benchmark_value: Option<f64>,
    pub extracted_value: Option<f64>,
    pub difference: Option<f64>,
    pub status: RowStatus,
}

/// Read a mapping CSV.
pub fn read_mapping<P: AsRef<Path>>(path: P) -> Result<Vec<MappingRow>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open mapping file {}", path.display()))?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: MappingRow = record
            .with_context(|| format!("malformed mapping row in {}", path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Resolve one mapping row against the extracted features.
fn resolve(row: &MappingRow, features: &BTreeMap<String, FeatureValue>) -> (Option<f64>, RowStatus) {
    let Some(value) = features.get(&row.pyradiomics_feature) else {
        return (None, RowStatus::MissingFeature);
    };

    match (row.idx, value) {
        (None, FeatureValue::Scalar(v)) => (Some(*v), RowStatus::Ok),
        (None, FeatureValue::List(_)) => (None, RowStatus::NotScalar),
        (Some(i), FeatureValue::List(values)) => match values.get(i) {
            Some(v) => (Some(*v), RowStatus::Ok),
            None => (None, RowStatus::IndexOutOfRange),
        },
        (Some(_), FeatureValue::Scalar(_)) => (None, RowStatus::IndexOutOfRange),
    }
}

/// Join a mapping against extracted features.
///
/// Every mapping row produces exactly one report row; lookups that fail are
/// flagged through [`RowStatus`] rather than suppressed. The difference
/// column is only filled when both a reference and an extracted scalar
/// exist.
pub fn join_results(
    mapping: &[MappingRow],
    features: &BTreeMap<String, FeatureValue>,
) -> Vec<ReportRow> {
    mapping
        .iter()
        .map(|row| {
            let (extracted_value, status) = resolve(row, features);
            let difference = match (row.benchmark_value, extracted_value) {
                (Some(reference), Some(extracted)) => Some(extracted - reference),
                _ => None,
            };
            ReportRow {
                benchmark_feature: row.benchmark_feature.clone(),
                pyradiomics_feature: row.pyradiomics_feature.clone(),
                benchmark_value: row.benchmark_value,
                extracted_value,
                difference,
                status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_features() -> BTreeMap<String, FeatureValue> {
        let mut features = BTreeMap::new();
        features.insert("3D_firstorder_Mean".to_string(), FeatureValue::Scalar(12.5));
        features.insert(
            "3D_glcm_SumEntropy".to_string(),
            FeatureValue::List(vec![1.0, 2.0, 3.0]),
        );
        features
    }

    fn row(feature: &str, reference: Option<f64>, idx: Option<usize>) -> MappingRow {
        MappingRow {
            benchmark_feature: format!("ibsi_{feature}"),
            pyradiomics_feature: feature.to_string(),
            benchmark_value: reference,
            idx,
        }
    }

    #[test]
    fn test_join_scalar() {
        let rows = join_results(
            &[row("3D_firstorder_Mean", Some(12.0), None)],
            &sample_features(),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, RowStatus::Ok);
        assert_eq!(rows[0].extracted_value, Some(12.5));
        assert!((rows[0].difference.unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_join_list_with_index() {
        let rows = join_results(
            &[row("3D_glcm_SumEntropy", Some(2.5), Some(1))],
            &sample_features(),
        );
        assert_eq!(rows[0].status, RowStatus::Ok);
        assert_eq!(rows[0].extracted_value, Some(2.0));
    }

    #[test]
    fn test_join_flags_failures() {
        let features = sample_features();

        let rows = join_results(&[row("3D_firstorder_Median", Some(1.0), None)], &features);
        assert_eq!(rows[0].status, RowStatus::MissingFeature);
        assert_eq!(rows[0].extracted_value, None);
        assert_eq!(rows[0].difference, None);

        let rows = join_results(&[row("3D_glcm_SumEntropy", None, Some(7))], &features);
        assert_eq!(rows[0].status, RowStatus::IndexOutOfRange);

        let rows = join_results(&[row("3D_glcm_SumEntropy", None, None)], &features);
        assert_eq!(rows[0].status, RowStatus::NotScalar);

        let rows = join_results(&[row("3D_firstorder_Mean", None, Some(0))], &features);
        assert_eq!(rows[0].status, RowStatus::IndexOutOfRange);
    }

    #[test]
    fn test_read_mapping() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("mapping_case1.csv");
        let mut file = std::fs::File::create(&path)?;
        writeln!(file, "benchmark_feature,pyradiomics_feature,benchmark_value,idx")?;
        writeln!(file, "morph_volume,3D_shape_MeshVolume,358000,")?;
        writeln!(file, "ivh_v10,3D_firstorder_IVH,0.97,2")?;
        writeln!(file, "no_reference,3D_firstorder_Energy,,")?;

        let rows = read_mapping(&path)?;
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].benchmark_value, Some(358000.0));
        assert_eq!(rows[0].idx, None);
        assert_eq!(rows[1].idx, Some(2));
        assert_eq!(rows[2].benchmark_value, None);

        Ok(())
    }
}
