//! IBSI conformance benchmark orchestration.
//!
//! Loads the reference phantom and patient volume pairs, resamples them per
//! case, joins extracted features against the published benchmark mappings,
//! and writes per-case discrepancy reports.

pub mod cases;
pub mod extractor;
pub mod mapping;
pub mod report;
pub mod runner;

pub use cases::{default_plans, CaseId, CasePlan, ExtractionProfile};
pub use extractor::{parse_feature_value, FeatureExtractor, FeatureValue, PrecomputedExtractor};
pub use mapping::{join_results, read_mapping, MappingRow, ReportRow, RowStatus};
pub use report::write_report;
pub use runner::{run_benchmark, BenchmarkConfig, BenchmarkSummary};
