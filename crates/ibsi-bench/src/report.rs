//! Per-case discrepancy reports.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cases::CaseId;
use crate::mapping::ReportRow;

/// Write `results_<case>.csv` into `results_dir`.
pub fn write_report<P: AsRef<Path>>(
    results_dir: P,
    case: &CaseId,
    rows: &[ReportRow],
) -> Result<()> {
    let path = results_dir.as_ref().join(format!("results_{case}.csv"));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("failed to create report {}", path.display()))?;

    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("failed to write report row to {}", path.display()))?;
    }
    writer.flush()?;

    info!(case = %case, rows = rows.len(), path = %path.display(), "wrote report");
    Ok(())
}
