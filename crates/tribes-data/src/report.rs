//! Tier-by-month pivot and CSV serialization.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};
use tribes_core::error::{ReportError, Result};
use tribes_core::models::CountMetric;
use tribes_core::time_utils::YearMonth;

use crate::aggregator::MonthlyIndex;

/// First header cell; the remaining cells are month labels.
pub const TIER_HEADER: &str = "Tier";

// ── PivotReport ───────────────────────────────────────────────────────────────

/// One tier's counts, aligned with [`PivotReport::months`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotRow {
    pub tier: String,
    pub counts: Vec<usize>,
}

/// Tier rows (lexical order) by month columns (chronological order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotReport {
    pub metric: CountMetric,
    pub months: Vec<YearMonth>,
    pub rows: Vec<PivotRow>,
}

impl PivotReport {
    /// Pivot `index`, counting the set chosen by `metric` in each cell.
    /// Cells with no entry count as zero.
    pub fn build(index: &MonthlyIndex, metric: CountMetric) -> Self {
        let months = index.months();
        let rows = index
            .tiers()
            .into_iter()
            .map(|tier| PivotRow {
                tier: tier.to_string(),
                counts: months
                    .iter()
                    .map(|month| {
                        index
                            .get(*month, tier)
                            .map(|stats| stats.count(metric))
                            .unwrap_or(0)
                    })
                    .collect(),
            })
            .collect();

        Self {
            metric,
            months,
            rows,
        }
    }

    /// `Tier` followed by one `"<Month> <Year>"` label per month.
    pub fn header(&self) -> Vec<String> {
        std::iter::once(TIER_HEADER.to_string())
            .chain(self.months.iter().map(YearMonth::label))
            .collect()
    }

    /// Serialize as CSV: the header, then one line per tier.
    pub fn write_csv<W: Write>(&self, sink: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(sink);

        writer.write_record(self.header())?;
        for row in &self.rows {
            let record = std::iter::once(row.tier.clone())
                .chain(row.counts.iter().map(usize::to_string));
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Render the whole CSV document in memory.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

/// Write `report` to `path`.
///
/// The document is rendered first, written to a sibling `.tmp` file and then
/// renamed over `path`, so a failed run leaves no partial report behind.
pub fn write_report(path: &Path, report: &PivotReport) -> Result<()> {
    let bytes = report.to_csv_bytes()?;
    let tmp = tmp_path(path);

    let write_err = |source: std::io::Error| ReportError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Err(source) = std::fs::write(&tmp, &bytes) {
        let _ = std::fs::remove_file(&tmp);
        return Err(write_err(source));
    }
    if let Err(source) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(write_err(source));
    }

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    info!(
        "Report written to {} ({} tiers x {} months, counting {})",
        path.display(),
        report.rows.len(),
        report.months.len(),
        report.metric
    );
    Ok(())
}

/// `report.csv` → `report.csv.tmp`, in the same directory.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
