//! Export — JSON and CSV artifacts for a metrics report.
//!
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: one row per ranked entity for spreadsheets and charting tools
//!
//! Unknown (newer) schema versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::ranking::RankedEntry;
use crate::report::{MetricsReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `MetricsReport` to pretty JSON.
pub fn export_json(report: &MetricsReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize MetricsReport to JSON")
}

/// Deserialize a `MetricsReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<MetricsReport> {
    let report: MetricsReport =
        serde_json::from_str(json).context("failed to deserialize MetricsReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export ranked entries as CSV.
///
/// Columns: rank, entity_id, total_return, max_drawdown, sharpe_ratio,
/// sortino_ratio, calmar_ratio, current_value, starting_value
pub fn export_csv(entries: &[RankedEntry]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "rank",
        "entity_id",
        "total_return",
        "max_drawdown",
        "sharpe_ratio",
        "sortino_ratio",
        "calmar_ratio",
        "current_value",
        "starting_value",
    ])?;

    for entry in entries {
        let r = &entry.record;
        wtr.write_record(&[
            entry.rank.to_string(),
            r.entity_id.clone(),
            format!("{:.6}", r.total_return),
            format!("{:.6}", r.max_drawdown),
            format!("{:.6}", r.sharpe_ratio),
            format!("{:.6}", r.sortino_ratio),
            format!("{:.6}", r.calmar_ratio),
            format!("{:.2}", r.current_value),
            format!("{:.2}", r.starting_value),
        ])?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

// ─── Artifact directory ─────────────────────────────────────────────

/// Write `standings.json` and `standings.csv` into `output_dir`.
///
/// Returns the directory written to.
pub fn save_report(report: &MetricsReport, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    std::fs::write(output_dir.join("standings.json"), export_json(report)?)
        .context("failed to write standings.json")?;
    std::fs::write(output_dir.join("standings.csv"), export_csv(&report.entries)?)
        .context("failed to write standings.csv")?;

    Ok(output_dir.to_path_buf())
}

/// Load a report previously written by `save_report`.
pub fn load_report(dir: &Path) -> Result<MetricsReport> {
    let path = dir.join("standings.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
