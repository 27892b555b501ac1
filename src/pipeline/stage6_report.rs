use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::table::TableView;
use crate::pipeline::PositionReport;
use crate::pipeline::stage4_rank::RankedRow;
use crate::report::json::render_summary_json;
use crate::report::text::render_report_text;
use crate::report::{ToolMeta, build_summary};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TSV write failed: {0}")]
    Tsv(#[from] csv::Error),
    #[error("JSON render failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub report: PathBuf,
    pub summary: PathBuf,
    pub employees: PathBuf,
    pub top: PathBuf,
    pub bottom: PathBuf,
}

impl ReportPaths {
    pub fn files(&self) -> [&Path; 5] {
        [
            self.report.as_path(),
            self.summary.as_path(),
            self.employees.as_path(),
            self.top.as_path(),
            self.bottom.as_path(),
        ]
    }
}

pub fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

pub fn render_text(report: &PositionReport<'_>) -> String {
    render_report_text(&build_summary(report, tool_meta()))
}

pub fn write_reports(report: &PositionReport<'_>, out_dir: &Path) -> Result<ReportPaths, ReportError> {
    fs::create_dir_all(out_dir)?;
    let summary = build_summary(report, tool_meta());

    let paths = ReportPaths {
        report: out_dir.join("report.txt"),
        summary: out_dir.join("summary.json"),
        employees: out_dir.join("employees.tsv"),
        top: out_dir.join("top.tsv"),
        bottom: out_dir.join("bottom.tsv"),
    };

    fs::write(&paths.report, render_report_text(&summary))?;
    fs::write(&paths.summary, render_summary_json(&summary)?)?;
    write_employees_tsv(&report.employees, &paths.employees)?;
    write_ranked_tsv(&summary.top, &paths.top)?;
    write_ranked_tsv(&summary.bottom, &paths.bottom)?;

    for file in paths.files() {
        tracing::debug!(path = %file.display(), "wrote");
    }
    tracing::info!(out_dir = %out_dir.display(), query = %report.query, "reports written");
    Ok(paths)
}

fn tsv_writer(path: &Path) -> Result<csv::Writer<fs::File>, ReportError> {
    Ok(csv::WriterBuilder::new().delimiter(b'\t').from_path(path)?)
}

fn format_opt(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

/// All source columns of the filtered rows followed by the derived columns.
pub fn write_employees_tsv(view: &TableView<'_>, path: &Path) -> Result<(), ReportError> {
    let mut w = tsv_writer(path)?;
    let table = view.table();

    let mut header: Vec<&str> = table.columns().iter().map(String::as_str).collect();
    header.extend(view.derived_columns().iter().map(|c| c.name.as_str()));
    w.write_record(&header)?;

    for (pos, &src) in view.source_rows().iter().enumerate() {
        let mut record: Vec<String> = table.row(src).iter().map(|v| v.to_string()).collect();
        record.extend(view.derived_columns().iter().map(|c| format_opt(c.values[pos])));
        w.write_record(&record)?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_ranked_tsv(rows: &[RankedRow], path: &Path) -> Result<(), ReportError> {
    let mut w = tsv_writer(path)?;
    w.write_record(["name", "gap_tv", "tgv_avg", "final_match_rate"])?;
    for r in rows {
        w.write_record([
            r.name.clone().unwrap_or_default(),
            format_opt(r.gap_tv),
            format_opt(r.tgv_avg),
            format_opt(r.final_match_rate),
        ])?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_report.rs"]
mod tests;
