pub mod json;
pub mod text;

use serde::Serialize;

use crate::model::advisory::Advisory;
use crate::pipeline::PositionReport;
use crate::pipeline::stage4_rank::RankedRow;
use crate::pipeline::stage5_aggregate::{ColumnMean, GroupSummary, HistogramBin, Insights, Summary};

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Renderer hand-off: every number a dashboard needs for one position.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: ToolMeta,
    pub query: String,
    pub position_title: String,
    pub n_employees: usize,
    pub advisories: Vec<Advisory>,
    pub final_match_rate: Summary,
    pub histogram: Vec<HistogramBin>,
    pub by_grade: Option<Vec<GroupSummary>>,
    pub tgv_profile: Vec<ColumnMean>,
    pub top: Vec<RankedRow>,
    pub bottom: Vec<RankedRow>,
    pub insights: Insights,
}

pub fn build_summary(report: &PositionReport<'_>, tool: ToolMeta) -> SummaryData {
    SummaryData {
        tool,
        query: report.query.clone(),
        position_title: title_case(&report.query),
        n_employees: report.employees.len(),
        advisories: report.advisories.clone(),
        final_match_rate: report.aggregates.match_rate,
        histogram: report.aggregates.histogram.clone(),
        by_grade: report.aggregates.by_grade.clone(),
        tgv_profile: report.aggregates.tgv_profile.clone(),
        top: report.ranked.top.clone(),
        bottom: report.ranked.bottom.clone(),
        insights: report.aggregates.insights.clone(),
    }
}

pub fn format_f64_2(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn format_opt_2(v: Option<f64>) -> String {
    match v {
        Some(v) => format_f64_2(v),
        None => "n/a".to_string(),
    }
}

/// Capitalize the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
        } else {
            out.push(ch);
        }
        prev_alpha = ch.is_alphabetic();
    }
    out
}

/// Lowercase, filesystem-safe rendering of a query for per-query output dirs.
pub fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut dash = false;
    for ch in s.trim().chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            dash = false;
        } else if !dash && !out.is_empty() {
            out.push('-');
            dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("query");
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
