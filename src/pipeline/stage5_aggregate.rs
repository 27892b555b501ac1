use serde::Serialize;

use crate::input::schema::MetricSchema;
use crate::model::columns::{FINAL_MATCH_RATE, GRADE_NAME};
use crate::model::table::TableView;
use crate::pipeline::stage4_rank::{RankedRow, Stage4Output};

pub const DEFAULT_BINS: usize = 20;
pub const MAX_BINS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1); `None` below two values.
    pub stddev: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: String,
    pub n_rows: usize,
    pub summary: Summary,
    pub box_stats: Option<BoxStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMean {
    pub column: String,
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Performer {
    pub name: Option<String>,
    pub final_match_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub average_match_rate: Option<f64>,
    pub stddev_match_rate: Option<f64>,
    pub best: Option<Performer>,
    pub worst: Option<Performer>,
}

#[derive(Debug, Clone)]
pub struct Stage5Output {
    pub match_rate: Summary,
    pub histogram: Vec<HistogramBin>,
    /// `None` when the table has no grade column; the view is skipped.
    pub by_grade: Option<Vec<GroupSummary>>,
    pub tgv_profile: Vec<ColumnMean>,
    pub insights: Insights,
}

pub fn summarize(values: &[f64]) -> Summary {
    let n = values.len();
    if n == 0 {
        return Summary {
            count: 0,
            mean: None,
            stddev: None,
        };
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let stddev = if n < 2 {
        None
    } else {
        let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
        Some((ss / (n - 1) as f64).sqrt())
    };
    Summary {
        count: n,
        mean: Some(mean),
        stddev,
    }
}

pub fn summary(view: &TableView<'_>, column: &str) -> Summary {
    summarize(&view.present_numbers(column))
}

/// One summary per distinct `group_by` value, in order of first appearance.
/// Rows with a missing group value are left out. `None` if `group_by` is not
/// a column of the view.
pub fn grouped_summary(
    view: &TableView<'_>,
    column: &str,
    group_by: &str,
) -> Option<Vec<GroupSummary>> {
    if !view.has_column(group_by) {
        tracing::debug!(column = group_by, "group column absent; skipping grouped view");
        return None;
    }

    let mut groups: Vec<(String, usize, Vec<f64>)> = Vec::new();
    for pos in 0..view.len() {
        let Some(key) = view.display(pos, group_by) else {
            continue;
        };
        let idx = match groups.iter().position(|(g, _, _)| *g == key) {
            Some(idx) => idx,
            None => {
                groups.push((key, 0, Vec::new()));
                groups.len() - 1
            }
        };
        groups[idx].1 += 1;
        if let Some(v) = view.number(pos, column) {
            groups[idx].2.push(v);
        }
    }

    Some(
        groups
            .into_iter()
            .map(|(group, n_rows, values)| GroupSummary {
                group,
                n_rows,
                summary: summarize(&values),
                box_stats: box_stats(&values),
            })
            .collect(),
    )
}

/// Mean of each column independently, in the order given.
pub fn column_means(view: &TableView<'_>, columns: &[String]) -> Vec<ColumnMean> {
    columns
        .iter()
        .map(|column| ColumnMean {
            column: column.clone(),
            mean: summary(view, column).mean,
        })
        .collect()
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
pub fn quantile_linear(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (h - lo as f64)
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Some(BoxStats {
        min: sorted[0],
        q1: quantile_linear(&sorted, 0.25),
        median: quantile_linear(&sorted, 0.5),
        q3: quantile_linear(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Equal-width bins between the smallest and largest finite value. The last
/// bin is closed on the right; a constant column gives a single bin. `bins`
/// is capped at [`MAX_BINS`].
pub fn histogram(view: &TableView<'_>, column: &str, bins: usize) -> Vec<HistogramBin> {
    let bins = bins.min(MAX_BINS);
    let values: Vec<f64> = view
        .present_numbers(column)
        .into_iter()
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max - min <= f64::EPSILON {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();
    for v in values {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

fn performer(row: &RankedRow) -> Performer {
    Performer {
        name: row.name.clone(),
        final_match_rate: row.final_match_rate,
    }
}

/// Headline numbers: spread of the match rate plus the first row of each
/// ranked table.
pub fn insights(top: &[RankedRow], bottom: &[RankedRow], match_rate: &Summary) -> Insights {
    Insights {
        average_match_rate: match_rate.mean,
        stddev_match_rate: match_rate.stddev,
        best: top.first().map(performer),
        worst: bottom.first().map(performer),
    }
}

pub fn run_stage5(
    view: &TableView<'_>,
    schema: &MetricSchema,
    ranked: &Stage4Output,
    bins: usize,
) -> Stage5Output {
    let match_rate = summary(view, FINAL_MATCH_RATE);
    Stage5Output {
        match_rate,
        histogram: histogram(view, FINAL_MATCH_RATE, bins),
        by_grade: grouped_summary(view, FINAL_MATCH_RATE, GRADE_NAME),
        tgv_profile: column_means(view, &schema.tgv),
        insights: insights(&ranked.top, &ranked.bottom, &match_rate),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_aggregate.rs"]
mod tests;
