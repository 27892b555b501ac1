use std::collections::HashSet;
use std::path::Path;

use crate::input::InputError;
use crate::model::columns::{BENCH_PREFIX, GRADE_NAME, TGV_PREFIX, TV_PREFIX, required_columns};

/// An observed column and its benchmark, sharing one metric suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricPair {
    pub metric: String,
    pub tv: String,
    pub bench: String,
}

/// Column conventions found on a table header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricSchema {
    pub pairs: Vec<MetricPair>,
    /// `tv_` columns without a `bench_` partner; ignored by the deriver.
    pub unmatched_tv: Vec<String>,
    pub tgv: Vec<String>,
    pub has_grade: bool,
}

/// Scan the header once and build the pairing and dimension lists, in
/// header order.
pub fn discover(columns: &[String]) -> MetricSchema {
    let names: HashSet<&str> = columns.iter().map(String::as_str).collect();
    let mut schema = MetricSchema {
        has_grade: names.contains(GRADE_NAME),
        ..MetricSchema::default()
    };
    let mut seen: HashSet<&str> = HashSet::new();

    for column in columns {
        if !seen.insert(column.as_str()) {
            continue;
        }
        if let Some(metric) = column.strip_prefix(TV_PREFIX) {
            let bench = format!("{BENCH_PREFIX}{metric}");
            if names.contains(bench.as_str()) {
                schema.pairs.push(MetricPair {
                    metric: metric.to_string(),
                    tv: column.clone(),
                    bench,
                });
            } else {
                schema.unmatched_tv.push(column.clone());
            }
        } else if column.starts_with(TGV_PREFIX) {
            schema.tgv.push(column.clone());
        }
    }

    let metrics: Vec<&str> = schema.pairs.iter().map(|p| p.metric.as_str()).collect();
    tracing::debug!(?metrics, "paired tv_/bench_ columns");
    if !schema.unmatched_tv.is_empty() {
        tracing::debug!(columns = ?schema.unmatched_tv, "tv_ columns without bench_ partner");
    }
    schema
}

pub fn validate_required(columns: &[String], path: &Path) -> Result<(), InputError> {
    for &required in required_columns() {
        if !columns.iter().any(|c| c == required) {
            return Err(InputError::MissingColumn {
                column: required.to_string(),
                path: path.display().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/schema.rs"]
mod tests;
