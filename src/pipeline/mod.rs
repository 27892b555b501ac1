pub mod stage2_filter;
pub mod stage3_derive;
pub mod stage4_rank;
pub mod stage5_aggregate;
pub mod stage6_report;

use crate::input::LoadedDataset;
use crate::model::advisory::Advisory;
use crate::model::table::TableView;
use stage2_filter::{filter_position, normalize_query};
use stage3_derive::run_stage3;
use stage4_rank::{DEFAULT_TOP_N, Stage4Output, run_stage4};
use stage5_aggregate::{DEFAULT_BINS, Stage5Output, run_stage5};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryParams {
    pub top_n: usize,
    pub bins: usize,
}

impl Default for QueryParams {
    fn default() -> Self {
        QueryParams {
            top_n: DEFAULT_TOP_N,
            bins: DEFAULT_BINS,
        }
    }
}

/// Everything computed for one position query.
#[derive(Debug, Clone)]
pub struct PositionReport<'a> {
    pub query: String,
    /// Filtered rows with `gap_tv` and `tgv_avg` attached.
    pub employees: TableView<'a>,
    pub advisories: Vec<Advisory>,
    pub ranked: Stage4Output,
    pub aggregates: Stage5Output,
}

#[derive(Debug, Clone)]
pub enum QueryOutcome<'a> {
    /// No position entered yet; nothing was computed.
    AwaitingInput,
    NoMatch { query: String },
    Report(Box<PositionReport<'a>>),
}

/// One synchronous pass: filter, derive, rank, aggregate. The dataset is only
/// read; all per-query data lives in the returned view.
pub fn run_query<'a>(
    dataset: &'a LoadedDataset,
    raw_query: &str,
    params: &QueryParams,
) -> QueryOutcome<'a> {
    let Some(query) = normalize_query(raw_query) else {
        return QueryOutcome::AwaitingInput;
    };

    let mut employees = filter_position(&dataset.table.view_all(), query);
    if employees.is_empty() {
        tracing::info!(query, "position not found");
        return QueryOutcome::NoMatch {
            query: query.to_string(),
        };
    }
    tracing::info!(query, rows = employees.len(), "position matched");

    let advisories = run_stage3(&mut employees, &dataset.schema);
    let ranked = run_stage4(&employees, params.top_n);
    let aggregates = run_stage5(&employees, &dataset.schema, &ranked, params.bins);

    QueryOutcome::Report(Box::new(PositionReport {
        query: query.to_string(),
        employees,
        advisories,
        ranked,
        aggregates,
    }))
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/mod.rs"]
mod tests;
