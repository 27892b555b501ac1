use std::cmp::Ordering;

use serde::Serialize;

use crate::model::columns::{FINAL_MATCH_RATE, FULLNAME, GAP_TV, TGV_AVG};
use crate::model::table::TableView;

pub const DEFAULT_TOP_N: usize = 10;
pub const MAX_TOP_N: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Descending,
    Ascending,
}

/// One row of a performer table, restricted to the columns the renderer shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub name: Option<String>,
    pub gap_tv: Option<f64>,
    pub tgv_avg: Option<f64>,
    pub final_match_rate: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Stage4Output {
    pub top: Vec<RankedRow>,
    pub bottom: Vec<RankedRow>,
}

/// View positions ordered by `column`. The sort is stable, so ties keep view
/// order; missing values go last in both directions.
pub fn rank_positions(view: &TableView<'_>, column: &str, direction: Direction) -> Vec<usize> {
    let keys = view.numbers(column);
    let mut order: Vec<usize> = (0..view.len()).collect();
    order.sort_by(|&a, &b| match (keys[a], keys[b]) {
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
            match direction {
                Direction::Ascending => ord,
                Direction::Descending => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    order
}

pub fn top_n<'a>(view: &TableView<'a>, column: &str, n: usize) -> TableView<'a> {
    let mut order = rank_positions(view, column, Direction::Descending);
    order.truncate(n);
    view.select(&order)
}

pub fn bottom_n<'a>(view: &TableView<'a>, column: &str, n: usize) -> TableView<'a> {
    let mut order = rank_positions(view, column, Direction::Ascending);
    order.truncate(n);
    view.select(&order)
}

pub fn project_ranked(view: &TableView<'_>) -> Vec<RankedRow> {
    (0..view.len())
        .map(|pos| RankedRow {
            name: view.display(pos, FULLNAME),
            gap_tv: view.number(pos, GAP_TV),
            tgv_avg: view.number(pos, TGV_AVG),
            final_match_rate: view.number(pos, FINAL_MATCH_RATE),
        })
        .collect()
}

pub fn run_stage4(view: &TableView<'_>, n: usize) -> Stage4Output {
    Stage4Output {
        top: project_ranked(&top_n(view, FINAL_MATCH_RATE, n)),
        bottom: project_ranked(&bottom_n(view, FINAL_MATCH_RATE, n)),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_rank.rs"]
mod tests;
