use std::collections::HashMap;

use crate::model::columns::POSITION_NAME;
use crate::model::table::{Table, TableView};

/// Trimmed query, or `None` while the user has not supplied one yet.
pub fn normalize_query(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Rows whose `position_name` source text equals `query`, ignoring case.
/// Order is kept; rows with a missing position never match.
pub fn filter_position<'a>(view: &TableView<'a>, query: &str) -> TableView<'a> {
    let needle = query.to_lowercase();
    let keep: Vec<usize> = (0..view.len())
        .filter(|&pos| {
            view.text(pos, POSITION_NAME)
                .is_some_and(|name| name.to_lowercase() == needle)
        })
        .collect();
    view.select(&keep)
}

/// Distinct position names with their row counts, most common first, ties by
/// name.
pub fn distinct_positions(table: &Table) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in 0..table.n_rows() {
        if let Some(name) = table.cell(row, POSITION_NAME).as_text() {
            *counts.entry(name).or_default() += 1;
        }
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, n)| (name.to_string(), n))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_filter.rs"]
mod tests;
