use crate::input::schema::MetricSchema;
use crate::model::advisory::Advisory;
use crate::model::columns::{GAP_TV, TGV_AVG};
use crate::model::table::TableView;

/// Mean of the present values; `None` when nothing is present.
pub fn mean_present<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut sum = 0.0f64;
    let mut n = 0usize;
    for v in values.into_iter().flatten() {
        sum += v;
        n += 1;
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}

/// Attach `gap_tv`: per row, the mean of `tv - bench` over pairs where both
/// sides are present.
pub fn derive_gap_tv(view: &mut TableView<'_>, schema: &MetricSchema) -> Option<Advisory> {
    if schema.pairs.is_empty() {
        view.attach(GAP_TV, vec![None; view.len()]);
        return Some(Advisory::NoPairsFound);
    }
    let values = (0..view.len())
        .map(|pos| {
            mean_present(schema.pairs.iter().map(|pair| {
                let tv = view.number(pos, &pair.tv)?;
                let bench = view.number(pos, &pair.bench)?;
                Some(tv - bench)
            }))
        })
        .collect();
    view.attach(GAP_TV, values);
    None
}

/// Attach `tgv_avg`: per row, the mean of the present `tgv_*` values.
pub fn derive_tgv_avg(view: &mut TableView<'_>, schema: &MetricSchema) -> Option<Advisory> {
    if schema.tgv.is_empty() {
        view.attach(TGV_AVG, vec![None; view.len()]);
        return Some(Advisory::NoDimensionsFound);
    }
    let values = (0..view.len())
        .map(|pos| mean_present(schema.tgv.iter().map(|col| view.number(pos, col))))
        .collect();
    view.attach(TGV_AVG, values);
    None
}

pub fn run_stage3(view: &mut TableView<'_>, schema: &MetricSchema) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    advisories.extend(derive_gap_tv(view, schema));
    advisories.extend(derive_tgv_avg(view, schema));
    for advisory in &advisories {
        tracing::warn!("{}", advisory.message());
    }
    advisories
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_derive.rs"]
mod tests;
