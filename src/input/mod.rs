use std::path::Path;

use thiserror::Error;

pub mod cache;
pub mod csv_table;
pub mod schema;
pub mod source;

use crate::model::table::Table;
use csv_table::read_table;
use schema::{MetricSchema, discover, validate_required};
use source::open_maybe_gz;

pub const DEFAULT_INPUT: &str = "df_final_fix.csv";

/// Load failures. Every variant means the dataset is unavailable for the
/// session; callers surface it and stop.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("missing required column `{column}` in {path}")]
    MissingColumn { column: String, path: String },
    #[error("parse error: {0}")]
    Parse(String),
}

/// The loaded table together with the column conventions discovered on it.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub table: Table,
    pub schema: MetricSchema,
}

pub fn load_dataset(path: &Path, delimiter: u8) -> Result<LoadedDataset, InputError> {
    if !path.exists() {
        return Err(InputError::MissingInput(format!(
            "file `{}` not found; place the dataset there or pass --input",
            path.display()
        )));
    }

    let reader = open_maybe_gz(path)?;
    let table = read_table(reader, delimiter)?;
    validate_required(table.columns(), path)?;
    let schema = discover(table.columns());

    tracing::info!(
        path = %path.display(),
        rows = table.n_rows(),
        columns = table.columns().len(),
        pairs = schema.pairs.len(),
        dimensions = schema.tgv.len(),
        grade = schema.has_grade,
        "loaded dataset"
    );

    Ok(LoadedDataset { table, schema })
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
