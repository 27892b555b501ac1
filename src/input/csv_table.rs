use std::io::Read;

use crate::input::InputError;
use crate::model::table::Table;
use crate::model::value::Value;

/// Read a delimited table with a header row. Fields are typed with
/// [`Value::parse`]; rows shorter than the header are padded with missing
/// cells, longer rows are rejected.
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<Table, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
        return Err(InputError::Parse("dataset has no header row".to_string()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() > columns.len() {
            return Err(InputError::Parse(format!(
                "line {line}: {} fields but header has {}",
                record.len(),
                columns.len()
            )));
        }
        if record.len() == 1 && record.get(0).is_some_and(|f| f.trim().is_empty()) {
            tracing::debug!(line, "skipping blank line");
            continue;
        }
        rows.push(record.iter().map(Value::parse).collect());
    }

    Ok(Table::new(columns, rows))
}

fn csv_error(err: csv::Error) -> InputError {
    let msg = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => InputError::Io(e),
        _ => InputError::Parse(msg),
    }
}
