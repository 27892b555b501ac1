use std::collections::HashMap;

use crate::model::value::Value;

static MISSING: Value = Value::Missing;

/// The loaded employee table. Immutable once built; shared across queries.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table from a header and rows. Short rows are padded with
    /// `Missing`; for duplicated header names the first column wins.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Value>>) -> Table {
        let mut index = HashMap::with_capacity(columns.len());
        for (idx, name) in columns.iter().enumerate() {
            if index.contains_key(name) {
                tracing::warn!(column = %name, position = idx, "duplicate column name; keeping first");
                continue;
            }
            index.insert(name.clone(), idx);
        }
        for row in &mut rows {
            if row.len() < columns.len() {
                row.resize(columns.len(), Value::Missing);
            }
        }
        Table {
            columns,
            index,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, row: usize) -> &[Value] {
        &self.rows[row]
    }

    /// Cell lookup by column name; unknown columns read as missing.
    pub fn cell(&self, row: usize, column: &str) -> &Value {
        match self.column_index(column) {
            Some(col) => &self.rows[row][col],
            None => &MISSING,
        }
    }

    /// A view over every row, in file order.
    pub fn view_all(&self) -> TableView<'_> {
        TableView::new(self, (0..self.rows.len()).collect())
    }
}

/// Numeric column computed for the rows of one view only.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Row subset of a [`Table`] plus derived columns.
///
/// The view never copies or mutates the source rows: it holds source row
/// indices in view order, and derived values aligned with those positions.
/// Positions (`pos`) below always index the view, not the table.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    table: &'a Table,
    rows: Vec<usize>,
    derived: Vec<DerivedColumn>,
}

impl<'a> TableView<'a> {
    pub fn new(table: &'a Table, rows: Vec<usize>) -> Self {
        TableView {
            table,
            rows,
            derived: Vec::new(),
        }
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Source-table row index for each view position.
    pub fn source_rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn derived_columns(&self) -> &[DerivedColumn] {
        &self.derived
    }

    pub fn derived(&self, name: &str) -> Option<&[Option<f64>]> {
        self.derived
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.table.has_column(name) || self.derived(name).is_some()
    }

    /// Attach (or replace) a derived column. `values` must be aligned with the
    /// view positions.
    pub fn attach(&mut self, name: &str, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.rows.len());
        if let Some(existing) = self.derived.iter_mut().find(|c| c.name == name) {
            existing.values = values;
            return;
        }
        self.derived.push(DerivedColumn {
            name: name.to_string(),
            values,
        });
    }

    /// Source cell at a view position. Derived columns are not cells; use
    /// [`TableView::number`] for those.
    pub fn cell(&self, pos: usize, column: &str) -> &'a Value {
        self.table.cell(self.rows[pos], column)
    }

    /// Numeric value at a view position, looking at derived columns first.
    pub fn number(&self, pos: usize, column: &str) -> Option<f64> {
        if let Some(values) = self.derived(column) {
            return values[pos];
        }
        self.cell(pos, column).as_f64()
    }

    pub fn text(&self, pos: usize, column: &str) -> Option<&'a str> {
        self.cell(pos, column).as_text()
    }

    /// Cell rendered as text, `None` when missing.
    pub fn display(&self, pos: usize, column: &str) -> Option<String> {
        if let Some(values) = self.derived(column) {
            return values[pos].map(|v| v.to_string());
        }
        match self.cell(pos, column) {
            Value::Missing => None,
            other => Some(other.to_string()),
        }
    }

    pub fn numbers(&self, column: &str) -> Vec<Option<f64>> {
        (0..self.len()).map(|pos| self.number(pos, column)).collect()
    }

    /// Non-missing numeric values of a column, in view order.
    pub fn present_numbers(&self, column: &str) -> Vec<f64> {
        (0..self.len())
            .filter_map(|pos| self.number(pos, column))
            .collect()
    }

    /// Sub-view of the given view positions, in the given order. Derived
    /// columns follow their rows.
    pub fn select(&self, positions: &[usize]) -> TableView<'a> {
        let rows = positions.iter().map(|&pos| self.rows[pos]).collect();
        let derived = self
            .derived
            .iter()
            .map(|c| DerivedColumn {
                name: c.name.clone(),
                values: positions.iter().map(|&pos| c.values[pos]).collect(),
            })
            .collect();
        TableView {
            table: self.table,
            rows,
            derived,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/table.rs"]
mod tests;
