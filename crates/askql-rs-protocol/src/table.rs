//! Tabular query results shared between the engine, cache, and wire layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column-ordered table of JSON cells produced by running SQL.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Table {
    /// Column names in result order.
    pub columns: Vec<String>,
    /// Rows of cells; each row has one cell per column.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from column names and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Return a copy holding at most the first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Render rows as a JSON array of objects keyed by column name.
    pub fn to_records_json(&self) -> String {
        let records = self
            .rows
            .iter()
            .map(|row| {
                let mut record = Map::new();
                for (column, cell) in self.columns.iter().zip(row) {
                    record.insert(column.clone(), cell.clone());
                }
                Value::Object(record)
            })
            .collect::<Vec<_>>();
        Value::Array(records).to_string()
    }

    /// Render the table as CSV with a leading row-index column.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        let header = std::iter::once(String::new())
            .chain(self.columns.iter().map(|column| csv_escape(column)))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&header);
        out.push('\n');
        for (idx, row) in self.rows.iter().enumerate() {
            let line = std::iter::once(idx.to_string())
                .chain(row.iter().map(|cell| csv_escape(&cell_text(cell))))
                .collect::<Vec<_>>()
                .join(",");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Values of a single column, top to bottom.
    pub fn column_values(&self, idx: usize) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or(Value::Null))
            .collect()
    }

    /// Indexes of columns whose non-null cells are all numbers.
    ///
    /// A column with only nulls is not numeric.
    pub fn numeric_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|idx| {
                let mut seen = false;
                for row in &self.rows {
                    match row.get(*idx) {
                        None | Some(Value::Null) => {}
                        Some(Value::Number(_)) => seen = true,
                        Some(_) => return false,
                    }
                }
                seen
            })
            .collect()
    }
}

/// Plain-text rendering of a cell for CSV output.
fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn csv_escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
