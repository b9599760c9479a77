//! Schema-less result records and their tabular view.
//!
//! The DTM API does not publish a fixed schema for its `result` records; the
//! set of fields varies by operation, admin level, and reporting round. Each
//! record is therefore an open string-keyed JSON map, and [`RecordSet`]
//! materializes a tabular view over a batch of them: columns are the union of
//! record keys in first-seen order, and rows missing a key hold an explicit
//! JSON `null`.

use serde_json::{Map, Value};

/// A single result record as returned by the server: an open mapping from
/// field name to scalar or nested value.
pub type Record = Map<String, Value>;

/// A tabular view over a sequence of [`Record`]s.
///
/// Built with [`RecordSet::from_records`]; the column union is computed at
/// conversion time, never assumed up front. [`RecordSet::to_records`] goes
/// back to records, reproducing the original key/value pairs except that
/// keys absent from a record come back as explicit `null`s.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RecordSet {
    /// Reshape a sequence of records into columns and rows.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.iter().any(|column| column == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|column| record.remove(column).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Column names, in first-seen order across the source records.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the set holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows; each row is aligned to [`columns`](Self::columns).
    pub fn rows(&self) -> impl Iterator<Item = &[Value]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Look up a single cell by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index)
    }

    /// Convert back to records. Cells that were null-filled during
    /// [`from_records`](Self::from_records) stay as explicit `null` keys.
    pub fn to_records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }
}
